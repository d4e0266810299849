use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tera::Context;

use super::ViewEngine;
use crate::error::{AppError, ViewError};

/// A rendered template as an axum response.
///
/// Success renders `text/html` with the chosen status; failures go through
/// [`AppError`], so an unknown template becomes a JSON 404.
pub struct View {
    content: Result<String, ViewError>,
    status: StatusCode,
}

impl View {
    pub async fn render<T: Serialize>(engine: &ViewEngine, template: &str, data: &T) -> Self {
        Self { content: engine.render_with(template, data).await, status: StatusCode::OK }
    }

    pub async fn render_context(engine: &ViewEngine, template: &str, context: &Context) -> Self {
        Self { content: engine.render(template, context).await, status: StatusCode::OK }
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self { content: Ok(html.into()), status: StatusCode::OK }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        match self.content {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(err) => AppError::from(err).into_response(),
        }
    }
}
