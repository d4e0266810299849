use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tera::Context;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::types::{ReloadResponse, TemplateListResponse};
use crate::views::View;

pub async fn list_views(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse { templates: state.views.template_names().await })
}

pub async fn reload_views(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let templates = state.views.load().await?;
    Ok(Json(ReloadResponse { templates }))
}

// Renders a cached template; query parameters become the template context
pub async fn render_view(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<View> {
    let name = name.trim_start_matches('/');
    if name.is_empty() || name.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest(format!("invalid template name '{}'", name)));
    }

    let mut context = Context::new();
    for (key, value) in &params {
        context.insert(key.as_str(), value);
    }
    Ok(View::render_context(&state.views, name, &context).await)
}
