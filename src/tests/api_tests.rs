#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::routes;
    use crate::state::AppState;
    use crate::tests::fixtures::tree;

    async fn setup_test_app() -> (Router, TempDir) {
        let temp_dir = tree(&[
            ("index.html", "Hello {{ name }}!"),
            ("mail/welcome.html", "Welcome {{ user | default(value=\"guest\") }}"),
        ]);
        let mut config = AppConfig::default();
        config.views.root = temp_dir.path().to_path_buf();
        config.views.watch = false;

        let state = AppState::new(config);
        state.views.load().await.unwrap();
        (routes::router(state), temp_dir)
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let (app, _dir) = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let (app, _dir) = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/version").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["name"], "viewscan");
        assert!(!v["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_views() {
        let (app, _dir) = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/views").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["templates"], serde_json::json!(["index.html", "mail/welcome.html"]));
    }

    #[tokio::test]
    async fn test_render_with_query_context() {
        let (app, _dir) = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/render/index.html?name=World").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "Hello World!");

        let (status, body) = send(&app, Method::GET, "/render/mail/welcome.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "Welcome guest");
    }

    #[tokio::test]
    async fn test_render_unknown_template_is_404() {
        let (app, _dir) = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/render/nope.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["error"]["code"], "NOT_FOUND");
        assert_eq!(v["status"], 404);
    }

    #[tokio::test]
    async fn test_render_rejects_parent_segments() {
        let (app, _dir) = setup_test_app().await;
        let (status, _) = send(&app, Method::GET, "/render/mail/../index.html").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_templates() {
        let (app, dir) = setup_test_app().await;
        std::fs::write(dir.path().join("fresh.html"), "fresh").unwrap();

        let (status, body) = send(&app, Method::POST, "/views/reload").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["templates"], 3);

        let (status, body) = send(&app, Method::GET, "/render/fresh.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"fresh");
    }
}
