#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crate::config::ViewsConfig;
    use crate::error::ViewError;
    use crate::tests::fixtures::tree;
    use crate::types::ScanOptions;
    use crate::views::ViewEngine;
    use tempfile::TempDir;

    fn engine_for(root: &Path) -> ViewEngine {
        let config = ViewsConfig { root: root.to_path_buf(), ..ViewsConfig::default() };
        ViewEngine::new(config, ScanOptions::default())
    }

    fn views_tree() -> TempDir {
        tree(&[
            ("index.html", "Hello {{ name }}!"),
            ("base.html", "<main>{% block body %}{% endblock body %}</main>"),
            ("pages/about.html", "{% extends \"base.html\" %}{% block body %}About {{ who }}{% endblock body %}"),
            ("pages/notes.txt", "not a template"),
            (".drafts/wip.html", "hidden"),
        ])
    }

    #[tokio::test]
    async fn load_discovers_filtered_templates() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());

        assert_eq!(engine.load().await.unwrap(), 3);
        assert_eq!(engine.template_names().await, vec!["base.html", "index.html", "pages/about.html"]);
        assert!(!engine.has_template("pages/notes.txt").await);
        assert!(!engine.has_template(".drafts/wip.html").await);
    }

    #[tokio::test]
    async fn missing_root_loads_nothing() {
        let temp_dir = tree(&[]);
        let engine = engine_for(&temp_dir.path().join("views"));
        assert_eq!(engine.load().await.unwrap(), 0);
        assert!(engine.template_names().await.is_empty());
    }

    #[tokio::test]
    async fn renders_with_context_and_inheritance() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());
        engine.load().await.unwrap();

        let mut ctx = tera::Context::new();
        ctx.insert("name", "World");
        assert_eq!(engine.render("index.html", &ctx).await.unwrap(), "Hello World!");

        #[derive(serde::Serialize)]
        struct About {
            who: String,
        }
        let html = engine
            .render_with("pages/about.html", &About { who: "us".to_string() })
            .await
            .unwrap();
        assert_eq!(html, "<main>About us</main>");
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());
        engine.load().await.unwrap();

        let err = engine.render("missing.html", &tera::Context::new()).await.unwrap_err();
        assert!(matches!(err, ViewError::NotFound(name) if name == "missing.html"));
    }

    #[tokio::test]
    async fn reload_only_when_tree_changes() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());
        engine.load().await.unwrap();

        assert!(!engine.reload_if_changed().await.unwrap());

        fs::write(temp_dir.path().join("pages/contact.html"), "Contact").unwrap();
        assert!(engine.reload_if_changed().await.unwrap());
        assert!(engine.has_template("pages/contact.html").await);
        assert!(!engine.reload_if_changed().await.unwrap());

        fs::remove_file(temp_dir.path().join("index.html")).unwrap();
        assert!(engine.reload_if_changed().await.unwrap());
        assert!(!engine.has_template("index.html").await);
    }

    #[tokio::test]
    async fn broken_template_keeps_previous_cache() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());
        engine.load().await.unwrap();

        fs::write(temp_dir.path().join("broken.html"), "{% if %}").unwrap();
        let err = engine.reload_if_changed().await.unwrap_err();
        assert!(matches!(err, ViewError::Template(_)));
        assert!(engine.has_template("index.html").await);
        assert!(!engine.has_template("broken.html").await);
    }

    #[tokio::test]
    async fn forced_scan_options_do_not_leak_into_names() {
        let temp_dir = views_tree();
        let config = ViewsConfig { root: temp_dir.path().to_path_buf(), ..ViewsConfig::default() };
        let engine = ViewEngine::new(config, ScanOptions::from_bits(crate::types::ABSOLUTE_PATHS | crate::types::INCLUDE_DIRECTORIES));
        assert_eq!(engine.load().await.unwrap(), 3);
        assert!(engine.has_template("index.html").await);
    }

    #[tokio::test]
    async fn watcher_picks_up_new_templates() {
        let temp_dir = views_tree();
        let engine = engine_for(temp_dir.path());
        engine.load().await.unwrap();

        let handle = engine.spawn_watcher(std::time::Duration::from_millis(20));
        fs::write(temp_dir.path().join("late.html"), "late").unwrap();

        let mut found = false;
        for _ in 0..100 {
            if engine.has_template("late.html").await {
                found = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        handle.abort();
        assert!(found);
    }
}
