//! Template cache fed by the directory scanner.
//!
//! Templates are discovered with [`scan_async`](crate::scanner::scan_async)
//! under the configured view root and filters, parsed into one
//! [`tera::Tera`] instance, and swapped in atomically. A reload re-runs the
//! scan and compares a fingerprint (template paths plus modification times)
//! so unchanged trees cost one scan and no parsing.

use std::collections::HashMap;
use std::path::{Path, MAIN_SEPARATOR};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::Serialize;
use tera::{Context, Tera};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ViewsConfig;
use crate::error::ViewError;
use crate::scanner;
use crate::types::ScanOptions;

mod response;

pub use response::View;

type Fingerprint = Vec<(String, Option<SystemTime>)>;

struct Cache {
    tera: Tera,
    fingerprint: Fingerprint,
}

/// Shared, clone-able handle to the template cache.
#[derive(Clone)]
pub struct ViewEngine {
    inner: Arc<RwLock<Cache>>,
    config: Arc<ViewsConfig>,
    options: Arc<ScanOptions>,
}

impl ViewEngine {
    /// Creates an engine with an empty cache. Call [`load`](Self::load) to
    /// populate it.
    ///
    /// `scan_options` tune discovery; `absolute_paths` and
    /// `include_directories` are forced off because template names are the
    /// root-relative file paths.
    pub fn new(config: ViewsConfig, scan_options: ScanOptions) -> Self {
        let options = ScanOptions { absolute_paths: false, include_directories: false, ..scan_options };
        Self {
            inner: Arc::new(RwLock::new(Cache { tera: new_tera(), fingerprint: Vec::new() })),
            config: Arc::new(config),
            options: Arc::new(options),
        }
    }

    pub fn config(&self) -> &ViewsConfig {
        &self.config
    }

    /// Scans the view root and replaces the cache. Returns the template count.
    pub async fn load(&self) -> Result<usize, ViewError> {
        let files = self.discover().await?;
        let fingerprint = fingerprint(&self.config.root, &files).await;
        self.install(files, fingerprint).await
    }

    /// Reloads only when the set of templates or one of their modification
    /// times changed since the last load.
    pub async fn reload_if_changed(&self) -> Result<bool, ViewError> {
        let files = self.discover().await?;
        let fingerprint = fingerprint(&self.config.root, &files).await;
        if self.inner.read().await.fingerprint == fingerprint {
            return Ok(false);
        }
        self.install(files, fingerprint).await?;
        Ok(true)
    }

    pub async fn render(&self, name: &str, context: &Context) -> Result<String, ViewError> {
        let cache = self.inner.read().await;
        if !cache.tera.get_template_names().any(|n| n == name) {
            return Err(ViewError::NotFound(name.to_string()));
        }
        Ok(cache.tera.render(name, context)?)
    }

    /// Renders `name` with a context built from any serializable value.
    pub async fn render_with<T: Serialize>(&self, name: &str, data: &T) -> Result<String, ViewError> {
        let context = Context::from_serialize(data)?;
        self.render(name, &context).await
    }

    pub async fn has_template(&self, name: &str) -> bool {
        self.inner.read().await.tera.get_template_names().any(|n| n == name)
    }

    /// Cached template names, sorted.
    pub async fn template_names(&self) -> Vec<String> {
        let cache = self.inner.read().await;
        let mut names: Vec<String> = cache.tera.get_template_names().map(String::from).collect();
        names.sort();
        names
    }

    /// Polls the view root every `interval` and reloads on change.
    pub fn spawn_watcher(&self, interval: Duration) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match engine.reload_if_changed().await {
                    Ok(true) => info!("Views under {} changed, templates reloaded", engine.config.root.display()),
                    Ok(false) => {}
                    Err(e) => warn!("Template reload failed: {}", e),
                }
            }
        })
    }

    async fn discover(&self) -> Result<Vec<String>, ViewError> {
        let mut files = scanner::scan_async(&self.config.root, &self.config.filters, &self.options).await?;
        files.sort();
        Ok(files)
    }

    async fn install(&self, files: Vec<String>, fingerprint: Fingerprint) -> Result<usize, ViewError> {
        let mut sources = Vec::with_capacity(files.len());
        for rel in &files {
            let path = self.config.root.join(rel);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ViewError::Io { path: path.clone(), source })?;
            sources.push((template_name(rel), content));
        }

        let mut tera = new_tera();
        tera.add_raw_templates(sources)?;
        let count = files.len();

        let mut cache = self.inner.write().await;
        cache.tera = tera;
        cache.fingerprint = fingerprint;
        info!("Loaded {} templates from {}", count, self.config.root.display());
        Ok(count)
    }
}

/// Template names always use `/`, whatever the platform separator.
fn template_name(rel: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        rel.to_string()
    } else {
        rel.replace(MAIN_SEPARATOR, "/")
    }
}

async fn fingerprint(root: &Path, files: &[String]) -> Fingerprint {
    let mut out = Vec::with_capacity(files.len());
    for rel in files {
        let modified = match tokio::fs::metadata(root.join(rel)).await {
            Ok(m) => m.modified().ok(),
            Err(e) => {
                debug!("Could not stat template {}: {}", rel, e);
                None
            }
        };
        out.push((rel.clone(), modified));
    }
    out
}

fn new_tera() -> Tera {
    let mut tera = Tera::default();
    register_builtin_filters(&mut tera);
    tera
}

fn register_builtin_filters(tera: &mut Tera) {
    // JSON filter for debugging
    tera.register_filter(
        "json_pretty",
        |value: &tera::Value, _: &HashMap<String, tera::Value>| {
            serde_json::to_string_pretty(value)
                .map(tera::Value::String)
                .map_err(|e| tera::Error::msg(e.to_string()))
        },
    );
}
