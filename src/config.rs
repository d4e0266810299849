use std::path::PathBuf;

use serde::Deserialize;

use crate::scanner;
use crate::types::ScanOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// Directory the templates are discovered under.
    pub root: PathBuf,
    /// Include filters; a template is any file matching one of them.
    pub filters: Vec<String>,
    /// Poll the view root and reload on change.
    pub watch: bool,
    pub watch_interval_ms: u64,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            root: PathBuf::from("views"),
            filters: vec!["**.html".to_string()],
            watch: true,
            watch_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub views: ViewsConfig,
    #[serde(default)]
    pub scan_defaults: ScanOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: viewscan.toml (in CWD)
        .add_source(::config::File::with_name("viewscan").required(false));

    if let Ok(custom_path) = std::env::var("VIEWSCAN_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("VIEWSCAN").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Views
    if cfg.views.root.as_os_str().is_empty() {
        return Err(anyhow::anyhow!("views.root must not be empty"));
    }
    if cfg.views.watch_interval_ms == 0 {
        return Err(anyhow::anyhow!("views.watch_interval_ms must be > 0"));
    }
    scanner::compile_filters(&cfg.views.filters)
        .map_err(|e| anyhow::anyhow!("views.filters: {}", e))?;

    // Scan defaults
    for pattern in &cfg.scan_defaults.excludes {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("scan_defaults.excludes: {}", e))?;
    }

    Ok(())
}
