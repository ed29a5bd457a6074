use std::path::Path;

use serde::Deserialize;

const DEFAULTS: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub reindex_on_startup: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShiftsConfig {
    /// Refuse creates/updates that conflict with existing shifts of the same
    /// car or driver. Checks are serialized per resource while enabled.
    pub reject_overlaps: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub shifts: ShiftsConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
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

/// Embedded defaults -> shiftboard.toml -> $SHIFTBOARD_CONFIG -> env.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();
    let custom = std::env::var("SHIFTBOARD_CONFIG").ok();
    load_with(custom.as_deref().map(Path::new))
}

/// Same layering as [`load`] with an explicit extra file in place of
/// `$SHIFTBOARD_CONFIG`.
pub fn load_with(extra: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: shiftboard.toml (in CWD)
        .add_source(::config::File::with_name("shiftboard").required(false));

    if let Some(path) = extra {
        builder = builder.add_source(::config::File::from(path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("SHIFTBOARD").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    // Warn for privileged ports on Unix-like systems
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.database.url.trim().is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }

    if cfg.api.default_page_size == 0 {
        return Err(anyhow::anyhow!("api.default_page_size must be > 0"));
    }
    if cfg.api.max_page_size == 0 {
        return Err(anyhow::anyhow!("api.max_page_size must be > 0"));
    }
    if cfg.api.default_page_size > cfg.api.max_page_size {
        return Err(anyhow::anyhow!("api.default_page_size must be <= api.max_page_size"));
    }
    if cfg.api.max_body_bytes == 0 {
        return Err(anyhow::anyhow!("api.max_body_bytes must be > 0"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        // sqlite:///C:/... on Windows: drop the leading '/' before a drive letter
        #[cfg(windows)]
        let path = {
            let bytes = path.as_bytes();
            if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
                &path[1..]
            } else {
                path
            }
        };
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
