#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{Builder, NamedTempFile, TempDir};

    use crate::config::{self, AppConfig};

    fn write_temp_config(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://data/shiftboard.db");
        assert_eq!(config.api.default_page_size, 20);
        assert_eq!(config.api.max_page_size, 2000);
        assert!(config.search.reindex_on_startup);
        assert!(!config.shifts.reject_overlaps);
        assert!(config.security.is_none());
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_extra_file_overrides_defaults() {
        let file = write_temp_config(
            r#"
[server]
port = 9090

[shifts]
reject_overlaps = true

[security]
enable_hsts = true
"#,
        );
        let config = config::load_with(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.shifts.reject_overlaps);
        assert_eq!(config.security.and_then(|s| s.enable_hsts), Some(true));
    }

    #[test]
    fn test_missing_extra_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = config::load_with(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_temp_config("[api]\ndefault_page_size = 50\nmax_page_size = 10\n");
        let err = config::load_with(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("default_page_size"));

        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config::validate(&config).unwrap_err().to_string().contains("invalid server.port"));

        let mut config = AppConfig::default();
        config.api.max_body_bytes = 0;
        assert!(config::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.database.url = "  ".into();
        assert!(config::validate(&config).is_err());
    }

    #[test]
    fn test_ensure_sqlite_parent_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let url = format!("sqlite://{}", nested.join("shiftboard.db").display());

        config::ensure_sqlite_parent_dir(&url).unwrap();
        assert!(nested.is_dir());

        // non-sqlite urls are left alone
        config::ensure_sqlite_parent_dir("postgres://localhost/db").unwrap();
    }
}
