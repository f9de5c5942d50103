use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Parser, Debug)]
#[command(name = "labdesk", about = "Terminal admin console for a pathology lab network")]
pub struct Cli {
    /// Admin API base URL
    #[arg(long, env = "LABDESK_BASE_URL")]
    pub base_url: Option<String>,

    /// Admin email, used to log in at startup
    #[arg(long, env = "LABDESK_EMAIL")]
    pub email: Option<String>,

    /// Admin password, used to log in at startup
    #[arg(long, env = "LABDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Existing session token; skips the login prompt
    #[arg(long, env = "LABDESK_TOKEN", hide_env_values = true, requires = "admin_id")]
    pub token: Option<String>,

    /// Admin id that goes with --token
    #[arg(long, env = "LABDESK_ADMIN_ID")]
    pub admin_id: Option<String>,

    /// Quiet period after the last keystroke before a search is sent
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Rows per list page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log file path
    #[arg(long, env = "LABDESK_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub debounce_ms: Option<u64>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<String>,
}

impl ConfigFile {
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("labdesk").join("config.toml"))
    }

    /// Reads the config file. A missing file is not an error; a malformed one
    /// is returned so the caller can report it once logging is up.
    pub fn load() -> Result<Self, toml::de::Error> {
        match Self::path().and_then(|path| std::fs::read_to_string(path).ok()) {
            Some(content) => Self::parse(&content),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Settings after CLI flags, environment and the config file are merged.
/// Flags and environment win over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub admin_id: Option<String>,
    pub debounce: Duration,
    pub page_size: u32,
    pub timeout: Duration,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn resolve(cli: Cli, file: ConfigFile) -> Self {
        Self {
            base_url: cli
                .base_url
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            email: cli.email.or(file.email),
            password: cli.password,
            token: cli.token,
            admin_id: cli.admin_id,
            debounce: Duration::from_millis(cli.debounce_ms.or(file.debounce_ms).unwrap_or(500)),
            page_size: cli.page_size.or(file.page_size).unwrap_or(10).max(1),
            timeout: Duration::from_secs(cli.timeout_secs.or(file.timeout_secs).unwrap_or(15)),
            log_file: cli.log_file.or(file.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built directly rather than parsed so LABDESK_* variables in the
    // environment cannot leak in.
    fn bare_cli() -> Cli {
        Cli {
            base_url: None,
            email: None,
            password: None,
            token: None,
            admin_id: None,
            debounce_ms: None,
            page_size: None,
            timeout_secs: None,
            log_file: None,
        }
    }

    #[test]
    fn defaults_apply_without_file() {
        let settings = Settings::resolve(bare_cli(), ConfigFile::default());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.debounce, Duration::from_millis(500));
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.timeout, Duration::from_secs(15));
        assert_eq!(settings.token, None);
    }

    #[test]
    fn flags_override_file() {
        let file = ConfigFile::parse(
            r#"
            base_url = "https://labs.example.com/api"
            page_size = 25
            debounce_ms = 300
            "#,
        )
        .unwrap();
        let cli = Cli {
            page_size: Some(50),
            ..bare_cli()
        };
        let settings = Settings::resolve(cli, file);
        assert_eq!(settings.base_url, "https://labs.example.com/api");
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.debounce, Duration::from_millis(300));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(ConfigFile::parse("page_size = \"ten\"").is_err());
        assert!(ConfigFile::parse("").is_ok());
    }

    #[test]
    fn token_requires_admin_id() {
        // The only test that parses, so the only one that reads the environment.
        if std::env::var_os("LABDESK_ADMIN_ID").is_some() {
            return;
        }
        let args = ["labdesk", "--token", "abc"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = ["labdesk", "--token", "abc", "--admin-id", "a1"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.admin_id.as_deref(), Some("a1"));
    }
}
