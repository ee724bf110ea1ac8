//! Configuration management for Scenario-Harness

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Harness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebDriver endpoint (chromedriver, geckodriver, selenium grid)
    pub webdriver_url: String,

    /// Browser name requested in the new-session capabilities
    pub browser: String,

    /// Run the browser without a GUI
    pub headless: bool,

    /// Window width
    pub window_width: u32,

    /// Window height
    pub window_height: u32,

    /// Maximize the window instead of sizing it
    pub maximize_window: bool,

    /// Implicit element lookup wait in milliseconds
    pub implicit_wait_ms: u64,

    /// Default explicit wait timeout in milliseconds
    pub default_timeout_ms: u64,

    /// Poll interval for explicit waits in milliseconds
    pub poll_interval_ms: u64,

    /// Upper bound on a single WebDriver command in milliseconds
    pub command_timeout_ms: u64,

    /// Path to the credentials JSON file
    pub credentials_path: String,

    /// Delete all cookies before quitting a browser session
    pub clear_cookies_on_close: bool,

    /// Directory for failure screenshots
    pub screenshot_dir: Option<String>,

    /// Maximum scenarios running at once
    pub parallelism: usize,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            browser: "chrome".to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            maximize_window: true,
            implicit_wait_ms: 0,
            default_timeout_ms: 10_000,
            poll_interval_ms: 500,
            command_timeout_ms: 60_000,
            credentials_path: "resources/credential.json".to_string(),
            clear_cookies_on_close: true,
            screenshot_dir: None,
            parallelism: 1,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env()
    }

    /// Apply `HARNESS_*` environment overrides on top of this configuration
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(url) = env::var("HARNESS_WEBDRIVER_URL") {
            self.webdriver_url = url;
        }

        if let Ok(browser) = env::var("HARNESS_BROWSER") {
            self.browser = browser;
        }

        if let Ok(headless) = env::var("HARNESS_HEADLESS") {
            self.headless = headless
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_HEADLESS"))?;
        }

        if let Ok(width) = env::var("HARNESS_WINDOW_WIDTH") {
            self.window_width = width
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_WINDOW_WIDTH"))?;
        }

        if let Ok(height) = env::var("HARNESS_WINDOW_HEIGHT") {
            self.window_height = height
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_WINDOW_HEIGHT"))?;
        }

        if let Ok(implicit) = env::var("HARNESS_IMPLICIT_WAIT_MS") {
            self.implicit_wait_ms = implicit
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_IMPLICIT_WAIT_MS"))?;
        }

        if let Ok(timeout) = env::var("HARNESS_DEFAULT_TIMEOUT_MS") {
            self.default_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_DEFAULT_TIMEOUT_MS"))?;
        }

        if let Ok(poll) = env::var("HARNESS_POLL_INTERVAL_MS") {
            self.poll_interval_ms = poll
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_POLL_INTERVAL_MS"))?;
        }

        if let Ok(command) = env::var("HARNESS_COMMAND_TIMEOUT_MS") {
            self.command_timeout_ms = command
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_COMMAND_TIMEOUT_MS"))?;
        }

        if let Ok(path) = env::var("HARNESS_CREDENTIALS_PATH") {
            self.credentials_path = path;
        }

        if let Ok(dir) = env::var("HARNESS_SCREENSHOT_DIR") {
            self.screenshot_dir = Some(dir);
        }

        if let Ok(parallelism) = env::var("HARNESS_PARALLELISM") {
            self.parallelism = parallelism
                .parse()
                .map_err(|_| Error::configuration("Invalid HARNESS_PARALLELISM"))?;
        }

        if let Ok(log_level) = env::var("HARNESS_LOG_LEVEL") {
            self.log_level = log_level;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_timeout_ms == 0 {
            return Err(Error::configuration("default_timeout_ms must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::configuration("poll_interval_ms must be positive"));
        }
        if self.command_timeout_ms == 0 {
            return Err(Error::configuration("command_timeout_ms must be positive"));
        }
        if self.parallelism == 0 {
            return Err(Error::configuration("parallelism must be at least 1"));
        }
        Ok(())
    }

    /// Explicit wait timeout
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Explicit wait poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// WebDriver command timeout
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Session configuration for a browser scenario starting at `base_url`
    pub fn browser_session(&self, base_url: Option<&str>) -> SessionConfig {
        SessionConfig {
            kind: SessionKind::Browser,
            base_url: base_url.map(str::to_string),
            timeout: self.default_timeout(),
            poll_interval: self.poll_interval(),
            implicit_wait: Duration::from_millis(self.implicit_wait_ms),
            window: if self.maximize_window {
                WindowSize::Maximized
            } else {
                WindowSize::Fixed {
                    width: self.window_width,
                    height: self.window_height,
                }
            },
            headless: self.headless,
            clear_cookies_on_close: self.clear_cookies_on_close,
        }
    }

    /// Session configuration for an HTTP scenario against `base_url`
    pub fn http_session(&self, base_url: &str) -> SessionConfig {
        SessionConfig {
            kind: SessionKind::Http,
            base_url: Some(base_url.to_string()),
            timeout: self.default_timeout(),
            poll_interval: self.poll_interval(),
            implicit_wait: Duration::ZERO,
            window: WindowSize::Unspecified,
            headless: self.headless,
            clear_cookies_on_close: false,
        }
    }

    /// Directory for failure screenshots, if enabled
    pub fn screenshot_dir(&self) -> Option<PathBuf> {
        self.screenshot_dir.as_ref().map(PathBuf::from)
    }
}

/// What kind of automation context a session wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Browser,
    Http,
}

/// Window sizing applied when a browser session opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSize {
    Unspecified,
    Maximized,
    Fixed { width: u32, height: u32 },
}

/// Per-session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub kind: SessionKind,
    /// Browser: first page to load. HTTP: base location for relative paths.
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub implicit_wait: Duration,
    pub window: WindowSize,
    pub headless: bool,
    pub clear_cookies_on_close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_timeout(), Duration::from_secs(10));
        assert_eq!(config.parallelism, 1);
        assert_eq!(config.command_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"webdriver_url = \"http://grid:4444\"\nheadless = false\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.webdriver_url, "http://grid:4444");
        assert!(!config.headless);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        // Unlisted keys keep their defaults
        assert_eq!(config.default_timeout_ms, 10_000);
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"poll_interval_ms = 0\n").unwrap();

        let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_rejects_zero_command_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"command_timeout_ms = 0\n").unwrap();

        let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_browser_session_window() {
        let mut config = Config::default();
        config.maximize_window = false;
        config.window_width = 1280;
        config.window_height = 720;

        let session = config.browser_session(Some("https://example.com"));
        assert_eq!(session.kind, SessionKind::Browser);
        assert_eq!(
            session.window,
            WindowSize::Fixed {
                width: 1280,
                height: 720
            }
        );
        assert_eq!(session.base_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_http_session() {
        let session = Config::default().http_session("https://api.example.com");
        assert_eq!(session.kind, SessionKind::Http);
        assert!(!session.clear_cookies_on_close);
    }
}
