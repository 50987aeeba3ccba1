//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::render::TitleMode;

/// Which key-value backend fronts the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    /// Always degraded
    None,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "none" | "off" => Ok(CacheBackend::None),
            other => Err(format!("unknown cache backend `{}`", other)),
        }
    }
}

/// What to do when a listed text cannot be read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFilePolicy {
    /// Answer 404 and keep serving
    NotFound,
    /// Log and terminate the process
    Exit,
}

impl FromStr for MissingFilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not-found" | "404" => Ok(MissingFilePolicy::NotFound),
            "exit" => Ok(MissingFilePolicy::Exit),
            other => Err(format!("unknown missing-file policy `{}`", other)),
        }
    }
}

/// Body of 404 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundStyle {
    Html,
    Plain,
}

impl FromStr for NotFoundStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(NotFoundStyle::Html),
            "plain" | "text" => Ok(NotFoundStyle::Plain),
            other => Err(format!("unknown not-found style `{}`", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// API namespace, targets live under `{namespace}/{raw,json,html}`
    pub namespace: String,
    /// Directory holding the markdown texts
    pub texts_dir: String,
    /// Extension a file needs to be listed
    pub content_extension: String,
    /// Shared secret expected in the `Authorization` header
    pub auth: Option<String>,
    pub cache_backend: CacheBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    /// Flush the store once on the first connect
    pub flush_on_start: bool,
    pub title_mode: TitleMode,
    pub missing_file: MissingFilePolicy,
    pub not_found_style: NotFoundStyle,
    /// Serve non-namespace paths as html
    pub bare_paths: bool,
    /// JSON file of static routes
    pub routes_file: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MM_NAMESPACE` - API namespace (default: `/mm/api/v1`)
    /// - `MM_TEXTS_DIR` - markdown directory (default: `./texts`)
    /// - `MM_CONTENT_EXTENSION` - listed extension (default: `.md`)
    /// - `MM_AUTH` - shared secret (default: unset)
    /// - `MM_CACHE_BACKEND` - `redis`, `memory` or `none` (default: `redis`)
    /// - `REDIS_PORT_6379_TCP_ADDR` / `REDIS_PORT_6379_TCP_PORT` - store address (default: `redis:6379`)
    /// - `REDIS_PASSWORD` - store password (default: unset)
    /// - `MM_FLUSH_ON_START` - flush the store once (default: false)
    /// - `MM_TITLE_MODE` - `front-matter` or `heading` (default: `front-matter`)
    /// - `MM_MISSING_FILE` - `not-found` or `exit` (default: `not-found`)
    /// - `MM_NOT_FOUND_STYLE` - `html` or `plain` (default: `html`)
    /// - `MM_BARE_PATHS` - serve bare paths as html (default: false)
    /// - `MM_ROUTES_FILE` - JSON file of static routes (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            namespace: env::var("MM_NAMESPACE").unwrap_or(defaults.namespace),
            texts_dir: env::var("MM_TEXTS_DIR").unwrap_or(defaults.texts_dir),
            content_extension: env::var("MM_CONTENT_EXTENSION")
                .unwrap_or(defaults.content_extension),
            auth: non_empty("MM_AUTH"),
            cache_backend: parsed("MM_CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            redis_host: env::var("REDIS_PORT_6379_TCP_ADDR").unwrap_or(defaults.redis_host),
            redis_port: parsed("REDIS_PORT_6379_TCP_PORT").unwrap_or(defaults.redis_port),
            redis_password: non_empty("REDIS_PASSWORD"),
            flush_on_start: parsed("MM_FLUSH_ON_START").unwrap_or(defaults.flush_on_start),
            title_mode: parsed("MM_TITLE_MODE").unwrap_or(defaults.title_mode),
            missing_file: parsed("MM_MISSING_FILE").unwrap_or(defaults.missing_file),
            not_found_style: parsed("MM_NOT_FOUND_STYLE").unwrap_or(defaults.not_found_style),
            bare_paths: parsed("MM_BARE_PATHS").unwrap_or(defaults.bare_paths),
            routes_file: non_empty("MM_ROUTES_FILE"),
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            namespace: "/mm/api/v1".to_string(),
            texts_dir: "./texts".to_string(),
            content_extension: ".md".to_string(),
            auth: None,
            cache_backend: CacheBackend::Redis,
            redis_host: "redis".to_string(),
            redis_port: 6379,
            redis_password: None,
            flush_on_start: false,
            title_mode: TitleMode::FrontMatter,
            missing_file: MissingFilePolicy::NotFound,
            not_found_style: NotFoundStyle::Html,
            bare_paths: false,
            routes_file: None,
        }
    }
}
