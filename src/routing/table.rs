//! Route Table
//!
//! Declared endpoints and the content behind them. Built once at startup
//! and immutable afterwards. Declaration order is kept: the matcher relies
//! on it to pick between parametric routes sharing a first segment.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::routing::Handler;

// == Route ==
/// Content source of a declared endpoint. Files under the texts directory
/// are the implicit third kind and never appear in the table.
#[derive(Clone)]
pub enum Route {
    /// Literal markdown
    Static { text: String },
    /// Produced per request
    Handler(HandlerRoute),
}

#[derive(Clone)]
pub struct HandlerRoute {
    pub handler: Arc<dyn Handler>,
    pub styles: Option<String>,
    pub title: Option<String>,
}

impl HandlerRoute {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            styles: None,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Static { text } => f.debug_struct("Static").field("text", text).finish(),
            Route::Handler(route) => f
                .debug_struct("Handler")
                .field("styles", &route.styles)
                .field("title", &route.title)
                .finish_non_exhaustive(),
        }
    }
}

/// Entry of a routes file.
#[derive(Debug, Deserialize)]
struct StaticRouteEntry {
    string: String,
}

// == Route Table ==
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, Route)>,
    index: HashMap<String, usize>,
}

/// Strips one leading `/` so `/home` and `home` name the same route.
pub fn normalize_key(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    // == Builders ==
    /// Declares `key`. Redeclaring a key replaces its route in place.
    pub fn with_route(mut self, key: &str, route: Route) -> Self {
        self.insert(key, route);
        self
    }

    pub fn with_static(self, key: &str, text: impl Into<String>) -> Self {
        self.with_route(key, Route::Static { text: text.into() })
    }

    pub fn with_handler(self, key: &str, handler: Arc<dyn Handler>) -> Self {
        self.with_route(key, Route::Handler(HandlerRoute::new(handler)))
    }

    pub fn insert(&mut self, key: &str, route: Route) {
        let key = normalize_key(key).to_string();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = route,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, route));
            }
        }
    }

    /// Parses a routes file: a JSON object of `{ "key": { "string": "..." } }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let routes: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (key, value) in routes {
            let entry: StaticRouteEntry = serde_json::from_value(value)?;
            table.insert(&key, Route::Static { text: entry.string });
        }
        Ok(table)
    }

    /// Appends every route of `other`, keeping its order.
    pub fn merge(mut self, other: RouteTable) -> Self {
        for (key, route) in other.entries {
            self.insert(&key, route);
        }
        self
    }

    // == Lookup ==
    pub fn get(&self, key: &str) -> Option<&Route> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash_is_stripped() {
        let table = RouteTable::new().with_static("/home", "# home");
        assert!(table.contains("home"));
        assert!(!table.contains("/home"));
    }

    #[test]
    fn test_keys_keep_declaration_order() {
        let table = RouteTable::new()
            .with_static("zeta", "z")
            .with_static("alpha", "a")
            .with_static("mid", "m");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_redeclaring_replaces_in_place() {
        let table = RouteTable::new()
            .with_static("a", "one")
            .with_static("b", "two")
            .with_static("/a", "three");
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(table.get("a"), Some(Route::Static { text }) if text == "three"));
    }

    #[test]
    fn test_from_json_keeps_order() {
        let table = RouteTable::from_json(
            r##"{
                "test": { "string": "# hi, this is a test" },
                "more-please": { "string": "# hi, this works, too." },
                "/about": { "string": "about" }
            }"##,
        )
        .unwrap();
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec!["test", "more-please", "about"]
        );
        assert!(
            matches!(table.get("test"), Some(Route::Static { text }) if text == "# hi, this is a test")
        );
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        assert!(RouteTable::from_json(r#"{ "test": { "handler": 1 } }"#).is_err());
        assert!(RouteTable::from_json(r#"["test"]"#).is_err());
    }

    #[test]
    fn test_merge() {
        let table = RouteTable::new()
            .with_static("a", "1")
            .merge(RouteTable::new().with_static("b", "2").with_static("a", "3"));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(table.get("a"), Some(Route::Static { text }) if text == "3"));
    }
}
