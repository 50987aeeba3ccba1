//! Path Matcher
//!
//! Resolves an endpoint against the route table.
//!
//! Parameters bind by position, not by name: a declared key like
//! `user/:id/:tab` is selected by its first segment alone, then each `:name`
//! takes the endpoint segment at the same index. Among parametric routes
//! sharing a first segment the earliest declared wins.

use std::collections::HashMap;

use crate::routing::RouteTable;

const PARAM_PREFIX: char = ':';

// == Match Result ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Declared key to look up, None when no route matched
    pub route_key: Option<String>,
    pub params: HashMap<String, String>,
}

impl MatchResult {
    fn exact(key: &str) -> Self {
        Self {
            route_key: Some(key.to_string()),
            params: HashMap::new(),
        }
    }

    fn none() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.route_key.is_some()
    }
}

/// True if any segment after the first is a `:name` parameter.
pub fn is_parametric(key: &str) -> bool {
    key.split('/')
        .skip(1)
        .any(|segment| segment.starts_with(PARAM_PREFIX))
}

// == Match Route ==
/// Matches `endpoint` (one leading `/` ignored) against `table`.
///
/// An exact literal key always wins over a parametric one.
pub fn match_route(table: &RouteTable, endpoint: &str) -> MatchResult {
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);

    if table.contains(endpoint) {
        return MatchResult::exact(endpoint);
    }

    let segments: Vec<&str> = endpoint.split('/').collect();
    let first = segments[0];

    let Some(declared) = table
        .keys()
        .find(|key| is_parametric(key) && key.split('/').next() == Some(first))
    else {
        return MatchResult::none();
    };

    bind(declared, &segments)
        .filter(|(key, _)| table.contains(key))
        .map(|(key, params)| MatchResult {
            route_key: Some(key),
            params,
        })
        .unwrap_or_else(MatchResult::none)
}

/// Binds each `:name` of `declared` to the endpoint segment at its index and
/// rebuilds the key from the declared segments. Fails when the endpoint is
/// too short to supply a parameter.
fn bind(declared: &str, segments: &[&str]) -> Option<(String, HashMap<String, String>)> {
    let mut params = HashMap::new();
    let mut rebuilt = Vec::new();

    for (index, segment) in declared.split('/').enumerate() {
        match segment.strip_prefix(PARAM_PREFIX) {
            Some(name) if index > 0 => {
                let value = segments.get(index).filter(|value| !value.is_empty())?;
                params.insert(name.to_string(), value.to_string());
                rebuilt.push(format!("{}{}", PARAM_PREFIX, name));
            }
            _ => rebuilt.push(segment.to_string()),
        }
    }

    Some((rebuilt.join("/"), params))
}
