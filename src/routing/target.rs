//! Target derivation
//!
//! Splits a request path into the target format and the endpoint that
//! follows the `{namespace}/{target}` prefix, unless a route map claims the
//! path first.

use std::fmt;

use serde::Serialize;

// == Target ==
/// How resolved text is turned into a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Raw,
    Json,
    Html,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Raw, Target::Json, Target::Html];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Raw => "raw",
            Target::Json => "json",
            Target::Html => "html",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Api Routes ==
/// The three target prefixes under a namespace.
#[derive(Debug, Clone)]
pub struct ApiRoutes {
    namespace: String,
    prefixes: [(Target, String); 3],
}

impl ApiRoutes {
    pub fn new(namespace: &str) -> Self {
        let namespace = namespace.trim_end_matches('/').to_string();
        let prefixes = Target::ALL.map(|target| (target, format!("{}/{}", namespace, target)));
        Self {
            namespace,
            prefixes,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `{namespace}/{target}`
    pub fn prefix(&self, target: Target) -> &str {
        self.prefixes
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, prefix)| prefix.as_str())
            .unwrap_or_default()
    }

    /// Splits `path` into its target and the remainder after the prefix.
    ///
    /// The remainder keeps its leading `/`. A prefix only counts when it is
    /// followed by `/` or nothing, so `/ns/rawfoo` has no target.
    pub fn split<'p>(&self, path: &'p str) -> Option<(Target, &'p str)> {
        self.prefixes.iter().find_map(|(target, prefix)| {
            let rest = path.strip_prefix(prefix.as_str())?;
            (rest.is_empty() || rest.starts_with('/')).then_some((*target, rest))
        })
    }

    /// The target a path's prefix names, if any.
    pub fn target_of(&self, path: &str) -> Option<Target> {
        self.split(path).map(|(target, _)| target)
    }
}

// == Route Maps ==
/// A per-deployment override of target and endpoint derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRoute {
    pub route: Option<String>,
    pub target: Option<Target>,
}

pub trait RouteMap: Send + Sync {
    /// `None` leaves the path to namespace derivation.
    fn map(&self, path: &str) -> Option<MappedRoute>;
}

/// Serves every path outside the namespace root as html.
#[derive(Debug, Clone)]
pub struct BarePathRouteMap {
    root: String,
}

impl BarePathRouteMap {
    /// Uses the first segment of `namespace` as the root, `/mm` for `/mm/api/v1`.
    pub fn for_namespace(namespace: &str) -> Self {
        let first = namespace
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        Self {
            root: format!("/{}", first),
        }
    }
}

impl RouteMap for BarePathRouteMap {
    fn map(&self, path: &str) -> Option<MappedRoute> {
        if path.starts_with(&self.root) {
            return None;
        }
        Some(MappedRoute {
            route: Some(path.to_string()),
            target: Some(Target::Html),
        })
    }
}

// == Resolve Request ==
/// Endpoint and target of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Path after the prefix, leading `/` kept
    pub endpoint: String,
    pub target: Option<Target>,
}

/// Derives endpoint and target, giving the route map the first word.
///
/// Returns `None` when the path names no endpoint at all.
pub fn resolve_request(
    path: &str,
    api: &ApiRoutes,
    route_map: Option<&dyn RouteMap>,
) -> Option<ResolvedRequest> {
    if let Some(MappedRoute {
        route: Some(route),
        target,
    }) = route_map.and_then(|map| map.map(path))
    {
        return Some(ResolvedRequest {
            target: target.or_else(|| api.target_of(path)),
            endpoint: route,
        })
        .filter(|resolved| !is_blank(&resolved.endpoint));
    }

    let (target, endpoint) = api.split(path)?;
    (!is_blank(endpoint)).then(|| ResolvedRequest {
        endpoint: endpoint.to_string(),
        target: Some(target),
    })
}

fn is_blank(endpoint: &str) -> bool {
    endpoint.trim_start_matches('/').is_empty()
}
