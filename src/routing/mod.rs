//! Routing Module
//!
//! Maps a request path to a target format and a content source.

mod handler;
mod matcher;
mod table;
mod target;

#[cfg(test)]
mod property_tests;

pub use handler::{
    handler_fn, invoke, Handler, HandlerContext, HandlerError, HandlerResult, HtmlTransform,
    RouteOutput,
};
pub use matcher::{is_parametric, match_route, MatchResult};
pub use table::{normalize_key, HandlerRoute, Route, RouteTable};
pub use target::{
    resolve_request, ApiRoutes, BarePathRouteMap, MappedRoute, ResolvedRequest, RouteMap, Target,
};
