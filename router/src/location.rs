//! Committed navigation targets.

use crate::route::RouteMatch;
use std::collections::BTreeMap;

/// Split `target` into its path and query string.
#[must_use]
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// `login_route` carrying `full_path` as its `redirect` query value.
///
/// Slashes stay unescaped so the value reads as a path.
#[must_use]
pub fn login_redirect(login_route: &str, full_path: &str) -> String {
    let encoded = urlencoding::encode(full_path).replace("%2F", "/");
    format!("{login_route}?redirect={encoded}")
}

/// Where the navigator is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path without the query string
    pub path: String,
    /// Raw query string, without `?`
    pub query: Option<String>,
    /// Name of the matched route
    pub route: &'static str,
    /// Captured route parameters
    pub params: BTreeMap<String, String>,
}

impl Location {
    pub(crate) fn new(path: &str, query: Option<&str>, matched: RouteMatch) -> Self {
        Self {
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            route: matched.route.name,
            params: matched.params,
        }
    }

    /// Path plus query string, as navigated to.
    #[must_use]
    pub fn full_path(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{query}", self.path),
            None => self.path.clone(),
        }
    }

    /// Decoded value of query parameter `key`. `+` reads as a space.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (name == key).then(|| {
                let value = value.replace('+', " ");
                urlencoding::decode(&value)
                    .map_or_else(|_| value.clone(), |decoded| decoded.into_owned())
            })
        })
    }

    /// A captured route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
