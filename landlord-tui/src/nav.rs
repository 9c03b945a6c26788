//! Navigation: the two views and the route that addresses them.

use landlord_core::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Listing,
    Detail,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Listing => "Landlords",
            View::Detail => "Landlord",
        }
    }
}

/// Addressable location in the app.
///
/// Rendered as `/?page=<n>` or `/landlord/<id>?page=<n>`, where `n` is the
/// one-based listing page to return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Route {
    Listing { page_index: usize },
    Detail { landlord_id: RecordId, page_index: usize },
}

impl Route {
    pub fn page_index(&self) -> usize {
        match self {
            Route::Listing { page_index } | Route::Detail { page_index, .. } => *page_index,
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::Listing { page_index: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteParseError {
    #[error("Unknown route path: {0}")]
    UnknownPath(String),
    #[error("Invalid landlord id: {0}")]
    InvalidId(String),
    #[error("Invalid page number: {0}")]
    InvalidPage(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Listing { page_index } => write!(f, "/?page={}", page_index + 1),
            Route::Detail {
                landlord_id,
                page_index,
            } => write!(f, "/landlord/{}?page={}", landlord_id, page_index + 1),
        }
    }
}

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };

        let page_index = match query.and_then(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "page")
                .map(|(_, value)| value)
        }) {
            Some(value) => match value.parse::<usize>() {
                Ok(number) if number >= 1 => number - 1,
                _ => return Err(RouteParseError::InvalidPage(value.to_string())),
            },
            None => 0,
        };

        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Ok(Route::Listing { page_index });
        }
        match path.strip_prefix("/landlord/") {
            Some(id) => {
                let landlord_id = id
                    .parse::<RecordId>()
                    .map_err(|_| RouteParseError::InvalidId(id.to_string()))?;
                Ok(Route::Detail {
                    landlord_id,
                    page_index,
                })
            }
            None => Err(RouteParseError::UnknownPath(path.to_string())),
        }
    }
}

impl TryFrom<String> for Route {
    type Error = RouteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.to_string()
    }
}
