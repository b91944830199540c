//! Request parameter parsing for the posts endpoints.

use actix_web::web;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, PostId};

pub(crate) const DEFAULT_PAGE: u32 = 1;
pub(crate) const DEFAULT_LIMIT: u32 = 10;

/// Raw list query. Values are kept as text so bad input falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<String>,
    /// Page size. Defaults to 10.
    pub limit: Option<String>,
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}

impl ListQuery {
    /// Parse a raw query string. Undecodable strings yield the defaults.
    pub(crate) fn from_query_string(query: &str) -> Self {
        web::Query::<Self>::from_query(query)
            .map(web::Query::into_inner)
            .unwrap_or_default()
    }

    pub(crate) fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub(crate) fn limit(&self) -> u32 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

pub(crate) fn parse_post_id(raw: String) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}
