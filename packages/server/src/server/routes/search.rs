//! Provider search endpoints.

use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::pagination::PaginationArgs;
use crate::common::ApiError;
use crate::domains::providers::{MatchQuery, Provider, ProviderMatcher};
use crate::server::app::AxumAppState;
use crate::server::extract::ApiJson;

/// Default page size for the search endpoints.
const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub service_types: Option<Vec<String>>,
    pub service_area_pincodes: Option<Vec<String>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub users: Vec<Provider>,
    pub has_more: bool,
    pub total_count: usize,
}

/// POST /search
///
/// Find visible providers matching any requested category and any
/// truncation of any requested location, paid listings first.
pub async fn search_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (Some(service_types), Some(service_area_pincodes)) =
        (body.service_types, body.service_area_pincodes)
    else {
        return Err(ApiError::validation(
            "Both serviceTypes and serviceAreaPincodes are required.",
        ));
    };

    let page = PaginationArgs {
        offset: body.offset,
        limit: body.limit,
    }
    .validate(DEFAULT_SEARCH_LIMIT)
    .map_err(ApiError::validation)?;

    let matcher = ProviderMatcher::new(state.deps.providers.clone());
    let result = matcher
        .search(&MatchQuery {
            service_types,
            service_area_pincodes,
            page,
        })
        .await?;

    Ok(Json(SearchResponse {
        users: result.providers,
        has_more: result.has_more,
        total_count: result.total_count,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAllRequest {
    pub service_types: Option<Vec<String>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct SearchAllResponse {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub users: Vec<Provider>,
}

/// POST /search-all
///
/// Category-only variant: no location filter, same tiering and paging.
pub async fn search_all_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<SearchAllRequest>,
) -> Result<Json<SearchAllResponse>, ApiError> {
    let Some(service_types) = body.service_types else {
        return Err(ApiError::validation(
            "serviceTypes must be a non-empty array.",
        ));
    };

    let page = PaginationArgs {
        offset: body.offset,
        limit: body.limit,
    }
    .validate(DEFAULT_SEARCH_LIMIT)
    .map_err(ApiError::validation)?;

    let matcher = ProviderMatcher::new(state.deps.providers.clone());
    let result = matcher.search_all(&service_types, page).await?;

    Ok(Json(SearchAllResponse {
        total: result.total_count,
        offset: page.offset,
        limit: page.limit,
        users: result.providers,
    }))
}
