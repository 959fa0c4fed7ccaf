//! Profile-field updates that feed the matcher (service area, visibility).

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::providers::Provider;
use crate::kernel::ProviderChanges;
use crate::server::app::AxumAppState;
use crate::server::extract::ApiJson;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePincodesRequest {
    pub personal_email: Option<String>,
    pub service_area_pincodes: Option<Vec<String>>,
}

/// PUT /update/pincodes
///
/// Replace a provider's service-area location tags.
pub async fn update_pincodes_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<UpdatePincodesRequest>,
) -> Result<Json<Provider>, ApiError> {
    let (Some(email), Some(pincodes)) = (body.personal_email, body.service_area_pincodes) else {
        return Err(ApiError::validation(
            "personalEmail and serviceAreaPincodes must be provided and serviceAreaPincodes must be an array.",
        ));
    };

    apply_changes(
        &state,
        &email,
        ProviderChanges {
            service_area_pincodes: Some(pincodes),
            ..Default::default()
        },
    )
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisibilityRequest {
    pub personal_email: Option<String>,
    pub visible: Option<bool>,
}

/// PUT /update/visibility
///
/// Toggle whether the provider participates in matching.
pub async fn update_visibility_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<UpdateVisibilityRequest>,
) -> Result<Json<Provider>, ApiError> {
    let (Some(email), Some(visible)) = (body.personal_email, body.visible) else {
        return Err(ApiError::validation(
            "personalEmail and visible (true or false) must be provided.",
        ));
    };

    apply_changes(
        &state,
        &email,
        ProviderChanges {
            visible: Some(visible),
            ..Default::default()
        },
    )
    .await
}

async fn apply_changes(
    state: &AxumAppState,
    email: &str,
    changes: ProviderChanges,
) -> Result<Json<Provider>, ApiError> {
    let provider = state
        .deps
        .providers
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("Provider not found"))?;

    let updated = state
        .deps
        .providers
        .update_fields(provider.unique_id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Provider not found"))?;

    Ok(Json(updated))
}
