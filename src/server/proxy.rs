//! Feature forms proxied to the external service

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};

use super::{form, render, AppState};
use crate::error::{Result, WikiError};
use crate::service::Feature;
use crate::templates::ResultData;

/// Render the feature form; on POST, forward the fields and show the result
pub async fn feature(state: &AppState, feature: Feature, request: Request<Body>) -> Result<Response> {
    if request.method() != Method::POST {
        return render(state, feature.template(), &ResultData::default());
    }

    let form = form::read(request).await?;

    if let Some((field, label)) = feature.required_field() {
        let value = form.value(field);
        if value.is_empty() {
            tracing::warn!("{} are empty!", label);
            return Err(WikiError::EmptyField(label));
        }
        tracing::info!("Received {}: {}", field, value);
    }

    let payload = feature.payload(&form.fields);
    let result = state.service.call(feature, &payload).await?;

    render(state, feature.template(), &ResultData { result })
}
