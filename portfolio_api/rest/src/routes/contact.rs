use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_models::contact::{ContactMessage, ContactMessageValidationError};
use tracing::debug;

use crate::{
    errors::{error, FAILED_TO_SEND_EMAIL, INVALID_REQUEST_BODY},
    models::contact::{ApiContactMessage, ApiContactReceipt},
};

pub const PATH: &str = "/api/send-email";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(PATH, routing::post(send_message))
        .with_state(service)
}

/// The body is parsed as JSON regardless of its content type, so that plain
/// `fetch` calls sending `text/plain` are accepted as well.
async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    body: Bytes,
) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(err) => {
            debug!("Rejected contact request body: {err}");
            return error(StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY);
        }
    };

    let message = match ContactMessage::new(body.name, body.email, body.message) {
        Ok(message) => message,
        Err(err) => return validation_error(err),
    };

    match service.send_message(message).await {
        Ok(receipt) => Json(ApiContactReceipt::from(receipt)).into_response(),
        Err(ContactSendMessageError::Send) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SEND_EMAIL)
        }
        Err(ContactSendMessageError::Other(err)) => {
            tracing::error!("Failed to send contact message: {err:#}");
            error(StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SEND_EMAIL)
        }
    }
}

/// Only JSON objects are accepted, serde would also take a positional array.
fn parse_body(body: &[u8]) -> serde_json::Result<ApiContactMessage> {
    match serde_json::from_slice(body)? {
        value @ serde_json::Value::Object(_) => serde_json::from_value(value),
        _ => Err(serde::de::Error::custom("expected a JSON object")),
    }
}

fn validation_error(err: ContactMessageValidationError) -> Response {
    let detail = match err {
        ContactMessageValidationError::MissingField => "All fields are required",
        ContactMessageValidationError::InvalidEmail => "Invalid email format",
    };
    error(StatusCode::BAD_REQUEST, detail)
}
