use axum::{http::StatusCode, response::IntoResponse, routing, Json, Router};
use portfolio_di::{provider, Provide};
use portfolio_extern_contracts::contact::{
    ContactRelayApiService, ContactRelayError, ContactRelayResponse,
};
use portfolio_extern_impl::contact::{ContactRelayApiServiceConfig, ContactRelayApiServiceImpl};
use portfolio_models::contact::ContactDraft;
use portfolio_utils::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;
use url::Url;

#[tokio::test]
async fn ok() {
    // Arrange
    let sut = make_sut(spawn_relay().await);

    // Act
    let result = sut.send_message(make_draft("ok")).await;

    // Assert
    assert_eq!(
        result.unwrap(),
        ContactRelayResponse {
            message: "Email sent successfully".into(),
            id: "msg_123".to_owned().into(),
        }
    );
}

#[tokio::test]
async fn rejected() {
    // Arrange
    let sut = make_sut(spawn_relay().await);

    // Act
    let result = sut.send_message(make_draft("invalid")).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactRelayError::Rejected { status: 400, error }) if error == "Invalid email format"
    );
}

#[tokio::test]
async fn rejected_without_json_body() {
    // Arrange
    let sut = make_sut(spawn_relay().await);

    // Act
    let result = sut.send_message(make_draft("broken")).await;

    // Assert
    assert_matches!(result, Err(ContactRelayError::Rejected { status: 502, .. }));
}

#[tokio::test]
async fn unreachable() {
    // Arrange
    let sut = make_sut("http://127.0.0.1:1/api/send-email".parse().unwrap());

    // Act
    let result = sut.send_message(make_draft("ok")).await;

    // Assert
    assert_matches!(result, Err(ContactRelayError::Other(_)));
}

async fn relay(Json(draft): Json<ContactDraft>) -> axum::response::Response {
    match draft.name.as_str() {
        "ok" => Json(json!({
            "success": true,
            "message": "Email sent successfully",
            "id": "msg_123",
        }))
        .into_response(),
        "invalid" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid email format"})),
        )
            .into_response(),
        _ => (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response(),
    }
}

async fn spawn_relay() -> Url {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/api/send-email", routing::post(relay));
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{addr}/api/send-email").parse().unwrap()
}

fn make_draft(name: &str) -> ContactDraft {
    ContactDraft {
        name: name.into(),
        email: "jane@example.com".into(),
        message: "Hello".into(),
    }
}

fn make_sut(relay_url: Url) -> ContactRelayApiServiceImpl {
    provider! {
        Provider { contact_relay_api_service_config: ContactRelayApiServiceConfig, }
    }

    let mut provider = Provider {
        _cache: Default::default(),
        contact_relay_api_service_config: ContactRelayApiServiceConfig::new(relay_url),
    };

    provider.provide()
}
