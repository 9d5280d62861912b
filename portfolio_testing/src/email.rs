//! A fake transactional email provider implementing the subset of the Resend
//! api used by the contact relay.
//!
//! Accepted emails are not delivered anywhere but recorded in memory and can be
//! listed via `GET /_testing/emails`.

use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use url::Url;
use uuid::Uuid;

pub const SEND_ROUTE: &str = "/emails";
pub const LIST_ROUTE: &str = "/_testing/emails";

/// Emails addressed to this domain are refused with `422 Unprocessable Entity`.
pub const REJECTED_DOMAIN: &str = "rejected.example.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone)]
struct AppState {
    api_key: Arc<str>,
    outbox: Arc<Mutex<Vec<SentEmail>>>,
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting email provider testing server on {host}:{port}");
    info!("Api url: http://{host}:{port}/");
    info!("Api key: {api_key:?}");
    info!("Emails to @{REJECTED_DOMAIN} will be rejected");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(api_key.into(), Default::default()))
        .await
        .context("Failed to start HTTP server")
}

/// An in-process instance of the testing server listening on a random port.
#[derive(Debug)]
pub struct TestingEmailServer {
    url: Url,
    outbox: Arc<Mutex<Vec<SentEmail>>>,
}

impl TestingEmailServer {
    pub async fn spawn(api_key: &str) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("Failed to bind testing server")?;
        let addr = listener.local_addr()?;
        let url = format!("http://{addr}/").parse()?;

        let outbox = Arc::<Mutex<Vec<SentEmail>>>::default();
        let router = router(api_key.into(), Arc::clone(&outbox));
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self { url, outbox })
    }

    /// Base url of the fake provider's api.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.outbox.lock().await.clone()
    }
}

fn router(api_key: Arc<str>, outbox: Arc<Mutex<Vec<SentEmail>>>) -> Router {
    Router::new()
        .route("/", routing::get(index))
        .route(SEND_ROUTE, routing::post(send))
        .route(LIST_ROUTE, routing::get(list))
        .with_state(AppState { api_key, outbox })
}

#[derive(Serialize)]
struct IndexResponse {
    name: &'static str,
}

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "portfolio_testing",
    })
}

#[derive(Deserialize)]
struct SendRequest {
    from: String,
    to: OneOrMany,
    subject: String,
    html: Option<String>,
    text: Option<String>,
    reply_to: Option<OneOrMany>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(x) => vec![x],
            OneOrMany::Many(x) => x,
        }
    }
}

#[derive(Serialize)]
struct SendResponse {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status_code: u16,
    name: &'static str,
    message: &'static str,
}

fn error(status: StatusCode, name: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(ErrorResponse {
            status_code: status.as_u16(),
            name,
            message,
        }),
    )
        .into_response()
}

async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SendRequest>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix("Bearer "))
        .is_some_and(|x| x == &*state.api_key);
    if !authorized {
        return error(
            StatusCode::UNAUTHORIZED,
            "validation_error",
            "API key is invalid",
        );
    }

    let to = Vec::from(request.to);
    if to.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field.",
        );
    }

    if to
        .iter()
        .any(|x| x.trim_end_matches('>').ends_with(&format!("@{REJECTED_DOMAIN}")))
    {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "The recipient domain is not allowed.",
        );
    }

    let email = SentEmail {
        id: Uuid::now_v7().to_string(),
        from: request.from,
        to,
        subject: request.subject,
        html: request.html,
        text: request.text,
        reply_to: request
            .reply_to
            .and_then(|x| Vec::from(x).into_iter().next()),
    };
    let id = email.id.clone();

    info!(%id, to = ?email.to, subject = %email.subject, "Accepted email");
    state.outbox.lock().await.push(email);

    Json(SendResponse { id }).into_response()
}

async fn list(State(state): State<AppState>) -> Json<Vec<SentEmail>> {
    Json(state.outbox.lock().await.clone())
}
