//! MCP over HTTP server-sent events.
//!
//! - `GET /sse` opens a session. The first event is `endpoint`, carrying the
//!   URL the client must POST its messages to.
//! - `POST /messages?session_id=<id>` accepts one JSON-RPC message (202). The
//!   response arrives later as a `message` event on that session's stream.
//! - `GET /healthz` answers `ok`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::Router;
use findata_tools::McpHandler;
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SESSION_BUFFER: usize = 64;
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

type Sessions = Arc<RwLock<HashMap<Uuid, tokio::sync::mpsc::Sender<String>>>>;

#[derive(Clone)]
pub struct SseState {
    handler: McpHandler,
    sessions: Sessions,
}

impl SseState {
    pub fn new(handler: McpHandler) -> Self {
        Self {
            handler,
            sessions: Arc::default(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .map(|sessions| sessions.len())
            .unwrap_or_default()
    }
}

/// Removes its session from the map when the event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(&self.id);
        }
        debug!("SSE session {} closed", self.id);
    }
}

#[derive(Debug, Deserialize)]
struct MessageParams {
    session_id: Uuid,
}

pub fn app_router(state: SseState) -> Router {
    Router::new()
        .route("/sse", get(open_stream))
        .route("/messages", post(post_message))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve_sse(handler: McpHandler, host: &str, port: u16) -> anyhow::Result<()> {
    let router = app_router(SseState::new(handler));
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Serving MCP over SSE on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn healthz() -> &'static str {
    "ok"
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = tokio::sync::mpsc::channel(SESSION_BUFFER);
    if let Ok(mut sessions) = state.sessions.write() {
        sessions.insert(id, tx);
    }
    debug!("SSE session {} opened", id);

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };
    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={}", id));
    let messages = ReceiverStream::new(rx).map(move |message| {
        let _ = &guard;
        Ok(Event::default().event("message").data(message))
    });

    Sse::new(stream::once(async move { Ok(endpoint) }).chain(messages)).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

async fn post_message(
    State(state): State<SseState>,
    Query(params): Query<MessageParams>,
    body: String,
) -> StatusCode {
    let sender = state
        .sessions
        .read()
        .ok()
        .and_then(|sessions| sessions.get(&params.session_id).cloned());
    let Some(sender) = sender else {
        return StatusCode::NOT_FOUND;
    };

    let handler = state.handler.clone();
    tokio::spawn(async move {
        if let Some(response) = handler.handle_message(&body).await {
            if sender.send(response).await.is_err() {
                debug!("SSE session {} closed before response", params.session_id);
            }
        }
    });
    StatusCode::ACCEPTED
}
