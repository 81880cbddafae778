use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    client,
    connection::{self, Ending},
    error::Result,
    host,
};

/// Paths starting with this prefix connect as a host.
pub const HOST_PREFIX: &str = "/host";

pub const FALLBACK_PAGE: &str =
    r#"<html><head><meta charset="utf-8"></head><body>????</body></html>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Client,
}

impl Role {
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(HOST_PREFIX) {
            Role::Host
        } else {
            Role::Client
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Client => "client",
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn wants_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("websocket"))
}

async fn dispatch(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    ws: std::result::Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => {
            let role = Role::from_path(uri.path());
            ws.on_failed_upgrade(|err| error!("failed to accept websocket: {err}"))
                .on_upgrade(move |socket| serve_socket(socket, role, state))
        }
        Err(rejection) if wants_upgrade(&headers) => {
            error!("failed to accept websocket: {rejection}");
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(_) => Html(FALLBACK_PAGE).into_response(),
    }
}

async fn serve_socket(socket: WebSocket, role: Role, state: AppState) {
    let span = info_span!("connection", id = %Uuid::new_v4(), role = role.as_str());

    async move {
        let (inbound, outbound, writer) = connection::split(socket);

        let ending = match role {
            Role::Host => host::handle(inbound, outbound, state).await,
            Role::Client => client::handle(inbound, outbound, state).await,
        };

        match ending {
            Ending::Closing => {
                if let Err(err) = writer.await {
                    error!("writer task failed: {err}");
                }
            }
            Ending::Finished => writer.abort(),
        }
    }
    .instrument(span)
    .await
}
