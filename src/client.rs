use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use crate::{
    app_state::AppState,
    connection::{self, Ending, Frame, Outbound},
    error::{JoinError, RelayError, Result},
    message::{self, JoinRequest},
    room::{Room, RoomRegistry},
};

/// What a client is bound to once it has joined. The host handle is fixed
/// for the rest of the connection, even if the room is later replaced.
#[derive(Debug, Clone)]
pub struct ClientState {
    pub name: String,
    pub host: Outbound,
    room: Arc<Room>,
}

async fn resolve(
    text: &str,
    outbound: &Outbound,
    registry: &RoomRegistry,
) -> std::result::Result<ClientState, JoinError> {
    let request = JoinRequest::parse(text)?;

    let room = registry
        .lookup(&request.room)
        .await
        .ok_or_else(|| JoinError::RoomNotFound(request.room.clone()))?;

    room.join(&request.name, outbound.clone()).await?;

    Ok(ClientState {
        name: request.name,
        host: room.host().clone(),
        room,
    })
}

/// Reads join attempts until one succeeds. Every rejected attempt is
/// answered with `{"error": ...}` and the client may try again.
pub async fn negotiate<S>(
    inbound: &mut S,
    outbound: &Outbound,
    registry: &RoomRegistry,
) -> Result<ClientState>
where
    S: Stream<Item = Result<Frame>> + Unpin,
{
    while let Some(frame) = inbound.next().await {
        let attempt = match frame? {
            Frame::Text(text) => resolve(&text, outbound, registry).await,
            Frame::Binary(_) => Err(JoinError::NotAString),
            Frame::Control => continue,
            Frame::Close => break,
        };

        match attempt {
            Ok(client) => {
                info!(name = %client.name, "client joined");
                return Ok(client);
            }
            Err(err) => {
                debug!("join rejected: {err}");
                outbound.send(message::error_reply(&err))?;
            }
        }
    }

    Err(RelayError::ClosedBeforeJoin)
}

/// Forwards every text message to the host with the client's name set.
pub async fn relay<S>(inbound: &mut S, client: &ClientState) -> Result<()>
where
    S: Stream<Item = Result<Frame>> + Unpin,
{
    while let Some(frame) = inbound.next().await {
        match frame? {
            Frame::Text(text) => {
                debug!(%text, "client:ws:Text");
                client
                    .host
                    .send(message::tag_with_name(&text, &client.name)?)?;
            }
            Frame::Close => break,
            Frame::Binary(_) | Frame::Control => {}
        }
    }
    Ok(())
}

pub async fn handle<S>(mut inbound: S, outbound: Outbound, state: AppState) -> Ending
where
    S: Stream<Item = Result<Frame>> + Unpin,
{
    info!("client connected!");

    let result = match negotiate(&mut inbound, &outbound, &state.registry).await {
        Ok(client) => {
            let result = relay(&mut inbound, &client).await;
            if state.cleanup_on_close
                && client.room.remove_if_same(&client.name, &outbound).await
            {
                debug!(name = %client.name, "client released");
            }
            result
        }
        Err(err) => Err(err),
    };

    connection::conclude(result, &outbound)
}
