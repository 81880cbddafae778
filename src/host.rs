use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use crate::{
    app_state::AppState,
    connection::{self, Ending, Frame, Outbound},
    error::Result,
    message::HostCommand,
    room::{Room, RoomRegistry},
};

/// One host connection and the room it owns.
pub struct HostSession {
    room: Arc<Room>,
    room_name: Option<String>,
}

impl HostSession {
    /// The room exists from the start but is only reachable once the host
    /// names it.
    pub fn new(outbound: Outbound) -> Self {
        Self {
            room: Arc::new(Room::new(outbound)),
            room_name: None,
        }
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    pub fn room_name(&self) -> Option<&str> {
        self.room_name.as_deref()
    }

    /// Applies one text message: register the room, then forward to the
    /// named client, then remove a client.
    pub async fn apply(&mut self, text: &str, registry: &RoomRegistry) -> Result<()> {
        let command = HostCommand::parse(text)?;

        if let Some(room_name) = command.room {
            let previous = self.room_name.as_deref();
            registry
                .rename(previous, room_name.clone(), self.room.clone())
                .await;
            debug!(room = %room_name, "room registered");
            self.room_name = Some(room_name);
        }

        if let Some(name) = command.name {
            if let Some(client) = self.room.client(&name).await {
                client.send(text)?;
            }
        }

        if let Some(name) = command.remove {
            self.room.remove(&name).await;
        }

        Ok(())
    }

    pub async fn run<S>(&mut self, inbound: &mut S, registry: &RoomRegistry) -> Result<()>
    where
        S: Stream<Item = Result<Frame>> + Unpin,
    {
        while let Some(frame) = inbound.next().await {
            match frame? {
                Frame::Text(text) => self.apply(&text, registry).await?,
                Frame::Close => break,
                Frame::Binary(_) | Frame::Control => {}
            }
        }
        Ok(())
    }

    /// Drops the registry entry for this session's room, unless another
    /// host has taken the name since.
    pub async fn release(&self, registry: &RoomRegistry) {
        if let Some(name) = &self.room_name {
            if registry.unregister_if_same(name, &self.room).await {
                debug!(room = %name, "room released");
            }
        }
    }
}

pub async fn handle<S>(mut inbound: S, outbound: Outbound, state: AppState) -> Ending
where
    S: Stream<Item = Result<Frame>> + Unpin,
{
    info!("host connected!");

    let mut session = HostSession::new(outbound.clone());
    let result = session.run(&mut inbound, &state.registry).await;

    if state.cleanup_on_close {
        session.release(&state.registry).await;
    }

    connection::conclude(result, &outbound)
}
