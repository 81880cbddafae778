use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{connection::Outbound, error::JoinError};

/// A host and the clients that joined it by name.
#[derive(Debug)]
pub struct Room {
    host: Outbound,
    clients: RwLock<HashMap<String, Outbound>>,
}

impl Room {
    pub fn new(host: Outbound) -> Self {
        Room {
            host,
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &Outbound {
        &self.host
    }

    /// Returns a handle to the named client. The lock is released before the
    /// caller sends anything.
    pub async fn client(&self, name: &str) -> Option<Outbound> {
        self.clients.read().await.get(name).cloned()
    }

    /// Adds a client unless the name is already in use. Check and insert
    /// happen under one write lock.
    pub async fn join(&self, name: &str, outbound: Outbound) -> Result<(), JoinError> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(name) {
            return Err(JoinError::NameTaken(name.to_string()));
        }
        clients.insert(name.to_string(), outbound);
        Ok(())
    }

    pub async fn remove(&self, name: &str) -> Option<Outbound> {
        self.clients.write().await.remove(name)
    }

    /// Removes `name` only while it still points at `outbound`.
    pub async fn remove_if_same(&self, name: &str, outbound: &Outbound) -> bool {
        let mut clients = self.clients.write().await;
        match clients.get(name) {
            Some(existing) if existing.same_channel(outbound) => {
                clients.remove(name);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub async fn contains(&self, name: &str) -> bool {
        self.clients.read().await.contains_key(name)
    }
}

/// Process-wide room name to [`Room`] mapping.
#[derive(Clone, Default, Debug)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Arc<Room>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `room` under `name`, returning whatever was there before.
    /// The previous room's clients are neither moved nor notified.
    pub async fn register(&self, name: impl Into<String>, room: Arc<Room>) -> Option<Arc<Room>> {
        self.rooms.write().await.insert(name.into(), room)
    }

    /// Moves `room` from `previous` to `name` under one write lock, so the
    /// new name is never observed missing.
    pub async fn rename(
        &self,
        previous: Option<&str>,
        name: impl Into<String>,
        room: Arc<Room>,
    ) -> Option<Arc<Room>> {
        let mut rooms = self.rooms.write().await;
        if let Some(previous) = previous {
            rooms.remove(previous);
        }
        rooms.insert(name.into(), room)
    }

    pub async fn unregister(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.write().await.remove(name)
    }

    /// Removes `name` only while it still maps to `room`.
    pub async fn unregister_if_same(&self, name: &str, room: &Arc<Room>) -> bool {
        let mut rooms = self.rooms.write().await;
        match rooms.get(name) {
            Some(existing) if Arc::ptr_eq(existing, room) => {
                rooms.remove(name);
                true
            }
            _ => false,
        }
    }

    pub async fn lookup(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.read().await.get(name).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}
