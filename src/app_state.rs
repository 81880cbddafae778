use crate::room::RoomRegistry;

/// Shared state handed to every connection.
#[derive(Clone, Default, Debug)]
pub struct AppState {
    pub registry: RoomRegistry,
    /// Drop a session's own registry entries when its connection ends.
    pub cleanup_on_close: bool,
}

impl AppState {
    pub fn new(cleanup_on_close: bool) -> Self {
        Self {
            registry: RoomRegistry::new(),
            cleanup_on_close,
        }
    }
}
