pub mod app_state;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod host;
pub mod message;
pub mod room;
pub mod server;

#[cfg(test)]
mod testing;
