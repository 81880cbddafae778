use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::error;

use crate::error::{RelayError, Result};

/// An inbound frame as the sessions see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Ping or pong. The transport answers pings on its own.
    Control,
    Close,
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Frame::Text(text),
            Message::Binary(data) => Frame::Binary(data),
            Message::Ping(_) | Message::Pong(_) => Frame::Control,
            Message::Close(_) => Frame::Close,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text(String),
    Close(u16),
}

/// Write half of a connection. Cloned into rooms so other sessions can
/// reach the peer.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl Outbound {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, text: impl Into<String>) -> Result<()> {
        self.tx
            .send(Outgoing::Text(text.into()))
            .map_err(|_| RelayError::PeerGone)
    }

    /// Queues a normal-closure close frame.
    pub fn close(&self) -> Result<()> {
        self.tx
            .send(Outgoing::Close(close_code::NORMAL))
            .map_err(|_| RelayError::PeerGone)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn same_channel(&self, other: &Outbound) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

/// How a session ended, which decides what happens to the writer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The inbound side ran out; nothing is left to flush.
    Finished,
    /// A close frame was queued and the writer should be allowed to send it.
    Closing,
}

/// Failure path shared by both session kinds: log, then close the
/// connection if it is still open.
pub fn conclude(result: Result<()>, outbound: &Outbound) -> Ending {
    let Err(err) = result else {
        return Ending::Finished;
    };

    error!("failed to receive frame: {err}");

    if outbound.is_closed() {
        return Ending::Finished;
    }

    match outbound.close() {
        Ok(()) => Ending::Closing,
        Err(err) => {
            error!("failed to close connection: {err}");
            Ending::Finished
        }
    }
}

fn frame_from_socket(message: std::result::Result<Message, axum::Error>) -> Result<Frame> {
    Ok(Frame::from(message?))
}

/// Splits an upgraded socket into an inbound frame stream, an [`Outbound`]
/// handle, and the task that drains the handle into the socket.
pub fn split(
    socket: WebSocket,
) -> (
    impl Stream<Item = Result<Frame>> + Unpin + Send,
    Outbound,
    JoinHandle<()>,
) {
    let (mut sender, receiver) = socket.split();
    let (outbound, mut rx) = Outbound::channel();

    let writer = tokio::spawn(async move {
        while let Some(outgoing) = rx.recv().await {
            match outgoing {
                Outgoing::Text(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Outgoing::Close(code) => {
                    let frame = CloseFrame {
                        code,
                        reason: "".into(),
                    };
                    if let Err(err) = sender.send(Message::Close(Some(frame))).await {
                        error!("failed to send close frame: {err}");
                    }
                    break;
                }
            }
        }
    });

    let inbound = receiver.map(frame_from_socket);

    (inbound, outbound, writer)
}
