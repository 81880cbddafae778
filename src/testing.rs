//! In-memory connections for driving sessions in tests.

use std::pin::Pin;

use futures_util::{stream, Stream};
use tokio::sync::mpsc;

use crate::{
    connection::{Frame, Outbound, Outgoing},
    error::Result,
};

pub type Inbound = Pin<Box<dyn Stream<Item = Result<Frame>> + Send>>;

/// The far side of a fake connection.
pub struct Peer {
    pub frames: mpsc::UnboundedSender<Result<Frame>>,
    pub received: mpsc::UnboundedReceiver<Outgoing>,
}

impl Peer {
    pub fn text(&self, text: &str) {
        self.frames.send(Ok(Frame::Text(text.to_string()))).unwrap();
    }

    pub fn binary(&self, data: &[u8]) {
        self.frames.send(Ok(Frame::Binary(data.to_vec()))).unwrap();
    }

    pub fn close(&self) {
        self.frames.send(Ok(Frame::Close)).unwrap();
    }

    pub async fn next(&mut self) -> Option<Outgoing> {
        self.received.recv().await
    }

    pub async fn next_text(&mut self) -> String {
        match self.next().await {
            Some(Outgoing::Text(text)) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    pub fn nothing_pending(&mut self) -> bool {
        self.received.try_recv().is_err()
    }
}

pub fn connection() -> (Peer, Inbound, Outbound) {
    let (frames, rx) = mpsc::unbounded_channel();
    let inbound = stream::unfold(rx, |mut rx| async move {
        let frame = rx.recv().await?;
        Some((frame, rx))
    });
    let inbound: Inbound = Box::pin(inbound);
    let (outbound, received) = Outbound::channel();

    (Peer { frames, received }, inbound, outbound)
}
