//! Outbound link backed by a channel to the socket writer task.

use board::session::{Link, SendError};
use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

pub struct ChannelLink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelLink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Link for ChannelLink {
    fn send(&mut self, text: &str) -> Result<(), SendError> {
        self.tx.send(text.to_owned()).map_err(|_| SendError::Closed)
    }
}

/// Forward queued messages to the socket until the link side is dropped.
pub async fn forward_outbound<S>(mut rx: mpsc::UnboundedReceiver<String>, mut sink: S)
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(text) = rx.recv().await {
        tracing::debug!(%text, "sending");
        if let Err(error) = sink.send(Message::text(text)).await {
            tracing::warn!(%error, "websocket write failed");
            return;
        }
    }
    if let Err(error) = sink.close().await {
        tracing::debug!(%error, "websocket close failed");
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use futures_channel::mpsc as fmpsc;

    use super::*;

    #[test]
    fn send_after_receiver_dropped_is_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut link = ChannelLink::new(tx);
        assert!(link.send("a").is_ok());
        drop(rx);
        assert!(matches!(link.send("b"), Err(SendError::Closed)));
    }

    #[tokio::test]
    async fn forwards_in_order_and_stops_when_link_drops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (sink, out) = fmpsc::unbounded::<Message>();
        let mut link = ChannelLink::new(tx);
        link.send("one").expect("send");
        link.send("two").expect("send");
        drop(link);

        forward_outbound(rx, sink).await;
        let sent: Vec<_> = out.collect().await;
        assert_eq!(sent, vec![Message::text("one".to_owned()), Message::text("two".to_owned())]);
    }
}
