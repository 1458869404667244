//! Inbound side of the socket as a stream of decoded board updates.

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;

use std::fmt::Display;

use futures_util::{Stream, StreamExt, future};
use tokio_tungstenite::tungstenite::Message;
use wire::BoardUpdate;

/// Adapt raw socket messages into board updates.
///
/// The stream ends at the first close frame or transport error. Frames that
/// are not board updates, or fail to decode, are logged and skipped.
pub fn inbound_stream<S, E>(source: S) -> impl Stream<Item = BoardUpdate>
where
    S: Stream<Item = Result<Message, E>>,
    E: Display,
{
    source
        .take_while(|message| {
            let open = match message {
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "server closed the connection");
                    false
                }
                Err(error) => {
                    tracing::warn!(%error, "websocket read failed");
                    false
                }
                Ok(_) => true,
            };
            future::ready(open)
        })
        .filter_map(|message| future::ready(message.ok().and_then(decode)))
}

fn decode(message: Message) -> Option<BoardUpdate> {
    let text = match &message {
        Message::Text(text) => text.as_str(),
        Message::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "dropping non-utf8 binary frame");
                return None;
            }
        },
        _ => return None,
    };
    match wire::decode_inbound(text) {
        Ok(Some(update)) => Some(update),
        Ok(None) => {
            tracing::debug!("ignoring non-update message");
            None
        }
        Err(error) => {
            tracing::warn!(%error, "dropping inbound message");
            None
        }
    }
}
