//! WebSocket transport for `ws://` / `wss://` backends: each text message is one frame.

use futures_util::{future, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;
use url::Url;

use crate::error::TransportError;
use crate::sse::FrameStream;

// Connect and return the text frames; control and binary messages are skipped
pub async fn connect(url: &Url) -> Result<FrameStream, TransportError> {
    let (ws, resp) = connect_async(url.as_str()).await?;
    debug!(%url, status = %resp.status(), "websocket opened");

    let frames = ws
        .filter_map(|msg| {
            future::ready(match msg {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Close(_)) => Some(Err(TransportError::EndOfStream)),
                Ok(_) => None,
                Err(e) => Some(Err(TransportError::from(e))),
            })
        })
        .chain(futures_util::stream::once(future::ready(Err(
            TransportError::EndOfStream,
        ))));
    Ok(Box::pin(frames))
}
