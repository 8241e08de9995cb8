//! Server-Sent Events transport: an HTTP GET kept open, split into `data:` frames.

use std::pin::Pin;

use futures_util::{stream, Stream, StreamExt};
use reqwest::{header, Client};
use tracing::debug;
use url::Url;

use crate::error::TransportError;

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// Longest unterminated line or event the parser will buffer.
pub const MAX_EVENT_BYTES: usize = 1024 * 1024;

/// Incremental `text/event-stream` parser.
///
/// Feed it raw body chunks in any split; it yields the data of each complete
/// event. Multiple `data:` lines in one event are joined with `\n`. Comments,
/// `event:`, `id:` and `retry:` fields are ignored. A line or event longer
/// than [`MAX_EVENT_BYTES`] fails the stream instead of growing the buffer.
#[derive(Debug, Default)]
pub struct SseParser {
    pending: Vec<u8>,
    data: String,
    has_data: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, TransportError> {
        self.pending.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some(nl) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=nl).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(frame) = self.line(&String::from_utf8_lossy(&line)) {
                out.push(frame);
            }
        }
        if self.pending.len() > MAX_EVENT_BYTES || self.data.len() > MAX_EVENT_BYTES {
            return Err(TransportError::Read(format!(
                "event exceeds {MAX_EVENT_BYTES} bytes"
            )));
        }
        Ok(out)
    }

    fn line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            // blank line dispatches the event
            if !self.has_data {
                return None;
            }
            self.has_data = false;
            return Some(std::mem::take(&mut self.data));
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        if field == "data" {
            if self.has_data {
                self.data.push('\n');
            }
            self.data.push_str(value);
            self.has_data = true;
        }
        None
    }
}

/// Issue the GET and return the body as a stream of frames.
pub async fn connect(client: &Client, url: &Url) -> Result<FrameStream, TransportError> {
    let resp = client
        .get(url.clone())
        .header(header::ACCEPT, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .send()
        .await?
        .error_for_status()?;
    debug!(%url, status = %resp.status(), "event stream opened");

    let body = Box::pin(resp.bytes_stream());
    let frames = stream::unfold(
        (body, SseParser::new(), Vec::<String>::new().into_iter(), false),
        |(mut body, mut parser, mut ready, done)| async move {
            loop {
                if let Some(frame) = ready.next() {
                    return Some((Ok(frame), (body, parser, ready, done)));
                }
                if done {
                    return None;
                }
                let fault = match body.next().await {
                    Some(Ok(chunk)) => match parser.feed(&chunk) {
                        Ok(frames) => {
                            ready = frames.into_iter();
                            continue;
                        }
                        Err(e) => e,
                    },
                    Some(Err(e)) => TransportError::from(e),
                    // an unterminated trailing event is dropped, per the event-stream rules
                    None => TransportError::EndOfStream,
                };
                return Some((Err(fault), (body, parser, ready, true)));
            }
        },
    );
    Ok(Box::pin(frames))
}
