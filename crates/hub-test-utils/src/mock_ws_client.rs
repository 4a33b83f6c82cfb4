// A thin websocket client for driving the hub's producer route in
// integration tests. Grounded on the teacher's `MockWsClient` (same file,
// pre-rename): same split-sink/split-stream shape and
// `connect`/`send`/`recv`/`close` surface, retargeted from the teacher's
// tagged `WsMessage` enum to this protocol's plain JSON text envelopes and
// length-prefixed binary frames.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::MaybeTlsStream;

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct MockWsClient {
    write: futures_util::stream::SplitSink<WsStream, Message>,
    read: futures_util::stream::SplitStream<WsStream>,
}

impl MockWsClient {
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let (ws_stream, _response) = tokio_tungstenite::connect_async(url).await?;
        let (write, read) = ws_stream.split();
        Ok(Self { write, read })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.write.send(Message::Text(text.to_owned().into())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
        self.send_text(&serde_json::to_string(value)?).await
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
        self.write.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    /// Returns the next text frame, skipping pings/pongs.
    pub async fn recv_text(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        loop {
            match self.read.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.to_string()),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) => return Err("connection closed by server".into()),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err("connection stream ended".into()),
            }
        }
    }

    pub async fn recv_json(&mut self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        Ok(serde_json::from_str(&self.recv_text().await?)?)
    }

    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.write.send(Message::Close(None)).await?;
        Ok(())
    }

    /// Reads frames until the server closes the connection, returning the
    /// close code it sent (if any was attached).
    pub async fn recv_close_code(&mut self) -> Result<Option<u16>, Box<dyn std::error::Error>> {
        loop {
            match self.read.next().await {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| f.code.into())),
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Text(_))) => continue,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(None),
            }
        }
    }
}

/// Frame a binary payload the way the hub's versioned binary layout expects:
/// `[u32 BE version_len][version][u32 BE type_len][type][payload]`.
#[must_use]
pub fn encode_versioned_binary_frame(version: &str, frame_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + version.len() + frame_type.len() + payload.len());
    buf.extend_from_slice(&(version.len() as u32).to_be_bytes());
    buf.extend_from_slice(version.as_bytes());
    buf.extend_from_slice(&(frame_type.len() as u32).to_be_bytes());
    buf.extend_from_slice(frame_type.as_bytes());
    buf.extend_from_slice(payload);
    buf
}
