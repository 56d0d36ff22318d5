//! TCP server for the pathwise line protocol.
//!
//! One tokio task per accepted connection. Each session greets the client,
//! learns its name, then feeds every line through the shared [`Engine`]
//! until the client says goodbye, disconnects, or goes idle.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

use pathwise_core::config::ServerConfig;
use pathwise_core::error::{PathwiseError, PathwiseResult};
use pathwise_proto::line::LineCodec;
use pathwise_proto::messages::{farewell, greeting, greeting_reply, parse_greeting};

use crate::engine::Engine;

/// Per-connection limits.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub idle_timeout: Duration,
    pub max_line_length: usize,
}

impl From<&ServerConfig> for SessionOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout(),
            max_line_length: config.max_line_length,
        }
    }
}

/// Outcome of waiting for the next client line.
enum LineEvent {
    Line(String),
    Closed,
    TimedOut,
    Failed(std::io::Error),
}

impl fmt::Display for LineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEvent::Line(line) => write!(f, "line {line:?}"),
            LineEvent::Closed => f.write_str("stream closed"),
            LineEvent::TimedOut => f.write_str("idle timeout"),
            LineEvent::Failed(e) => write!(f, "decode error: {e}"),
        }
    }
}

async fn next_line<S>(framed: &mut Framed<S, LineCodec>, idle: Duration) -> LineEvent
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match tokio::time::timeout(idle, framed.next()).await {
        Err(_) => LineEvent::TimedOut,
        Ok(None) => LineEvent::Closed,
        Ok(Some(Err(e))) => LineEvent::Failed(e),
        Ok(Some(Ok(line))) => LineEvent::Line(line),
    }
}

/// Drive one session to completion over any byte stream.
pub async fn handle_session<S>(
    stream: S,
    engine: Arc<Engine>,
    session_id: &str,
    options: SessionOptions,
) -> PathwiseResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let started = Instant::now();
    let mut framed = Framed::new(
        stream,
        LineCodec::with_max_line_length(options.max_line_length),
    );

    framed.send(greeting(session_id)).await?;

    let name = match next_line(&mut framed, options.idle_timeout).await {
        LineEvent::Line(line) => parse_greeting(&line).to_string(),
        other => {
            tracing::debug!(session = session_id, "closed before greeting: {other}");
            return Ok(());
        }
    };
    tracing::info!(session = session_id, client = %name, "client greeted");
    framed.send(greeting_reply(&name)).await?;

    loop {
        match next_line(&mut framed, options.idle_timeout).await {
            LineEvent::Line(line) => {
                let response = engine.execute_line(&line);
                if response.is_close() {
                    break;
                }
                framed.send(response.to_string()).await?;
            }
            LineEvent::Failed(e) => {
                let err = PathwiseError::Protocol(e.to_string());
                tracing::warn!(session = session_id, "{err}");
                break;
            }
            event => {
                tracing::debug!(session = session_id, "session ending: {event}");
                break;
            }
        }
    }

    let elapsed = started.elapsed().as_millis();
    if let Err(e) = framed.send(farewell(&name, elapsed)).await {
        tracing::debug!(session = session_id, "farewell not delivered: {e}");
    }
    tracing::info!(session = session_id, client = %name, elapsed_ms = elapsed as u64, "client disconnected");
    Ok(())
}

/// Accept connections forever, one task per connection.
pub async fn serve(listener: TcpListener, engine: Arc<Engine>, options: SessionOptions) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let engine = engine.clone();
        tokio::spawn(async move {
            let session_id = uuid::Uuid::new_v4().to_string();
            tracing::debug!(session = %session_id, "connection from {}", peer);
            if let Err(e) = handle_session(stream, engine, &session_id, options).await {
                tracing::warn!(session = %session_id, "session error from {}: {}", peer, e);
            }
            tracing::debug!(session = %session_id, "connection closed from {}", peer);
        });
    }
}

/// Bind the configured address and serve until the task is dropped.
pub async fn run_server(engine: Arc<Engine>, config: &ServerConfig) -> PathwiseResult<()> {
    let addr = config.listen_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("pathwise server listening on {}", addr);
    serve(listener, engine, SessionOptions::from(config)).await;
    Ok(())
}
