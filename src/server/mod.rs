//! HTTP endpoint streaming the tag list
//!
//! Every request starts its own `exiftool -listx` process and pipes its
//! output through [`TagConverter`] straight into the response body. A
//! supervisor task races the conversion against the client going away and
//! makes sure the child process is killed and reaped on every path.

use std::io::{self, BufReader};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::listx::{ConversionStats, ErrorKind, TagConverter, DEFAULT_INPUT_BUFFER_SIZE};
use crate::source::{ListxChild, ListxCommand};

pub use writer::{BodyChunk, ChannelWriter};

mod writer;


/// Errors that stop the server itself
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The accept loop failed
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

/// Settings for the HTTP endpoint
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Body chunks buffered between the converter and a slow client
    pub channel_capacity: usize,

    /// Command producing the XML, run once per request
    pub command: ListxCommand,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            channel_capacity: 16,
            command: ListxCommand::default(),
        }
    }
}

/// Shared per-server state
#[derive(Debug, Clone)]
struct AppState {
    command: ListxCommand,
    converter: TagConverter,
    channel_capacity: usize,
}

/// How a single streamed response ended
#[derive(Debug)]
pub enum StreamOutcome {
    /// The whole document was sent and the process exited cleanly
    Completed(ConversionStats),
    /// Conversion or the process failed; the body was aborted
    Failed(String),
    /// The client went away; the process was killed
    Cancelled,
}

/// Build the router: one endpoint, every path serves the tag list
pub fn router(config: &ServerConfig, converter: TagConverter) -> Router {
    let state = Arc::new(AppState {
        command: config.command.clone(),
        converter,
        channel_capacity: config.channel_capacity.max(1),
    });

    Router::new()
        .route("/", get(stream_tags))
        .fallback(stream_tags)
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(config: ServerConfig, converter: TagConverter) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    let addr = listener.local_addr()?;

    info!("Serving `{}` as JSON on http://{}", config.command, addr);

    axum::serve(listener, router(&config, converter))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn stream_tags(State(state): State<Arc<AppState>>) -> Response {
    let child = match state.command.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!("{}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };
    let (tx, rx) = mpsc::channel::<BodyChunk>(state.channel_capacity);
    let converter = state.converter.clone();
    tokio::spawn(async move {
        match supervise(child, tx, converter).await {
            StreamOutcome::Completed(stats) => {
                debug!("Streamed {} tags ({} bytes)", stats.tags, stats.bytes_written)
            }
            StreamOutcome::Failed(msg) => error!("Streaming tags failed: {}", msg),
            StreamOutcome::Cancelled => info!("Client disconnected, process killed"),
        }
    });

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}

/// Drive one conversion from the child's stdout into `tx` and clean up `child`
///
/// Completion and client disconnect race; whichever comes first decides
/// whether the child is waited for or killed. The child is reaped either way.
pub async fn supervise(
    mut child: ListxChild,
    tx: mpsc::Sender<BodyChunk>,
    converter: TagConverter,
) -> StreamOutcome {
    let Some(stdout) = child.take_stdout() else {
        let msg = format!("process {} has no stdout pipe", child.id());
        kill(&mut child);
        let _ = reap(child).await;
        return abort(&tx, StreamOutcome::Failed(msg)).await;
    };

    let writer = ChannelWriter::new(tx.clone());
    let mut conversion = tokio::task::spawn_blocking(move || {
        let reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, stdout);
        converter.convert(reader, writer)
    });

    let finished = tokio::select! {
        joined = &mut conversion => Some(joined),
        _ = tx.closed() => None,
    };

    let outcome = match finished {
        Some(Ok(Ok(stats))) => match reap(child).await {
            Ok(()) => StreamOutcome::Completed(stats),
            Err(msg) => StreamOutcome::Failed(msg),
        },
        Some(Ok(Err(e))) => {
            kill(&mut child);
            let _ = reap(child).await;
            if e.kind() == ErrorKind::Sink && tx.is_closed() {
                StreamOutcome::Cancelled
            } else {
                StreamOutcome::Failed(e.to_string())
            }
        }
        Some(Err(join_error)) => {
            kill(&mut child);
            let _ = reap(child).await;
            StreamOutcome::Failed(format!("conversion task failed: {}", join_error))
        }
        None => {
            kill(&mut child);
            // Killing the child closes its stdout, which unblocks the converter
            if let Ok(Err(e)) = conversion.await {
                debug!("Conversion ended after disconnect: {}", e);
            }
            let _ = reap(child).await;
            StreamOutcome::Cancelled
        }
    };

    abort(&tx, outcome).await
}

async fn abort(tx: &mpsc::Sender<BodyChunk>, outcome: StreamOutcome) -> StreamOutcome {
    if let StreamOutcome::Failed(ref msg) = outcome {
        // Aborts the chunked body so the truncated document is not taken as complete
        let _ = tx.send(Err(io::Error::other(msg.clone()))).await;
    }
    outcome
}

fn kill(child: &mut ListxChild) {
    if let Err(e) = child.kill() {
        warn!("Failed to kill process {}: {}", child.id(), e);
    }
}

/// Wait for the child on a blocking thread, mapping failure to a message
async fn reap(child: ListxChild) -> Result<(), String> {
    match tokio::task::spawn_blocking(move || child.wait()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("waiting for process failed: {}", e)),
    }
}
