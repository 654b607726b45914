//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. The accept loop also
//! watches for a fatal error raised by any request and stops serving when
//! one arrives.

use bytes::Bytes;
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::auth::{ApiKeyValidator, AuthGate, SessionService, TokenCodec, ACCESS_TOKEN_TTL};
use crate::config::Args;
use crate::routes::{self, BoxBody, BoxError};
use crate::store::{CredentialStore, MemoryStore};
use crate::types::ChirpyError;

const ADMIN_PREFIX: &str = "/admin/";

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn CredentialStore>,
    pub gate: AuthGate,
    pub sessions: SessionService,
    hits: AtomicU64,
    fatal: Notify,
}

impl AppState {
    /// Create AppState backed by an in-memory store
    pub fn new(args: Args) -> Result<Self, ChirpyError> {
        Self::with_store(args, Arc::new(MemoryStore::new()))
    }

    /// Create AppState over an existing credential store
    pub fn with_store(args: Args, store: Arc<dyn CredentialStore>) -> Result<Self, ChirpyError> {
        let codec = TokenCodec::new(args.jwt_secret()?, ACCESS_TOKEN_TTL);
        let gate = AuthGate::new(codec.clone(), ApiKeyValidator::new(args.polka_key()?));
        let sessions = SessionService::new(Arc::clone(&store), codec);

        Ok(Self {
            args,
            store,
            gate,
            sessions,
            hits: AtomicU64::new(0),
            fatal: Notify::new(),
        })
    }

    /// Count one served request
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Requests counted since start or the last reset
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset_hits(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }

    /// Ask the server loop to stop after `err`
    pub fn signal_fatal(&self, err: &ChirpyError) {
        error!("Fatal error, shutting down: {}", err);
        self.fatal.notify_one();
    }

    /// Resolves once [`AppState::signal_fatal`] has been called
    pub async fn fatal_signalled(&self) {
        self.fatal.notified().await;
    }
}

/// Start the HTTP server
///
/// Runs until a request raises a fatal error, which is returned.
pub async fn run(state: Arc<AppState>) -> Result<(), ChirpyError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Chirpy listening on {}", state.args.listen);

    if state.args.is_dev() {
        warn!("Development platform - built-in credentials may be in use");
    }

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move {
                                info!("[{}] {} {}", addr, req.method(), req.uri().path());
                                Ok::<_, hyper::Error>(handle_request(state, req).await)
                            }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            error!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            _ = state.fatal_signalled() => {
                return Err(ChirpyError::Fatal("server stopped after fatal error".into()));
            }
        }
    }
}

/// Route one request and turn any handler error into a response
///
/// Every request outside `/admin/` bumps the hit counter. Generic over the
/// body so tests can drive it with in-memory bodies.
pub async fn handle_request<B>(state: Arc<AppState>, req: Request<B>) -> Response<BoxBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if !req.uri().path().starts_with(ADMIN_PREFIX) {
        state.record_hit();
    }

    match routes::route(Arc::clone(&state), req).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_fatal() {
                state.signal_fatal(&err);
            } else if err.status_code().is_server_error() {
                error!("Request failed: {}", err);
            }
            routes::error_response(&err)
        }
    }
}
