//! Server loop behavior over a real socket

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use chirpy::server::{run, AppState};
use chirpy::{Args, ChirpyError};

fn dev_state() -> Arc<AppState> {
    let args = Args::try_parse_from(["chirpy", "--platform", "dev", "--listen", "127.0.0.1:0"])
        .unwrap();
    Arc::new(AppState::new(args).unwrap())
}

#[tokio::test]
async fn test_fatal_error_stops_server() {
    let state = dev_state();
    let server = tokio::spawn(run(Arc::clone(&state)));

    state.signal_fatal(&ChirpyError::Fatal("randomness source failed".into()));

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(matches!(result, Err(ChirpyError::Fatal(_))));
}

#[test]
fn test_prod_state_requires_secrets() {
    let args = Args::try_parse_from(["chirpy", "--platform", "prod"]).unwrap();
    assert!(matches!(AppState::new(args), Err(ChirpyError::Config(_))));
}
