//! Stream audit records for every active subscription until a
//! termination signal arrives.
//!
//! ```sh
//! O365_TENANT_ID=<tenant> \
//! O365_OUTPUT=file:///tmp/audit.jsonl \
//! O365_STATE_FILE=/tmp/auditfeed.state \
//! cargo run --example watch
//! ```
//!
//! The demo client is unauthenticated; point it at a stub server with
//! `O365_BASE_URL`, or wire a token-injecting `reqwest::Client` for the
//! real endpoint.

use std::env;
use std::fs::File;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use auditfeed::{
    wait_for_shutdown_signal, Client, JsonHandler, MemoryState, Output, SubscriptionWatcher,
    WatcherConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tenant_id = env::var("O365_TENANT_ID")?;
    let publisher = env::var("O365_PUBLISHER_IDENTIFIER").unwrap_or_default();
    let output = env::var("O365_OUTPUT").unwrap_or_default();
    let state_file = env::var("O365_STATE_FILE").ok();

    let mut client = Client::new(None, tenant_id, &publisher)?;
    if let Ok(base_url) = env::var("O365_BASE_URL") {
        client = client.with_base_url(Url::parse(&base_url)?);
    }

    let state = Arc::new(MemoryState::new());
    if let Some(path) = &state_file {
        match File::open(path) {
            Ok(file) => {
                if let Err(err) = state.read(file) {
                    eprintln!("statefile content empty or invalid, starting fresh: {err}");
                }
            }
            Err(_) => eprintln!("no statefile at {path}, starting fresh"),
        }
    }

    let handler = JsonHandler::new(Output::dial(&output).await?, false);
    let config = WatcherConfig {
        look_behind_minutes: 1,
        ticker_interval_seconds: 5,
    };
    let watcher = SubscriptionWatcher::new(
        Arc::new(client),
        config,
        Arc::clone(&state) as Arc<dyn auditfeed::State>,
        Arc::new(handler),
    )?;

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        let _ = wait_for_shutdown_signal().await;
        signal_token.cancel();
    });

    let result = watcher.run(token).await;

    if let Some(path) = &state_file {
        state.write(File::create(path)?)?;
        eprintln!("state written to {path}");
    }
    Ok(result?)
}
