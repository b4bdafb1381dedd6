//! Clothesline server - storefront API binary.
//!
//! Serves the cart/order API on port 3100 by default.
//!
//! # Architecture
//!
//! - Axum JSON API consumed by the mobile storefront
//! - Stateless bearer-token sessions (HS256), argon2id password hashes
//! - A single JSON data file as durable state, written atomically
//!   (temp file + rename) and owned exclusively by this process

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clothesline_server::config::Config;
use clothesline_server::routes;
use clothesline_server::state::AppState;
use clothesline_server::store::Store;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clothesline_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the data file; malformed content degrades to an empty state,
    // only an unreadable medium is fatal.
    let store =
        Store::open(config.data_path.clone(), config.save_timeout).expect("Failed to open data file");
    tracing::info!(path = %store.path().display(), "data file opened");

    let addr = config.socket_addr();
    let state = AppState::new(config, store);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "server running");

    axum::serve(listener, app)
        .await
        .expect("Server exited with an error");
}
