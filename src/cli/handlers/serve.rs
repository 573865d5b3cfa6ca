//! API server handler

use std::sync::Arc;

use crate::api::build_state;
use crate::api::serve_api;
use crate::cli::output::*;
use crate::store::TransactionStore;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_command(
    config: &AppConfig,
    store: Arc<TransactionStore>,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.server.cors |= cors;

    println!("🚀 Starting chainrag API server");
    println!("==============================\n");
    println!("📍 Bind: {}", config.bind_address());
    println!("🌐 CORS: {}", if config.server.cors { "Enabled" } else { "Disabled" });
    if store.is_empty() {
        print_warning("No transaction data loaded; data endpoints will report it");
    } else {
        print_info(&format!("{} transactions loaded", store.len()));
    }
    println!();

    let state = build_state(&config, store).await?;
    serve_api(&config, state).await
}
