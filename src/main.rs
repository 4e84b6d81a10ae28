//! Prompt Proxy
//!
//! This application accepts chat and image generation prompts over HTTP,
//! forwards them to a single upstream API and relays the response.

mod api;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::client::UpstreamClient;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::service::PromptService;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    print_startup_banner(&config);

    let client = match UpstreamClient::new(config.timeout()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState {
        config: config.clone(),
        service: Arc::new(PromptService::from_config(client, &config)),
    };

    let app = create_router(app_state);

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server is listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("Prompt Proxy v{}", env!("CARGO_PKG_VERSION"));
    println!("   Upstream: {}", config.base_api);
    match config.timeout() {
        Some(timeout) => println!("   Request Timeout: {}s", timeout.as_secs()),
        None => println!("   Request Timeout: none"),
    }
    println!(
        "   Response Mode: {}",
        if config.decode_body { "decoded" } else { "passthrough" }
    );
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("Prompt Proxy v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: prompt-proxy [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Endpoints:");
    println!("  GET /chat?prompt=<text>&model=<gpt|llama|bard>");
    println!("  GET /dalle?prompt=<text>&model=<art|photography|3d>");
    println!("  GET /health");
    println!();
    println!("Environment variables:");
    println!("  CONFIG_PATH - TOML configuration file (default: config.toml)");
    println!("  BASE_API - Upstream URL template with {{}} placeholder");
    println!("             (default: https://api.biswax.dev/{{}})");
    println!("  HOST - Server host (default: 0.0.0.0)");
    println!("  PORT - Server port (default: 3000)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!("  REQUEST_TIMEOUT - Upstream timeout in seconds, 0 for none (default: 90)");
}
