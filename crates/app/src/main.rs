use std::sync::Arc;

use ai_parser::{OpenRouterParser, TransactionParser};
use clap::Parser;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = settings::Cli::parse();
    let settings = settings::Settings::new(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "money_tracker={level},server={level},engine={level},ai_parser={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = match settings.app.timezone() {
        Ok(timezone) => timezone,
        Err(err) => {
            tracing::error!("invalid settings: {err}");
            return Err(err.into());
        }
    };

    let engine = engine::Engine::builder().timezone(timezone).build();

    let parser = OpenRouterParser::new(settings.ai.parser_config());
    if !parser.is_configured() {
        tracing::warn!("no AI API key configured, AI import requests will fail");
    }
    let parser: Arc<dyn TransactionParser> = Arc::new(parser);

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };
    tracing::info!(timezone = %engine.timezone(), "money tracker starting");

    if let Err(err) = server::run_with_listener(engine, parser, listener).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}
