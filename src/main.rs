#![deny(unused)]
//! Concierge - multi-agent retail assistant.
//!
//! Reads one user message per line from stdin, routes it to a specialized
//! agent and prints the normalized response record as JSON.
//!
//! Lines starting with `cart:` run a cart turn; lines starting with
//! `image:` are acknowledged with a status message first.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use concierge_core::{config::AppConfig, traits::LlmClient, types::ConversationHistory};
use concierge_gateway::{rotating_message, ConciergePipeline, LlmAgentProcessor, ProcessorBackend, StatusKind};
use concierge_governance::{configure_tracing, setup_metrics_recorder, PerformanceMonitor};
use concierge_model_gateway::create_default_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_tracing()?;
    tracing::info!("Starting Concierge v{}", env!("CARGO_PKG_VERSION"));

    let metrics = if std::env::var("CONCIERGE_METRICS").is_ok() {
        Some(setup_metrics_recorder()?)
    } else {
        None
    };

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
        AppConfig::default()
    });

    // =========================================================================
    // Model client and agents
    // =========================================================================
    let llm: Arc<dyn LlmClient> = Arc::new(create_default_client()?);

    let agent_llm = Arc::clone(&llm);
    let backend = ProcessorBackend::new(move |agent, endpoint, thread_id| {
        Ok(LlmAgentProcessor::new(agent, endpoint, Arc::clone(&agent_llm), thread_id))
    });
    tracing::info!(thread_id = %backend.thread_id(), "Conversation thread created");

    let monitor = Arc::new(PerformanceMonitor::new());
    let pipeline = ConciergePipeline::new(&config, llm, Arc::new(backend))
        .with_monitor(Arc::clone(&monitor));

    // =========================================================================
    // Chat loop
    // =========================================================================
    let mut history = ConversationHistory::new(config.history.max_turns);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = if let Some(message) = line.strip_prefix("cart:") {
            pipeline
                .handle_cart_turn(&mut history, message.trim())
                .await
                .and_then(|merged| Ok(serde_json::to_string(&merged)?))
        } else {
            let message = match line.strip_prefix("image:") {
                Some(rest) => {
                    let ack = rotating_message(StatusKind::ImageUpload);
                    stdout.write_all(format!("{}\n", ack).as_bytes()).await?;
                    rest.trim()
                }
                None => line,
            };
            pipeline
                .handle_turn(&mut history, message)
                .await
                .and_then(|record| Ok(serde_json::to_string(&record)?))
        };

        match output {
            Ok(json) => stdout.write_all(format!("{}\n", json).as_bytes()).await?,
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                stdout
                    .write_all(format!("{{\"error\": {}}}\n", serde_json::to_string(&e.to_string())?).as_bytes())
                    .await?;
            }
        }
        stdout.flush().await?;
    }

    monitor.log_summary();
    if let Some(handle) = metrics {
        println!("{}", handle.render());
    }

    tracing::info!("Concierge stopped");
    Ok(())
}
