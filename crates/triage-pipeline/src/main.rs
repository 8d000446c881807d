//! Triage pipeline demo binary.
//!
//! Wires the chat gateway, file-backed memory log, and workflow together
//! and runs one bundled utterance through the pipeline.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use triage_llm::ChatClient;
use triage_pipeline::config::PipelineConfig;
use triage_pipeline::memory::FileMemoryLog;
use triage_pipeline::workflow::Workflow;
use triage_protocol::ToolContext;

const DEMO_UTTERANCE: &str = "你好，我想查詢 LTHDES101N 設備資訊";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "triage.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        PipelineConfig::from_file(&config_path)?
    } else {
        tracing::info!(path = %config_path, "config file not found, using defaults");
        PipelineConfig::default()
    };
    tracing::info!(
        base_url = %config.llm.base_url,
        model = %config.llm.model,
        memory_log = %config.memory_log_path,
        "triage pipeline starting"
    );

    let gateway = Arc::new(ChatClient::new(config.llm.clone()));
    let memory = Arc::new(FileMemoryLog::new(&config.memory_log_path));
    let workflow = Workflow::new(gateway, memory, config.tail_lines);

    let ctx = ToolContext::new("demo", "demo_conversation");
    let reply = workflow.run(&ctx, DEMO_UTTERANCE).await;

    println!("{reply}");
    Ok(())
}
