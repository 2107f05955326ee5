// crates/orchestrator/examples/generate.rs
//! Run one generation end to end against a live service.
//!
//! Usage: STUDIO_API_URL=http://localhost:8787 cargo run -p studio-orchestrator --example generate -- quiz "quiz me on chapter 3" src-1

use std::env;

use studio_orchestrator::{GenerationModule, ModuleEvent, Orchestrator, StudioConfig};
use studio_types::{ContentKind, Signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let kind_arg = args.next().unwrap_or_else(|| "quiz".into());
    let direction = args.next().unwrap_or_else(|| "quiz me on the attached source".into());
    let source_id = args.next().unwrap_or_else(|| "src-1".into());

    let kind = ContentKind::ALL
        .into_iter()
        .find(|k| k.as_str() == kind_arg)
        .ok_or_else(|| anyhow::anyhow!("unknown content kind: {kind_arg}"))?;

    let config = StudioConfig::default();
    println!("API:  {}", config.api_url);
    println!("Kind: {kind}");

    let orchestrator = Orchestrator::new(config.clone());
    let module = GenerationModule::new(kind, reqwest::Client::new(), config);
    module.mount_on(&orchestrator);

    let mut events = module.subscribe();
    let signal = Signal::new(&direction, &source_id);
    orchestrator.replace_signals(vec![signal.clone()]);
    orchestrator.request_generation(kind, vec![signal]);

    loop {
        match events.recv().await? {
            ModuleEvent::Progress { job } => {
                println!("… {} is {}", job.id, job.status);
            }
            ModuleEvent::Completed { job } => {
                println!("✓ {} ready", job.id);
                if let Some(result) = job.result {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                break;
            }
            ModuleEvent::Failed { error } => {
                eprintln!("✗ {error}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
