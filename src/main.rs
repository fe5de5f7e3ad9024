use anyhow::Context;
use clap::Parser;
use gavel::app::App;
use gavel::client::{Classifier, HttpClassifier};
use gavel::config::Config;
use std::fs::File;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting gavel");

    let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::new(&config)?);

    if config.check {
        return check_connectivity(classifier.as_ref()).await;
    }

    App::new(classifier, config.base_url.clone(), config.tick())
        .run()
        .await
}

async fn check_connectivity(classifier: &dyn Classifier) -> anyhow::Result<()> {
    match classifier.health().await {
        Ok(report) => {
            println!("{}", report.summary());
            Ok(())
        }
        Err(error) => anyhow::bail!("connectivity check failed: {error}"),
    }
}

/// The interactive screen owns the terminal, so logging goes to a file
/// when one is configured and is otherwise disabled. One-shot checks
/// log to stderr like any other command line tool.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,gavel=info".into());

    match &config.log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None if config.check => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}
