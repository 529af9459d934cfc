//! Interactive terminal client.
//!
//! Reads commands from stdin, one per line. Run `help` for the list.

use anyhow::Context;
use std::sync::Arc;
use todo_sync::shell::{self, Command, Flow};
use todo_sync::{ClientConfig, HttpTodoApi, ListStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    let level = &config.log_level.0;

    // Initialize tracing; logs go to stderr so they do not mix with the list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("todo_sync={level},todo_sync_runtime={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        api_url = %config.api.base_url,
        request_timeout_secs = config.api.request_timeout,
        "Configuration loaded"
    );

    let api = HttpTodoApi::new(&config.api).context("building HTTP client")?;
    let store = ListStore::new(Arc::new(api));

    println!("=== Todo List ({}) ===\n", config.api.base_url);
    if let Flow::Continue(out) = shell::execute(&store, Command::Reload).await? {
        println!("{out}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(shell::ParseError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            },
        };

        match shell::execute(&store, command).await? {
            Flow::Continue(out) => println!("\n{out}"),
            Flow::Quit => break,
        }
    }

    if let Err(e) = store.shutdown(config.shutdown_timeout()).await {
        warn!(error = %e, "Exiting with requests still in flight");
    }

    Ok(())
}
