//! Handoff binary - composition root.
//!
//! Plays either side of the handoff against the shared store:
//! - `submit` writes a pending action, as the voice agent does
//! - `ready` / `run` drive the application's lifecycle events and route what
//!   is pending
//! - `pending` inspects the store without consuming it

mod cli;
mod router;

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;

use handoff_action::{ActionDispatcher, ActionPublisher, LifecycleEvent, LifecycleHandler};
use handoff_core::config::HandoffConfig;
use handoff_core::types::{OrderRequest, PendingAction, SearchRequest, StoredValue};
use handoff_storage::{Database, SqliteActionStore};

use cli::{CliArgs, Command, SubmitAction};
use router::ConsoleRouter;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn open_store(
    args: &CliArgs,
    config: &HandoffConfig,
) -> Result<Arc<SqliteActionStore>, Box<dyn std::error::Error>> {
    let data_dir = args.resolve_data_dir(&config.general.data_dir);
    let db_path = data_dir.join(&config.store.file_name);
    let db = Database::new(&db_path, config.store.busy_timeout_ms)?;
    tracing::debug!(path = %db_path.display(), "Shared store opened");
    Ok(Arc::new(SqliteActionStore::new(Arc::new(db))))
}

fn submit(store: Arc<SqliteActionStore>, action: SubmitAction) -> bool {
    let action = match action {
        SubmitAction::Order {
            food_item,
            restaurant,
            quantity,
        } => PendingAction::Order(OrderRequest {
            food_item,
            restaurant,
            quantity,
        }),
        SubmitAction::Search { query } => PendingAction::Search(SearchRequest { query }),
        SubmitAction::Reorder => PendingAction::Reorder,
        SubmitAction::CheckStatus => PendingAction::CheckStatus,
    };
    ActionPublisher::new(store).submit(&action)
}

fn list_pending(store: &SqliteActionStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let entries = store.entries()?;
    if json {
        for entry in &entries {
            println!("{}", serde_json::to_string(entry)?);
        }
        return Ok(());
    }

    if entries.is_empty() {
        println!("No pending actions");
        return Ok(());
    }
    let now = chrono::Utc::now();
    for entry in entries {
        let value = match &entry.value {
            StoredValue::Blob(bytes) => format!("{} bytes", bytes.len()),
            StoredValue::Text(text) => format!("{:?}", text),
            StoredValue::Flag(flag) => flag.to_string(),
            StoredValue::Unrecognized(found) => format!("<{}>", found),
        };
        let age = (now - entry.written_at).num_seconds();
        println!("{:<22} {:<28} {}s ago", entry.kind.store_key(), value, age);
    }
    Ok(())
}

/// Feed lifecycle events from `input` to the handler until EOF or `exit`.
fn run_session(
    input: impl BufRead,
    handler: &mut LifecycleHandler,
    dispatcher: &mut ActionDispatcher,
    router: &mut ConsoleRouter,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }
        match line.parse::<LifecycleEvent>() {
            Ok(event) => {
                let outcome = handler.handle(event, dispatcher, router);
                if outcome.checked && outcome.routed.is_none() {
                    println!("-> nothing pending");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring input"),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = HandoffConfig::load_or_default(&config_file);
    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    let store = open_store(&args, &config)?;

    match args.command {
        Command::Submit { action } => {
            // The agent never reports failure upward; the exit code is for scripts.
            if !submit(store, action) {
                std::process::exit(1);
            }
        }
        Command::Pending { json } => list_pending(&store, json)?,
        Command::Ready => {
            let mut dispatcher = ActionDispatcher::new(store);
            let mut handler = LifecycleHandler::new(config.dispatch.clone());
            let mut router = ConsoleRouter::default();
            let outcome = handler.handle(LifecycleEvent::Ready, &mut dispatcher, &mut router);
            if outcome.checked && outcome.routed.is_none() {
                println!("-> nothing pending");
            }
        }
        Command::Run => {
            let mut dispatcher = ActionDispatcher::new(store);
            let mut handler = LifecycleHandler::new(config.dispatch.clone());
            let mut router = ConsoleRouter::default();
            run_session(
                std::io::stdin().lock(),
                &mut handler,
                &mut dispatcher,
                &mut router,
            )?;
            tracing::info!(routed = router.visited.len(), "Session ended");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handoff_core::config::DispatchConfig;
    use crate::router::Destination;

    #[test]
    fn test_run_session_routes_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("handoff.db"), 5000).unwrap();
        let store = Arc::new(SqliteActionStore::new(Arc::new(db)));

        ActionPublisher::new(store.clone()).submit(&PendingAction::CheckStatus);

        let mut dispatcher = ActionDispatcher::new(store);
        let mut handler = LifecycleHandler::new(DispatchConfig::default());
        let mut router = ConsoleRouter::default();
        // Foreground before ready is ignored; nothing after `exit` is read.
        let input = "foreground\nready\nbogus\nforeground\nexit\nready\n".as_bytes();

        run_session(input, &mut handler, &mut dispatcher, &mut router).unwrap();

        assert_eq!(router.visited, vec![Destination::OrderStatus]);
    }
}
