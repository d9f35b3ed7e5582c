//! Realtime event streaming.

use clap::Args;

use wirechat_core::error::AppError;
use wirechat_realtime::SocketManager;

use super::build_context;

const DEFAULT_EVENTS: &[&str] = &["message:new", "friend:request", "conversation:updated"];

/// Arguments for `listen`
#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Event names to subscribe to (defaults to the common set)
    #[arg(short = 'E', long = "event")]
    pub events: Vec<String>,
}

/// Stream realtime events to the terminal until interrupted.
pub async fn execute(args: &ListenArgs, env: &str) -> Result<(), AppError> {
    let context = build_context(env)?;
    let manager = SocketManager::new(context.config.realtime.clone(), context.store);

    manager.on_status(|status| println!("* connection {status}"));
    manager.on_error(|message| eprintln!("! {message}"));

    let events: Vec<String> = if args.events.is_empty() {
        DEFAULT_EVENTS.iter().map(|s| s.to_string()).collect()
    } else {
        args.events.clone()
    };
    for event in events {
        let name = event.clone();
        manager.on(&event, move |data| {
            println!("{name}: {data}");
        });
    }

    manager.connect();

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::configuration(format!("Failed to install signal handler: {e}")))?;
    manager.disconnect();
    println!("* stopped");
    Ok(())
}
