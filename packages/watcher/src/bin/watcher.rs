//! Read-only whiteboard watcher.
//!
//! Subscribes to a room, prints the current snapshot, then prints every
//! stroke as soon as all of its chunks have arrived.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-watcher -- --pass roomA
//! cargo run --bin kokuban-watcher -- -u http://127.0.0.1:3000 -p roomA
//! ```

use clap::Parser;
use kokuban_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kokuban-watcher")]
#[command(about = "Follow a Kokuban whiteboard room from the terminal", long_about = None)]
struct Args {
    /// Room passphrase to watch
    #[arg(short = 'p', long)]
    pass: String,

    /// Server base URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kokuban_watcher", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = kokuban_watcher::run_watcher(args.url, args.pass).await {
        tracing::error!("Watcher error: {}", e);
        std::process::exit(1);
    }
}
