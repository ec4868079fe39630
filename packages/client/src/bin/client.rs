//! Terminal client for the family check-in and chat relay.
//!
//! Mirrors the shared state (who has checked in, chat history, who is typing)
//! and sends check-ins, messages and reactions typed at the prompt.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin stockhammer-client -- --name Alice
//! cargo run --bin stockhammer-client -- -n Bob -u ws://192.168.1.10:3000
//! ```

use clap::Parser;

use stockhammer_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "stockhammer-client")]
#[command(about = "Terminal client for the family check-in and chat relay", long_about = None)]
struct Args {
    /// Display name used for check-ins, messages and reactions
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = stockhammer_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
