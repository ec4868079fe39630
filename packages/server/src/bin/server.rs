//! Family check-in and chat relay server.
//!
//! Holds the shared safety reports, chat history and typing state in memory
//! and broadcasts the full state to every connected client on each change.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin stockhammer-server
//! cargo run --bin stockhammer-server -- --host 127.0.0.1 --port 3000
//! PORT=4000 TYPING_TIMEOUT_SECS=10 cargo run --bin stockhammer-server
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use clap::Parser;
use stockhammer_server::{
    domain::FamilyState,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryStateRepository},
    ui::{AppState, Server},
};
use stockhammer_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "stockhammer-server")]
#[command(about = "Family check-in and chat relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Seconds after which an idle typing indicator is cleared (0, the default, never clears)
    #[arg(long, env = "TYPING_TIMEOUT_SECS", default_value = "0")]
    typing_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. AppState (UseCases)
    // 4. Server

    // 1. Create Repository (in-memory store)
    let repository = Arc::new(InMemoryStateRepository::new(Arc::new(Mutex::new(
        FamilyState::new(),
    ))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases
    let state = Arc::new(AppState::new(
        repository,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(state)
        .with_typing_timeout(Some(Duration::from_secs(args.typing_timeout_secs)));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_expiry_is_off_by_default() {
        // テスト項目: 入力中状態の期限切れは既定では無効
        // given (前提条件):
        let argv = ["stockhammer-server"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.typing_timeout_secs, 0);
        assert_eq!(args.port, 3000);
    }

    #[test]
    fn test_typing_expiry_can_be_enabled() {
        // テスト項目: フラグ指定で入力中状態の期限切れを有効にできる
        // given (前提条件):
        let argv = ["stockhammer-server", "--typing-timeout-secs", "10"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.typing_timeout_secs, 10);
    }
}
