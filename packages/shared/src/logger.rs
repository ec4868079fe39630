//! Logging setup utilities for the Stockhammer binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled at the default level.
const APPLICATION_CRATES: [&str; 4] = [
    "stockhammer_shared",
    "stockhammer_server",
    "stockhammer_client",
    "tower_http",
];

/// Build the default filter directive string for the given binary.
///
/// Binary names are normalised the same way cargo normalises crate names
/// (`-` becomes `_`), so `stockhammer-server` maps onto its tracing target.
pub fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = APPLICATION_CRATES
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();

    let binary_target = binary_name.replace('-', "_");
    if !APPLICATION_CRATES.contains(&binary_target.as_str()) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }

    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "stockhammer-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use stockhammer_shared::logger::setup_logger;
///
/// setup_logger("stockhammer-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_include_application_crates() {
        // テスト項目: アプリケーションの各クレートにデフォルトレベルが設定される
        // given (前提条件):
        let binary_name = "stockhammer-server";

        // when (操作):
        let directives = default_directives(binary_name, "debug");

        // then (期待する結果):
        assert!(directives.contains("stockhammer_server=debug"));
        assert!(directives.contains("stockhammer_shared=debug"));
        assert!(directives.contains("tower_http=debug"));
        // バイナリ名はクレート名と同じなので重複しない
        assert_eq!(directives.matches("stockhammer_server=").count(), 1);
    }

    #[test]
    fn test_default_directives_append_unknown_binary() {
        // テスト項目: 未知のバイナリ名はディレクティブに追加される
        // given (前提条件):
        let binary_name = "relay-bench";

        // when (操作):
        let directives = default_directives(binary_name, "info");

        // then (期待する結果):
        assert!(directives.ends_with("relay_bench=info"));
    }
}
