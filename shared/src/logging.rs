//! Tracing initialization shared by every binary and test harness

use chrono::{DateTime, Utc};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the stdout tracing subscriber with a base level
///
/// `RUST_LOG` takes precedence when set; otherwise the workspace crates log
/// at `level` and the noisy transport crates are quieted.
pub fn init_tracing(level: &str) {
    let directives = format!(
        "webserver={level},generator={level},chain={level},shared={level},\
         tower_http=warn,hyper=warn,reqwest=warn"
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Formatted timestamp for consistent log/metadata output
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339()
}
