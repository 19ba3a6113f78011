use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "RACE_LOG";

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Installs the global subscriber. Log lines go to stderr so report output
/// on stdout stays machine readable.
pub fn init_logging(verbose: bool, no_color: bool) {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| default_filter(verbose),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| default_filter(verbose)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(true, true);
        init_logging(false, false);
    }
}
