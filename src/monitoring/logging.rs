// DANS : src/monitoring/logging.rs
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Niveau utilisé quand `RUST_LOG` n'est pas défini.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logs JSON sur stdout, un objet par événement. `RUST_LOG` permet de monter
/// le niveau par module, ex. `RUST_LOG=twap::strategies=debug`.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    // `try_init` : un second appel (tests, outils) ne doit pas paniquer.
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .try_init();
}
