use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a stderr subscriber. `RUST_LOG` wins over `level`; without
/// either only warnings surface so the console table stays readable.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = match level {
                Some(value) => value
                    .parse::<Level>()
                    .with_context(|| format!("invalid log level '{value}'"))?,
                None => Level::WARN,
            };
            EnvFilter::new(level.as_str())
        }
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
