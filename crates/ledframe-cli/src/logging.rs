use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Installs the stderr logger.
///
/// `RUST_LOG` is read first. An explicit `-v`/`-q` is added on top of it as a
/// global level, and without either the level defaults to `info`.
pub fn setup(verbosity: &Verbosity<InfoLevel>) {
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter(verbosity)),
    );

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logger not installed: {err}");
    }
}

fn env_filter(verbosity: &Verbosity<InfoLevel>) -> EnvFilter {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    match verbosity
        .is_present()
        .then(|| verbosity.tracing_level_filter())
    {
        Some(level_filter) => env_filter.add_directive(Directive::from(level_filter)),
        None => env_filter,
    }
}
