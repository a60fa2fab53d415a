use once_cell::sync::OnceCell;
use tracing::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceCell<Handle<EnvFilter, Registry>> = OnceCell::new();

/// Install the global subscriber on first use and set its filter from `verbosity`.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    // `pokedex` also matches the `pokedex_catalog` and `pokedex_core` targets
    let log_filter = match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,pokedex=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,pokedex=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,pokedex=info",
        // Also show debug from our libraries
        Verbosity::Verbose(2) => "off,pokedex=debug",
        // Also trace our libraries
        Verbosity::Verbose(3) => "off,pokedex=trace",
        // Also show debug from http plumbing
        Verbosity::Verbose(4) => "debug,pokedex=trace",
        Verbosity::Verbose(_) => "trace",
    };

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        let (subscriber, reload_handle) = create_registry_and_filter_reload_handle();
        subscriber.init();
        reload_handle
    });

    update_filters(filter_handle, log_filter);
}

fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}

fn create_registry_and_filter_reload_handle() -> (
    impl tracing_subscriber::layer::SubscriberExt,
    Handle<EnvFilter, Registry>,
) {
    debug!("Initializing logger (how are you seeing this?)");
    // Start wide open, the actual level is set right after through the reload handle.
    let (filter, filter_reload_handle) =
        tracing_subscriber::reload::Layer::new(EnvFilter::new("trace"));
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(tracing_subscriber::fmt::format())
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(log_layer);

    (registry, filter_reload_handle)
}
