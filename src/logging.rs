use env_logger::{Builder, Env};

/// Initializes the stderr logger once for the process.
///
/// `RUST_LOG` wins when set. Otherwise the level is `warn`, or `debug` when
/// `verbose` is requested. Calling this again is a no-op.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
