//! Logger setup for the `wordgrid` binary.
//!
//! The library only emits through the `log` facade: one `debug!` line per placed word, a `warn!`
//! for each word left out of the grid, and an `info!` summary per run. The binary shows the
//! summary by default and the per-word lines with `--debug` or `WORDGRID_DEBUG` set.

use log::LevelFilter;

/// Environment variable that turns on per-word placement logging, like `--debug`.
pub const DEBUG_ENV_VAR: &str = "WORDGRID_DEBUG";

fn level_for(debug_flag: bool, debug_env_set: bool) -> LevelFilter {
    if debug_flag || debug_env_set {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize logging for the `wordgrid` binary.
///
/// Placement decisions are logged when `debug_flag` is true or `WORDGRID_DEBUG` is set. An
/// explicit `RUST_LOG` filter overrides both. Lines are bare messages so they read cleanly next
/// to the rendered grid on the terminal.
pub fn init_logger(debug_flag: bool) {
    let level = level_for(debug_flag, std::env::var_os(DEBUG_ENV_VAR).is_some());

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A second initialization (e.g. from tests) keeps the first logger.
    if builder.try_init().is_ok() {
        log::debug!("Placement logging enabled at {level:?} level");
    }
}
