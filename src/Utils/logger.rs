//! Terminal logging for the `log` records emitted by the solver.
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install a terminal logger at `level`. Returns `false` if a logger was already set,
/// which happens when several tests initialize logging in one process.
pub fn init_logger(level: LevelFilter) -> bool {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();
    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto).is_ok()
}
