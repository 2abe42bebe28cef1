// (c) Roel Kluin, 2023, GPL v3

use log::LevelFilter;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// The level selected by the `-d` and `-v` flags, debug winning.
pub fn level(verbose: bool, debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

/// Log to stderr as `[HH:MM:SS] LEVEL: message`, the time elapsed since this call.
/// `RUST_LOG` may refine the filter per module.
pub fn init_logger(level: LevelFilter) {
    let start = *START_TIME.get_or_init(Instant::now);

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            let secs = start.elapsed().as_secs();
            writeln!(
                buf,
                "[{:02}:{:02}:{:02}] {}: {}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
