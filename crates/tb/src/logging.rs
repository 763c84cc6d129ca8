//! Logging bootstrap.
//!
//! Logs go to stderr so they never mix with command output. The level comes
//! from `RUST_LOG` when set, otherwise from the verbosity flags.

use flexi_logger::{Logger, LoggerHandle, WriteMode};
use log::info;

/// Level used when neither `--verbose` nor `--quiet` is given.
const DEFAULT_LEVEL: &str = "warn";

/// Returns the log specification for the given flags.
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        DEFAULT_LEVEL
    }
}

/// Starts the logger. The returned handle must be kept alive until exit.
pub fn init_logging(verbose: bool, quiet: bool) -> Result<LoggerHandle, String> {
    let level = level_for(verbose, quiet);
    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .write_mode(WriteMode::Direct)
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=app_start module=cli status=ok level={level} version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), "warn");
        assert_eq!(level_for(true, false), "debug");
        assert_eq!(level_for(false, true), "error");
    }
}
