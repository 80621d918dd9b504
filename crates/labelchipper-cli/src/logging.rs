use stderrlog::{LogLevelNum, Timestamp};

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence all log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Raise log verbosity (-v: error, -vv: warn, -vvv: info, -vvvv: debug, more: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prefix log lines with timestamps.
    #[clap(short, long)]
    pub ts: bool,
}

impl LogArgs {
    /// The effective log level; `default` applies when no `-v` is given.
    pub fn level(
        &self,
        default: u8,
    ) -> LogLevelNum {
        match if self.verbose > 0 { self.verbose } else { default } {
            0 => LogLevelNum::Off,
            1 => LogLevelNum::Error,
            2 => LogLevelNum::Warn,
            3 => LogLevelNum::Info,
            4 => LogLevelNum::Debug,
            _ => LogLevelNum::Trace,
        }
    }

    /// Install ``stderrlog`` as the ``log`` backend.
    ///
    /// Resolution diagnostics are emitted at warn (forced picks) and debug
    /// (default-label fallbacks), so `-vvvv` shows every fallback.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(self.level(default))
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}
