use clap::{ArgAction, Parser};
use std::time::Duration;

use crate::algorithm::{parse_bytes, Rate};
use crate::error::{Result, ThrotError};
use crate::options::{Options, MAX_BUFFER_SIZE};

#[derive(Parser, Debug)]
#[command(name = "throt")]
#[command(version)]
#[command(about = "Throttles data flow through a pipe (stdin -> stdout)", long_about = None)]
#[command(after_help = "RATE may be a float followed by (case-insensitive): K, M, G, T\n\
                        Use \"inf\" to copy without throttling.")]
pub struct Cli {
    /// Rate in bytes per second, e.g. 512, 1.5M, 10k, inf
    #[arg(value_parser = parse_rate)]
    pub rate: Rate,

    // 転送オプション
    /// Size of the transfer buffer (suffixes K, M accepted)
    #[arg(short = 'b', long = "buffer-size", default_value = "16384")]
    pub buffer_size: String,

    /// Shortest sleep worth issuing, in milliseconds
    #[arg(long = "min-sleep", value_name = "MS", default_value_t = 100)]
    pub min_sleep: u64,

    // 出力・表示オプション
    /// Show progress on stderr during transfer
    #[arg(long = "progress")]
    pub progress: bool,

    /// Print transfer stats on stderr when done
    #[arg(long = "stats")]
    pub stats: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error messages
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// CLIからOptionsに変換
    pub fn into_options(self) -> Result<Options> {
        let mut options = Options::default();

        // 転送オプション
        options.rate = self.rate;
        options.buffer_size = parse_buffer_size(&self.buffer_size)?;
        options.min_sleep = Duration::from_millis(self.min_sleep);

        // 出力・表示オプション
        options.progress = self.progress;
        options.stats = self.stats;
        options.verbose = self.verbose;
        options.quiet = self.quiet;

        Ok(options)
    }
}

fn parse_rate(s: &str) -> Result<Rate> {
    Rate::parse(s)
}

fn parse_buffer_size(s: &str) -> Result<usize> {
    let invalid = || {
        ThrotError::InvalidOption(format!(
            "Invalid buffer size: {}. Expected 1 to {} bytes",
            s, MAX_BUFFER_SIZE
        ))
    };

    if s == crate::algorithm::rate::UNLIMITED_LITERAL {
        return Err(invalid());
    }
    let size = parse_bytes(s).map_err(|_| invalid())?;
    match usize::try_from(size) {
        Ok(size) if (1..=MAX_BUFFER_SIZE).contains(&size) => Ok(size),
        _ => Err(invalid()),
    }
}
