use std::time::Duration;

use log::LevelFilter;

use crate::algorithm::{Rate, BUFFER_SIZE, MIN_SLEEP_MS};

/// バッファサイズの上限
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Options {
    // 転送オプション
    pub rate: Rate,
    pub buffer_size: usize,
    pub min_sleep: Duration,

    // 出力・表示オプション
    pub verbose: u8,
    pub quiet: bool,
    pub progress: bool,
    pub stats: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            // 転送オプション
            rate: Rate::Unlimited,
            buffer_size: BUFFER_SIZE,
            min_sleep: Duration::from_millis(MIN_SLEEP_MS as u64),

            // 出力・表示オプション
            verbose: 0,
            quiet: false,
            progress: false,
            stats: false,
        }
    }
}

impl Options {
    /// -q / -v からログレベルを決める（RUST_LOG が優先）
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
