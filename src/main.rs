mod algorithm;
mod cli;
mod error;
mod options;
mod output;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use algorithm::Throttle;
use cli::Cli;
use options::Options;
use output::ProgressDisplay;

fn main() -> ExitCode {
    // コマンドライン引数のパース（不正な引数は clap が usage を出して終了する）
    let cli = Cli::parse();

    let options = match cli.into_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("throt: {}", e);
            return ExitCode::from(2);
        }
    };

    // ロガーの初期化（RUST_LOG が優先）
    env_logger::Builder::new()
        .filter_level(options.log_level())
        .parse_default_env()
        .init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("copy failed: {:?}", e);
            eprintln!("throt: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> anyhow::Result<()> {
    info!(
        "throttling stdin -> stdout at {} (buffer {} bytes, min sleep {:?})",
        options.rate, options.buffer_size, options.min_sleep
    );
    if options.rate.is_unlimited() {
        info!("no rate limit given, copying without sleeps");
    }

    let mut throttle = Throttle::new(options.rate)
        .with_buffer_size(options.buffer_size)
        .with_min_sleep(options.min_sleep);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let progress = options.progress.then(ProgressDisplay::new);
    let result = throttle.copy_with_progress(&mut input, &mut output, |stats| {
        if let Some(ref progress) = progress {
            progress.update(stats);
        }
    });

    if let Some(ref progress) = progress {
        progress.finish();
    }
    if options.stats {
        throttle.stats().print(throttle.rate());
    }

    let stats = result.context("throttled copy aborted")?;
    info!(
        "copied {} bytes in {:?} ({:.2} B/s)",
        stats.bytes_copied,
        stats.elapsed,
        stats.throughput()
    );
    Ok(())
}
