//! 帯域制限付きコピーループ
//!
//! 入力からチャンクを読み、そのまま出力に書き、目標レートでかかるはずの
//! 時間（名目時間）と実際にかかった時間の差だけ眠る。短すぎるスリープは
//! 当てにならないので `MIN_SLEEP_MS` 以下の差は次のチャンクに持ち越し、
//! 寝過ごし・寝不足の誤差もドリフトとして持ち越す。

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use log::{debug, trace};

use crate::algorithm::clock::{Clock, MonotonicClock};
use crate::algorithm::Rate;
use crate::error::{Result, ThrotError};
use crate::output::TransferStats;

/// 転送バッファのデフォルトサイズ
pub const BUFFER_SIZE: usize = 16384;

/// これより短いスリープは発行しない (ms)
pub const MIN_SLEEP_MS: i64 = 100;

pub struct Throttle<C: Clock = MonotonicClock> {
    rate: Rate,
    buffer_size: usize,
    min_sleep_ms: i64,
    clock: C,
    /// 符号付きの残差 (ms)
    adjust: i64,
    stats: TransferStats,
}

impl Throttle<MonotonicClock> {
    pub fn new(rate: Rate) -> Self {
        Self::with_clock(rate, MonotonicClock::new())
    }
}

impl<C: Clock> Throttle<C> {
    pub fn with_clock(rate: Rate, clock: C) -> Self {
        Throttle {
            rate,
            buffer_size: BUFFER_SIZE,
            min_sleep_ms: MIN_SLEEP_MS,
            clock,
            adjust: 0,
            stats: TransferStats::new(),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_min_sleep(mut self, min_sleep: Duration) -> Self {
        self.min_sleep_ms = i64::try_from(min_sleep.as_millis()).unwrap_or(i64::MAX);
        self
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn stats(&self) -> &TransferStats {
        &self.stats
    }

    /// 入力の終端までコピーする
    #[allow(dead_code)]
    pub fn copy<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<TransferStats>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.copy_with_progress(input, output, |_| {})
    }

    /// 入力の終端までコピーし、チャンクごとに `on_chunk` を呼ぶ
    ///
    /// 入出力は借りるだけで閉じない。読み込み・書き込みの `Interrupted` は
    /// その場でリトライし、それ以外のエラーでループを中断する。
    pub fn copy_with_progress<R, W, F>(
        &mut self,
        input: &mut R,
        output: &mut W,
        mut on_chunk: F,
    ) -> Result<TransferStats>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
        F: FnMut(&TransferStats),
    {
        let mut buf = vec![0u8; self.buffer_size];
        let run_start = self.clock.now_ms();

        let result = loop {
            let start = self.clock.now_ms();

            let n = match read_chunk(input, &mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => break Err(e),
            };

            // write_all は短い書き込みと Interrupted を吸収する
            if let Err(e) = output.write_all(&buf[..n]).and_then(|_| output.flush()) {
                break Err(ThrotError::Write(e));
            }

            let end = self.clock.now_ms();

            self.stats.bytes_copied += n as u64;
            self.stats.chunks += 1;
            trace!("chunk of {} bytes copied in {} ms", n, end - start);

            if let Some(rate) = self.rate.bytes_per_sec() {
                self.regulate(n, rate, end - start);
            }

            self.stats.elapsed = elapsed_since(run_start, self.clock.now_ms());
            on_chunk(&self.stats);
        };

        self.stats.elapsed = elapsed_since(run_start, self.clock.now_ms());
        self.stats.drift_ms = self.adjust;
        result.map(|_| self.stats.clone())
    }

    /// 1チャンク分の名目時間と実測時間の差を眠る
    fn regulate(&mut self, n: usize, rate: u64, elapsed_ms: i64) {
        let nominal_ms = i64::try_from(1000 * n as u64 / rate).unwrap_or(i64::MAX);
        let delta = nominal_ms
            .saturating_sub(elapsed_ms)
            .saturating_add(self.adjust);

        if delta > self.min_sleep_ms {
            let sleep_start = self.clock.now_ms();
            self.clock.sleep_ms(delta);
            let sleep_end = self.clock.now_ms();

            let slept = sleep_end - sleep_start;
            self.adjust = delta - slept;
            self.stats.sleeps += 1;
            self.stats.slept += Duration::from_millis(slept.max(0) as u64);
            debug!("slept {} ms of {} ms requested, drift {} ms", slept, delta, self.adjust);
        } else {
            // delta は既に adjust を含んでいる
            self.adjust = delta;
        }
    }
}

fn read_chunk<R: Read + ?Sized>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match input.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ThrotError::Read(e)),
        }
    }
}

fn elapsed_since(start_ms: i64, now_ms: i64) -> Duration {
    Duration::from_millis((now_ms - start_ms).max(0) as u64)
}
