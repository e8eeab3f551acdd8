use std::time::{Duration, Instant};

/// ミリ秒単位の単調クロックとスリープ
///
/// コピーループはこのトレイト越しに時間を扱うので、テストでは決定的な
/// クロックに差し替えられる。
pub trait Clock {
    /// 単調増加するミリ秒
    fn now_ms(&mut self) -> i64;

    /// `ms` ミリ秒スリープする（0 以下なら何もしない）
    fn sleep_ms(&mut self, ms: i64);
}

/// `Instant` ベースの実クロック
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&mut self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    fn sleep_ms(&mut self, ms: i64) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}
