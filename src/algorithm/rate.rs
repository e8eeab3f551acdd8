use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::error::{Result, ThrotError};

/// "inf" を表すリテラル（スロットリングなし）
pub const UNLIMITED_LITERAL: &str = "inf";

/// 転送レート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rate {
    /// スロットリングなし
    Unlimited,
    /// bytes/sec
    Limited(NonZeroU64),
}

impl Rate {
    /// レート式をパースする
    ///
    /// `"inf"` は [`Rate::Unlimited`] になる。それ以外で結果が 0 以下になる
    /// 式（`"0"`, `"0.1"`, `"-5k"` など）はエラー。
    pub fn parse(value: &str) -> Result<Self> {
        if value == UNLIMITED_LITERAL {
            return Ok(Rate::Unlimited);
        }

        let bytes = parse_bytes(value)?;
        match u64::try_from(bytes).ok().and_then(NonZeroU64::new) {
            Some(rate) => Ok(Rate::Limited(rate)),
            None => Err(ThrotError::NonPositiveRate(value.to_string())),
        }
    }

    pub fn bytes_per_sec(&self) -> Option<u64> {
        match self {
            Rate::Unlimited => None,
            Rate::Limited(rate) => Some(rate.get()),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Rate::Unlimited)
    }
}

impl FromStr for Rate {
    type Err = ThrotError;

    fn from_str(s: &str) -> Result<Self> {
        Rate::parse(s)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Unlimited => write!(f, "unlimited"),
            Rate::Limited(rate) => write!(f, "{} B/s", rate),
        }
    }
}

/// K/M/G/T (大文字小文字を区別しない) 付きのサイズ式をバイト数に変換する
///
/// `"inf"` は 0 を返す。結果は切り捨てられ、`i64` の範囲に飽和する。
/// 負の値はここでは拒否しない。
pub fn parse_bytes(value: &str) -> Result<i64> {
    if value == UNLIMITED_LITERAL {
        return Ok(0);
    }

    let invalid = || ThrotError::InvalidRate(value.to_string());

    let trimmed = value.trim_matches(|c: char| c.is_ascii_whitespace());
    let last = trimmed.chars().last().ok_or_else(invalid)?;

    let (body, multiplier) = match suffix_multiplier(last) {
        Some(mult) => (&trimmed[..trimmed.len() - last.len_utf8()], mult),
        None => (trimmed, 1.0),
    };

    let body = body.trim_matches(|c: char| c.is_ascii_whitespace());
    if body.is_empty() || !body.bytes().any(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // f64::from_str は "NaN" や "infinity" も受け付けるので、10進数の文字だけに絞る
    if !body
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return Err(invalid());
    }

    let number: f64 = body.parse().map_err(|_| invalid())?;

    // f64 -> i64 の `as` は飽和する
    Ok((number * multiplier).floor() as i64)
}

fn suffix_multiplier(c: char) -> Option<f64> {
    match c.to_ascii_lowercase() {
        'k' => Some(1024.0),
        'm' => Some(1_048_576.0),
        'g' => Some(1_073_741_824.0),
        't' => Some(1_099_511_627_776.0),
        _ => None,
    }
}
