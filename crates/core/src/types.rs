//! Core data types for the kalshi-bars system.
//!
//! Input types mirror the exchange's candlestick payload (integer cents);
//! output types carry exact decimal probabilities.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::units::{cents_to_decimal, cents_to_decimal_opt, complement};

/// Timestamp in seconds since Unix epoch (UTC), as reported by the exchange.
pub type TimestampSec = i64;

/// Price in integer cents. Expected in [0, 100] but not validated.
pub type Cents = i64;

/// Contract count.
pub type Volume = u64;

/// OHLC in integer cents for one side (bid or ask) of the YES token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentsOhlc {
    pub open: Cents,
    pub high: Cents,
    pub low: Cents,
    pub close: Cents,
}

/// Last-trade price summary in cents.
///
/// Individual fields can be null upstream. `is_valid` is taken from the
/// payload when present, otherwise a price is valid when it has a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTradePrice")]
pub struct TradePriceCents {
    pub open: Option<Cents>,
    pub high: Option<Cents>,
    pub low: Option<Cents>,
    pub close: Option<Cents>,
    pub is_valid: bool,
}

#[derive(Deserialize)]
struct RawTradePrice {
    open: Option<Cents>,
    high: Option<Cents>,
    low: Option<Cents>,
    close: Option<Cents>,
    is_valid: Option<bool>,
}

impl From<RawTradePrice> for TradePriceCents {
    fn from(raw: RawTradePrice) -> Self {
        Self {
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            is_valid: raw.is_valid.unwrap_or(raw.close.is_some()),
        }
    }
}

/// A single candlestick for the YES token of a binary market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candlestick {
    /// End of the bar period (seconds since epoch).
    pub end_period_ts: TimestampSec,
    /// YES bid OHLC; absent when nobody quoted a bid in the period.
    #[serde(default)]
    pub yes_bid: Option<CentsOhlc>,
    /// YES ask OHLC; absent when nobody quoted an ask in the period.
    #[serde(default)]
    pub yes_ask: Option<CentsOhlc>,
    /// Last-trade price; absent or invalid when nothing traded.
    #[serde(default)]
    pub price: Option<TradePriceCents>,
    /// Contracts traded in the period.
    #[serde(default)]
    pub volume: Volume,
}

impl Candlestick {
    /// Trade price, only when present and flagged valid.
    #[inline]
    pub fn valid_price(&self) -> Option<&TradePriceCents> {
        self.price.as_ref().filter(|p| p.is_valid)
    }
}

/// Decimal OHLC in probability units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Ohlc {
    pub fn new(open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Self {
        Self { open, high, low, close }
    }

    /// Convert each cents field to a probability.
    pub fn from_cents(ohlc: &CentsOhlc) -> Self {
        Self {
            open: cents_to_decimal(ohlc.open),
            high: cents_to_decimal(ohlc.high),
            low: cents_to_decimal(ohlc.low),
            close: cents_to_decimal(ohlc.close),
        }
    }

    /// Convert a trade price, reading missing fields as zero.
    pub fn from_trade_price(price: &TradePriceCents) -> Self {
        Self {
            open: cents_to_decimal_opt(price.open),
            high: cents_to_decimal_opt(price.high),
            low: cents_to_decimal_opt(price.low),
            close: cents_to_decimal_opt(price.close),
        }
    }

    /// OHLC of the opposite outcome token.
    ///
    /// `x -> 1 - x` reverses ordering, so the new high comes from the old
    /// low and the new low from the old high.
    pub fn complement(&self) -> Self {
        Self {
            open: complement(self.open),
            high: complement(self.low),
            low: complement(self.high),
            close: complement(self.close),
        }
    }

    /// Whether `low <= open, close <= high`.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open
            && self.low <= self.close
            && self.open <= self.high
            && self.close <= self.high
    }

    /// Element-wise midpoint with another OHLC.
    pub fn midpoint(&self, other: &Ohlc) -> Self {
        let two = Decimal::TWO;
        Self {
            open: (self.open + other.open) / two,
            high: (self.high + other.high) / two,
            low: (self.low + other.low) / two,
            close: (self.close + other.close) / two,
        }
    }
}

/// Which token of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// The complementary token.
    pub fn opposite(self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Yes => "YES",
            Outcome::No => "NO",
        }
    }
}

/// Identity of one tradable token: market ticker plus outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractSymbol {
    pub ticker: String,
    pub outcome: Outcome,
}

impl ContractSymbol {
    pub fn new(ticker: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            ticker: ticker.into(),
            outcome,
        }
    }

    pub fn yes(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Outcome::Yes)
    }

    pub fn no(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Outcome::No)
    }

    /// Same market, other token.
    pub fn opposite(&self) -> Self {
        Self {
            ticker: self.ticker.clone(),
            outcome: self.outcome.opposite(),
        }
    }
}

impl fmt::Display for ContractSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ticker, self.outcome.as_str())
    }
}

/// One side of a quote bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSide {
    pub ohlc: Ohlc,
    /// Size attached to the last quote of the period.
    pub last_size: Volume,
}

/// Two-sided quote bar covering `[start, start + period)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBar {
    pub symbol: ContractSymbol,
    /// Bar open time in exchange-local time.
    pub start: DateTime<Tz>,
    pub period: TimeDelta,
    pub bid: Option<QuoteSide>,
    pub ask: Option<QuoteSide>,
}

impl QuoteBar {
    /// Bar close time.
    #[inline]
    pub fn end(&self) -> DateTime<Tz> {
        self.start + self.period
    }

    /// Bid/ask midpoint OHLC, when both sides were quoted.
    pub fn mid(&self) -> Option<Ohlc> {
        match (&self.bid, &self.ask) {
            (Some(bid), Some(ask)) => Some(bid.ohlc.midpoint(&ask.ohlc)),
            _ => None,
        }
    }

    /// Spread at close, when both sides were quoted.
    pub fn spread_close(&self) -> Option<Decimal> {
        match (&self.bid, &self.ask) {
            (Some(bid), Some(ask)) => Some(ask.ohlc.close - bid.ohlc.close),
            _ => None,
        }
    }
}

/// Trade bar covering `[start, start + period)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeBar {
    pub symbol: ContractSymbol,
    pub start: DateTime<Tz>,
    pub period: TimeDelta,
    pub ohlc: Ohlc,
    pub volume: Volume,
}

impl TradeBar {
    /// Bar close time.
    #[inline]
    pub fn end(&self) -> DateTime<Tz> {
        self.start + self.period
    }
}

/// Candlestick resolution supported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[serde(alias = "1m")]
    Minute,
    #[serde(alias = "1h")]
    Hour,
    #[serde(alias = "1d", alias = "day")]
    Daily,
}

impl Resolution {
    /// Bar period length.
    pub fn period(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.period_interval_minutes()))
    }

    /// Value of the exchange's `period_interval` request parameter.
    pub fn period_interval_minutes(self) -> u32 {
        match self {
            Resolution::Minute => 1,
            Resolution::Hour => 60,
            Resolution::Daily => 1440,
        }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1m" | "minute" => Ok(Resolution::Minute),
            "1h" | "hour" => Ok(Resolution::Hour),
            "1d" | "daily" | "day" => Ok(Resolution::Daily),
            other => Err(Error::config(format!("unknown resolution '{other}'"))),
        }
    }
}
