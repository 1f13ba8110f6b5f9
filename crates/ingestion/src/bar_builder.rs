//! Quote and trade bar building from exchange candlesticks.
//!
//! The candlestick's end timestamp is authoritative: every bar ends exactly
//! at `end_period_ts` (in exchange-local time) and starts one period earlier.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use kalshi_core::units::unix_seconds_to_local;
use kalshi_core::{
    Candlestick, CentsOhlc, Config, ContractSymbol, Ohlc, QuoteBar, QuoteSide, Resolution,
    Result, TimestampSec, TradeBar, Volume, EXCHANGE_TIMEZONE,
};
use tracing::{trace, warn};

use crate::complement::complement_quote_bar;

/// Time span of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodFrame {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl PeriodFrame {
    /// Frame ending at `end_period_ts` and spanning `period`.
    ///
    /// A start before chrono's earliest instant is clamped to that instant.
    pub fn ending_at(end_period_ts: TimestampSec, period: TimeDelta, zone: &Tz) -> Self {
        let end = unix_seconds_to_local(end_period_ts, zone);
        let start = end.checked_sub_signed(period).unwrap_or_else(|| {
            warn!(end_period_ts, "bar start out of range, clamping");
            DateTime::<Utc>::MIN_UTC.with_timezone(zone)
        });
        Self { start, end }
    }

    #[inline]
    pub fn period(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Builds bars from candlesticks for one exchange calendar and resolution.
#[derive(Debug, Clone)]
pub struct BarBuilder {
    zone: Tz,
    resolution: Resolution,
}

impl BarBuilder {
    /// Create a bar builder.
    pub fn new(zone: Tz, resolution: Resolution) -> Self {
        Self { zone, resolution }
    }

    /// Create a bar builder from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.exchange_zone()?, config.bars.resolution))
    }

    /// Exchange timezone.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Bar period length.
    #[inline]
    pub fn period(&self) -> TimeDelta {
        self.resolution.period()
    }

    /// Frame for a candlestick ending at `end_period_ts`.
    pub fn period_frame(&self, end_period_ts: TimestampSec) -> PeriodFrame {
        PeriodFrame::ending_at(end_period_ts, self.period(), &self.zone)
    }

    /// Quote bar for the candlestick's own token.
    ///
    /// A side with no quotes in the period is left empty, not zero-filled.
    pub fn quote_bar(&self, candle: &Candlestick, symbol: &ContractSymbol) -> QuoteBar {
        let frame = self.period_frame(candle.end_period_ts);
        let bar = QuoteBar {
            symbol: symbol.clone(),
            start: frame.start,
            period: self.period(),
            bid: candle.yes_bid.as_ref().map(|ohlc| quote_side(ohlc, candle.volume)),
            ask: candle.yes_ask.as_ref().map(|ohlc| quote_side(ohlc, candle.volume)),
        };
        trace!(
            symbol = %symbol,
            start = %bar.start,
            has_bid = bar.bid.is_some(),
            has_ask = bar.ask.is_some(),
            "built quote bar"
        );
        bar
    }

    /// Trade bar, only when the candlestick carries a valid trade price.
    pub fn trade_bar(&self, candle: &Candlestick, symbol: &ContractSymbol) -> Option<TradeBar> {
        let Some(price) = candle.valid_price() else {
            trace!(symbol = %symbol, end_ts = candle.end_period_ts, "no valid trade price");
            return None;
        };
        let frame = self.period_frame(candle.end_period_ts);
        Some(TradeBar {
            symbol: symbol.clone(),
            start: frame.start,
            period: self.period(),
            ohlc: Ohlc::from_trade_price(price),
            volume: candle.volume,
        })
    }

    /// Quote bar for the opposite token, derived from the same candlestick.
    pub fn opposite_quote_bar(&self, candle: &Candlestick, symbol: &ContractSymbol) -> QuoteBar {
        let frame = self.period_frame(candle.end_period_ts);
        complement_quote_bar(candle, symbol, &frame)
    }
}

impl Default for BarBuilder {
    fn default() -> Self {
        Self::new(EXCHANGE_TIMEZONE, Resolution::Minute)
    }
}

fn quote_side(ohlc: &CentsOhlc, size: Volume) -> QuoteSide {
    QuoteSide {
        ohlc: Ohlc::from_cents(ohlc),
        last_size: size,
    }
}
