//! Candlestick conversion for one market.
//!
//! Combines the bar builder and complement deriver: each candlestick of the
//! primary token yields its own quote bar, the opposite token's quote bar,
//! and a trade bar when something traded.

use chrono::{DateTime, TimeZone};
use kalshi_core::config::RequestConfig;
use kalshi_core::units::zoned_to_unix_seconds;
use kalshi_core::{Candlestick, Config, ContractSymbol, QuoteBar, Result, TimestampSec, TradeBar};
use tracing::debug;

use crate::bar_builder::BarBuilder;
use crate::date_ranges::generate_date_ranges;

/// Bars produced from one candlestick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedCandle {
    /// Quote bar of the candlestick's own token.
    pub primary: QuoteBar,
    /// Quote bar of the opposite token.
    pub opposite: QuoteBar,
    /// Trade bar, when a valid trade price existed.
    pub trade: Option<TradeBar>,
}

/// Bars produced from a candlestick series, in input order.
#[derive(Debug, Clone, Default)]
pub struct ConvertedSeries {
    pub primary: Vec<QuoteBar>,
    pub opposite: Vec<QuoteBar>,
    pub trades: Vec<TradeBar>,
    pub stats: ConversionStats,
}

/// Counters describing the input series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Candlesticks processed.
    pub candles: u64,
    /// Candlesticks without a YES bid.
    pub missing_bid: u64,
    /// Candlesticks without a YES ask.
    pub missing_ask: u64,
    /// Trade bars emitted.
    pub trade_bars: u64,
    /// Quote sides violating `low <= open, close <= high`. Counted, not corrected.
    pub inconsistent_sides: u64,
}

impl ConversionStats {
    /// Fraction of candlesticks that produced a trade bar.
    pub fn trade_frac(&self) -> f64 {
        if self.candles > 0 {
            self.trade_bars as f64 / self.candles as f64
        } else {
            0.0
        }
    }

    fn record(&mut self, converted: &ConvertedCandle) {
        self.candles += 1;
        if converted.primary.bid.is_none() {
            self.missing_bid += 1;
        }
        if converted.primary.ask.is_none() {
            self.missing_ask += 1;
        }
        if converted.trade.is_some() {
            self.trade_bars += 1;
        }
        self.inconsistent_sides += [&converted.primary.bid, &converted.primary.ask]
            .into_iter()
            .flatten()
            .filter(|side| !side.ohlc.is_consistent())
            .count() as u64;
    }

    /// Reset statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Converts candlesticks of a primary token into bars for both tokens.
#[derive(Debug, Clone, Default)]
pub struct CandleConverter {
    builder: BarBuilder,
}

impl CandleConverter {
    pub fn new(builder: BarBuilder) -> Self {
        Self { builder }
    }

    /// Create a converter from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(BarBuilder::from_config(config)?))
    }

    pub fn builder(&self) -> &BarBuilder {
        &self.builder
    }

    /// Convert a single candlestick.
    pub fn convert(&self, candle: &Candlestick, primary: &ContractSymbol) -> ConvertedCandle {
        ConvertedCandle {
            primary: self.builder.quote_bar(candle, primary),
            opposite: self.builder.opposite_quote_bar(candle, primary),
            trade: self.builder.trade_bar(candle, primary),
        }
    }

    /// Convert a series of candlesticks.
    pub fn convert_all(&self, candles: &[Candlestick], primary: &ContractSymbol) -> ConvertedSeries {
        let mut series = ConvertedSeries {
            primary: Vec::with_capacity(candles.len()),
            opposite: Vec::with_capacity(candles.len()),
            trades: Vec::new(),
            stats: ConversionStats::default(),
        };

        for candle in candles {
            let converted = self.convert(candle, primary);
            series.stats.record(&converted);
            series.primary.push(converted.primary);
            series.opposite.push(converted.opposite);
            if let Some(trade) = converted.trade {
                series.trades.push(trade);
            }
        }

        debug!(
            symbol = %primary,
            candles = series.stats.candles,
            trade_bars = series.stats.trade_bars,
            missing_bid = series.stats.missing_bid,
            missing_ask = series.stats.missing_ask,
            inconsistent_sides = series.stats.inconsistent_sides,
            "converted candlestick series"
        );
        series
    }
}

/// Epoch-second `(start_ts, end_ts)` windows for candlestick requests over `[start, end)`.
pub fn request_windows<Z>(
    start: DateTime<Z>,
    end: DateTime<Z>,
    config: &RequestConfig,
) -> Vec<(TimestampSec, TimestampSec)>
where
    Z: TimeZone,
{
    generate_date_ranges(start, end, config.interval_days)
        .map(|(from, to)| (zoned_to_unix_seconds(&from), zoned_to_unix_seconds(&to)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use kalshi_core::{CentsOhlc, Outcome, TradePriceCents, EXCHANGE_TIMEZONE};

    fn cents(open: i64, high: i64, low: i64, close: i64) -> CentsOhlc {
        CentsOhlc { open, high, low, close }
    }

    fn make_candle(end_period_ts: i64, traded: bool) -> Candlestick {
        Candlestick {
            end_period_ts,
            yes_bid: Some(cents(40, 45, 38, 44)),
            yes_ask: if traded { Some(cents(42, 47, 41, 46)) } else { None },
            price: Some(TradePriceCents {
                open: Some(41),
                high: Some(44),
                low: Some(40),
                close: Some(43),
                is_valid: traded,
            }),
            volume: if traded { 10 } else { 0 },
        }
    }

    #[test]
    fn test_convert_single() {
        let converter = CandleConverter::default();
        let symbol = ContractSymbol::yes("T");

        let converted = converter.convert(&make_candle(1_704_067_260, true), &symbol);

        assert_eq!(converted.primary.symbol.outcome, Outcome::Yes);
        assert_eq!(converted.opposite.symbol.outcome, Outcome::No);
        assert_eq!(converted.primary.start, converted.opposite.start);
        assert!(converted.trade.is_some());
    }

    #[test]
    fn test_convert_all_keeps_order_and_counts() {
        let converter = CandleConverter::default();
        let candles = vec![
            make_candle(1_704_067_260, true),
            make_candle(1_704_067_320, false),
            make_candle(1_704_067_380, true),
        ];

        let series = converter.convert_all(&candles, &ContractSymbol::yes("T"));

        assert_eq!(series.primary.len(), 3);
        assert_eq!(series.opposite.len(), 3);
        assert_eq!(series.trades.len(), 2);
        assert!(series.primary.windows(2).all(|w| w[0].start < w[1].start));
        assert_eq!(series.primary[1].end().timestamp(), 1_704_067_320);

        assert_eq!(series.stats.candles, 3);
        assert_eq!(series.stats.missing_bid, 0);
        assert_eq!(series.stats.missing_ask, 1);
        assert_eq!(series.stats.trade_bars, 2);
        assert_eq!(series.stats.inconsistent_sides, 0);
        assert!((series.stats.trade_frac() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_inconsistent_sides_counted_not_corrected() {
        let converter = CandleConverter::default();
        let mut candle = make_candle(1_704_067_260, false);
        candle.yes_bid = Some(cents(40, 30, 35, 50));

        let series = converter.convert_all(&[candle], &ContractSymbol::yes("T"));

        assert_eq!(series.stats.inconsistent_sides, 1);
        assert_eq!(series.primary[0].bid.unwrap().ohlc.high, rust_decimal_macros::dec!(0.30));
    }

    #[test]
    fn test_convert_exchange_payload() {
        let json = r#"[
            {"end_period_ts": 1704067260,
             "yes_bid": {"open": 40, "high": 45, "low": 38, "close": 44},
             "yes_ask": {"open": 42, "high": 47, "low": 41, "close": 46},
             "price": {"open": 41, "high": 44, "low": 40, "close": 43, "mean": 42, "previous": 40},
             "volume": 10, "open_interest": 120},
            {"end_period_ts": 1704067320,
             "yes_bid": null,
             "yes_ask": {"open": 46, "high": 46, "low": 45, "close": 45},
             "price": {"open": null, "high": null, "low": null, "close": null, "mean": null, "previous": 43},
             "volume": 0, "open_interest": 120}
        ]"#;
        let candles: Vec<Candlestick> = serde_json::from_str(json).unwrap();

        let series = CandleConverter::default().convert_all(&candles, &ContractSymbol::yes("T"));

        assert_eq!(series.trades.len(), 1);
        assert!(series.primary[1].bid.is_none());
        assert!(series.opposite[1].ask.is_none());
        let no_bid = series.opposite[1].bid.unwrap().ohlc;
        assert_eq!(no_bid.high, rust_decimal_macros::dec!(0.55));
        assert_eq!(no_bid.low, rust_decimal_macros::dec!(0.54));
    }

    #[test]
    fn test_empty_series() {
        let series = CandleConverter::default().convert_all(&[], &ContractSymbol::yes("T"));
        assert!(series.primary.is_empty());
        assert_eq!(series.stats, ConversionStats::default());
        assert_eq!(series.stats.trade_frac(), 0.0);
    }

    #[test]
    fn test_request_windows() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + TimeDelta::days(5);

        let windows = request_windows(start, end, &RequestConfig::default());

        assert_eq!(
            windows,
            vec![
                (1_704_067_200, 1_704_067_200 + 3 * 86_400),
                (1_704_067_200 + 3 * 86_400, 1_704_067_200 + 5 * 86_400),
            ]
        );
    }

    #[test]
    fn test_request_windows_in_exchange_zone() {
        let start = EXCHANGE_TIMEZONE.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + TimeDelta::days(1);

        let windows = request_windows(start, end, &RequestConfig { interval_days: 3 });

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].0, start.timestamp());
        assert_eq!(windows[0].1 - windows[0].0, 86_400);
    }
}
