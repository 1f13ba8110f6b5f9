//! Candlestick normalization for the kalshi-bars system.
//!
//! This crate handles:
//! - Quote and trade bar building with end-anchored period framing
//! - Opposite-token quote bars via probability complement
//! - Splitting long queries into bounded date windows
//! - Series conversion for one market

pub mod bar_builder;
pub mod complement;
pub mod converter;
pub mod date_ranges;

pub use bar_builder::{BarBuilder, PeriodFrame};
pub use complement::{complement_quote_bar, complement_side};
pub use converter::{request_windows, CandleConverter, ConversionStats, ConvertedCandle, ConvertedSeries};
pub use date_ranges::{generate_date_ranges, DateRanges, DEFAULT_INTERVAL_DAYS};
