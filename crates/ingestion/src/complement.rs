//! Opposite-token quote bars.
//!
//! In a binary market the NO token trades at `1 - YES`. Someone bidding for
//! YES is offering NO and vice versa, so the NO bid comes from the YES ask
//! and the NO ask from the YES bid. Complementing reverses order, which is
//! why highs and lows trade places.

use kalshi_core::{Candlestick, CentsOhlc, ContractSymbol, Ohlc, QuoteBar, QuoteSide, Volume};
use tracing::trace;

use crate::bar_builder::PeriodFrame;

/// Complement one side of the primary token's quotes.
pub fn complement_side(ohlc: &CentsOhlc, size: Volume) -> QuoteSide {
    QuoteSide {
        ohlc: Ohlc::from_cents(ohlc).complement(),
        last_size: size,
    }
}

/// Quote bar for `primary.opposite()`, built from the primary's candlestick.
///
/// A missing source side leaves the matching opposite side empty.
pub fn complement_quote_bar(
    candle: &Candlestick,
    primary: &ContractSymbol,
    frame: &PeriodFrame,
) -> QuoteBar {
    let symbol = primary.opposite();
    trace!(primary = %primary, opposite = %symbol, end_ts = candle.end_period_ts, "deriving opposite quote bar");

    QuoteBar {
        symbol,
        start: frame.start,
        period: frame.period(),
        bid: candle.yes_ask.as_ref().map(|ask| complement_side(ask, candle.volume)),
        ask: candle.yes_bid.as_ref().map(|bid| complement_side(bid, candle.volume)),
    }
}
