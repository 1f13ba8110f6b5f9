//! Unit conversion between exchange units and bar units.
//!
//! - Integer cents <-> decimal probability
//! - Epoch seconds <-> exchange-local civil time

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Cents, TimestampSec};

/// Exchange calendar (North-American Eastern).
pub const EXCHANGE_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Convert cents to a probability: `cents / 100`, exact.
#[inline]
pub fn cents_to_decimal(cents: Cents) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert optional cents to a probability; absent reads as zero.
#[inline]
pub fn cents_to_decimal_opt(cents: Option<Cents>) -> Decimal {
    cents_to_decimal(cents.unwrap_or(0))
}

/// Probability of the opposite outcome: `1 - p`.
#[inline]
pub fn complement(probability: Decimal) -> Decimal {
    Decimal::ONE - probability
}

/// Interpret epoch seconds as UTC and express them in `zone`'s civil time.
///
/// Seconds outside chrono's range saturate to the nearest representable
/// instant.
pub fn unix_seconds_to_local(seconds: TimestampSec, zone: &Tz) -> DateTime<Tz> {
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_else(|| {
        warn!(seconds, "epoch seconds out of range, saturating");
        if seconds < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }
    });
    utc.with_timezone(zone)
}

/// Epoch seconds of a zoned datetime. Exact inverse of [`unix_seconds_to_local`].
#[inline]
pub fn zoned_to_unix_seconds<Z: TimeZone>(dt: &DateTime<Z>) -> TimestampSec {
    dt.timestamp()
}

/// Epoch seconds of a wall-clock time in `zone`, or in UTC when `zone` is `None`.
///
/// Ambiguous wall times (clocks falling back) take the earlier instant.
/// Wall times skipped by clocks springing forward use the offset in force
/// before the transition, which lands them after the gap.
pub fn local_to_unix_seconds(dt: NaiveDateTime, zone: Option<&Tz>) -> TimestampSec {
    let Some(zone) = zone else {
        return dt.and_utc().timestamp();
    };

    match zone.from_local_datetime(&dt) {
        LocalResult::Single(zoned) => zoned.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => {
            let before = zone
                .offset_from_utc_datetime(&(dt - TimeDelta::days(1)))
                .fix();
            let utc = dt - TimeDelta::seconds(i64::from(before.local_minus_utc()));
            utc.and_utc().timestamp()
        }
    }
}

/// Parse an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| Error::timezone(name))
}
