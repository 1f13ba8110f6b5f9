//! Core types and configuration for the kalshi-bars system.
//!
//! This crate provides shared types used across the workspace:
//! - Exchange candlestick input types (cents)
//! - Decimal OHLC, quote bars and trade bars
//! - Unit conversion (cents, epoch seconds, exchange-local time)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;
pub mod units;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
pub use units::EXCHANGE_TIMEZONE;
