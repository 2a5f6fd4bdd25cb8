//! Tradewind Core - Domain types
//!
//! This crate contains the fundamental types used across Tradewind:
//! - `Amount`: Fixed-point asset amount (7 decimal places, scaled i64)
//! - `Asset`: Native currency or (code, issuer) credit asset
//! - `AssetPair`: Normalized asset pair keying an order book
//! - `Price`: Exact rational price with cross-multiplied ordering

pub mod amount;
pub mod asset;
pub mod price;

pub use amount::Amount;
pub use asset::{AccountId, Asset, AssetPair};
pub use price::Price;
