//! Asset - Native currency and issued credit assets
//!
//! An asset is either the ledger's native currency or a (code, issuer)
//! pair. Codes are 1-12 ASCII alphanumeric characters, normalized to
//! uppercase on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Account identifier
pub type AccountId = String;

/// Errors that can occur when constructing assets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Empty asset code")]
    EmptyCode,

    #[error("Asset code too long (max 12 chars): {0}")]
    CodeTooLong(String),

    #[error("Invalid asset code format: {0}")]
    InvalidCode(String),
}

/// An asset held and traded on the ledger.
///
/// # Examples
/// ```
/// use tradewind_core::Asset;
///
/// let native = Asset::Native;
/// assert!(native.is_native());
///
/// let usd = Asset::credit("usd", "gateway").unwrap();
/// assert_eq!(usd.to_string(), "USD:gateway");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    /// The ledger's native currency
    Native,
    /// An asset issued by an account
    Credit { code: String, issuer: AccountId },
}

impl Asset {
    /// Create a credit asset, validating and normalizing the code.
    pub fn credit(code: impl Into<String>, issuer: impl Into<AccountId>) -> Result<Self, AssetError> {
        let code = code.into().trim().to_uppercase();

        if code.is_empty() {
            return Err(AssetError::EmptyCode);
        }
        if code.len() > 12 {
            return Err(AssetError::CodeTooLong(code));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AssetError::InvalidCode(code));
        }

        Ok(Asset::Credit {
            code,
            issuer: issuer.into(),
        })
    }

    /// Whether this is the native currency
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// The asset code ("native" for the native currency)
    pub fn code(&self) -> &str {
        match self {
            Asset::Native => "native",
            Asset::Credit { code, .. } => code,
        }
    }

    /// The issuing account, if any
    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::Credit { issuer, .. } => Some(issuer),
        }
    }

    /// Whether `account` is the issuer of this asset
    pub fn is_issued_by(&self, account: &str) -> bool {
        matches!(self, Asset::Credit { issuer, .. } if issuer == account)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Credit { code, issuer } => write!(f, "{}:{}", code, issuer),
        }
    }
}

/// A normalized, unordered asset pair identifying one order book.
///
/// Both directions of trade between the two assets share a single book;
/// the pair is stored with its assets in canonical order so that
/// (A, B) and (B, A) key the same entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    base: Asset,
    counter: Asset,
}

impl AssetPair {
    /// Build the normalized pair for two distinct assets.
    ///
    /// Returns None if both assets are the same.
    pub fn new(a: Asset, b: Asset) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { base: a, counter: b }),
            std::cmp::Ordering::Greater => Some(Self { base: b, counter: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The canonically-first asset
    pub fn base(&self) -> &Asset {
        &self.base
    }

    /// The canonically-second asset
    pub fn counter(&self) -> &Asset {
        &self.counter
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}
