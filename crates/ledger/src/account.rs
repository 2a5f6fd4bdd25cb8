//! Ledger accounts
//!
//! An account carries the native balance, the transaction sequence
//! number, the signer set with weights, operation thresholds, issuer
//! flags, an optional home domain and free-form data entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tradewind_core::{AccountId, Amount};

/// Issuer flags controlling trustline authorization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFlags {
    /// Trustlines for assets issued by this account start unauthorized
    pub auth_required: bool,
    /// This account may revoke authorization it previously granted
    pub auth_revocable: bool,
}

/// Operation threshold configuration
///
/// Thresholds classify operations into low/medium/high weight classes.
/// Signature checking itself belongs to the external harness; the
/// ledger only stores the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier
    pub id: AccountId,
    /// Native currency balance
    pub balance: Amount,
    /// Transaction sequence number
    pub sequence: u64,
    /// Weight of the account's own (master) key
    pub master_weight: u8,
    /// Additional signers: key -> weight
    pub signers: BTreeMap<String, u8>,
    /// Operation thresholds
    pub thresholds: Thresholds,
    /// Issuer flags
    pub flags: AccountFlags,
    /// Federation home domain
    pub home_domain: Option<String>,
    /// Inflation payout destination
    pub inflation_destination: Option<AccountId>,
    /// Free-form key/value data entries
    pub data: BTreeMap<String, String>,
}

impl Account {
    /// Create a new account with a starting native balance
    pub fn new(id: impl Into<AccountId>, balance: Amount) -> Self {
        Self {
            id: id.into(),
            balance,
            sequence: 0,
            master_weight: 1,
            signers: BTreeMap::new(),
            thresholds: Thresholds::default(),
            flags: AccountFlags::default(),
            home_domain: None,
            inflation_destination: None,
            data: BTreeMap::new(),
        }
    }

    /// Add, update or remove a signer. Weight 0 removes.
    pub fn set_signer(&mut self, key: impl Into<String>, weight: u8) {
        let key = key.into();
        if weight == 0 {
            self.signers.remove(&key);
        } else {
            self.signers.insert(key, weight);
        }
    }

    /// Set or delete a data entry. `None` deletes.
    pub fn set_data(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.data.insert(name, value);
            }
            None => {
                self.data.remove(&name);
            }
        }
    }
}
