//! Ledger state - the owned collection of accounts and trustlines
//!
//! Every balance mutation funnels through `credit` and `debit`, which
//! enforce the transfer rules: an issued asset moves only over an
//! existing, authorized trustline with room under its limit, and the
//! asset's issuer mints on debit and burns on credit.

use std::collections::BTreeMap;

use tracing::debug;
use tradewind_core::{AccountId, Amount, Asset};

use crate::account::Account;
use crate::error::LedgerError;
use crate::trustline::Trustline;

/// The full account and trustline state of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    accounts: BTreeMap<AccountId, Account>,
    trustlines: BTreeMap<(AccountId, Asset), Trustline>,
}

impl LedgerState {
    /// Create an empty ledger state
    pub fn new() -> Self {
        Self::default()
    }

    // === Accounts ===

    /// Create a new account with a starting native balance
    pub fn create_account(
        &mut self,
        id: impl Into<AccountId>,
        balance: Amount,
    ) -> Result<(), LedgerError> {
        let id = id.into();
        if self.accounts.contains_key(&id) {
            return Err(LedgerError::AccountExists(id));
        }
        debug!(account = %id, %balance, "account created");
        self.accounts.insert(id.clone(), Account::new(id, balance));
        Ok(())
    }

    /// Look up an account
    pub fn account(&self, id: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    /// Look up an account mutably
    pub fn account_mut(&mut self, id: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    /// Whether an account exists
    pub fn has_account(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Iterate all accounts
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Sum of all native balances
    pub fn native_supply(&self) -> Amount {
        self.accounts
            .values()
            .fold(Amount::ZERO, |acc, a| {
                acc.checked_add(a.balance).unwrap_or(Amount::MAX)
            })
    }

    /// Bump the account's transaction sequence number
    pub fn bump_sequence(&mut self, id: &str) -> Result<u64, LedgerError> {
        let account = self.account_mut(id)?;
        account.sequence += 1;
        Ok(account.sequence)
    }

    // === Trustlines ===

    /// Look up a trustline
    pub fn trustline(&self, account: &str, asset: &Asset) -> Option<&Trustline> {
        self.trustlines
            .get(&(account.to_string(), asset.clone()))
    }

    /// Iterate the trustlines held by one account
    pub fn trustlines_of<'a>(&'a self, account: &'a str) -> impl Iterator<Item = &'a Trustline> {
        self.trustlines
            .values()
            .filter(move |line| line.account == account)
    }

    /// Create, update or remove a trustline.
    ///
    /// Repeating the current limit is a no-op. A limit of zero removes
    /// the line once its balance is zero.
    pub fn change_trust(
        &mut self,
        account: &str,
        asset: Asset,
        limit: Amount,
    ) -> Result<(), LedgerError> {
        self.account(account)?;

        if asset.is_native() {
            return Err(LedgerError::InvalidTrustline {
                account: account.to_string(),
                asset,
                reason: "the native asset needs no trustline",
            });
        }
        if asset.is_issued_by(account) {
            return Err(LedgerError::InvalidTrustline {
                account: account.to_string(),
                asset,
                reason: "an issuer cannot trust its own asset",
            });
        }
        let issuer = asset.issuer().expect("credit asset has an issuer").clone();
        let issuer_flags = self.account(&issuer)?.flags;

        let key = (account.to_string(), asset.clone());
        match self.trustlines.get(&key).map(|l| (l.limit, l.balance)) {
            Some((current_limit, balance)) => {
                if limit == current_limit {
                    return Ok(());
                }
                if limit < balance {
                    return Err(LedgerError::LimitBelowBalance { limit, balance });
                }
                if limit.is_zero() && balance.is_zero() {
                    debug!(account, %asset, "trustline removed");
                    self.trustlines.remove(&key);
                } else {
                    self.trustlines.get_mut(&key).expect("present").limit = limit;
                }
            }
            None => {
                if limit.is_zero() {
                    return Err(LedgerError::InvalidTrustline {
                        account: account.to_string(),
                        asset,
                        reason: "a new trustline needs a positive limit",
                    });
                }
                let authorized = !issuer_flags.auth_required;
                debug!(account, %asset, %limit, authorized, "trustline created");
                self.trustlines
                    .insert(key, Trustline::new(account, asset, limit, authorized));
            }
        }
        Ok(())
    }

    /// Grant or revoke authorization on a trustline.
    ///
    /// Only meaningful for issuers flagged auth-required; revocation
    /// additionally requires the auth-revocable flag.
    pub fn set_authorization(
        &mut self,
        issuer: &str,
        trustor: &str,
        asset: &Asset,
        authorized: bool,
    ) -> Result<(), LedgerError> {
        if !asset.is_issued_by(issuer) {
            return Err(LedgerError::InvalidTrustline {
                account: trustor.to_string(),
                asset: asset.clone(),
                reason: "asset is not issued by the authorizing account",
            });
        }
        let flags = self.account(issuer)?.flags;
        if !flags.auth_required {
            return Err(LedgerError::AuthNotRequired {
                issuer: issuer.to_string(),
            });
        }
        if !authorized && !flags.auth_revocable {
            return Err(LedgerError::AuthorizationNotRevocable {
                issuer: issuer.to_string(),
            });
        }

        let line = self
            .trustlines
            .get_mut(&(trustor.to_string(), asset.clone()))
            .ok_or_else(|| LedgerError::NoTrustline {
                account: trustor.to_string(),
                asset: asset.clone(),
            })?;
        debug!(trustor, %asset, authorized, "trustline authorization changed");
        line.authorized = authorized;
        Ok(())
    }

    // === Balances ===

    /// The balance an account holds in an asset (zero if no trustline)
    pub fn balance(&self, account: &str, asset: &Asset) -> Amount {
        match asset {
            Asset::Native => self
                .accounts
                .get(account)
                .map(|a| a.balance)
                .unwrap_or(Amount::ZERO),
            _ => self
                .trustline(account, asset)
                .map(|line| line.balance)
                .unwrap_or(Amount::ZERO),
        }
    }

    /// Check that an account may transact in an asset at all
    pub fn require_authorized(&self, account: &str, asset: &Asset) -> Result<(), LedgerError> {
        if asset.is_native() || asset.is_issued_by(account) {
            return Ok(());
        }
        let line = self
            .trustline(account, asset)
            .ok_or_else(|| LedgerError::NoTrustline {
                account: account.to_string(),
                asset: asset.clone(),
            })?;
        if !line.authorized {
            return Err(LedgerError::NotAuthorized {
                account: account.to_string(),
                asset: asset.clone(),
            });
        }
        Ok(())
    }

    /// Check that `credit` would succeed, without mutating anything
    pub fn can_credit(
        &self,
        account: &str,
        asset: &Asset,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if asset.is_issued_by(account) {
            return Ok(());
        }
        match asset {
            Asset::Native => {
                let current = self.account(account)?.balance;
                current
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::BalanceOverflow {
                        account: account.to_string(),
                    })?;
                Ok(())
            }
            _ => {
                self.account(account)?;
                self.require_authorized(account, asset)?;
                let line = self.trustline(account, asset).expect("checked above");
                if line.capacity() < amount {
                    return Err(LedgerError::LineFull {
                        account: account.to_string(),
                        asset: asset.clone(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Credit an account. The issuer of an asset burns instead.
    pub fn credit(
        &mut self,
        account: &str,
        asset: &Asset,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.can_credit(account, asset, amount)?;
        if asset.is_issued_by(account) {
            return Ok(());
        }
        match asset {
            Asset::Native => {
                let acc = self.account_mut(account)?;
                acc.balance = acc.balance.checked_add(amount).expect("checked above");
            }
            _ => {
                let line = self
                    .trustlines
                    .get_mut(&(account.to_string(), asset.clone()))
                    .expect("checked above");
                line.balance = line.balance.checked_add(amount).expect("within limit");
            }
        }
        Ok(())
    }

    /// Debit an account. The issuer of an asset mints instead.
    pub fn debit(
        &mut self,
        account: &str,
        asset: &Asset,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if asset.is_issued_by(account) {
            return Ok(());
        }
        match asset {
            Asset::Native => {
                let acc = self.account_mut(account)?;
                acc.balance =
                    acc.balance
                        .checked_sub(amount)
                        .ok_or_else(|| LedgerError::Underfunded {
                            account: account.to_string(),
                            asset: asset.clone(),
                        })?;
            }
            _ => {
                self.account(account)?;
                self.require_authorized(account, asset)?;
                let line = self
                    .trustlines
                    .get_mut(&(account.to_string(), asset.clone()))
                    .expect("checked above");
                line.balance =
                    line.balance
                        .checked_sub(amount)
                        .ok_or_else(|| LedgerError::Underfunded {
                            account: account.to_string(),
                            asset: asset.clone(),
                        })?;
            }
        }
        Ok(())
    }

    /// Move an amount between two accounts.
    ///
    /// The credit side is validated before the debit mutates, so a
    /// failed transfer leaves both sides untouched.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        asset: &Asset,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.can_credit(to, asset, amount)?;
        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)?;
        Ok(())
    }

    /// Merge `source` into `destination`: the whole native balance
    /// moves and the source account is deleted.
    ///
    /// Blocked while the source still holds trustlines.
    pub fn merge_account(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<Amount, LedgerError> {
        if source == destination {
            return Err(LedgerError::MergeBlocked {
                account: source.to_string(),
                reason: "an account cannot merge into itself",
            });
        }
        let balance = self.account(source)?.balance;
        self.account(destination)?;

        if self.trustlines_of(source).next().is_some() {
            return Err(LedgerError::MergeBlocked {
                account: source.to_string(),
                reason: "the account still holds trustlines",
            });
        }
        self.can_credit(destination, &Asset::Native, balance)?;

        self.accounts.remove(source);
        self.credit(destination, &Asset::Native, balance)?;
        debug!(source, destination, %balance, "account merged");
        Ok(balance)
    }
}
