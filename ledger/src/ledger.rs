//! Balance bookkeeping under an immutable supply cap.

use crate::error::LedgerError;
use countersign_types::{Amount, Principal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A total-supply-capped balance registry with a pause gate.
///
/// Invariant: `sum(balances) + externally pooled value == total_supply
/// <= cap` after every call. Failed calls leave the ledger untouched —
/// every check runs before the first write.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    cap: Amount,
    total_supply: Amount,
    balances: HashMap<Principal, Amount>,
    paused: bool,
    /// Whether the pause gate also blocks minting. Off by default: pause
    /// stops value movement, not issuance.
    pause_blocks_mint: bool,
}

impl TokenLedger {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        cap: Amount,
        pause_blocks_mint: bool,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            cap,
            total_supply: Amount::ZERO,
            balances: HashMap::new(),
            paused: false,
            pause_blocks_mint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn cap(&self) -> Amount {
        self.cap
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, principal: &Principal) -> Amount {
        self.balances.get(principal).copied().unwrap_or(Amount::ZERO)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set the pause gate. Returns whether the flag actually changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    /// Mint `amount` to `to`, growing total supply.
    pub fn mint(&mut self, to: &Principal, amount: Amount) -> Result<(), LedgerError> {
        if self.paused && self.pause_blocks_mint {
            return Err(LedgerError::Paused);
        }
        let new_supply = self.checked_supply_add(amount)?;
        self.total_supply = new_supply;
        self.credit_balance(to, amount);
        Ok(())
    }

    /// Mint to many recipients at once, all-or-nothing.
    ///
    /// The aggregate is computed and checked against the cap before any
    /// individual balance changes; a mismatched pair of arrays fails
    /// before anything else is even looked at. Returns the aggregate.
    pub fn airdrop(
        &mut self,
        recipients: &[Principal],
        amounts: &[Amount],
    ) -> Result<Amount, LedgerError> {
        if recipients.len() != amounts.len() {
            return Err(LedgerError::ArrayLengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        if self.paused && self.pause_blocks_mint {
            return Err(LedgerError::Paused);
        }

        let mut aggregate = Amount::ZERO;
        for amount in amounts {
            // An overflowing aggregate exceeds any cap; report it saturated.
            aggregate = aggregate
                .checked_add(*amount)
                .ok_or(LedgerError::CapExceeded {
                    requested: u128::MAX,
                    cap: self.cap.raw(),
                })?;
        }
        let new_supply = self.checked_supply_add(aggregate)?;

        self.total_supply = new_supply;
        for (recipient, amount) in recipients.iter().zip(amounts) {
            self.credit_balance(recipient, *amount);
        }
        Ok(aggregate)
    }

    /// Move `amount` from one balance to another.
    pub fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        self.credit_balance(to, amount);
        Ok(())
    }

    /// Remove `amount` from a balance without shrinking total supply;
    /// the value is now held outside the balance map (the workflow's
    /// funds pool). Value-moving, so the pause gate applies.
    pub fn debit(&mut self, from: &Principal, amount: Amount) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        if remaining.is_zero() {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        Ok(())
    }

    /// Return previously debited value to a balance. Value-moving, so the
    /// pause gate applies.
    pub fn credit(&mut self, to: &Principal, amount: Amount) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        self.credit_balance(to, amount);
        Ok(())
    }

    fn checked_supply_add(&self, amount: Amount) -> Result<Amount, LedgerError> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::CapExceeded {
                requested: amount.raw(),
                cap: self.cap.raw(),
            })?;
        if new_supply > self.cap {
            return Err(LedgerError::CapExceeded {
                requested: amount.raw(),
                cap: self.cap.raw(),
            });
        }
        Ok(new_supply)
    }

    fn credit_balance(&mut self, to: &Principal, amount: Amount) {
        let balance = self.balance_of(to);
        self.balances.insert(*to, balance + amount);
    }
}
