use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::{
    account::{Account, AccountError, AccountId},
    command::{AccountCommandError, FeeKind},
    transaction::Transaction,
};

pub mod in_memory_ledger;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error("Account {0} already exists")]
    DuplicateAccount(AccountId),
    #[error("Transfer of {amount} overflows the bank's bookkeeping")]
    AmountOverflow { amount: Decimal },
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

impl LedgerError {
    pub fn is_account_not_found(&self) -> bool {
        matches!(self, LedgerError::AccountNotFound(_))
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountErr(AccountError::InsufficientFunds { .. })
        )
    }
}

/// Parameters a bank is created with. Fees are fixed for the bank's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    pub name: String,
    pub flat_fee: Decimal,
    /// Percentage of the transferred amount, `5` means 5%.
    pub percent_fee: Decimal,
}

impl BankConfig {
    pub fn validate(&self) -> Result<(), AccountCommandError> {
        if self.flat_fee < Decimal::zero() {
            return Err(AccountCommandError::NegativeFee {
                fee_kind: FeeKind::Flat,
            });
        }
        if self.percent_fee < Decimal::zero() {
            return Err(AccountCommandError::NegativeFee {
                fee_kind: FeeKind::Percent,
            });
        }
        Ok(())
    }

    /// `None` when the fee is not representable.
    pub fn fee_for(&self, amount: Decimal, fee_kind: FeeKind) -> Option<Decimal> {
        match fee_kind {
            FeeKind::Flat => Some(self.flat_fee),
            FeeKind::Percent => amount.checked_mul(self.percent_fee / Decimal::ONE_HUNDRED),
        }
    }
}

/// Bookkeeping operations of a single bank. Every failing call leaves the
/// ledger exactly as it was before the call.
pub trait Ledger {
    fn add_account(
        &mut self,
        id: AccountId,
        holder_name: &str,
        initial_balance: Decimal,
    ) -> Result<&Account, LedgerError>;

    /// Moves `amount` from `from` to `to`. The originating account pays
    /// `amount` plus the fee, the fee stays with the bank.
    fn perform_transaction(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: &str,
        fee_kind: FeeKind,
    ) -> Result<&Transaction, LedgerError>;

    fn check_account_balance(&self, id: AccountId) -> Result<Decimal, LedgerError>;

    /// Returns the balance after the deposit.
    fn deposit_money(&mut self, id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError>;

    /// Returns the balance after the withdrawal.
    fn withdraw_money(&mut self, id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError>;

    fn transactions_for(&self, id: AccountId) -> Result<Vec<&Transaction>, LedgerError>;

    /// All accounts in creation order.
    fn accounts(&self) -> &[Account];

    fn total_transaction_fee_amount(&self) -> Decimal;

    fn total_transfer_amount(&self) -> Decimal;
}
