use rust_decimal::{Decimal, prelude::Zero};
use serde::Deserialize;
use thiserror::Error;

/// Operations that carry a caller supplied amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpenAccount,
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Deposit,
    Withdraw,
}

impl From<AccountAction> for Operation {
    fn from(action: AccountAction) -> Self {
        match action {
            AccountAction::Deposit => Operation::Deposit,
            AccountAction::Withdraw => Operation::Withdraw,
        }
    }
}

/// How the bank charges for a transfer.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    Flat,
    Percent,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCommandError {
    #[error("Amount must not be negative for {operation:?}")]
    NegativeAmount { operation: Operation },
    #[error("{fee_kind:?} fee must not be negative")]
    NegativeFee { fee_kind: FeeKind },
}

/// A balance mutation for a single account. Can only be built with a
/// non-negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountCommand {
    action: AccountAction,
    amount: Decimal,
}

impl AccountCommand {
    pub fn new(action: AccountAction, amount: Decimal) -> Result<Self, AccountCommandError> {
        let amount = non_negative(amount, action.into())?;
        Ok(Self { action, amount })
    }

    pub fn action(&self) -> AccountAction {
        self.action
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

pub(crate) fn non_negative(
    amount: Decimal,
    operation: Operation,
) -> Result<Decimal, AccountCommandError> {
    if amount >= Decimal::zero() {
        Ok(amount)
    } else {
        Err(AccountCommandError::NegativeAmount { operation })
    }
}
