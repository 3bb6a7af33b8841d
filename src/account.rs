use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    command::{AccountAction, AccountCommand},
    transaction::Transaction,
};

pub type AccountId = u32;

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Balance overflow: cannot add {amount} to {balance}")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    balance: Decimal,
}

impl Account {
    pub fn new(id: AccountId, holder_name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id,
            holder_name: holder_name.into(),
            balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Events only come out of [`Account::handle_command`], which already
    /// checked the arithmetic against this balance.
    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
            }
        }
    }

    /// Decides whether the command may run against the current balance.
    /// Nothing is mutated until the returned event is applied.
    pub fn handle_command(&self, command: &AccountCommand) -> Result<AccountEvent, AccountError> {
        match command.action() {
            AccountAction::Deposit => match self.balance.checked_add(command.amount()) {
                Some(_) => Ok(AccountEvent {
                    amount: command.amount(),
                    kind: AccountEventKind::Deposited,
                }),
                None => Err(AccountError::BalanceOverflow {
                    balance: self.balance,
                    amount: command.amount(),
                }),
            },
            AccountAction::Withdraw => {
                // ending exactly at zero is allowed
                let remaining = self.balance.checked_sub(command.amount());
                if remaining.is_some_and(|remaining| remaining >= Decimal::ZERO) {
                    Ok(AccountEvent {
                        amount: command.amount(),
                        kind: AccountEventKind::Withdrawn,
                    })
                } else {
                    Err(AccountError::InsufficientFunds {
                        requested: command.amount(),
                        available: self.balance,
                    })
                }
            }
        }
    }

    /// Transactions where this account is the originator or the recipient,
    /// in the order they appear in `transactions`.
    pub fn transactions_involving<'a>(
        &self,
        transactions: &'a [Transaction],
    ) -> impl Iterator<Item = &'a Transaction> + use<'a> {
        let id = self.id;
        transactions.iter().filter(move |tx| tx.involves(id))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn deposit(amount: Decimal) -> AccountCommand {
        AccountCommand::new(AccountAction::Deposit, amount).unwrap()
    }

    fn withdraw(amount: Decimal) -> AccountCommand {
        AccountCommand::new(AccountAction::Withdraw, amount).unwrap()
    }

    #[test]
    fn apply_events() {
        let mut acc = Account::new(1, "Alice", dec!(0));
        acc.apply(&AccountEvent {
            amount: dec!(10),
            kind: AccountEventKind::Deposited,
        });
        assert_eq!(acc.balance(), dec!(10));
        acc.apply(&AccountEvent {
            amount: dec!(3),
            kind: AccountEventKind::Withdrawn,
        });
        assert_eq!(acc.balance(), dec!(7));
        // event is the source of truth, there's no more validation happening
        acc.apply(&AccountEvent {
            amount: dec!(8),
            kind: AccountEventKind::Withdrawn,
        });
        assert_eq!(acc.balance(), dec!(-1));
    }

    #[test]
    fn handle_deposit() {
        let acc = Account::new(1, "Alice", dec!(0));
        let evt = acc.handle_command(&deposit(dec!(13))).unwrap();
        assert_eq!(evt.amount, dec!(13));
        assert_eq!(evt.kind, AccountEventKind::Deposited);
        // handling alone never touches the balance
        assert_eq!(acc.balance(), dec!(0));
    }

    #[test]
    fn deposit_onto_max_balance() {
        let acc = Account::new(1, "Alice", Decimal::MAX);
        let err = acc.handle_command(&deposit(dec!(1))).unwrap_err();
        assert_eq!(
            err,
            AccountError::BalanceOverflow {
                balance: Decimal::MAX,
                amount: dec!(1),
            }
        );
        assert_eq!(acc.balance(), Decimal::MAX);

        // a zero deposit still fits
        assert!(acc.handle_command(&deposit(dec!(0))).is_ok());
    }

    #[test]
    fn handle_withdrawal() {
        let mut acc = Account::new(1, "Alice", dec!(5));

        let err = acc.handle_command(&withdraw(dec!(5.01))).unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                requested: dec!(5.01),
                available: dec!(5),
            }
        );
        assert_eq!(acc.balance(), dec!(5));
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 5.01, available 5"
        );

        // draining to exactly zero succeeds
        let evt = acc.handle_command(&withdraw(dec!(5))).unwrap();
        assert_eq!(evt.kind, AccountEventKind::Withdrawn);
        acc.apply(&evt);
        assert_eq!(acc.balance(), dec!(0));
    }

    #[test]
    fn filter_involved_transactions() {
        let acc = Account::new(2, "Bob", dec!(0));
        let txs = vec![
            Transaction::new(dec!(1), dec!(0), 1, 2, "a".to_string()),
            Transaction::new(dec!(2), dec!(0), 1, 3, "b".to_string()),
            Transaction::new(dec!(3), dec!(0), 2, 3, "c".to_string()),
        ];
        let reasons: Vec<&str> = acc
            .transactions_involving(&txs)
            .map(Transaction::reason)
            .collect();
        assert_eq!(reasons, vec!["a", "c"]);
        assert_eq!(txs.len(), 3);

        let stranger = Account::new(9, "Eve", dec!(0));
        assert_eq!(stranger.transactions_involving(&txs).count(), 0);
    }
}
