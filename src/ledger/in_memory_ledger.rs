use rust_decimal::{Decimal, prelude::Zero};
use tracing::{debug, info, warn};

use crate::{
    account::{Account, AccountId},
    command::{AccountAction, AccountCommand, FeeKind, Operation, non_negative},
    transaction::Transaction,
};

use super::{BankConfig, Ledger, LedgerError};

#[derive(Debug)]
pub struct InMemoryLedger {
    config: BankConfig,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    total_fees: Decimal,
    total_transferred: Decimal,
}

impl InMemoryLedger {
    pub fn new(config: BankConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        debug!(name = %config.name, flat_fee = %config.flat_fee, percent_fee = %config.percent_fee, "bank created");
        Ok(Self {
            config,
            accounts: Vec::new(),
            transactions: Vec::new(),
            total_fees: Decimal::zero(),
            total_transferred: Decimal::zero(),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// Full transfer log in completion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn position(&self, id: AccountId) -> Result<usize, LedgerError> {
        self.accounts
            .iter()
            .position(|acc| acc.id() == id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn find(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.position(id).map(|idx| &self.accounts[idx])
    }

    fn execute(&mut self, id: AccountId, command: AccountCommand) -> Result<Decimal, LedgerError> {
        let idx = self.position(id)?;
        let acc = &mut self.accounts[idx];
        let evt = acc.handle_command(&command)?;
        acc.apply(&evt);
        debug!(account = id, action = ?command.action(), amount = %command.amount(), balance = %acc.balance(), "balance changed");
        Ok(acc.balance())
    }
}

impl Ledger for InMemoryLedger {
    fn add_account(
        &mut self,
        id: AccountId,
        holder_name: &str,
        initial_balance: Decimal,
    ) -> Result<&Account, LedgerError> {
        let initial_balance = non_negative(initial_balance, Operation::OpenAccount)?;
        if self.position(id).is_ok() {
            return Err(LedgerError::DuplicateAccount(id));
        }
        self.accounts
            .push(Account::new(id, holder_name, initial_balance));
        debug!(account = id, holder = holder_name, balance = %initial_balance, "account opened");
        Ok(&self.accounts[self.accounts.len() - 1])
    }

    fn perform_transaction(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: &str,
        fee_kind: FeeKind,
    ) -> Result<&Transaction, LedgerError> {
        let amount = non_negative(amount, Operation::Transfer)?;
        let from_idx = self.position(from)?;
        let to_idx = self.position(to)?;

        let overflow = || LedgerError::AmountOverflow { amount };
        let fee = self.config.fee_for(amount, fee_kind).ok_or_else(overflow)?;
        let total_fees = self.total_fees.checked_add(fee).ok_or_else(overflow)?;
        let total_transferred = self
            .total_transferred
            .checked_add(amount)
            .ok_or_else(overflow)?;
        let charged = amount.checked_add(fee).ok_or_else(overflow)?;
        let withdrawal = AccountCommand::new(AccountAction::Withdraw, charged)?;
        let deposit = AccountCommand::new(AccountAction::Deposit, amount)?;

        // both sides are decided before either is applied
        let withdrawn = self.accounts[from_idx]
            .handle_command(&withdrawal)
            .inspect_err(|err| warn!(from, to, %amount, %fee, "transfer rejected: {err}"))?;
        let deposited = self.accounts[to_idx].handle_command(&deposit)?;
        self.accounts[from_idx].apply(&withdrawn);
        self.accounts[to_idx].apply(&deposited);

        self.transactions.push(Transaction::new(
            amount,
            fee,
            from,
            to,
            reason.to_owned(),
        ));
        self.total_fees = total_fees;
        self.total_transferred = total_transferred;
        info!(from, to, %amount, %fee, reason, "transfer completed");

        Ok(&self.transactions[self.transactions.len() - 1])
    }

    fn check_account_balance(&self, id: AccountId) -> Result<Decimal, LedgerError> {
        self.find(id).map(Account::balance)
    }

    fn deposit_money(&mut self, id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        let command = AccountCommand::new(AccountAction::Deposit, amount)?;
        self.execute(id, command)
    }

    fn withdraw_money(&mut self, id: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        let command = AccountCommand::new(AccountAction::Withdraw, amount)?;
        self.execute(id, command)
    }

    fn transactions_for(&self, id: AccountId) -> Result<Vec<&Transaction>, LedgerError> {
        let acc = self.find(id)?;
        Ok(acc.transactions_involving(&self.transactions).collect())
    }

    fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    fn total_transaction_fee_amount(&self) -> Decimal {
        self.total_fees
    }

    fn total_transfer_amount(&self) -> Decimal {
        self.total_transferred
    }
}
