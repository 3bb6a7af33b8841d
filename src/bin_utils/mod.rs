//! Line oriented shell around the ledger. The `toy-bank` binary and the
//! integration tests both drive it through [`Service`].

use std::io::{Read, Write};

use crate::ledger::{BankConfig, Ledger, LedgerError, in_memory_ledger::InMemoryLedger};
use anyhow::Result;
use csv_parser::{CsvCommandParser, ParseError, ShellCommand};
use csv_printer::{AccountRow, TransactionRow, print_rows};
use thiserror::Error;
use tracing::debug;
pub mod csv_parser;
pub mod csv_printer;

pub const HELP: &str = "\
Commands:
  bank <name> <flat_fee> <percent_fee>                    create a bank
  open <id> <holder> <initial_balance>                    create an account
  transfer <from> <to> <amount> [reason] <flat|percent>   perform a transaction
  deposit <id> <amount>                                   deposit money
  withdraw <id> <amount>                                  withdraw money
  history <id>                                            list account transactions
  balance <id>                                            check account balance
  accounts                                                list bank accounts
  fees                                                    total transaction fee amount
  transferred                                             total transfer amount
  help                                                    show this message
  exit                                                    leave
Quote arguments containing spaces, e.g. \"monthly rent\".
";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Please create a bank first.")]
    NoBank,
}

enum Reply<'a> {
    Message(String),
    Accounts(Vec<AccountRow<'a>>),
    Transactions(Vec<TransactionRow<'a>>),
    Exit,
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, ServiceError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvCommandParser::new(self.input);

        let mut bank: Option<InMemoryLedger> = None;

        for (line, command) in parser {
            let command = match command {
                Ok(command) => command,
                Err(ParseError::Read(err)) => {
                    anyhow::bail!("Failed to read input at line {line}: {err}")
                }
                Err(err) => {
                    (self.error_printer)(line, err.into());
                    continue;
                }
            };
            debug!(line, ?command, "executing command");
            match execute(&mut bank, command) {
                Ok(Reply::Message(msg)) => writeln!(self.output, "{msg}")?,
                Ok(Reply::Accounts(rows)) => print_rows(&mut *self.output, rows.into_iter())?,
                Ok(Reply::Transactions(rows)) if rows.is_empty() => {
                    writeln!(self.output, "No transactions.")?
                }
                Ok(Reply::Transactions(rows)) => print_rows(&mut *self.output, rows.into_iter())?,
                Ok(Reply::Exit) => {
                    writeln!(self.output, "Exiting the Bank System. Goodbye!")?;
                    break;
                }
                Err(err) => (self.error_printer)(line, err),
            }
            self.output.flush()?;
        }
        self.output.flush()?;
        Ok(())
    }
}

fn require(bank: &mut Option<InMemoryLedger>) -> Result<&mut InMemoryLedger, ServiceError> {
    bank.as_mut().ok_or(ServiceError::NoBank)
}

fn execute(
    bank: &mut Option<InMemoryLedger>,
    command: ShellCommand,
) -> Result<Reply<'_>, ServiceError> {
    let reply = match command {
        ShellCommand::CreateBank {
            name,
            flat_fee,
            percent_fee,
        } => {
            *bank = Some(InMemoryLedger::new(BankConfig {
                name,
                flat_fee,
                percent_fee,
            })?);
            Reply::Message("Bank created successfully.".to_string())
        }
        ShellCommand::OpenAccount {
            id,
            holder_name,
            initial_balance,
        } => {
            require(bank)?.add_account(id, &holder_name, initial_balance)?;
            Reply::Message("Account created successfully.".to_string())
        }
        ShellCommand::Transfer {
            from,
            to,
            amount,
            reason,
            fee_kind,
        } => {
            require(bank)?.perform_transaction(from, to, amount, &reason, fee_kind)?;
            Reply::Message("Transaction completed successfully.".to_string())
        }
        ShellCommand::Deposit { id, amount } => {
            require(bank)?.deposit_money(id, amount)?;
            Reply::Message("Money deposited successfully.".to_string())
        }
        ShellCommand::Withdraw { id, amount } => {
            require(bank)?.withdraw_money(id, amount)?;
            Reply::Message("Money withdrawn successfully.".to_string())
        }
        ShellCommand::History { id } => Reply::Transactions(
            require(bank)?
                .transactions_for(id)?
                .into_iter()
                .map(TransactionRow::from)
                .collect(),
        ),
        ShellCommand::Balance { id } => Reply::Message(format!(
            "Account Balance: ${}",
            require(bank)?.check_account_balance(id)?.normalize()
        )),
        ShellCommand::Accounts => Reply::Accounts(
            require(bank)?
                .accounts()
                .iter()
                .map(AccountRow::from)
                .collect(),
        ),
        ShellCommand::Fees => Reply::Message(format!(
            "Total Transaction Fee Amount: ${}",
            require(bank)?.total_transaction_fee_amount().normalize()
        )),
        ShellCommand::Transferred => Reply::Message(format!(
            "Total Transfer Amount: ${}",
            require(bank)?.total_transfer_amount().normalize()
        )),
        ShellCommand::Help => Reply::Message(HELP.trim_end().to_string()),
        ShellCommand::Exit => Reply::Exit,
    };
    Ok(reply)
}
