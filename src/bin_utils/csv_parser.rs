use std::io::Read;

use crate::{account::AccountId, command::FeeKind};
use csv::{StringRecord, StringRecordsIntoIter};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Bank,
    Open,
    Transfer,
    Deposit,
    Withdraw,
    History,
    Balance,
    Accounts,
    Fees,
    Transferred,
    Help,
    Exit,
}

impl CommandKind {
    fn arity(self) -> usize {
        match self {
            CommandKind::Bank | CommandKind::Open => 3,
            CommandKind::Transfer => 5,
            CommandKind::Deposit | CommandKind::Withdraw => 2,
            CommandKind::History | CommandKind::Balance => 1,
            CommandKind::Accounts
            | CommandKind::Fees
            | CommandKind::Transferred
            | CommandKind::Help
            | CommandKind::Exit => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    CreateBank {
        name: String,
        flat_fee: Decimal,
        percent_fee: Decimal,
    },
    OpenAccount {
        id: AccountId,
        holder_name: String,
        initial_balance: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: String,
        fee_kind: FeeKind,
    },
    Deposit {
        id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        id: AccountId,
        amount: Decimal,
    },
    History {
        id: AccountId,
    },
    Balance {
        id: AccountId,
    },
    Accounts,
    Fees,
    Transferred,
    Help,
    Exit,
}

// Records carry no headers, so fields are filled positionally. Amounts go
// through `serde::str` to keep every digit the user typed.
#[derive(Debug, Deserialize)]
struct BankArgs {
    name: String,
    #[serde(with = "rust_decimal::serde::str")]
    flat_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    percent_fee: Decimal,
}

#[derive(Debug, Deserialize)]
struct OpenArgs {
    id: AccountId,
    holder_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    initial_balance: Decimal,
}

#[derive(Debug, Deserialize)]
struct TransferArgs {
    from: AccountId,
    to: AccountId,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    reason: String,
    fee_kind: FeeKind,
}

#[derive(Debug, Deserialize)]
struct AmountArgs {
    id: AccountId,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown command `{0}`, type `help` to list commands")]
    UnknownCommand(String),
    #[error("{kind:?} expects {expected} argument(s), got {found}")]
    Arity {
        kind: CommandKind,
        expected: usize,
        found: usize,
    },
    #[error("Invalid arguments for {kind:?}: {source}")]
    InvalidArgument {
        kind: CommandKind,
        source: csv::Error,
    },
    #[error("Failed to read command: {0}")]
    Read(#[from] csv::Error),
}

impl ShellCommand {
    /// Builds a command from a record whose first field is the command name
    /// and the rest are its arguments.
    pub fn from_record(record: &StringRecord) -> Result<Self, ParseError> {
        let name = record.get(0).unwrap_or_default();
        let (kind,): (CommandKind,) = StringRecord::from(vec![name])
            .deserialize(None)
            .map_err(|_| ParseError::UnknownCommand(name.to_string()))?;

        let mut args: StringRecord = record.iter().skip(1).collect();
        // an empty reason, quoted or left out, leaves four arguments
        if kind == CommandKind::Transfer && args.len() == kind.arity() - 1 {
            let mut fields: Vec<&str> = args.iter().collect();
            fields.insert(3, "");
            args = StringRecord::from(fields);
        }
        if args.len() != kind.arity() {
            return Err(ParseError::Arity {
                kind,
                expected: kind.arity(),
                found: args.len(),
            });
        }
        let invalid = |source: csv::Error| ParseError::InvalidArgument { kind, source };

        Ok(match kind {
            CommandKind::Bank => {
                let args: BankArgs = args.deserialize(None).map_err(invalid)?;
                Self::CreateBank {
                    name: args.name,
                    flat_fee: args.flat_fee,
                    percent_fee: args.percent_fee,
                }
            }
            CommandKind::Open => {
                let args: OpenArgs = args.deserialize(None).map_err(invalid)?;
                Self::OpenAccount {
                    id: args.id,
                    holder_name: args.holder_name,
                    initial_balance: args.initial_balance,
                }
            }
            CommandKind::Transfer => {
                let args: TransferArgs = args.deserialize(None).map_err(invalid)?;
                Self::Transfer {
                    from: args.from,
                    to: args.to,
                    amount: args.amount,
                    reason: args.reason,
                    fee_kind: args.fee_kind,
                }
            }
            CommandKind::Deposit => {
                let args: AmountArgs = args.deserialize(None).map_err(invalid)?;
                Self::Deposit {
                    id: args.id,
                    amount: args.amount,
                }
            }
            CommandKind::Withdraw => {
                let args: AmountArgs = args.deserialize(None).map_err(invalid)?;
                Self::Withdraw {
                    id: args.id,
                    amount: args.amount,
                }
            }
            CommandKind::History => {
                let (id,): (AccountId,) = args.deserialize(None).map_err(invalid)?;
                Self::History { id }
            }
            CommandKind::Balance => {
                let (id,): (AccountId,) = args.deserialize(None).map_err(invalid)?;
                Self::Balance { id }
            }
            CommandKind::Accounts => Self::Accounts,
            CommandKind::Fees => Self::Fees,
            CommandKind::Transferred => Self::Transferred,
            CommandKind::Help => Self::Help,
            CommandKind::Exit => Self::Exit,
        })
    }
}

/// Reads one command per line. Arguments are separated by spaces, double
/// quotes group an argument containing spaces, `#` starts a comment line.
pub struct CsvCommandParser<R> {
    iter: StringRecordsIntoIter<R>,
}

impl<R> CsvCommandParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);

        Self {
            iter: reader.into_records(),
        }
    }
}

impl<R> Iterator for CsvCommandParser<R>
where
    R: Read,
{
    type Item = (u64, Result<ShellCommand, ParseError>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.iter.next()? {
                Ok(row) => row,
                Err(err) => {
                    let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                    return Some((line, Err(err.into())));
                }
            };
            let line = row.position().map(|pos| pos.line()).unwrap_or_default();
            // repeated spaces produce empty fields
            let record: StringRecord = row.iter().filter(|field| !field.is_empty()).collect();
            if record.is_empty() {
                continue;
            }
            return Some((line, ShellCommand::from_record(&record)));
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(input: &str) -> Vec<(u64, Result<ShellCommand, ParseError>)> {
        CsvCommandParser::new(input.as_bytes()).collect()
    }

    #[test]
    fn parse_commands() {
        let parsed = parse(
            "bank \"First Bank\" 2.0 5\n\
             # comment line\n\
             \n\
             open 1   Alice 500\n\
             transfer 1 2 100 \"monthly rent\" flat\n\
             accounts\n",
        );
        assert_eq!(parsed[0].0, 1);
        let commands: Vec<ShellCommand> = parsed
            .into_iter()
            .map(|(_, cmd)| cmd.unwrap())
            .collect();
        assert_eq!(
            commands,
            vec![
                ShellCommand::CreateBank {
                    name: "First Bank".to_string(),
                    flat_fee: dec!(2.0),
                    percent_fee: dec!(5),
                },
                ShellCommand::OpenAccount {
                    id: 1,
                    holder_name: "Alice".to_string(),
                    initial_balance: dec!(500),
                },
                ShellCommand::Transfer {
                    from: 1,
                    to: 2,
                    amount: dec!(100),
                    reason: "monthly rent".to_string(),
                    fee_kind: FeeKind::Flat,
                },
                ShellCommand::Accounts,
            ]
        );
    }

    #[test]
    fn parse_exact_amounts() {
        let amounts: Vec<Decimal> = parse(
            "deposit 1 12345678901234567.25\n\
             withdraw 1 1234567890.123456789\n\
             deposit 1 99999999999999999999\n\
             deposit 1 0.1\n",
        )
        .into_iter()
        .map(|(_, cmd)| match cmd.unwrap() {
            ShellCommand::Deposit { amount, .. } | ShellCommand::Withdraw { amount, .. } => amount,
            other => panic!("unexpected command {other:?}"),
        })
        .collect();
        assert_eq!(
            amounts,
            vec![
                dec!(12345678901234567.25),
                dec!(1234567890.123456789),
                dec!(99999999999999999999),
                dec!(0.1),
            ]
        );
        assert_eq!(amounts[0].to_string(), "12345678901234567.25");
    }

    #[test]
    fn parse_transfer_with_empty_reason() {
        let commands: Vec<ShellCommand> =
            parse("transfer 1 2 10 \"\" flat\ntransfer 1 2 10 percent\n")
                .into_iter()
                .map(|(_, cmd)| cmd.unwrap())
                .collect();
        assert_eq!(commands.len(), 2);
        for (cmd, fee_kind) in commands.into_iter().zip([FeeKind::Flat, FeeKind::Percent]) {
            assert_eq!(
                cmd,
                ShellCommand::Transfer {
                    from: 1,
                    to: 2,
                    amount: dec!(10),
                    reason: String::new(),
                    fee_kind,
                }
            );
        }

        // three arguments are still too few
        let parsed = parse("transfer 1 2 flat\n");
        assert!(matches!(
            parsed[0].1.as_ref().unwrap_err(),
            ParseError::Arity {
                kind: CommandKind::Transfer,
                expected: 5,
                found: 3
            }
        ));
    }

    #[test]
    fn reject_malformed_commands() {
        let parsed = parse("launch 1\ndeposit 1\nwithdraw one 5\ntransfer 1 2 3 gift hourly\n");
        assert_eq!(parsed.len(), 4);

        let (line, err) = &parsed[0];
        assert_eq!(*line, 1);
        let err = err.as_ref().unwrap_err();
        assert!(matches!(err, ParseError::UnknownCommand(name) if name == "launch"));

        let err = parsed[1].1.as_ref().unwrap_err();
        assert!(matches!(
            err,
            ParseError::Arity {
                kind: CommandKind::Deposit,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(err.to_string(), "Deposit expects 2 argument(s), got 1");

        assert!(matches!(
            parsed[2].1.as_ref().unwrap_err(),
            ParseError::InvalidArgument {
                kind: CommandKind::Withdraw,
                ..
            }
        ));
        assert!(matches!(
            parsed[3].1.as_ref().unwrap_err(),
            ParseError::InvalidArgument {
                kind: CommandKind::Transfer,
                ..
            }
        ));
    }
}
