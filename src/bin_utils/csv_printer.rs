use std::io::Write;

use crate::{
    account::{Account, AccountId},
    transaction::Transaction,
};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccountRow<'a> {
    pub id: AccountId,
    pub holder: &'a str,
    pub balance: Decimal,
}

impl<'a> From<&'a Account> for AccountRow<'a> {
    fn from(acc: &'a Account) -> Self {
        Self {
            id: acc.id(),
            holder: acc.holder_name(),
            balance: acc.balance().normalize(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionRow<'a> {
    pub amount: Decimal,
    pub from: AccountId,
    pub to: AccountId,
    pub reason: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            amount: tx.amount().normalize(),
            from: tx.originating_account_id(),
            to: tx.resulting_account_id(),
            reason: tx.reason(),
        }
    }
}

/// Writes rows as CSV, header line first.
pub fn print_rows<W, T>(output: &mut W, rows: impl Iterator<Item = T>) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut writer = Writer::from_writer(output);
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
