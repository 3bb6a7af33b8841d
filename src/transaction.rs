use rust_decimal::Decimal;

use crate::account::AccountId;

/// A completed transfer. `amount` is what the resulting account received,
/// `fee` is what the bank kept on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    amount: Decimal,
    fee: Decimal,
    originating_account_id: AccountId,
    resulting_account_id: AccountId,
    reason: String,
}

impl Transaction {
    pub(crate) fn new(
        amount: Decimal,
        fee: Decimal,
        originating_account_id: AccountId,
        resulting_account_id: AccountId,
        reason: String,
    ) -> Self {
        Self {
            amount,
            fee,
            originating_account_id,
            resulting_account_id,
            reason,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn originating_account_id(&self) -> AccountId {
        self.originating_account_id
    }

    pub fn resulting_account_id(&self) -> AccountId {
        self.resulting_account_id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn involves(&self, account_id: AccountId) -> bool {
        self.originating_account_id == account_id || self.resulting_account_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn involves_either_side() {
        let tx = Transaction::new(dec!(10), dec!(1), 1, 2, "rent".to_string());
        assert!(tx.involves(1));
        assert!(tx.involves(2));
        assert!(!tx.involves(3));
        assert_eq!(tx.reason(), "rent");
    }
}
