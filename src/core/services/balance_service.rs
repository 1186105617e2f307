//! Balance derivation and atomic transfers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::core::services::ServiceResult;
use crate::errors::EngineError;
use crate::ledger::{Account, TransactionKind, TransactionRecord, TransactionStatus, TransferLink};
use crate::utils::money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountBalances {
    /// Opening balance plus settled transactions only.
    pub current: Decimal,
    /// Opening balance plus every transaction of the account.
    pub projected: Decimal,
}

/// The two legs of a transfer, created together.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPair {
    pub outgoing: TransactionRecord,
    pub incoming: TransactionRecord,
}

impl TransferPair {
    pub fn into_records(self) -> [TransactionRecord; 2] {
        [self.outgoing, self.incoming]
    }
}

pub struct BalanceService;

impl BalanceService {
    pub fn current_balance(account: &Account, records: &[TransactionRecord]) -> Decimal {
        account.initial_balance
            + net_movement(records, account.id, |record| record.is_settled())
    }

    pub fn projected_balance(account: &Account, records: &[TransactionRecord]) -> Decimal {
        account.initial_balance + net_movement(records, account.id, |_| true)
    }

    pub fn balances(account: &Account, records: &[TransactionRecord]) -> AccountBalances {
        AccountBalances {
            current: Self::current_balance(account, records),
            projected: Self::projected_balance(account, records),
        }
    }

    /// Totals across every account flagged for the dashboard.
    pub fn dashboard_totals(
        accounts: &[Account],
        records: &[TransactionRecord],
    ) -> AccountBalances {
        accounts
            .iter()
            .filter(|account| account.include_in_dashboard)
            .map(|account| Self::balances(account, records))
            .fold(AccountBalances::default(), |acc, balances| AccountBalances {
                current: acc.current + balances.current,
                projected: acc.projected + balances.projected,
            })
    }

    /// Builds an expense leg on `from` and an income leg on `to`, both already paid.
    pub fn create_transfer(
        from: Uuid,
        to: Uuid,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> ServiceResult<TransferPair> {
        if from == to {
            return Err(EngineError::invalid(
                "a transfer needs two distinct accounts",
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(EngineError::invalid(format!(
                "transfer amount must be positive, got {}",
                amount
            )));
        }
        let description = description.into();
        let transfer_id = Uuid::new_v4();

        let leg = |account_id: Uuid, related_account_id: Uuid, kind: TransactionKind| {
            let mut record =
                TransactionRecord::new(account_id, kind, amount, date, description.clone());
            record.set_status(TransactionStatus::Paid);
            record.transfer = Some(TransferLink {
                transfer_id,
                related_account_id,
            });
            record
        };

        let pair = TransferPair {
            outgoing: leg(from, to, TransactionKind::Expense),
            incoming: leg(to, from, TransactionKind::Income),
        };
        debug!(%transfer_id, %from, %to, %amount, "created transfer");
        Ok(pair)
    }
}

fn net_movement<F>(records: &[TransactionRecord], account_id: Uuid, include: F) -> Decimal
where
    F: Fn(&TransactionRecord) -> bool,
{
    money::sum(
        records
            .iter()
            .filter(|record| record.account_id == account_id && include(*record))
            .map(TransactionRecord::signed_amount),
    )
}
