use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_interval::Frequency;

/// Direction of a transaction. Amounts are always positive; the kind carries the sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Signed contribution of `amount` to a balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Overdue,
    /// Synthetic occurrence produced inside a single simulation run. Never persisted.
    Projected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceLink {
    pub recurrence_id: Uuid,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallmentLink {
    pub group_id: Uuid,
    /// 1-based position inside the group.
    pub number: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferLink {
    pub transfer_id: Uuid,
    pub related_account_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Legacy settlement flag. Only consulted when `status` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<InstallmentLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferLink>,
    /// `virtual-{recurrence_id}-{index}` for synthetic occurrences, `None` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_key: Option<String>,
}

impl TransactionRecord {
    /// Creates a plain pending record with a fresh identifier.
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            kind,
            date,
            description: description.into(),
            category: None,
            status: Some(TransactionStatus::Pending),
            is_paid: None,
            recurrence: None,
            installment: None,
            transfer: None,
            virtual_key: None,
        }
    }

    pub fn income(
        account_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self::new(account_id, TransactionKind::Income, amount, date, description)
    }

    pub fn expense(
        account_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self::new(account_id, TransactionKind::Expense, amount, date, description)
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Resolves the status, falling back to the legacy flag and finally to `Paid`.
    pub fn effective_status(&self) -> TransactionStatus {
        match (self.status, self.is_paid) {
            (Some(status), _) => status,
            (None, Some(false)) => TransactionStatus::Pending,
            (None, _) => TransactionStatus::Paid,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.effective_status() == TransactionStatus::Paid
    }

    pub fn is_projected(&self) -> bool {
        self.effective_status() == TransactionStatus::Projected
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_installment(&self) -> bool {
        self.installment.is_some()
    }

    pub fn is_transfer(&self) -> bool {
        self.transfer.is_some()
    }

    /// True for records stored as overdue, or still open with a date before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.effective_status() {
            TransactionStatus::Overdue => true,
            TransactionStatus::Pending => self.date < today,
            TransactionStatus::Paid | TransactionStatus::Projected => false,
        }
    }

    /// Sets the canonical status and keeps the legacy flag in agreement with it.
    pub fn set_status(&mut self, status: TransactionStatus) {
        self.status = Some(status);
        self.is_paid = Some(status == TransactionStatus::Paid);
    }

    /// Flips between paid and pending, returning the new status.
    pub fn toggle_paid(&mut self) -> TransactionStatus {
        let next = if self.is_settled() {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Paid
        };
        self.set_status(next);
        next
    }

    /// Signed effect of this record on its account balance.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}
