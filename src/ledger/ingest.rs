//! Decoding of transaction batches handed over by the data store.
//!
//! The store speaks loosely typed JSON with snake_case field names. Structural
//! problems (no collection at all, a row that is not an object, a row without
//! identifiers or date) reject the whole batch; a bad amount or an unknown
//! direction only affects the row in question and is reported as a warning.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use super::{
    time_interval::Frequency,
    transaction::{
        InstallmentLink, RecurrenceLink, TransactionKind, TransactionRecord, TransactionStatus,
        TransferLink,
    },
};
use crate::errors::{DataWarning, EngineError};

#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    pub records: Vec<TransactionRecord>,
    pub warnings: Vec<DataWarning>,
}

/// Parses a JSON document and decodes it as a batch.
pub fn decode_batch_str(raw: &str) -> Result<DecodedBatch, EngineError> {
    let value: Value = serde_json::from_str(raw)?;
    decode_batch(&value)
}

pub fn decode_batch(value: &Value) -> Result<DecodedBatch, EngineError> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Null => {
            return Err(EngineError::invalid("transaction collection is missing"));
        }
        other => {
            return Err(EngineError::invalid(format!(
                "transaction collection must be an array, got {}",
                value_kind(other)
            )));
        }
    };

    let mut batch = DecodedBatch::default();
    for (index, row) in rows.iter().enumerate() {
        let fields = row.as_object().ok_or_else(|| {
            EngineError::invalid(format!("transaction #{} is not an object", index))
        })?;
        if let Some(record) = decode_row(index, fields, &mut batch.warnings)? {
            batch.records.push(record);
        }
    }
    for warning in &batch.warnings {
        warn!(%warning, "transaction batch data-integrity warning");
    }
    Ok(batch)
}

fn decode_row(
    index: usize,
    fields: &Map<String, Value>,
    warnings: &mut Vec<DataWarning>,
) -> Result<Option<TransactionRecord>, EngineError> {
    let id = required_uuid(index, fields, "id")?;
    let account_id = required_uuid(index, fields, "account_id")?;
    let date = fields
        .get("transaction_date")
        .or_else(|| fields.get("date"))
        .and_then(parse_date)
        .ok_or_else(|| {
            EngineError::invalid(format!("transaction #{} has no valid date", index))
        })?;

    let kind = match fields.get("type").or_else(|| fields.get("kind")) {
        Some(Value::String(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        },
        _ => None,
    };
    let Some(kind) = kind else {
        warnings.push(DataWarning::UnknownKind {
            id: Some(id),
            raw: raw_text(fields.get("type").or_else(|| fields.get("kind"))),
        });
        return Ok(None);
    };

    let amount = match fields.get("amount").and_then(parse_amount) {
        Some(amount) => {
            if amount <= Decimal::ZERO {
                warnings.push(DataWarning::NonPositiveAmount { id });
            }
            amount
        }
        None => {
            warnings.push(DataWarning::MalformedAmount {
                id: Some(id),
                raw: raw_text(fields.get("amount")),
            });
            Decimal::ZERO
        }
    };

    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(parse_status);
    let is_paid = fields
        .get("is_paid")
        .or_else(|| fields.get("paid"))
        .and_then(Value::as_bool);

    Ok(Some(TransactionRecord {
        id,
        account_id,
        amount,
        kind,
        date,
        description: fields
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        category: fields
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string),
        status,
        is_paid,
        recurrence: decode_recurrence(fields),
        installment: decode_installment(fields),
        transfer: decode_transfer(fields),
        virtual_key: None,
    }))
}

fn decode_recurrence(fields: &Map<String, Value>) -> Option<RecurrenceLink> {
    if fields.get("is_recurring").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    let recurrence_id = optional_uuid(fields, "recurrence_id")?;
    let frequency = match fields.get("frequency").and_then(Value::as_str) {
        Some(raw) => Frequency::from_str(raw).unwrap_or_else(|err| {
            warn!(%recurrence_id, %err, "defaulting recurrence frequency to monthly");
            Frequency::Monthly
        }),
        None => Frequency::Monthly,
    };
    Some(RecurrenceLink {
        recurrence_id,
        frequency,
    })
}

fn decode_installment(fields: &Map<String, Value>) -> Option<InstallmentLink> {
    if fields.get("is_installment").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    let group_id = optional_uuid(fields, "installment_group_id")?;
    let number = fields.get("installment_number").and_then(Value::as_u64)?;
    let total = fields.get("total_installments").and_then(Value::as_u64)?;
    Some(InstallmentLink {
        group_id,
        number: u32::try_from(number).ok()?,
        total: u32::try_from(total).ok()?,
    })
}

fn decode_transfer(fields: &Map<String, Value>) -> Option<TransferLink> {
    if fields.get("is_transfer").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    Some(TransferLink {
        transfer_id: optional_uuid(fields, "transfer_id")?,
        related_account_id: optional_uuid(fields, "related_account_id")?,
    })
}

fn required_uuid(
    index: usize,
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Uuid, EngineError> {
    optional_uuid(fields, key).ok_or_else(|| {
        EngineError::invalid(format!("transaction #{} has no valid `{}`", index, key))
    })
}

fn optional_uuid(fields: &Map<String, Value>, key: &str) -> Option<Uuid> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        _ => None,
    }
}

/// Accepts plain dates and timestamps; the time of day is dropped.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_status(raw: &str) -> Option<TransactionStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(TransactionStatus::Pending),
        "paid" => Some(TransactionStatus::Paid),
        "overdue" => Some(TransactionStatus::Overdue),
        "projected" => Some(TransactionStatus::Projected),
        _ => None,
    }
}

fn raw_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(raw)) => raw.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".into(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
