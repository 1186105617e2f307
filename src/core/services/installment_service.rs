//! Splits a single purchase into monthly installments.

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::core::services::ServiceResult;
use crate::errors::EngineError;
use crate::ledger::{add_months, InstallmentLink, TransactionRecord, TransactionStatus};
use crate::utils::money::round_cents;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallmentOptions {
    /// Marks only the first installment as paid, for purchases settled upfront.
    pub settle_first: bool,
}

pub struct InstallmentService;

impl InstallmentService {
    /// Generates `total` installments that add up to `base.amount` to the cent.
    pub fn generate(base: &TransactionRecord, total: u32) -> ServiceResult<Vec<TransactionRecord>> {
        Self::generate_with(base, total, InstallmentOptions::default())
    }

    pub fn generate_with(
        base: &TransactionRecord,
        total: u32,
        options: InstallmentOptions,
    ) -> ServiceResult<Vec<TransactionRecord>> {
        if total < 1 {
            return Err(EngineError::invalid(
                "an installment plan needs at least one installment",
            ));
        }
        if base.is_installment() {
            return Err(EngineError::invalid(
                "transaction already belongs to an installment group",
            ));
        }
        if base.amount <= Decimal::ZERO {
            return Err(EngineError::invalid(format!(
                "installment base amount must be positive, got {}",
                base.amount
            )));
        }

        let count = Decimal::from(total);
        let installment_amount = round_cents(base.amount / count);
        let remainder = base.amount - installment_amount * count;
        if installment_amount <= Decimal::ZERO || installment_amount + remainder <= Decimal::ZERO {
            return Err(EngineError::invalid(format!(
                "{} cannot be split into {} installments of at least one cent",
                base.amount, total
            )));
        }
        let group_id = Uuid::new_v4();

        let installments = (0..total)
            .map(|index| {
                let mut record = base.clone();
                record.id = Uuid::new_v4();
                record.date = i32::try_from(index)
                    .ok()
                    .and_then(|months| add_months(base.date, months))
                    .ok_or_else(|| {
                        EngineError::invalid(format!(
                            "installment {} of {} falls outside the calendar range",
                            index + 1,
                            total
                        ))
                    })?;
                record.amount = if index == 0 {
                    installment_amount + remainder
                } else {
                    installment_amount
                };
                record.description = format!("{} ({}/{})", base.description, index + 1, total);
                record.installment = Some(InstallmentLink {
                    group_id,
                    number: index + 1,
                    total,
                });
                if options.settle_first && index == 0 {
                    record.set_status(TransactionStatus::Paid);
                }
                Ok(record)
            })
            .collect::<ServiceResult<Vec<TransactionRecord>>>()?;

        debug!(
            %group_id,
            total,
            installment = %installment_amount,
            remainder = %remainder,
            "generated installment plan"
        );
        Ok(installments)
    }
}
