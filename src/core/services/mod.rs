pub mod balance_service;
pub mod installment_service;
pub mod recurrence_service;

pub use balance_service::{AccountBalances, BalanceService, TransferPair};
pub use installment_service::{InstallmentOptions, InstallmentService};
pub use recurrence_service::{RecurrenceService, DEFAULT_OCCURRENCES, PROJECTION_LABEL};

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, EngineError>;
