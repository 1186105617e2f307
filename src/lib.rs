#![doc(test(attr(deny(warnings))))]

//! Cash-flow core: installment and recurrence generation, account balance
//! derivation, and day-by-day forward projection and backward history of
//! balances.
//!
//! The engine performs no I/O. Collaborators fetch transactions and account
//! data, resolve "today", and pass everything in explicitly.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod simulation;
pub mod utils;

use std::sync::Once;

pub use errors::{DataWarning, EngineError};
pub use simulation::{CashFlowSimulator, DailyBalance, SimulationReport};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cash-flow core tracing initialized.");
    });
}
