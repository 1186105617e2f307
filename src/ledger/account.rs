use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a financial account. Current and projected balances are derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub initial_balance: Decimal,
    #[serde(default = "default_include_in_dashboard")]
    pub include_in_dashboard: bool,
}

fn default_include_in_dashboard() -> bool {
    true
}

impl Account {
    /// Creates a new dashboard-visible account with the given opening balance.
    pub fn new(name: impl Into<String>, initial_balance: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_balance,
            include_in_dashboard: true,
        }
    }

    pub fn hidden_from_dashboard(mut self) -> Self {
        self.include_in_dashboard = false;
        self
    }
}
