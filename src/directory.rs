//! Customer directory — lookup of customer id → current loan record.
//!
//! An injectable capability: production swaps the in-memory seed for an
//! external service without changing the contract.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::offers::Loan;

/// A customer and their current mortgage. Static seed data, read-only for
/// the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub given_name: String,
    pub current_loan: Loan,
}

/// Lookup contract shared by the seed store and any production backend.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find(&self, customer_id: &str) -> Result<CustomerRecord, DirectoryError>;
}

/// In-memory directory backed by a static map.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: HashMap<String, CustomerRecord>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with the demo customer.
    pub fn with_seed_data() -> Self {
        let mut directory = Self::new();
        directory.insert(CustomerRecord {
            customer_id: "mike4mail@gmail.com".into(),
            given_name: "Stephen".into(),
            current_loan: Loan {
                principal: dec!(123500),
                annual_rate_percent: dec!(3.99),
                term_years: 23,
                renewal_eligible: true,
                label: "SVR 3.99%".into(),
            },
        });
        directory
    }

    pub fn insert(&mut self, record: CustomerRecord) {
        self.records.insert(record.customer_id.clone(), record);
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn find(&self, customer_id: &str) -> Result<CustomerRecord, DirectoryError> {
        self.records
            .get(customer_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound {
                customer_id: customer_id.to_string(),
            })
    }
}
