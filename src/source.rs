use crate::error::Result;
use crate::schema::{ContractPortfolio, ContractRecord};
use std::collections::HashMap;

/// Anything that can hand over every contract record belonging to an owner.
///
/// Implementations must return one consistent snapshot per call; chain totals compare
/// each record against its siblings from the same snapshot.
pub trait ContractSource {
    fn contracts_for_owner(&self, owner: &str) -> Result<Vec<ContractRecord>>;
}

impl ContractSource for ContractPortfolio {
    fn contracts_for_owner(&self, owner: &str) -> Result<Vec<ContractRecord>> {
        if self.owner_name == owner {
            Ok(self.contracts.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryContractSource {
    by_owner: HashMap<String, Vec<ContractRecord>>,
}

impl InMemoryContractSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, owner: impl Into<String>, contract: ContractRecord) {
        self.by_owner.entry(owner.into()).or_default().push(contract);
    }

    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.by_owner.keys().map(String::as_str).collect();
        owners.sort_unstable();
        owners
    }
}

impl ContractSource for InMemoryContractSource {
    fn contracts_for_owner(&self, owner: &str) -> Result<Vec<ContractRecord>> {
        Ok(self.by_owner.get(owner).cloned().unwrap_or_default())
    }
}
