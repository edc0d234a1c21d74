//! Cost aggregation across successive contracts on the same phone line.
//!
//! A chain is every record sharing the anchor's phone number whose start date is on or
//! before the anchor's. When the anchor's own start date cannot be resolved there is no
//! reference point, and every record on the number is included regardless of its date.

use crate::engine::FinancialProjector;
use crate::schema::ContractRecord;
use crate::utils::chain_sort_key;
use log::debug;

/// Chain lookups over one consistent snapshot of records.
pub struct ChainAggregator<'a> {
    records: &'a [ContractRecord],
}

impl<'a> ChainAggregator<'a> {
    pub fn new(records: &'a [ContractRecord]) -> Self {
        Self { records }
    }

    /// Chain members for `target`, ordered by `(start, end)` with undated records last.
    pub fn members(&self, target: &ContractRecord) -> Vec<&'a ContractRecord> {
        let Some(phone_number) = target.chain_key() else {
            return Vec::new();
        };

        let reference = target.start_date();
        if reference.is_none() {
            debug!(
                "Contract {} has no usable start date; including every contract on {}",
                target.contract_id, phone_number
            );
        }

        let mut members: Vec<&ContractRecord> = self
            .records
            .iter()
            .filter(|record| record.chain_key() == Some(phone_number))
            .filter(|record| match reference {
                Some(anchor) => record.start_date().is_some_and(|start| start <= anchor),
                None => true,
            })
            .collect();

        members.sort_by_key(|record| {
            (
                chain_sort_key(record.start_date()),
                chain_sort_key(record.end_date()),
            )
        });

        members
    }

    /// Sum of `total_cost` across the chain. Members with an unknown cost add nothing.
    pub fn total(&self, target: &ContractRecord) -> i64 {
        let members = self.members(target);

        let total = members
            .iter()
            .filter_map(|record| FinancialProjector::project(record).total_cost)
            .fold(0i64, i64::saturating_add);

        debug!(
            "Chain total for {}: {} across {} contract(s)",
            target.contract_id,
            total,
            members.len()
        );

        total
    }
}

pub fn chain_total(target: &ContractRecord, records: &[ContractRecord]) -> i64 {
    ChainAggregator::new(records).total(target)
}
