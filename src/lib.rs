//! # Phone Contract Ledger
//!
//! A library for keeping track of mobile-phone service contracts and projecting what each
//! one costs over its planned life.
//!
//! ## Core Concepts
//!
//! - **Contract**: a single service agreement with dates, carrier/plan, fees, device and cashback
//! - **Duration**: elapsed days, and months rounded up against a fixed 30-day month
//! - **Total Cost**: expense minus income over the planned duration (positive = out of pocket)
//! - **Chain**: successive contracts on the same phone number; its total is the running cost of the line
//! - **Unknown, not zero**: a contract without usable dates has no duration and no cost
//!
//! ## Example
//!
//! ```rust,ignore
//! use phone_contract_ledger::*;
//!
//! let portfolio = ContractPortfolio::new(
//!     "alice",
//!     vec![
//!         ContractRecord::new("c1")
//!             .with_phone_number("090-1234-5678")
//!             .with_dates("2023-01-01", "2023-07-01")
//!             .with_fees(3300, 1000, 2000)
//!             .with_cashback(5000)
//!             .with_device(10000, 8000),
//!     ],
//! );
//!
//! let report = process_portfolio(&portfolio).unwrap();
//! assert_eq!(report.rows[0].projection.total_cost, Some(15300));
//! ```

pub mod catalog;
pub mod chain;
pub mod engine;
pub mod error;
pub mod ids;
pub mod report;
pub mod schema;
pub mod source;
pub mod utils;

pub use catalog::{Carrier, CarrierCatalog, Plan};
pub use chain::{chain_total, ChainAggregator};
pub use engine::{project_contract, CostBreakdown, FinancialProjector, ProjectionResult};
pub use error::{ContractLedgerError, Result};
pub use ids::{DailySequenceAllocator, IdAllocator, TimestampIdAllocator};
pub use report::{ContractReport, ContractSummary};
pub use schema::*;
pub use source::{ContractSource, InMemoryContractSource};
pub use utils::*;

use log::{debug, info, warn};
use std::collections::HashSet;

pub struct ContractLedger;

impl ContractLedger {
    pub fn process(portfolio: &ContractPortfolio) -> Result<ContractReport> {
        validate_portfolio_integrity(portfolio)?;

        info!("Processing contracts for owner: {}", portfolio.owner_name);
        debug!(
            "Portfolio contains {} contracts and {} carriers",
            portfolio.contracts.len(),
            portfolio.carriers.len()
        );

        let report = build_report(&portfolio.owner_name, &portfolio.contracts);

        let unknown = report
            .rows
            .iter()
            .filter(|row| !row.projection.is_known())
            .count();
        if unknown > 0 {
            warn!(
                "{} of {} contracts have no computable duration",
                unknown,
                report.rows.len()
            );
        }

        Ok(report)
    }

    /// Fetches one snapshot from `source` and processes it.
    ///
    /// A source only yields contracts, so the report is built without a carrier catalog and
    /// the duplicate-carrier check has nothing to inspect. Contract ids are still validated.
    pub fn process_source<S: ContractSource + ?Sized>(
        source: &S,
        owner: &str,
    ) -> Result<ContractReport> {
        let contracts = source.contracts_for_owner(owner)?;
        let portfolio = ContractPortfolio::new(owner, contracts);
        Self::process(&portfolio)
    }
}

pub fn process_portfolio(portfolio: &ContractPortfolio) -> Result<ContractReport> {
    ContractLedger::process(portfolio)
}

fn build_report(owner_name: &str, contracts: &[ContractRecord]) -> ContractReport {
    let aggregator = ChainAggregator::new(contracts);

    let rows = contracts
        .iter()
        .map(|contract| ContractSummary {
            contract: contract.clone(),
            projection: FinancialProjector::project(contract),
            chain_total: aggregator.total(contract),
        })
        .collect();

    ContractReport {
        owner_name: owner_name.to_string(),
        rows,
    }
}

fn validate_portfolio_integrity(portfolio: &ContractPortfolio) -> Result<()> {
    let mut seen_ids = HashSet::new();

    for (idx, contract) in portfolio.contracts.iter().enumerate() {
        if contract.contract_id.trim().is_empty() {
            return Err(ContractLedgerError::EmptyContractId(idx));
        }

        if !seen_ids.insert(contract.contract_id.as_str()) {
            return Err(ContractLedgerError::DuplicateContractId(
                contract.contract_id.clone(),
            ));
        }

        for (field, value) in contract.amounts() {
            if let Some(value) = value.filter(|v| *v < 0) {
                warn!(
                    "Contract {}: {} is negative ({}), projecting it as given",
                    contract.contract_id, field, value
                );
            }
        }
    }

    let mut seen_carriers = HashSet::new();
    for carrier in &portfolio.carriers {
        if !seen_carriers.insert(carrier.carrier_name.as_str()) {
            return Err(ContractLedgerError::DuplicateCarrier(
                carrier.carrier_name.clone(),
            ));
        }
    }

    Ok(())
}
