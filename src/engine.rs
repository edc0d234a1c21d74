use crate::schema::ContractRecord;
use crate::utils::{days_between, months_ceil_between};
use serde::{Deserialize, Serialize};

/// Duration and net cost of a single contract over its planned life.
///
/// `total_cost` is the canonical figure: expense minus income, so a positive value means
/// the owner is out of pocket. `balance` carries the opposite sign (income minus expense)
/// for callers that read the figure that way. Both are `None` exactly when the duration
/// is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub duration_days: Option<i64>,
    pub duration_months: Option<i64>,
    pub total_cost: Option<i64>,
    pub balance: Option<i64>,
}

impl ProjectionResult {
    pub fn is_known(&self) -> bool {
        self.total_cost.is_some()
    }
}

/// Expense and income sides of a contract, absent amounts counted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBreakdown {
    pub expense: i64,
    pub income: i64,
}

impl CostBreakdown {
    pub fn for_months(contract: &ContractRecord, months: i64) -> Self {
        let amount = |value: Option<i64>| value.unwrap_or(0);

        let expense = amount(contract.initial_fee)
            .saturating_add(amount(contract.first_month_cost))
            .saturating_add(amount(contract.monthly_cost).saturating_mul(months))
            .saturating_add(amount(contract.device_cost));

        let income =
            amount(contract.cashback_amount).saturating_add(amount(contract.device_resale_value));

        Self { expense, income }
    }

    pub fn net_cost(&self) -> i64 {
        self.expense.saturating_sub(self.income)
    }
}

pub struct FinancialProjector;

impl FinancialProjector {
    pub fn project(contract: &ContractRecord) -> ProjectionResult {
        let start = contract.start_date();
        let end = contract.end_date();

        let duration_days = days_between(start, end);
        let duration_months = months_ceil_between(start, end);

        let total_cost =
            duration_months.map(|months| CostBreakdown::for_months(contract, months).net_cost());

        ProjectionResult {
            duration_days,
            duration_months,
            total_cost,
            balance: total_cost.map(|cost| cost.saturating_neg()),
        }
    }
}

pub fn project_contract(contract: &ContractRecord) -> ProjectionResult {
    FinancialProjector::project(contract)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_contract() -> ContractRecord {
        ContractRecord::new("c1")
            .with_dates("2023-01-01", "2023-07-01")
            .with_fees(3300, 1000, 2000)
            .with_cashback(5000)
            .with_device(10000, 8000)
    }

    #[test]
    fn test_basic_projection() {
        let result = project_contract(&canonical_contract());

        // Expense: 3300 + 1000 + 2000 * 7 + 10000 = 28300
        // Income:  5000 + 8000 = 13000
        assert_eq!(result.duration_days, Some(181));
        assert_eq!(result.duration_months, Some(7));
        assert_eq!(result.total_cost, Some(15300));
        assert_eq!(result.balance, Some(-15300));
    }

    #[test]
    fn test_missing_dates_yield_unknown() {
        let contract = ContractRecord::new("c2")
            .with_fees(3300, 1000, 2000)
            .with_device(10000, 8000);

        let result = project_contract(&contract);
        assert_eq!(result.duration_days, None);
        assert_eq!(result.duration_months, None);
        assert_eq!(result.total_cost, None);
        assert_eq!(result.balance, None);
        assert!(!result.is_known());
    }

    #[test]
    fn test_missing_amounts_count_as_zero() {
        let contract = ContractRecord::new("c3")
            .with_dates("2023-01-01", "2023-02-01")
            .with_fees(3300, 1000, 2000);

        let result = project_contract(&contract);
        assert_eq!(result.duration_months, Some(2));
        assert_eq!(result.total_cost, Some(8300));
        assert_eq!(result.balance, Some(-8300));
    }

    #[test]
    fn test_end_before_start_is_unknown() {
        let contract = ContractRecord::new("c4")
            .with_dates("2023-07-01", "2023-01-01")
            .with_fees(3300, 1000, 2000);

        assert_eq!(project_contract(&contract), ProjectionResult::default());
    }

    #[test]
    fn test_malformed_date_falls_back_then_gives_up() {
        let slashed = ContractRecord::new("c5")
            .with_dates("2023/01/01", "2023/07/01")
            .with_fees(3300, 1000, 2000);
        assert_eq!(project_contract(&slashed).duration_months, Some(7));

        let garbage = ContractRecord::new("c6")
            .with_dates("01.01.2023", "2023-07-01")
            .with_fees(3300, 1000, 2000);
        assert_eq!(project_contract(&garbage).total_cost, None);
    }

    #[test]
    fn test_same_day_contract_has_zero_months() {
        let contract = ContractRecord::new("c7")
            .with_dates("2023-01-01", "2023-01-01")
            .with_fees(3300, 1000, 2000);

        let result = project_contract(&contract);
        assert_eq!(result.duration_days, Some(0));
        assert_eq!(result.duration_months, Some(0));
        assert_eq!(result.total_cost, Some(4300));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let contract = canonical_contract();
        let before = contract.clone();

        let first = project_contract(&contract);
        let second = project_contract(&contract);

        assert_eq!(first, second);
        assert_eq!(contract, before);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let contract = ContractRecord::new("c8")
            .with_dates("2023-01-01", "2023-07-01")
            .with_fees(0, 0, i64::MAX);

        assert_eq!(project_contract(&contract).total_cost, Some(i64::MAX));
    }
}
