use crate::engine::ProjectionResult;
use crate::schema::ContractRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contract as displayed: its own projection plus the running total of its chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSummary {
    pub contract: ContractRecord,
    pub projection: ProjectionResult,
    pub chain_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReport {
    pub owner_name: String,
    pub rows: Vec<ContractSummary>,
}

const CSV_HEADER: &str = "Contract ID,Phone Number,Carrier,Plan,Start Date,End Date,Days,Months,Total Cost,Balance,Chain Total\n";

impl ContractReport {
    pub fn find(&self, contract_id: &str) -> Option<&ContractSummary> {
        self.rows
            .iter()
            .find(|row| row.contract.contract_id == contract_id)
    }

    /// Sum of every known `total_cost`. Contracts with unknown duration are skipped.
    pub fn grand_total_cost(&self) -> i64 {
        self.rows
            .iter()
            .filter_map(|row| row.projection.total_cost)
            .fold(0i64, i64::saturating_add)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from(CSV_HEADER);

        for row in &self.rows {
            let contract = &row.contract;
            let fields = [
                csv_field(&contract.contract_id),
                csv_field(contract.phone_number.as_deref().unwrap_or("")),
                csv_field(contract.carrier_name.as_deref().unwrap_or("")),
                csv_field(contract.plan_name.as_deref().unwrap_or("")),
                format_date(contract.start_date()),
                format_date(contract.end_date()),
                format_amount(row.projection.duration_days),
                format_amount(row.projection.duration_months),
                format_amount(row.projection.total_cost),
                format_amount(row.projection.balance),
                row.chain_total.to_string(),
            ];
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Contracts - {}\n\n", self.owner_name));
        output.push_str(&format!("**Contracts:** {}\n\n", self.rows.len()));
        output.push_str(&format!("**Total Cost:** {}\n\n", self.grand_total_cost()));

        output.push_str("| Contract | Phone | Carrier / Plan | Period | Months | Total Cost | Chain Total |\n");
        output.push_str("|---|---|---|---|---|---|---|\n");

        for row in &self.rows {
            let contract = &row.contract;
            let carrier_plan = match (&contract.carrier_name, &contract.plan_name) {
                (Some(carrier), Some(plan)) => {
                    format!("{} / {}", markdown_cell(carrier), markdown_cell(plan))
                }
                (Some(carrier), None) => markdown_cell(carrier),
                (None, Some(plan)) => markdown_cell(plan),
                (None, None) => "-".to_string(),
            };

            output.push_str(&format!(
                "| {} | {} | {} | {} → {} | {} | {} | {} |\n",
                markdown_cell(&contract.contract_id),
                markdown_cell(contract.phone_number.as_deref().unwrap_or("-")),
                carrier_plan,
                display_date(contract.start_date()),
                display_date(contract.end_date()),
                display_amount(row.projection.duration_months),
                display_amount(row.projection.total_cost),
                row.chain_total,
            ));
        }

        output
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Table cells cannot contain pipes or line breaks.
fn markdown_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(&['\r', '\n'][..], " ")
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_amount(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn display_amount(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}
