use crate::catalog::Carrier;
use crate::error::Result;
use crate::utils::parse_date;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A contract date as supplied by the caller.
///
/// ISO dates deserialize as [`ContractDate::Date`]; any other JSON value, including numbers
/// and objects, is kept verbatim as [`ContractDate::Raw`] and only interpreted when resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ContractDate {
    #[schemars(description = "Calendar date in YYYY-MM-DD format")]
    Date(NaiveDate),

    #[schemars(
        description = "Free-form date text. YYYY-MM-DD and YYYY/MM/DD are understood; anything else is treated as unknown."
    )]
    Raw(String),
}

impl ContractDate {
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            ContractDate::Date(date) => Some(*date),
            ContractDate::Raw(raw) => parse_date(raw),
        }
    }
}

impl<'de> Deserialize<'de> for ContractDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => ContractDate::from(raw),
            other => ContractDate::Raw(other.to_string()),
        })
    }
}

impl From<NaiveDate> for ContractDate {
    fn from(date: NaiveDate) -> Self {
        ContractDate::Date(date)
    }
}

impl From<String> for ContractDate {
    /// Text in the canonical ISO layout becomes a typed date, matching what deserialization does.
    fn from(raw: String) -> Self {
        match raw.parse::<NaiveDate>() {
            Ok(date) => ContractDate::Date(date),
            Err(_) => ContractDate::Raw(raw),
        }
    }
}

impl From<&str> for ContractDate {
    fn from(raw: &str) -> Self {
        ContractDate::from(raw.to_string())
    }
}

/// On input the legacy keys `contract_date` and `scheduled_termination_date` are accepted
/// as well. When a record carries both spellings, the current key wins unless it is null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
pub struct ContractRecord {
    #[schemars(description = "Unique identifier of the contract")]
    pub contract_id: String,

    #[serde(default)]
    #[schemars(description = "Identifier of the contract this one replaced, if recorded")]
    pub previous_contract_id: Option<String>,

    #[serde(default)]
    #[schemars(description = "Date the contract started")]
    pub contract_start_date: Option<ContractDate>,

    #[serde(default)]
    #[schemars(description = "Date the contract is planned to end")]
    pub contract_end_date: Option<ContractDate>,

    #[serde(default)]
    #[schemars(
        description = "Phone number of the line. Contracts sharing a number form a chain of successive agreements."
    )]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub contractor_name: Option<String>,

    #[serde(default)]
    pub carrier_name: Option<String>,

    #[serde(default)]
    pub plan_name: Option<String>,

    #[serde(default)]
    pub sim_id_last_5_digits: Option<String>,

    #[serde(default)]
    #[schemars(description = "One-off activation fee, in the smallest currency unit")]
    pub initial_fee: Option<i64>,

    #[serde(default)]
    #[schemars(description = "Charge for the first month, in the smallest currency unit")]
    pub first_month_cost: Option<i64>,

    #[serde(default)]
    #[schemars(description = "Recurring monthly charge, in the smallest currency unit")]
    pub monthly_cost: Option<i64>,

    #[serde(default)]
    #[schemars(description = "Cashback received for the contract, in the smallest currency unit")]
    pub cashback_amount: Option<i64>,

    #[serde(default)]
    pub device_type: Option<String>,

    #[serde(default)]
    #[schemars(description = "Price paid for the handset, in the smallest currency unit")]
    pub device_cost: Option<i64>,

    #[serde(default)]
    #[schemars(description = "Expected resale value of the handset, in the smallest currency unit")]
    pub device_resale_value: Option<i64>,

    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Deserialize)]
struct ContractRecordInput {
    contract_id: String,
    #[serde(default)]
    previous_contract_id: Option<String>,
    #[serde(default)]
    contract_start_date: Option<ContractDate>,
    #[serde(default)]
    contract_date: Option<ContractDate>,
    #[serde(default)]
    contract_end_date: Option<ContractDate>,
    #[serde(default)]
    scheduled_termination_date: Option<ContractDate>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    contractor_name: Option<String>,
    #[serde(default)]
    carrier_name: Option<String>,
    #[serde(default)]
    plan_name: Option<String>,
    #[serde(default)]
    sim_id_last_5_digits: Option<String>,
    #[serde(default)]
    initial_fee: Option<i64>,
    #[serde(default)]
    first_month_cost: Option<i64>,
    #[serde(default)]
    monthly_cost: Option<i64>,
    #[serde(default)]
    cashback_amount: Option<i64>,
    #[serde(default)]
    device_type: Option<String>,
    #[serde(default)]
    device_cost: Option<i64>,
    #[serde(default)]
    device_resale_value: Option<i64>,
    #[serde(default)]
    memo: Option<String>,
}

impl From<ContractRecordInput> for ContractRecord {
    fn from(input: ContractRecordInput) -> Self {
        Self {
            contract_id: input.contract_id,
            previous_contract_id: input.previous_contract_id,
            contract_start_date: input.contract_start_date.or(input.contract_date),
            contract_end_date: input.contract_end_date.or(input.scheduled_termination_date),
            phone_number: input.phone_number,
            contractor_name: input.contractor_name,
            carrier_name: input.carrier_name,
            plan_name: input.plan_name,
            sim_id_last_5_digits: input.sim_id_last_5_digits,
            initial_fee: input.initial_fee,
            first_month_cost: input.first_month_cost,
            monthly_cost: input.monthly_cost,
            cashback_amount: input.cashback_amount,
            device_type: input.device_type,
            device_cost: input.device_cost,
            device_resale_value: input.device_resale_value,
            memo: input.memo,
        }
    }
}

impl<'de> Deserialize<'de> for ContractRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ContractRecordInput::deserialize(deserializer).map(ContractRecord::from)
    }
}

impl ContractRecord {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            ..Default::default()
        }
    }

    pub fn with_dates(
        mut self,
        start: impl Into<ContractDate>,
        end: impl Into<ContractDate>,
    ) -> Self {
        self.contract_start_date = Some(start.into());
        self.contract_end_date = Some(end.into());
        self
    }

    pub fn with_start_date(mut self, start: impl Into<ContractDate>) -> Self {
        self.contract_start_date = Some(start.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_fees(mut self, initial_fee: i64, first_month_cost: i64, monthly_cost: i64) -> Self {
        self.initial_fee = Some(initial_fee);
        self.first_month_cost = Some(first_month_cost);
        self.monthly_cost = Some(monthly_cost);
        self
    }

    pub fn with_device(mut self, device_cost: i64, device_resale_value: i64) -> Self {
        self.device_cost = Some(device_cost);
        self.device_resale_value = Some(device_resale_value);
        self
    }

    pub fn with_cashback(mut self, cashback_amount: i64) -> Self {
        self.cashback_amount = Some(cashback_amount);
        self
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.contract_start_date.as_ref().and_then(ContractDate::resolve)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.contract_end_date.as_ref().and_then(ContractDate::resolve)
    }

    /// The phone number used as chain identity. Blank numbers count as absent.
    pub fn chain_key(&self) -> Option<&str> {
        self.phone_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
    }

    /// Monetary fields paired with their names, for validation and reporting.
    pub fn amounts(&self) -> [(&'static str, Option<i64>); 6] {
        [
            ("initial_fee", self.initial_fee),
            ("first_month_cost", self.first_month_cost),
            ("monthly_cost", self.monthly_cost),
            ("cashback_amount", self.cashback_amount),
            ("device_cost", self.device_cost),
            ("device_resale_value", self.device_resale_value),
        ]
    }
}

/// One owner's snapshot of carriers and contracts, as handed to the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContractPortfolio {
    #[schemars(description = "Name of the user who owns these contracts")]
    pub owner_name: String,

    #[serde(default)]
    #[schemars(description = "Carrier and plan catalog known to this owner")]
    pub carriers: Vec<Carrier>,

    #[serde(default)]
    #[schemars(description = "All contract records belonging to the owner")]
    pub contracts: Vec<ContractRecord>,
}

impl ContractPortfolio {
    pub fn new(owner_name: impl Into<String>, contracts: Vec<ContractRecord>) -> Self {
        Self {
            owner_name: owner_name.into(),
            carriers: Vec::new(),
            contracts,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ContractPortfolio)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = ContractPortfolio::schema_as_json().unwrap();
        assert!(schema_json.contains("owner_name"));
        assert!(schema_json.contains("contract_start_date"));
        assert!(schema_json.contains("device_resale_value"));
    }

    #[test]
    fn test_contract_date_deserialization() {
        let typed: ContractDate = serde_json::from_str("\"2023-01-01\"").unwrap();
        assert_eq!(
            typed,
            ContractDate::Date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        );

        let slashed: ContractDate = serde_json::from_str("\"2023/01/01\"").unwrap();
        assert_eq!(slashed, ContractDate::Raw("2023/01/01".to_string()));
        assert_eq!(slashed.resolve(), NaiveDate::from_ymd_opt(2023, 1, 1));

        let garbage: ContractDate = serde_json::from_str("\"someday\"").unwrap();
        assert_eq!(garbage.resolve(), None);
    }

    #[test]
    fn test_record_accepts_legacy_field_names() {
        let json = r#"{
            "contract_id": "c1",
            "contract_date": "2023-01-01",
            "scheduled_termination_date": "2023/07/01",
            "phone_number": "090-1234-5678",
            "initial_fee": 3300,
            "cashback_amount": null
        }"#;

        let record: ContractRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.start_date(), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(record.end_date(), NaiveDate::from_ymd_opt(2023, 7, 1));
        assert_eq!(record.initial_fee, Some(3300));
        assert_eq!(record.cashback_amount, None);
        assert_eq!(record.monthly_cost, None);
    }

    #[test]
    fn test_non_string_dates_degrade_to_unknown() {
        let json = r#"{
            "owner_name": "alice",
            "contracts": [
                {
                    "contract_id": "bad",
                    "contract_date": 20230101,
                    "contract_end_date": {"year": 2023},
                    "monthly_cost": 2000
                },
                {
                    "contract_id": "good",
                    "contract_start_date": "2023-01-01",
                    "contract_end_date": "2023-07-01",
                    "contract_date": null,
                    "monthly_cost": 2000
                }
            ]
        }"#;

        let portfolio = ContractPortfolio::from_json_str(json).unwrap();
        let bad = &portfolio.contracts[0];
        assert_eq!(
            bad.contract_start_date,
            Some(ContractDate::Raw("20230101".to_string()))
        );
        assert_eq!(bad.start_date(), None);
        assert_eq!(bad.end_date(), None);
        assert_eq!(crate::engine::project_contract(bad).total_cost, None);

        let good = &portfolio.contracts[1];
        assert_eq!(crate::engine::project_contract(good).total_cost, Some(14000));
    }

    #[test]
    fn test_current_key_wins_over_legacy_key() {
        let json = r#"{
            "contract_id": "both",
            "contract_date": "2022-01-01",
            "contract_start_date": "2023-01-01",
            "scheduled_termination_date": "2023-07-01",
            "contract_end_date": null
        }"#;

        let record: ContractRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.start_date(), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(record.end_date(), NaiveDate::from_ymd_opt(2023, 7, 1));
    }

    #[test]
    fn test_chain_key_ignores_blank_numbers() {
        assert_eq!(ContractRecord::new("a").chain_key(), None);
        assert_eq!(
            ContractRecord::new("b").with_phone_number("   ").chain_key(),
            None
        );
        assert_eq!(
            ContractRecord::new("c")
                .with_phone_number(" 090-0000-0000 ")
                .chain_key(),
            Some("090-0000-0000")
        );
    }

    #[test]
    fn test_portfolio_round_trip() {
        let portfolio = ContractPortfolio::new(
            "alice",
            vec![ContractRecord::new("c1").with_dates("2023-01-01", "2023-07-01")],
        );

        let json = portfolio.to_json().unwrap();
        assert!(json.contains("alice"));

        let restored = ContractPortfolio::from_json_str(&json).unwrap();
        assert_eq!(restored.owner_name, "alice");
        assert_eq!(restored.contracts, portfolio.contracts);
    }
}
