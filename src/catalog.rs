use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    pub plan_name: String,

    #[serde(default)]
    #[schemars(description = "Activation fee charged by the plan, in the smallest currency unit")]
    pub initial_fee: i64,

    #[serde(default)]
    #[schemars(description = "Minimum number of days the contract must be kept before cancelling")]
    pub minimum_maintenance_period: u32,
}

impl Plan {
    /// Earliest date the line can be cancelled without breaching the minimum period.
    pub fn minimum_maintenance_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(u64::from(self.minimum_maintenance_period)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Carrier {
    pub carrier_name: String,

    #[serde(default)]
    pub plans: Vec<Plan>,
}

/// Read-only lookups over a list of carriers.
pub struct CarrierCatalog<'a> {
    carriers: &'a [Carrier],
}

impl<'a> CarrierCatalog<'a> {
    pub fn new(carriers: &'a [Carrier]) -> Self {
        Self { carriers }
    }

    pub fn carrier_by_name(&self, name: &str) -> Option<&'a Carrier> {
        self.carriers.iter().find(|c| c.carrier_name == name)
    }

    /// Plans offered by `carrier_name`; empty when the carrier is unknown.
    pub fn plans_for_carrier(&self, carrier_name: &str) -> &'a [Plan] {
        self.carrier_by_name(carrier_name)
            .map(|c| c.plans.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_plan(&self, carrier_name: &str, plan_name: &str) -> Option<&'a Plan> {
        self.plans_for_carrier(carrier_name)
            .iter()
            .find(|p| p.plan_name == plan_name)
    }

    pub fn carrier_names(&self) -> Vec<&'a str> {
        self.carriers
            .iter()
            .map(|c| c.carrier_name.as_str())
            .collect()
    }
}
