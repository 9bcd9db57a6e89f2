use serde::{Deserialize, Serialize};

/// Ordered, human-readable feature list attached to a plan. Persisted as a
/// serialized JSON array in the `plans.features` text column and only decoded
/// at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PlanFeatures(pub Vec<String>);

impl PlanFeatures {
    pub fn from_stored(raw: &str) -> Self {
        serde_json::from_str::<Vec<String>>(raw)
            .map(PlanFeatures)
            .unwrap_or_default()
    }

    pub fn to_stored(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<&str>> for PlanFeatures {
    fn from(value: Vec<&str>) -> Self {
        PlanFeatures(value.into_iter().map(str::to_string).collect())
    }
}
