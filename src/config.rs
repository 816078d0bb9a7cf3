//! Options for a check run.

use serde::{Deserialize, Serialize};

use crate::error::{CheckKind, InputError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    /// Largest difference between occurrence rates still treated as equal.
    /// Must be finite and not negative.
    pub rate_tolerance: f64,
    /// Checks the caller does not want to run.
    pub skip: Vec<CheckKind>,
}

impl CheckConfig {
    /// Deserialize and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let config = serde_json::from_str::<CheckConfig>(json).map_err(|e| {
            InputError::parse("P001", format!("Failed to parse check config JSON: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !self.rate_tolerance.is_finite() || self.rate_tolerance < 0.0 {
            return Err(InputError::parse(
                "P006",
                format!(
                    "rateTolerance must be a finite, non-negative number, got {}",
                    self.rate_tolerance
                ),
            ));
        }
        Ok(())
    }

    pub fn runs(&self, check: CheckKind) -> bool {
        !self.skip.contains(&check)
    }
}
