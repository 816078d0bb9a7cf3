//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::config::CheckConfig;
use crate::error::{InputError, ModelError, StructuralError};

/// Check a value-network snapshot.
/// `config_json` may be empty to run with the default configuration.
/// Returns a JSON object with `status` and an `errors` array.
#[wasm_bindgen]
pub fn check_model(json: &str, config_json: &str) -> JsValue {
    let result = check_model_inner(json, config_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn check_model_inner(json: &str, config_json: &str) -> CheckResult {
    let config = if config_json.trim().is_empty() {
        CheckConfig::default()
    } else {
        match CheckConfig::from_json(config_json) {
            Ok(c) => c,
            Err(e) => return CheckResult::Rejected(vec![ErrorDto::from(e)]),
        }
    };

    let (_, graph) = match crate::parse::parse_and_build(json) {
        Ok(parsed) => parsed,
        Err(errors) => {
            return CheckResult::Rejected(errors.into_iter().map(ErrorDto::from).collect());
        }
    };

    match crate::check::check_with(&graph, &config, &crate::check::LiteralFormulas) {
        Ok(errors) => CheckResult::Checked(errors.into_iter().map(ErrorDto::from).collect()),
        Err(e) => CheckResult::Rejected(vec![ErrorDto::from(e)]),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    message: String,
    subjects: Vec<String>,
}

impl From<InputError> for ErrorDto {
    fn from(e: InputError) -> Self {
        ErrorDto {
            code: e.code,
            message: e.message,
            subjects: e.node_id.into_iter().collect(),
        }
    }
}

impl From<StructuralError> for ErrorDto {
    fn from(e: StructuralError) -> Self {
        ErrorDto {
            code: "X001".into(),
            message: e.to_string(),
            subjects: vec![],
        }
    }
}

impl From<ModelError> for ErrorDto {
    fn from(e: ModelError) -> Self {
        ErrorDto {
            code: e.check.code().into(),
            message: e.message,
            subjects: e.subjects,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", content = "errors")]
enum CheckResult {
    #[serde(rename = "checked")]
    Checked(Vec<ErrorDto>),
    #[serde(rename = "rejected")]
    Rejected(Vec<ErrorDto>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(result: &CheckResult) -> Vec<&str> {
        match result {
            CheckResult::Checked(errors) | CheckResult::Rejected(errors) => {
                errors.iter().map(|e| e.code.as_str()).collect()
            }
        }
    }

    #[test]
    fn clean_fixture_is_checked_without_errors() {
        let json = include_str!("../tests/fixtures/buyer_seller.json");
        let result = check_model_inner(json, "");
        assert!(matches!(result, CheckResult::Checked(ref errors) if errors.is_empty()));
    }

    #[test]
    fn invalid_snapshot_is_rejected() {
        let result = check_model_inner("{", "");
        assert!(matches!(result, CheckResult::Rejected(_)));
        assert_eq!(codes(&result), vec!["P001"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let json = include_str!("../tests/fixtures/buyer_seller.json");
        let result = check_model_inner(json, r#"{"rateTolerance": "wide"}"#);
        assert_eq!(codes(&result), vec!["P001"]);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let json = include_str!("../tests/fixtures/buyer_seller.json");
        let result = check_model_inner(json, r#"{"rateTolerance": -1.0}"#);
        assert!(matches!(result, CheckResult::Rejected(_)));
        assert_eq!(codes(&result), vec!["P006"]);
    }

    #[test]
    fn skipped_findings_are_not_reported() {
        let json = r#"{"id": "n", "name": "n", "nodes": [{"id": "a", "type": "actor"}]}"#;
        let result = check_model_inner(json, "");
        assert_eq!(codes(&result), vec!["S001"]);
        let result = check_model_inner(json, r#"{"skip": ["startSignal"]}"#);
        assert!(codes(&result).is_empty());
    }
}
