//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the matcher.

use serde::Deserialize;
use serde_json::Value;

use crate::{match_pattern, Pattern};

/// A complete matcher fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    pub cases: Vec<TestCase>,
}

/// One pattern/actual pair and its expected outcome
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// Expected pattern, as a plain JSON tree (`OneOf` has no YAML form).
    pub pattern: Value,
    /// The actual value to match against.
    pub actual: Value,
    pub expect: Expectation,
}

/// Expected outcome of a case.
/// Uses untagged deserialization: `match` (a bare string) or a list of
/// mismatch paths.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Expectation {
    /// The case must match; the string is always `"match"`.
    Match(String),
    /// The case must fail, citing exactly these paths.
    Mismatches(MismatchExpectation),
}

#[derive(Debug, Deserialize)]
pub struct MismatchExpectation {
    pub mismatches: Vec<String>,
}

/// Result of running a single case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub detail: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    ///
    /// # Errors
    ///
    /// Returns the underlying YAML error on malformed input.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML string with `---` separators
    ///
    /// # Errors
    ///
    /// Returns the underlying YAML error on malformed input.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all cases and return results
    #[must_use]
    pub fn run(&self) -> Vec<CaseResult> {
        self.cases.iter().map(TestCase::run).collect()
    }

    /// Run all cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "fixture '{}' case '{}' failed: {}",
                self.name, result.case_name, result.detail
            );
        }
    }
}

impl TestCase {
    fn run(&self) -> CaseResult {
        let pattern = Pattern::from(self.pattern.clone());
        let outcome = match_pattern(&pattern, &self.actual);

        let (passed, detail) = match (&self.expect, &outcome) {
            (Expectation::Match(_), Ok(())) => (true, String::new()),
            (Expectation::Match(_), Err(failure)) => {
                (false, format!("expected match, got:\n{failure}"))
            }
            (Expectation::Mismatches(_), Ok(())) => {
                (false, "expected mismatches, but the pattern matched".to_string())
            }
            (Expectation::Mismatches(want), Err(failure)) => {
                let got: Vec<&str> = failure.mismatches().iter().map(|m| m.path.as_str()).collect();
                if got == want.mismatches.iter().map(String::as_str).collect::<Vec<_>>() {
                    (true, String::new())
                } else {
                    (
                        false,
                        format!("expected paths {:?}, got {:?}", want.mismatches, got),
                    )
                }
            }
        };

        CaseResult {
            case_name: self.name.clone(),
            passed,
            detail,
        }
    }
}
