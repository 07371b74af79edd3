//! Expectation suites and the registry that keeps them.

use super::expectation::{Expectation, ExpectationDef, ExpectationIdentity, RuleKind};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A named, ordered collection of expectations.
///
/// Expectation order is preserved and is the order in which results are
/// reported. Two expectations with the same identity (rule kind and column)
/// cannot coexist in a suite; the first one added wins.
///
/// # Examples
///
/// ```rust
/// use dq_guard::core::{Expectation, ExpectationSuite};
///
/// let suite = ExpectationSuite::builder("transactions")
///     .description("Checks for the cafe transaction export")
///     .expectation(Expectation::not_null("Transaction ID"))
///     .expectation(Expectation::unique("Transaction ID"))
///     .build();
///
/// assert_eq!(suite.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectationSuite {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    expectations: Vec<Expectation>,
}

impl ExpectationSuite {
    /// Creates an empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            expectations: Vec::new(),
        }
    }

    pub fn builder(name: impl Into<String>) -> ExpectationSuiteBuilder {
        ExpectationSuiteBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Returns true if an expectation with this identity is already present.
    pub fn contains(&self, identity: &ExpectationIdentity) -> bool {
        self.expectations
            .iter()
            .any(|e| e.rule_kind() == identity.kind && e.column() == identity.column)
    }

    /// Distinct columns referenced by the suite, in first-use order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for expectation in &self.expectations {
            if !columns.contains(&expectation.column()) {
                columns.push(expectation.column());
            }
        }
        columns
    }

    /// Columns that carry a `Between` rule and therefore need numeric values.
    pub fn numeric_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for expectation in &self.expectations {
            if expectation.rule_kind() == RuleKind::Between
                && !columns.contains(&expectation.column())
            {
                columns.push(expectation.column());
            }
        }
        columns
    }

    /// Appends an expectation. Returns false, leaving the suite unchanged,
    /// when an expectation with the same identity already exists.
    pub fn add_expectation(&mut self, expectation: Expectation) -> bool {
        if self
            .expectations
            .iter()
            .any(|existing| existing.same_identity(&expectation))
        {
            debug!(
                suite.name = %self.name,
                expectation.identity = %expectation.identity(),
                "Skipping duplicate expectation"
            );
            return false;
        }
        self.expectations.push(expectation);
        true
    }

    /// Populates an empty suite exactly once.
    ///
    /// If the suite already holds expectations (it was populated before or
    /// loaded from a definition) nothing is added. Returns the number of
    /// expectations added.
    ///
    /// ```rust
    /// use dq_guard::core::{Expectation, ExpectationSuite};
    ///
    /// let mut suite = ExpectationSuite::new("ids");
    /// let rules = || vec![Expectation::not_null("id"), Expectation::unique("id")];
    ///
    /// assert_eq!(suite.populate(rules()), 2);
    /// assert_eq!(suite.populate(rules()), 0);
    /// assert_eq!(suite.len(), 2);
    /// ```
    pub fn populate<I>(&mut self, expectations: I) -> usize
    where
        I: IntoIterator<Item = Expectation>,
    {
        if !self.is_empty() {
            warn!(
                suite.name = %self.name,
                suite.expectations = self.len(),
                "Suite already populated, skipping"
            );
            return 0;
        }
        let mut added = 0;
        for expectation in expectations {
            if self.add_expectation(expectation) {
                added += 1;
            }
        }
        added
    }

    /// Serializes the suite definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a suite definition.
    ///
    /// Unknown rule kinds fail with [`DqError::UnsupportedRuleKind`]; invalid
    /// parameters fail with the same errors as the expectation constructors.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSuite = serde_json::from_str(json)?;
        let mut suite = ExpectationSuite {
            name: raw.name,
            description: raw.description,
            expectations: Vec::with_capacity(raw.expectations.len()),
        };

        for value in raw.expectations {
            let kind = value
                .get("kind")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| {
                    DqError::Configuration(format!(
                        "Expectation in suite '{}' has no 'kind'",
                        suite.name
                    ))
                })?;
            kind.parse::<RuleKind>()?;

            let def: ExpectationDef = serde_json::from_value(value)?;
            let expectation = Expectation::try_from(def)?;
            if !suite.add_expectation(expectation) {
                warn!(
                    suite.name = %suite.name,
                    "Suite definition contains a duplicate expectation"
                );
            }
        }
        Ok(suite)
    }

    /// Writes the suite definition to `path`.
    #[instrument(skip(self, path), fields(suite.name = %self.name))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(suite.path = %path.display(), "Saved suite definition");
        Ok(())
    }

    /// Reads a suite definition from `path`.
    #[instrument(skip(path))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let suite = Self::from_json(&json)?;
        info!(
            suite.name = %suite.name,
            suite.expectations = suite.len(),
            suite.path = %path.display(),
            "Loaded suite definition"
        );
        Ok(suite)
    }
}

#[derive(Deserialize)]
struct RawSuite {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    expectations: Vec<serde_json::Value>,
}

/// Builder for [`ExpectationSuite`].
#[derive(Debug)]
pub struct ExpectationSuiteBuilder {
    suite: ExpectationSuite,
}

impl ExpectationSuiteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            suite: ExpectationSuite::new(name),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.suite.description = Some(description.into());
        self
    }

    /// Adds an expectation; duplicates by identity are dropped.
    pub fn expectation(mut self, expectation: Expectation) -> Self {
        self.suite.add_expectation(expectation);
        self
    }

    pub fn expectations<I>(mut self, expectations: I) -> Self
    where
        I: IntoIterator<Item = Expectation>,
    {
        for expectation in expectations {
            self.suite.add_expectation(expectation);
        }
        self
    }

    pub fn build(self) -> ExpectationSuite {
        self.suite
    }
}

/// Named store of suites with create-once, reuse-afterwards semantics.
///
/// ```rust
/// use dq_guard::core::{Expectation, SuiteRegistry};
///
/// let mut registry = SuiteRegistry::new();
/// registry
///     .get_or_create("transactions")
///     .populate([Expectation::not_null("Transaction ID")]);
///
/// // A second setup pass reuses the stored suite instead of duplicating rules.
/// registry
///     .get_or_create("transactions")
///     .populate([Expectation::not_null("Transaction ID")]);
///
/// assert_eq!(registry.get("transactions").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SuiteRegistry {
    suites: HashMap<String, ExpectationSuite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the suite named `name`, creating an empty one on first use.
    pub fn get_or_create(&mut self, name: &str) -> &mut ExpectationSuite {
        self.suites.entry(name.to_string()).or_insert_with(|| {
            debug!(suite.name = %name, "Creating new suite");
            ExpectationSuite::new(name)
        })
    }

    pub fn get(&self, name: &str) -> Option<&ExpectationSuite> {
        self.suites.get(name)
    }

    /// Stores `suite`, returning any suite previously stored under its name.
    pub fn insert(&mut self, suite: ExpectationSuite) -> Option<ExpectationSuite> {
        self.suites.insert(suite.name().to_string(), suite)
    }

    /// Loads a definition from disk and stores it under its own name.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&mut ExpectationSuite> {
        let suite = ExpectationSuite::load(path)?;
        let name = suite.name().to_string();
        self.suites.insert(name.clone(), suite);
        self.suites
            .get_mut(&name)
            .ok_or_else(|| DqError::Internal(format!("Suite '{name}' vanished after insert")))
    }

    /// Suite names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.suites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id_rules() -> Vec<Expectation> {
        vec![
            Expectation::not_null("Transaction ID"),
            Expectation::unique("Transaction ID"),
        ]
    }

    #[test]
    fn test_builder_preserves_order() {
        let suite = ExpectationSuite::builder("orders")
            .expectation(Expectation::unique("id"))
            .expectation(Expectation::not_null("id"))
            .expectation(Expectation::in_set("status", ["open", "closed"]))
            .build();

        let kinds: Vec<_> = suite.expectations().iter().map(|e| e.rule_kind()).collect();
        assert_eq!(
            kinds,
            vec![RuleKind::Unique, RuleKind::NotNull, RuleKind::InSet]
        );
    }

    #[test]
    fn test_duplicate_identity_is_rejected() {
        let mut suite = ExpectationSuite::new("orders");
        assert!(suite.add_expectation(Expectation::between("qty", 1.0, Some(10.0)).unwrap()));
        assert!(!suite.add_expectation(Expectation::between("qty", 0.0, None).unwrap()));
        assert_eq!(suite.len(), 1);
        assert!(suite.contains(&ExpectationIdentity {
            kind: RuleKind::Between,
            column: "qty".to_string(),
        }));
    }

    #[test]
    fn test_populate_is_idempotent() {
        let mut suite = ExpectationSuite::new("transactions");
        assert_eq!(suite.populate(id_rules()), 2);
        assert_eq!(suite.populate(id_rules()), 0);
        assert_eq!(suite.len(), 2);
    }

    #[test]
    fn test_populate_skips_loaded_suite() {
        let json = r#"{"name": "loaded", "expectations": [{"column": "id", "kind": "unique"}]}"#;
        let mut suite = ExpectationSuite::from_json(json).unwrap();
        assert_eq!(suite.populate(id_rules()), 0);
        assert_eq!(suite.len(), 1);
    }

    #[test]
    fn test_columns() {
        let suite = ExpectationSuite::builder("s")
            .expectation(Expectation::not_null("a"))
            .expectation(Expectation::between("b", 0.0, None).unwrap())
            .expectation(Expectation::unique("a"))
            .build();
        assert_eq!(suite.columns(), vec!["a", "b"]);
        assert_eq!(suite.numeric_columns(), vec!["b"]);
    }

    #[test]
    fn test_json_definition_round_trip() {
        let suite = ExpectationSuite::builder("transactions")
            .description("cafe sales")
            .expectation(Expectation::between("Quantity", 1.0, Some(10.0)).unwrap())
            .expectation(Expectation::in_set("Payment Method", ["Cash"]))
            .expectation(Expectation::matches_pattern("Date", r"\d{4}").unwrap())
            .build();

        let parsed = ExpectationSuite::from_json(&suite.to_json().unwrap()).unwrap();
        assert_eq!(parsed, suite);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let json = r#"{"name": "s", "expectations": [{"column": "a", "kind": "expect_magic"}]}"#;
        let err = ExpectationSuite::from_json(json).unwrap_err();
        assert!(matches!(err, DqError::UnsupportedRuleKind { ref kind } if kind == "expect_magic"));
    }

    #[test]
    fn test_invalid_pattern_in_definition() {
        let json = r#"{"name": "s", "expectations": [
            {"column": "a", "kind": "matches_pattern", "regex": "(unclosed"}
        ]}"#;
        let err = ExpectationSuite::from_json(json).unwrap_err();
        assert!(matches!(err, DqError::InvalidPattern { .. }));
    }

    #[test]
    fn test_missing_kind_is_configuration_error() {
        let json = r#"{"name": "s", "expectations": [{"column": "a"}]}"#;
        let err = ExpectationSuite::from_json(json).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suite.json");
        let suite = ExpectationSuite::builder("ids").expectations(id_rules()).build();

        suite.save(&path).unwrap();
        let loaded = ExpectationSuite::load(&path).unwrap();
        assert_eq!(loaded, suite);
    }

    #[test]
    fn test_registry_get_or_create_reuses_suite() {
        let mut registry = SuiteRegistry::new();
        registry.get_or_create("ids").populate(id_rules());
        registry.get_or_create("ids").populate(id_rules());
        registry.get_or_create("other");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("ids").unwrap().len(), 2);
        assert_eq!(registry.names(), vec!["ids", "other"]);
    }

    #[test]
    fn test_registry_load_file_replaces_by_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.json");
        ExpectationSuite::builder("ids")
            .expectations(id_rules())
            .build()
            .save(&path)
            .unwrap();

        let mut registry = SuiteRegistry::new();
        registry.get_or_create("ids");
        let loaded = registry.load_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(registry.len(), 1);
    }
}
