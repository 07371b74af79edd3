//! Declarative column expectations.

use crate::dataset::CellValue;
use crate::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameter-free tag of an [`ExpectationKind`].
///
/// Together with the column name it forms an expectation's identity, which is
/// what labels are looked up by and what suites de-duplicate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    NotNull,
    Unique,
    Between,
    InSet,
    MatchesPattern,
}

impl RuleKind {
    /// All rule kinds, in declaration order.
    pub const ALL: [RuleKind; 5] = [
        RuleKind::NotNull,
        RuleKind::Unique,
        RuleKind::Between,
        RuleKind::InSet,
        RuleKind::MatchesPattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::NotNull => "not_null",
            RuleKind::Unique => "unique",
            RuleKind::Between => "between",
            RuleKind::InSet => "in_set",
            RuleKind::MatchesPattern => "matches_pattern",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = DqError;

    fn from_str(s: &str) -> Result<Self> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DqError::UnsupportedRuleKind {
                kind: s.to_string(),
            })
    }
}

/// A literal member of an `InSet` expectation.
///
/// Numeric literals compare by value, so `Integer(1)` matches a float cell
/// holding `1.0`. Date cells compare by their `YYYY-MM-DD` rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LiteralValue {
    /// Returns true if the cell equals this literal.
    pub fn matches(&self, cell: &CellValue<'_>) -> bool {
        match (self, cell) {
            (LiteralValue::Text(expected), CellValue::Text(actual)) => expected == actual,
            (LiteralValue::Text(expected), CellValue::Date(_)) => *expected == cell.render(),
            (LiteralValue::Integer(expected), _) => cell.as_f64() == Some(*expected as f64),
            (LiteralValue::Float(expected), _) => cell.as_f64() == Some(*expected),
            _ => false,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Integer(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Float(value)
    }
}

/// The rule an expectation applies, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectationKind {
    /// No value may be null.
    NotNull,
    /// No non-null value may occur more than once.
    Unique,
    /// Every value must be numeric and inside the bound.
    Between {
        min: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        strict_min: bool,
        #[serde(default)]
        strict_max: bool,
    },
    /// Every non-null value must be one of `allowed_values`.
    InSet { allowed_values: Vec<LiteralValue> },
    /// Every value must be present and fully match `regex`.
    MatchesPattern { regex: String },
}

impl ExpectationKind {
    pub fn rule_kind(&self) -> RuleKind {
        match self {
            ExpectationKind::NotNull => RuleKind::NotNull,
            ExpectationKind::Unique => RuleKind::Unique,
            ExpectationKind::Between { .. } => RuleKind::Between,
            ExpectationKind::InSet { .. } => RuleKind::InSet,
            ExpectationKind::MatchesPattern { .. } => RuleKind::MatchesPattern,
        }
    }

    fn validate(&self, column: &str) -> Result<()> {
        match self {
            ExpectationKind::Between { min, max, .. } => {
                if min.is_nan() {
                    return Err(DqError::invalid_bounds(column, "min must be a number"));
                }
                match max {
                    Some(max) if max.is_nan() => {
                        Err(DqError::invalid_bounds(column, "max must be a number"))
                    }
                    Some(max) if max < min => Err(DqError::invalid_bounds(
                        column,
                        format!("min {min} is greater than max {max}"),
                    )),
                    _ => Ok(()),
                }
            }
            ExpectationKind::MatchesPattern { regex } => {
                compile_anchored(regex)?;
                Ok(())
            }
            ExpectationKind::NotNull | ExpectationKind::Unique | ExpectationKind::InSet { .. } => {
                Ok(())
            }
        }
    }
}

/// Compiles `pattern` so that it must match the whole value.
pub(crate) fn compile_anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| DqError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The identity of an expectation: rule kind plus column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpectationIdentity {
    pub kind: RuleKind,
    pub column: String,
}

impl fmt::Display for ExpectationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.column)
    }
}

/// A single declarative data-quality rule bound to one column.
///
/// Expectations are validated when constructed and cannot be changed
/// afterwards.
///
/// # Examples
///
/// ```rust
/// use dq_guard::core::{Expectation, RuleKind};
///
/// let quantity = Expectation::between("Quantity", 1.0, Some(10.0)).unwrap();
/// assert_eq!(quantity.rule_kind(), RuleKind::Between);
///
/// let date = Expectation::matches_pattern("Transaction Date", r"\d{4}-\d{2}-\d{2}").unwrap();
/// assert_eq!(date.column(), "Transaction Date");
///
/// assert!(Expectation::matches_pattern("Transaction Date", "(").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpectationDef", into = "ExpectationDef")]
pub struct Expectation {
    column: String,
    kind: ExpectationKind,
    label: Option<String>,
}

impl Expectation {
    /// Creates an expectation after validating its parameters.
    pub fn new(column: impl Into<String>, kind: ExpectationKind) -> Result<Self> {
        let column = column.into();
        kind.validate(&column)?;
        Ok(Self {
            column,
            kind,
            label: None,
        })
    }

    pub fn not_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            kind: ExpectationKind::NotNull,
            label: None,
        }
    }

    pub fn unique(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            kind: ExpectationKind::Unique,
            label: None,
        }
    }

    /// Inclusive range check; `max = None` leaves the upper end open.
    pub fn between(column: impl Into<String>, min: f64, max: Option<f64>) -> Result<Self> {
        Self::between_with(column, min, max, false, false)
    }

    /// Range check with explicit strictness on each end.
    pub fn between_with(
        column: impl Into<String>,
        min: f64,
        max: Option<f64>,
        strict_min: bool,
        strict_max: bool,
    ) -> Result<Self> {
        Self::new(
            column,
            ExpectationKind::Between {
                min,
                max,
                strict_min,
                strict_max,
            },
        )
    }

    /// Open-ended check that every value is strictly greater than `min`.
    pub fn greater_than(column: impl Into<String>, min: f64) -> Result<Self> {
        Self::between_with(column, min, None, true, false)
    }

    pub fn in_set<I, V>(column: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralValue>,
    {
        Self {
            column: column.into(),
            kind: ExpectationKind::InSet {
                allowed_values: allowed_values.into_iter().map(Into::into).collect(),
            },
            label: None,
        }
    }

    pub fn matches_pattern(column: impl Into<String>, regex: impl Into<String>) -> Result<Self> {
        Self::new(
            column,
            ExpectationKind::MatchesPattern {
                regex: regex.into(),
            },
        )
    }

    /// Attaches a display label. Labels do not take part in identity.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> &ExpectationKind {
        &self.kind
    }

    pub fn rule_kind(&self) -> RuleKind {
        self.kind.rule_kind()
    }

    pub fn identity(&self) -> ExpectationIdentity {
        ExpectationIdentity {
            kind: self.rule_kind(),
            column: self.column.clone(),
        }
    }

    /// Returns true if `other` has the same rule kind and column.
    pub fn same_identity(&self, other: &Expectation) -> bool {
        self.rule_kind() == other.rule_kind() && self.column == other.column
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpectationKind::NotNull => write!(f, "{} is not null", self.column),
            ExpectationKind::Unique => write!(f, "{} is unique", self.column),
            ExpectationKind::Between {
                min,
                max,
                strict_min,
                strict_max,
            } => {
                let lower = if *strict_min { ">" } else { ">=" };
                write!(f, "{} {lower} {min}", self.column)?;
                if let Some(max) = max {
                    let upper = if *strict_max { "<" } else { "<=" };
                    write!(f, " and {upper} {max}")?;
                }
                Ok(())
            }
            ExpectationKind::InSet { allowed_values } => {
                let values = allowed_values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{} in [{values}]", self.column)
            }
            ExpectationKind::MatchesPattern { regex } => {
                write!(f, "{} matches /{regex}/", self.column)
            }
        }
    }
}

/// Wire shape of an expectation in suite definitions:
/// `{"column": "...", "kind": "between", "min": 1.0, "label": "...", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExpectationDef {
    pub(crate) column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(flatten)]
    pub(crate) kind: ExpectationKind,
}

impl TryFrom<ExpectationDef> for Expectation {
    type Error = DqError;

    fn try_from(def: ExpectationDef) -> Result<Self> {
        let mut expectation = Expectation::new(def.column, def.kind)?;
        expectation.label = def.label;
        Ok(expectation)
    }
}

impl From<Expectation> for ExpectationDef {
    fn from(expectation: Expectation) -> Self {
        ExpectationDef {
            column: expectation.column,
            label: expectation.label,
            kind: expectation.kind,
        }
    }
}
