/// Validation plumbing shared by every schema: field paths, issues
/// and the typed readers that walk untyped JSON input.
///
/// Readers never fail fast: each one records an [`Issue`] in a [`Report`]
/// and returns `None`, so a single pass reports every shape problem at once.
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::schema::enums::Named;

/// One step in a path from the root of a value to a nested field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a field inside a validated value, rendered as
/// dot-joined segments (`Conditions.0.RequiredItems`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A single validation failure. Object-level refinements carry the path
/// of the object they apply to (the root path for top-level values).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: FieldPath,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Structured failure returned by every schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation issue(s): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationErrors {
    issues: Vec<Issue>,
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// `path: message` lines, one per issue.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.to_string()).collect()
    }

    /// True if any issue is attached exactly at `path`.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path.to_string() == path)
    }
}

/// Non-raising validation result, used by editors that want feedback
/// while a value is still incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub success: bool,
    pub issues: Vec<Issue>,
}

impl<T> From<&Result<T, ValidationErrors>> for ValidationOutcome {
    fn from(result: &Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                issues: Vec::new(),
            },
            Err(errors) => Self {
                success: false,
                issues: errors.issues().to_vec(),
            },
        }
    }
}

/// Accumulator for issues raised during one validation pass.
#[derive(Debug, Default)]
pub(crate) struct Report {
    issues: Vec<Issue>,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.issues.push(Issue {
            path: path.clone(),
            message: message.into(),
        });
    }

    /// Number of issues recorded so far. Validators compare marks taken
    /// before and after a sub-check to learn whether it was clean.
    pub(crate) fn mark(&self) -> usize {
        self.issues.len()
    }

    pub(crate) fn clean_since(&self, mark: usize) -> bool {
        self.issues.len() == mark
    }

    /// Turn the pass into a result. A missing value with no recorded
    /// issue still fails, so callers can't leak a half-built value.
    pub(crate) fn finish<T>(mut self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => {
                if self.issues.is_empty() {
                    self.push(&FieldPath::root(), "Invalid input");
                }
                Err(ValidationErrors {
                    issues: self.issues,
                })
            }
        }
    }
}

/// JSON type name as it appears in "Expected X, received Y" messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(report: &mut Report, path: &FieldPath, wanted: &str, value: &Value) {
    report.push(
        path,
        format!("Expected {}, received {}", wanted, kind_of(value)),
    );
}

/// Read-only view over one JSON object being validated.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    pub(crate) fn open(value: &'a Value, path: &FieldPath, report: &mut Report) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                map,
                path: path.clone(),
            }),
            other => {
                expected(report, path, "object", other);
                None
            }
        }
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Run `check` on a field that must be present.
    pub(crate) fn required<T>(
        &self,
        key: &str,
        report: &mut Report,
        check: impl FnOnce(&'a Value, &FieldPath, &mut Report) -> Option<T>,
    ) -> Option<T> {
        let path = self.path.key(key);
        match self.map.get(key) {
            Some(value) => check(value, &path, report),
            None => {
                report.push(&path, "Required");
                None
            }
        }
    }

    /// Run `check` on a field only when it is present.
    pub(crate) fn optional<T>(
        &self,
        key: &str,
        report: &mut Report,
        check: impl FnOnce(&'a Value, &FieldPath, &mut Report) -> Option<T>,
    ) -> Option<T> {
        let value = self.map.get(key)?;
        check(value, &self.path.key(key), report)
    }

    /// Optional field with a fallback used when the key is absent.
    pub(crate) fn defaulted<T>(
        &self,
        key: &str,
        default: T,
        report: &mut Report,
        check: impl FnOnce(&'a Value, &FieldPath, &mut Report) -> Option<T>,
    ) -> Option<T> {
        match self.map.get(key) {
            Some(value) => check(value, &self.path.key(key), report),
            None => Some(default),
        }
    }
}

pub(crate) fn boolean(value: &Value, path: &FieldPath, report: &mut Report) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => {
            expected(report, path, "boolean", other);
            None
        }
    }
}

pub(crate) fn string(value: &Value, path: &FieldPath, report: &mut Report) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            expected(report, path, "string", other);
            None
        }
    }
}

pub(crate) fn non_empty_string(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
) -> Option<String> {
    let s = string(value, path, report)?;
    if s.is_empty() {
        report.push(path, "String must contain at least 1 character(s)");
        return None;
    }
    Some(s)
}

pub(crate) fn number(value: &Value, path: &FieldPath, report: &mut Report) -> Option<f64> {
    match value.as_f64() {
        Some(n) if value.is_number() => Some(n),
        _ => {
            expected(report, path, "number", value);
            None
        }
    }
}

pub(crate) fn positive_number(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
) -> Option<f64> {
    let n = number(value, path, report)?;
    if n <= 0.0 {
        report.push(path, "Number must be greater than 0");
        return None;
    }
    Some(n)
}

/// Any whole number. `3.0` counts, `1.5` does not.
pub(crate) fn integer(value: &Value, path: &FieldPath, report: &mut Report) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let n = number(value, path, report)?;
    if n.fract() != 0.0 || n < i64::MIN as f64 || n > i64::MAX as f64 {
        report.push(path, "Expected integer, received float");
        return None;
    }
    Some(n as i64)
}

/// Whole number of at least `min`, capped only when `max` is given.
pub(crate) fn unsigned(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
    min: u64,
    max: Option<u64>,
) -> Option<u64> {
    let n = match value.as_u64() {
        Some(n) => Some(n),
        None => u64::try_from(integer(value, path, report)?).ok(),
    };
    let n = match n {
        Some(n) if n >= min => n,
        _ => {
            report.push(
                path,
                format!("Number must be greater than or equal to {}", min),
            );
            return None;
        }
    };
    if let Some(max) = max {
        if n > max {
            report.push(path, format!("Number must be less than or equal to {}", max));
            return None;
        }
    }
    Some(n)
}

/// Array of at least `min_len` items, each validated by `each`.
pub(crate) fn array<T>(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
    min_len: usize,
    mut each: impl FnMut(&Value, &FieldPath, &mut Report) -> Option<T>,
) -> Option<Vec<T>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            expected(report, path, "array", other);
            return None;
        }
    };
    let mark = report.mark();
    if items.len() < min_len {
        report.push(
            path,
            format!("Array must contain at least {} element(s)", min_len),
        );
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(parsed) = each(item, &path.index(i), report) {
            out.push(parsed);
        }
    }
    report.clean_since(mark).then_some(out)
}

pub(crate) fn string_list(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
    min_len: usize,
) -> Option<Vec<String>> {
    array(value, path, report, min_len, string)
}

/// Member of a closed enumeration, matched by its exact name.
pub(crate) fn variant<E: Named>(value: &Value, path: &FieldPath, report: &mut Report) -> Option<E> {
    let name = string(value, path, report)?;
    match E::from_name(&name) {
        Some(v) => Some(v),
        None => {
            let options = E::ALL
                .iter()
                .map(|v| format!("'{}'", v.as_str()))
                .collect::<Vec<_>>()
                .join(" | ");
            report.push(
                path,
                format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    options, name
                ),
            );
            None
        }
    }
}
