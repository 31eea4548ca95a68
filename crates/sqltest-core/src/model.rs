//! Model graph: models, their columns and the tests attached to them
//!
//! The loader hands us already-parsed YAML values. Each `from_value`
//! constructor validates one level of that structure and reports the
//! offending input when it cannot be understood.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Named parameters of a test invocation, unique per key.
pub type TestParams = BTreeMap<String, ParamValue>;

/// A single test parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Convert a parsed YAML value.
    ///
    /// Returns `Ok(None)` for `null`, which callers treat as an absent key.
    pub fn from_yaml(value: &Value) -> Result<Option<Self>, String> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => ParamValue::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ParamValue::Integer(i),
                (None, Some(f)) => ParamValue::Float(f),
                (None, None) => return Err(format!("unsupported number {n}")),
            },
            Value::String(s) => ParamValue::String(s.clone()),
            Value::Sequence(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_yaml(item)? {
                        Some(v) => list.push(v),
                        None => return Err("lists may not contain null values".to_string()),
                    }
                }
                ParamValue::List(list)
            }
            Value::Mapping(_) => return Err("nested mappings are not supported".to_string()),
            Value::Tagged(tagged) => return Self::from_yaml(&tagged.value),
        };
        Ok(Some(converted))
    }

    /// The string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The list payload, if this is a list value.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ParamValue::String(_))
    }

    /// Render the value as it would be written in SQL, without quoting strings.
    pub fn to_raw_sql(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::String(s) => s.clone(),
            ParamValue::List(items) => items
                .iter()
                .map(ParamValue::to_raw_sql)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::String(s) => write!(f, "'{s}'"),
            ParamValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One test invocation: a registry name plus its parameters.
///
/// Two tests with equal name and parameters are equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTest {
    /// Name of the test in the assertion registry
    pub name: String,

    /// Named parameters passed to the test
    #[serde(default)]
    pub kwargs: TestParams,
}

impl ModelTest {
    /// Create a test without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kwargs: TestParams::new(),
        }
    }

    /// Builder-style parameter setter
    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }

    /// Parse a test entry.
    ///
    /// Accepts either a bare name (`unique`) or a single-key mapping from the
    /// name to its parameters (`{accepted_values: {values: [a, b]}}`).
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        match value {
            Value::String(name) => Ok(Self::new(name.clone())),
            Value::Mapping(map) if map.len() == 1 => {
                let (key, params) = map.iter().next().ok_or_else(|| CoreError::InvalidTest {
                    message: "empty test mapping".to_string(),
                })?;
                let name = key.as_str().ok_or_else(|| CoreError::InvalidTest {
                    message: format!("test name must be a string, found {}", to_flow(key)),
                })?;
                let kwargs = parse_params(name, params)?;
                Ok(Self {
                    name: name.to_string(),
                    kwargs,
                })
            }
            Value::Mapping(map) => Err(CoreError::InvalidTest {
                message: format!(
                    "expected a single test name per entry, found {} keys in {}",
                    map.len(),
                    to_flow(value)
                ),
            }),
            other => Err(CoreError::InvalidTest {
                message: format!("expected a test name or mapping, found {}", to_flow(other)),
            }),
        }
    }
}

fn parse_params(test: &str, params: &Value) -> CoreResult<TestParams> {
    let map = match params {
        Value::Null => return Ok(TestParams::new()),
        Value::Mapping(map) => map,
        other => {
            return Err(CoreError::InvalidTest {
                message: format!(
                    "parameters for test '{test}' must be a mapping, found {}",
                    to_flow(other)
                ),
            })
        }
    };

    let mut kwargs = TestParams::new();
    for (key, value) in map {
        let key = key.as_str().ok_or_else(|| CoreError::InvalidTest {
            message: format!("parameter names for test '{test}' must be strings"),
        })?;
        let converted = ParamValue::from_yaml(value).map_err(|reason| CoreError::InvalidTest {
            message: format!("parameter '{key}' of test '{test}': {reason}"),
        })?;
        if let Some(v) = converted {
            kwargs.insert(key.to_string(), v);
        }
    }
    Ok(kwargs)
}

/// A named field of a model, with its column-level tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelColumn {
    pub name: String,

    #[serde(default)]
    pub tests: Vec<ModelTest>,
}

impl ModelColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    pub fn with_test(mut self, test: ModelTest) -> Self {
        self.tests.push(test);
        self
    }

    /// Parse a column entry (`{name: ..., tests: [...]}`).
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        Self::parse(value).map_err(|e| wrap_parse_error(value, e))
    }

    fn parse(value: &Value) -> CoreResult<Self> {
        let name = required_str(value, "name")?;
        let tests = parse_tests(value)?;
        Ok(Self {
            name: name.to_string(),
            tests,
        })
    }
}

/// A queryable relation under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    /// Schema (namespace) the relation lives in
    pub schema: String,

    /// Model-level tests
    #[serde(default)]
    pub tests: Vec<ModelTest>,

    #[serde(default)]
    pub columns: Vec<ModelColumn>,
}

impl Model {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            tests: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_test(mut self, test: ModelTest) -> Self {
        self.tests.push(test);
        self
    }

    pub fn with_column(mut self, column: ModelColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// `schema.name`, as used in generated SQL
    pub fn relation(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&ModelColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Parse a model entry (`{name, schema, tests, columns}`).
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        Self::parse(value).map_err(|e| match e {
            // Column errors already name the column input they came from.
            CoreError::ModelParseError { .. } => e,
            other => wrap_parse_error(value, other),
        })
    }

    fn parse(value: &Value) -> CoreResult<Self> {
        let name = required_str(value, "name")?;
        let schema = required_str(value, "schema")?;
        let tests = parse_tests(value)?;
        let columns = match value.get("columns") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(ModelColumn::from_value)
                .collect::<CoreResult<Vec<_>>>()?,
            Some(other) => {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'columns' must be a list, found {}", to_flow(other)),
                })
            }
        };
        Ok(Self {
            name: name.to_string(),
            schema: schema.to_string(),
            tests,
            columns,
        })
    }
}

fn required_str<'a>(value: &'a Value, key: &str) -> CoreResult<&'a str> {
    if !value.is_mapping() {
        return Err(CoreError::ConfigInvalid {
            message: "expected a mapping".to_string(),
        });
    }
    value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::ConfigInvalid {
            message: format!("missing required string field '{key}'"),
        })
}

fn parse_tests(value: &Value) -> CoreResult<Vec<ModelTest>> {
    match value.get("tests") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items.iter().map(ModelTest::from_value).collect(),
        Some(other) => Err(CoreError::ConfigInvalid {
            message: format!("'tests' must be a list, found {}", to_flow(other)),
        }),
    }
}

fn wrap_parse_error(value: &Value, err: CoreError) -> CoreError {
    log::debug!("Issue parsing model from: {}", to_flow(value));
    CoreError::ModelParseError {
        input: to_flow(value),
        reason: err.to_string(),
    }
}

/// Render a YAML value on a single line in flow style.
pub(crate) fn to_flow(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(to_flow).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", to_flow(k), to_flow(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, to_flow(&tagged.value)),
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
