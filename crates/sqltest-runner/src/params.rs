//! Typed test parameters
//!
//! Tests receive a loose map of keyword arguments from the configuration.
//! [`Params`] gives typed access to it, and each parameterised test has a
//! record type whose `parse` validates the map before any SQL is produced.

use crate::error::{CompileError, CompileResult};
use sqltest_core::{ParamValue, TestParams};

/// Typed view over the keyword arguments of one test invocation
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    test: &'a str,
    kwargs: &'a TestParams,
}

impl<'a> Params<'a> {
    pub fn new(test: &'a str, kwargs: &'a TestParams) -> Self {
        Self { test, kwargs }
    }

    /// Name of the test these parameters belong to
    pub fn test(&self) -> &'a str {
        self.test
    }

    pub fn get(&self, key: &str) -> Option<&'a ParamValue> {
        self.kwargs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kwargs.contains_key(key)
    }

    pub fn require(&self, key: &str) -> CompileResult<&'a ParamValue> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    pub fn opt_str(&self, key: &str) -> CompileResult<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(key, format!("expected a string, found {other}"))),
        }
    }

    pub fn require_str(&self, key: &str) -> CompileResult<&'a str> {
        self.opt_str(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> CompileResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Bool(b)) => Ok(*b),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, found {other}"))),
        }
    }

    /// A required, non-empty list
    pub fn require_list(&self, key: &str) -> CompileResult<&'a [ParamValue]> {
        let items = self
            .require(key)?
            .as_list()
            .ok_or_else(|| self.invalid(key, "expected a list".to_string()))?;
        if items.is_empty() {
            return Err(self.invalid(key, "list must not be empty".to_string()));
        }
        Ok(items)
    }

    /// A required, non-empty list of strings (column names, expressions)
    pub fn require_str_list(&self, key: &str) -> CompileResult<Vec<&'a str>> {
        self.require_list(key)?
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| self.invalid(key, format!("expected strings, found {v}")))
            })
            .collect()
    }

    pub fn missing(&self, key: &str) -> CompileError {
        CompileError::MissingParameter {
            test: self.test.to_string(),
            param: key.to_string(),
        }
    }

    pub fn invalid(&self, key: &str, message: String) -> CompileError {
        CompileError::InvalidParameter {
            test: self.test.to_string(),
            param: key.to_string(),
            message,
        }
    }
}

/// `accepted_values`
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedValues<'a> {
    pub values: &'a [ParamValue],
}

impl<'a> AcceptedValues<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            values: params.require_list("values")?,
        })
    }
}

/// `expression_is_true`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionIsTrue<'a> {
    pub expression: &'a str,
    pub where_clause: Option<&'a str>,
}

impl<'a> ExpressionIsTrue<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            expression: params.require_str("expression")?,
            where_clause: params.opt_str("where")?,
        })
    }
}

/// `relationships`
#[derive(Debug, Clone, PartialEq)]
pub struct Relationships<'a> {
    /// Referenced relation, used verbatim
    pub to: &'a str,
    pub field: &'a str,
    pub where_clause: Option<&'a str>,
}

impl<'a> Relationships<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            to: params.require_str("to")?,
            field: params.require_str("field")?,
            where_clause: params.opt_str("where")?,
        })
    }
}

/// `unique_combination_of_columns`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCombination<'a> {
    pub columns: Vec<&'a str>,
}

impl<'a> ColumnCombination<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            columns: params.require_str_list("columns")?,
        })
    }
}

/// `regexp_like`
#[derive(Debug, Clone, PartialEq)]
pub struct RegexpLike<'a> {
    pub expression: &'a str,
    pub flags: &'a str,
}

impl<'a> RegexpLike<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            expression: params.require_str("expression")?,
            flags: params.opt_str("flags")?.unwrap_or(""),
        })
    }
}

/// `accepted_range`
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRange<'a> {
    pub min_value: Option<&'a ParamValue>,
    pub max_value: Option<&'a ParamValue>,
    pub inclusive: bool,
    pub where_clause: Option<&'a str>,
}

impl<'a> AcceptedRange<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        let min_value = params.get("min_value");
        let max_value = params.get("max_value");
        if min_value.is_none() && max_value.is_none() {
            return Err(CompileError::MissingOneOf {
                test: params.test().to_string(),
                params: "min_value, max_value".to_string(),
            });
        }
        Ok(Self {
            min_value,
            max_value,
            inclusive: params.bool_or("inclusive", true)?,
            where_clause: params.opt_str("where")?,
        })
    }
}

/// `bit`
#[derive(Debug, Clone, PartialEq)]
pub struct Bit {
    pub yes: ParamValue,
    pub no: ParamValue,
}

impl Bit {
    pub fn parse(params: &Params<'_>) -> CompileResult<Self> {
        let sentinel = |key: &str, default: &str| {
            params
                .get(key)
                .cloned()
                .unwrap_or_else(|| ParamValue::String(default.to_string()))
        };
        Ok(Self {
            yes: sentinel("yes", "Y"),
            no: sentinel("no", "N"),
        })
    }
}

/// `value_equals`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEquals<'a> {
    pub value: &'a ParamValue,
    pub where_clause: &'a str,
}

impl<'a> ValueEquals<'a> {
    pub fn parse(params: &Params<'a>) -> CompileResult<Self> {
        Ok(Self {
            value: params.require("value")?,
            where_clause: params.require_str("where")?,
        })
    }
}

/// `agg_value`
#[derive(Debug, Clone, PartialEq)]
pub struct AggValue<'a> {
    pub value: &'a ParamValue,
    pub agg_expression: &'a str,
    pub group_by: Vec<&'a str>,
    /// `agg_col`, else the attached column. Validated only; the generated
    /// SQL does not reference it.
    pub agg_col: &'a str,
    pub op: &'a str,
    pub where_clause: Option<&'a str>,
}

impl<'a> AggValue<'a> {
    pub fn parse(params: &Params<'a>, column: Option<&'a str>) -> CompileResult<Self> {
        let agg_col = params
            .opt_str("agg_col")?
            .or(column)
            .ok_or_else(|| CompileError::MissingOneOf {
                test: params.test().to_string(),
                params: "column, agg_col".to_string(),
            })?;
        Ok(Self {
            value: params.require("value")?,
            agg_expression: params.require_str("agg_expression")?,
            group_by: params.require_str_list("group_by")?,
            agg_col,
            op: params.opt_str("op")?.unwrap_or("="),
            where_clause: params.opt_str("where")?,
        })
    }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
