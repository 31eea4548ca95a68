//! Registry of test functions
//!
//! Maps a test name to the function that compiles it. Every function shares
//! the same contract: given the target model (and column, for column-level
//! tests) plus the test's parameters, return a [`Predicate`]. Names are
//! resolved lazily, when a test case first asks for its SQL.

use crate::error::{CompileError, CompileResult};
use crate::generator::{self, Predicate};
use crate::params::{
    AcceptedRange, AcceptedValues, AggValue, Bit, ColumnCombination, ExpressionIsTrue, Params,
    RegexpLike, Relationships, ValueEquals,
};
use sqltest_core::{Model, ModelColumn, ModelTest};
use std::collections::BTreeMap;
use std::fmt;

/// What a test is attached to
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub model: &'a Model,
    pub column: Option<&'a ModelColumn>,
}

impl<'a> Target<'a> {
    pub fn new(model: &'a Model, column: Option<&'a ModelColumn>) -> Self {
        Self { model, column }
    }

    /// `schema.model`
    pub fn relation(&self) -> String {
        self.model.relation()
    }

    pub fn column_name(&self) -> Option<&'a str> {
        self.column.map(|c| c.name.as_str())
    }

    /// The column name, or an error naming the test that needed it
    pub fn require_column(&self, test: &str) -> CompileResult<&'a str> {
        self.column_name()
            .ok_or_else(|| CompileError::MissingColumn {
                test: test.to_string(),
            })
    }
}

/// Uniform signature of a test function
pub type TestFn = fn(&Target<'_>, &Params<'_>) -> CompileResult<Predicate>;

const BUILTINS: &[(&str, TestFn)] = &[
    ("unique", unique),
    ("not_null", not_null),
    ("accepted_values", accepted_values),
    ("expression_is_true", expression_is_true),
    ("relationships", relationships),
    ("unique_combination_of_columns", unique_combination_of_columns),
    ("at_least_one", at_least_one),
    ("regexp_like", regexp_like),
    ("uuid", uuid),
    ("accepted_range", accepted_range),
    ("bit", bit),
    ("value_equals", value_equals),
    ("agg_value", agg_value),
];

/// Test functions keyed by name
#[derive(Clone)]
pub struct Registry {
    tests: BTreeMap<String, TestFn>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// A registry with no tests
    pub fn empty() -> Self {
        Self {
            tests: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in test
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (name, func) in BUILTINS {
            registry.register(*name, *func);
        }
        registry
    }

    /// Register a test function, returning the one it replaced
    pub fn register(&mut self, name: impl Into<String>, func: TestFn) -> Option<TestFn> {
        self.tests.insert(name.into(), func)
    }

    pub fn get(&self, name: &str) -> Option<TestFn> {
        self.tests.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tests.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    /// Run the test function without applying the envelope
    pub fn compile_predicate(
        &self,
        model: &Model,
        column: Option<&ModelColumn>,
        test: &ModelTest,
    ) -> CompileResult<Predicate> {
        let func = self
            .get(&test.name)
            .ok_or_else(|| CompileError::TestNotFound {
                name: test.name.clone(),
            })?;
        let params = Params::new(&test.name, &test.kwargs);
        func(&Target::new(model, column), &params)
    }

    /// Compile a test into its final `failures` statement
    pub fn compile(
        &self,
        model: &Model,
        column: Option<&ModelColumn>,
        test: &ModelTest,
    ) -> CompileResult<String> {
        let sql = self.compile_predicate(model, column, test)?.into_sql();
        log::debug!("Compiled {} on {}:\n{}", test.name, model.relation(), sql);
        Ok(sql)
    }
}

fn unique(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    Ok(Predicate::Rows(generator::unique_sql(
        &target.relation(),
        column,
    )))
}

fn not_null(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    Ok(Predicate::Rows(generator::not_null_sql(
        &target.relation(),
        column,
    )))
}

fn accepted_values(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = AcceptedValues::parse(params)?;
    Ok(Predicate::Rows(generator::accepted_values_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn expression_is_true(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let parsed = ExpressionIsTrue::parse(params)?;
    Ok(Predicate::Rows(generator::expression_is_true_sql(
        &target.relation(),
        &parsed,
    )))
}

fn relationships(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = Relationships::parse(params)?;
    Ok(Predicate::Rows(generator::relationships_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn unique_combination_of_columns(
    target: &Target<'_>,
    params: &Params<'_>,
) -> CompileResult<Predicate> {
    let parsed = ColumnCombination::parse(params)?;
    Ok(Predicate::Rows(generator::unique_combination_sql(
        &target.relation(),
        &parsed,
    )))
}

fn at_least_one(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    Ok(Predicate::Failures(generator::at_least_one_sql(
        &target.relation(),
        column,
    )))
}

fn regexp_like(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = RegexpLike::parse(params)?;
    Ok(Predicate::Rows(generator::regexp_like_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn uuid(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    Ok(Predicate::Rows(generator::uuid_sql(
        &target.relation(),
        column,
    )))
}

fn accepted_range(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = AcceptedRange::parse(params)?;
    Ok(Predicate::Rows(generator::accepted_range_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn bit(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = Bit::parse(params)?;
    Ok(Predicate::Rows(generator::bit_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn value_equals(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let column = target.require_column(params.test())?;
    let parsed = ValueEquals::parse(params)?;
    Ok(Predicate::Rows(generator::value_equals_sql(
        &target.relation(),
        column,
        &parsed,
    )))
}

fn agg_value(target: &Target<'_>, params: &Params<'_>) -> CompileResult<Predicate> {
    let parsed = AggValue::parse(params, target.column_name())?;
    Ok(Predicate::Rows(generator::agg_value_sql(
        &target.relation(),
        &parsed,
    )))
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
