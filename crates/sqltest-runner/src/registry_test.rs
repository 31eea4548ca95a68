use super::*;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqltest_core::ParamValue;

fn model() -> Model {
    Model::new("test_model", "dev")
        .with_column(ModelColumn::new("foo").with_test(ModelTest::new("unique")))
        .with_column(ModelColumn::new("bar"))
}

fn s(v: &str) -> ParamValue {
    ParamValue::String(v.to_string())
}

/// One invocation of every built-in test, with its parameters
fn builtin_invocations() -> Vec<(bool, ModelTest)> {
    vec![
        (true, ModelTest::new("unique")),
        (true, ModelTest::new("not_null")),
        (
            true,
            ModelTest::new("accepted_values")
                .with_param("values", ParamValue::List(vec![s("a"), s("b")])),
        ),
        (
            false,
            ModelTest::new("expression_is_true")
                .with_param("expression", s("foo >= 0"))
                .with_param("where", s("bar is not null")),
        ),
        (
            true,
            ModelTest::new("relationships")
                .with_param("to", s("dev.other"))
                .with_param("field", s("id")),
        ),
        (
            false,
            ModelTest::new("unique_combination_of_columns")
                .with_param("columns", ParamValue::List(vec![s("foo"), s("bar")])),
        ),
        (true, ModelTest::new("at_least_one")),
        (
            true,
            ModelTest::new("regexp_like")
                .with_param("expression", s("^[a-z]+$"))
                .with_param("flags", s("i")),
        ),
        (true, ModelTest::new("uuid")),
        (
            true,
            ModelTest::new("accepted_range")
                .with_param("min_value", ParamValue::Integer(1))
                .with_param("max_value", ParamValue::Integer(10)),
        ),
        (true, ModelTest::new("bit")),
        (
            true,
            ModelTest::new("value_equals")
                .with_param("value", s("x"))
                .with_param("where", s("bar = 1")),
        ),
        (
            true,
            ModelTest::new("agg_value")
                .with_param("value", ParamValue::Integer(100))
                .with_param("agg_expression", s("sum(bar)"))
                .with_param("group_by", ParamValue::List(vec![s("foo")])),
        ),
    ]
}

#[test]
fn test_builtin_registry_names() {
    let registry = Registry::builtin();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names.len(), 13);
    for (_, test) in builtin_invocations() {
        assert!(registry.contains(&test.name), "{} not registered", test.name);
    }
}

#[test]
fn test_compile_unique_exact_sql() {
    let model = model();
    let column = &model.columns[0];
    let sql = Registry::builtin()
        .compile(&model, Some(column), &column.tests[0])
        .unwrap();

    let expected = "\
select
  count(*) as failures
from (

  select
    foo,
    count(*) as records
  from dev.test_model
  group by foo
    having count(*) > 1

)";
    assert_eq!(sql, expected);
}

#[test]
fn test_compile_is_deterministic() {
    let model = model();
    let registry = Registry::builtin();
    for (on_column, test) in builtin_invocations() {
        let column = on_column.then(|| &model.columns[0]);
        let first = registry.compile(&model, column, &test).unwrap();
        let second = registry.compile(&model, column, &test).unwrap();
        assert_eq!(first, second, "{} is not deterministic", test.name);
    }
}

#[test]
fn test_compiled_sql_parses() {
    let model = model();
    let registry = Registry::builtin();
    for (on_column, test) in builtin_invocations() {
        let column = on_column.then(|| &model.columns[0]);
        let sql = registry.compile(&model, column, &test).unwrap();
        let statements = Parser::parse_sql(&GenericDialect {}, &sql)
            .unwrap_or_else(|e| panic!("{} produced unparseable SQL: {e}\n{sql}", test.name));
        assert_eq!(statements.len(), 1);
        assert!(sql.contains("as failures"), "{}", test.name);
    }
}

#[test]
fn test_compile_accepted_range_contains_bounds() {
    let model = model();
    let test = ModelTest::new("accepted_range")
        .with_param("min_value", ParamValue::Integer(1))
        .with_param("max_value", ParamValue::Integer(10))
        .with_param("inclusive", ParamValue::Bool(true));
    let sql = Registry::builtin()
        .compile(&model, Some(&model.columns[1]), &test)
        .unwrap();
    assert!(sql.contains("bar < 1 or bar > 10"));
}

#[test]
fn test_compile_accepted_range_without_bounds_fails() {
    let model = model();
    let test = ModelTest::new("accepted_range");
    let err = Registry::builtin()
        .compile(&model, Some(&model.columns[1]), &test)
        .unwrap_err();
    assert!(matches!(err, CompileError::MissingOneOf { ref test, .. } if test == "accepted_range"));
}

#[test]
fn test_compile_agg_value_without_column_fails() {
    let model = model();
    let test = ModelTest::new("agg_value")
        .with_param("value", ParamValue::Integer(1))
        .with_param("agg_expression", s("count(*)"))
        .with_param("group_by", ParamValue::List(vec![s("foo")]));
    let err = Registry::builtin().compile(&model, None, &test).unwrap_err();
    assert!(matches!(err, CompileError::MissingOneOf { .. }));

    let with_agg_col = test.with_param("agg_col", s("foo"));
    assert!(Registry::builtin()
        .compile(&model, None, &with_agg_col)
        .is_ok());
}

#[test]
fn test_compile_unknown_test() {
    let model = model();
    let err = Registry::builtin()
        .compile(&model, None, &ModelTest::new("no_such_test"))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::TestNotFound {
            name: "no_such_test".to_string()
        }
    );
}

#[test]
fn test_column_test_without_column() {
    let model = model();
    let err = Registry::builtin()
        .compile(&model, None, &ModelTest::new("not_null"))
        .unwrap_err();
    assert!(matches!(err, CompileError::MissingColumn { .. }));
}

#[test]
fn test_at_least_one_uses_own_envelope() {
    let model = model();
    let predicate = Registry::builtin()
        .compile_predicate(&model, Some(&model.columns[0]), &ModelTest::new("at_least_one"))
        .unwrap();
    assert!(matches!(predicate, Predicate::Failures(_)));
    let sql = predicate.into_sql();
    assert!(!sql.contains("count(*) as failures"));
    assert!(sql.starts_with("select\n  case when records = 0 then 1 else 0 end as failures"));
}

fn always_clean(target: &Target<'_>, _params: &Params<'_>) -> CompileResult<Predicate> {
    Ok(Predicate::Rows(format!(
        "select * from {} where false",
        target.relation()
    )))
}

#[test]
fn test_register_custom_test() {
    let mut registry = Registry::empty();
    assert!(registry.register("always_clean", always_clean).is_none());
    let model = model();
    let sql = registry
        .compile(&model, None, &ModelTest::new("always_clean"))
        .unwrap();
    assert!(sql.contains("select * from dev.test_model where false"));
    assert!(registry
        .compile(&model, None, &ModelTest::new("unique"))
        .is_err());
}

#[test]
fn test_register_replaces_builtin() {
    let mut registry = Registry::builtin();
    assert!(registry.register("unique", always_clean).is_some());
    assert_eq!(registry.names().count(), 13);
}
