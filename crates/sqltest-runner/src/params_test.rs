use super::*;

fn kwargs(pairs: &[(&str, ParamValue)]) -> TestParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn s(v: &str) -> ParamValue {
    ParamValue::String(v.to_string())
}

#[test]
fn test_require_str_missing() {
    let map = TestParams::new();
    let params = Params::new("expression_is_true", &map);
    let err = ExpressionIsTrue::parse(&params).unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingParameter {
            test: "expression_is_true".to_string(),
            param: "expression".to_string(),
        }
    );
}

#[test]
fn test_require_str_wrong_type() {
    let map = kwargs(&[("expression", ParamValue::Integer(3))]);
    let params = Params::new("expression_is_true", &map);
    let err = ExpressionIsTrue::parse(&params).unwrap_err();
    assert!(matches!(err, CompileError::InvalidParameter { ref param, .. } if param == "expression"));
}

#[test]
fn test_accepted_values_requires_non_empty_list() {
    let map = kwargs(&[("values", ParamValue::List(vec![]))]);
    let params = Params::new("accepted_values", &map);
    assert!(AcceptedValues::parse(&params).is_err());

    let map = kwargs(&[("values", s("a"))]);
    let params = Params::new("accepted_values", &map);
    assert!(AcceptedValues::parse(&params).is_err());
}

#[test]
fn test_accepted_range_requires_a_bound() {
    let map = kwargs(&[("inclusive", ParamValue::Bool(false))]);
    let params = Params::new("accepted_range", &map);
    let err = AcceptedRange::parse(&params).unwrap_err();
    assert!(matches!(err, CompileError::MissingOneOf { .. }));
}

#[test]
fn test_accepted_range_defaults() {
    let map = kwargs(&[("max_value", ParamValue::Integer(5))]);
    let params = Params::new("accepted_range", &map);
    let range = AcceptedRange::parse(&params).unwrap();
    assert!(range.inclusive);
    assert!(range.min_value.is_none());
    assert_eq!(range.max_value, Some(&ParamValue::Integer(5)));
    assert!(range.where_clause.is_none());
}

#[test]
fn test_bit_defaults() {
    let map = TestParams::new();
    let bit = Bit::parse(&Params::new("bit", &map)).unwrap();
    assert_eq!(bit.yes, s("Y"));
    assert_eq!(bit.no, s("N"));

    let map = kwargs(&[("yes", ParamValue::Integer(1)), ("no", ParamValue::Integer(0))]);
    let bit = Bit::parse(&Params::new("bit", &map)).unwrap();
    assert_eq!(bit.yes, ParamValue::Integer(1));
}

#[test]
fn test_value_equals_requires_where() {
    let map = kwargs(&[("value", s("x"))]);
    let err = ValueEquals::parse(&Params::new("value_equals", &map)).unwrap_err();
    assert!(matches!(err, CompileError::MissingParameter { ref param, .. } if param == "where"));
}

#[test]
fn test_agg_value_needs_column_or_agg_col() {
    let map = kwargs(&[
        ("value", ParamValue::Integer(1)),
        ("agg_expression", s("sum(amount)")),
        ("group_by", ParamValue::List(vec![s("region")])),
    ]);
    let params = Params::new("agg_value", &map);

    let err = AggValue::parse(&params, None).unwrap_err();
    assert!(matches!(err, CompileError::MissingOneOf { .. }));

    let agg = AggValue::parse(&params, Some("amount")).unwrap();
    assert_eq!(agg.agg_col, "amount");
    assert_eq!(agg.op, "=");
    assert_eq!(agg.group_by, vec!["region"]);
}

#[test]
fn test_agg_value_prefers_agg_col() {
    let map = kwargs(&[
        ("value", ParamValue::Integer(1)),
        ("agg_expression", s("sum(amount)")),
        ("group_by", ParamValue::List(vec![s("region")])),
        ("agg_col", s("amount")),
        ("op", s(">=")),
    ]);
    let agg = AggValue::parse(&Params::new("agg_value", &map), Some("other")).unwrap();
    assert_eq!(agg.agg_col, "amount");
    assert_eq!(agg.op, ">=");
}

#[test]
fn test_column_combination_rejects_non_strings() {
    let map = kwargs(&[("columns", ParamValue::List(vec![s("a"), ParamValue::Integer(1)]))]);
    let err = ColumnCombination::parse(&Params::new("unique_combination_of_columns", &map))
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidParameter { .. }));
}
