use super::*;
use crate::model::ParamValue;
use std::fs;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
source:
  name: foo
  url: "foodriver://foo.com:1234"
models:
  - name: model_a
    schema: dev
    columns:
      - name: foo
  - name: model_b
    schema: dev
    columns:
      - name: bar
        tests: [unique]
"#;
    let config = Config::from_yaml_str(yaml, Path::new(".")).unwrap();
    assert_eq!(config.source.name, "foo");
    assert_eq!(config.models.len(), 2);
    assert_eq!(config.models[0].name, "model_a");
    assert_eq!(config.models[1].columns[0].tests[0].name, "unique");
}

#[test]
fn test_source_options() {
    let yaml = r#"
source:
  name: warehouse
  url: "duckdb://warehouse.duckdb"
  kwargs:
    access_mode: READ_ONLY
    threads: 4
"#;
    let config = Config::from_yaml_str(yaml, Path::new(".")).unwrap();
    assert_eq!(
        config.source.kwargs.get("threads"),
        Some(&ParamValue::Integer(4))
    );
    assert_eq!(
        config.source.kwargs.get("access_mode"),
        Some(&ParamValue::String("READ_ONLY".to_string()))
    );
    assert!(config.models.is_empty());
}

#[test]
fn test_explicit_models_precede_discovered_models() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "models/zeta.yml", "name: zeta\nschema: dev\n");
    let yaml = r#"
source: {name: foo, url: ":memory:"}
models_dir: models
models:
  - {name: model_a, schema: dev}
  - {name: model_b, schema: dev}
"#;
    let config = Config::from_yaml_str(yaml, dir.path()).unwrap();
    assert_eq!(config.models.len(), 3);
    assert_eq!(config.models[0].name, "model_a");
    assert_eq!(config.models[1].name, "model_b");
    assert_eq!(config.models[2].name, "zeta");
}

#[test]
fn test_discover_models_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.yml", "name: b\nschema: dev\n");
    write(dir.path(), "nested/a.yaml", "name: a\nschema: dev\n");
    write(dir.path(), "a.yml", "name: first\nschema: dev\n");
    write(dir.path(), "notes.txt", "not a model");

    let models = discover_models(dir.path()).unwrap();
    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["first", "b", "a"]);
}

#[test]
fn test_discover_models_missing_dir() {
    let dir = TempDir::new().unwrap();
    let models = discover_models(&dir.path().join("nope")).unwrap();
    assert!(models.is_empty());
}

#[test]
fn test_models_dir_list() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one/m1.yml", "name: m1\nschema: dev\n");
    write(dir.path(), "two/m2.yml", "name: m2\nschema: dev\n");
    let yaml = "source: {name: s, url: x}\nmodels_dir: [one, two]\n";
    let config = Config::from_yaml_str(yaml, dir.path()).unwrap();
    let names: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["m1", "m2"]);
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "models/m.yml", "name: m\nschema: dev\n");
    write(
        dir.path(),
        "sqltest.yml",
        "source: {name: s, url: x}\nmodels_dir: models\n",
    );
    let config = Config::from_file(&dir.path().join("sqltest.yml")).unwrap();
    assert_eq!(config.models.len(), 1);
}

#[test]
fn test_from_file_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(&dir.path().join("sqltest.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_missing_source() {
    let err = Config::from_yaml_str("models: []", Path::new(".")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_invalid_model_is_fatal() {
    let yaml = "source: {name: s, url: x}\nmodels:\n  - {name: no_schema}\n";
    let err = Config::from_yaml_str(yaml, Path::new(".")).unwrap_err();
    assert!(matches!(err, CoreError::ModelParseError { .. }));
}

#[test]
fn test_select_model_case_insensitive_first_match() {
    let config = Config::new(
        Source::new("s", "x"),
        vec![
            Model::new("Orders", "dev"),
            Model::new("orders", "prod"),
        ],
    );
    let model = config.select_model("ORDERS").unwrap();
    assert_eq!(model.schema, "dev");
}

#[test]
fn test_select_model_not_found() {
    let config = Config::new(Source::new("s", "x"), vec![Model::new("a", "dev")]);
    let err = config.select_model("b").unwrap_err();
    assert!(matches!(err, CoreError::ModelNotFound { ref name } if name == "b"));
}

#[test]
fn test_resolve_literal_url() {
    let source = Source::new("s", "duckdb://:memory:");
    assert!(!source.is_indirect());
    assert_eq!(
        source.resolve_url_with(|_| None).unwrap(),
        "duckdb://:memory:"
    );
}

#[test]
fn test_resolve_indirect_url() {
    let source = Source::new("s", "$WAREHOUSE_URL");
    assert!(source.is_indirect());
    let url = source
        .resolve_url_with(|key| (key == "WAREHOUSE_URL").then(|| "duckdb://w.db".to_string()))
        .unwrap();
    assert_eq!(url, "duckdb://w.db");
}

#[test]
fn test_resolve_indirect_url_missing() {
    let source = Source::new("s", "$SQLTEST_DEFINITELY_UNSET");
    let err = source.resolve_url_with(|_| None).unwrap_err();
    assert!(matches!(err, CoreError::UnresolvedUrl { ref key } if key == "SQLTEST_DEFINITELY_UNSET"));
}
