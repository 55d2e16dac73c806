// tests/config_loading.rs

mod common;
use crate::common::builders::ConfigFileBuilder;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use groupwatch::config::{load_and_validate, load_from_str, validate_config, StepConfig};
use groupwatch::errors::GroupwatchError;
use groupwatch::pipeline::{Pipeline, Scalar, TemplateError};
use groupwatch::types::parse_duration;

type TestResult = Result<(), Box<dyn Error>>;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn viirs_demo_loads_with_ordered_variables() -> TestResult {
    let cfg = load_and_validate(demo("viirs.toml"))?;

    assert_eq!(cfg.watch.root, PathBuf::from("/data"));
    assert_eq!(cfg.watch.period, Duration::from_secs(30));
    assert_eq!(cfg.watch.required.len(), 11);
    assert_eq!(cfg.watch.required[0], "SVM10");
    assert_eq!(cfg.naming.id_end, 5);
    assert_eq!(cfg.qualify.as_ref().map(|q| q.h5dump.as_str()), Some("h5dump"));

    let names: Vec<_> = cfg.pipeline.variables.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Run", "Workers", "Verbose"]);
    assert_eq!(cfg.pipeline.variables.0[1].1, Scalar::Integer(4));
    assert_eq!(cfg.pipeline.variables.0[2].1, Scalar::Bool(false));

    assert_eq!(cfg.pipeline.steps.len(), 3);
    let detect = &cfg.pipeline.steps[1];
    assert_eq!(detect.name(), Some("detect"));
    let locals: Vec<_> = detect.variables().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(locals, vec!["Workers", "Log"]);
    assert_eq!(cfg.pipeline.steps[2].name(), None);

    let pipeline = Pipeline::prepare(&cfg.pipeline, &cfg.template)?;
    let step_names: Vec<_> = pipeline.steps().iter().map(|s| s.name()).collect();
    assert_eq!(step_names, vec!["prepare", "detect", "step-3"]);

    Ok(())
}

#[test]
fn minimal_demo_mixes_bare_and_table_steps() -> TestResult {
    let cfg = load_and_validate(demo("minimal.toml"))?;

    assert_eq!(cfg.watch.period, Duration::from_millis(500));
    assert_eq!(cfg.watch.extension, "dat");
    assert_eq!(cfg.naming.separator, "_");
    assert_eq!(cfg.template.open, "{{");
    assert!(cfg.qualify.is_none());

    assert!(matches!(cfg.pipeline.steps[0], StepConfig::Command(_)));
    assert_eq!(cfg.pipeline.steps[1].name(), Some("archive"));

    let pipeline = Pipeline::prepare(&cfg.pipeline, &cfg.template)?;
    let refs: Vec<_> = pipeline.steps()[0].command().references().collect();
    assert_eq!(refs, vec!["Id", "A", "B"]);

    Ok(())
}

#[test]
fn empty_file_gets_deployment_defaults() -> TestResult {
    let cfg = groupwatch::config::ConfigFile::try_from(load_from_str("")?)?;

    assert_eq!(cfg.watch.root, PathBuf::from("/data"));
    assert_eq!(cfg.watch.period, Duration::from_secs(30));
    assert_eq!(cfg.watch.extension, "h5");
    assert_eq!(
        cfg.watch.required,
        vec![
            "SVM10", "GMTCO", "IICMO", "SVDNB", "SVM07", "SVM08", "SVM12", "SVM13", "SVM14",
            "SVM15", "SVM16"
        ]
    );
    assert_eq!(cfg.naming.separator, "_");
    assert_eq!(
        (cfg.naming.min_tokens, cfg.naming.id_start, cfg.naming.id_end),
        (6, 1, 5)
    );
    assert_eq!(cfg.output.dir, "/output");
    assert_eq!(cfg.output.version, "v2.1");
    assert_eq!((cfg.template.open.as_str(), cfg.template.close.as_str()), ("((", "))"));
    assert!(cfg.qualify.is_none());
    assert!(cfg.pipeline.variables.is_empty());
    assert!(cfg.pipeline.steps.is_empty());

    Ok(())
}

#[test]
fn load_and_validate_reads_from_disk() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"
[watch]
root = "/tmp/in"
period = "2m"
required = ["X"]

[naming]
min_tokens = 1
id_start = 0
id_end = 1

[pipeline]
steps = ["true"]
"#
    )?;

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.watch.period, Duration::from_secs(120));
    assert_eq!(cfg.watch.required, vec!["X".to_string()]);
    assert_eq!(cfg.pipeline.steps[0].command(), "true");

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_and_validate("/definitely/not/here/Groupwatch.toml").unwrap_err();
    assert!(matches!(err, GroupwatchError::IoError(_)));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let err = load_from_str("[watch\nroot = 1").unwrap_err();
    assert!(matches!(err, GroupwatchError::TomlError(_)));
}

#[test]
fn wrongly_typed_value_is_a_toml_error() {
    let err = load_from_str("[naming]\nmin_tokens = \"six\"").unwrap_err();
    assert!(matches!(err, GroupwatchError::TomlError(_)));
}

fn config_error(raw: groupwatch::config::RawConfigFile) -> String {
    match validate_config(&raw) {
        Err(GroupwatchError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn validation_rejects_bad_watch_settings() {
    let msg = config_error(ConfigFileBuilder::new().required(&[]).raw());
    assert!(msg.contains("at least one prefix"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().required(&["A", ""]).raw());
    assert!(msg.contains("empty prefix"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().required(&["A", "B", "A"]).raw());
    assert!(msg.contains("'A' more than once"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().period("soon").raw());
    assert!(msg.contains("[watch].period"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().period("0s").raw());
    assert!(msg.contains("greater than zero"), "{msg}");

    let mut raw = ConfigFileBuilder::new().raw();
    raw.watch.extension = ".".to_string();
    let msg = config_error(raw);
    assert!(msg.contains("[watch].extension"), "{msg}");
}

#[test]
fn validation_rejects_bad_naming() {
    let msg = config_error(ConfigFileBuilder::new().naming("", 6, 1, 5).raw());
    assert!(msg.contains("separator"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().naming("_", 6, 3, 3).raw());
    assert!(msg.contains("id_start (3) must be less than id_end (3)"), "{msg}");

    let msg = config_error(ConfigFileBuilder::new().naming("_", 4, 1, 5).raw());
    assert!(msg.contains("must not exceed min_tokens (4)"), "{msg}");
}

#[test]
fn validation_rejects_bad_delimiters() {
    let mut raw = ConfigFileBuilder::new().raw();
    raw.template.close = String::new();
    assert!(config_error(raw).contains("must not be empty"));

    let mut raw = ConfigFileBuilder::new().raw();
    raw.template.open = "%%".to_string();
    raw.template.close = "%%".to_string();
    assert!(config_error(raw).contains("must differ"));
}

#[test]
fn builder_config_passes_validation() {
    let cfg = ConfigFileBuilder::new()
        .root("/in")
        .period("1s")
        .required(&["A", "B"])
        .naming("-", 3, 0, 2)
        .output("/out", "v9")
        .build();

    assert_eq!(cfg.watch.period, Duration::from_secs(1));
    assert_eq!(cfg.naming.separator, "-");
    assert_eq!(cfg.output.version, "v9");
}

#[test]
fn bad_template_fails_at_prepare_time() -> TestResult {
    let cfg = load_from_str(
        r#"
[pipeline.variables]
Out = "((OutputDir)"
"#,
    )?;
    let cfg = groupwatch::config::ConfigFile::try_from(cfg)?;

    let err = Pipeline::prepare(&cfg.pipeline, &cfg.template).unwrap_err();
    assert!(matches!(err, TemplateError::Unterminated { .. }));

    let startup: GroupwatchError = err.into();
    assert!(startup.to_string().starts_with("Template error"));

    Ok(())
}

#[test]
fn durations_accept_common_units() {
    assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    assert_eq!(parse_duration(" 30s "), Ok(Duration::from_secs(30)));
    assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));

    assert!(parse_duration("").is_err());
    assert!(parse_duration("30").is_err());
    assert!(parse_duration("30d").is_err());
    assert!(parse_duration("s").is_err());
}

#[test]
fn oversized_durations_are_rejected() {
    assert_eq!(
        parse_duration("99999999999999999h"),
        Err("duration too large: '99999999999999999h'".to_string())
    );
    assert!(parse_duration("99999999999999999999m").is_err());

    let msg = config_error(ConfigFileBuilder::new().period("99999999999999999h").raw());
    assert!(msg.contains("duration too large"), "{msg}");
}
