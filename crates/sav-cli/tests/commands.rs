//! Integration tests for the `savtab` commands.

use std::path::{Path, PathBuf};

use sav_cli::cli::{OutputFormatArg, TableArgs, ValuesArgs};
use sav_cli::commands::{run_entities, run_values, run_variables, table_options};
use sav_cli::render::{Report, render_tsv};
use tempfile::TempDir;

const SURVEY: &str = r#"{
  "variables": [
    { "name": "ID", "kind": { "type": "string" }, "width": 5 },
    { "name": "AGE", "label": "Age", "kind": { "type": "numeric", "format": "fixed" },
      "width": 3, "measure": "scale" },
    { "name": "VISIT", "label": "Visit date", "kind": { "type": "numeric", "format": "date" },
      "width": 11 },
    { "name": "SMOKER", "kind": { "type": "numeric", "format": "fixed" }, "width": 1,
      "measure": "nominal",
      "categories": [
        { "code": "1", "label": "Yes", "numeric_value": 1 },
        { "code": "9", "label": "Refused", "numeric_value": 9 }
      ],
      "missing": { "kind": "discrete", "values": [9] } }
  ],
  "data": [
    ["P1", 34, "28-OCT-1990", 1],
    ["P2", 51, "02-NOV-1990", 9]
  ]
}"#;

const VISITS: &str = r#"{
  "variables": [
    { "name": "ID", "kind": { "type": "string" }, "width": 5 },
    { "name": "SBP", "kind": { "type": "numeric", "format": "fixed" }, "width": 3 }
  ],
  "data": [["P1", 120], ["P2", 135], ["P1", 118], ["P3", null]]
}"#;

fn write_dump(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write dump");
    path
}

fn table_args(dump: &Path) -> TableArgs {
    TableArgs {
        dump: dump.to_path_buf(),
        options: None,
        entity_type: None,
        locale: None,
        id_variable: None,
        multilines: false,
        format: OutputFormatArg::Tsv,
    }
}

fn pipes<R: Report>(report: &R) -> String {
    render_tsv(report).replace('\t', " | ")
}

#[test]
fn variables_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "survey.json", SURVEY);
    let report = run_variables(&table_args(&dump)).expect("variables");

    assert_eq!(
        report.title(),
        "Table survey (single-line, identifier ID): 3 variables"
    );
    insta::assert_snapshot!(pipes(&report), @r"
    # | Variable | Type | Label | Format | Measure | Categories | Repeatable
    1 | AGE | integer | Age | F3 | Scale |  | no
    2 | VISIT | date | Visit date | DATE11 | Unknown |  | no
    3 | SMOKER | integer |  | F1 | Nominal | 1=Yes, 9*=Refused | no
    ");
}

#[test]
fn values_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "survey.json", SURVEY);
    let args = ValuesArgs {
        table: table_args(&dump),
        entity: None,
    };
    let report = run_values(&args).expect("values");

    insta::assert_snapshot!(pipes(&report), @r"
    Entity | Variable | Value
    P1 | AGE | 34
    P1 | VISIT | 1990-10-28
    P1 | SMOKER | 1
    P2 | AGE | 51
    P2 | VISIT | 1990-11-02
    P2 | SMOKER | 9
    ");
}

#[test]
fn multiline_entities_and_sequences() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "visits.json", VISITS);

    let report = run_entities(&table_args(&dump)).expect("entities");
    assert!(report.multiline);
    assert_eq!(report.title(), "Table visits (multiline): 3 entities");
    let records = report.records();
    assert_eq!(records[0], ["Participant:P1", "1 3"]);
    assert_eq!(records[2], ["Participant:P3", "4"]);

    let args = ValuesArgs {
        table: table_args(&dump),
        entity: Some("P1".to_string()),
    };
    let report = run_values(&args).expect("values");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].value, "[120, 118]");

    let args = ValuesArgs {
        table: table_args(&dump),
        entity: Some("P3".to_string()),
    };
    let report = run_values(&args).expect("values");
    assert_eq!(report.records[0].value, "[]");
}

#[test]
fn unknown_entity_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "survey.json", SURVEY);
    let args = ValuesArgs {
        table: table_args(&dump),
        entity: Some("P9".to_string()),
    };
    let error = run_values(&args).expect_err("unknown entity");
    let message = format!("{error:#}");
    assert!(message.contains("value set of Participant:P9"), "{message}");
    assert!(message.contains("no value set for entity Participant:P9"), "{message}");
}

#[test]
fn flags_override_options_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "survey.json", SURVEY);
    let options_path = write_dump(
        &dir,
        "options.json",
        r#"{"entity_type": "Sample", "locale": "en", "multilines": true}"#,
    );
    let mut args = table_args(&dump);
    args.options = Some(options_path);
    args.locale = Some("fr".to_string());

    let options = table_options(&args).expect("options");
    assert_eq!(options.entity_type(), "Sample");
    assert_eq!(options.locale(), Some("fr"));
    assert!(options.multilines);

    let report = run_variables(&args).expect("variables");
    assert!(report.multiline);
    assert!(report.variables.iter().all(|variable| variable.repeatable));
    assert!(
        report
            .variables
            .iter()
            .all(|variable| variable.entity_type == "Sample")
    );
}

#[test]
fn unknown_id_variable_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dump = write_dump(&dir, "survey.json", SURVEY);
    let mut args = table_args(&dump);
    args.id_variable = Some("NOPE".to_string());
    let error = run_entities(&args).expect_err("unknown id variable");
    assert!(
        format!("{error:#}").contains("identifier variable 'NOPE' not found"),
        "{error:#}"
    );
}
