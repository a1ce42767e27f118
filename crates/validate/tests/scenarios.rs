//! End to end validation of small decks

use idate_deck::{Code, Severity, Span};
use idate_validate::{Report, Validator};
use rstest::{fixture, rstest};

#[fixture]
fn validator() -> Validator {
    Validator::default()
}

fn scenario(validator: &Validator, name: &str) -> Report {
    validator
        .validate_file(format!("data/decks/{name}.i"))
        .unwrap()
}

fn with_code(report: &Report, code: Code) -> Vec<&idate_deck::Diagnostic> {
    report.diagnostics.iter().filter(|d| d.code == code).collect()
}

#[rstest]
fn minimal_valid_deck(validator: Validator) {
    let report = scenario(&validator, "s1");
    assert_eq!(report.errors(), 0);
    assert_eq!(report.warnings(), 1);
    assert_eq!(report.diagnostics[0].code, Code::NoMaterials);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary(), "PASSED with 1 warning");
}

#[rstest]
fn undefined_surface(validator: Validator) {
    let report = scenario(&validator, "s2");
    assert_eq!(report.errors(), 1);
    let found = with_code(&report, Code::UndefinedReference);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span, Some(Span::line(2)));
    assert_eq!(found[0].file.as_deref(), Some("data/decks/s2.i"));
    assert!(found[0].message.contains("surface 2"));
}

#[rstest]
fn fill_array_one_short(validator: Validator) {
    let report = scenario(&validator, "s3");
    assert_eq!(report.errors(), 1);
    let found = with_code(&report, Code::FillArrayLengthMismatch);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Error);
    let data = found[0].data.as_ref().unwrap();
    assert_eq!(data["required"], 9);
    assert_eq!(data["provided"], 8);
    assert_eq!(data["delta"], -1);
}

#[rstest]
fn like_cells_inherit_importance(validator: Validator) {
    let report = scenario(&validator, "like");
    assert!(with_code(&report, Code::MissingImportance).is_empty());
    assert!(report.passed(), "{}", report.render());
}

#[rstest]
fn like_cell_material_must_exist(validator: Validator) {
    let report = scenario(&validator, "like_mat");
    assert!(with_code(&report, Code::MissingImportance).is_empty());
    let found = with_code(&report, Code::UndefinedReference);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span, Some(Span::line(3)));
    assert!(found[0].message.contains("material 9"));
    assert_eq!(report.exit_code(), 1);
}

#[rstest]
fn run_length_fill(validator: Validator) {
    let report = scenario(&validator, "s4");
    assert!(report.passed(), "{}", report.render());
}

#[rstest]
fn library_mixing(validator: Validator) {
    let report = scenario(&validator, "s5");
    assert_eq!(report.errors(), 0);
    let found = with_code(&report, Code::MixedLibraries);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Warning);
    assert!(found[0].message.starts_with("3 library versions in use"));
    assert_eq!(found[0].fix_hint.as_deref(), Some("standardise on .80c"));
}

#[rstest]
fn graphite_without_thermal_table(validator: Validator) {
    let report = scenario(&validator, "s6");
    let found = with_code(&report, Code::MissingThermalScattering);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Error);
    let data = found[0].data.as_ref().unwrap();
    assert_eq!(data["element"], "C");
    assert_eq!(data["suggest"], "grph.20t");
}

#[rstest]
fn parallel_batch_keeps_order(validator: Validator) {
    let paths: Vec<String> = (1..=6).map(|i| format!("data/decks/s{i}.i")).collect();
    let codes: Vec<i32> = validator
        .validate_files(&paths)
        .into_iter()
        .map(|r| r.unwrap().exit_code())
        .collect();
    assert_eq!(codes, vec![0, 1, 1, 0, 0, 1]);
}
