//! Integration tests for the reference tables

use idate_catalogue::{
    default_preference, thermal_generation, Catalogue, LibraryClass, MaterialClassifier,
    ProblemClass,
};
use rstest::{fixture, rstest};

#[fixture]
fn catalogue() -> &'static Catalogue {
    Catalogue::global()
}

#[rstest]
#[case("grph", "grph")] // case 1
#[case("c-graphite", "grph")] // case 2
#[case("h-h2o", "lwtr")] // case 3
#[case("D-D2O", "hwtr")] // case 4
#[case("h-poly", "poly")] // case 5
#[case("be-met", "be")] // case 6
#[case("beo", "beo")] // case 7
fn thermal_aliases(catalogue: &Catalogue, #[case] name: &str, #[case] family: &str) {
    assert_eq!(catalogue.thermal_family(name).unwrap().name, family);
}

#[rstest]
#[case("70c", Some('1'))] // case 1
#[case(".80c", Some('2'))] // case 2
#[case("00c", Some('4'))] // case 3
#[case("66c", None)] // case 4
#[case("84p", None)] // case 5
fn thermal_generations(#[case] suffix: &str, #[case] expected: Option<char>) {
    assert_eq!(thermal_generation(suffix), expected);
}

#[rstest]
fn suggested_tables(catalogue: &Catalogue) {
    let grph = catalogue.thermal_family("grph").unwrap();
    assert_eq!(grph.table_for('2'), "grph.20t");
}

#[rstest]
fn library_classes(catalogue: &Catalogue) {
    assert_eq!(catalogue.library("84p").unwrap().class, LibraryClass::Photon);
    assert_eq!(LibraryClass::of_suffix("24u"), Some(LibraryClass::Photonuclear));
    assert_eq!(LibraryClass::of_suffix("20t"), Some(LibraryClass::Thermal));
}

#[rstest]
#[case(&["70c", "80c", "00c"], "80c")] // case 1
#[case(&["00c", "70c"], "00c")] // case 2
#[case(&["70c"], "70c")] // case 3
fn standardisation_target(catalogue: &Catalogue, #[case] present: &[&str], #[case] expected: &str) {
    let pick = catalogue.recommend_library(present, &default_preference());
    assert_eq!(pick.as_deref(), Some(expected));
}

#[test]
fn problem_classes_are_opt_in_data() {
    let template = ProblemClass::Fusion.template('n').unwrap();
    assert!(template.emax > 14.1);
    assert!(ProblemClass::Medical.template('n').is_none());
}

#[test]
fn classifier_from_file() {
    let classifier = MaterialClassifier::from_json_file("./data/classes.json").unwrap();
    assert_eq!(classifier.classify(5), Some("fuel"));
    assert_eq!(classifier.classify(250), Some("structure"));
    assert_eq!(classifier.classify(300), None);
    assert!(MaterialClassifier::default().is_empty());
    assert!(MaterialClassifier::default().with_class("bad", 10, 1).is_err());
}
