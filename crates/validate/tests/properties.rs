//! Properties every validation run must hold

use idate_deck::{Code, Diagnostic};
use idate_validate::Validator;
use rstest::rstest;

fn validate(text: &str) -> Vec<Diagnostic> {
    Validator::default().validate_str(text).diagnostics
}

fn coded(text: &str, code: Code) -> Vec<Diagnostic> {
    validate(text).into_iter().filter(|d| d.code == code).collect()
}

#[rstest]
#[case("1 0 -1 imp:n=1\n1 0 1 imp:n=0\n\n1 so 1", "cell")] // case 1
#[case("1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n1 so 2", "surface")] // case 2
#[case("1 1 -1 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n\nm1 1001 1\nm1 1001 2", "material")] // case 3
#[case("1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n\nf4:n 1\nf4:n 2", "tally")] // case 4
fn one_duplicate_diagnostic(#[case] body: &str, #[case] kind: &str) {
    let text = format!("t\n{body}\n\nmode n\n");
    let found = coded(&text, Code::DuplicateId);
    assert_eq!(found.len(), 1);
    let data = found[0].data.as_ref().unwrap();
    assert_eq!(data["kind"], kind);
    assert_eq!(data["spans"].as_array().map(|s| s.len()), Some(2));
}

#[rstest]
#[case("2 0 -1 u=1 fill=2 imp:n=1\n3 0 -1 u=2 fill=1 imp:n=1", vec![vec![1, 2]])] // case 1
#[case("2 0 -1 u=1 fill=1 imp:n=1", vec![vec![1]])] // case 2
#[case("2 0 -1 u=3 fill=1 imp:n=1\n3 0 -1 u=1 fill=2 imp:n=1\n4 0 -1 u=2 fill=3 imp:n=1", vec![vec![1, 2, 3]])] // case 3
#[case("2 0 -1 u=1 fill=2 imp:n=1\n3 0 -1 u=2 fill=1 imp:n=1\n4 0 -1 u=2 fill=3 imp:n=1\n5 0 -1 u=3 fill=2 imp:n=1", vec![vec![1, 2], vec![2, 3]])] // case 4
#[case("2 0 -1 u=1 fill=2 imp:n=1\n3 0 -1 u=2 imp:n=1", vec![])] // case 5
fn every_cycle_reported_once(#[case] cells: &str, #[case] expected: Vec<Vec<u32>>) {
    let text = format!("t\n1 0 -1 fill=1 imp:n=1\n9 0 1 imp:n=0\n{cells}\n\n1 so 1\n\nmode n\n");
    let found: Vec<Vec<u32>> = coded(&text, Code::UniverseCycle)
        .iter()
        .map(|d| serde_json::from_value(d.data.as_ref().unwrap()["universes"].clone()).unwrap())
        .collect();
    assert_eq!(found, expected);
}

#[rstest]
#[case("0:2 0:0 0:0 7 2R", 0)] // case 1
#[case("-1:1 -1:1 0:0 7 8R", 0)] // case 2
#[case("0:1 0:1 0:1 7 6R", -1)] // case 3
#[case("0:1 0:0 0:0 7 7 7", 1)] // case 4
fn fill_array_arithmetic(#[case] fill: &str, #[case] delta: i64) {
    let text = format!(
        "t\n1 0 -60 imp:n=1 fill=10\n2 0 60 imp:n=0\n3 0 -50 imp:n=1 lat=1 u=10 fill={fill}\n4 0 -70 imp:n=1 u=7\n5 0 70 imp:n=1 u=7\n\n50 rpp -1 1 -1 1 -1 1\n60 rpp -3 3 -3 3 -1 1\n70 cz 0.5\n\nmode n\n"
    );
    let found = coded(&text, Code::FillArrayLengthMismatch);
    match delta {
        0 => assert!(found.is_empty()),
        _ => {
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].data.as_ref().unwrap()["delta"], delta);
        }
    }
}

#[rstest]
#[case("1 0 0 0 1 0 0 0 1", true)] // case 1
#[case("1 0 0 0 1 0 0 0 1.0000001", true)] // case 2
#[case("1 0 0 0 1 0 0 0 1.00001", false)] // case 3
#[case("0 1 0 1 0 0 0 0 1", false)] // case 4
#[case("0.6 0.8 0 -0.8 0.6 0 0 0 1", true)] // case 5
fn rotation_validity(#[case] matrix: &str, #[case] valid: bool) {
    let text = format!("t\n1 0 -1 imp:n=1 trcl=1\n2 0 1 imp:n=0\n\n1 so 1\n\nmode n\ntr1 0 0 0 {matrix}\n");
    let found = coded(&text, Code::NonOrthonormalTransform);
    assert_eq!(found.is_empty(), valid);
}
