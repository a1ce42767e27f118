//! Integration tests for reading and rendering whole decks

use idate_deck::{Boundary, Code, Deck, FillSpec, Parsed, Particle, Severity, SourceValue};
use rstest::{fixture, rstest};

#[fixture]
fn pincell() -> Parsed {
    Deck::from_file("./data/decks/pincell.i").unwrap()
}

#[fixture]
fn shield() -> Parsed {
    Deck::from_file("./data/decks/shield.i").unwrap()
}

#[rstest]
#[case("./data/decks/pincell.i")] // case 1
#[case("./data/decks/shield.i")] // case 2
fn render_is_lossless(#[case] path: &str) {
    let text = std::fs::read_to_string(path).unwrap();
    let parsed = Deck::from_file(path).unwrap();
    assert_eq!(parsed.deck.render(), text);
    assert_eq!(parsed.deck.line_count(), text.lines().count());
}

#[rstest]
#[case("./data/decks/pincell.i")] // case 1
#[case("./data/decks/shield.i")] // case 2
fn fixtures_read_cleanly(#[case] path: &str) {
    let parsed = Deck::from_file(path).unwrap();
    assert!(
        parsed.diagnostics.iter().all(|d| d.severity < Severity::Error),
        "{:?}",
        parsed.diagnostics
    );
    assert_eq!(parsed.deck.invalid().count(), 0);
}

#[rstest]
fn pincell_contents(pincell: Parsed) {
    let deck = pincell.deck;
    assert_eq!(deck.cells().count(), 5);
    assert_eq!(deck.surfaces().count(), 3);
    assert_eq!(deck.materials().count(), 2);
    assert!(deck.is_kcode());
    assert_eq!(deck.mode(), vec![Particle::Neutron]);

    let lattice = deck.cell(3).unwrap();
    assert!(lattice.is_lattice());
    match &lattice.params.fill.as_ref().unwrap().spec {
        FillSpec::Array(array) => {
            assert_eq!(array.required(), 9);
            assert_eq!(array.provided(), 9);
        }
        other => panic!("unexpected fill {other:?}"),
    }

    assert_eq!(deck.surface(20).unwrap().boundary, Boundary::Reflecting);
    assert_eq!(deck.thermal().next().unwrap().1.tables[0].name, "lwtr");
}

#[rstest]
fn shield_contents(shield: Parsed) {
    let deck = shield.deck;
    assert_eq!(deck.message.len(), 2);
    assert_eq!(deck.title, "Shielding sphere with a point source");
    assert_eq!(deck.mode(), vec![Particle::Neutron, Particle::Photon]);

    let (card, cell) = deck.cells().find(|(_, c)| c.id == 3).unwrap();
    assert_eq!(card.span.first, 7);
    assert_eq!(card.span.last, 8);
    assert!(cell.params.trcl.is_some());

    let (_, source) = deck.sources().next().unwrap();
    assert_eq!(source.particle(), Some(Particle::Neutron));
    assert_eq!(source.get("erg"), Some(&SourceValue::Distribution(1)));

    let detectors: usize = deck.tallies().map(|(_, t)| t.detectors.len()).sum();
    assert_eq!(detectors, 1);
    assert_eq!(deck.others().next().unwrap().1.keyword, "nps");
}

#[test]
fn like_cells_resolve_through_chain() {
    let text = "t
1 1 -1.0 -1 imp:n=1
2 like 1 but trcl=(0 0 1)
3 like 2 but mat=4 imp:n=2
4 like 5 but u=1
5 like 4 but u=2
6 0 1 imp:n=0

1 so 1

m1 1001 1
m4 8016 1
";
    let deck = Deck::parse(text).deck;
    let ids = |id| deck.like_chain(id).iter().map(|c| c.id).collect::<Vec<_>>();

    assert_eq!(ids(3), vec![3, 2, 1]);
    assert_eq!(deck.cell_importance(2, Particle::Neutron), Some(1.0));
    assert_eq!(deck.cell_importance(3, Particle::Neutron), Some(2.0));
    assert_eq!(deck.cell_material(2), 1);
    assert_eq!(deck.cell_material(3), 4);
    assert!(deck.is_graveyard(6, Particle::Neutron));

    // a loop ends the chain instead of spinning
    assert_eq!(ids(4), vec![4, 5]);
    assert_eq!(deck.cell_importance(4, Particle::Neutron), None);
    assert_eq!(deck.cell_material(4), 0);
}

#[rstest]
#[case("imp:n 1 4000000000r", 0)] // case 1
#[case("imp:n 1 4000000000i 2", 0)] // case 2
#[case("imp:n 1 1r", 1)] // case 3
fn runaway_shorthand_skips_card(#[case] card: &str, #[case] importances: usize) {
    let parsed = Deck::parse(&format!("t\n1 0 -1\n2 0 1\n\n1 so 1\n\nmode n\n{card}\nnps 10\n"));
    assert_eq!(parsed.deck.importances().count(), importances);
    assert_eq!(parsed.deck.invalid().count(), 1 - importances);
    assert!(parsed.deck.mode_card().is_some());
}

#[rstest]
#[case("fill=-9223372036854775807:9223372036854775807 0:0 0:0 3")] // case 1
#[case("fill=0:99999 0:99999 0:99999 3 4r")] // case 2
fn oversized_lattice_skips_card(#[case] fill: &str) {
    let text = format!("t\n1 0 -1 fill=1\n2 0 -2 lat=1 u=1 {fill}\n3 0 1 imp:n=0\n\n1 so 10\n2 rpp -1 1 -1 1 -1 1\n\nmode n\n");
    let parsed = Deck::parse(&text);
    assert_eq!(parsed.deck.cells().count(), 2);
    assert!(parsed
        .diagnostics
        .iter()
        .any(|d| d.code == Code::BadParameter && d.severity == Severity::Error));
}

#[test]
fn missing_file_is_an_error() {
    assert!(Deck::from_file("./data/decks/does_not_exist.i").is_err());
}
