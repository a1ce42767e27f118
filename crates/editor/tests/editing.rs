//! Integration tests for reference preserving edits

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use idate_deck::{Deck, Particle};
use idate_editor::{
    transform_card, Concentric, Document, EditorConfig, Error, FindReplace, Shape,
    SuffixConversion, Violation,
};
use idate_xref::{Node, ReferenceGraph, SymbolTable};
use rstest::{fixture, rstest};

#[fixture]
fn reactor() -> Document {
    Document::from_file("./data/decks/reactor.i").unwrap()
}

/// Every reference whose target is defined
fn valid_references(deck: &Deck) -> BTreeSet<(Node, Node)> {
    let symbols = SymbolTable::build(deck);
    let graph = ReferenceGraph::build(deck);
    let dangling: BTreeSet<(Node, Node)> = graph.undefined(&symbols).map(|e| (e.from, e.to)).collect();
    graph
        .edges()
        .iter()
        .map(|e| (e.from, e.to))
        .filter(|pair| !dangling.contains(pair))
        .collect()
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("idate-editing-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[rstest]
#[case("70c")] // case 1
#[case("80c")] // case 2
#[case("10t")] // case 3
fn same_suffix_is_identity(reactor: Document, #[case] suffix: &str) {
    let conversion = SuffixConversion::new(suffix, suffix).unwrap();
    let (converted, _) = reactor.convert_library_suffix(&conversion).unwrap();
    assert_eq!(converted.text(), reactor.text());
}

#[rstest]
#[case("70c", "80c", 5)] // case 1
#[case("70c", "00c", 5)] // case 2
fn suffix_round_trip(reactor: Document, #[case] from: &str, #[case] to: &str, #[case] isotopes: usize) {
    let there = SuffixConversion::new(from, to).unwrap();
    let back = SuffixConversion::new(to, from).unwrap();

    let preview = reactor.preview_library_suffix(&there).unwrap();
    assert_eq!(preview.isotopes, isotopes);
    assert_eq!(preview.materials, BTreeSet::from([1, 2]));

    let (converted, _) = reactor.convert_library_suffix(&there).unwrap();
    assert_ne!(converted.text(), reactor.text());
    assert!(converted.lines()[12].ends_with("$ light water"));

    let (restored, _) = converted.convert_library_suffix(&back).unwrap();
    assert_eq!(restored.text(), reactor.text());
}

#[rstest]
#[case("density")] // case 1
#[case("importance")] // case 2
#[case("library")] // case 3
#[case("surface")] // case 4
#[case("cell")] // case 5
#[case("fragment")] // case 6
fn successful_edits_keep_references(reactor: Document, #[case] operation: &str) {
    let edited = match operation {
        "density" => reactor.edit_cell_density(2, -0.7).unwrap(),
        "importance" => {
            let values = BTreeMap::from([(1, 2.0), (2, 4.0), (3, 1.0)]);
            reactor.set_importance(Particle::Neutron, &values, false).unwrap().document
        }
        "library" => {
            let conversion = SuffixConversion::new("70c", "80c").unwrap();
            reactor.convert_library_suffix(&conversion).unwrap().0
        }
        "surface" => reactor.insert_surface("3 cz 2.0").unwrap(),
        "cell" => reactor.insert_cell("4 2 -1.0 -2 imp:n=1").unwrap(),
        _ => {
            let config = EditorConfig::default();
            let mut fragment = transform_card(5, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0], [0.0; 3], &config).unwrap();
            let shells = Concentric {
                shape: Shape::Sphere,
                radii: vec![50.0],
                materials: vec![2],
                densities: vec![-1.0],
                first_cell: 10,
                first_surface: 10,
                particles: vec![],
            };
            let extra = shells.generate(&config).unwrap();
            fragment.cells = extra.cells;
            fragment.surfaces = extra.surfaces;
            reactor.insert_fragment(&fragment).unwrap()
        }
    };

    let before = valid_references(reactor.deck());
    let after = valid_references(edited.deck());
    assert!(before.is_subset(&after), "lost {:?}", before.difference(&after).collect::<Vec<_>>());
    assert_eq!(edited.deck().invalid().count(), 0);
}

#[rstest]
fn refused_edits_name_the_break(reactor: Document) {
    let err = reactor.insert_cell("4 3 -1.0 -2 imp:n=1").unwrap_err();
    assert!(matches!(
        err.violations(),
        [Violation::UndefinedReference { to, .. }] if to.to_string() == "material 3"
    ));

    let err = reactor.edit_cell_density(3, -1.0).unwrap_err();
    assert_eq!(err.violations(), &[Violation::VoidCellDensity { cell: 3 }]);
    assert!(err.to_string().starts_with("edit refused: cell 3 is void"));
}

#[rstest]
fn inline_comments_survive(reactor: Document) {
    let edited = reactor.edit_cell_density(1, -10.9).unwrap();
    assert_eq!(edited.lines()[2], "1 1 -10.9 -1 imp:n=1 $ fuel");
    let changed: Vec<usize> = (0..reactor.line_count())
        .filter(|i| reactor.lines()[*i] != edited.lines()[*i])
        .collect();
    assert_eq!(changed, vec![2]);
}

#[rstest]
fn importance_includes_graveyard_on_request(reactor: Document) {
    let values = BTreeMap::from([(3, 0.5)]);
    let skipped = reactor.set_importance(Particle::Neutron, &values, false).unwrap();
    assert!(skipped.updated.is_empty());
    assert_eq!(skipped.document.text(), reactor.text());

    let included = reactor.set_importance(Particle::Neutron, &values, true).unwrap();
    assert_eq!(included.updated, vec![3]);
    assert_eq!(included.document.lines()[4], "3 0 2 imp:n=0.5 $ graveyard");
}

#[test]
fn write_keeps_backup() {
    let dir = scratch("write");
    let path = dir.join("reactor.i");
    fs::copy("./data/decks/reactor.i", &path).unwrap();

    let edited = Document::from_file(&path).unwrap().edit_cell_density(1, -11.0).unwrap();
    let backup = edited.write(&path).unwrap().unwrap();

    assert_eq!(backup, dir.join("reactor.i.bak"));
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        fs::read_to_string("./data/decks/reactor.i").unwrap()
    );
    assert_eq!(Document::from_file(&path).unwrap().deck().cell(1).unwrap().density, Some(-11.0));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn batch_requires_fresh_plan() {
    let dir = scratch("batch");
    let decks: Vec<PathBuf> = ["a.i", "b.i"].iter().map(|n| dir.join(n)).collect();
    for deck in &decks {
        fs::copy("./data/decks/reactor.i", deck).unwrap();
    }

    let edit = FindReplace::literal("nps 1000", "nps 50000").unwrap();
    let plan = edit.dry_run(&decks).unwrap();
    assert_eq!(plan.replacements(), 2);
    assert_eq!(plan.changes()[0].lines, vec![17]);
    assert_eq!(fs::read_to_string(&decks[0]).unwrap(), fs::read_to_string("./data/decks/reactor.i").unwrap());

    fs::write(&decks[1], "changed\n").unwrap();
    assert!(matches!(plan.apply(&EditorConfig::default()), Err(Error::StaleFile(_))));
    assert!(!fs::read_to_string(&decks[0]).unwrap().contains("50000"));

    let plan = edit.dry_run(&decks).unwrap();
    let applied = plan.apply(&EditorConfig::default()).unwrap();
    assert_eq!(applied.len(), 1);
    assert!(fs::read_to_string(&decks[0]).unwrap().contains("nps 50000"));
    assert!(applied[0].backup.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn batch_refuses_breaking_rename() {
    let dir = scratch("rename");
    let deck = dir.join("reactor.i");
    fs::copy("./data/decks/reactor.i", &deck).unwrap();

    let edit = FindReplace::regex(r"^2 cz", "7 cz").unwrap();
    let plan = edit.dry_run(&[&deck]).unwrap();
    assert!(!plan.changes()[0].violations.is_empty());
    assert!(matches!(plan.apply(&EditorConfig::default()), Err(Error::Refused(_))));
    fs::remove_dir_all(&dir).unwrap();
}
