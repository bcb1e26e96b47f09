//! End-to-end field updates on a KiCad 6 schematic.
//!
//! Loads `fixtures/amplifier.kicad_sch` and `fixtures/parts.csv`, runs the
//! bulk operations and checks both the model and the exact text written.

use std::path::PathBuf;

use kicad_fields::schematic::{RenameMode, Schematic, SchematicConfig, codes};
use kicad_fields::{ComponentDb, Error, Row};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load() -> (String, Schematic) {
    let text = std::fs::read_to_string(fixture("amplifier.kicad_sch")).unwrap();
    let schematic = Schematic::parse(&text).unwrap();
    (text, schematic)
}

fn references(schematic: &Schematic) -> Vec<String> {
    schematic
        .symbols()
        .map(|s| s.reference().into_owned())
        .collect()
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_fixture_round_trips_byte_for_byte() {
    let (text, schematic) = load();
    assert_eq!(schematic.to_string(), text);
}

#[test]
fn test_fixture_symbols() {
    let (_, schematic) = load();
    assert_eq!(references(&schematic), vec!["R1", "R2", "#PWR01", "H1"]);

    let special: Vec<_> = schematic.symbols().map(|s| s.is_special()).collect();
    assert_eq!(special, vec![false, false, true, true]);
}

#[test]
fn test_read_write_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.kicad_sch");

    let schematic = Schematic::read_file(fixture("amplifier.kicad_sch")).unwrap();
    schematic.write_file(&out).unwrap();

    let original = std::fs::read_to_string(fixture("amplifier.kicad_sch")).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), original);
}

#[test]
fn test_read_errors_carry_path() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.kicad_sch");
    assert!(matches!(
        Schematic::read_file(&missing),
        Err(Error::Read { path, .. }) if path == missing
    ));

    let broken = dir.path().join("broken.kicad_sch");
    std::fs::write(&broken, "(kicad_sch (symbol\n").unwrap();
    let err = Schematic::read_file(&broken).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("broken.kicad_sch"));
}

// ============================================================================
// DATABASE UPDATE
// ============================================================================

#[test]
fn test_update_from_csv() {
    let (_, mut schematic) = load();
    let db = ComponentDb::from_csv_path(fixture("parts.csv")).unwrap();

    let report = schematic.update_fields_from_db(&db, &[vec!["Value", "Tolerance"], vec!["Value"]]);

    let matched: Vec<_> = report
        .matched
        .iter()
        .map(|m| (m.reference.as_str(), m.group_index, m.row_index))
        .collect();
    assert_eq!(matched, vec![("R1", 0, 0), ("R2", 1, 2)]);
    assert_eq!(report.skipped, vec!["#PWR01", "H1"]);
    assert!(report.diagnostics.is_empty());

    let text = schematic.to_string();
    // New properties copy the last property's layout and take the next ids.
    assert!(text.contains(
        "    (property \"Tolerance\" \"1%\" (id 4) (at 127 86.36 0)\n      (effects (font (size 1.27 1.27)) hide)\n    )\n    (property \"MPN\" \"RC0402FR-0710KL\" (id 5) (at 127 86.36 0)\n      (effects (font (size 1.27 1.27)) hide)\n    )\n    (property \"Manufacturer\" \"Yageo\" (id 6) (at 127 86.36 0)\n      (effects (font (size 1.27 1.27)) hide)\n    )\n    (pin \"1\""
    ));

    let r2 = schematic.symbols().nth(1).unwrap();
    assert_eq!(r2.value(), "47k DNP");
    assert_eq!(
        r2.get_property("Footprint").unwrap().value(),
        "Resistor_SMD:R_0402_1005Metric"
    );
    assert_eq!(r2.get_property("MPN").unwrap().id(), Some(4));
    assert!(r2.get_property("Tolerance").is_none());

    // Special symbols and everything outside the symbols are untouched.
    let hole = schematic.symbols().nth(3).unwrap();
    assert_eq!(hole.properties().count(), 4);
    assert!(text.contains("(reference \"R1\") (unit 1) (value \"10k\") (footprint \"\")"));
}

#[test]
fn test_value_substring_match() {
    // The row value is looked for inside the symbol's value.
    let (_, mut schematic) = load();
    let db = ComponentDb::new(["Value", "MPN"])
        .with_row(Row::from_iter([("Value", "47k"), ("MPN", "RES-47K")]));

    let report = schematic.update_fields_from_db(&db, &[["Value"]]);
    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].reference, "R2");
    assert_eq!(report.unmatched().collect::<Vec<_>>(), vec!["R1"]);

    let no_match = &report.diagnostics[0];
    assert_eq!(no_match.code, codes::NO_MATCH);
    assert!(no_match.is_error());
}

#[test]
fn test_update_with_cleanup_drops_stale_fields() {
    let (_, mut schematic) = load();
    let db = ComponentDb::new(["Value", "MPN"])
        .with_row(Row::from_iter([("Value", "10k"), ("MPN", "RES-10K")]));

    schematic.update_fields_from_db_with_cleanup(&db, &[["Value"]]);

    let r1 = schematic.symbols().next().unwrap();
    assert!(r1.get_property("Tolerance").is_none());
    assert_eq!(r1.get_property("MPN").unwrap().id(), Some(4));
}

#[test]
fn test_update_reports_duplicates() {
    let (text, _) = load();
    let text = text.replace(
        "(property \"Tolerance\" \"1%\" (id 4)",
        "(property \"Tolerance\" \"5%\" (id 5) (at 0 0 0))\n    (property \"Tolerance\" \"1%\" (id 4)",
    );
    let mut schematic = Schematic::parse(&text).unwrap();
    let db = ComponentDb::from_csv_path(fixture("parts.csv")).unwrap();

    let report = schematic.update_fields_from_db(&db, &[["Value", "Tolerance"]]);
    // The last duplicate is used for matching.
    assert_eq!(report.matched[0].row_index, 0);

    let duplicate = report
        .diagnostics
        .iter()
        .find(|d| d.code == codes::DUPLICATE_PROPERTY)
        .unwrap();
    assert_eq!(duplicate.reference, "R1");
    assert_eq!(duplicate.field.as_deref(), Some("Tolerance"));
}

// ============================================================================
// POPULATE / BOM
// ============================================================================

#[test]
fn test_populate_fields() {
    let (_, mut schematic) = load();
    assert_eq!(schematic.add_populate_fields(), 2);

    let populate: Vec<_> = schematic
        .symbols()
        .map(|s| s.get_property("Populate").map(|p| p.value().into_owned()))
        .collect();
    assert_eq!(
        populate,
        vec![Some("Y".to_string()), Some("N".to_string()), None, None]
    );
}

#[test]
fn test_populate_and_bom_attributes() {
    let (_, mut schematic) = load();

    assert_eq!(schematic.add_populate_attrs(), 1);
    assert_eq!(schematic.add_in_bom_attrs(), 2);

    let text = schematic.to_string();
    assert!(text.contains("(in_bom yes) (on_board yes) (dnp no) (fields_autoplaced)"));
    assert!(text.contains("(in_bom yes) (on_board yes) (dnp yes) (fields_autoplaced)"));
    assert!(text.contains("(in_bom no) (on_board yes) (fields_autoplaced)"));

    let r2 = schematic.symbols().nth(1).unwrap();
    assert_eq!(r2.value(), "47k");

    // Running again changes nothing.
    schematic.add_populate_attrs();
    schematic.add_in_bom_attrs();
    assert_eq!(schematic.to_string(), text);
}

// ============================================================================
// RENAME
// ============================================================================

#[test]
fn test_rename_modes() {
    let (text, _) = load();

    let mut in_place = Schematic::parse(&text).unwrap();
    in_place.rename_fields(&["Tolerance"], &["Tol"]).unwrap();
    let r1 = in_place.symbols().next().unwrap();
    assert_eq!(r1.get_property("Tol").unwrap().id(), Some(4));

    let config = SchematicConfig::default().with_rename_mode(RenameMode::Reinsert);
    let mut reinsert = Schematic::parse_with_config(&text, config).unwrap();
    reinsert.rename_fields(&["Tolerance"], &["Tol"]).unwrap();
    let r1 = reinsert.symbols().next().unwrap();
    assert_eq!(r1.get_property("Tol").unwrap().value(), "1%");
    assert!(r1.get_property("Tolerance").is_none());

    // A lone non-special field ends up at the same place either way.
    assert_eq!(in_place.to_string(), reinsert.to_string());
}

#[test]
fn test_rename_special_field_in_place() {
    let (_, mut schematic) = load();
    schematic.rename_fields(&["Datasheet"], &["Doc"]).unwrap();
    assert!(schematic.symbols().all(|s| s.get_property("Datasheet").is_none()));
    assert_eq!(schematic.symbols().filter(|s| s.get_property("Doc").is_some()).count(), 4);
}

// ============================================================================
// MINIMAL SCENARIOS
// ============================================================================

const SINGLE_RESISTOR: &str = "(kicad_sch (version 20211123) (generator eeschema)
  (symbol (lib_id \"Device:R\") (at 50 50 0) (unit 1)
    (in_bom yes) (on_board yes)
    (property \"Reference\" \"R1\" (id 0) (at 52 49 0))
    (property \"Value\" \"10k_tol5\" (id 1) (at 52 51 0))
    (property \"Footprint\" \"\" (id 2) (at 50 50 0))
  )
  (symbol (lib_id \"power:+3V3\") (at 50 40 0) (unit 1)
    (property \"Reference\" \"#PWR02\" (id 0) (at 50 44 0))
    (property \"Value\" \"10k\" (id 1) (at 50 36 0))
  )
)
";

#[test]
fn test_single_symbol_gains_database_fields() {
    let mut schematic = Schematic::parse(SINGLE_RESISTOR).unwrap();
    let db = ComponentDb::new(["Value", "MPN", "Footprint"]).with_row(Row::from_iter([
        ("Value", "10k"),
        ("MPN", "RES-10K"),
        ("Footprint", "0402"),
    ]));

    let report = schematic.update_fields_from_db(&db, &[["Value"]]);
    assert_eq!(report.matched.len(), 1);

    let r1 = schematic.symbols().next().unwrap();
    assert_eq!(r1.get_property("MPN").unwrap().value(), "RES-10K");
    assert_eq!(r1.get_property("Footprint").unwrap().value(), "0402");
    assert_eq!(r1.value(), "10k_tol5");

    // The power symbol would match on Value but is never considered.
    let pwr = schematic.symbols().nth(1).unwrap();
    assert!(pwr.get_property("MPN").is_none());
}

#[test]
fn test_special_symbol_gets_no_populate_data() {
    let mut schematic = Schematic::parse(SINGLE_RESISTOR).unwrap();
    schematic.add_populate_fields();
    schematic.add_populate_attrs();

    let pwr = schematic.symbols().nth(1).unwrap();
    assert!(pwr.get_property("Populate").is_none());
    assert_eq!(pwr.attribute("dnp"), None);
}

#[test]
fn test_dnp_marker_in_value() {
    let text = SINGLE_RESISTOR.replace("10k_tol5", "100nF DNP");
    let mut schematic = Schematic::parse(&text).unwrap();

    let r1 = schematic.symbols().next().unwrap();
    assert!(!r1.is_populated("DNP"));

    schematic.add_populate_fields();
    let r1 = schematic.symbols().next().unwrap();
    assert_eq!(r1.get_property("Populate").unwrap().value(), "N");
    assert_eq!(r1.get_property("Populate").unwrap().id(), Some(3));
}
