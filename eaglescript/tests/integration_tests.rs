//! Integration tests for rendering board descriptions

use eaglescript::prelude::*;
use eaglescript::{load_board, EagleScriptCore, RenderOptions};
use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_render_bundle_description() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.scr");
    let options = RenderOptions {
        output: Some(output.clone()),
        dry_run: false,
    };

    let result = EagleScriptCore::render(&fixture_path("bundle.json"), options)
        .expect("Bundle description should render");

    assert_eq!(result.output, output);
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, result.script);

    assert_eq!(result.summary.signals, 4);
    assert_eq!(result.summary.wires, 8);
    assert_eq!(result.summary.layers, vec![1, 16]);
    assert_eq!(result.summary.footprints, 2);
    assert_eq!(result.summary.moves, 2);
    assert_eq!(result.summary.statements, 20);
}

#[test]
fn test_render_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("never.scr");
    let options = RenderOptions {
        output: Some(output.clone()),
        dry_run: true,
    };

    let result = EagleScriptCore::render(&fixture_path("bundle.json"), options).unwrap();
    assert!(!output.exists());
    assert!(result.script.starts_with("LAYER 1\nSET WIRE_BEND 2;\n"));
}

#[test]
fn test_render_resolves_description_output() {
    let dir = TempDir::new().unwrap();
    let description = dir.path().join("board.json");
    std::fs::copy(fixture_path("bundle.json"), &description).unwrap();

    let result = EagleScriptCore::render(&description, RenderOptions::default()).unwrap();
    assert_eq!(result.output, dir.path().join("bundle.scr"));
    assert!(result.output.exists());
}

#[test]
fn test_bundle_geometry() {
    let board = load_board(&fixture_path("bundle.json")).expect("Should build");
    let ids: Vec<SignalId> = board.signals()[..3].iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![SignalId(0), SignalId(1), SignalId(2)]);

    // the three data lines now head +Y, 1mm apart, ends level at y = 7
    let expected_x = [12.0, 11.0, 10.0];
    for (signal, x) in board.signals()[..3].iter().zip(expected_x) {
        assert_eq!(signal.len(), 3);
        let end = signal.last().unwrap();
        assert!((end.x - x).abs() < 1e-9, "end {:?}", end);
        assert!((end.y - 7.0).abs() < 1e-9, "end {:?}", end);
    }

    let gnd = &board.signals()[3];
    assert_eq!(gnd.layer.number(), 16);
    assert!((gnd.length() - 25.0).abs() < 1e-9);
    assert_eq!(board.footprint("R1").unwrap().orientation, Orientation::new(90.0, true));
}

#[test]
fn test_invalid_layer_fails_before_building() {
    let err = load_board(&fixture_path("invalid_layer.json")).unwrap_err();
    assert!(matches!(err, ScriptError::Description(_)));
}

#[test]
fn test_bad_spacing_is_reported() {
    let err = load_board(&fixture_path("bad_spacing.json")).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::SpacingMismatch {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn test_missing_description() {
    let result = EagleScriptCore::render(
        &PathBuf::from("does_not_exist.json"),
        RenderOptions::default(),
    );
    assert!(matches!(result, Err(ScriptError::Io(_))));
}

#[test]
fn test_programmatic_board_matches_check() {
    let dir = TempDir::new().unwrap();
    let mut board = Board::new(BoardOptions {
        output: dir.path().join("manual.scr"),
    });

    let mut ids = Vec::new();
    for y in [0.0, 1.0, 2.0] {
        let mut signal = board.new_signal(0.254, 1, 2).unwrap();
        signal.add(0.0, y).add(10.0, y);
        ids.push(signal.id());
        board.add(signal).unwrap();
    }
    board
        .group(&ids)
        .unwrap()
        .elbow(0.0, FRAC_PI_2, 5.0, None, 2)
        .unwrap();
    let kind = FootprintKind::new("R0805", "rcl");
    board
        .add(kind.place("R1", Orientation::rotated(90.0), (12.0, 3.0)))
        .unwrap();

    let path = board.draw().unwrap();
    let summary = EagleScriptCore::check(&path).unwrap();
    assert_eq!(summary.wires, 6);
    assert_eq!(summary.signals, 3);
    assert_eq!(summary.footprints, 1);
}

#[test]
fn test_bad_footprint_name_writes_no_file() {
    let dir = TempDir::new().unwrap();
    let description = dir.path().join("board.json");
    std::fs::copy(fixture_path("bad_footprint.json"), &description).unwrap();

    let err = EagleScriptCore::render(&description, RenderOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::InvalidFootprintText { field: "name", ref value } if value == "U 1"
    ));
    assert!(!dir.path().join("bad_footprint.scr").exists());
}

#[test]
fn test_prelude_builds_signals_directly() {
    let mut ids = SignalIds::starting_at(3);
    let mut signal = Signal::new(ids.next_id().unwrap(), 0.3, Layer::BOTTOM, Bend::STRAIGHT);
    signal.add(0.0, 0.0).add(2.0, 0.0);

    let mut board = Board::default();
    board.add(signal).unwrap();
    assert!(board.render().contains("WIRE 'RTE3' (0 0) 0.3mm (2 0)"));
}
