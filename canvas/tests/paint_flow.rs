use std::{sync::Arc, thread};

use canvas::{CanvasConfig, CanvasError, CooldownToken, PaintOrchestrator, PaintOutcome, PaintRequest, TokenCodec};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn orchestrator() -> PaintOrchestrator {
    PaintOrchestrator::new(CanvasConfig::default(), TokenCodec::new("integration").unwrap()).unwrap()
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn request(x: i64, y: i64, color: &str) -> PaintRequest {
    PaintRequest { x, y, color: color.to_string() }
}

fn expect_painted(outcome: PaintOutcome) -> (u64, CooldownToken) {
    match outcome {
        PaintOutcome::Painted { view, token, .. } => (view.cooldown, token),
        PaintOutcome::RateLimited { view } => panic!("unexpectedly rate limited for {}s", view.cooldown),
    }
}

#[test]
fn end_to_end_cooldown_scenario() {
    let canvas = orchestrator();

    let outcome = canvas.paint(&request(5, 5, "#FF0000"), None, start()).unwrap();
    assert_eq!(outcome.view().board.get(5, 5).map(|c| c.as_str()), Some("#FF0000"));
    let (cooldown, t1) = expect_painted(outcome);
    assert_eq!(cooldown, 60);

    let outcome = canvas.paint(&request(6, 6, "#00FF00"), Some(&t1), start()).unwrap();
    let PaintOutcome::RateLimited { view } = outcome else { panic!("expected rate limit") };
    assert_eq!(view.cooldown, 60);
    assert_eq!(view.board.get(6, 6), None);

    let later = start() + Duration::seconds(60);
    let outcome = canvas.paint(&request(6, 6, "#00FF00"), Some(&t1), later).unwrap();
    assert_eq!(outcome.view().board.get(6, 6).map(|c| c.as_str()), Some("#00FF00"));
    let (_, t2) = expect_painted(outcome);
    assert_ne!(t1, t2);
    assert_eq!(canvas.snapshot(Some(&t2), later).cooldown, 60);
}

#[test]
fn out_of_bounds_paint_is_invalid_and_changes_nothing() {
    let canvas = orchestrator();
    let before = canvas.snapshot(None, start());
    for (x, y) in [(-1, 0), (0, -1), (1000, 0), (0, 1000), (i64::MIN, i64::MAX)] {
        let result = canvas.paint(&request(x, y, "#FF0000"), None, start());
        assert!(matches!(result, Err(CanvasError::InvalidInput(_))), "({x}, {y})");
    }
    assert_eq!(canvas.snapshot(None, start()), before);
}

#[test]
fn unknown_color_is_invalid_even_when_rate_limited() {
    let canvas = orchestrator();
    let (_, token) = expect_painted(canvas.paint(&request(0, 0, "#000000"), None, start()).unwrap());
    let result = canvas.paint(&request(1, 1, "#123456"), Some(&token), start());
    assert!(matches!(result, Err(CanvasError::InvalidInput(_))));
    assert_eq!(canvas.grid().painted_cells(), 1);
}

#[test]
fn rate_limited_paint_keeps_remaining_time() {
    let canvas = orchestrator();
    let (_, token) = expect_painted(canvas.paint(&request(0, 0, "#000000"), None, start()).unwrap());
    let outcome = canvas.paint(&request(0, 0, "#FFFFFF"), Some(&token), start() + Duration::seconds(45)).unwrap();
    assert!(matches!(outcome, PaintOutcome::RateLimited { .. }));
    assert_eq!(outcome.view().cooldown, 15);
    assert_eq!(outcome.view().board.get(0, 0).map(|c| c.as_str()), Some("#000000"));
}

#[test]
fn client_without_token_is_always_allowed() {
    let canvas = orchestrator();
    for i in 0..5 {
        let outcome = canvas.paint(&request(i, i, "#0000FF"), None, start()).unwrap();
        assert!(matches!(outcome, PaintOutcome::Painted { .. }));
    }
}

#[test]
fn repeated_snapshots_are_identical() {
    let canvas = orchestrator();
    canvas.paint(&request(10, 20, "#FFA500"), None, start()).unwrap();
    let first = canvas.snapshot(None, start());
    let second = canvas.snapshot(None, start());
    assert_eq!(first, second);
    assert_eq!(first.cooldown, 0);
}

#[test]
fn concurrent_paints_do_not_contaminate_each_other() {
    let canvas = Arc::new(orchestrator());
    let jobs = [(1, 2, "#FF0000"), (2, 1, "#0000FF")];
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|(x, y, color)| {
            let canvas = canvas.clone();
            thread::spawn(move || canvas.paint(&request(x, y, color), None, start()).unwrap())
        })
        .collect();
    for handle in handles {
        assert!(matches!(handle.join().unwrap(), PaintOutcome::Painted { .. }));
    }

    let view = canvas.snapshot(None, start());
    assert_eq!(view.board.get(1, 2).map(|c| c.as_str()), Some("#FF0000"));
    assert_eq!(view.board.get(2, 1).map(|c| c.as_str()), Some("#0000FF"));
    assert_eq!(canvas.grid().painted_cells(), 2);
}

#[test]
fn board_view_matches_wire_format() {
    let config = CanvasConfig { size: 2, ..CanvasConfig::default() };
    let canvas = PaintOrchestrator::new(config, TokenCodec::new("wire").unwrap()).unwrap();
    let outcome = canvas.paint(&request(0, 1, "#ffd700"), None, start()).unwrap();
    let json = serde_json::to_value(outcome.view()).unwrap();
    assert_eq!(json, serde_json::json!({ "board": [["", ""], ["#FFD700", ""]], "cooldown": 60, "generation": 1 }));
}

#[test]
fn painted_cells_carry_commit_order() {
    let canvas = orchestrator();
    let mut generations = Vec::new();
    for (x, color) in [(0, "#FF0000"), (0, "#0000FF"), (1, "#00FF00")] {
        let PaintOutcome::Painted { view, cell, .. } = canvas.paint(&request(x, 0, color), None, start()).unwrap() else {
            panic!("expected paint")
        };
        assert!(view.generation >= cell.generation);
        generations.push(cell.generation);
    }
    assert_eq!(generations, vec![1, 2, 3]);

    let rejected = canvas.paint(&request(9999, 0, "#FF0000"), None, start());
    assert!(rejected.is_err());
    assert_eq!(canvas.snapshot(None, start()).generation, 3);
}

#[test]
fn invalid_config_is_refused() {
    let config = CanvasConfig { cooldown_seconds: 0, ..CanvasConfig::default() };
    assert!(matches!(
        PaintOrchestrator::new(config, TokenCodec::new("x").unwrap()),
        Err(CanvasError::InvalidConfig(_))
    ));
    let config = CanvasConfig { cooldown_seconds: u64::MAX, ..CanvasConfig::default() };
    assert!(matches!(
        PaintOrchestrator::new(config, TokenCodec::new("x").unwrap()),
        Err(CanvasError::InvalidConfig(_))
    ));
}
