// tests/turtle_geometry.rs
use glam::DVec2;
use turtle_lines::{
    Action, Bounds, BoundsPolicy, CommandTable, DefaultAction, Error, RuleTable, Symbol,
    TurtleConfig, TurtleInterpreter, TurtleState, expand, format_number, interpret,
};

const EPS: f64 = 1e-4;

fn unit_config(angle: f64) -> TurtleConfig {
    TurtleConfig {
        step: 1.0,
        angle,
        ..Default::default()
    }
}

fn assert_near(actual: DVec2, expected: DVec2) {
    assert!(
        actual.abs_diff_eq(expected, EPS),
        "expected {expected:?}, got {actual:?}"
    );
}

fn setup() -> CommandTable {
    CommandTable::standard(DefaultAction::Noop)
}

#[test]
fn test_koch_generator() {
    let commands = setup();
    let rules = RuleTable::new().with_rule('F', "F+F--F+F");

    let drawing = interpret(expand("F", &rules, 1), &commands, unit_config(60.0)).unwrap();

    assert_eq!(drawing.polylines.len(), 1, "Koch generator is one stroke");
    let points = &drawing.polylines[0].points;
    assert_eq!(points.len(), 5);

    // F: east. +: 60°. F. --: 300°. F. +: 0°. F.
    let h = 3f64.sqrt() / 2.0;
    let expected = [
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(1.5, h),
        DVec2::new(2.0, 0.0),
        DVec2::new(3.0, 0.0),
    ];
    for (actual, expected) in points.iter().zip(expected) {
        assert_near(*actual, expected);
    }

    let rect = drawing.bounds.rect().unwrap();
    assert_near(rect.min, DVec2::ZERO);
    assert_near(rect.max, DVec2::new(3.0, h));
}

#[test]
fn test_pop_splits_branches() {
    let commands = setup().with('X', Action::Noop);
    let rules = RuleTable::new().with_rule('X', "F[+X]F[-X]");

    let drawing = interpret(expand("X", &rules, 1), &commands, unit_config(25.0)).unwrap();

    // Each `]` closes the active stroke, so the trunk is never joined to a branch tip.
    assert_eq!(drawing.polylines.len(), 2);
    let first = &drawing.polylines[0];
    let second = &drawing.polylines[1];
    assert_near(first.first().unwrap(), DVec2::ZERO);
    assert_near(first.last().unwrap(), DVec2::new(1.0, 0.0));
    // The second stroke restarts at the restored point.
    assert_near(second.first().unwrap(), DVec2::new(1.0, 0.0));
    assert_near(second.last().unwrap(), DVec2::new(2.0, 0.0));
}

#[test]
fn test_branch_restarts_at_saved_point() {
    // F[+F]F with a 90° turn: the branch goes up, the trunk continues east.
    let commands = setup();
    let drawing = interpret("F[+F]F".chars(), &commands, unit_config(90.0)).unwrap();

    assert_eq!(drawing.polylines.len(), 2);
    let trunk_and_branch = &drawing.polylines[0].points;
    assert_eq!(trunk_and_branch.len(), 3);
    assert_near(trunk_and_branch[2], DVec2::new(1.0, 1.0));

    let continuation = &drawing.polylines[1].points;
    assert_near(continuation[0], DVec2::new(1.0, 0.0));
    assert_near(continuation[1], DVec2::new(2.0, 0.0));
}

#[test]
fn test_push_pop_restores_state() {
    let commands = setup();
    let config = TurtleConfig {
        step: 2.0,
        angle: 30.0,
        start: TurtleState::new(3.5, -1.25, 45.0),
        ..Default::default()
    };

    // Without the push/pop pair the trailing F lands here.
    let plain = interpret("F".chars(), &commands, config.clone()).unwrap();
    let with_pair = interpret("+[]-[]F".chars(), &commands, config).unwrap();

    assert_near(
        with_pair.polylines[0].last().unwrap(),
        plain.polylines[0].last().unwrap(),
    );
}

#[test]
fn test_pop_without_push() {
    let commands = setup();
    let result = interpret("FF]F[".chars(), &commands, unit_config(90.0));

    match result {
        Err(Error::StackUnderflow { symbol, index }) => {
            assert_eq!(symbol, ']');
            assert_eq!(index, 2);
        }
        other => panic!("expected StackUnderflow, got {other:?}"),
    }
}

#[test]
fn test_first_unmatched_pop_is_reported() {
    let commands = setup();
    // The first pop is balanced; the second has nothing to restore.
    let err = interpret("[F]]]".chars(), &commands, unit_config(90.0)).unwrap_err();
    assert!(matches!(err, Error::StackUnderflow { index: 3, .. }));
}

#[test]
fn test_turn_abs() {
    let commands = CommandTable::new(DefaultAction::Noop)
        .with('F', Action::DRAW)
        .with('R', Action::TurnAbs { angle: 90.0 });
    // Base angle is ignored by turn_abs.
    let drawing = interpret("RF".chars(), &commands, unit_config(7.0)).unwrap();
    assert_near(drawing.polylines[0].points[1], DVec2::new(0.0, 1.0));
}

#[test]
fn test_turn_multiplier_and_step_multiplier() {
    let commands = CommandTable::new(DefaultAction::Noop)
        .with(
            'G',
            Action::Forward {
                draw: true,
                step: 2.5,
            },
        )
        .with(
            'L',
            Action::Turn {
                direction: 1,
                angle: 2.0,
            },
        );
    let drawing = interpret("LG".chars(), &commands, unit_config(45.0)).unwrap();
    assert_near(drawing.polylines[0].points[1], DVec2::new(0.0, 2.5));
}

#[test]
fn test_heading_stays_normalized() {
    let mut turtle = TurtleState::default();
    turtle.turn(-90.0);
    assert_eq!(turtle.heading, 270.0);
    turtle.turn(450.0);
    assert_eq!(turtle.heading, 0.0);

    // Small negative turns must not land on 360 after normalization.
    turtle.turn(-1e-6);
    assert!(turtle.heading < 360.0, "{}", turtle.heading);
    let mut turtle = TurtleState::default();
    turtle.turn(-1e-15);
    assert_eq!(turtle.heading, 0.0);
}

#[test]
fn test_pen_up_starts_new_polyline() {
    let commands = setup();
    let drawing = interpret("FfF".chars(), &commands, unit_config(90.0)).unwrap();

    assert_eq!(drawing.polylines.len(), 2);
    assert_near(drawing.polylines[0].first().unwrap(), DVec2::new(0.0, 0.0));
    assert_near(drawing.polylines[0].last().unwrap(), DVec2::new(1.0, 0.0));
    assert_near(drawing.polylines[1].first().unwrap(), DVec2::new(2.0, 0.0));
    assert_near(drawing.polylines[1].last().unwrap(), DVec2::new(3.0, 0.0));
}

#[test]
fn test_default_action_policies() {
    // 'A' is not in the table.
    let draw = interpret(
        "A".chars(),
        &CommandTable::standard(DefaultAction::ForwardDraw),
        unit_config(90.0),
    )
    .unwrap();
    assert_eq!(draw.polylines.len(), 1);
    assert_near(draw.polylines[0].points[1], DVec2::new(1.0, 0.0));

    let moved = interpret(
        "A".chars(),
        &CommandTable::standard(DefaultAction::ForwardMove),
        unit_config(90.0),
    )
    .unwrap();
    assert!(moved.polylines.is_empty());
    assert_near(moved.bounds.max().unwrap(), DVec2::new(1.0, 0.0));

    let ignored = interpret(
        "A".chars(),
        &CommandTable::standard(DefaultAction::Noop),
        unit_config(90.0),
    )
    .unwrap();
    assert!(ignored.polylines.is_empty());
    // The cursor never left the start point.
    assert!(ignored.bounds.is_empty());
    assert_eq!(ignored.bounds.width(), 0.0);

    let turned = interpret("+-|".chars(), &setup(), unit_config(90.0)).unwrap();
    assert!(turned.bounds.is_empty());
}

#[test]
fn test_invalid_action_rejected_before_interpretation() {
    let commands = setup().with(
        '+',
        Action::Turn {
            direction: 2,
            angle: 1.0,
        },
    );
    // The bad symbol never appears in the stream; the table is still rejected.
    let err = interpret("FF".chars(), &commands, unit_config(90.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidAction { symbol: Some('+'), .. }));

    let commands = setup().with(
        'G',
        Action::Forward {
            draw: true,
            step: -1.0,
        },
    );
    assert!(interpret("G".chars(), &commands, unit_config(90.0)).is_err());
}

#[test]
fn test_invalid_actions_reported_in_symbol_order() {
    let bad_turn = Action::Turn {
        direction: 0,
        angle: 1.0,
    };
    let commands = CommandTable::new(DefaultAction::Noop)
        .with('z', bad_turn)
        .with('q', bad_turn)
        .with('b', bad_turn);
    for _ in 0..8 {
        let err = interpret("F".chars(), &commands, unit_config(90.0)).unwrap_err();
        assert!(
            matches!(err, Error::InvalidAction { symbol: Some('b'), .. }),
            "{err}"
        );
    }
}

#[test]
fn test_invalid_turtle_config_rejected_before_interpretation() {
    let commands = setup();
    // Any symbol pulled from this stream fails the test.
    let untouched = || std::iter::repeat_with(|| -> Symbol { panic!("symbol pulled") });

    for step in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let config = TurtleConfig {
            step,
            ..Default::default()
        };
        let err = interpret(untouched(), &commands, config).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfig { field: "turtle.step", .. }),
            "step {step}: {err}"
        );
    }

    let config = TurtleConfig {
        angle: f64::NAN,
        ..Default::default()
    };
    let err = interpret(untouched(), &commands, config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { field: "turtle.angle", .. }));

    for start in [
        TurtleState::new(f64::INFINITY, 0.0, 0.0),
        TurtleState::new(0.0, f64::NAN, 0.0),
        TurtleState::new(0.0, 0.0, f64::NEG_INFINITY),
    ] {
        let config = TurtleConfig {
            start,
            ..Default::default()
        };
        let err = interpret(untouched(), &commands, config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "turtle.start", .. }));
    }
}

#[test]
fn test_long_walk_does_not_drift() {
    let commands = setup();
    let config = TurtleConfig {
        step: 0.1,
        ..Default::default()
    };

    let drawing = interpret(std::iter::repeat_n('F', 100_000), &commands, config).unwrap();

    assert_eq!(drawing.point_count(), 100_001);
    let end = drawing.polylines[0].last().unwrap();
    assert!((end.x - 10_000.0).abs() < 1e-6, "{end:?}");
    assert_eq!(end.y, 0.0);
    assert_eq!(format_number(end.x, 3), "10000");
    assert_eq!(format_number(drawing.bounds.width(), 3), "10000");
}

#[test]
fn test_bounds_policy_and_pen_up_moves() {
    // Pen-up move west, then draw east back to the origin.
    let commands = CommandTable::standard(DefaultAction::Noop);
    let mut config = TurtleConfig {
        step: 1.0,
        angle: 90.0,
        start: TurtleState::new(0.0, 0.0, 180.0),
        ..Default::default()
    };

    let visited = interpret("ff|FF".chars(), &commands, config.clone()).unwrap();
    assert_near(visited.bounds.min().unwrap(), DVec2::new(-2.0, 0.0));
    assert_near(visited.bounds.max().unwrap(), DVec2::new(0.0, 0.0));

    config.bounds_policy = BoundsPolicy::Drawn;
    let drawn = interpret("ff|FFf".chars(), &commands, config).unwrap();
    // The trailing pen-up step to x = 1 is ignored.
    assert_near(drawn.bounds.max().unwrap(), DVec2::new(0.0, 0.0));
    assert!((drawn.bounds.width() - 2.0).abs() < EPS);
}

#[test]
fn test_truncated_stream() {
    let commands = setup();
    let rules = RuleTable::new().with_rule('F', "F+F--F+F");
    let interpreter = TurtleInterpreter::new(&commands, unit_config(60.0));

    // 8^30 symbols in full; only the first three are pulled.
    let drawing = interpreter
        .interpret(expand("F", &rules, 30).take(3))
        .unwrap();
    assert_eq!(drawing.polylines.len(), 1);
    assert_eq!(drawing.point_count(), 3);
}

#[test]
fn test_zero_length_step_adds_no_point() {
    let commands = CommandTable::new(DefaultAction::Noop)
        .with('F', Action::DRAW)
        .with(
            'Z',
            Action::Forward {
                draw: true,
                step: 0.0,
            },
        );
    let drawing = interpret("FZF".chars(), &commands, unit_config(90.0)).unwrap();
    assert_eq!(drawing.polylines[0].len(), 3);

    // A lone zero-length stroke is not a polyline.
    let empty = interpret("Z".chars(), &commands, unit_config(90.0)).unwrap();
    assert!(empty.polylines.is_empty());
}

#[test]
fn test_bounds_accumulator() {
    let mut bounds = Bounds::new();
    assert!(bounds.is_empty());
    assert_eq!(bounds.rect(), None);

    for _ in 0..3 {
        bounds.observe(DVec2::new(4.0, -2.0));
    }
    let rect = bounds.rect().unwrap();
    assert_eq!(rect.min, DVec2::new(4.0, -2.0));
    assert_eq!(rect.max, DVec2::new(4.0, -2.0));
    assert_eq!(bounds.width(), 0.0);
    assert_eq!(bounds.height(), 0.0);

    // Collinear points give a zero-height box.
    let line: Bounds = [DVec2::new(0.0, 1.0), DVec2::new(10.0, 1.0), DVec2::new(5.0, 1.0)]
        .into_iter()
        .collect();
    assert_eq!(line.width(), 10.0);
    assert_eq!(line.height(), 0.0);

    bounds.merge(&line);
    assert_eq!(bounds.min(), Some(DVec2::new(0.0, -2.0)));
    assert_eq!(bounds.max(), Some(DVec2::new(10.0, 1.0)));

    let mut unchanged = line;
    unchanged.merge(&Bounds::new());
    assert_eq!(unchanged, line);
}
