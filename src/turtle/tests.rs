// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

use super::{CommandAlphabet, Interpreter, Turtle, TurtleCommand, TurtleState, interpret};
use crate::ArboraError;
use vector_traits::glam::{DVec3, DVec4};

const EPSILON: f64 = 1e-9;

#[test]
fn test_default_heading_is_up() -> Result<(), ArboraError> {
    let result = interpret("FF".chars(), TurtleState::default(), 2.0, 25.0)?;
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].location, DVec3::ZERO);
    assert!(result[1].location.abs_diff_eq(DVec3::new(0.0, 2.0, 0.0), EPSILON));
    assert!(result[1].end().abs_diff_eq(DVec3::new(0.0, 4.0, 0.0), EPSILON));
    assert_eq!(result[1].length, 2.0);
    Ok(())
}

#[test]
fn test_stack_balance() -> Result<(), ArboraError> {
    let mut turtle = Turtle::new(TurtleState::default(), 1.0, 30.0);
    turtle.apply(TurtleCommand::Draw)?;
    let before_push = turtle.state();
    turtle.apply(TurtleCommand::Push)?;
    turtle.apply(TurtleCommand::PositiveX)?;
    turtle.apply(TurtleCommand::Draw)?;
    assert_ne!(turtle.state(), before_push);
    turtle.apply(TurtleCommand::Pop)?;
    assert_eq!(turtle.state(), before_push);
    turtle.apply(TurtleCommand::Draw)?;
    assert_eq!(turtle.stack_depth(), 0);
    assert_eq!(turtle.placements().len(), 3);

    // the same through the default alphabet
    let placements = interpret("F[F]F".chars(), TurtleState::default(), 1.0, 30.0)?;
    assert_eq!(placements.len(), 3);
    // the draw after ']' starts where '[' was
    assert_eq!(placements[1].location, placements[2].location);
    Ok(())
}

#[test]
fn test_pop_is_by_value() -> Result<(), ArboraError> {
    let mut turtle = Turtle::new(TurtleState::default(), 1.0, 45.0);
    turtle.apply(TurtleCommand::Push)?;
    turtle.apply(TurtleCommand::PositiveZ)?;
    turtle.apply(TurtleCommand::Move)?;
    turtle.apply(TurtleCommand::Push)?;
    turtle.apply(TurtleCommand::Move)?;
    let inner = turtle.state();
    turtle.apply(TurtleCommand::Pop)?;
    assert_ne!(turtle.state(), inner);
    turtle.apply(TurtleCommand::Pop)?;
    assert_eq!(turtle.state(), TurtleState::default());
    assert!(turtle.placements().is_empty());
    Ok(())
}

#[test]
fn test_unbalanced_pop() {
    assert_eq!(
        interpret("]".chars(), TurtleState::default(), 1.0, 25.0),
        Err(ArboraError::UnbalancedStack(0))
    );
    assert_eq!(
        interpret("F[F]]F".chars(), TurtleState::default(), 1.0, 25.0),
        Err(ArboraError::UnbalancedStack(4))
    );

    let mut turtle = Turtle::new(TurtleState::default(), 1.0, 25.0);
    assert!(turtle.apply(TurtleCommand::Pop).is_err());
    assert!(turtle.placements().is_empty());
}

#[test]
fn test_rotation_round_trip() -> Result<(), ArboraError> {
    let start = TurtleState::new(DVec3::new(1.0, 2.0, 3.0), DVec3::new(10.0, -20.0, 33.3));
    let mut turtle = Turtle::new(start, 1.0, 22.5);
    for (positive, negative) in [
        (TurtleCommand::PositiveX, TurtleCommand::NegativeX),
        (TurtleCommand::PositiveY, TurtleCommand::NegativeY),
        (TurtleCommand::PositiveZ, TurtleCommand::NegativeZ),
    ] {
        turtle.apply(positive)?;
        assert_ne!(turtle.state().orientation, start.orientation);
        turtle.apply(negative)?;
        assert!(
            turtle
                .state()
                .orientation
                .abs_diff_eq(start.orientation, EPSILON)
        );
    }
    Ok(())
}

#[test]
fn test_rotations_move_the_heading() -> Result<(), ArboraError> {
    // 90 degrees about X tips +Y over to +Z
    let result = interpret("+FF".chars(), TurtleState::default(), 1.0, 90.0)?;
    assert!(result[0].direction().abs_diff_eq(DVec3::Z, EPSILON));
    assert!(result[1].location.abs_diff_eq(DVec3::Z, EPSILON));

    // 90 degrees about Z tips +Y over to -X
    let result = interpret("\\F".chars(), TurtleState::default(), 1.0, 90.0)?;
    assert!(result[0].end().abs_diff_eq(DVec3::NEG_X, EPSILON));

    // a rotation about Y leaves +Y alone
    let result = interpret("&F".chars(), TurtleState::default(), 1.0, 90.0)?;
    assert!(result[0].end().abs_diff_eq(DVec3::Y, EPSILON));
    assert_eq!(result[0].orientation, DVec3::new(0.0, 90.0, 0.0));
    Ok(())
}

#[test]
fn test_turn_around_and_move() -> Result<(), ArboraError> {
    let mut turtle = Turtle::new(TurtleState::default(), 1.5, 10.0);
    turtle.apply(TurtleCommand::TurnAround)?;
    assert_eq!(turtle.state().orientation, DVec3::splat(180.0));

    let result = interpret("fFf".chars(), TurtleState::default(), 1.5, 10.0)?;
    assert_eq!(result.len(), 1);
    assert!(result[0].location.abs_diff_eq(DVec3::new(0.0, 1.5, 0.0), EPSILON));
    Ok(())
}

#[test]
fn test_unknown_symbols_are_ignored() -> Result<(), ArboraError> {
    let result = interpret("XAFZ?Q".chars(), TurtleState::default(), 1.0, 25.0)?;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].location, DVec3::ZERO);
    Ok(())
}

#[test]
fn test_custom_alphabet() -> Result<(), ArboraError> {
    let mut alphabet = CommandAlphabet::empty();
    let _ = alphabet
        .add_token('0', TurtleCommand::Draw)?
        .add_token('1', TurtleCommand::Draw)?
        .add_token('L', TurtleCommand::PositiveX)?
        .add_token('(', TurtleCommand::Push)?
        .add_token(')', TurtleCommand::Pop)?;
    assert!(matches!(
        alphabet.add_token('0', TurtleCommand::Move),
        Err(ArboraError::InvalidParameter(_))
    ));
    assert_eq!(alphabet.len(), 5);

    let interpreter = Interpreter::new(1.0, 45.0).with_alphabet(alphabet);
    // 'F' and '[' mean nothing in this alphabet
    let result = interpreter.interpret("1(L0)0F[".chars(), TurtleState::default())?;
    assert_eq!(result.len(), 3);
    assert_eq!(result[1].orientation, DVec3::new(45.0, 0.0, 0.0));
    assert_eq!(result[2].location, result[1].location);
    Ok(())
}

#[test]
fn test_placement_transform() -> Result<(), ArboraError> {
    let start = TurtleState::new(DVec3::new(1.0, 0.0, -2.0), DVec3::new(30.0, 0.0, 60.0));
    let result = interpret("F".chars(), start, 3.0, 25.0)?;
    let placement = result[0];
    let matrix = placement.transform();
    // the origin of the segment frame is the placement location
    assert!(
        matrix
            .transform_point3(DVec3::ZERO)
            .abs_diff_eq(placement.location, EPSILON)
    );
    // and the segment tip, at +Y * length, is the branch end
    assert!(
        matrix
            .transform_point3(DVec3::Y * placement.length)
            .abs_diff_eq(placement.end(), EPSILON)
    );
    assert!(
        (matrix * DVec4::new(0.0, 1.0, 0.0, 0.0))
            .truncate()
            .abs_diff_eq(placement.direction(), EPSILON)
    );
    Ok(())
}

#[test]
fn test_non_finite_parameters() {
    assert!(matches!(
        interpret("F".chars(), TurtleState::default(), f64::NAN, 25.0),
        Err(ArboraError::FloatNotFinite(_))
    ));
    let start = TurtleState::new(DVec3::new(f64::INFINITY, 0.0, 0.0), DVec3::ZERO);
    assert!(matches!(
        interpret("F".chars(), start, 1.0, 25.0),
        Err(ArboraError::FloatNotFinite(_))
    ));
}
