use cane_graphhopper::route_response::TurnInstruction;

use crate::device_instruction::{Action, DeviceInstruction, TurnDirection};

/// Average stride of the cane user.
pub const STEP_LENGTH_METERS: f64 = 0.75;

/// Converts a distance in meters into a whole number of steps, rounding half away from zero.
pub fn steps_for_distance(distance: f64) -> u32 {
    (distance.max(0.0) / STEP_LENGTH_METERS).round() as u32
}

/// Only the exact left and right signs carry a direction. Slight, sharp, u-turn, roundabout and
/// arrival signs still produce [`Action::Turn`] but leave the direction unspecified.
pub fn translate(instruction: &TurnInstruction) -> DeviceInstruction {
    let action = if instruction.sign == TurnInstruction::CONTINUE_ON_STREET {
        Action::Forward
    } else {
        Action::Turn
    };

    let turn = match instruction.sign {
        TurnInstruction::TURN_LEFT => Some(TurnDirection::Left),
        TurnInstruction::TURN_RIGHT => Some(TurnDirection::Right),
        _ => None,
    };

    DeviceInstruction {
        action,
        steps: steps_for_distance(instruction.distance),
        turn,
        text: instruction.text.clone(),
        distance: instruction.distance,
        time: instruction.time,
    }
}
