//! The G-code dialect understood by the writing robot.
//!
//! Every motion command is sent as one unit of two lines: a spindle command
//! which raises (`S0`) or lowers (`S1000`) the pen, followed by a rapid
//! (`G0`) or drawing (`G1`) move with coordinates to two decimal places.

use std::fmt;

use robot_writer_core::{MotionCommand, PenState};

/// Commands sent once after wake-up: home at a feed rate of 1000, enable the
/// spindle, and lift the pen.
pub const PREAMBLE: [&str; 3] = ["G1 X0 Y0 F1000", "M3", "S0"];

/// Wire representation of a single [`MotionCommand`].
#[derive(Debug, Clone, Copy)]
pub struct Gcode<'a>(pub &'a MotionCommand);

impl fmt::Display for Gcode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (spindle, mode) = match self.0.pen {
            PenState::Down => ("S1000", "G1"),
            PenState::Up => ("S0", "G0"),
        };
        writeln!(f, "{spindle}")?;
        writeln!(f, "{mode} X{:.2} Y{:.2}", self.0.to.x, self.0.to.y)
    }
}

/// Render `command` as the text sent to the robot.
pub fn format(command: &MotionCommand) -> String {
    Gcode(command).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_writer_core::Position;

    #[test]
    fn pen_down_draws() {
        let command = MotionCommand::draw(Position::new(2.5, -5.0));
        assert_eq!(format(&command), "S1000\nG1 X2.50 Y-5.00\n");
    }

    #[test]
    fn pen_up_travels() {
        let command = MotionCommand::travel(Position::new(12.346, -10.0));
        assert_eq!(format(&command), "S0\nG0 X12.35 Y-10.00\n");
    }

    #[test]
    fn home_matches_reset_unit() {
        assert_eq!(format(&MotionCommand::home()), "S0\nG0 X0.00 Y0.00\n");
    }
}
