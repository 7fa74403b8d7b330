//! SVG previews of a motion command sequence.
//!
//! Useful to check a layout before committing paper and ink to it. Page Y
//! grows downwards in SVG and upwards on the robot, so Y is negated.

use std::{io, path::Path};

use robot_writer_core::{MotionCommand, Position};
use svg::{
    Document,
    node::element::{Path as SvgPath, Rectangle, path::Data},
};

/// Blank border around the drawing, in millimetres.
const MARGIN: f32 = 5.0;

/// Draw the pen-down segments of `commands`, starting from the origin with
/// the pen up.
pub fn render_svg<'a>(commands: impl IntoIterator<Item = &'a MotionCommand>) -> Document {
    let mut min_x = 0.0f32;
    let mut min_y = 0.0f32;
    let mut max_x = 0.0f32;
    let mut max_y = 0.0f32;

    let mut data = Data::new();
    let mut current = Position::ORIGIN;
    let mut drawing = false;

    for command in commands {
        let (x, y) = (command.to.x, -command.to.y);
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        if command.pen.is_down() {
            if !drawing {
                data = data.move_to((current.x, -current.y));
                drawing = true;
            }
            data = data.line_to((x, y));
        } else {
            drawing = false;
        }
        current = command.to;
    }

    let left = min_x - MARGIN;
    let top = min_y - MARGIN;
    let width = max_x - min_x + 2.0 * MARGIN;
    let height = max_y - min_y + 2.0 * MARGIN;

    let background = Rectangle::new()
        .set("x", left)
        .set("y", top)
        .set("width", width)
        .set("height", height)
        .set("fill", "white");

    let path = SvgPath::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", 0.3)
        .set("stroke-linecap", "round")
        .set("d", data);

    Document::new()
        .add(background)
        .add(path)
        .set("viewBox", (left, top, width, height))
        .set("width", format!("{width}mm"))
        .set("height", format!("{height}mm"))
}

/// Write a preview of `commands` to `path`.
pub fn save<'a>(
    path: impl AsRef<Path>,
    commands: impl IntoIterator<Item = &'a MotionCommand>,
) -> io::Result<()> {
    svg::save(path, &render_svg(commands))
}
