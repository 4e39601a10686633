pub mod parser;

use glam::{Mat2, Vec2};

use crate::maths::Color;
use crate::scene::line_figure::LineFigure;
pub use parser::LSystem2D;

#[derive(Debug, Clone, Copy)]
struct Cursor {
    pos: Vec2,
    heading: Vec2,
}

/// Depth-bounded recursive turtle expansion of spec.md §4.8. Returns a
/// `LineFigure` holding every drawn unit step.
pub fn draw(system: &LSystem2D, color: Color) -> LineFigure {
    let rot = Mat2::from_angle(system.angle.to_radians());
    let mut figure = LineFigure::new(color);
    let mut cursor = Cursor {
        pos: Vec2::ZERO,
        heading: Vec2::from_angle(system.starting_angle.to_radians()),
    };
    let mut stack = Vec::new();

    draw_recursive(system, &system.initiator, system.iterations, rot, &mut cursor, &mut stack, &mut figure);
    figure
}

fn draw_recursive(system: &LSystem2D, axiom: &str, depth: u32, rot: Mat2, cursor: &mut Cursor, stack: &mut Vec<Cursor>, figure: &mut LineFigure) {
    for c in axiom.chars() {
        match c {
            '+' => cursor.heading = rot * cursor.heading,
            '-' => cursor.heading = rot.transpose() * cursor.heading,
            '(' => stack.push(*cursor),
            ')' => {
                if let Some(saved) = stack.pop() {
                    *cursor = saved;
                }
            }
            symbol => {
                if depth > 0 {
                    if let Some(replacement) = system.rule(symbol) {
                        draw_recursive(system, replacement, depth - 1, rot, cursor, stack, figure);
                    }
                } else {
                    let from = cursor.pos;
                    let to = from + cursor.heading;
                    if system.is_drawable(symbol) {
                        figure.add_edge(to_vec3(from), to_vec3(to));
                    }
                    cursor.pos = to;
                }
            }
        }
    }
}

fn to_vec3(p: Vec2) -> glam::Vec3 {
    glam::Vec3::new(p.x, p.y, 0.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn koch_curve_at_iteration_3_has_64_segments() {
        let system = LSystem2D {
            initiator: "F".into(),
            rules: vec![('F', "F+F--F+F".into())],
            drawable: vec!['F'],
            angle: 60.,
            starting_angle: 0.,
            iterations: 3,
        };
        let figure = draw(&system, Color::new(1., 1., 1.));
        assert_eq!(figure.edges.len(), 64);
    }
}
