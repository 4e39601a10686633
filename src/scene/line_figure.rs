use glam::Vec3;

use crate::maths::Color;

/// Unordered index pair into `LineFigure::points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

#[derive(Debug, Clone)]
pub struct LineFigure {
    pub points: Vec<Vec3>,
    pub edges: Vec<Edge>,
    pub color: Color,
}

impl LineFigure {
    pub fn new(color: Color) -> Self {
        Self {
            points: Vec::new(),
            edges: Vec::new(),
            color,
        }
    }

    pub fn add_edge(&mut self, a: Vec3, b: Vec3) {
        let ai = self.points.len() as u32;
        self.points.push(a);
        self.points.push(b);
        self.edges.push(Edge::new(ai, ai + 1));
    }
}
