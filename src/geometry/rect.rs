use glam::Vec2;

/// Axis-aligned 2D bounds, min inclusive.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl std::ops::BitOr for Rect {
    type Output = Rect;

    fn bitor(self, other: Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl std::ops::BitOrAssign for Rect {
    fn bitor_assign(&mut self, other: Rect) {
        *self = *self | other;
    }
}
