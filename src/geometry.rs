use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point { Point { x, y } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size { Size { width, height } }

    /// Extent of this size along the given axis.
    pub fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect { Rect { x, y, width, height } }

    pub fn size(self) -> Size { Size::new(self.width, self.height) }

    pub fn max_x(self) -> f64 { self.x + self.width }

    pub fn max_y(self) -> f64 { self.y + self.height }

    pub fn mid_x(self) -> f64 { self.x + self.width / 2.0 }

    pub fn mid_y(self) -> f64 { self.y + self.height / 2.0 }

    pub fn center(self) -> Point { Point::new(self.mid_x(), self.mid_y()) }

    /// Half-open on the far edges so a point on a shared boundary belongs to
    /// exactly one of two adjacent rects.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.max_x() && point.y >= self.y && point.y < self.max_y()
    }

    pub fn inset(self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// Slices this rect along `orientation` into one piece per weight,
    /// proportional to the weights. Non-positive totals fall back to even
    /// slices.
    pub fn split_weighted(self, orientation: Orientation, weights: &[f64]) -> Vec<Rect> {
        let count = weights.len();
        if count == 0 {
            return Vec::new();
        }
        let total: f64 = weights.iter().sum();
        let even = 1.0 / count as f64;
        let mut out = Vec::with_capacity(count);
        let mut offset = 0.0;
        for &weight in weights {
            let fraction = if total > 0.0 { weight / total } else { even };
            out.push(match orientation {
                Orientation::Horizontal => Rect::new(
                    self.x + offset * self.width,
                    self.y,
                    fraction * self.width,
                    self.height,
                ),
                Orientation::Vertical => Rect::new(
                    self.x,
                    self.y + offset * self.height,
                    self.width,
                    fraction * self.height,
                ),
            });
            offset += fraction;
        }
        out
    }

    pub fn split_evenly(self, orientation: Orientation, count: usize) -> Vec<Rect> {
        self.split_weighted(orientation, &vec![1.0; count])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// A quarter turn clockwise in screen coordinates (y grows downward).
    pub fn rotated_cw(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

/// How a tile arranges its children. Live tiles and abstract tiles share this
/// vocabulary; `Floating` is the unsplit state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    Floating,
    Horizontal,
    Vertical,
}

impl LayoutDirection {
    pub fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => LayoutDirection::Horizontal,
            Orientation::Vertical => LayoutDirection::Vertical,
        }
    }

    pub fn orientation(self) -> Option<Orientation> {
        match self {
            LayoutDirection::Floating => None,
            LayoutDirection::Horizontal => Some(Orientation::Horizontal),
            LayoutDirection::Vertical => Some(Orientation::Vertical),
        }
    }
}
