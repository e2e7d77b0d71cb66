//! Sign classes for directional scoring

/// Direction of a change
///
/// Zero is its own class: a `Flat` prediction agrees only with a `Flat`
/// actual, never with `Up` or `Down`. Both `0.0` and `-0.0` are `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Strictly negative change
    Down,
    /// Exactly zero
    Flat,
    /// Strictly positive change
    Up,
}

impl Direction {
    /// Classify a value. NaN has no direction and returns `None`.
    pub fn of(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Direction::Up)
        } else if value < 0.0 {
            Some(Direction::Down)
        } else if value == 0.0 {
            Some(Direction::Flat)
        } else {
            None
        }
    }

    /// Whether two values fall in the same class
    pub fn agree(a: f64, b: f64) -> bool {
        match (Direction::of(a), Direction::of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}
