//! Grid coordinates, directions and distance metrics.
//!
//! All types in this module are plain values with no world state attached.
//! The y axis grows downwards (row index), so `North` is `(0, -1)`.

use std::fmt;

use strum::{EnumIter, IntoEnumIterator};

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Returns the position `distance` steps away in `direction`.
    pub fn offset(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// `|dx| + |dy|`
    #[inline]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// `max(|dx|, |dy|)`; the number of king moves between two tiles.
    #[inline]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn euclidean(self, other: Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// True for the eight surrounding tiles (not for `self`).
    #[inline]
    pub fn is_adjacent(self, other: Self) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    /// True when both tiles share a row or a column.
    ///
    /// Shields only block attacks coming from such a line.
    #[inline]
    pub fn is_in_line(self, other: Self) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// The four orthogonal neighbours, in `Direction::CARDINALS` order.
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        Direction::CARDINALS.map(|d| self.step(d))
    }

    /// All eight neighbours, in `Direction` declaration order.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::iter().map(move |d| self.step(d))
    }

    /// Direction of the single-tile step from `self` towards `target`.
    ///
    /// Each axis is reduced to its sign, so a far-away target yields the
    /// closest of the eight compass directions. Returns `None` for `self`.
    pub fn direction_to(self, target: Self) -> Option<Direction> {
        Direction::from_delta((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// Direction to `target` only if it lies on one of the eight rays.
    pub fn straight_direction_to(self, target: Self) -> Option<Direction> {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx == 0 || dy == 0 || dx.abs() == dy.abs() {
            self.direction_to(target)
        } else {
            None
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight-way compass direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        Direction::iter().find(|d| d.delta() == (dx, dy))
    }

    pub const fn is_cardinal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// The next direction clockwise (45 degrees).
    pub const fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::NorthEast,
            Direction::NorthEast => Direction::East,
            Direction::East => Direction::SouthEast,
            Direction::SouthEast => Direction::South,
            Direction::South => Direction::SouthWest,
            Direction::SouthWest => Direction::West,
            Direction::West => Direction::NorthWest,
            Direction::NorthWest => Direction::North,
        }
    }

    /// The next direction counter-clockwise (45 degrees).
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Direction::North => Direction::NorthWest,
            Direction::NorthEast => Direction::North,
            Direction::East => Direction::NorthEast,
            Direction::SouthEast => Direction::East,
            Direction::South => Direction::SouthEast,
            Direction::SouthWest => Direction::South,
            Direction::West => Direction::SouthWest,
            Direction::NorthWest => Direction::West,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// Tiles on the straight segment between `from` and `to` (Bresenham),
/// excluding `from` and including `to`.
pub fn line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = (to.x - from.x).signum();
    let sy = (to.y - from.y).signum();
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);
    let mut tiles = Vec::with_capacity(dx.max(-dy) as usize);

    while (x, y) != (to.x, to.y) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        tiles.push(Position::new(x, y));
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Position::new(1, 1);
        let b = Position::new(4, 5);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.chebyshev(b), 4);
        assert!((a.euclidean(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn direction_to_reduces_to_sign() {
        let a = Position::new(0, 0);
        assert_eq!(a.direction_to(Position::new(5, 0)), Some(Direction::East));
        assert_eq!(a.direction_to(Position::new(-3, -1)), Some(Direction::NorthWest));
        assert_eq!(a.direction_to(a), None);
        assert_eq!(a.straight_direction_to(Position::new(3, 1)), None);
        assert_eq!(
            a.straight_direction_to(Position::new(-2, 2)),
            Some(Direction::SouthWest)
        );
    }

    #[test]
    fn in_line_excludes_diagonals() {
        let d = Position::new(5, 5);
        assert!(d.is_in_line(Position::new(5, 4)));
        assert!(d.is_in_line(Position::new(9, 5)));
        assert!(!d.is_in_line(Position::new(6, 4)));
    }

    #[test]
    fn line_ends_at_target() {
        let tiles = line(Position::new(0, 0), Position::new(4, 2));
        assert_eq!(tiles.last(), Some(&Position::new(4, 2)));
        assert_eq!(tiles.len(), 4);
        for pair in tiles.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn opposite_is_involution() {
        for d in Direction::iter() {
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.delta();
            assert_eq!(d.opposite().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn rotations_are_inverse() {
        for d in Direction::iter() {
            assert_eq!(d.clockwise().counter_clockwise(), d);
            assert!(Position::ORIGIN.step(d).is_adjacent(Position::ORIGIN.step(d.clockwise())));
        }
    }
}
