/// Grid primitives for the snake board.
/// Coordinates are signed so a candidate head can sit one step outside
/// the board while the bounds check decides its fate.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The neighboring cell one step in the given direction.
    pub fn step(self, dir: Dir) -> Cell {
        let (dx, dy) = dir.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    /// Inside the square `[0, n) x [0, n)`?
    pub fn in_bounds(self, n: i32) -> bool {
        self.x >= 0 && self.x < n && self.y >= 0 && self.y < n
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Unit vector, screen convention: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_follows_screen_axes() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Dir::Up), Cell::new(5, 4));
        assert_eq!(c.step(Dir::Down), Cell::new(5, 6));
        assert_eq!(c.step(Dir::Left), Cell::new(4, 5));
        assert_eq!(c.step(Dir::Right), Cell::new(6, 5));
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(Cell::new(0, 0).in_bounds(20));
        assert!(Cell::new(19, 19).in_bounds(20));
        assert!(!Cell::new(-1, 5).in_bounds(20));
        assert!(!Cell::new(20, 5).in_bounds(20));
        assert!(!Cell::new(5, -1).in_bounds(20));
        assert!(!Cell::new(5, 20).in_bounds(20));
    }

    #[test]
    fn opposites_pair_up() {
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }
}
