/// Pure snake board rules: movement, collision, food placement.
/// No timers and no I/O here; the engine layer drives `step` from its
/// ticker and the renderer reads the board read-only.

use std::collections::VecDeque;

use rand::Rng;

use super::grid::{Cell, Dir};

/// What a single tick did to the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// No heading yet, or the game is already over. Nothing moved.
    Idle,
    /// Normal move, no growth.
    Moved,
    /// Head landed on food: grew by one, food relocated.
    Ate { score: u32 },
    /// Hit a wall or the body. Terminal until reset.
    Crashed { score: u32 },
}

#[derive(Clone, Debug)]
pub struct SnakeBoard {
    tile_count: i32,
    /// Head at the front. Cells are unique while the game is alive.
    body: VecDeque<Cell>,
    food: Cell,
    /// None until the first arrow key: the pre-game idle state.
    heading: Option<Dir>,
    score: u32,
    game_over: bool,
}

impl SnakeBoard {
    /// Fresh board: one-cell snake at the center, food somewhere else.
    pub fn new(tile_count: i32, rng: &mut impl Rng) -> Self {
        // Grids below 2x2 cannot hold the snake and its food.
        let tile_count = tile_count.max(2);
        let center = Cell::new(tile_count / 2, tile_count / 2);
        let mut body = VecDeque::with_capacity(16);
        body.push_front(center);
        let food = sample_free_cell(tile_count, &body, rng)
            .unwrap_or(Cell::new(0, 0));
        SnakeBoard {
            tile_count,
            body,
            food,
            heading: None,
            score: 0,
            game_over: false,
        }
    }

    /// Back to the initial condition. Keeps the grid size.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        *self = SnakeBoard::new(self.tile_count, rng);
    }

    // ── Tick ──

    /// Advance one tick. Idle and game-over boards are left untouched.
    pub fn step(&mut self, rng: &mut impl Rng) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Idle;
        }
        let heading = match self.heading {
            Some(d) => d,
            None => return StepOutcome::Idle,
        };

        // The tail counts: it only vacates after the move validates,
        // so steering onto it this tick is still a collision.
        let candidate = self.head().step(heading);
        if !candidate.in_bounds(self.tile_count) || self.body.contains(&candidate) {
            self.game_over = true;
            return StepOutcome::Crashed { score: self.score };
        }

        self.body.push_front(candidate);
        if candidate == self.food {
            self.score += 1;
            match sample_free_cell(self.tile_count, &self.body, rng) {
                Some(cell) => self.food = cell,
                // Board is full: nowhere left to grow.
                None => {
                    self.game_over = true;
                    return StepOutcome::Crashed { score: self.score };
                }
            }
            StepOutcome::Ate { score: self.score }
        } else {
            self.body.pop_back();
            StepOutcome::Moved
        }
    }

    // ── Steering ──

    /// Request a new heading. Reversing onto the neck is ignored,
    /// as is any steering once the game is over.
    pub fn steer(&mut self, dir: Dir) {
        if self.game_over {
            return;
        }
        if let Some(current) = self.heading {
            if dir == current.opposite() {
                return;
            }
        }
        self.heading = Some(dir);
    }

    // ── Queries ──

    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    pub fn head(&self) -> Cell {
        // Body length is always >= 1.
        *self.body.front().unwrap_or(&Cell::new(0, 0))
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn segment_count(&self) -> usize {
        self.body.len()
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True before the first arrow key has set a heading.
    pub fn is_idle(&self) -> bool {
        self.heading.is_none() && !self.game_over
    }
}

/// Uniform sample over cells not occupied by the body, by rejection.
/// Returns None when the body covers the whole grid.
fn sample_free_cell(
    tile_count: i32,
    body: &VecDeque<Cell>,
    rng: &mut impl Rng,
) -> Option<Cell> {
    let total = (tile_count as usize) * (tile_count as usize);
    if body.len() >= total {
        return None;
    }
    loop {
        let cell = Cell::new(rng.gen_range(0..tile_count), rng.gen_range(0..tile_count));
        if !body.contains(&cell) {
            return Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Holds at every tick boundary: unique body cells, food off the body.
    fn assert_board_invariants(board: &SnakeBoard) {
        let cells: Vec<Cell> = board.cells().collect();
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert_ne!(a, b, "body self-overlap at {a:?}");
            }
        }
        if !board.is_game_over() {
            assert!(!cells.contains(&board.food()), "food on the body");
        }
    }

    #[test]
    fn new_board_is_centered_and_idle() {
        let mut r = rng();
        let board = SnakeBoard::new(20, &mut r);
        assert_eq!(board.head(), Cell::new(10, 10));
        assert_eq!(board.segment_count(), 1);
        assert_eq!(board.score(), 0);
        assert!(board.is_idle());
        assert!(!board.is_game_over());
        assert!(board.food().in_bounds(20));
        assert_board_invariants(&board);
    }

    #[test]
    fn degenerate_grids_are_floored() {
        let mut r = rng();
        for bad in [-3, 0, 1] {
            let board = SnakeBoard::new(bad, &mut r);
            assert_eq!(board.tile_count(), 2);
            assert!(board.food().in_bounds(2));
            assert_board_invariants(&board);
        }
    }

    #[test]
    fn idle_tick_moves_nothing() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        assert_eq!(board.step(&mut r), StepOutcome::Idle);
        assert_eq!(board.head(), Cell::new(10, 10));
        assert_eq!(board.segment_count(), 1);
    }

    #[test]
    fn moves_right_without_growth() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.food = Cell::new(0, 0);
        board.steer(Dir::Right);
        assert_eq!(board.step(&mut r), StepOutcome::Moved);
        assert_eq!(board.head(), Cell::new(11, 10));
        assert_eq!(board.segment_count(), 1);
        assert_eq!(board.score(), 0);
        assert_board_invariants(&board);
    }

    #[test]
    fn eats_food_and_grows() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.food = Cell::new(11, 10);
        board.steer(Dir::Right);
        assert_eq!(board.step(&mut r), StepOutcome::Ate { score: 1 });
        let cells: Vec<Cell> = board.cells().collect();
        assert_eq!(cells, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(board.score(), 1);
        assert_ne!(board.food(), Cell::new(11, 10));
        assert_ne!(board.food(), Cell::new(10, 10));
        assert_board_invariants(&board);
    }

    #[test]
    fn length_is_one_plus_score_while_alive() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.steer(Dir::Right);
        for _ in 0..5 {
            // Plant the food directly ahead so every tick eats.
            board.food = board.head().step(Dir::Right);
            let score = board.score();
            assert_eq!(board.step(&mut r), StepOutcome::Ate { score: score + 1 });
            assert_eq!(board.segment_count() as u32, 1 + board.score());
            assert_board_invariants(&board);
        }
        assert_eq!(board.score(), 5);
    }

    #[test]
    fn crashes_on_every_wall() {
        let cases = [
            (Cell::new(0, 5), Dir::Left),
            (Cell::new(19, 5), Dir::Right),
            (Cell::new(5, 0), Dir::Up),
            (Cell::new(5, 19), Dir::Down),
        ];
        for (start, dir) in cases {
            let mut r = rng();
            let mut board = SnakeBoard::new(20, &mut r);
            board.body = VecDeque::from(vec![start]);
            board.steer(dir);
            assert_eq!(board.step(&mut r), StepOutcome::Crashed { score: 0 });
            assert!(board.is_game_over());
            // Crash leaves the body where it was.
            assert_eq!(board.head(), start);
        }
    }

    #[test]
    fn tail_cell_still_counts_as_collision() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        // Tight square, head first, tail at (5,6) right below the head.
        board.body = VecDeque::from(vec![
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
        ]);
        board.food = Cell::new(0, 0);
        board.heading = Some(Dir::Left);
        board.steer(Dir::Down);
        assert_eq!(board.step(&mut r), StepOutcome::Crashed { score: 0 });
        assert!(board.is_game_over());
        assert_eq!(board.segment_count(), 4);
    }

    #[test]
    fn reversal_is_ignored() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.food = Cell::new(0, 0);
        board.steer(Dir::Right);
        board.steer(Dir::Left);
        board.step(&mut r);
        assert_eq!(board.head(), Cell::new(11, 10));

        board.steer(Dir::Up);
        board.steer(Dir::Down);
        board.step(&mut r);
        assert_eq!(board.head(), Cell::new(11, 9));
    }

    #[test]
    fn any_first_heading_is_accepted() {
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            let mut r = rng();
            let mut board = SnakeBoard::new(20, &mut r);
            board.steer(dir);
            assert!(!board.is_idle());
        }
    }

    #[test]
    fn game_over_freezes_the_board() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.body = VecDeque::from(vec![Cell::new(0, 5)]);
        board.steer(Dir::Left);
        assert!(matches!(board.step(&mut r), StepOutcome::Crashed { .. }));

        board.steer(Dir::Right);
        assert_eq!(board.step(&mut r), StepOutcome::Idle);
        assert_eq!(board.head(), Cell::new(0, 5));
        assert_eq!(board.segment_count(), 1);
    }

    #[test]
    fn reset_restores_initial_condition() {
        let mut r = rng();
        let mut board = SnakeBoard::new(20, &mut r);
        board.body = VecDeque::from(vec![Cell::new(0, 5)]);
        board.steer(Dir::Left);
        board.step(&mut r);
        assert!(board.is_game_over());

        board.reset(&mut r);
        assert_eq!(board.head(), Cell::new(10, 10));
        assert_eq!(board.segment_count(), 1);
        assert_eq!(board.score(), 0);
        assert!(board.is_idle());
        assert_board_invariants(&board);
    }

    #[test]
    fn food_lands_on_the_only_free_cell() {
        let mut r = rng();
        // 3x3 grid with every cell but (2,2) occupied.
        let body: VecDeque<Cell> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Cell::new(x, y)))
            .filter(|c| *c != Cell::new(2, 2))
            .collect();
        let found = sample_free_cell(3, &body, &mut r);
        assert_eq!(found, Some(Cell::new(2, 2)));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut r = rng();
        let mut board = SnakeBoard::new(2, &mut r);
        board.body = VecDeque::from(vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
        ]);
        board.food = Cell::new(1, 0);
        board.heading = Some(Dir::Right);
        board.score = 2;
        // Eating the last free cell leaves nowhere to put food.
        assert_eq!(board.step(&mut r), StepOutcome::Crashed { score: 3 });
        assert!(board.is_game_over());
        assert_eq!(board.segment_count(), 4);
    }
}
