/// Snake engine lifecycle: owns the board, the tick timer and the
/// keyboard claim. Starts and stops come in mandatory pairs: launch
/// arms the ticker and attaches the keys; game over disarms only the
/// ticker; quit releases both.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::domain::grid::Dir;
use crate::domain::snake::{SnakeBoard, StepOutcome};

use super::event::GameEvent;

// ── Ticker ──

/// Due-checker the frame loop polls every frame.
#[derive(Clone, Debug)]
struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    fn new(period: Duration, now: Instant) -> Self {
        Ticker { period, next_due: now + period }
    }

    /// At most one step per poll; the frame loop spins much faster
    /// than the tick period.
    fn due(&mut self, now: Instant) -> bool {
        if now >= self.next_due {
            self.next_due = now + self.period;
            true
        } else {
            false
        }
    }
}

// ── Engine ──

pub struct SnakeEngine {
    board: SnakeBoard,
    /// Some while the game loop runs; None once crashed or quit.
    ticker: Option<Ticker>,
    /// The engine claims arrows and q/Q while this is set.
    keys_attached: bool,
    tick_rate: Duration,
    rng: StdRng,
}

impl SnakeEngine {
    pub fn launch(
        tile_count: i32,
        tick_rate: Duration,
        mut rng: StdRng,
        now: Instant,
    ) -> (Self, Vec<GameEvent>) {
        let board = SnakeBoard::new(tile_count, &mut rng);
        let engine = SnakeEngine {
            board,
            ticker: Some(Ticker::new(tick_rate, now)),
            keys_attached: true,
            tick_rate,
            rng,
        };
        (engine, vec![GameEvent::Started])
    }

    /// Advance one tick if one is due. Returns that tick's events.
    pub fn poll(&mut self, now: Instant) -> Vec<GameEvent> {
        let due = match &mut self.ticker {
            Some(t) => t.due(now),
            None => false,
        };
        if !due {
            return Vec::new();
        }
        match self.board.step(&mut self.rng) {
            StepOutcome::Idle | StepOutcome::Moved => Vec::new(),
            StepOutcome::Ate { score } => vec![GameEvent::Scored { score }],
            StepOutcome::Crashed { score } => {
                // Game over halts the ticker. The key claim stays on
                // so restart and quit still reach the engine.
                self.ticker = None;
                vec![GameEvent::Crashed { score }]
            }
        }
    }

    pub fn steer(&mut self, dir: Dir) {
        self.board.steer(dir);
    }

    /// Only valid from game over. Resets the board and re-arms the
    /// ticker.
    pub fn restart(&mut self, now: Instant) -> Vec<GameEvent> {
        if !self.board.is_game_over() {
            return Vec::new();
        }
        self.board.reset(&mut self.rng);
        self.ticker = Some(Ticker::new(self.tick_rate, now));
        vec![GameEvent::Started]
    }

    /// Stop the ticker and release the key claim. The caller drops the
    /// engine after consuming the event.
    pub fn quit(&mut self) -> Vec<GameEvent> {
        self.ticker = None;
        self.keys_attached = false;
        vec![GameEvent::Terminated]
    }

    pub fn board(&self) -> &SnakeBoard {
        &self.board
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn ticker_armed(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn keys_attached(&self) -> bool {
        self.keys_attached
    }
}
