/// Interactive session state: the line editor, command dispatch, the
/// typing scheduler for staged output, and the Snake engine lifecycle.
/// Everything is driven by explicit `Instant`s from the frame loop, so
/// the whole session can be tested without sleeping.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AppConfig;
use crate::content::PortfolioData;
use crate::domain::grid::Dir;
use crate::shell::commands::{self, Reply};
use crate::shell::scrollback::{Line, LineKind, Scrollback};
use crate::shell::simulation;
use crate::sim::engine::SnakeEngine;
use crate::sim::event::GameEvent;

/// Keys the session cares about, already stripped of backend detail.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    Left,
    Right,
}

/// Pending staged output. While one of these is live the line editor is
/// frozen and submissions are dropped without an echo.
struct Typing {
    queue: VecDeque<(Duration, Line)>,
    next_due: Instant,
}

impl Typing {
    fn new(lines: Vec<(Duration, Line)>, now: Instant) -> Option<Typing> {
        let queue: VecDeque<_> = lines.into();
        let first = queue.front()?.0;
        Some(Typing { queue, next_due: now + first })
    }
}

pub struct Session {
    data: PortfolioData,
    scrollback: Scrollback,
    input: String,
    engine: Option<SnakeEngine>,
    typing: Option<Typing>,
    typing_delay: Duration,
    tick_rate: Duration,
    tile_count: i32,
    cv_source: PathBuf,
    cv_target: PathBuf,
    submissions_file: PathBuf,
    ip_lookup: bool,
    seed: u64,
}

impl Session {
    pub fn new(data: PortfolioData, config: &AppConfig) -> Session {
        let mut session = Session {
            data,
            scrollback: Scrollback::new(),
            input: String::new(),
            engine: None,
            typing: None,
            typing_delay: Duration::from_millis(config.terminal.typing_delay_ms),
            tick_rate: Duration::from_millis(config.snake.tick_rate_ms),
            tile_count: config.snake.tile_count,
            cv_source: config.general.cv_source.clone(),
            cv_target: config.general.cv_target.clone(),
            submissions_file: config.general.submissions_file.clone(),
            ip_lookup: config.contact.ip_lookup,
            seed: rand::random(),
        };
        session
            .scrollback
            .push(LineKind::Output, "Welcome to the portfolio terminal.");
        session
            .scrollback
            .push(LineKind::Output, "Type \"help\" for available commands.");
        session
    }

    // ── Input routing ──

    /// Route one key press. A live game claims the arrow keys and its
    /// control keys before the line editor sees anything.
    pub fn handle_key(&mut self, key: Key, now_wall: DateTime<Local>, now: Instant) {
        if let Some(events) = self.game_key(key, now) {
            self.apply_events(events);
            return;
        }
        if self.typing.is_some() {
            return;
        }
        match key {
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Enter => {
                let raw = std::mem::take(&mut self.input);
                self.dispatch(&raw, now_wall, now);
            }
            Key::Up | Key::Down | Key::Left | Key::Right => {}
        }
    }

    /// `Some` when the game consumed the key. Steering claims the key
    /// even when ignored as a reverse; `r` is only a game key while the
    /// crash screen is up, so it stays typeable during play.
    fn game_key(&mut self, key: Key, now: Instant) -> Option<Vec<GameEvent>> {
        let engine = self.engine.as_mut().filter(|e| e.keys_attached())?;
        match key {
            Key::Up => {
                engine.steer(Dir::Up);
                Some(Vec::new())
            }
            Key::Down => {
                engine.steer(Dir::Down);
                Some(Vec::new())
            }
            Key::Left => {
                engine.steer(Dir::Left);
                Some(Vec::new())
            }
            Key::Right => {
                engine.steer(Dir::Right);
                Some(Vec::new())
            }
            Key::Char('q' | 'Q') => Some(engine.quit()),
            Key::Char('r' | 'R') if engine.is_game_over() => Some(engine.restart(now)),
            _ => None,
        }
    }

    // ── Dispatch ──

    /// Run one submitted line through the command table.
    pub fn dispatch(&mut self, raw: &str, now_wall: DateTime<Local>, now: Instant) {
        let input = raw.trim();
        if input.is_empty() || self.typing.is_some() {
            return;
        }
        self.scrollback.push(LineKind::Input, input);

        let key = input.to_lowercase();
        if key == "rm -rf /" {
            self.scrollback
                .push(LineKind::Error, "[!] ERROR: Permission denied.");
            self.scrollback.push(
                LineKind::Error,
                "[!] Critical system files protected by V-Sentinel.",
            );
            self.scrollback.push(
                LineKind::Output,
                "[*] Nice try! But you can't delete me that easily. \u{1F609}",
            );
            return;
        }

        let Some(cmd) = commands::lookup(&key) else {
            self.scrollback.push(
                LineKind::Error,
                format!("Command not found: {input}. Type \"help\" for available commands."),
            );
            return;
        };
        tracing::info!("command: {}", key);

        match commands::reply(cmd, &self.data, now_wall) {
            Reply::Text(text) => self.scrollback.push(LineKind::Output, text),
            Reply::Typed(blocks) => self.start_typing(blocks, now),
            Reply::Clear => self.clear(),
            Reply::LaunchGame => self.launch_game(now),
            Reply::ExportCv => self.export_cv(),
            Reply::RunSimulation => self.run_simulation(now_wall, now),
        }
    }

    // ── Command side effects ──

    fn start_typing(&mut self, blocks: Vec<String>, now: Instant) {
        let lines = blocks
            .into_iter()
            .map(|text| (self.typing_delay, Line { kind: LineKind::Output, text }))
            .collect();
        self.typing = Typing::new(lines, now);
    }

    /// Teardown first: a cleared screen must not leave a ticking game.
    fn clear(&mut self) {
        self.engine = None;
        self.scrollback.clear();
    }

    fn launch_game(&mut self, now: Instant) {
        let quit_events = self.engine.as_mut().map(SnakeEngine::quit);
        if let Some(events) = quit_events {
            self.apply_events(events);
        }
        let rng = StdRng::seed_from_u64(self.next_seed());
        let (engine, events) = SnakeEngine::launch(self.tile_count, self.tick_rate, rng, now);
        self.engine = Some(engine);
        self.apply_events(events);
        self.scrollback.push(
            LineKind::Output,
            "[LAUNCHING ARCADE PROTOCOL]... Initializing Snake engine. \
             Use ARROW KEYS to move. Press Q to quit.",
        );
    }

    /// Best effort, like a browser download: failures are logged, never
    /// printed to the terminal.
    fn export_cv(&mut self) {
        match std::fs::copy(&self.cv_source, &self.cv_target) {
            Ok(_) => tracing::info!("cv exported to {}", self.cv_target.display()),
            Err(e) => tracing::warn!("cv export failed: {}", e),
        }
    }

    fn run_simulation(&mut self, now_wall: DateTime<Local>, now: Instant) {
        let ip = simulation::lookup_ip(self.ip_lookup);
        if let Err(e) =
            simulation::log_submission(&self.submissions_file, &ip, now_wall.with_timezone(&Utc))
        {
            tracing::warn!("submission log failed: {}", e);
        }
        self.typing = Typing::new(simulation::sequence(&ip), now);
    }

    // ── Polling ──

    /// Advance time-driven state: game ticks first, then staged output.
    /// A crashed game keeps its board on screen but has nothing to tick.
    pub fn poll(&mut self, now: Instant) {
        let game_events = self
            .engine
            .as_mut()
            .filter(|engine| engine.ticker_armed())
            .map(|engine| engine.poll(now));
        if let Some(events) = game_events {
            self.apply_events(events);
        }
        self.reveal_typed(now);
    }

    fn reveal_typed(&mut self, now: Instant) {
        let mut revealed: Vec<Line> = Vec::new();
        let mut finished = false;
        if let Some(typing) = self.typing.as_mut() {
            while now >= typing.next_due {
                match typing.queue.pop_front() {
                    Some((_, line)) => revealed.push(line),
                    None => break,
                }
                match typing.queue.front() {
                    Some((delay, _)) => typing.next_due += *delay,
                    None => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        for line in revealed {
            self.scrollback.push(line.kind, line.text);
        }
        if finished {
            self.typing = None;
        }
    }

    fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Started => self
                    .scrollback
                    .push(LineKind::Output, "Snake game started! Score: 0"),
                GameEvent::Scored { score } => self
                    .scrollback
                    .push(LineKind::Output, format!("Score: {score}")),
                GameEvent::Crashed { score } => {
                    let length = self.engine.as_ref().map_or(0, |e| e.board().segment_count());
                    tracing::info!("snake crashed, length {}, final score {}", length, score);
                    self.scrollback.push(
                        LineKind::Error,
                        format!(
                            "Game Over! Final Score: {score}. \
                             Press 'R' to restart or 'Q' to quit."
                        ),
                    );
                }
                GameEvent::Terminated => {
                    self.scrollback
                        .push(LineKind::Output, "Snake game terminated. Thanks for playing!");
                    self.engine = None;
                }
            }
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = self.seed;
        self.seed = self.seed.wrapping_add(1);
        seed
    }

    // ── Render surface ──

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn engine(&self) -> Option<&SnakeEngine> {
        self.engine.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }
}
