/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The frame is composed in three layers: the matrix rain backdrop,
/// the centered terminal panel (scrollback, Snake board, prompt), and
/// a one-row help bar at the bottom.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

use crate::shell::scrollback::LineKind;
use crate::shell::session::Session;
use crate::sim::engine::SnakeEngine;
use crate::ui::rain::{MatrixRain, Shade};

// ── Palette ──

/// Terminal green used for borders, output and the prompt.
const PRIMARY: Color = Color::Rgb { r: 0, g: 255, b: 65 };
const BORDER_FG: Color = Color::Rgb { r: 0, g: 170, b: 60 };
const PANEL_BG: Color = Color::Rgb { r: 8, g: 14, b: 10 };
const ACCENT: Color = Color::Rgb { r: 90, g: 200, b: 255 };
const ERROR_FG: Color = Color::Rgb { r: 255, g: 85, b: 85 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (supports emoji presentation sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based Linux terminals (GNOME Terminal, etc.), the inter-row gap
    /// pixels use the background color from the last Clear or the terminal's
    /// configured default.  By using the SAME explicit RGB for both
    /// `Clear(ClearType::All)` and every cell's background, the gap color
    /// matches the cell color exactly, eliminating visible horizontal lines.
    ///
    /// Matches the rain canvas backdrop of the web original.
    const BASE_BG: Color = Color::Rgb { r: 5, g: 5, b: 15 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 16],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    /// Wide cell for an emoji presentation sequence (base + U+FE0F).
    fn from_pair_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let base_len = c.encode_utf8(&mut cell.ch).len();
        let vs_len = '\u{FE0F}'.encode_utf8(&mut cell.ch[base_len..]).len();
        cell.ch_len = (base_len + vs_len) as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 { return ""; }
        unsafe { std::str::from_utf8_unchecked(&self.ch[..self.ch_len as usize]) }
    }
}

// ── Text measurement helpers ──

/// Iterate chars, attaching an immediately following U+FE0F emoji
/// presentation selector to its base character.
fn clusters(s: &str) -> impl Iterator<Item = (char, bool)> + '_ {
    let mut chars = s.chars().peekable();
    std::iter::from_fn(move || {
        let c = chars.next()?;
        let joined = chars.peek() == Some(&'\u{FE0F}');
        if joined {
            chars.next();
        }
        Some((c, joined))
    })
}

/// A presentation selector forces emoji rendering, which is two
/// columns regardless of the base character's own width class.
fn cluster_width(c: char, joined: bool) -> usize {
    if joined {
        2
    } else {
        c.width().unwrap_or(0)
    }
}

fn text_width(s: &str) -> usize {
    clusters(s).map(|(c, j)| cluster_width(c, j)).sum()
}

/// Hard-wrap one scrollback record into display rows of at most
/// `width` columns. Embedded newlines start fresh rows.
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let width = width.max(2);
    let mut out = Vec::new();
    for piece in s.split('\n') {
        if piece.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut line = String::new();
        let mut used = 0;
        for (c, joined) in clusters(piece) {
            let cw = cluster_width(c, joined);
            if used + cw > width && used > 0 {
                out.push(std::mem::take(&mut line));
                used = 0;
            }
            line.push(c);
            if joined {
                line.push('\u{FE0F}');
            }
            used += cw;
        }
        out.push(line);
    }
    out
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), width-aware: wide characters take two
    /// columns, with a continuation cell behind them. Stops after
    /// `limit` columns.
    fn put_text(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color, limit: usize) {
        let mut cx = x;
        let max_x = x.saturating_add(limit).min(self.width);
        for (c, joined) in clusters(s) {
            let cw = cluster_width(c, joined);
            if cw == 0 {
                continue;
            }
            if cx + cw > max_x {
                break;
            }
            if cw >= 2 {
                let cell = if joined {
                    Cell::from_pair_wide(c, fg, bg)
                } else {
                    Cell::from_char_wide(c, fg, bg)
                };
                self.set(cx, y, cell);
                self.set(cx + 1, y, Cell::WIDE_CONT);
                cx += 2;
            } else {
                self.set(cx, y, Cell::from_char(c, fg, bg));
                cx += 1;
            }
        }
    }
}

// ── Renderer ──

/// Each Snake board cell = 2 terminal columns, so the play field is
/// roughly square on common font metrics.
const CELL_W: usize = 2;

/// Widest the terminal panel will grow on large screens.
const PANEL_MAX_W: usize = 100;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.term_w as u16, self.term_h as u16)
    }

    pub fn render(&mut self, session: &Session, rain: &mut MatrixRain) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        if rain.width() != tw || rain.height() != th {
            rain.resize(tw, th);
        }

        // Build front buffer
        self.front.clear();
        self.compose_rain(rain);
        self.compose_panel(session);
        self.compose_help_bar(session);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: Do NOT use ResetColor here — it resets to the terminal's
        // native default, which may differ from BASE_BG and cause line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide chars)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2; // skip the continuation cell
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_rain(&mut self, rain: &MatrixRain) {
        for y in 0..self.front.height {
            for x in 0..self.front.width {
                if let Some((glyph, shade)) = rain.shade_at(x as u16, y as u16) {
                    let fg = match shade {
                        Shade::Head => Color::Rgb { r: 150, g: 255, b: 170 },
                        Shade::Tail => Color::Rgb { r: 0, g: 230, b: 75 },
                        Shade::Faint => Color::Rgb { r: 0, g: 110, b: 45 },
                    };
                    self.front.set(x, y, Cell::from_char(glyph, fg, Cell::BASE_BG));
                }
            }
        }
    }

    fn compose_help_bar(&mut self, session: &Session) {
        if self.front.height == 0 {
            return;
        }
        let row = self.front.height - 1;
        let help = match session.engine() {
            Some(engine) if engine.is_game_over() => " R restart │ Q quit".to_string(),
            Some(engine) if engine.board().is_idle() => " arrow keys to move │ Q quit".to_string(),
            Some(engine) => format!(" score {} │ Q quit", engine.board().score()),
            None => " Ctrl+C exit │ type \"help\" for commands".to_string(),
        };
        let width = self.front.width;
        self.front.put_text(0, row, &help, Color::DarkGrey, Cell::BASE_BG, width);
    }

    fn compose_panel(&mut self, session: &Session) {
        let tw = self.front.width;
        let th = self.front.height;
        if tw < 12 || th < 6 {
            return;
        }

        let pw = tw.saturating_sub(4).min(PANEL_MAX_W);
        let ph = th.saturating_sub(2);
        let px = (tw - pw) / 2;
        let py = (th - ph) / 2;
        let bottom = py + ph - 1;

        // Window chrome: interior fill, then borders with title.
        for y in py..=bottom {
            for x in px..px + pw {
                self.front.set(x, y, Cell::from_char(' ', PRIMARY, PANEL_BG));
            }
        }
        let h_rule: String = "\u{2550}".repeat(pw.saturating_sub(2));
        self.front.put_text(px, py, &format!("\u{2554}{h_rule}\u{2557}"), BORDER_FG, PANEL_BG, pw);
        self.front.put_text(px, bottom, &format!("\u{255A}{h_rule}\u{255D}"), BORDER_FG, PANEL_BG, pw);
        for y in py + 1..bottom {
            self.front.set(px, y, Cell::from_char('\u{2551}', BORDER_FG, PANEL_BG));
            self.front.set(px + pw - 1, y, Cell::from_char('\u{2551}', BORDER_FG, PANEL_BG));
        }
        self.front.put_text(px + 3, py, " visitor@portfolio:~ ", PRIMARY, PANEL_BG, pw.saturating_sub(6));

        // Interior coordinates: one column of padding inside the border.
        let ix = px + 2;
        let iw = pw.saturating_sub(4);
        let itop = py + 1;
        let ibottom = bottom - 1;
        if iw < 4 || ibottom <= itop {
            return;
        }

        // ── Prompt row (bottom of the panel) ──
        let mut row = ibottom;
        let prompt = format!("$ {}", session.input());
        self.front.put_text(ix, row, &prompt, PRIMARY, PANEL_BG, iw);
        if !session.is_typing() {
            let cursor_x = ix + text_width(&prompt);
            if cursor_x < ix + iw {
                self.front.set(cursor_x, row, Cell::from_char('\u{258C}', PRIMARY, PANEL_BG));
            }
        }
        if row == itop {
            return;
        }
        row -= 1;

        // ── Snake board, centered above the prompt ──
        if let Some(engine) = session.engine() {
            row = self.compose_board(engine, ix, iw, itop, row);
            if row <= itop {
                return;
            }
        }

        // ── Scrollback tail fills the rest, bottom-up ──
        if session.scrollback().is_empty() {
            return;
        }
        let capacity = row - itop + 1;
        let wrap_w = iw.saturating_sub(1);
        let mut tail: Vec<(Color, String)> =
            Vec::with_capacity(capacity.min(session.scrollback().len()));
        'records: for record in session.scrollback().lines().iter().rev() {
            let (color, text) = match record.kind {
                LineKind::Input => (ACCENT, format!("$ {}", record.text)),
                LineKind::Output => (PRIMARY, record.text.clone()),
                LineKind::Error => (ERROR_FG, record.text.clone()),
            };
            for visual in wrap_text(&text, wrap_w).into_iter().rev() {
                tail.push((color, visual));
                if tail.len() >= capacity {
                    break 'records;
                }
            }
        }
        for (color, line) in tail {
            self.front.put_text(ix, row, &line, color, PANEL_BG, iw);
            if row == itop {
                break;
            }
            row -= 1;
        }
    }

    /// Draw the bordered play field with its bottom edge at `bottom`,
    /// clipped against `top_limit`. Returns the row just above the
    /// board block (the gap row the caller keeps blank).
    fn compose_board(&mut self, engine: &SnakeEngine, ix: usize, iw: usize, top_limit: usize, bottom: usize) -> usize {
        let board = engine.board();
        let n = board.tile_count().max(1) as usize;
        let block_w = n * CELL_W + 2;
        let block_h = n + 2;
        let bx = ix + iw.saturating_sub(block_w) / 2;
        // Leave one blank row between the board and the prompt.
        let bottom = bottom.saturating_sub(1);
        let top = bottom.saturating_sub(block_h - 1);

        let field_bg = Color::Rgb { r: 0, g: 0, b: 0 };
        let rule: String = "\u{2550}".repeat(n * CELL_W);
        let clip = |r: usize| r >= top_limit && r <= bottom;

        if clip(top) {
            self.front.put_text(bx, top, &format!("\u{2554}{rule}\u{2557}"), PRIMARY, PANEL_BG, block_w);
        }
        if clip(bottom) {
            self.front.put_text(bx, bottom, &format!("\u{255A}{rule}\u{255D}"), PRIMARY, PANEL_BG, block_w);
        }
        for gy in 0..n {
            let r = top + 1 + gy;
            if !clip(r) {
                continue;
            }
            self.front.set(bx, r, Cell::from_char('\u{2551}', PRIMARY, PANEL_BG));
            for gx in 0..n {
                let col = bx + 1 + gx * CELL_W;
                self.front.set(col, r, Cell::from_char(' ', PRIMARY, field_bg));
                self.front.set(col + 1, r, Cell::from_char(' ', PRIMARY, field_bg));
            }
            self.front.set(bx + 1 + n * CELL_W, r, Cell::from_char('\u{2551}', PRIMARY, PANEL_BG));
        }

        // Solid blocks for the snake and the food, canvas style.
        let mut paint = |x: i32, y: i32, bg: Color| {
            if x < 0 || x as usize >= n || y < 0 || y as usize >= n {
                return;
            }
            let r = top + 1 + y as usize;
            if clip(r) {
                let col = bx + 1 + x as usize * CELL_W;
                self.front.set(col, r, Cell::from_char(' ', PRIMARY, bg));
                self.front.set(col + 1, r, Cell::from_char(' ', PRIMARY, bg));
            }
        };
        let food = board.food();
        paint(food.x, food.y, Color::Rgb { r: 255, g: 0, b: 0 });
        for cell in board.cells().skip(1) {
            paint(cell.x, cell.y, Color::Rgb { r: 0, g: 170, b: 0 });
        }
        let head = board.head();
        paint(head.x, head.y, Color::Rgb { r: 0, g: 255, b: 0 });

        // Crash overlay, centered on the field.
        if engine.is_game_over() {
            let mid = top + block_h / 2;
            for (dy, text) in [(0usize, "GAME OVER"), (2, "Press R to Restart or Q to Quit")] {
                let r = mid - 1 + dy;
                if !clip(r) {
                    continue;
                }
                let tx = bx + (block_w.saturating_sub(text_width(text))) / 2;
                self.front.put_text(tx, r, text, Color::White, field_bg, block_w);
            }
        }

        top.saturating_sub(1)
    }
}
