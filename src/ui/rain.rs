/// Matrix rain backdrop.
///
/// One drop per column. A head row walks down the grid writing random
/// glyphs; cells remember how many frames ago they were written and
/// fade out by age, which stands in for the canvas alpha-fade of the
/// usual browser version. Heads start staggered far above the screen
/// and restart from the top with a small chance once they run past the
/// bottom edge.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Halfwidth katakana keep every glyph one column wide.
const GLYPH_SET: &str =
    "\u{FF71}\u{FF72}\u{FF73}\u{FF74}\u{FF75}\u{FF76}\u{FF77}\u{FF78}\u{FF79}\u{FF7A}\
     \u{FF7B}\u{FF7C}\u{FF7D}\u{FF7E}\u{FF7F}\u{FF80}\u{FF81}\u{FF82}\u{FF83}\u{FF84}\
     \u{FF85}\u{FF86}\u{FF87}\u{FF88}\u{FF89}\u{FF8A}\u{FF8B}\u{FF8C}\u{FF8D}\u{FF8E}\
     \u{FF8F}\u{FF90}\u{FF91}\u{FF92}\u{FF93}\u{FF94}\u{FF95}\u{FF96}\u{FF97}\u{FF98}\
     \u{FF99}\u{FF9A}\u{FF9B}\u{FF9C}\u{FF66}\u{FF9D}\
     0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ<>/\\[]{}!@#$%^&*()";

/// Chance per frame that a drop past the bottom restarts at the top.
const RESET_CHANCE: f64 = 0.025;

/// Cells older than this are no longer drawn.
const TRAIL_FADE: u16 = 15;

/// How bright a rain cell should be painted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shade {
    Head,
    Tail,
    Faint,
}

pub struct MatrixRain {
    width: u16,
    height: u16,
    heads: Vec<i32>,
    glyphs: Vec<char>,
    ages: Vec<u16>,
    pool: Vec<char>,
    rng: StdRng,
}

impl MatrixRain {
    pub fn new(width: u16, height: u16, seed: u64) -> MatrixRain {
        let mut rain = MatrixRain {
            width: 0,
            height: 0,
            heads: Vec::new(),
            glyphs: Vec::new(),
            ages: Vec::new(),
            pool: GLYPH_SET.chars().collect(),
            rng: StdRng::seed_from_u64(seed),
        };
        rain.resize(width, height);
        rain
    }

    /// Rebuild the grid for a new terminal size. Drops restart from
    /// their staggered off-screen rows.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let cells = width as usize * height as usize;
        self.glyphs = vec![' '; cells];
        self.ages = vec![u16::MAX; cells];
        self.heads = (0..width)
            .map(|_| self.rng.gen_range(-100..=0))
            .collect();
    }

    /// Advance one frame: age every cell, move every head one row.
    pub fn advance(&mut self) {
        for age in &mut self.ages {
            *age = age.saturating_add(1);
        }
        let height = self.height as i32;
        for col in 0..self.width as usize {
            let y = self.heads[col];
            if (0..height).contains(&y) {
                let glyph = self.pool[self.rng.gen_range(0..self.pool.len())];
                let idx = y as usize * self.width as usize + col;
                self.glyphs[idx] = glyph;
                self.ages[idx] = 0;
            }
            if y >= height && self.rng.gen_bool(RESET_CHANCE) {
                self.heads[col] = 0;
            } else {
                self.heads[col] = y + 1;
            }
        }
    }

    /// Glyph and brightness for a cell, or `None` when nothing should
    /// be drawn there.
    pub fn shade_at(&self, x: u16, y: u16) -> Option<(char, Shade)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let age = self.ages[idx];
        if age > TRAIL_FADE {
            return None;
        }
        let shade = match age {
            0 => Shade::Head,
            1..=5 => Shade::Tail,
            _ => Shade::Faint,
        };
        Some((self.glyphs[idx], shade))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}
