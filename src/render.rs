//! Terminal rendering of generations.

use std::fmt;
use std::io;
use std::io::Write;
use std::str::FromStr;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style;
use crossterm::style::Color;
use crossterm::terminal;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::grid::Grid;
use crate::simulation::Render;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Colors alive cells are painted with under [`Palette::Random`]
const COLORS: [Color; 14] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::DarkRed,
    Color::DarkGreen,
    Color::DarkYellow,
    Color::DarkBlue,
    Color::DarkMagenta,
    Color::DarkCyan,
    Color::Grey,
];

/// Packs cells into braille characters, 2 columns by 4 rows per character.
pub struct Braille {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,
}

impl Default for Braille {
    fn default() -> Self {
        Self::new()
    }
}

impl Braille {
    /// An empty buffer, sized on the first [`Braille::paint`]
    pub fn new() -> Self {
        Self {
            cb: Vec::new(),
            fb: String::new(),
            cp: Vec::new(),
            w: 0,
            h: 0,
        }
    }

    /// Buffers for a `w` by `h` grid. Only ever called with the dimensions of an existing
    /// `Grid`, so `w * h` fits in memory.
    fn sized(w: usize, h: usize) -> Self {
        // Each braille character is 3 bytes, and newlines one byte. With `bw = ceil(w / 2)`
        // characters per line and `bh = ceil(h / 4)` lines, the frame takes at most
        // `3 * (bw * bh) + bh` bytes.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Copy the alive cells of `grid` into the cell buffer, resizing it to fit
    pub fn paint(&mut self, grid: &Grid) {
        let (w, h) = grid.dimensions();
        if (w, h) != (self.w, self.h) {
            *self = Self::sized(w, h);
        }

        for (px, row) in self.cb.chunks_exact_mut(w).zip(grid.rows()) {
            for (px, cell) in px.iter_mut().zip(row) {
                *px = cell.is_alive();
            }
        }
    }

    /// Build the frame out of the cell buffer. Every line, including the last, ends with `\n`.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = self.xy_to(n);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// One character per cell, cells separated by a space
    Glyphs { alive: char, dead: char },

    /// Eight cells per character
    Braille,
}

impl Default for Style {
    fn default() -> Self {
        Style::Glyphs {
            alive: '@',
            dead: ' ',
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown style \"{0}\", expected glyphs or braille")]
pub struct StyleError(String);

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glyphs" => Ok(Style::default()),
            "braille" => Ok(Style::Braille),
            _ => Err(StyleError(s.to_string())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Glyphs { .. } => f.write_str("glyphs"),
            Style::Braille => f.write_str("braille"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Terminal default foreground
    Mono,

    /// Every alive cell gets a random color, drawn again on each frame. Braille frames are
    /// always drawn in the default foreground.
    #[default]
    Random,
}

/// Paints generations onto a terminal: clear, draw the frame, then a status line.
pub struct Renderer<W: Write> {
    out: W,
    style: Style,
    palette: Palette,
    braille: Braille,
    rng: ThreadRng,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, style: Style, palette: Palette) -> Self {
        Self {
            out,
            style,
            palette,
            braille: Braille::new(),
            rng: rand::rng(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The frame for `grid` as plain text, one line per terminal row
    pub fn frame(&mut self, grid: &Grid) -> String {
        match self.style {
            Style::Glyphs { alive, dead } => {
                let mut s = String::with_capacity(grid.width() * grid.height() * 2);

                for row in grid.rows() {
                    for (i, cell) in row.iter().enumerate() {
                        if i > 0 {
                            s.push(' ');
                        }
                        s.push(if cell.is_alive() { alive } else { dead });
                    }
                    s.push('\n');
                }

                s
            }
            Style::Braille => {
                self.braille.paint(grid);
                self.braille.render().to_string()
            }
        }
    }

    pub fn draw(&mut self, generation: u64, grid: &Grid) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        match (self.style, self.palette) {
            (Style::Glyphs { alive, dead }, Palette::Random) => {
                for row in grid.rows() {
                    for (i, cell) in row.iter().enumerate() {
                        if i > 0 {
                            queue!(self.out, style::Print(' '))?;
                        }

                        if cell.is_alive() {
                            let color = COLORS
                                .choose(&mut self.rng)
                                .copied()
                                .unwrap_or(Color::Reset);

                            queue!(
                                self.out,
                                style::SetForegroundColor(color),
                                style::Print(alive)
                            )?;
                        } else {
                            queue!(self.out, style::Print(dead))?;
                        }
                    }

                    queue!(self.out, style::ResetColor, cursor::MoveToNextLine(1))?;
                }
            }
            _ => {
                let frame = self.frame(grid);

                for line in frame.lines() {
                    queue!(self.out, style::Print(line), cursor::MoveToNextLine(1))?;
                }
            }
        }

        queue!(
            self.out,
            style::Print(format!(
                "generation {generation}  population {}",
                grid.population()
            )),
            cursor::MoveToNextLine(1),
        )?;

        self.out.flush()
    }
}

impl<W: Write> Render for Renderer<W> {
    type Error = io::Error;

    fn render(&mut self, generation: u64, grid: &Grid) -> Result<(), Self::Error> {
        self.draw(generation, grid)
    }
}
