//! Initial generations: random boards, built-in patterns and pattern files.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::grid::GridError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read pattern file {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("No .txt pattern file in {dir:?}")]
    NoPattern { dir: PathBuf },

    #[error("Threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Unknown preset \"{0}\", expected one of glider-gun, glider, blinker, block, pulsar")]
    UnknownPreset(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parse a pattern. Every line is a row, and only `'0'` (dead) and `'1'` (alive) count. Any
/// other character is skipped.
pub fn parse_pattern(text: &str) -> Result<Grid, GridError> {
    let mut skipped = 0;

    let rows: Vec<Vec<Cell>> = text
        .lines()
        .map(|line| {
            line.chars()
                .filter_map(|c| {
                    let cell = Cell::from_digit(c);
                    if cell.is_none() && !c.is_whitespace() {
                        skipped += 1;
                    }
                    cell
                })
                .collect()
        })
        .collect();

    if skipped > 0 {
        warn!("Skipped {skipped} characters that are neither '0' nor '1'");
    }

    Grid::from_rows(rows)
}

/// Read and parse a pattern file, see [`parse_pattern`].
pub fn load_pattern(path: impl AsRef<Path>) -> Result<Grid, SeedError> {
    let path = path.as_ref();

    let text = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_pattern(&text)?;

    let (width, height) = grid.dimensions();
    info!(
        ?path,
        population = grid.population(),
        "Loaded {width}x{height} pattern"
    );

    Ok(grid)
}

/// The first `.txt` file in `dir`, by file name.
pub fn find_pattern(dir: impl AsRef<Path>) -> Result<PathBuf, SeedError> {
    let dir = dir.as_ref();
    let io_err = |source| SeedError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = None;
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        if is_txt && path.is_file() && found.as_ref().is_none_or(|f| path < *f) {
            found = Some(path);
        }
    }

    let path = found.ok_or_else(|| SeedError::NoPattern {
        dir: dir.to_path_buf(),
    })?;
    info!(?path, "Found pattern file");

    Ok(path)
}

/// A random board. Each cell is alive when a uniform draw from `[0, 1)` is at least
/// `threshold`, so `1 - threshold` is the expected density.
pub fn random<R>(
    width: usize,
    height: usize,
    threshold: f64,
    rng: &mut R,
) -> Result<Grid, SeedError>
where
    R: Rng,
{
    if !(0.0..=1.0).contains(&threshold) {
        return Err(SeedError::InvalidThreshold(threshold));
    }

    let mut grid = Grid::new(width, height)?;
    for row in 0..height {
        for col in 0..width {
            let draw: f64 = rng.random();
            grid.put(row, col, Cell::from(draw >= threshold));
        }
    }

    info!(
        population = grid.population(),
        threshold,
        "Generated {width}x{height} random board"
    );

    Ok(grid)
}

/// Like [`random`], seeded for reproducible boards. Without a seed, the thread-local generator
/// is used.
pub fn random_seeded(
    width: usize,
    height: usize,
    threshold: f64,
    seed: Option<u64>,
) -> Result<Grid, SeedError> {
    match seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            random(width, height, threshold, &mut rng)
        }
        None => random(width, height, threshold, &mut rand::rng()),
    }
}

/// Gosper's glider gun, on the 36x34 board it is traditionally shown on
const GLIDER_GUN: &str = "\
000000000000000000000000100000000000
000000000000000000000010100000000000
000000000000110000001100000000000011
000000000001000100001100000000000011
110000000010000010001100000000000000
110000000010001011000010100000000000
000000000010000010000000100000000000
000000000001000100000000000000000000
000000000000110000000000000000000000";

const GLIDER: &str = "\
010
001
111";

const BLINKER: &str = "111";

const BLOCK: &str = "\
11
11";

const PULSAR: &str = "\
0011100011100
0000000000000
1000010100001
1000010100001
1000010100001
0011100011100
0000000000000
0011100011100
1000010100001
1000010100001
1000010100001
0000000000000
0011100011100";

/// Built-in patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    GliderGun,
    Glider,
    Blinker,
    Block,
    Pulsar,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::GliderGun,
        Preset::Glider,
        Preset::Blinker,
        Preset::Block,
        Preset::Pulsar,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Preset::GliderGun => "glider-gun",
            Preset::Glider => "glider",
            Preset::Blinker => "blinker",
            Preset::Block => "block",
            Preset::Pulsar => "pulsar",
        }
    }

    /// Pattern text, board `(width, height)` and `(row, col)` of the pattern's top left corner
    const fn layout(self) -> (&'static str, (usize, usize), (usize, usize)) {
        match self {
            Preset::GliderGun => (GLIDER_GUN, (36, 34), (0, 0)),
            Preset::Glider => (GLIDER, (20, 20), (1, 1)),
            Preset::Blinker => (BLINKER, (5, 5), (2, 1)),
            Preset::Block => (BLOCK, (4, 4), (1, 1)),
            Preset::Pulsar => (PULSAR, (17, 17), (2, 2)),
        }
    }

    pub fn grid(self) -> Result<Grid, GridError> {
        let (text, (width, height), (dr, dc)) = self.layout();

        let pattern = parse_pattern(text)?;
        let mut board = Grid::new(width, height)?;

        for (row, col) in pattern.alive() {
            board.set(row + dr, col + dc, Cell::Alive)?;
        }

        Ok(board)
    }
}

impl FromStr for Preset {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");

        Preset::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| SeedError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_pattern() {
        let grid = parse_pattern("010\n101\n010\n").unwrap();

        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(
            grid.alive().collect::<Vec<_>>(),
            vec![(0, 1), (1, 0), (1, 2), (2, 1)]
        );
    }

    #[test]
    fn ignores_other_characters() {
        let grid = parse_pattern("0 1 0\r\n1,0,1\r\nx0y1z0\r\n").unwrap();

        assert_eq!(grid.to_string(), "010\n101\n010\n");
    }

    #[test]
    fn jagged_pattern() {
        assert_eq!(
            parse_pattern("010\n10\n010\n"),
            Err(GridError::MalformedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        );

        // a blank line is a row with no cells
        assert!(matches!(
            parse_pattern("010\n\n010\n"),
            Err(GridError::MalformedGrid { row: 1, .. })
        ));
    }

    #[test]
    fn empty_pattern() {
        assert!(matches!(
            parse_pattern(""),
            Err(GridError::InvalidDimension { .. })
        ));
        assert!(matches!(
            parse_pattern("abc\n"),
            Err(GridError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = load_pattern("definitely/not/a/pattern.txt").unwrap_err();

        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[test]
    fn first_pattern_by_name() {
        let path = find_pattern("tests/patterns").unwrap();
        assert_eq!(path, Path::new("tests/patterns/blinker.txt"));

        assert!(matches!(
            find_pattern("src"),
            Err(SeedError::NoPattern { .. })
        ));
        assert!(matches!(
            find_pattern("definitely/not/a/dir"),
            Err(SeedError::Io { .. })
        ));
    }

    #[test]
    fn threshold_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let all = random(8, 3, 0.0, &mut rng).unwrap();
        assert_eq!(all.population(), 24);

        let none = random(8, 3, 1.0, &mut rng).unwrap();
        assert_eq!(none.population(), 0);
    }

    #[test]
    fn threshold_out_of_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for threshold in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                random(4, 4, threshold, &mut rng),
                Err(SeedError::InvalidThreshold(_))
            ));
        }

        assert!(matches!(
            random(0, 4, 0.5, &mut rng),
            Err(SeedError::Grid(GridError::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn seeded_is_reproducible() {
        let a = random_seeded(30, 20, 0.5, Some(42)).unwrap();
        let b = random_seeded(30, 20, 0.5, Some(42)).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (30, 20));

        // roughly half alive
        let population = a.population();
        assert!((150..450).contains(&population), "{population}");
    }

    #[test]
    fn presets() {
        for preset in Preset::ALL {
            let grid = preset.grid().unwrap();
            assert!(grid.population() > 0, "{preset}");
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }

        let gun = Preset::GliderGun.grid().unwrap();
        assert_eq!(gun.dimensions(), (36, 34));
        assert_eq!(gun.population(), 36);

        let blinker = Preset::Blinker.grid().unwrap();
        assert_eq!(blinker.alive().collect::<Vec<_>>(), vec![(2, 1), (2, 2), (2, 3)]);

        assert_eq!(Preset::Pulsar.grid().unwrap().population(), 48);
        assert!(matches!(
            "spaceship".parse::<Preset>(),
            Err(SeedError::UnknownPreset(_))
        ));
    }
}
