use std::path::PathBuf;
use std::time::Duration;

use crate::grid::Grid;
use crate::neighborhood::Neighborhood;
use crate::render::Palette;
use crate::render::Style;
use crate::rule_set::RuleSet;
use crate::seed;
use crate::seed::Preset;
use crate::seed::SeedError;
use crate::simulation::Simulation;

/// Where the first generation comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A random board of `Config::width` by `Config::height` cells
    Random { threshold: f64, seed: Option<u64> },

    /// A text pattern file
    Pattern(PathBuf),

    /// The first `.txt` pattern file in a directory
    FirstPattern(PathBuf),

    Preset(Preset),
}

impl Default for Source {
    fn default() -> Self {
        Source::Random {
            threshold: 0.5,
            seed: None,
        }
    }
}

/// Everything needed to set up a run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub source: Source,
    pub neighborhood: Neighborhood,
    pub rule: RuleSet,
    pub delay: Duration,

    /// Stop after this many generations. `None` runs until cancelled.
    pub generations: Option<u64>,

    pub style: Style,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
            source: Source::default(),
            neighborhood: Neighborhood::default(),
            rule: RuleSet::default(),
            delay: Duration::from_millis(1),
            generations: None,
            style: Style::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Build the first generation. Pattern files and presets carry their own dimensions, so
    /// `width` and `height` only apply to random boards.
    pub fn seed(&self) -> Result<Grid, SeedError> {
        match &self.source {
            Source::Random { threshold, seed } => {
                seed::random_seeded(self.width, self.height, *threshold, *seed)
            }
            Source::Pattern(path) => seed::load_pattern(path),
            Source::FirstPattern(dir) => seed::load_pattern(seed::find_pattern(dir)?),
            Source::Preset(preset) => Ok(preset.grid()?),
        }
    }

    pub fn simulation(&self) -> Simulation<Neighborhood> {
        let sim = Simulation::new(self.neighborhood)
            .with_rule(self.rule)
            .with_delay(self.delay);

        match self.generations {
            Some(n) => sim.with_limit(n),
            None => sim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::simulation::Discard;
    use crate::simulation::StopReason;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!((config.width, config.height), (150, 150));
        assert_eq!(config.neighborhood, Neighborhood::Moore);
        assert_eq!(config.source, Source::default());
    }

    #[test]
    fn seeds() {
        let config = Config {
            width: 12,
            height: 7,
            source: Source::Random {
                threshold: 0.3,
                seed: Some(1),
            },
            ..Config::default()
        };
        assert_eq!(config.seed().unwrap().dimensions(), (12, 7));

        let config = Config {
            source: Source::Preset(Preset::GliderGun),
            ..Config::default()
        };
        assert_eq!(config.seed().unwrap().dimensions(), (36, 34));

        let config = Config {
            source: Source::Pattern(PathBuf::from("no/such/file.txt")),
            ..Config::default()
        };
        assert!(matches!(config.seed(), Err(SeedError::Io { .. })));

        let config = Config {
            source: Source::FirstPattern(PathBuf::from("tests/patterns")),
            ..Config::default()
        };
        assert_eq!(
            config.seed().unwrap().to_string(),
            "00000\n00100\n00100\n00100\n00000\n"
        );
    }

    #[test]
    fn simulation_limit() {
        let config = Config {
            source: Source::Preset(Preset::Block),
            delay: Duration::ZERO,
            generations: Some(3),
            ..Config::default()
        };

        let outcome = config
            .simulation()
            .run(config.seed().unwrap(), &mut Discard, &CancelToken::new())
            .unwrap();

        assert_eq!(outcome.reason, StopReason::LimitReached);
        assert_eq!(outcome.generations, 3);
        assert_eq!(outcome.last, Preset::Block.grid().unwrap());
    }
}
