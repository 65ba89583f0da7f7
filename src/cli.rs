use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::RangedU64ValueParser;

use gridlife::config::Config;
use gridlife::config::Source;
use gridlife::neighborhood::Neighborhood;
use gridlife::render::Palette;
use gridlife::render::Style;
use gridlife::rule_set::RuleSet;
use gridlife::seed::Preset;

/// Conway's Game of Life on a bounded grid, in the terminal.
///
/// Press q, Esc or Ctrl-C to quit.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Width of a random board
    #[arg(long, default_value_t = 150, value_parser = dimension())]
    pub width: usize,

    /// Height of a random board
    #[arg(long, default_value_t = 150, value_parser = dimension())]
    pub height: usize,

    /// A cell starts alive when a uniform draw from [0, 1) is at least this
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Seed for reproducible random boards
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text pattern file, made of '0' and '1', one line per row. Without a value, the first
    /// .txt file of the working directory is used.
    #[arg(long, conflicts_with = "preset")]
    pub pattern: Option<Option<PathBuf>>,

    /// Built-in pattern: glider-gun, glider, blinker, block or pulsar
    #[arg(long)]
    pub preset: Option<Preset>,

    /// moore, von-neumann, torus-moore or torus-von-neumann
    #[arg(long, short, default_value_t = Neighborhood::Moore)]
    pub neighborhood: Neighborhood,

    /// Birth/survival rule
    #[arg(long, default_value_t = RuleSet::default())]
    pub rule: RuleSet,

    /// Pause between generations, in milliseconds
    #[arg(long, default_value_t = 1)]
    pub delay_ms: u64,

    /// Stop after this many generations
    #[arg(long, short)]
    pub generations: Option<u64>,

    /// glyphs or braille
    #[arg(long, default_value_t = Style::default())]
    pub style: Style,

    /// Don't color alive cells
    #[arg(long)]
    pub mono: bool,

    /// Write logs to this file instead of stderr. Filter with RUST_LOG.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Board sides, at least one cell
fn dimension() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let source = match (&args.pattern, args.preset) {
            (Some(Some(path)), _) => Source::Pattern(path.clone()),
            (Some(None), _) => Source::FirstPattern(PathBuf::from(".")),
            (None, Some(preset)) => Source::Preset(preset),
            (None, None) => Source::Random {
                threshold: args.threshold,
                seed: args.seed,
            },
        };

        Config {
            width: args.width,
            height: args.height,
            source,
            neighborhood: args.neighborhood,
            rule: args.rule,
            delay: Duration::from_millis(args.delay_ms),
            generations: args.generations,
            style: args.style,
            palette: if args.mono {
                Palette::Mono
            } else {
                Palette::Random
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::Parser;
    use gridlife::GridError;
    use gridlife::seed::SeedError;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_config() {
        let args = Args::try_parse_from(["gridlife"]).unwrap();
        let config = Config::from(&args);

        assert_eq!(config, Config::default());
    }

    #[test]
    fn pattern_and_options() {
        let args = Args::try_parse_from([
            "gridlife",
            "--pattern",
            "glider.txt",
            "-n",
            "von-neumann",
            "--rule",
            "B36/S23",
            "--style",
            "braille",
            "--mono",
            "-g",
            "10",
        ])
        .unwrap();
        let config = Config::from(&args);

        assert_eq!(config.source, Source::Pattern(PathBuf::from("glider.txt")));
        assert_eq!(config.neighborhood, Neighborhood::VonNeumann);
        assert_eq!(config.rule.to_string(), "B36/S23");
        assert_eq!(config.style, Style::Braille);
        assert_eq!(config.palette, Palette::Mono);
        assert_eq!(config.generations, Some(10));
    }

    #[test]
    fn pattern_without_path() {
        let args = Args::try_parse_from(["gridlife", "--pattern", "-g", "3"]).unwrap();
        let config = Config::from(&args);

        assert_eq!(config.source, Source::FirstPattern(PathBuf::from(".")));
        assert_eq!(config.generations, Some(3));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_board_is_an_error() {
        let args =
            Args::try_parse_from(["gridlife", "--width", "4294967296", "--height", "4294967296"])
                .unwrap();

        assert!(matches!(
            Config::from(&args).seed(),
            Err(SeedError::Grid(GridError::TooLarge { .. }))
        ));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Args::try_parse_from(["gridlife", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["gridlife", "-n", "hex"]).is_err());
        assert!(Args::try_parse_from(["gridlife", "--preset", "spaceship"]).is_err());
        assert!(
            Args::try_parse_from(["gridlife", "--preset", "glider", "--pattern", "a.txt"])
                .is_err()
        );
    }
}
