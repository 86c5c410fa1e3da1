use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use dicedist::{DieConfig, DieParser};
use directories::BaseDirs;

use crate::{config::Defaults, Result};

#[derive(Clone, Debug, Parser)]
#[clap(author, about, version)]
pub struct Args {
    /// dice to roll
    ///
    /// Dice are written like 3d6. Shorthand like 20 or d20 means a single twenty-sided die. When
    /// omitted, the profile's defaults are used.
    #[clap(value_name = "DICE", parse(try_from_str = parse_dice))]
    notation: Option<DieConfig>,

    /// number of dice (overrides DICE)
    #[clap(short = 'n', long = "dice")]
    count: Option<u32>,

    /// sides per die (overrides DICE)
    #[clap(short, long)]
    sides: Option<u32>,

    /// milliseconds between rolls
    #[clap(short, long)]
    delay: Option<u64>,

    /// milliseconds between redraws
    #[clap(long)]
    render_period: Option<u64>,

    /// stop after this many seconds
    #[clap(long)]
    duration: Option<u64>,

    /// seed for a reproducible run
    #[clap(long)]
    seed: Option<u64>,

    /// print the final snapshot as JSON
    #[clap(long)]
    json: bool,

    /// config profile
    ///
    /// Defaults and colors are read from ~/.dicesim, or ~/.dicesim.<profile> when a profile is
    /// named.
    #[clap(short, long)]
    config: Option<String>,

    #[clap(subcommand)]
    subcmd: Option<SubCommand>,

    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Mode {
        match self.subcmd {
            None => Mode::Run,
            Some(SubCommand::Save) => Mode::Save,
            Some(SubCommand::Show) => Mode::Show,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// Layers command line values over the profile's defaults.
    pub fn settings(&self, defaults: &Defaults) -> Settings {
        let (dice, sides) = match self.notation {
            Some(config) => (config.dice(), config.sides()),
            None => (defaults.dice, defaults.sides),
        };

        Settings {
            dice: self.count.unwrap_or(dice),
            sides: self.sides.unwrap_or(sides),
            delay: Duration::from_millis(self.delay.unwrap_or(defaults.delay_ms)),
            render_period: Duration::from_millis(
                self.render_period.unwrap_or(defaults.render_period_ms),
            ),
            duration: self.duration.map(Duration::from_secs),
        }
    }

    pub fn path_config(&self) -> Result<PathConfig> {
        static CONFIG_BASE: &str = ".dicesim";

        let dirs = BaseDirs::new()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory"))?;

        let config = self
            .config
            .as_ref()
            .map(|config_extension| {
                let filename = CONFIG_BASE.to_string()
                    + "."
                    + &config_extension
                        .trim_matches(|c: char| !c.is_ascii_alphabetic())
                        .to_ascii_lowercase();
                Cow::from(filename)
            })
            .unwrap_or_else(|| Cow::from(CONFIG_BASE));

        Ok(PathConfig {
            config: dirs.home_dir().join(config.as_ref()),
        })
    }
}

fn parse_dice(s: &str) -> dicedist::Result<DieConfig> {
    DieParser::new().parse(s)
}

#[derive(Clone, Debug, Parser)]
enum SubCommand {
    /// Store the given dice, delay and render period as the profile's defaults.
    #[clap(name = "save")]
    Save,
    /// Print the profile's config.
    #[clap(name = "show")]
    Show,
}

#[derive(Copy, Clone, Debug)]
pub enum Mode {
    Run,
    Save,
    Show,
}

/// Everything a run needs, after defaults and overrides are merged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub dice: u32,
    pub sides: u32,
    pub delay: Duration,
    pub render_period: Duration,
    pub duration: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct PathConfig {
    config: PathBuf,
}

impl PathConfig {
    pub fn config(&self) -> &Path {
        &self.config
    }
}
