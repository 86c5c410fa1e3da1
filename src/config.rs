use std::{fmt, fs::File, io, path::Path, str::FromStr};

use owo_colors::{AnsiColors, FgDynColorDisplay, OwoColorize};
use serde::{Deserialize, Serialize};

use crate::args::Settings;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    colors: Option<Colors>,
    #[serde(default)]
    defaults: Defaults,
}

impl Config {
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Default::default());
        }

        let config = serde_json::from_reader(File::open(path)?)?;
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        serde_json::to_writer_pretty(File::create(path)?, self)?;
        Ok(())
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, settings: &Settings) {
        self.defaults = Defaults {
            dice: settings.dice,
            sides: settings.sides,
            delay_ms: settings.delay.as_millis() as u64,
            render_period_ms: settings.render_period.as_millis() as u64,
        };
    }

    pub fn colors(&self) -> Colors {
        self.colors.unwrap_or_default()
    }
}

/// Starting values for the inputs. Results are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub dice: u32,
    pub sides: u32,
    pub delay_ms: u64,
    pub render_period_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            dice: 2,
            sides: 6,
            delay_ms: 10,
            render_period_ms: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct Colors {
    #[serde(skip_serializing_if = "Option::is_none")]
    theoretical: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    simulated: Option<Color>,
}

impl Colors {
    pub fn theoretical<'a, T: fmt::Display>(
        &self,
        item: &'a T,
    ) -> FgDynColorDisplay<'a, AnsiColors, T> {
        match self.theoretical {
            None => item.color(AnsiColors::Blue),
            Some(color) => item.color(color.0),
        }
    }

    pub fn simulated<'a, T: fmt::Display>(
        &self,
        item: &'a T,
    ) -> FgDynColorDisplay<'a, AnsiColors, T> {
        match self.simulated {
            None => item.color(AnsiColors::BrightRed),
            Some(color) => item.color(color.0),
        }
    }
}

const COLOR_NAMES: [(&str, AnsiColors); 17] = [
    ("Black", AnsiColors::Black),
    ("Red", AnsiColors::Red),
    ("Green", AnsiColors::Green),
    ("Yellow", AnsiColors::Yellow),
    ("Blue", AnsiColors::Blue),
    ("Magenta", AnsiColors::Magenta),
    ("Cyan", AnsiColors::Cyan),
    ("White", AnsiColors::White),
    ("Default", AnsiColors::Default),
    ("BrightBlack", AnsiColors::BrightBlack),
    ("BrightRed", AnsiColors::BrightRed),
    ("BrightGreen", AnsiColors::BrightGreen),
    ("BrightYellow", AnsiColors::BrightYellow),
    ("BrightBlue", AnsiColors::BrightBlue),
    ("BrightMagenta", AnsiColors::BrightMagenta),
    ("BrightCyan", AnsiColors::BrightCyan),
    ("BrightWhite", AnsiColors::BrightWhite),
];

/// A chart color, named in the config file without regard to case.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(AnsiColors);

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COLOR_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, color)| Color(color))
            .ok_or_else(|| format!("unknown color: {}", s))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = COLOR_NAMES
            .iter()
            .find(|(_, color)| *color == self.0)
            .map_or("Default", |&(name, _)| name);
        f.write_str(name)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Config, Defaults, COLOR_NAMES};

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(&Defaults::default(), config.defaults());
    }

    #[test]
    fn partial_defaults_fill_in() {
        let config: Config = serde_json::from_str(r#"{"defaults": {"sides": 20}}"#).unwrap();
        assert_eq!(
            &Defaults {
                sides: 20,
                ..Default::default()
            },
            config.defaults()
        );
    }

    #[test]
    fn color_names_ignore_case() {
        let config: Config =
            serde_json::from_str(r#"{"colors": {"theoretical": "cyan", "simulated": "BrightYellow"}}"#)
                .unwrap();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains(r#""theoretical":"Cyan""#));
        assert!(text.contains(r#""simulated":"BrightYellow""#));
    }

    #[test]
    fn every_color_name_reads_back() {
        for (name, _) in COLOR_NAMES {
            let color: Color = name.to_lowercase().parse().unwrap();
            assert_eq!(name, color.to_string());
        }
        assert!("chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn unknown_color_is_rejected() {
        let result: serde_json::Result<Config> =
            serde_json::from_str(r#"{"colors": {"simulated": "chartreuse"}}"#);
        assert!(result.is_err());
    }
}
