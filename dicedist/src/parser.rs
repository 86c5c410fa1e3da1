use regex::Regex;

use crate::{DieConfig, Error, Result};

/// Parses dice notation like `3d6`, `d20` or a bare `20`.
pub struct DieParser {
    notation: Regex,
}

impl DieParser {
    pub fn new() -> Self {
        DieParser {
            notation: Regex::new(r#"^(?:(\d+)?[Dd])?(\d+)$"#).unwrap(),
        }
    }

    pub fn parse(&self, text: &str) -> Result<DieConfig> {
        let text = text.trim();
        let captures = self
            .notation
            .captures(text)
            .ok_or_else(|| Error::BadNotation(text.into()))?;

        let dice = match captures.get(1) {
            Some(group) => parse_int(group.as_str())?,
            None => 1,
        };
        let sides = captures
            .get(2)
            .ok_or_else(|| Error::BadNotation(text.into()))?
            .as_str();

        DieConfig::new(dice, parse_int(sides)?)
    }
}

impl Default for DieParser {
    fn default() -> Self {
        DieParser::new()
    }
}

fn parse_int(text: &str) -> Result<u32> {
    text.parse()
        .map_err(|e| Error::BadInteger(text.into(), e))
}

#[cfg(test)]
mod tests {
    use crate::{DieConfig, DieParser, Error};

    #[test]
    fn full_notation() {
        assert_eq!(config(2, 6), parse("2d6"));
        assert_eq!(config(10, 8), parse("10D8"));
    }

    #[test]
    fn leading_notation() {
        let expected = config(1, 20);
        assert_eq!(expected, parse("20"));
        assert_eq!(expected, parse("d20"));
        assert_eq!(expected, parse(" d20 "));
    }

    #[test]
    fn garbage_is_rejected() {
        let parser = DieParser::new();
        assert!(matches!(parser.parse("2d6+1"), Err(Error::BadNotation(_))));
        assert!(matches!(parser.parse("two dice"), Err(Error::BadNotation(_))));
        assert!(matches!(parser.parse(""), Err(Error::BadNotation(_))));
    }

    #[test]
    fn degenerate_dice_are_rejected() {
        let parser = DieParser::new();
        assert!(matches!(
            parser.parse("0d6"),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            parser.parse("3d1"),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn overflowing_integer() {
        let parser = DieParser::new();
        assert!(matches!(
            parser.parse("99999999999d6"),
            Err(Error::BadInteger(..))
        ));
    }

    fn parse(s: &str) -> DieConfig {
        DieParser::new().parse(s).unwrap()
    }

    fn config(dice: u32, sides: u32) -> DieConfig {
        DieConfig::new(dice, sides).unwrap()
    }
}
