use std::{
    io::{self, BufRead},
    str::FromStr,
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

use dicedist::{DieConfig, DieParser};

use crate::Error;

/// Interactive commands typed while a simulation runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `p`: pause when running, resume when paused, start when idle.
    Toggle,
    /// `r [ms]`
    Resume(Option<Duration>),
    /// `s [NdS] [ms]`
    Start(Option<DieConfig>, Option<Duration>),
    /// `x`
    Reset,
    /// `c`
    Clear,
    /// `q`
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| Error::BadCommand(s.to_string()))?;

        let command = match command.to_ascii_lowercase().as_str() {
            "p" | "pause" => Command::Toggle,
            "r" | "resume" => Command::Resume(words.next().map(parse_delay).transpose()?),
            "s" | "start" => {
                let dice = words
                    .next()
                    .map(|text| DieParser::new().parse(text))
                    .transpose()?;
                let delay = words.next().map(parse_delay).transpose()?;
                Command::Start(dice, delay)
            }
            "x" | "reset" => Command::Reset,
            "c" | "clear" => Command::Clear,
            "q" | "quit" => Command::Quit,
            _ => return Err(Error::BadCommand(s.to_string())),
        };

        if words.next().is_some() {
            return Err(Error::BadCommand(s.to_string()));
        }

        Ok(command)
    }
}

fn parse_delay(text: &str) -> Result<Duration, Error> {
    text.parse()
        .map(Duration::from_millis)
        .map_err(|_| Error::BadCommand(text.to_string()))
}

/// Reads commands from stdin on a helper thread.
///
/// Lines that fail to parse are reported and skipped. The channel closes when stdin does.
pub fn spawn_reader() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse() {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dicedist::DieConfig;

    use super::Command;

    fn parse(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn single_letters() {
        assert_eq!(Command::Toggle, parse("p"));
        assert_eq!(Command::Reset, parse("x"));
        assert_eq!(Command::Clear, parse(" c "));
        assert_eq!(Command::Quit, parse("Q"));
    }

    #[test]
    fn resume_with_delay() {
        assert_eq!(Command::Resume(None), parse("r"));
        assert_eq!(
            Command::Resume(Some(Duration::from_millis(25))),
            parse("resume 25")
        );
    }

    #[test]
    fn start_with_dice_and_delay() {
        assert_eq!(Command::Start(None, None), parse("s"));
        assert_eq!(
            Command::Start(
                Some(DieConfig::new(3, 6).unwrap()),
                Some(Duration::from_millis(5))
            ),
            parse("s 3d6 5")
        );
    }

    #[test]
    fn junk_is_rejected() {
        assert!("".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
        assert!("r soon".parse::<Command>().is_err());
        assert!("s 0d6".parse::<Command>().is_err());
        assert!("q now".parse::<Command>().is_err());
    }
}
