mod args;
mod chart;
mod command;
mod config;

use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use args::{Args, Mode, Settings};
use chart::TerminalRenderer;
use command::Command;
use config::Config;
use dicedist::{Session, SessionState, Snapshot};
use dicedistrng::DynRoller;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dist(#[from] dicedist::Error),
    #[error("Unrecognized command: {0}")]
    BadCommand(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

type DiceSession = Session<DynRoller, TerminalRenderer>;

/// What `--json` prints when the run ends.
#[derive(Serialize)]
struct Summary<'a> {
    dice: &'a str,
    mean: f64,
    variance: f64,
    total_variation: f64,
    max_deviation: f64,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let paths = args.path_config()?;
    let config = Config::load(paths.config())?;

    match args.mode() {
        Mode::Run => simulate(&args, &config),
        Mode::Save => {
            let settings = args.settings(config.defaults());
            let mut config = config;
            config.set_defaults(&settings);
            config.write(paths.config())?;
            Ok(())
        }
        Mode::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn simulate(args: &Args, config: &Config) -> Result<()> {
    let mut settings = args.settings(config.defaults());
    let mut renderer = TerminalRenderer::new(config.colors());
    renderer.set_title(title(&settings));

    let mut session = Session::new(dicedistrng::roller(args.seed()), renderer)
        .with_render_period(settings.render_period);
    session.start(settings.dice, settings.sides, settings.delay)?;
    debug!(?settings, "started");

    let mut commands = Some(command::spawn_reader());
    let clock = Instant::now();

    loop {
        let elapsed = clock.elapsed();
        if settings.duration.map_or(false, |limit| elapsed >= limit) {
            break;
        }

        session.turn(elapsed)?;

        let wake = [session.next_deadline(), settings.duration]
            .into_iter()
            .flatten()
            .min();
        let wait = wake.map(|at| at.saturating_sub(clock.elapsed()));

        match next_command(&mut commands, wait) {
            Wake::Command(command) => {
                if !apply(&mut session, &mut settings, command) {
                    break;
                }
            }
            Wake::Timeout => (),
            Wake::Idle => break,
        }
    }

    let snapshot = session.snapshot();
    debug!(
        samples = snapshot.sample_count,
        frames = session.renderer().frames(),
        "finished"
    );

    if args.json() {
        let dice = title(&settings);
        let (mean, variance) = match session.model().config() {
            Some(config) => (config.mean(), config.variance()),
            None => (0.0, 0.0),
        };
        let summary = Summary {
            dice: &dice,
            mean,
            variance,
            total_variation: snapshot.total_variation(),
            max_deviation: snapshot.max_deviation(),
            snapshot: &snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

enum Wake {
    Command(Command),
    Timeout,
    /// Nothing is scheduled and no command can arrive.
    Idle,
}

/// Waits up to `wait` (forever if `None`) for the next command.
fn next_command(commands: &mut Option<Receiver<Command>>, wait: Option<Duration>) -> Wake {
    let rx = match commands {
        Some(rx) => rx,
        None => {
            return match wait {
                Some(wait) => {
                    thread::sleep(wait);
                    Wake::Timeout
                }
                None => Wake::Idle,
            }
        }
    };

    let received = match wait {
        Some(wait) => rx.recv_timeout(wait),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match received {
        Ok(command) => Wake::Command(command),
        Err(RecvTimeoutError::Timeout) => Wake::Timeout,
        Err(RecvTimeoutError::Disconnected) => {
            debug!("stdin closed; running without commands");
            *commands = None;
            Wake::Timeout
        }
    }
}

/// Applies one interactive command. Returns false when the user asked to quit.
///
/// Overrides carried by a command only reach `settings` once the session accepts it.
fn apply(session: &mut DiceSession, settings: &mut Settings, command: Command) -> bool {
    let result = match command {
        Command::Quit => return false,
        Command::Toggle => match session.state() {
            SessionState::Running => session.stop(),
            SessionState::Paused => session.resume(settings.delay),
            SessionState::Idle => start(session, settings),
        },
        Command::Resume(delay) => {
            let delay = delay.unwrap_or(settings.delay);
            session.resume(delay).map(|()| settings.delay = delay)
        }
        Command::Start(dice, delay) => {
            let mut next = *settings;
            if let Some(dice) = dice {
                next.dice = dice.dice();
                next.sides = dice.sides();
            }
            if let Some(delay) = delay {
                next.delay = delay;
            }
            start(session, &next).map(|()| *settings = next)
        }
        Command::Reset => {
            session.reset_controls();
            Ok(())
        }
        Command::Clear => {
            session.clear();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
    }
    true
}

fn start(session: &mut DiceSession, settings: &Settings) -> dicedist::Result<()> {
    session.start(settings.dice, settings.sides, settings.delay)?;
    session.renderer_mut().set_title(title(settings));
    Ok(())
}

fn title(settings: &Settings) -> String {
    format!("{}d{}", settings.dice, settings.sides)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dicedist::{DieConfig, Session, SessionState};

    use super::{apply, DiceSession};
    use crate::{args::Settings, chart::TerminalRenderer, command::Command, config::Colors};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn running() -> (DiceSession, Settings) {
        let settings = Settings {
            dice: 2,
            sides: 6,
            delay: ms(10),
            render_period: ms(100),
            duration: None,
        };
        let renderer = TerminalRenderer::new(Colors::default());
        let mut session = Session::new(dicedistrng::roller(Some(7)), renderer);
        session
            .start(settings.dice, settings.sides, settings.delay)
            .unwrap();
        (session, settings)
    }

    #[test]
    fn rejected_resume_keeps_delay() {
        let (mut session, mut settings) = running();
        assert!(apply(&mut session, &mut settings, Command::Resume(Some(ms(5)))));
        assert_eq!(ms(10), settings.delay);
        assert_eq!(SessionState::Running, session.state());
    }

    #[test]
    fn rejected_start_keeps_dice() {
        let (mut session, mut settings) = running();
        let dice = DieConfig::new(3, 8).ok();
        assert!(apply(&mut session, &mut settings, Command::Start(dice, Some(ms(1)))));
        assert_eq!((2, 6, ms(10)), (settings.dice, settings.sides, settings.delay));
    }

    #[test]
    fn accepted_commands_update_settings() {
        let (mut session, mut settings) = running();
        assert!(apply(&mut session, &mut settings, Command::Toggle));
        assert_eq!(SessionState::Paused, session.state());

        assert!(apply(&mut session, &mut settings, Command::Resume(Some(ms(5)))));
        assert_eq!(ms(5), settings.delay);

        assert!(apply(&mut session, &mut settings, Command::Toggle));
        let dice = DieConfig::new(3, 8).ok();
        assert!(apply(&mut session, &mut settings, Command::Start(dice, None)));
        assert_eq!((3, 8, ms(5)), (settings.dice, settings.sides, settings.delay));
        assert_eq!("3d8", session.model().config().unwrap().to_string());
    }

    #[test]
    fn quit_stops_the_loop() {
        let (mut session, mut settings) = running();
        assert!(!apply(&mut session, &mut settings, Command::Quit));
    }
}
