use std::{
    fmt::{self, Display},
    io::{self, Write},
};

use dicedist::{Highlight, Renderer, Snapshot};
use owo_colors::OwoColorize;

use crate::config::Colors;

const BAR_WIDTH: usize = 50;

/// Draws each snapshot as a horizontal bar chart on stdout.
pub struct TerminalRenderer {
    title: String,
    colors: Colors,
    frames: u64,
}

impl TerminalRenderer {
    pub fn new(colors: Colors) -> Self {
        Self {
            title: String::new(),
            colors,
            frames: 0,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn draw(&self, snapshot: &Snapshot) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        // Clear the screen and home the cursor before each frame.
        write!(out, "\x1b[2J\x1b[H")?;
        write!(out, "{}", Chart::new(&self.title, snapshot, self.colors))?;
        out.flush()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if let Err(e) = self.draw(snapshot) {
            tracing::warn!(error = %e, "failed to draw frame");
        }
    }
}

/// One frame: a header, one row per sum, and the most recent roll.
pub struct Chart<'a> {
    title: &'a str,
    snapshot: &'a Snapshot,
    colors: Colors,
}

impl<'a> Chart<'a> {
    pub fn new(title: &'a str, snapshot: &'a Snapshot, colors: Colors) -> Self {
        Self {
            title,
            snapshot,
            colors,
        }
    }
}

impl Display for Chart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        writeln!(
            f,
            "{}  ::  {} rolls  ::  TV distance {:.4}",
            self.title,
            snapshot.sample_count,
            snapshot.total_variation()
        )?;

        if snapshot.is_empty() {
            return Ok(());
        }

        let limit = snapshot.y_limit();
        let label_width = snapshot
            .bins
            .last()
            .map(|x| x.to_string().len())
            .unwrap_or(1);

        writeln!(
            f,
            "{:>w$}  {}  {}",
            "",
            self.colors.theoretical(&"█ exact"),
            self.colors.simulated(&"o simulated"),
            w = label_width
        )?;

        let rows = snapshot
            .bins
            .iter()
            .zip(snapshot.theoretical.iter())
            .zip(&snapshot.simulated);

        for ((sum, &exact), &simulated) in rows {
            let bar = scale(exact, limit);
            let marker = scale(simulated, limit);

            write!(f, "{:>w$} ", sum, w = label_width)?;
            for column in 0..=BAR_WIDTH {
                if snapshot.sample_count > 0 && column == marker {
                    write!(f, "{}", self.colors.simulated(&'o'))?;
                } else if column < bar {
                    write!(f, "{}", self.colors.theoretical(&'█'))?;
                } else {
                    f.write_str(" ")?;
                }
            }
            writeln!(f, " {:.4} {:.4}", exact, simulated)?;
        }

        if let Some(roll) = &snapshot.last_roll {
            write!(f, "last roll  ::  {:>2}  ::  ", roll.sum())?;
            let mut faces = roll.faces();
            if let Some((highlight, value)) = faces.by_ref().next() {
                write_with_highlight(f, "", value, highlight)?;
            }
            for (highlight, value) in faces {
                write_with_highlight(f, ", ", value, highlight)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn scale(value: f64, limit: f64) -> usize {
    if limit <= 0.0 {
        return 0;
    }
    ((value / limit) * BAR_WIDTH as f64).round().min(BAR_WIDTH as f64) as usize
}

#[inline(always)]
fn write_with_highlight(
    f: &mut fmt::Formatter,
    separator: &str,
    value: u32,
    highlight: Highlight,
) -> fmt::Result {
    match highlight {
        Highlight::High => write!(f, "{}{:>2}", separator, value.bright_green()),
        Highlight::Low => write!(f, "{}{:>2}", separator, value.bright_red()),
        Highlight::Normal => write!(f, "{}{:>2}", separator, value),
    }
}
