use std::fmt::Display;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use listing_index::cli::render::render_outline;
use listing_index::{DisplayNode, Listing};
use nu_ansi_term::{Color, Style};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {
    Auto,
    Light,
    Dark,
    Plain,
}

/// Role of a piece of text; the theme decides how it looks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tone {
    Title,
    Label,
    Value,
    Note,
    Done,
    Alert,
}

impl Theme {
    fn style(self, tone: Tone) -> Style {
        let light = self == Theme::Light;
        match (tone, light) {
            (Tone::Title, false) => Color::Purple.bold(),
            (Tone::Title, true) => Color::Blue.bold(),
            (Tone::Label, false) => Color::LightBlue.bold(),
            (Tone::Label, true) => Color::Black.bold(),
            (Tone::Value, false) => Color::White.normal(),
            (Tone::Value, true) => Color::Black.normal(),
            (Tone::Note, false) => Color::LightCyan.normal(),
            (Tone::Note, true) => Color::Purple.normal(),
            (Tone::Done, false) => Color::LightGreen.bold(),
            (Tone::Done, true) => Color::Green.bold(),
            (Tone::Alert, false) => Color::Yellow.bold(),
            (Tone::Alert, true) => Color::Red.bold(),
        }
    }
}

/// Text-mode printer for listings, tree outlines and status notices.
pub struct Ui {
    theme: Theme,
    color: bool,
    quiet: bool,
}

impl Ui {
    pub fn new(theme: Theme, quiet: bool) -> Self {
        let color = theme != Theme::Plain && !quiet && std::io::stdout().is_terminal();

        #[cfg(windows)]
        if color {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            theme,
            color,
            quiet,
        }
    }

    /// Right-aligned `key: value` rows under a title. Nothing is printed
    /// for an empty section.
    pub fn section<'a, I, V>(&self, title: &str, rows: I)
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Display,
    {
        let rows: Vec<(&str, String)> = rows
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        let Some(width) = rows.iter().map(|(key, _)| key.len()).max() else {
            return;
        };
        self.title(title);
        for (key, value) in &rows {
            println!(
                "  {} {}",
                self.tint(Tone::Label, &format!("{key:>width$}:")),
                self.tint(Tone::Value, value)
            );
        }
    }

    /// One line per `(key, record)`.
    pub fn entries<'a, I>(&self, title: &str, entries: I)
    where
        I: IntoIterator<Item = (f64, &'a Listing)>,
    {
        self.title(title);
        for (key, record) in entries {
            println!("  {} {record}", self.tint(Tone::Label, &key.to_string()));
        }
    }

    pub fn list<I>(&self, title: &str, items: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return;
        }
        self.title(title);
        let bullet = if self.color {
            self.tint(Tone::Label, "•")
        } else {
            "-".to_string()
        };
        for item in items {
            println!("  {bullet} {item}");
        }
    }

    pub fn outline(&self, root: Option<&DisplayNode>) {
        match root {
            Some(root) => print!("{}", render_outline(root)),
            None => self.info("tree is empty"),
        }
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.notice(Tone::Note, "ℹ", message));
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.notice(Tone::Done, "✔", message));
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{}", self.notice(Tone::Alert, "⚠", message));
    }

    /// Starts a spinner on stderr for a step such as loading the dataset.
    pub fn loading(&self, label: impl Into<String>) -> Loading<'_> {
        let label = label.into();
        let bar = (!self.quiet).then(|| {
            let style = ProgressStyle::with_template("{spinner} {msg} {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner()
                .with_style(style)
                .with_message(label.clone());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Loading {
            ui: self,
            label: Some(label),
            started: Instant::now(),
            bar,
        }
    }

    fn title(&self, text: &str) {
        if self.quiet {
            println!("{text}");
        } else {
            println!("{}", self.tint(Tone::Title, &format!("▸ {text}")));
        }
    }

    fn notice(&self, tone: Tone, icon: &str, message: &str) -> String {
        if self.quiet {
            message.to_string()
        } else {
            format!("{} {message}", self.tint(tone, icon))
        }
    }

    fn tint(&self, tone: Tone, text: &str) -> String {
        if self.color {
            self.theme.style(tone).paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// A running spinner. Dropping it without [`Loading::finish`] reports how
/// long the step ran before it was cut short.
pub struct Loading<'a> {
    ui: &'a Ui,
    label: Option<String>,
    started: Instant,
    bar: Option<ProgressBar>,
}

impl Loading<'_> {
    pub fn finish(mut self) -> Duration {
        self.label = None;
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        self.started.elapsed()
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let Some(label) = self.label.take() else {
            return;
        };
        let message = format!(
            "{label} stopped after {}",
            elapsed_label(self.started.elapsed())
        );
        match self.bar.take() {
            Some(bar) => bar.abandon_with_message(message),
            None => self.ui.warn(&message),
        }
    }
}

/// Short human label: microseconds, milliseconds, or seconds with one decimal.
pub fn elapsed_label(elapsed: Duration) -> String {
    match elapsed.as_millis() {
        0 => format!("{}µs", elapsed.as_micros()),
        ms @ 1..=999 => format!("{ms}ms"),
        _ => format!("{:.1}s", elapsed.as_secs_f64()),
    }
}
