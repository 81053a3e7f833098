use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // NO_COLOR per no-color.org
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// An explicit `--color` choice wins over the environment.
    pub fn resolve(flag: Option<ColorMode>) -> Self {
        flag.map_or_else(Self::from_env, Self::new)
    }

    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    pub fn use_color(&self) -> bool {
        self.color.should_use_color()
    }

    /// Point the `colored` crate at this configuration.
    pub fn apply(&self) {
        colored::control::set_override(self.use_color());
    }
}

/// Score rounded to one decimal, or "-" when absent.
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"))
}

/// Signed delta rounded to one decimal, or "-" when absent.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) if d.abs() < 0.05 => "0.0".to_string(),
        Some(d) => format!("{d:+.1}"),
        None => "-".to_string(),
    }
}

/// Delta text colored green when positive and red when negative.
pub fn colorize_delta(delta: Option<f64>, config: &FormattingConfig) -> String {
    let text = format_delta(delta);
    if !config.use_color() {
        return text;
    }
    match delta {
        Some(d) if d >= 0.05 => text.green().to_string(),
        Some(d) if d <= -0.05 => text.red().to_string(),
        _ => text,
    }
}

/// Share as a whole percentage, or "-" when absent.
pub fn format_share(share: Option<f64>) -> String {
    share.map_or_else(|| "-".to_string(), |s| format!("{:.0}%", s * 100.0))
}

pub fn header(text: &str, config: &FormattingConfig) -> String {
    if config.use_color() {
        text.blue().bold().to_string()
    } else {
        text.to_string()
    }
}

pub fn warning(text: &str, config: &FormattingConfig) -> String {
    if config.use_color() {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
