//! Visual theme and styling.

use console::Style;

/// Terminal styles for build output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Success messages (green).
    pub success: Style,
    /// Warning messages (yellow).
    pub warning: Style,
    /// Error messages (red bold).
    pub error: Style,
    /// Headers and spinners (cyan).
    pub info: Style,
    /// Secondary text, such as unchanged sizes and hints.
    pub dim: Style,
    /// Emphasised text (bold).
    pub highlight: Style,
    /// Paths in the size report (cyan).
    pub path: Style,
    /// Size growth in the report.
    pub grew: Style,
    /// Size reduction in the report.
    pub shrank: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            path: Style::new().cyan(),
            grew: Style::new().yellow(),
            shrank: Style::new().green(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            path: Style::new(),
            grew: Style::new(),
            shrank: Style::new(),
        }
    }

    /// Pick colored or plain based on [`should_use_colors`].
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(msg).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(msg).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(msg).to_string()
    }

    pub fn format_header(&self, title: &str) -> String {
        self.info.apply_to(title).to_string()
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}
