//! Bundler diagnostic formatting.
//!
//! Raw bundler messages carry loader headers, internal stack frames and
//! inconsistent syntax-error shapes. [`format_messages`] turns them into
//! short, readable diagnostics.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Label every syntax error is normalised to.
pub const SYNTAX_ERROR_LABEL: &str = "Syntax error:";

static MODULE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Module [A-Za-z ]+\(from").expect("MODULE_HEADER must compile")
});

static PARSING_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Line (\d+):(?:(\d+):)?\s*Parsing error: (.+)$")
        .expect("PARSING_ERROR must compile")
});

static BABEL_SYNTAX_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SyntaxError\s+\((\d+):(\d+)\)\s*(.+?)\n").expect("BABEL_SYNTAX_ERROR must compile")
});

static MISSING_DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*export 'default' \(imported as '(.+?)'\) was not found in '(.+?)'.*$")
        .expect("MISSING_DEFAULT_EXPORT must compile")
});

static MISSING_NAMED_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*export '(.+?)' \(imported as '(.+?)'\) was not found in '(.+?)'.*$")
        .expect("MISSING_NAMED_EXPORT must compile")
});

static LOADER_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*) \d+:\d+-\d+$").expect("LOADER_POSITION must compile")
});

static STACK_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at\s(?:.*:\d+:\d+[\s)]*|<anonymous>\s*)$").expect("STACK_FRAME must compile")
});

/// One message from the bundler's stats output.
///
/// Older bundlers emit plain strings, newer ones objects with a module name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatsMessage {
    /// A preformatted message.
    Text(String),
    /// A structured message.
    Detailed {
        message: String,
        #[serde(rename = "moduleName", default)]
        module_name: Option<String>,
    },
}

impl From<&str> for StatsMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Formatted diagnostics, in bundler order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedMessages {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Format errors and warnings.
///
/// When any error looks like a syntax error only syntax errors are kept;
/// the rest are usually knock-on failures.
pub fn format_messages(errors: &[StatsMessage], warnings: &[StatsMessage]) -> FormattedMessages {
    let mut errors: Vec<String> = errors.iter().map(format_message).collect();
    if errors.iter().any(|e| is_likely_syntax_error(e)) {
        errors.retain(|e| is_likely_syntax_error(e));
    }

    FormattedMessages {
        errors,
        warnings: warnings.iter().map(format_message).collect(),
    }
}

/// Whether a formatted message is a syntax error.
pub fn is_likely_syntax_error(message: &str) -> bool {
    message.contains(SYNTAX_ERROR_LABEL)
}

/// Clean up a single message.
pub fn format_message(message: &StatsMessage) -> String {
    let mut lines: Vec<String> = match message {
        StatsMessage::Text(text) => text.split('\n').map(str::to_string).collect(),
        StatsMessage::Detailed {
            message,
            module_name,
        } => module_name
            .iter()
            .flat_map(|m| m.split('\n'))
            .chain(message.split('\n'))
            .map(str::to_string)
            .collect(),
    };

    // Loader headers ("Module Error (from ./node_modules/...)") are noise.
    lines.retain(|line| !MODULE_HEADER.is_match(line));

    for line in &mut lines {
        if let Some(caps) = PARSING_ERROR.captures(line) {
            let position = match caps.get(2) {
                Some(col) => format!("{}:{}", &caps[1], col.as_str()),
                None => caps[1].to_string(),
            };
            *line = format!("{} {} ({})", SYNTAX_ERROR_LABEL, &caps[3], position);
        }
    }

    let mut text = lines.join("\n");
    text = BABEL_SYNTAX_ERROR
        .replace_all(&text, format!("{} $3 ($1:$2)\n", SYNTAX_ERROR_LABEL).as_str())
        .into_owned();
    text = MISSING_DEFAULT_EXPORT
        .replace_all(
            &text,
            "Attempted import error: '$2' does not contain a default export (imported as '$1').",
        )
        .into_owned();
    text = MISSING_NAMED_EXPORT
        .replace_all(
            &text,
            "Attempted import error: '$1' is not exported from '$3' (imported as '$2').",
        )
        .into_owned();
    text = text.replace("Module build failed: ", "");

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    if lines.len() > 2 && lines[1].trim().is_empty() {
        lines.remove(1);
    }

    if let Some(first) = lines.first_mut() {
        *first = LOADER_POSITION.replace(first, "$1").into_owned();
    }

    if lines.len() > 1 && lines[1].starts_with("Module not found: ") {
        let detail = lines[1]
            .replace("Error: ", "")
            .replace("Module not found: Cannot find file:", "Cannot find file:");
        lines.truncate(1);
        lines.push(detail);
    }

    // Internal stack frames, but keep frames that point into bundled sources.
    lines.retain(|line| !STACK_FRAME.is_match(line) || line.contains("webpack:"));

    // Collapse runs of blank lines.
    let mut collapsed: Vec<&str> = Vec::with_capacity(lines.len());
    let mut previous_blank = false;
    for (index, line) in lines.iter().enumerate() {
        let blank = line.trim().is_empty();
        if index == 0 || !blank || !previous_blank {
            collapsed.push(line);
        }
        previous_blank = blank;
    }

    collapsed.join("\n").trim().to_string()
}
