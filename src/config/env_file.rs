//! .env file parsing.
//!
//! This module provides a strict parser for environment variable files
//! in the standard KEY=value format. Unlike a lenient loader, malformed
//! lines are reported instead of skipped: a present-but-broken `.env`
//! file must stop the build.

use crate::error::{Result, TvbuildError};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// A syntax error inside a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct EnvParseError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with the line.
    pub message: String,
}

/// Parses .env files into a map of environment variables.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Exported: `export KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Escapes in double quotes: `KEY="line1\nline2"`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment` and `KEY=value # trailing`
/// - Whitespace around equals: `KEY = value`
/// - Values with equals signs: `URL=https://example.com?foo=bar`
///
/// # Example
///
/// ```
/// use tvbuild::config::EnvFileParser;
///
/// let content = r#"
/// ## Player config
/// REACT_APP_API_URL=https://api.example.com
/// REACT_APP_TITLE="Live TV"
/// EMPTY=
/// "#;
///
/// let vars = EnvFileParser::parse(content).unwrap();
/// assert_eq!(vars.get("REACT_APP_API_URL").map(String::as_str), Some("https://api.example.com"));
/// assert_eq!(vars.get("REACT_APP_TITLE").map(String::as_str), Some("Live TV"));
/// assert_eq!(vars.get("EMPTY").map(String::as_str), Some(""));
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse an env file content string into a map of variables.
    ///
    /// Later assignments of the same key win.
    pub fn parse(content: &str) -> std::result::Result<BTreeMap<String, String>, EnvParseError> {
        let mut vars = BTreeMap::new();
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = Self::parse_line(line).map_err(|message| EnvParseError {
                line: index + 1,
                message,
            })?;
            vars.insert(key, value);
        }

        Ok(vars)
    }

    /// Parse a single non-empty, non-comment line.
    fn parse_line(line: &str) -> std::result::Result<(String, String), String> {
        let line = line.strip_prefix("export ").unwrap_or(line);

        let eq_pos = line
            .find('=')
            .ok_or_else(|| format!("expected KEY=VALUE, found '{}'", line))?;
        let key = line[..eq_pos].trim();
        Self::validate_key(key)?;

        let value = Self::parse_value(line[eq_pos + 1..].trim())?;
        Ok((key.to_string(), value))
    }

    fn validate_key(key: &str) -> std::result::Result<(), String> {
        let mut chars = key.chars();
        match chars.next() {
            None => return Err("empty variable name".to_string()),
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(format!("invalid variable name '{}'", key));
            }
            Some(_) => {}
        }
        if chars.any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))) {
            return Err(format!("invalid variable name '{}'", key));
        }
        Ok(())
    }

    fn parse_value(raw: &str) -> std::result::Result<String, String> {
        if let Some(rest) = raw.strip_prefix('"') {
            let (value, remainder) = Self::take_double_quoted(rest)?;
            Self::check_remainder(remainder)?;
            Ok(value)
        } else if let Some(rest) = raw.strip_prefix('\'') {
            let end = rest
                .find('\'')
                .ok_or_else(|| "unterminated single-quoted value".to_string())?;
            Self::check_remainder(&rest[end + 1..])?;
            Ok(rest[..end].to_string())
        } else {
            // Unquoted: a '#' preceded by whitespace starts a comment.
            let value = match raw.find(" #").or_else(|| raw.find("\t#")) {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            Ok(value.trim_end().to_string())
        }
    }

    /// Consume a double-quoted value, returning it unescaped plus whatever follows the closing quote.
    fn take_double_quoted(rest: &str) -> std::result::Result<(String, &str), String> {
        let mut value = String::with_capacity(rest.len());
        let mut chars = rest.char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((value, &rest[i + 1..])),
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }

        Err("unterminated double-quoted value".to_string())
    }

    fn check_remainder(remainder: &str) -> std::result::Result<(), String> {
        let remainder = remainder.trim_start();
        if remainder.is_empty() || remainder.starts_with('#') {
            Ok(())
        } else {
            Err(format!("unexpected '{}' after closing quote", remainder))
        }
    }

    /// Load and parse an env file from a path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` naming the file when it is not valid
    /// UTF-8 or contains a malformed line.
    pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|_| TvbuildError::ConfigParseError {
            path: path.to_path_buf(),
            message: "file is not valid UTF-8".to_string(),
        })?;

        Self::parse(&content).map_err(|e| TvbuildError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load and parse an env file, returning empty map if file doesn't exist.
    pub fn load_optional(path: &Path) -> Result<BTreeMap<String, String>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(BTreeMap::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn get<'a>(vars: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
        vars.get(key).map(String::as_str)
    }

    #[test]
    fn parses_simple_env_file() {
        let content = r#"
KEY1=value1
KEY2=value2
"#;

        let vars = EnvFileParser::parse(content).unwrap();

        assert_eq!(get(&vars, "KEY1"), Some("value1"));
        assert_eq!(get(&vars, "KEY2"), Some("value2"));
    }

    #[test]
    fn parses_bom_prefixed_file() {
        let vars = EnvFileParser::parse("\u{feff}REACT_APP_X=1\nPORT=3000\n").unwrap();

        assert_eq!(get(&vars, "REACT_APP_X"), Some("1"));
        assert_eq!(get(&vars, "PORT"), Some("3000"));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let content = r#"
# This is a comment

KEY=value
# Another comment
"#;

        let vars = EnvFileParser::parse(content).unwrap();

        assert_eq!(vars.len(), 1);
        assert_eq!(get(&vars, "KEY"), Some("value"));
    }

    #[test]
    fn handles_quoted_values() {
        let content = r#"
DOUBLE="double quoted"
SINGLE='single quoted'
UNQUOTED=no quotes
"#;

        let vars = EnvFileParser::parse(content).unwrap();

        assert_eq!(get(&vars, "DOUBLE"), Some("double quoted"));
        assert_eq!(get(&vars, "SINGLE"), Some("single quoted"));
        assert_eq!(get(&vars, "UNQUOTED"), Some("no quotes"));
    }

    #[test]
    fn expands_escapes_only_in_double_quotes() {
        let content = "A=\"one\\ntwo\"\nB='one\\ntwo'";

        let vars = EnvFileParser::parse(content).unwrap();

        assert_eq!(get(&vars, "A"), Some("one\ntwo"));
        assert_eq!(get(&vars, "B"), Some("one\\ntwo"));
    }

    #[test]
    fn handles_empty_values() {
        let vars = EnvFileParser::parse("EMPTY=").unwrap();
        assert_eq!(get(&vars, "EMPTY"), Some(""));
    }

    #[test]
    fn handles_values_with_equals() {
        let vars = EnvFileParser::parse("URL=https://example.com?foo=bar").unwrap();
        assert_eq!(get(&vars, "URL"), Some("https://example.com?foo=bar"));
    }

    #[test]
    fn handles_whitespace_around_equals() {
        let vars = EnvFileParser::parse("KEY = value with spaces").unwrap();
        assert_eq!(get(&vars, "KEY"), Some("value with spaces"));
    }

    #[test]
    fn strips_export_prefix_and_trailing_comments() {
        let content = "export PORT=3000 # dev server\nCOLOR=#fff";

        let vars = EnvFileParser::parse(content).unwrap();

        assert_eq!(get(&vars, "PORT"), Some("3000"));
        assert_eq!(get(&vars, "COLOR"), Some("#fff"));
    }

    #[test]
    fn later_assignment_wins() {
        let vars = EnvFileParser::parse("KEY=first\nKEY=second").unwrap();
        assert_eq!(get(&vars, "KEY"), Some("second"));
    }

    #[test]
    fn rejects_lines_without_equals() {
        let content = "KEY1=value1\ninvalid line without equals\n";

        let err = EnvFileParser::parse(content).unwrap_err();

        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected KEY=VALUE"));
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!(EnvFileParser::parse("=value").is_err());
        assert!(EnvFileParser::parse("1KEY=value").is_err());
        assert!(EnvFileParser::parse("MY KEY=value").is_err());
    }

    #[test]
    fn rejects_unterminated_quotes() {
        let err = EnvFileParser::parse("KEY=\"open").unwrap_err();
        assert!(err.message.contains("unterminated"));

        let err = EnvFileParser::parse("KEY='open").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn rejects_garbage_after_closing_quote() {
        assert!(EnvFileParser::parse("KEY=\"a\" b").is_err());
        assert!(EnvFileParser::parse("KEY=\"a\" # fine").is_ok());
    }

    #[test]
    fn load_optional_returns_empty_for_missing_file() {
        let result = EnvFileParser::load_optional(Path::new("/nonexistent/path/.env"));

        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(&path, "GOOD=1\nBROKEN\n").unwrap();

        let err = EnvFileParser::load(&path).unwrap_err();

        match err {
            TvbuildError::ConfigParseError { path: p, message } => {
                assert_eq!(p, path);
                assert!(message.contains("line 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_rejects_non_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(&path, [0x4b, 0x3d, 0xff, 0xfe]).unwrap();

        let err = EnvFileParser::load(&path).unwrap_err();

        assert!(matches!(err, TvbuildError::ConfigParseError { .. }));
    }
}
