//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use tvbuild::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.message("Creating an optimized production build...");
//! ui.success("Compiled successfully.");
//!
//! // Assert on captured interactions
//! assert!(ui.has_message("optimized production build"));
//! assert!(ui.successes().contains(&"Compiled successfully.".to_string()));
//! ```

use std::sync::{Arc, Mutex};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Arc<Mutex<Vec<SpinnerRecord>>>,
}

/// What happened to one spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    pub message: String,
    pub finished: Option<Result<String, String>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Snapshot of every spinner started so far.
    pub fn spinners(&self) -> Vec<SpinnerRecord> {
        self.spinners
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Check if any message contains the given text.
    pub fn has_message(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.contains(text))
    }

    /// Check if any success contains the given text.
    pub fn has_success(&self, text: &str) -> bool {
        self.successes.iter().any(|m| m.contains(text))
    }

    /// Check if any warning contains the given text.
    pub fn has_warning(&self, text: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(text))
    }

    /// Check if any error contains the given text.
    pub fn has_error(&self, text: &str) -> bool {
        self.errors.iter().any(|m| m.contains(text))
    }

    /// Check if any hint contains the given text.
    pub fn has_hint(&self, text: &str) -> bool {
        self.hints.iter().any(|m| m.contains(text))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let index = match self.spinners.lock() {
            Ok(mut records) => {
                records.push(SpinnerRecord {
                    message: message.to_string(),
                    finished: None,
                });
                records.len() - 1
            }
            Err(_) => 0,
        };
        Box::new(MockSpinner {
            records: Arc::clone(&self.spinners),
            index,
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }
}

/// Spinner handed out by [`MockUI`]; writes back into the UI's records.
#[derive(Debug)]
pub struct MockSpinner {
    records: Arc<Mutex<Vec<SpinnerRecord>>>,
    index: usize,
}

impl MockSpinner {
    fn update(&self, f: impl FnOnce(&mut SpinnerRecord)) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(self.index) {
                f(record);
            }
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.update(|r| r.finished = Some(Ok(msg.to_string())));
    }

    fn finish_error(&mut self, msg: &str) {
        self.update(|r| r.finished = Some(Err(msg.to_string())));
    }

    fn finish_clear(&mut self) {
        self.update(|r| r.finished = Some(Ok(String::new())));
    }
}
