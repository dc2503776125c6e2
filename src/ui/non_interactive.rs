//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, SpinnerHandle, Theme, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain lines only: no spinners, no colors unless the terminal supports
/// them. Spinner results are still printed so CI logs show each phase.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: Theme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: Theme::detect(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let enabled = self.mode.shows_status();
        if enabled {
            println!("{}", message);
        }
        Box::new(PhaseLine::new(self.theme.clone(), enabled))
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("{}\n", self.theme.format_header(title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.dim.apply_to(hint));
        }
    }
}

/// Spinner stand-in that prints the phase result as a single line.
pub struct PhaseLine {
    theme: Theme,
    enabled: bool,
    finished: bool,
}

impl PhaseLine {
    /// Create a phase line; a disabled one prints nothing.
    pub fn new(theme: Theme, enabled: bool) -> Self {
        Self {
            theme,
            enabled,
            finished: false,
        }
    }

    /// The line to print for a finish, at most once.
    fn finish_line(&mut self, line: String) -> Option<String> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.enabled.then_some(line)
    }

    fn print(&mut self, line: String) {
        if let Some(line) = self.finish_line(line) {
            println!("{}", line);
        }
    }
}

impl SpinnerHandle for PhaseLine {
    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.print(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.print(line);
    }

    fn finish_clear(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_result_is_printed_once() {
        let mut phase = PhaseLine::new(Theme::plain(), true);

        let first = phase.finish_line("Build finished in 2s".to_string());
        let second = phase.finish_line("again".to_string());

        assert!(first.unwrap().contains("Build finished in 2s"));
        assert!(second.is_none());
    }

    #[test]
    fn quiet_phase_prints_nothing() {
        let mut phase = PhaseLine::new(Theme::plain(), false);

        assert!(phase.finish_line("Build failed after 1s".to_string()).is_none());
    }

    #[test]
    fn cleared_phase_prints_nothing() {
        let mut phase = PhaseLine::new(Theme::plain(), true);
        phase.finish_clear();

        assert!(phase.finish_line("late".to_string()).is_none());
    }

    #[test]
    fn quiet_spinner_accepts_all_calls() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let mut spinner = ui.start_spinner("Building");
        spinner.finish_success("Built");
    }
}
