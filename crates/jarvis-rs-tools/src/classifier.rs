//! Fixed trigger table for host commands.

use std::fmt;

/// Host action recognized from an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Report the local wall-clock time.
    QueryTime,
    /// Launch the default web browser.
    OpenBrowser,
    /// Launch the plain text editor.
    OpenEditor,
}

impl Action {
    /// Exact phrases that select this action.
    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            Action::QueryTime => &["what time is it", "time", "current time"],
            Action::OpenBrowser => &["open browser", "open the browser"],
            Action::OpenEditor => &["open notepad", "open notes"],
        }
    }

    pub const ALL: [Action; 3] = [Action::QueryTime, Action::OpenBrowser, Action::OpenEditor];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::QueryTime => f.write_str("query_time"),
            Action::OpenBrowser => f.write_str("open_browser"),
            Action::OpenEditor => f.write_str("open_editor"),
        }
    }
}

/// Map a command string to at most one action.
///
/// Matching is exact after trimming and lowercasing.
pub fn classify(text: &str) -> Option<Action> {
    let normalized = text.trim().to_lowercase();
    Action::ALL
        .into_iter()
        .find(|action| action.triggers().contains(&normalized.as_str()))
}
