//! Browser view state (cursor, input mode, dialog focus).

use ratatui::widgets::TableState;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation keys.
    Normal,
    /// Keystrokes edit the search string.
    Search,
}

/// Focused selector inside the player dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogFocus {
    /// Season selector.
    Seasons,
    /// Episode selector.
    Episodes,
}

impl DialogFocus {
    /// Returns the other selector.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Seasons => Self::Episodes,
            Self::Episodes => Self::Seasons,
        }
    }
}

/// State owned by the terminal layer only.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Table state for the result list (selection and scroll).
    pub table_state: TableState,
    /// Focused selector when the player dialog is open.
    pub dialog_focus: DialogFocus,
    /// One-line status message shown in the footer.
    pub status: Option<String>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates a state in normal mode with no selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            table_state: TableState::default(),
            dialog_focus: DialogFocus::Seasons,
            status: None,
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Keeps the cursor inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let cursor = self.cursor().min(len.saturating_sub(1));
        self.table_state.select(Some(cursor));
    }

    /// Moves the cursor up one row.
    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let row = self.cursor().saturating_sub(1);
        self.table_state.select(Some(row));
    }

    /// Moves the cursor down one row. Returns `true` when already on the
    /// last row.
    pub fn move_down(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let last = len.saturating_sub(1);
        let cursor = self.cursor();
        if cursor >= last {
            self.table_state.select(Some(last));
            return true;
        }
        self.table_state.select(Some(cursor.saturating_add(1)));
        false
    }

    /// Moves the cursor up by `page_size` rows.
    pub fn page_up(&mut self, len: usize, page_size: usize) {
        if len == 0 {
            return;
        }
        self.table_state
            .select(Some(self.cursor().saturating_sub(page_size.max(1))));
    }

    /// Moves the cursor down by `page_size` rows.
    pub fn page_down(&mut self, len: usize, page_size: usize) {
        if len == 0 {
            return;
        }
        let target = self
            .cursor()
            .saturating_add(page_size.max(1))
            .min(len.saturating_sub(1));
        self.table_state.select(Some(target));
    }

    /// Resets the cursor to the top (new result list).
    pub fn reset_cursor(&mut self) {
        self.table_state = TableState::default();
    }
}
