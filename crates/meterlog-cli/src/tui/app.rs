//! Application state and logic

use std::time::{Duration, Instant};

use meterlog_core::{Category, Config, History, Ledger, LedgerError, ReadingStore};

use crate::commands::export::{save_csv, save_printable};
use crate::commands::reading::today;
use crate::output::recovery_hint;

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Browsing the history table
    Normal,
    /// Filling in the new reading form
    Form,
    /// Waiting for y/n before clearing history
    ConfirmClear,
}

/// Focused field of the reading form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Date,
    Value,
}

impl FormField {
    /// Move to the next field (wrapping)
    pub fn next(self) -> Self {
        match self {
            FormField::Category => FormField::Date,
            FormField::Date => FormField::Value,
            FormField::Value => FormField::Category,
        }
    }

    /// Move to the previous field (wrapping)
    pub fn prev(self) -> Self {
        match self {
            FormField::Category => FormField::Value,
            FormField::Date => FormField::Category,
            FormField::Value => FormField::Date,
        }
    }
}

/// The new reading form
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingForm {
    pub category: Category,
    pub date: String,
    pub value: String,
    pub focus: FormField,
}

impl Default for ReadingForm {
    fn default() -> Self {
        Self {
            category: Category::Water,
            date: today(),
            value: String::new(),
            focus: FormField::Value,
        }
    }
}

impl ReadingForm {
    /// Type a character into the focused text field
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Category => {
                if c == ' ' {
                    self.category = self.category.toggle();
                }
            }
            FormField::Date => self.date.push(c),
            FormField::Value => self.value.push(c),
        }
    }

    /// Delete the last character of the focused text field
    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Category => {}
            FormField::Date => {
                self.date.pop();
            }
            FormField::Value => {
                self.value.pop();
            }
        }
    }

    pub fn toggle_category(&mut self) {
        self.category = self.category.toggle();
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Rendered history
    pub history: History,
    /// Selected history row
    pub row_index: usize,
    /// New reading form
    pub form: ReadingForm,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Blocking error shown in a modal until a key is pressed
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    /// Create a new app with data from the ledger
    pub fn new<S: ReadingStore>(ledger: &Ledger<S>) -> anyhow::Result<Self> {
        Ok(Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            history: ledger.history()?,
            row_index: 0,
            form: ReadingForm::default(),
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
        })
    }

    /// Re-render the history from the store
    pub fn refresh<S: ReadingStore>(&mut self, ledger: &Ledger<S>) -> anyhow::Result<()> {
        self.history = ledger.history()?;
        if self.row_index >= self.history.len() {
            self.row_index = self.history.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn move_up(&mut self) {
        self.row_index = self.row_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.row_index + 1 < self.history.len() {
            self.row_index += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.row_index = 0;
    }

    pub fn move_to_last(&mut self) {
        self.row_index = self.history.len().saturating_sub(1);
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Show a failed action, with a recovery suggestion when there is one
    pub fn set_action_error(&mut self, err: &anyhow::Error) {
        self.set_error(with_hint(format!("Action failed: {:#}", err), err));
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Show the new reading form
    pub fn open_form(&mut self) {
        self.input_mode = InputMode::Form;
    }

    /// Close the form, keeping what was typed
    pub fn close_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Submit the form
    ///
    /// Validation failures show an error and keep the form open with its
    /// contents; nothing is stored.
    pub fn submit_form<S: ReadingStore>(&mut self, ledger: &mut Ledger<S>) -> anyhow::Result<()> {
        let submitted = ledger.submit(self.form.category.clone(), &self.form.date, &self.form.value);

        match submitted {
            Ok(reading) => {
                self.form = ReadingForm::default();
                self.input_mode = InputMode::Normal;
                self.refresh(ledger)?;
                self.set_status(format!(
                    "Recorded {} reading {} m³ for {}",
                    reading.category.label(),
                    reading.display_value(),
                    reading.date
                ));
            }
            Err(LedgerError::Validation(e)) => {
                self.set_error(format!("Please fill in all fields correctly. {}.", e));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Ask for confirmation before clearing
    pub fn request_clear(&mut self) {
        self.input_mode = InputMode::ConfirmClear;
    }

    pub fn cancel_clear(&mut self) {
        self.input_mode = InputMode::Normal;
        self.set_status("Clear cancelled");
    }

    /// Clear history after confirmation
    pub fn confirm_clear<S: ReadingStore>(&mut self, ledger: &mut Ledger<S>) -> anyhow::Result<()> {
        self.input_mode = InputMode::Normal;
        ledger.clear_all()?;
        self.refresh(ledger)?;
        self.set_status("Reading history cleared");
        Ok(())
    }

    /// Export CSV to the configured file name
    pub fn export_csv<S: ReadingStore>(&mut self, config: &Config, ledger: &Ledger<S>) {
        match save_csv(config, ledger, None) {
            Ok(path) => self.set_status(format!("Exported CSV to {}", path.display())),
            Err(e) => self.set_error(export_error_message(&e)),
        }
    }

    /// Write the printable document and open it for printing
    pub fn export_printable<S: ReadingStore>(&mut self, config: &Config, ledger: &Ledger<S>) {
        match save_printable(config, ledger, None, config.open_printable) {
            Ok(export) => match export.open_error {
                None => self.set_status(format!("Printing {}", export.path.display())),
                Some(err) => self.set_status(format!(
                    "Wrote {} (could not open viewer: {})",
                    export.path.display(),
                    err
                )),
            },
            Err(e) => self.set_error(export_error_message(&e)),
        }
    }
}

fn export_error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::NoData) => "No data to export.".to_string(),
        _ => with_hint(format!("Export failed: {:#}", err), err),
    }
}

fn with_hint(message: String, err: &anyhow::Error) -> String {
    match recovery_hint(err) {
        Some(hint) => format!("{}\n{}", message, hint),
        None => message,
    }
}
