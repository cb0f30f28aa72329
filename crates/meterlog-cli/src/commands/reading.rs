//! Reading command handlers

use anyhow::{Context, Result};
use chrono::Local;

use meterlog_core::{Category, Ledger, ReadingStore};

use crate::output::Output;
use crate::prompt::confirm;

/// Record a new reading
pub fn add<S: ReadingStore>(
    ledger: &mut Ledger<S>,
    category: Category,
    value: String,
    date: Option<String>,
    output: &Output,
) -> Result<()> {
    let date = date.unwrap_or_else(today);

    let reading = ledger.submit(category, &date, &value)?;

    output.success(&format!(
        "Recorded {} reading for {}",
        reading.category.label(),
        reading.date
    ));
    output.print_reading(&reading);

    Ok(())
}

/// Show the history table
pub fn history<S: ReadingStore>(ledger: &Ledger<S>, output: &Output) -> Result<()> {
    let history = ledger.history().context("Failed to load readings")?;
    output.print_history(&history);
    Ok(())
}

/// Delete every reading after confirmation
pub fn clear<S: ReadingStore>(ledger: &mut Ledger<S>, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            anyhow::bail!("Refusing to clear history without confirmation. Pass --yes.");
        }
        if !confirm("Delete the entire reading history?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ledger.clear_all().context("Failed to clear history")?;

    output.success("Reading history cleared");

    Ok(())
}

/// Today's local date as the default reading date
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use meterlog_core::{MemoryStore, Reading};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_add_defaults_date_to_today() {
        let mut ledger = Ledger::new(MemoryStore::new());

        add(&mut ledger, Category::Gas, "12.5".to_string(), None, &quiet()).unwrap();

        let readings = ledger.readings().unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].date, today());
        assert_eq!(readings[0].value, 12.5);
    }

    #[test]
    fn test_add_rejects_invalid_value() {
        let mut ledger = Ledger::new(MemoryStore::new());

        let result = add(
            &mut ledger,
            Category::Water,
            "twelve".to_string(),
            Some("2024-01-01".to_string()),
            &quiet(),
        );

        assert!(result.is_err());
        assert!(ledger.readings().unwrap().is_empty());
    }

    #[test]
    fn test_clear_with_yes() {
        let mut ledger = Ledger::new(MemoryStore::with_readings(vec![Reading::new(
            Category::Water,
            "2024-01-01",
            1.0,
        )]));

        clear(&mut ledger, true, &quiet()).unwrap();
        assert!(ledger.history().unwrap().is_empty());
    }

    #[test]
    fn test_clear_without_confirmation_in_quiet_mode_is_refused() {
        let mut ledger = Ledger::new(MemoryStore::with_readings(vec![Reading::new(
            Category::Water,
            "2024-01-01",
            1.0,
        )]));

        assert!(clear(&mut ledger, false, &quiet()).is_err());
        assert_eq!(ledger.readings().unwrap().len(), 1);
    }
}
