use std::path::PathBuf;

use anyhow::Result;

use mahir_lib::study::rebalance::rebalance;

use crate::app::App;
use crate::render::terminal::format_changes;
use crate::OutputFormat;

pub fn run(app: &App, set: Option<PathBuf>) -> Result<()> {
    let storage = app.storage(set)?;
    let mut set = app.load(&storage)?;

    let report = rebalance(&mut set.term_queues, &set.terms_dict);
    if report.changed_queues() {
        app.save(&storage, &set)?;
    }

    match app.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "changes": report.changes,
                "orphaned": report.orphaned,
                "enqueued": report.enqueued,
                "duplicates": report.duplicates,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if report.is_clean() {
                println!("Queues already match term scores.");
                return Ok(());
            }
            for line in format_changes(&report.changes) {
                println!("{}", line);
            }
            if !report.enqueued.is_empty() {
                println!("Queued {} unqueued terms: {}", report.enqueued.len(), report.enqueued.join(", "));
            }
            if !report.duplicates.is_empty() {
                println!(
                    "Removed {} duplicate entries: {}",
                    report.duplicates.len(),
                    report.duplicates.join(", ")
                );
            }
            if !report.orphaned.is_empty() {
                println!(
                    "Left {} ids with no term in place: {}",
                    report.orphaned.len(),
                    report.orphaned.join(", ")
                );
            }
        }
    }

    Ok(())
}
