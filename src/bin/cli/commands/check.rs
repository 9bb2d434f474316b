use std::path::PathBuf;

use anyhow::{Result, bail};

use mahir_lib::study::cycle::validate;
use mahir_lib::study::deck::compute_quotas;
use mahir_lib::study::rebalance::find_misplaced;

use crate::app::App;
use crate::OutputFormat;

/// Report integrity problems of a set; fails when any are found
pub fn run(app: &App, set: Option<PathBuf>) -> Result<()> {
    let storage = app.storage(set)?;
    let set = app.load(&storage)?;
    let mut problems = Vec::new();

    if let Err(e) = validate(&set.cycle_data, &set.term_queues, &set.score_config) {
        problems.push(e.to_string());
    }
    if let Err(e) = compute_quotas(&set.term_queues, &set.cycle_data) {
        problems.push(e.to_string());
    }

    for (score, queue) in &set.term_queues {
        for id in queue {
            if !set.terms_dict.contains_key(id) {
                problems.push(format!("Queue {} references unknown term {}", score, id));
            }
        }
    }

    for id in find_misplaced(&set.term_queues, &set.terms_dict) {
        if let Some(term) = set.terms_dict.get(&id) {
            problems.push(format!("Term {} (score {}) is not queued once under its score", id, term.score));
        }
    }

    for (id, term) in &set.terms_dict {
        if term.sources().is_empty() {
            problems.push(format!("Term {} has no example sources", id));
        }
    }

    match app.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "ok": problems.is_empty(),
                "problems": problems,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if problems.is_empty() {
                println!("{}: {} terms, all queues consistent.", set.name, set.terms_dict.len());
            } else {
                for problem in &problems {
                    println!("  - {}", problem);
                }
            }
        }
    }

    if !problems.is_empty() {
        bail!("{} problems found in {}", problems.len(), storage.path().display());
    }

    Ok(())
}
