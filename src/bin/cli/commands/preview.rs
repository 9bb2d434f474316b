use std::path::PathBuf;

use anyhow::{Context, Result};

use mahir_lib::study::cycle::is_cycle_end;
use mahir_lib::study::deck::{assemble_deck, compute_quotas};

use crate::app::App;
use crate::render::terminal::{paint, rule, score_color, Color};
use crate::OutputFormat;

/// Show the quotas and deck composition of the next session.
///
/// Works on a copy of the set; nothing is rotated or saved.
pub fn run(app: &App, set: Option<PathBuf>) -> Result<()> {
    let storage = app.storage(set)?;
    let mut set = app.load(&storage)?;

    let cycle_end = is_cycle_end(&set.cycle_data);
    let quotas = compute_quotas(&set.term_queues, &set.cycle_data)
        .context("Failed to compute quotas")?;
    let counts = set.queue_counts();
    let deck = assemble_deck(&mut set.term_queues, &set.cycle_data)
        .context("Failed to assemble deck")?;

    match app.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": set.name,
                "session": set.total_sessions + 1,
                "cycle": set.cycle_data.ncycle,
                "cycleEnd": cycle_end,
                "queues": counts,
                "quotas": quotas,
                "deck": deck.stats,
                "total": deck.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: session {} (cycle {}, {}/{} sessions)",
                paint(&set.name, Color::BOLD, app.use_color),
                set.total_sessions + 1,
                set.cycle_data.ncycle,
                set.cycle_data.total_sessions,
                set.cycle_data.cycle_length
            );
            if cycle_end {
                println!("The cycle is complete; the next session will ask to keep its parameters.");
            }
            println!();
            println!("Score  Queue  Quota  Deck");
            println!("{}", rule(26));
            for (score, count) in &counts {
                let quota = quotas
                    .get(score)
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let in_deck = deck.stats.get(score).copied().unwrap_or(0);
                println!(
                    "{:<5}  {:>5}  {:>5}  {:>4}",
                    paint(&score.to_string(), score_color(*score), app.use_color),
                    count,
                    quota,
                    in_deck
                );
            }
            println!("\ntotal: {}", deck.len());
        }
    }

    Ok(())
}
