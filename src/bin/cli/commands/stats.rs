use std::path::PathBuf;

use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{format_duration, paint, rule, score_color, Color};
use crate::OutputFormat;

pub fn run(app: &App, set: Option<PathBuf>, limit: usize) -> Result<()> {
    let storage = app.storage(set)?;
    let set = app.load(&storage)?;
    let counts = set.queue_counts();
    let recent: Vec<_> = set.stats.iter().rev().take(limit).collect();

    match app.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": set.name,
                "terms": set.terms_dict.len(),
                "totalSessions": set.total_sessions,
                "cycle": set.cycle_data,
                "queues": counts,
                "sessions": recent,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} ({} terms)", paint(&set.name, Color::BOLD, app.use_color), set.terms_dict.len());
            println!(
                "cycle {}: {}/{} sessions, deck_min {}, {} sessions overall",
                set.cycle_data.ncycle,
                set.cycle_data.total_sessions,
                set.cycle_data.cycle_length,
                set.cycle_data.deck_min,
                set.total_sessions
            );
            println!();

            for (score, count) in &counts {
                let start = set
                    .cycle_data
                    .score_starts
                    .get(score)
                    .map(|s| format!(" (start {})", s))
                    .unwrap_or_default();
                println!(
                    "score {}: {} terms{}",
                    paint(&score.to_string(), score_color(*score), app.use_color),
                    count,
                    start
                );
            }

            if recent.is_empty() {
                println!("\nNo sessions yet.");
                return Ok(());
            }

            println!();
            println!("{:<17} {:>5} {:>5} {:>8}  Changes", "Date", "Cycle", "Deck", "Duration");
            println!("{}", rule(60));
            for report in recent {
                let changes = report
                    .changes
                    .iter()
                    .map(|(label, n)| format!("{} {}", label, n))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{:<17} {:>5} {:>5} {:>8}  {}",
                    report.date.format("%Y-%m-%d %H:%M").to_string(),
                    report.cycle,
                    report.deck.values().sum::<usize>(),
                    report.duration_secs.map(format_duration).unwrap_or_default(),
                    changes
                );
            }
        }
    }

    Ok(())
}
