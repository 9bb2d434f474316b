use std::path::PathBuf;

use anyhow::{Context, Result};

use mahir_lib::study::{CycleDecision, RandomReference, SessionStart, StudyError, StudySession};

use crate::app::App;
use crate::prompt::TerminalReviewer;
use crate::render::terminal::{format_changes, format_duration, paint, score_color, Color};

pub fn run(app: &App, set: Option<PathBuf>) -> Result<()> {
    let storage = app.storage(set)?;
    let set = app.load(&storage)?;
    let mut rng = app.rng(0);
    let mut reviewer = TerminalReviewer::stdio(app.use_color);

    let start = StudySession::start(
        set,
        |_cycle| {
            reviewer.say("cycle for this set is complete...")?;
            reviewer.ask_yes_no("keep cycle parameters the same?")
        },
        &mut rng,
    );

    let mut session = match start {
        Ok(SessionStart::Ready(session)) => session,
        Ok(SessionStart::Halted { set, .. }) => {
            println!("You must reset parameters manually...");
            println!("Score 3 terms have been shuffled.");
            app.save(&storage, &set)?;
            return Ok(());
        }
        Err(StudyError::UserAbort) => {
            println!("Quit initiated. Nothing saved.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to prepare session"),
    };

    print_cycle_resets(app, &session);
    print_preview(app, &session);

    let mut examples = RandomReference::new(app.rng(1));
    match session.review(&mut reviewer, &mut examples) {
        Ok(()) => {}
        Err(StudyError::UserAbort) => {
            println!("Quit initiated. Nothing saved.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Study session failed"),
    }

    let finished = session.finalize();
    app.save(&storage, &finished.set)?;

    println!();
    if finished.report.changes.is_empty() {
        println!("No scores were changed");
    } else {
        println!("The following scores were changed");
        for line in format_changes(&finished.report.changes) {
            println!("  {}", line);
        }
    }
    if let Some(secs) = finished.report.duration_secs {
        println!("\nduration: {}", format_duration(secs));
    }

    Ok(())
}

fn print_cycle_resets(app: &App, session: &StudySession) {
    let lines = cycle_reset_lines(
        session.decision(),
        session.set().cycle_data.ncycle,
        app.use_color,
    );
    for line in lines {
        println!("{}", line);
    }
}

/// Notice shown when a kept cycle boundary started a new cycle
fn cycle_reset_lines(decision: &CycleDecision, ncycle: u32, use_color: bool) -> Vec<String> {
    if !decision.cycle_ended {
        return Vec::new();
    }
    let mut lines = vec![format!("starting cycle {}", ncycle)];
    for score in &decision.reset_scores {
        lines.push(format!(
            "score {} queue has been reset",
            paint(&score.to_string(), score_color(*score), use_color)
        ));
    }
    lines
}

fn print_preview(app: &App, session: &StudySession) {
    let set = session.set();
    let stats = &session.deck().stats;

    println!("{} ready for study.", paint(&set.name, Color::BOLD, app.use_color));
    println!("this is session {}:", session.session_number());
    for (score, count) in stats.iter().rev() {
        println!(
            "score {}: {} terms",
            paint(&score.to_string(), score_color(*score), app.use_color),
            count
        );
    }
    println!("total: {}", stats.values().sum::<usize>());
}

#[cfg(test)]
mod tests {
    use super::*;
    use mahir_lib::study::Score;

    #[test]
    fn test_reset_notice_lists_fired_scores() {
        let decision = CycleDecision {
            may_proceed: true,
            cycle_ended: true,
            reset_scores: vec![Score::Known, Score::Mastered],
        };
        assert_eq!(
            cycle_reset_lines(&decision, 3, false),
            vec![
                "starting cycle 3",
                "score 3 queue has been reset",
                "score 4 queue has been reset",
            ]
        );
    }

    #[test]
    fn test_no_notice_mid_cycle() {
        let decision = CycleDecision {
            may_proceed: true,
            cycle_ended: false,
            reset_scores: Vec::new(),
        };
        assert!(cycle_reset_lines(&decision, 1, false).is_empty());
    }
}
