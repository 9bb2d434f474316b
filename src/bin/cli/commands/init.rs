use std::path::Path;

use anyhow::{Context, Result};

use mahir_lib::study::{CycleData, Score, ScoreConfig, StudySet, StudySetStorage};

use crate::app::App;

pub fn run(
    app: &App,
    path: &Path,
    name: Option<&str>,
    cycle_length: Option<u32>,
    deck_min: Option<usize>,
) -> Result<()> {
    let defaults = &app.config.new_set;
    let name = name
        .map(|n| n.to_string())
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().to_string()))
        .unwrap_or_else(|| "Study set".to_string());

    let cycle = CycleData::new(
        cycle_length.unwrap_or(defaults.cycle_length),
        deck_min.unwrap_or(defaults.deck_min),
    );
    let mut set = StudySet::new(name, cycle);
    for score in [Score::Known, Score::Mastered] {
        set.score_config.insert(
            score,
            ScoreConfig {
                ncycles: 0,
                nreset: defaults.nreset,
                shuffle: defaults.shuffle,
            },
        );
    }

    let storage = StudySetStorage::new(path);
    storage
        .create(&set)
        .with_context(|| format!("Failed to create set {}", path.display()))?;

    println!(
        "Created '{}' at {} ({} sessions per cycle, deck of at least {})",
        set.name,
        path.display(),
        set.cycle_data.cycle_length,
        set.cycle_data.deck_min
    );
    Ok(())
}
