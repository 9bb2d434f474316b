use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use mahir_lib::study::Term;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    set: Option<PathBuf>,
    text: &str,
    definition: &str,
    lexemes: Option<&str>,
    id: Option<String>,
) -> Result<()> {
    let storage = app.storage(set)?;
    let mut set = app.load(&storage)?;

    let mut term = Term::new(text, definition);
    if let Some(lexemes) = lexemes {
        term.source_lexemes = parse_lexemes(lexemes)?;
    }

    let id = match id {
        Some(id) => id,
        None => next_id(set.terms_dict.keys()),
    };
    if set.terms_dict.contains_key(&id) {
        bail!("Term id '{}' already exists in {}", id, set.name);
    }

    set.insert_term(id.clone(), term);
    app.save(&storage, &set)?;

    match app.format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "id": id, "term": text, "definition": definition });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Added {} '{}' as a new term", id, text),
    }

    Ok(())
}

fn parse_lexemes(input: &str) -> Result<Vec<u64>> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("Invalid lexeme node '{}'", s)))
        .collect()
}

/// One past the largest numeric id in use
fn next_id<'a>(ids: impl Iterator<Item = &'a String>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max();
    max.map_or(1, |m| m + 1).to_string()
}
