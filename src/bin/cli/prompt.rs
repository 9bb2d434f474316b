//! Line-based terminal reviewer
//!
//! Keys, each followed by Enter:
//! - empty line: reveal the answer
//! - `0`-`4`: score the term and advance
//! - `,` / `.`: previous / next card
//! - `c`: show another example
//! - `e`: edit the definition
//! - `q`: quit without saving

use std::io::{self, BufRead, Write};

use mahir_lib::study::{CardView, Result, ReviewAction, Reviewer, Score, StudyError};

use crate::render::terminal::{highlight_color, paint, score_color, Color};

const CHOICES: &str = "'' 0 1 2 3 4 , . c e q";

/// A recognized key, before any follow-up input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Reveal,
    Score(Score),
    Previous,
    Next,
    NewContext,
    Edit,
    Quit,
}

pub fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim() {
        "" => Some(Choice::Reveal),
        "," => Some(Choice::Previous),
        "." => Some(Choice::Next),
        "c" => Some(Choice::NewContext),
        "e" => Some(Choice::Edit),
        "q" => Some(Choice::Quit),
        other => other.parse::<Score>().ok().map(Choice::Score),
    }
}

pub struct TerminalReviewer<R, W> {
    input: R,
    output: W,
    use_color: bool,
}

impl TerminalReviewer<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(use_color: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), use_color)
    }
}

impl<R: BufRead, W: Write> TerminalReviewer<R, W> {
    pub fn new(input: R, output: W, use_color: bool) -> Self {
        Self {
            input,
            output,
            use_color,
        }
    }

    /// Read one line without its newline; end of input counts as a quit
    fn read_line(&mut self, ask: &str) -> Result<String> {
        if !ask.is_empty() {
            write!(self.output, "{} ", ask)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(StudyError::UserAbort);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer is `y` or `n`
    pub fn ask_yes_no(&mut self, ask: &str) -> Result<bool> {
        loop {
            match self.read_line(&format!("{} [y/n]", ask))?.trim() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Invalid. Choose from y, n")?,
            }
        }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Reviewer for TerminalReviewer<R, W> {
    fn show_card(&mut self, card: &CardView<'_>) -> Result<()> {
        let color = self.use_color;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            paint(&format!("{}/{}", card.position + 1, card.total), Color::DIM, color)
        )?;
        writeln!(
            self.output,
            "{}  {}",
            paint(&card.term.term, highlight_color(card.term.score), color),
            paint(&format!("@{}", card.example.node), Color::GRAY, color)
        )?;
        Ok(())
    }

    fn reveal(&mut self, card: &CardView<'_>) -> Result<()> {
        let color = self.use_color;
        writeln!(self.output, "{}", paint(&card.term.term, Color::BOLD, color))?;
        writeln!(self.output, "{}", card.term.definition)?;
        writeln!(
            self.output,
            "score {}  {}",
            paint(&card.term.score.to_string(), score_color(card.term.score), color),
            paint(&format!("{} occurrences", card.term.occurrence_count()), Color::GRAY, color)
        )?;
        Ok(())
    }

    fn next_action(&mut self, card: &CardView<'_>) -> Result<ReviewAction> {
        loop {
            let line = self.read_line("")?;
            let Some(choice) = parse_choice(&line) else {
                writeln!(self.output, "Invalid. Choose from {}", CHOICES)?;
                continue;
            };

            return Ok(match choice {
                Choice::Reveal => ReviewAction::Reveal,
                Choice::Score(score) => ReviewAction::Score(score),
                Choice::Previous => ReviewAction::Previous,
                Choice::Next => ReviewAction::Next,
                Choice::NewContext => ReviewAction::NewContext,
                Choice::Quit => ReviewAction::Quit,
                Choice::Edit => {
                    let edited = self.read_line(&format!("edit def [{}]", card.term.definition))?;
                    if edited.trim().is_empty() {
                        ReviewAction::EditDefinition(card.term.definition.clone())
                    } else {
                        ReviewAction::EditDefinition(edited)
                    }
                }
            });
        }
    }

    fn confirm_finish(&mut self) -> Result<bool> {
        self.ask_yes_no("session is complete, quit now?")
    }
}
