//! Collaborators of a study session
//!
//! The engine never draws to a screen or reads keys itself. A [`Reviewer`]
//! presents each card and reports what the learner chose, and an
//! [`ExampleSource`] supplies the example occurrence shown with a card.

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{Result, StudyError};
use super::models::{Score, SourceRef, Term};

/// Choice made by the learner while a card is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// Show term, definition and score
    Reveal,
    /// Give the term a new score and advance
    Score(Score),
    Previous,
    Next,
    /// Show the same card with a different example
    NewContext,
    /// Replace the definition in place
    EditDefinition(String),
    /// Abort the session without saving
    Quit,
}

/// An example occurrence of a term in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub source: SourceRef,
    /// Corpus node to highlight
    pub node: u64,
}

/// Everything a reviewer needs to present one card
#[derive(Debug, Clone, Copy)]
pub struct CardView<'a> {
    /// Zero-based position in the deck
    pub position: usize,
    pub total: usize,
    pub id: &'a str,
    pub term: &'a Term,
    pub example: &'a Example,
}

/// The interactive side of a session
pub trait Reviewer {
    /// Present the prompt side of a card
    fn show_card(&mut self, card: &CardView<'_>) -> Result<()>;

    /// Present the answer side of a card
    fn reveal(&mut self, card: &CardView<'_>) -> Result<()>;

    /// Block until the learner picks an action for the card
    fn next_action(&mut self, card: &CardView<'_>) -> Result<ReviewAction>;

    /// Asked once the last card is passed; `false` returns to the last card
    fn confirm_finish(&mut self) -> Result<bool>;
}

/// Corpus lookup used to pick an example for a card
pub trait ExampleSource {
    fn example(&mut self, id: &str, term: &Term) -> Result<Example>;
}

/// Picks a random source reference of the term.
///
/// Lexeme references point straight at a corpus node; custom groups are
/// shown by their first node.
pub struct RandomReference<R> {
    rng: R,
}

impl<R: Rng> RandomReference<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ExampleSource for RandomReference<R> {
    fn example(&mut self, id: &str, term: &Term) -> Result<Example> {
        let sources = term.sources();
        let source = sources
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| StudyError::MalformedTerm(id.to_string()))?;

        let node = match &source {
            SourceRef::Lexeme(node) => *node,
            SourceRef::Custom(group) => *group
                .first()
                .ok_or_else(|| StudyError::MalformedTerm(id.to_string()))?,
        };

        Ok(Example { source, node })
    }
}
