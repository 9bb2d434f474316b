//! A single study session
//!
//! The session owns the study set from load to save:
//! 1. the cycle check runs and may halt studying for this cycle,
//! 2. the deck is built from the (possibly reset) queues,
//! 3. the reviewer walks the deck and edits scores and definitions,
//! 4. finalizing rebalances the queues and appends a session report.
//!
//! Nothing is written to disk here; the caller saves the returned set once.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::cycle::{self, CycleDecision};
use super::deck::{self, Deck};
use super::error::{Result, StudyError};
use super::models::{CycleData, SessionReport, StudySet};
use super::rebalance::{self, RebalanceReport};
use super::review::{CardView, ExampleSource, ReviewAction, Reviewer};

/// Result of starting a session
#[derive(Debug)]
pub enum SessionStart {
    /// A deck was built and can be reviewed
    Ready(StudySession),
    /// The cycle ended and its parameters were not kept; the set should be
    /// saved as is and no deck studied
    Halted {
        set: StudySet,
        decision: CycleDecision,
    },
}

/// A finished session, ready to be saved
#[derive(Debug)]
pub struct FinishedSession {
    pub set: StudySet,
    pub report: SessionReport,
    pub rebalance: RebalanceReport,
}

/// Study session context
#[derive(Debug)]
pub struct StudySession {
    set: StudySet,
    deck: Deck,
    decision: CycleDecision,
    started_at: DateTime<Utc>,
}

impl StudySession {
    /// Run the cycle check and build the deck.
    ///
    /// `keep_parameters` is asked only when the cycle is complete.
    pub fn start<F, R>(mut set: StudySet, keep_parameters: F, rng: &mut R) -> Result<SessionStart>
    where
        F: FnOnce(&CycleData) -> Result<bool>,
        R: Rng + ?Sized,
    {
        let decision = cycle::evaluate_cycle(
            &mut set.cycle_data,
            &mut set.term_queues,
            &mut set.score_config,
            keep_parameters,
            rng,
        )?;

        if !decision.may_proceed {
            return Ok(SessionStart::Halted { set, decision });
        }

        let mut deck = deck::build_deck(&mut set.term_queues, &set.cycle_data, rng)?;
        drop_unknown_terms(&mut deck, &set);

        log::info!(
            "Session {} of '{}' ready with {} terms",
            set.total_sessions + 1,
            set.name,
            deck.len()
        );

        Ok(SessionStart::Ready(Self {
            set,
            deck,
            decision,
            started_at: Utc::now(),
        }))
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn set(&self) -> &StudySet {
        &self.set
    }

    pub fn decision(&self) -> &CycleDecision {
        &self.decision
    }

    /// One-based number of this session over the life of the set
    pub fn session_number(&self) -> u32 {
        self.set.total_sessions + 1
    }

    /// Walk the deck with the reviewer until it confirms the end.
    ///
    /// Score and definition edits land in the term dictionary; queue
    /// membership is left for [`finalize`](Self::finalize). A quit returns
    /// [`StudyError::UserAbort`] and the session should be dropped unsaved.
    pub fn review<U, E>(&mut self, reviewer: &mut U, examples: &mut E) -> Result<()>
    where
        U: Reviewer + ?Sized,
        E: ExampleSource + ?Sized,
    {
        let total = self.deck.len();
        if total == 0 {
            log::info!("Deck is empty, nothing to review");
            return Ok(());
        }

        let mut position = 0;
        loop {
            let id = self.deck.terms[position].clone();

            let action = {
                let term = self
                    .set
                    .terms_dict
                    .get(&id)
                    .ok_or_else(|| StudyError::TermNotFound(id.clone()))?;
                let example = examples.example(&id, term)?;
                let card = CardView {
                    position,
                    total,
                    id: &id,
                    term,
                    example: &example,
                };

                reviewer.show_card(&card)?;
                loop {
                    match reviewer.next_action(&card)? {
                        ReviewAction::Reveal => reviewer.reveal(&card)?,
                        other => break other,
                    }
                }
            };

            match action {
                ReviewAction::Score(score) => {
                    if let Some(term) = self.set.terms_dict.get_mut(&id) {
                        term.score = score;
                    }
                    position += 1;
                }
                ReviewAction::Previous => position = position.saturating_sub(1),
                ReviewAction::Next => position += 1,
                ReviewAction::EditDefinition(definition) => {
                    if let Some(term) = self.set.terms_dict.get_mut(&id) {
                        term.definition = definition;
                    }
                }
                ReviewAction::NewContext | ReviewAction::Reveal => {}
                ReviewAction::Quit => {
                    log::info!("Session quit at card {} of {}", position + 1, total);
                    return Err(StudyError::UserAbort);
                }
            }

            if position >= total {
                if reviewer.confirm_finish()? {
                    return Ok(());
                }
                position = total - 1;
            }
        }
    }

    /// Reconcile the queues and record the session
    pub fn finalize(mut self) -> FinishedSession {
        let rebalance = rebalance::rebalance(&mut self.set.term_queues, &self.set.terms_dict);

        let now = Utc::now();
        let report = SessionReport {
            date: now,
            deck: self.deck.stats.clone(),
            cycle: self.set.cycle_data.ncycle,
            changes: rebalance.changes.clone(),
            duration_secs: Some((now - self.started_at).num_seconds()),
        };

        self.set.cycle_data.total_sessions += 1;
        self.set.total_sessions += 1;
        self.set.stats.push(report.clone());

        log::info!(
            "Session {} finished; {} score changes",
            self.set.total_sessions,
            rebalance.total_changes()
        );

        FinishedSession {
            set: self.set,
            report,
            rebalance,
        }
    }
}

/// Remove deck entries whose id has no term, keeping the stats in step
fn drop_unknown_terms(deck: &mut Deck, set: &StudySet) {
    let mut dropped = Vec::new();
    deck.terms.retain(|id| {
        let known = set.terms_dict.contains_key(id);
        if !known {
            dropped.push(id.clone());
        }
        known
    });

    for id in dropped {
        log::warn!("Dropping unknown term {} from the deck", id);
        if let Some(score) = set
            .term_queues
            .iter()
            .find(|(_, queue)| queue.contains(&id))
            .map(|(score, _)| *score)
        {
            if let Some(count) = deck.stats.get_mut(&score) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    deck.stats.remove(&score);
                }
            }
        }
    }
}
