//! Daily deck construction
//!
//! Each session pulls a quota of terms from every scored queue:
//! - score 4: `ceil(starts[4] / cycle_length / 2)`, seen about every two cycles
//! - score 3: `ceil(starts[3] / cycle_length)`, seen about once a cycle
//! - score 2: `ceil(len(queue 2) / 4)`, seen about every 4 sessions
//! - score 1: `ceil(len(queue 1) / 2)`, seen about every other session
//!
//! Pulled terms are rotated to the back of their own queue. Remaining space
//! up to `deck_min` is filled with new terms, which are not rotated: they
//! keep coming back until they receive a score.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{Result, StudyError};
use super::models::{CycleData, Score, TermId, TermQueues};

/// Order in which scored queues are pulled
const QUOTA_ORDER: [Score; 4] = [Score::Weak, Score::Familiar, Score::Known, Score::Mastered];

/// Terms selected for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub terms: Vec<TermId>,
    /// Deck composition by score
    pub stats: BTreeMap<Score, usize>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn push(&mut self, id: TermId, score: Score) {
        self.terms.push(id);
        *self.stats.entry(score).or_insert(0) += 1;
    }
}

/// Per-score quotas for the scored queues.
///
/// Depends only on the start markers, the cycle length and the current queue
/// lengths. Every quota is clamped to the length of its queue.
pub fn compute_quotas(queues: &TermQueues, cycle: &CycleData) -> Result<BTreeMap<Score, usize>> {
    if cycle.cycle_length == 0 {
        return Err(StudyError::Configuration(
            "cycle_length must be at least 1".to_string(),
        ));
    }
    let cycle_len = cycle.cycle_length as usize;
    let count = |score: Score| queues.get(&score).map_or(0, |q| q.len());
    let start = |score: Score| -> Result<usize> {
        cycle.score_starts.get(&score).copied().ok_or_else(|| {
            StudyError::Configuration(format!("score_starts has no entry for score {}", score))
        })
    };

    let mut quotas = BTreeMap::new();
    for score in QUOTA_ORDER {
        let available = count(score);
        let quota = if available == 0 {
            0
        } else {
            match score {
                Score::Mastered => start(score)?.div_ceil(cycle_len * 2),
                Score::Known => start(score)?.div_ceil(cycle_len),
                Score::Familiar => available.div_ceil(4),
                _ => available.div_ceil(2),
            }
        };
        let clamped = quota.min(available);
        if clamped < quota {
            log::debug!(
                "Quota for score {} clamped from {} to queue length {}",
                score,
                quota,
                available
            );
        }
        quotas.insert(score, clamped);
    }

    Ok(quotas)
}

/// Assemble the deck in pull order, rotating the scored queues.
pub fn assemble_deck(queues: &mut TermQueues, cycle: &CycleData) -> Result<Deck> {
    let quotas = compute_quotas(queues, cycle)?;
    let mut deck = Deck::default();

    for score in QUOTA_ORDER {
        let quota = quotas.get(&score).copied().unwrap_or(0);
        let Some(queue) = queues.get_mut(&score) else {
            continue;
        };
        for _ in 0..quota {
            let Some(id) = queue.pop_front() else {
                break;
            };
            queue.push_back(id.clone());
            deck.push(id, score);
        }
    }

    if let Some(new_terms) = queues.get(&Score::New) {
        for id in new_terms {
            if deck.len() >= cycle.deck_min {
                break;
            }
            deck.push(id.clone(), Score::New);
        }
    }

    Ok(deck)
}

/// Build the session deck: assemble it, then shuffle the presentation order.
pub fn build_deck<R: Rng + ?Sized>(
    queues: &mut TermQueues,
    cycle: &CycleData,
    rng: &mut R,
) -> Result<Deck> {
    let mut deck = assemble_deck(queues, cycle)?;
    deck.terms.shuffle(rng);
    log::info!("Built deck of {} terms: {:?}", deck.len(), deck.stats);
    Ok(deck)
}
