//! Post-session queue rebalancing
//!
//! After a session the scores in `terms_dict` may no longer match the queue
//! each term sits in. Rebalancing moves every such term to the tail of the
//! queue for its new score and tallies the transitions for the session report.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::models::{ChangeTally, Score, Term, TermId, TermQueues};

/// What a rebalance changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebalanceReport {
    /// Score transitions, e.g. `1->2` for a raise and `0<-3` for a drop
    pub changes: ChangeTally,
    /// Queued ids with no entry in the term dictionary, left in place
    pub orphaned: Vec<TermId>,
    /// Terms that were in no queue and were appended to their score's queue
    pub enqueued: Vec<TermId>,
    /// Extra queue entries of an id that was already queued, removed
    pub duplicates: Vec<TermId>,
}

impl RebalanceReport {
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
            && self.orphaned.is_empty()
            && self.enqueued.is_empty()
            && self.duplicates.is_empty()
    }

    /// Whether the queues were modified
    pub fn changed_queues(&self) -> bool {
        !self.changes.is_empty() || !self.enqueued.is_empty() || !self.duplicates.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.changes.values().sum()
    }
}

/// Tally label for a score transition
pub fn transition_label(from: Score, to: Score) -> String {
    if to > from {
        format!("{}->{}", from, to)
    } else {
        format!("{}<-{}", to, from)
    }
}

struct Move {
    id: TermId,
    from: Score,
    to: Score,
}

/// Keep a single entry per id across all queues.
///
/// The entry in the queue matching the term's score wins; otherwise the first
/// entry in score order does. Returns the ids of the removed entries.
fn drop_duplicates(queues: &mut TermQueues, terms: &BTreeMap<TermId, Term>) -> Vec<TermId> {
    let mut keeper: HashMap<TermId, Score> = HashMap::new();
    for (score, queue) in queues.iter() {
        for id in queue {
            let in_place = terms.get(id).map_or(false, |t| t.score == *score);
            if in_place || !keeper.contains_key(id) {
                keeper.insert(id.clone(), *score);
            }
        }
    }

    let mut dropped = Vec::new();
    let mut kept: HashSet<TermId> = HashSet::new();
    for (score, queue) in queues.iter_mut() {
        queue.retain(|id| {
            if keeper.get(id) == Some(score) && kept.insert(id.clone()) {
                true
            } else {
                log::warn!("Dropping duplicate entry {} from queue {}", id, score);
                dropped.push(id.clone());
                false
            }
        });
    }

    dropped
}

/// Reconcile queue membership with the live term scores.
///
/// Duplicate entries are dropped first. Moves are then collected from a
/// snapshot of the queues before any queue is touched, so every queued id is
/// visited exactly once.
pub fn rebalance(queues: &mut TermQueues, terms: &BTreeMap<TermId, Term>) -> RebalanceReport {
    let mut report = RebalanceReport {
        duplicates: drop_duplicates(queues, terms),
        ..RebalanceReport::default()
    };
    let mut moves = Vec::new();

    for (score, queue) in queues.iter() {
        for id in queue {
            match terms.get(id) {
                Some(term) if term.score != *score => moves.push(Move {
                    id: id.clone(),
                    from: *score,
                    to: term.score,
                }),
                Some(_) => {}
                None => {
                    log::warn!("Queue {} references unknown term {}, skipping", score, id);
                    report.orphaned.push(id.clone());
                }
            }
        }
    }

    for Move { id, from, to } in moves {
        *report.changes.entry(transition_label(from, to)).or_insert(0) += 1;

        if let Some(old) = queues.get_mut(&from) {
            if let Some(pos) = old.iter().position(|queued| *queued == id) {
                old.remove(pos);
            }
        }
        let target = queues.entry(to).or_default();
        if !target.contains(&id) {
            target.push_back(id);
        }
    }

    let queued: HashSet<&TermId> = queues.values().flatten().collect();
    let unqueued: Vec<(TermId, Score)> = terms
        .iter()
        .filter(|(id, _)| !queued.contains(id))
        .map(|(id, term)| (id.clone(), term.score))
        .collect();

    for (id, score) in unqueued {
        log::warn!("Term {} was in no queue, appending to queue {}", id, score);
        queues.entry(score).or_default().push_back(id.clone());
        report.enqueued.push(id);
    }

    if !report.changes.is_empty() {
        log::info!("Rebalanced {} terms: {:?}", report.total_changes(), report.changes);
    }

    report
}

/// Check that every term sits in exactly one queue, the one matching its score
pub fn find_misplaced(queues: &TermQueues, terms: &BTreeMap<TermId, Term>) -> Vec<TermId> {
    let mut seen: BTreeMap<&TermId, usize> = BTreeMap::new();
    let mut misplaced = Vec::new();

    for (score, queue) in queues {
        for id in queue {
            *seen.entry(id).or_insert(0) += 1;
            if terms.get(id).map_or(true, |t| t.score != *score) {
                misplaced.push(id.clone());
            }
        }
    }

    for id in terms.keys() {
        if seen.get(id).copied().unwrap_or(0) != 1 && !misplaced.contains(id) {
            misplaced.push(id.clone());
        }
    }

    misplaced
}
