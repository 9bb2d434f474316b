//! Cycle boundary bookkeeping
//!
//! A cycle is `cycle_length` sessions long. When the last session of a cycle
//! has been completed the learner is asked whether to keep the cycle
//! parameters. Keeping them starts a new cycle and runs the periodic resets
//! configured per score; declining halts studying until the set is adjusted
//! by hand, with only the score-3 queue reshuffled.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{Result, StudyError};
use super::models::{CycleData, Score, ScoreConfig, TermQueues};

/// Outcome of the pre-session cycle check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDecision {
    /// Whether a deck may be built and studied this session
    pub may_proceed: bool,
    /// Whether the cycle boundary was reached
    pub cycle_ended: bool,
    /// Scores whose periodic reset fired
    pub reset_scores: Vec<Score>,
}

impl CycleDecision {
    fn proceed() -> Self {
        Self {
            may_proceed: true,
            cycle_ended: false,
            reset_scores: Vec::new(),
        }
    }
}

/// Exact end-of-cycle test.
///
/// Equivalent to `cycle_length / total_sessions == 1`: only the session count
/// equal to the cycle length triggers, a count that overshoots never does.
pub fn is_cycle_end(cycle: &CycleData) -> bool {
    cycle.total_sessions != 0 && cycle.total_sessions == cycle.cycle_length
}

/// Check the cycle settings before anything is mutated
pub fn validate(
    cycle: &CycleData,
    queues: &TermQueues,
    configs: &BTreeMap<Score, ScoreConfig>,
) -> Result<()> {
    if cycle.cycle_length == 0 {
        return Err(StudyError::Configuration(
            "cycle_length must be at least 1".to_string(),
        ));
    }

    for (score, config) in configs {
        if config.nreset == 0 {
            return Err(StudyError::InvalidResetInterval {
                score: *score,
                nreset: config.nreset,
            });
        }
        if !queues.contains_key(score) {
            return Err(StudyError::MissingQueue(*score));
        }
    }

    Ok(())
}

/// Run the cycle check that precedes every session.
///
/// `keep_parameters` is only consulted at a cycle boundary. Mutations are
/// applied in place to the structures passed in. A score's `ncycles` only
/// moves when its reset fires.
pub fn evaluate_cycle<F, R>(
    cycle: &mut CycleData,
    queues: &mut TermQueues,
    configs: &mut BTreeMap<Score, ScoreConfig>,
    keep_parameters: F,
    rng: &mut R,
) -> Result<CycleDecision>
where
    F: FnOnce(&CycleData) -> Result<bool>,
    R: Rng + ?Sized,
{
    validate(cycle, queues, configs)?;

    if !is_cycle_end(cycle) {
        return Ok(CycleDecision::proceed());
    }

    log::info!(
        "Cycle {} complete after {} sessions",
        cycle.ncycle,
        cycle.total_sessions
    );

    if !keep_parameters(cycle)? {
        // Counters stay put so the next start asks again
        if let Some(queue) = queues.get_mut(&Score::Known) {
            queue.make_contiguous().shuffle(rng);
        }
        log::info!("Cycle parameters not kept; shuffled score 3 queue only");
        return Ok(CycleDecision {
            may_proceed: false,
            cycle_ended: true,
            reset_scores: Vec::new(),
        });
    }

    cycle.total_sessions = 0;
    cycle.ncycle += 1;

    let mut reset_scores = Vec::new();
    for (score, config) in configs.iter_mut() {
        let queue = queues
            .get_mut(score)
            .ok_or(StudyError::MissingQueue(*score))?;

        if config.ncycles % config.nreset == 0 {
            if config.shuffle {
                queue.make_contiguous().shuffle(rng);
            }
            cycle.score_starts.insert(*score, queue.len());
            config.ncycles += 1;
            reset_scores.push(*score);
            log::debug!(
                "Reset score {} at cycle {}: start marker {}",
                score,
                cycle.ncycle,
                queue.len()
            );
        }
    }

    Ok(CycleDecision {
        may_proceed: true,
        cycle_ended: true,
        reset_scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn queues_with(known: &[&str], mastered: &[&str]) -> TermQueues {
        let mut queues = TermQueues::new();
        for score in Score::ALL {
            queues.insert(score, VecDeque::new());
        }
        queues.insert(Score::Known, known.iter().map(|s| s.to_string()).collect());
        queues.insert(Score::Mastered, mastered.iter().map(|s| s.to_string()).collect());
        queues
    }

    fn config(ncycles: u32, nreset: u32, shuffle: bool) -> ScoreConfig {
        ScoreConfig { ncycles, nreset, shuffle }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_cycle_end_is_exact_equality() {
        let mut cycle = CycleData::new(10, 5);
        cycle.total_sessions = 10;
        assert!(is_cycle_end(&cycle));

        cycle.total_sessions = 9;
        assert!(!is_cycle_end(&cycle));

        cycle.total_sessions = 11;
        assert!(!is_cycle_end(&cycle));

        cycle.total_sessions = 0;
        assert!(!is_cycle_end(&cycle));
    }

    #[test]
    fn test_no_boundary_does_not_prompt() {
        let mut cycle = CycleData::new(10, 5);
        cycle.total_sessions = 9;
        let mut queues = queues_with(&["a"], &[]);
        let mut configs = BTreeMap::new();

        let decision = evaluate_cycle(
            &mut cycle,
            &mut queues,
            &mut configs,
            |_| panic!("prompted outside a cycle boundary"),
            &mut rng(),
        )
        .unwrap();

        assert!(decision.may_proceed);
        assert!(!decision.cycle_ended);
        assert_eq!(cycle.total_sessions, 9);
    }

    #[test]
    fn test_keep_parameters_starts_new_cycle() {
        let mut cycle = CycleData::new(10, 5);
        cycle.total_sessions = 10;
        cycle.ncycle = 4;
        let mut queues = queues_with(&["a", "b", "c"], &["d"]);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Known, config(0, 1, false));
        configs.insert(Score::Mastered, config(0, 1, false));

        let decision =
            evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(true), &mut rng())
                .unwrap();

        assert!(decision.may_proceed);
        assert!(decision.cycle_ended);
        assert_eq!(decision.reset_scores, vec![Score::Known, Score::Mastered]);
        assert_eq!(cycle.total_sessions, 0);
        assert_eq!(cycle.ncycle, 5);
        assert_eq!(cycle.score_starts[&Score::Known], 3);
        assert_eq!(cycle.score_starts[&Score::Mastered], 1);
        assert_eq!(configs[&Score::Known].ncycles, 1);
        // No shuffle configured, order untouched
        assert_eq!(queues[&Score::Known], VecDeque::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_reset_interval_fires_on_modulo() {
        let mut configs = BTreeMap::new();
        configs.insert(Score::Known, config(2, 2, false));
        configs.insert(Score::Mastered, config(1, 2, false));
        let mut queues = queues_with(&["a", "b", "c"], &["x", "y"]);
        let mut cycle = CycleData::new(2, 5);
        cycle.score_starts.insert(Score::Mastered, 9);
        cycle.total_sessions = 2;

        let decision =
            evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(true), &mut rng())
                .unwrap();

        assert_eq!(decision.reset_scores, vec![Score::Known]);
        assert_eq!(cycle.score_starts[&Score::Known], 3);
        assert_eq!(configs[&Score::Known].ncycles, 3);
        // Not due: marker and counter untouched
        assert_eq!(cycle.score_starts[&Score::Mastered], 9);
        assert_eq!(configs[&Score::Mastered].ncycles, 1);
    }

    #[test]
    fn test_counter_waits_while_reset_not_due() {
        let mut configs = BTreeMap::new();
        configs.insert(Score::Mastered, config(1, 2, false));
        let mut queues = queues_with(&[], &["x"]);
        let mut cycle = CycleData::new(3, 5);

        for _ in 0..3 {
            cycle.total_sessions = 3;
            let decision =
                evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(true), &mut rng())
                    .unwrap();
            assert!(decision.reset_scores.is_empty());
            assert_eq!(configs[&Score::Mastered].ncycles, 1);
        }
        assert_eq!(cycle.ncycle, 3);
        assert!(!cycle.score_starts.contains_key(&Score::Mastered));
    }

    #[test]
    fn test_overshot_session_count_does_not_prompt() {
        let mut cycle = CycleData::new(10, 5);
        cycle.total_sessions = 11;
        let mut queues = queues_with(&["a", "b"], &[]);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Known, config(0, 1, true));

        let decision = evaluate_cycle(
            &mut cycle,
            &mut queues,
            &mut configs,
            |_| panic!("prompted past the cycle boundary"),
            &mut rng(),
        )
        .unwrap();

        assert!(decision.may_proceed);
        assert!(!decision.cycle_ended);
        assert_eq!(cycle.total_sessions, 11);
        assert_eq!(cycle.ncycle, 0);
        assert_eq!(configs[&Score::Known].ncycles, 0);
    }

    #[test]
    fn test_exact_session_count_prompts() {
        let mut cycle = CycleData::new(10, 5);
        cycle.total_sessions = 10;
        let mut queues = queues_with(&[], &[]);
        let mut configs = BTreeMap::new();
        let mut asked = false;

        let decision = evaluate_cycle(
            &mut cycle,
            &mut queues,
            &mut configs,
            |_| {
                asked = true;
                Ok(true)
            },
            &mut rng(),
        )
        .unwrap();

        assert!(asked);
        assert!(decision.cycle_ended);
        assert_eq!(cycle.total_sessions, 0);
    }

    #[test]
    fn test_shuffle_keeps_membership() {
        let ids: Vec<String> = (0..20).map(|i| format!("t{}", i)).collect();
        let refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let mut queues = queues_with(&refs, &[]);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Known, config(0, 1, true));
        let mut cycle = CycleData::new(3, 5);
        cycle.total_sessions = 3;

        evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(true), &mut rng()).unwrap();

        let mut after: Vec<String> = queues[&Score::Known].iter().cloned().collect();
        after.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_declining_halts_and_keeps_counters() {
        let mut cycle = CycleData::new(5, 5);
        cycle.total_sessions = 5;
        cycle.ncycle = 2;
        let mut queues = queues_with(&["a", "b", "c", "d"], &["m"]);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Mastered, config(0, 1, true));

        let decision =
            evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(false), &mut rng())
                .unwrap();

        assert!(!decision.may_proceed);
        assert!(decision.cycle_ended);
        assert_eq!(cycle.total_sessions, 5);
        assert_eq!(cycle.ncycle, 2);
        assert_eq!(configs[&Score::Mastered].ncycles, 0);
        assert!(cycle.score_starts.is_empty());
        assert_eq!(queues[&Score::Known].len(), 4);
    }

    #[test]
    fn test_zero_reset_interval_is_configuration_error() {
        let mut cycle = CycleData::new(5, 5);
        let mut queues = queues_with(&[], &[]);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Known, config(0, 0, false));

        let err = evaluate_cycle(&mut cycle, &mut queues, &mut configs, |_| Ok(true), &mut rng())
            .unwrap_err();
        assert!(matches!(err, StudyError::InvalidResetInterval { score: Score::Known, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_without_queue_is_rejected() {
        let mut cycle = CycleData::new(5, 5);
        let mut queues = queues_with(&[], &[]);
        queues.remove(&Score::Mastered);
        let mut configs = BTreeMap::new();
        configs.insert(Score::Mastered, config(0, 1, false));

        let err = validate(&cycle, &queues, &configs).unwrap_err();
        assert!(matches!(err, StudyError::MissingQueue(Score::Mastered)));

        cycle.cycle_length = 0;
        configs.clear();
        assert!(validate(&cycle, &queues, &configs).is_err());
    }
}
