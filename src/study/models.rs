//! Data models for a study set

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a term inside `terms_dict`
pub type TermId = String;

/// Score queues keyed by score, each a FIFO of term ids
pub type TermQueues = BTreeMap<Score, VecDeque<TermId>>;

/// Tally of score transitions, keyed by labels like `1->2` or `0<-3`
pub type ChangeTally = BTreeMap<String, usize>;

/// Mastery score of a term
///
/// Scores are stored as the strings `"0"` to `"4"` in the set document.
/// `New` terms have never been scored; `Mastered` terms are seen about once
/// every two cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Score {
    #[serde(rename = "0")]
    New,
    #[serde(rename = "1")]
    Weak,
    #[serde(rename = "2")]
    Familiar,
    #[serde(rename = "3")]
    Known,
    #[serde(rename = "4")]
    Mastered,
}

impl Score {
    pub const ALL: [Score; 5] = [
        Score::New,
        Score::Weak,
        Score::Familiar,
        Score::Known,
        Score::Mastered,
    ];

    pub fn value(self) -> u8 {
        match self {
            Score::New => 0,
            Score::Weak => 1,
            Score::Familiar => 2,
            Score::Known => 3,
            Score::Mastered => 4,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Score {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Score::from_value)
            .ok_or_else(|| format!("invalid score '{}', expected 0-4", s))
    }
}

/// A single memorization unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub score: Score,
    /// Corpus node ids of the lexemes this term covers
    #[serde(default)]
    pub source_lexemes: Vec<u64>,
    /// Hand-picked occurrences, each a group of corpus nodes
    #[serde(default)]
    pub custom_lexemes: Vec<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u32>,
}

impl Term {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            score: Score::New,
            source_lexemes: Vec::new(),
            custom_lexemes: Vec::new(),
            occurrences: None,
        }
    }

    /// Source references an example can be drawn from.
    /// Lexemes take precedence over custom occurrence groups.
    pub fn sources(&self) -> Vec<SourceRef> {
        if !self.source_lexemes.is_empty() {
            self.source_lexemes.iter().copied().map(SourceRef::Lexeme).collect()
        } else {
            self.custom_lexemes.iter().cloned().map(SourceRef::Custom).collect()
        }
    }

    /// Number of occurrences, falling back to the number of custom groups
    pub fn occurrence_count(&self) -> u32 {
        match self.occurrences {
            Some(n) if n > 0 => n,
            _ => self.custom_lexemes.len() as u32,
        }
    }
}

/// A reference into the text corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Lexeme(u64),
    Custom(Vec<u64>),
}

/// Cycle bookkeeping for a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleData {
    /// Sessions per cycle
    pub cycle_length: u32,
    /// Sessions completed in the current cycle
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub ncycle: u32,
    /// Minimum deck size; new terms fill the deck up to this size
    pub deck_min: usize,
    /// Queue length of a score recorded at that score's reset boundary
    #[serde(default)]
    pub score_starts: BTreeMap<Score, usize>,
}

impl CycleData {
    pub fn new(cycle_length: u32, deck_min: usize) -> Self {
        Self {
            cycle_length,
            total_sessions: 0,
            ncycle: 0,
            deck_min,
            score_starts: BTreeMap::new(),
        }
    }
}

/// Periodic reset settings for one score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Position in the reset interval; advances only when the reset fires
    #[serde(default)]
    pub ncycles: u32,
    /// Reset interval in cycles, must be at least 1
    pub nreset: u32,
    #[serde(default)]
    pub shuffle: bool,
}

/// Record of one finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub date: DateTime<Utc>,
    /// Deck composition by score
    pub deck: BTreeMap<Score, usize>,
    pub cycle: u32,
    #[serde(default)]
    pub changes: ChangeTally,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,
}

/// The whole study set document, read and written as one JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySet {
    pub name: String,
    /// Sessions completed over the life of the set
    #[serde(default)]
    pub total_sessions: u32,
    pub terms_dict: BTreeMap<TermId, Term>,
    pub term_queues: TermQueues,
    pub cycle_data: CycleData,
    #[serde(rename = "scoreconfig", default)]
    pub score_config: BTreeMap<Score, ScoreConfig>,
    #[serde(default)]
    pub stats: Vec<SessionReport>,
}

impl StudySet {
    /// Create an empty set with a queue per score and start markers for the
    /// cycle-based scores
    pub fn new(name: impl Into<String>, mut cycle_data: CycleData) -> Self {
        let term_queues = Score::ALL.iter().map(|s| (*s, VecDeque::new())).collect();
        for score in [Score::Known, Score::Mastered] {
            cycle_data.score_starts.entry(score).or_insert(0);
        }
        Self {
            name: name.into(),
            total_sessions: 0,
            terms_dict: BTreeMap::new(),
            term_queues,
            cycle_data,
            score_config: BTreeMap::new(),
            stats: Vec::new(),
        }
    }

    /// Add a term to the dictionary and the tail of its score queue
    pub fn insert_term(&mut self, id: impl Into<TermId>, term: Term) {
        let id = id.into();
        let score = term.score;
        self.terms_dict.insert(id.clone(), term);
        let queue = self.term_queues.entry(score).or_default();
        if !queue.contains(&id) {
            queue.push_back(id);
        }
    }

    /// Current queue lengths by score
    pub fn queue_counts(&self) -> BTreeMap<Score, usize> {
        self.term_queues.iter().map(|(s, q)| (*s, q.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_serializes_as_string() {
        assert_eq!(serde_json::to_string(&Score::Known).unwrap(), "\"3\"");
        let score: Score = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(score, Score::Mastered);
        assert!(serde_json::from_str::<Score>("\"5\"").is_err());
    }

    #[test]
    fn test_score_from_str() {
        assert_eq!("2".parse::<Score>().unwrap(), Score::Familiar);
        assert_eq!(" 0 ".parse::<Score>().unwrap(), Score::New);
        assert!("x".parse::<Score>().is_err());
        assert!("7".parse::<Score>().is_err());
    }

    #[test]
    fn test_score_map_keys() {
        let mut starts = BTreeMap::new();
        starts.insert(Score::Known, 12usize);
        starts.insert(Score::Mastered, 3usize);

        let json = serde_json::to_string(&starts).unwrap();
        assert_eq!(json, r#"{"3":12,"4":3}"#);
    }

    #[test]
    fn test_term_sources_prefer_lexemes() {
        let mut term = Term::new("dabar", "word");
        term.source_lexemes = vec![1, 2];
        term.custom_lexemes = vec![vec![9]];
        assert_eq!(term.sources(), vec![SourceRef::Lexeme(1), SourceRef::Lexeme(2)]);

        term.source_lexemes.clear();
        assert_eq!(term.sources(), vec![SourceRef::Custom(vec![9])]);
    }

    #[test]
    fn test_occurrence_count_falls_back_to_custom() {
        let mut term = Term::new("melek", "king");
        term.custom_lexemes = vec![vec![1], vec![2], vec![3]];
        assert_eq!(term.occurrence_count(), 3);

        term.occurrences = Some(2530);
        assert_eq!(term.occurrence_count(), 2530);
    }

    #[test]
    fn test_insert_term_enqueues_by_score() {
        let mut set = StudySet::new("test", CycleData::new(10, 5));
        let mut term = Term::new("bayit", "house");
        term.score = Score::Weak;
        set.insert_term("t1", term);

        assert_eq!(set.term_queues[&Score::Weak], VecDeque::from(vec!["t1".to_string()]));
        assert_eq!(set.queue_counts()[&Score::New], 0);
        assert_eq!(set.cycle_data.score_starts[&Score::Known], 0);
    }

    #[test]
    fn test_study_set_document_shape() {
        let json = r#"{
            "name": "Hebrew",
            "terms_dict": {
                "1": {"term": "ab", "definition": "father", "score": "1", "source_lexemes": [5]}
            },
            "term_queues": {"0": [], "1": ["1"], "2": [], "3": [], "4": []},
            "cycle_data": {"cycle_length": 10, "total_sessions": 3, "ncycle": 2, "deck_min": 20,
                           "score_starts": {"3": 40, "4": 10}},
            "scoreconfig": {"3": {"ncycles": 1, "nreset": 1, "shuffle": true}},
            "stats": []
        }"#;

        let set: StudySet = serde_json::from_str(json).unwrap();
        assert_eq!(set.terms_dict["1"].score, Score::Weak);
        assert_eq!(set.cycle_data.score_starts[&Score::Known], 40);
        assert!(set.score_config[&Score::Known].shuffle);

        let out = serde_json::to_value(&set).unwrap();
        assert!(out.get("scoreconfig").is_some());
        assert!(out["terms_dict"]["1"].get("occurrences").is_none());
    }
}
