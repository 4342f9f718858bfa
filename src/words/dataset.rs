use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
    pub name: String,
    pub count: u64,
    pub rank: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record has an empty name")]
    EmptyName,
    #[error("count {value:?} is not a non-negative integer")]
    InvalidCount { value: String },
    #[error("rank {value:?} is not a positive integer")]
    InvalidRank { value: String },
    #[error("name {name:?} already appeared earlier in the file")]
    DuplicateName { name: String },
    #[error("unreadable row: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug)]
pub struct RejectedRecord {
    /// 1-based line in the source file, when known.
    pub line: Option<u64>,
    pub error: RecordError,
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<WordRecord>,
    rejected: Vec<RejectedRecord>,
}

impl Dataset {
    /// Builds a dataset from records whose names are already unique.
    #[cfg(test)]
    pub fn from_records(records: Vec<WordRecord>) -> Self {
        Self::with_rejected(records, Vec::new())
    }

    pub(super) fn with_rejected(records: Vec<WordRecord>, rejected: Vec<RejectedRecord>) -> Self {
        Self { records, rejected }
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&WordRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn top_by_rank(&self, limit: usize) -> Vec<&WordRecord> {
        let mut ranked = self.records.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Reorders records with a seeded shuffle. Collision resolution visits
    /// entities in record order, so this changes the packed layout.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.records.shuffle(&mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, count: u64, rank: u32) -> WordRecord {
        WordRecord {
            name: name.to_owned(),
            count,
            rank,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("life", 40, 2),
            record("college", 90, 1),
            record("family", 12, 4),
            record("story", 20, 3),
        ])
    }

    #[test]
    fn looks_up_by_name() {
        let dataset = sample();
        assert_eq!(dataset.get("story").map(|r| r.count), Some(20));
        assert!(dataset.get("missing").is_none());
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn ranking_follows_rank_column() {
        let dataset = sample();
        let names = dataset
            .top_by_rank(3)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["college", "life", "story"]);
    }

    #[test]
    fn shuffle_is_seeded_and_keeps_every_record() {
        let mut first = sample();
        let mut second = sample();
        first.shuffle(7);
        second.shuffle(7);
        assert_eq!(first.records(), second.records());

        for record in first.records() {
            assert_eq!(first.get(&record.name), Some(record));
        }
    }

    #[test]
    fn empty_dataset_is_valid() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.top_by_rank(10).is_empty());
        assert!(dataset.get("anything").is_none());
    }
}
