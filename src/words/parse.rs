use std::collections::HashSet;
use std::io::Read;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::warn;

use super::dataset::{Dataset, RecordError, RejectedRecord, WordRecord};

const REQUIRED_COLUMNS: [&str; 2] = ["name", "count"];

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    count: String,
    #[serde(default)]
    rank: Option<String>,
}

struct Candidate {
    name: String,
    count: u64,
    rank: Option<u32>,
}

fn validate(raw: RawRecord, seen: &mut HashSet<String>) -> Result<Candidate, RecordError> {
    if raw.name.is_empty() {
        return Err(RecordError::EmptyName);
    }

    let count = raw
        .count
        .parse::<u64>()
        .map_err(|_| RecordError::InvalidCount {
            value: raw.count.clone(),
        })?;

    let rank = match raw.rank.filter(|rank| !rank.is_empty()) {
        None => None,
        Some(rank) => match rank.parse::<u32>() {
            Ok(value) if value > 0 => Some(value),
            _ => return Err(RecordError::InvalidRank { value: rank }),
        },
    };

    if !seen.insert(raw.name.clone()) {
        return Err(RecordError::DuplicateName { name: raw.name });
    }

    Ok(Candidate {
        name: raw.name,
        count,
        rank,
    })
}

fn assign_ranks(candidates: Vec<Candidate>) -> Vec<WordRecord> {
    let ranked_count = candidates.iter().filter(|c| c.rank.is_some()).count();

    if ranked_count == 0 {
        let mut order = (0..candidates.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| candidates[b].count.cmp(&candidates[a].count));
        let mut ranks = vec![0u32; candidates.len()];
        for (position, index) in order.into_iter().enumerate() {
            ranks[index] = position as u32 + 1;
        }

        return candidates
            .into_iter()
            .zip(ranks)
            .map(|(candidate, rank)| WordRecord {
                name: candidate.name,
                count: candidate.count,
                rank,
            })
            .collect();
    }

    let mut next_rank = candidates
        .iter()
        .filter_map(|c| c.rank)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    candidates
        .into_iter()
        .map(|candidate| {
            let rank = candidate.rank.unwrap_or_else(|| {
                let rank = next_rank;
                next_rank = next_rank.saturating_add(1);
                rank
            });
            WordRecord {
                name: candidate.name,
                count: candidate.count,
                rank,
            }
        })
        .collect()
}

/// Reads `name,count[,rank]` rows. Bad rows are rejected and reported on the
/// dataset; only a missing header or required column fails the whole read.
pub(super) fn parse_records<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("could not read CSV header row")?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(anyhow!("CSV is missing the required {column:?} column"));
        }
    }

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut rejected = Vec::new();

    for row in csv_reader.records() {
        let outcome = match row {
            Ok(row) => {
                let line = row.position().map(|position| position.line());
                let parsed = row
                    .deserialize::<RawRecord>(Some(&headers))
                    .map_err(|error| RecordError::Malformed(error.to_string()))
                    .and_then(|raw| validate(raw, &mut seen));
                (line, parsed)
            }
            Err(error) => (
                error.position().map(|position| position.line()),
                Err(RecordError::Malformed(error.to_string())),
            ),
        };

        match outcome {
            (_, Ok(candidate)) => candidates.push(candidate),
            (line, Err(error)) => {
                warn!(line = ?line, error = %error, "rejecting word record");
                rejected.push(RejectedRecord { line, error });
            }
        }
    }

    Ok(Dataset::with_rejected(assign_ranks(candidates), rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Dataset {
        parse_records(source.as_bytes()).expect("csv parses")
    }

    #[test]
    fn reads_well_formed_rows() {
        let dataset = parse("name,count,rank\ncollege,120,1\nlife,80,2\n");
        assert_eq!(dataset.len(), 2);
        assert!(dataset.rejected().is_empty());
        assert_eq!(
            dataset.get("life"),
            Some(&WordRecord {
                name: "life".to_owned(),
                count: 80,
                rank: 2,
            })
        );
    }

    #[test]
    fn trims_fields_and_accepts_any_column_order() {
        let dataset = parse("rank, count , name\n 3 , 15 ,  essay \n");
        let record = dataset.get("essay").expect("trimmed name");
        assert_eq!((record.count, record.rank), (15, 3));
    }

    #[test]
    fn rejects_malformed_counts_instead_of_coercing() {
        let dataset = parse("name,count,rank\nok,5,1\nbad,12abc,2\nneg,-3,3\nempty,,4\n");
        assert_eq!(dataset.len(), 1);
        let errors = dataset
            .rejected()
            .iter()
            .map(|r| r.error.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            [
                RecordError::InvalidCount {
                    value: "12abc".to_owned()
                },
                RecordError::InvalidCount {
                    value: "-3".to_owned()
                },
                RecordError::InvalidCount {
                    value: String::new()
                },
            ]
        );
        assert_eq!(dataset.rejected()[0].line, Some(3));
    }

    #[test]
    fn rejects_duplicates_bad_ranks_and_empty_names() {
        let dataset = parse("name,count,rank\nword,5,1\nword,9,2\nother,4,zero\n,3,3\nlast,2,0\n");
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get("word").map(|r| r.count), Some(5));
        let errors = dataset
            .rejected()
            .iter()
            .map(|r| r.error.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            [
                RecordError::DuplicateName {
                    name: "word".to_owned()
                },
                RecordError::InvalidRank {
                    value: "zero".to_owned()
                },
                RecordError::EmptyName,
                RecordError::InvalidRank {
                    value: "0".to_owned()
                },
            ]
        );
    }

    #[test]
    fn assigns_ranks_by_count_when_column_is_missing() {
        let dataset = parse("name,count\nsmall,3\nlarge,50\nmid,20\ntie,20\n");
        let ranks = ["large", "mid", "tie", "small"]
            .into_iter()
            .map(|name| dataset.get(name).map(|r| r.rank))
            .collect::<Vec<_>>();
        assert_eq!(ranks, [Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn fills_missing_ranks_after_the_highest_present_rank() {
        let dataset = parse("name,count,rank\na,10,2\nb,30,\nc,20,5\nd,1,\n");
        assert_eq!(dataset.get("b").map(|r| r.rank), Some(6));
        assert_eq!(dataset.get("d").map(|r| r.rank), Some(7));
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let dataset = parse("name,count,rank\n");
        assert!(dataset.is_empty());
        assert!(dataset.rejected().is_empty());
    }

    #[test]
    fn missing_required_column_fails_the_read() {
        let error = parse_records("word,count\nx,1\n".as_bytes()).expect_err("no name column");
        assert!(error.to_string().contains("\"name\""));
    }
}
