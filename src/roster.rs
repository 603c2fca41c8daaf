use std::cmp::Ordering;
use std::collections::HashSet;

use crate::columns::to_number;
use crate::dataset::{self, Table};

/// One competitor derived from the dataset: the overall rank and score are
/// looked up on the record whose `Score Name` matches. Built once per load,
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorSummary {
    pub name: String,
    pub rank: Option<u32>,
    pub score: f64,
}

impl CompetitorSummary {
    /// Display label for selection menus: rank-prefixed when the rank is known.
    pub fn label(&self) -> String {
        match self.rank {
            Some(rank) => format!("{rank}. {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Every distinct competitor appearing in any per-section name field, ordered
/// for selection menus: overall score descending, then rank ascending (only
/// when both entries have one), then name ascending. The rank comparison is
/// deliberately skipped when either side lacks a rank; partially ranked pairs
/// fall straight through to the name tie-break.
pub fn competitor_summaries(table: &Table) -> Vec<CompetitorSummary> {
    let section_cols: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| dataset::is_section_name_header(h))
        .map(|(idx, _)| idx)
        .collect();

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in &table.records {
        for &col in &section_cols {
            let name = record.field(col);
            if !name.is_empty() && seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }

    let mut summaries: Vec<CompetitorSummary> = names
        .into_iter()
        .map(|name| {
            let overall = table
                .records
                .iter()
                .find(|r| table.value(r, dataset::OVERALL_NAME) == name);
            let rank = overall
                .and_then(|r| table.value(r, dataset::RANK).trim().parse::<u32>().ok());
            let score = overall
                .map(|r| to_number(table.value(r, dataset::OVERALL_SCORE)))
                .unwrap_or(f64::NEG_INFINITY);
            CompetitorSummary { name, rank, score }
        })
        .collect();

    summaries.sort_by(compare_summaries);
    summaries
}

/// Name ties compare ordinally (byte order), not with locale-aware collation;
/// deterministic everywhere and identical for the romanized rosters these
/// exports carry.
fn compare_summaries(a: &CompetitorSummary, b: &CompetitorSummary) -> Ordering {
    match b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal) {
        Ordering::Equal => {}
        ord => return ord,
    }
    if let (Some(ra), Some(rb)) = (a.rank, b.rank) {
        match ra.cmp(&rb) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    a.name.cmp(&b.name)
}
