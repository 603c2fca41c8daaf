use crate::columns::to_number;
use crate::dataset::{self, SECTION_COUNT, Table};

/// Best score a competitor posted in one section, with the trick code that
/// produced it. Defaults to `{0, ""}` whenever nothing usable exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionResult {
    pub score: f64,
    pub trick: String,
}

/// The two composite contributions toward the overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub sections: f64,
    pub composition: f64,
}

/// Per-section best results for one competitor, sections 1..=6 in fixed
/// order. A section where the competitor never appears, or where the best
/// score is negative or non-finite, yields the default slot rather than a
/// hole, so chart series always have six entries.
pub fn section_series(table: &Table, name: &str) -> [SectionResult; SECTION_COUNT] {
    std::array::from_fn(|i| best_section(table, name, i + 1))
}

fn best_section(table: &Table, name: &str, section: usize) -> SectionResult {
    let name_col = table.header_index(&dataset::section_name_header(section));
    let score_col = table.header_index(&dataset::section_score_header(section));
    let trick_col = table.header_index(&dataset::section_trick_header(section));
    let (Some(name_col), Some(score_col)) = (name_col, score_col) else {
        return SectionResult::default();
    };

    let mut best: Option<SectionResult> = None;
    for record in &table.records {
        if record.field(name_col) != name {
            continue;
        }
        let score = to_number(record.field(score_col));
        if best.as_ref().is_none_or(|b| score > b.score) {
            let trick = trick_col
                .map(|col| record.field(col).to_string())
                .unwrap_or_default();
            best = Some(SectionResult { score, trick });
        }
    }

    match best {
        Some(result) if result.score.is_finite() && result.score >= 0.0 => result,
        _ => SectionResult::default(),
    }
}

/// Composite totals from the record whose `Score Name` matches; both default
/// to 0 when the competitor has no overall record or the cells don't parse.
pub fn totals(table: &Table, name: &str) -> Totals {
    let Some(name_col) = table.header_index(dataset::OVERALL_NAME) else {
        return Totals::default();
    };
    let Some(record) = table
        .records
        .iter()
        .find(|r| r.field(name_col) == name)
    else {
        return Totals::default();
    };

    let read = |header: &str| {
        table
            .header_index(header)
            .map(|col| to_number(record.field(col)))
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    };
    Totals {
        sections: read(dataset::SECTIONS_TOTAL),
        composition: read(dataset::COMPOSITION_TOTAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_table;

    const CSV: &str = "\
Rank,Score Name,Score(100%),Sections(60%),Composition(40%),S1 Name,S1 Score,S1 Trick,S3 Name,S3 Score,S3 Trick
1,Abe,91.0,55.0,36.0,Abe,88.0,f-3-Mu,Ito,80.0,b-5-St
2,Ito,85.0,50.0,35.0,Abe,92.5,f-5-In,Ito,70.0,b-3-Mu
";

    #[test]
    fn best_score_carries_its_trick() {
        let table = parse_table(CSV).expect("parses");
        let series = section_series(&table, "Abe");
        assert_eq!(series[0].score, 92.5);
        assert_eq!(series[0].trick, "f-5-In");
    }

    #[test]
    fn absent_sections_default_to_zero() {
        let table = parse_table(CSV).expect("parses");
        let series = section_series(&table, "Abe");
        // Abe never appears in section 3, and sections 2/4/5/6 have no columns.
        assert_eq!(series[2], SectionResult::default());
        assert_eq!(series[1], SectionResult::default());
        assert_eq!(series[2].score, 0.0);
        assert_eq!(series[2].trick, "");
    }

    #[test]
    fn unparseable_best_degrades_to_default() {
        let csv = "S1 Name,S1 Score,S1 Trick\nAbe,-,f-3-Mu\n";
        let table = parse_table(csv).expect("parses");
        assert_eq!(section_series(&table, "Abe")[0], SectionResult::default());
    }

    #[test]
    fn totals_default_when_competitor_is_unknown() {
        let table = parse_table(CSV).expect("parses");
        assert_eq!(totals(&table, "Nobody"), Totals::default());
        let known = totals(&table, "Ito");
        assert_eq!(known.sections, 50.0);
        assert_eq!(known.composition, 35.0);
    }
}
