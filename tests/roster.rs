use sb26_rankings::dataset::parse_table;
use sb26_rankings::roster::competitor_summaries;

#[test]
fn orders_by_score_then_rank_then_name() {
    // B and C tie on score; C has no rank, so the pair falls through to the
    // name compare rather than treating a defined rank as a win.
    let csv = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score
2,A,80,A,70
1,B,95,B,90
-,C,95,C,88
";
    let table = parse_table(csv).expect("parses");
    let summaries = competitor_summaries(&table);
    let order: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(order, ["B", "C", "A"]);
    assert_eq!(summaries[0].rank, Some(1));
    assert_eq!(summaries[1].rank, None);
}

#[test]
fn names_are_deduplicated_across_sections() {
    let csv = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score,S2 Name,S2 Score
1,A,90,A,85,A,88
2,B,80,B,75,A,82
";
    let table = parse_table(csv).expect("parses");
    let summaries = competitor_summaries(&table);
    assert_eq!(summaries.len(), 2);
}

#[test]
fn section_only_competitors_get_no_rank_and_sort_last() {
    let csv = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score
1,A,90,Guest,85
";
    let table = parse_table(csv).expect("parses");
    let summaries = competitor_summaries(&table);
    // A never appears in a section name field, so only Guest is a competitor.
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Guest");
    assert_eq!(summaries[0].rank, None);
    assert_eq!(summaries[0].score, f64::NEG_INFINITY);
}

#[test]
fn labels_combine_rank_and_name_when_rank_is_known() {
    let csv = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score
1,A,90,A,85
-,B,70,B,65
";
    let table = parse_table(csv).expect("parses");
    let summaries = competitor_summaries(&table);
    assert_eq!(summaries[0].label(), "1. A");
    assert_eq!(summaries[1].label(), "B");
}
