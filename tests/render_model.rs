use sb26_rankings::dataset::parse_table;
use sb26_rankings::render_model::{
    CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
    TOTALS_Y_MAX, build_section_chart, build_table_model, build_totals_chart,
};
use sb26_rankings::sort::SortState;
use sb26_rankings::state::{AppEvent, AppState, apply_event};

fn two_rider_csv() -> String {
    let mut header = String::from("Rank,Score Name,Score(100%),Sections(60%),Composition(40%)");
    for s in 1..=6 {
        header.push_str(&format!(",S{s} Name,S{s} Score,S{s} Trick"));
    }
    let mut lines = vec![header];
    // Two fully populated riders: Abe tops every section, Kimura runs second.
    let mut row1 = String::from("1,Abe,92.5,55.5,37.0");
    let mut row2 = String::from("2,Kimura,88.0,53.0,35.0");
    for s in 1..=6 {
        row1.push_str(&format!(",Abe,{:.1},f-3-Mu", 90.0 + s as f64 * 0.4));
        row2.push_str(&format!(",Kimura,{:.1},b-5-St", 84.0 + s as f64 * 0.5));
    }
    lines.push(row1);
    lines.push(row2);
    lines.join("\n")
}

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    state.load_table(parse_table(&two_rider_csv()).expect("csv should parse"));
    state
}

#[test]
fn end_to_end_two_riders_six_sections() {
    let state = loaded_state();
    assert_eq!(state.slots[0].as_deref(), Some("Abe"));
    assert_eq!(state.slots[1].as_deref(), Some("Kimura"));

    let table = build_table_model(
        &state.table,
        &state.sort,
        &state.order,
        &state.highlights,
        &state.slots,
    );
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.columns.len(), 23);

    let chart = build_section_chart(&state.table, &state.slots);
    assert_eq!(chart.groups.len(), 6);
    for group in &chart.groups {
        assert_eq!(group.bars.len(), 2);
    }
    // Best observed score is Abe's S6 at 92.4.
    assert_eq!(chart.y_max, 93.0);
}

#[test]
fn section_chart_y_max_floors_at_ten() {
    let csv = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score,S1 Trick
1,A,6.0,A,6.0,f-1-Mu
";
    let table = parse_table(csv).expect("parses");
    let chart = build_section_chart(&table, &[Some("A".to_string()), None]);
    assert_eq!(chart.y_max, 10.0);
}

#[test]
fn totals_chart_uses_the_fixed_axis() {
    let state = loaded_state();
    let chart = build_totals_chart(&state.table, &state.slots);
    assert_eq!(chart.y_max, TOTALS_Y_MAX);
    assert_eq!(chart.groups.len(), 2);
    assert_eq!(chart.groups[0].label, "Sections");
    assert_eq!(chart.groups[1].label, "Composition");
    assert_eq!(chart.groups[0].bars[0].value, 55.5);
    assert_eq!(chart.groups[1].bars[1].value, 35.0);
}

#[test]
fn chart_geometry_is_deterministic_and_inside_the_canvas() {
    let state = loaded_state();
    let first = build_section_chart(&state.table, &state.slots);
    let second = build_section_chart(&state.table, &state.slots);
    assert_eq!(first, second);

    let plot_height = CANVAS_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    for group in &first.groups {
        for bar in &group.bars {
            assert!(bar.x >= MARGIN_LEFT);
            assert!(bar.x + bar.width <= CANVAS_WIDTH - MARGIN_RIGHT + 1e-9);
            assert!(bar.height >= 0.0);
            assert!(bar.height <= plot_height + 1e-9);
        }
    }

    assert_eq!(first.ticks.len(), 6);
    assert_eq!(first.ticks[0].value, 0.0);
    assert_eq!(first.ticks[0].y, MARGIN_TOP + plot_height);
    assert_eq!(first.ticks[5].value, first.y_max);
    assert_eq!(first.ticks[5].y, MARGIN_TOP);
}

#[test]
fn empty_slots_produce_chart_frames_without_bars() {
    let state = loaded_state();
    let chart = build_section_chart(&state.table, &[None, None]);
    assert_eq!(chart.groups.len(), 6);
    assert!(chart.groups.iter().all(|g| g.bars.is_empty()));
    assert_eq!(chart.y_max, 10.0);
}

#[test]
fn table_model_tags_columns_rows_and_tooltips() {
    let mut state = loaded_state();
    apply_event(&mut state, AppEvent::SortRequested("Rank".to_string()));
    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Kimura".to_string(),
            color: "cyan".to_string(),
        },
    );

    let model = build_table_model(
        &state.table,
        &state.sort,
        &state.order,
        &state.highlights,
        &state.slots,
    );

    let rank_col = &model.columns[0];
    assert!(rank_col.numeric && rank_col.sortable);
    assert!(rank_col.sort.is_some());
    let name_col = &model.columns[1];
    assert!(!name_col.numeric && name_col.sort.is_none());

    // Rank sorted descending by default: Kimura's row first.
    let first_row = &model.rows[0];
    assert_eq!(first_row.cells[1].text, "Kimura");
    assert_eq!(first_row.cells[1].highlight.as_deref(), Some("cyan"));
    assert_eq!(first_row.cells[1].slot, Some(1));

    // S1 Trick cell carries the translated tooltip.
    let trick_cell = &first_row.cells[7];
    assert_eq!(trick_cell.text, "b-5-St");
    let tooltip = trick_cell.tooltip.as_ref().expect("trick tooltip");
    assert_eq!(tooltip.gloss, "バックサイド・540°・ステイルフィッシュ");

    // Numeric cells carry no markers.
    assert_eq!(first_row.cells[0].highlight, None);
    assert_eq!(first_row.cells[0].slot, None);
    assert_eq!(first_row.cells[0].tooltip, None);
}
