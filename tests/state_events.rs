use sb26_rankings::dataset::parse_table;
use sb26_rankings::sort::SortDir;
use sb26_rankings::state::{AppEvent, AppState, apply_event};

const CSV: &str = "\
Rank,Score Name,Score(100%),S1 Name,S1 Score,S1 Trick
1,Abe,93.4,Abe,94.5,f-3-Mu
2,Kimura,91.2,Kimura,91.0,cab-7-In
3,Sato,88.75,Sato,88.0,b-5-St
4,Mori,85.5,Mori,84.5,f-5-Ta
";

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    state.load_table(parse_table(CSV).expect("csv should parse"));
    state
}

#[test]
fn load_auto_selects_the_top_two_competitors() {
    let state = loaded_state();
    assert_eq!(state.slots[0].as_deref(), Some("Abe"));
    assert_eq!(state.slots[1].as_deref(), Some("Kimura"));
    assert!(state.highlights.is_empty());
    assert_eq!(state.order, [0, 1, 2, 3]);
}

#[test]
fn sort_event_defaults_descending_for_numeric_and_toggles() {
    let mut state = loaded_state();
    apply_event(&mut state, AppEvent::SortRequested("S1 Score".to_string()));
    assert_eq!(state.sort.key.as_deref(), Some("S1 Score"));
    assert_eq!(state.sort.dir, SortDir::Descending);
    assert_eq!(state.order, [0, 1, 2, 3]);

    apply_event(&mut state, AppEvent::SortRequested("S1 Score".to_string()));
    assert_eq!(state.sort.dir, SortDir::Ascending);
    assert_eq!(state.order, [3, 2, 1, 0]);
}

#[test]
fn text_columns_sort_ascending_through_events() {
    let mut state = loaded_state();
    apply_event(&mut state, AppEvent::SortRequested("S1 Name".to_string()));
    assert_eq!(state.sort.key.as_deref(), Some("S1 Name"));
    assert_eq!(state.sort.dir, SortDir::Ascending);
    // Abe, Kimura, Mori, Sato by name.
    assert_eq!(state.order, [0, 1, 3, 2]);
}

#[test]
fn trick_columns_sort_too() {
    let mut state = loaded_state();
    apply_event(&mut state, AppEvent::SortRequested("S1 Trick".to_string()));
    assert_eq!(state.sort.key.as_deref(), Some("S1 Trick"));
    // b-5-St, cab-7-In, f-3-Mu, f-5-Ta ordinally.
    assert_eq!(state.order, [2, 1, 0, 3]);
}

#[test]
fn unknown_competitor_selection_is_rejected() {
    let mut state = loaded_state();
    apply_event(
        &mut state,
        AppEvent::SelectionChanged {
            slot: 0,
            name: Some("Nobody".to_string()),
        },
    );
    assert_eq!(state.slots[0].as_deref(), Some("Abe"));
    assert!(state.logs.iter().any(|l| l.contains("Unknown competitor")));
}

#[test]
fn slots_can_be_emptied() {
    let mut state = loaded_state();
    apply_event(&mut state, AppEvent::SelectionChanged { slot: 1, name: None });
    assert_eq!(state.slots[1], None);
}

#[test]
fn highlight_cap_rejects_a_fourth_entry_unchanged() {
    let mut state = loaded_state();
    for name in ["Abe", "Kimura", "Sato"] {
        apply_event(
            &mut state,
            AppEvent::HighlightAdded {
                name: name.to_string(),
                color: "yellow".to_string(),
            },
        );
    }
    assert_eq!(state.highlights.len(), 3);

    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Mori".to_string(),
            color: "cyan".to_string(),
        },
    );
    assert_eq!(state.highlights.len(), 3);
    assert!(!state.highlights.iter().any(|(n, _)| n == "Mori"));
    assert!(state.logs.iter().any(|l| l.contains("Highlight limit")));
}

#[test]
fn re_adding_a_highlight_updates_its_color() {
    let mut state = loaded_state();
    for (name, color) in [("Abe", "yellow"), ("Kimura", "cyan"), ("Sato", "magenta")] {
        apply_event(
            &mut state,
            AppEvent::HighlightAdded {
                name: name.to_string(),
                color: color.to_string(),
            },
        );
    }
    // Already-highlighted names bypass the cap and just recolor.
    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Abe".to_string(),
            color: "red".to_string(),
        },
    );
    assert_eq!(state.highlights.len(), 3);
    assert_eq!(state.highlights[0], ("Abe".to_string(), "red".to_string()));
}

#[test]
fn highlights_can_be_removed_recolored_and_cleared() {
    let mut state = loaded_state();
    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Abe".to_string(),
            color: "yellow".to_string(),
        },
    );
    apply_event(
        &mut state,
        AppEvent::HighlightColorChanged {
            name: "Abe".to_string(),
            color: "cyan".to_string(),
        },
    );
    assert_eq!(state.highlights[0].1, "cyan");

    apply_event(
        &mut state,
        AppEvent::HighlightColorChanged {
            name: "Kimura".to_string(),
            color: "red".to_string(),
        },
    );
    assert!(state.logs.iter().any(|l| l.contains("Not highlighted")));

    apply_event(&mut state, AppEvent::HighlightRemoved("Abe".to_string()));
    assert!(state.highlights.is_empty());

    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Sato".to_string(),
            color: "yellow".to_string(),
        },
    );
    apply_event(&mut state, AppEvent::HighlightsCleared);
    assert!(state.highlights.is_empty());
}

#[test]
fn reload_resets_selection_state() {
    let mut state = loaded_state();
    apply_event(
        &mut state,
        AppEvent::HighlightAdded {
            name: "Abe".to_string(),
            color: "yellow".to_string(),
        },
    );
    apply_event(&mut state, AppEvent::SortRequested("Rank".to_string()));
    state.load_table(parse_table(CSV).expect("csv should parse"));
    assert!(state.highlights.is_empty());
    assert_eq!(state.sort.key, None);
    assert_eq!(state.order, [0, 1, 2, 3]);
}
