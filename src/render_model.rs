//! Abstract render models. The builders combine the current sort order,
//! selection/highlight state, and aggregates into plain data the drawing
//! surface can render without recomputing anything. Models are rebuilt from
//! scratch on every state change, so a render is always consistent with the
//! latest state.

use crate::aggregate;
use crate::columns::{is_numeric_column, is_sortable_column};
use crate::dataset::{self, SECTION_COUNT, Table};
use crate::sort::{SortDir, SortState};
use crate::state::SELECTION_SLOTS;
use crate::trick::{TrickGloss, translate};

// Fixed chart canvas; geometry is deterministic given data and selection.
pub const CANVAS_WIDTH: f64 = 640.0;
pub const CANVAS_HEIGHT: f64 = 320.0;
pub const MARGIN_LEFT: f64 = 48.0;
pub const MARGIN_RIGHT: f64 = 16.0;
pub const MARGIN_TOP: f64 = 16.0;
pub const MARGIN_BOTTOM: f64 = 32.0;

const AXIS_DIVISIONS: usize = 5;
/// Bars fill this share of a group slot, split evenly across the series.
const GROUP_FILL: f64 = 0.8;

pub const TOTALS_Y_MAX: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub title: String,
    pub numeric: bool,
    pub sortable: bool,
    /// Present only on the active sort column.
    pub sort: Option<SortDir>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellModel {
    pub text: String,
    /// Color tag when this cell names a highlighted competitor.
    pub highlight: Option<String>,
    /// Comparison slot index when this cell names a selected competitor.
    pub slot: Option<usize>,
    /// Translated reading for trick-code cells.
    pub tooltip: Option<TrickGloss>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowModel {
    pub cells: Vec<CellModel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    pub columns: Vec<ColumnModel>,
    pub rows: Vec<RowModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    /// Selection slot this bar belongs to.
    pub series: usize,
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    pub label: String,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartModel {
    pub y_max: f64,
    pub groups: Vec<ChartGroup>,
    pub ticks: Vec<AxisTick>,
}

pub fn build_table_model(
    table: &Table,
    sort: &SortState,
    order: &[usize],
    highlights: &[(String, String)],
    slots: &[Option<String>; SELECTION_SLOTS],
) -> TableModel {
    let columns: Vec<ColumnModel> = table
        .headers
        .iter()
        .map(|h| ColumnModel {
            title: h.clone(),
            numeric: is_numeric_column(h),
            sortable: is_sortable_column(h),
            sort: sort.is_active(h).then_some(sort.dir),
        })
        .collect();

    let name_cols: Vec<bool> = table.headers.iter().map(|h| dataset::is_name_header(h)).collect();
    let trick_cols: Vec<bool> = table
        .headers
        .iter()
        .map(|h| dataset::is_section_trick_header(h))
        .collect();

    let rows = order
        .iter()
        .filter_map(|&idx| table.records.get(idx))
        .map(|record| {
            let cells = table
                .headers
                .iter()
                .enumerate()
                .map(|(col, _)| {
                    let text = record.field(col).to_string();
                    let mut cell = CellModel {
                        text: text.clone(),
                        ..CellModel::default()
                    };
                    if name_cols[col] && !text.is_empty() {
                        cell.highlight = highlights
                            .iter()
                            .find(|(name, _)| *name == text)
                            .map(|(_, color)| color.clone());
                        cell.slot = slots
                            .iter()
                            .position(|slot| slot.as_deref() == Some(text.as_str()));
                    }
                    if trick_cols[col] {
                        let gloss = translate(&text);
                        if !gloss.is_empty() {
                            cell.tooltip = Some(gloss);
                        }
                    }
                    cell
                })
                .collect();
            RowModel { cells }
        })
        .collect();

    TableModel { columns, rows }
}

/// Six section groups with one series per filled selection slot, scaled to a
/// shared y-maximum of `max(10, ceil(best observed score))`.
pub fn build_section_chart(table: &Table, slots: &[Option<String>; SELECTION_SLOTS]) -> ChartModel {
    let series: Vec<(usize, &str, [aggregate::SectionResult; SECTION_COUNT])> = slots
        .iter()
        .enumerate()
        .filter_map(|(slot, name)| {
            name.as_deref()
                .map(|n| (slot, n, aggregate::section_series(table, n)))
        })
        .collect();

    let max_observed = series
        .iter()
        .flat_map(|(_, _, results)| results.iter().map(|r| r.score))
        .fold(0.0_f64, f64::max);
    let y_max = max_observed.ceil().max(10.0);

    let groups = (0..SECTION_COUNT)
        .map(|section| {
            let bars = series
                .iter()
                .map(|(slot, name, results)| (*slot, *name, results[section].score))
                .collect::<Vec<_>>();
            (format!("S{}", section + 1), bars)
        })
        .collect::<Vec<_>>();

    layout_chart(y_max, &groups)
}

/// The `Sections` / `Composition` composite pair, on a fixed 0..=60 axis.
pub fn build_totals_chart(table: &Table, slots: &[Option<String>; SELECTION_SLOTS]) -> ChartModel {
    let series: Vec<(usize, &str, aggregate::Totals)> = slots
        .iter()
        .enumerate()
        .filter_map(|(slot, name)| {
            name.as_deref()
                .map(|n| (slot, n, aggregate::totals(table, n)))
        })
        .collect();

    let groups = vec![
        (
            "Sections".to_string(),
            series
                .iter()
                .map(|(slot, name, totals)| (*slot, *name, totals.sections))
                .collect::<Vec<_>>(),
        ),
        (
            "Composition".to_string(),
            series
                .iter()
                .map(|(slot, name, totals)| (*slot, *name, totals.composition))
                .collect::<Vec<_>>(),
        ),
    ];

    layout_chart(TOTALS_Y_MAX, &groups)
}

fn layout_chart(y_max: f64, groups: &[(String, Vec<(usize, &str, f64)>)]) -> ChartModel {
    let plot_width = CANVAS_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CANVAS_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot_width = plot_width / groups.len().max(1) as f64;

    let groups = groups
        .iter()
        .enumerate()
        .map(|(group_idx, (label, bars))| {
            let series_count = bars.len().max(1) as f64;
            let bar_width = slot_width * GROUP_FILL / series_count;
            let group_x = MARGIN_LEFT + group_idx as f64 * slot_width;
            let inset = slot_width * (1.0 - GROUP_FILL) / 2.0;
            let bars = bars
                .iter()
                .enumerate()
                .map(|(i, (slot, name, value))| {
                    let value = value.max(0.0);
                    ChartBar {
                        series: *slot,
                        label: name.to_string(),
                        value,
                        x: group_x + inset + i as f64 * bar_width,
                        width: bar_width,
                        height: (value / y_max).min(1.0) * plot_height,
                    }
                })
                .collect();
            ChartGroup {
                label: label.clone(),
                bars,
            }
        })
        .collect();

    let ticks = (0..=AXIS_DIVISIONS)
        .map(|i| {
            let frac = i as f64 / AXIS_DIVISIONS as f64;
            AxisTick {
                value: y_max * frac,
                y: MARGIN_TOP + plot_height * (1.0 - frac),
            }
        })
        .collect();

    ChartModel {
        y_max,
        groups,
        ticks,
    }
}
