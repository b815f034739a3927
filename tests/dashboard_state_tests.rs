use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use stock_dashboard::dashboard::DashboardState;
use stock_dashboard::input::UiCommand;
use stock_dashboard::model::price::{MaWindow, PriceField, PriceRecord};
use stock_dashboard::model::table::PriceTable;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn table() -> Arc<PriceTable> {
    let mut records = Vec::new();
    for (series, days, base) in [("AAA", 60, 100.0), ("BBB", 30, 50.0), ("CCC", 10, 10.0)] {
        for i in 0..days {
            let close = base + i as f64;
            records.push(PriceRecord {
                series_id: series.to_string(),
                date: d(2024, 1, 1) + Duration::days(i),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 100,
            });
        }
    }
    Arc::new(PriceTable::new(records).unwrap())
}

fn state() -> DashboardState {
    DashboardState::new(table(), PriceField::Close).unwrap()
}

#[test]
fn starts_on_first_series_with_full_span() {
    let state = state();
    assert_eq!(state.series_id(), "AAA");
    assert_eq!(state.requested_range, (d(2024, 1, 1), d(2024, 2, 29)));
    assert_eq!(state.series.as_ref().unwrap().len(), 60);
    let summary = state.summary.as_ref().unwrap();
    assert!((summary.latest_close - 159.0).abs() < 1e-9);
    assert!(state.status.is_none());
}

#[test]
fn unknown_series_keeps_previous_selection() {
    let mut state = state();
    state.select_series("BBB").unwrap();
    assert!(state.select_series("ZZZ").is_err());
    assert_eq!(state.series_id(), "BBB");
    assert_eq!(state.series.as_ref().unwrap().series_id, "BBB");
    assert!(state.log_messages.last().unwrap().contains("ZZZ"));
}

#[test]
fn series_navigation_wraps_and_resets_range() {
    let mut state = state();
    state.set_range(d(2024, 1, 10), d(2024, 1, 20));
    state.next_series();
    assert_eq!(state.series_id(), "BBB");
    assert_eq!(state.requested_range, (d(2024, 1, 1), d(2024, 1, 30)));

    state.prev_series();
    state.prev_series();
    assert_eq!(state.series_id(), "CCC");
}

#[test]
fn toggling_averages_recomputes_columns() {
    let mut state = state();
    state.toggle_average(MaWindow::Ma20);
    state.toggle_average(MaWindow::Ma50);
    let series = state.series.as_ref().unwrap();
    assert!(series.average(MaWindow::Ma20).is_some());
    assert!(series.average(MaWindow::Ma50).unwrap()[49].is_some());

    state.toggle_average(MaWindow::Ma20);
    assert!(state.series.as_ref().unwrap().average(MaWindow::Ma20).is_none());
}

#[test]
fn cycling_price_field_updates_selection() {
    let mut state = state();
    state.cycle_price_field();
    assert_eq!(state.price_field, PriceField::Open);
    assert_eq!(state.series.as_ref().unwrap().price_field, PriceField::Open);
}

#[test]
fn range_shifts_are_clamped_to_the_series() {
    let mut state = state();
    state.shift_start(-30);
    assert_eq!(state.requested_range.0, d(2024, 1, 1));

    state.shift_start(7);
    state.shift_end(-7);
    assert_eq!(state.requested_range, (d(2024, 1, 8), d(2024, 2, 22)));
    assert_eq!(state.series.as_ref().unwrap().len(), 46);

    state.reset_range();
    assert_eq!(state.requested_range, (d(2024, 1, 1), d(2024, 2, 29)));
}

#[test]
fn table_scroll_stays_within_rows() {
    let mut state = state();
    state.select_series("CCC").unwrap();
    state.scroll_table(-3);
    assert_eq!(state.table_scroll, 0);
    state.scroll_table(50);
    assert_eq!(state.table_scroll, 9);
}

#[test]
fn apply_reports_quit_and_exports() {
    let dir = std::env::temp_dir().join(format!("stock-dashboard-state-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut state = state();
    assert!(state.apply(UiCommand::ToggleTable, &dir));
    assert!(state.table_open);
    assert!(state.apply(UiCommand::Export, &dir));
    assert!(dir.join("AAA_data.csv").exists());
    assert!(state.log_messages.last().unwrap().starts_with("Exported"));
    assert!(!state.apply(UiCommand::Quit, &dir));

    std::fs::remove_dir_all(&dir).ok();
}

fn gapped_state() -> DashboardState {
    let records = [(d(2024, 1, 5), 10.0), (d(2024, 1, 8), 11.0)]
        .into_iter()
        .map(|(date, close)| PriceRecord {
            series_id: "AAA".to_string(),
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 5,
        })
        .collect();
    let table = Arc::new(PriceTable::new(records).unwrap());
    DashboardState::new(table, PriceField::Close).unwrap()
}

#[test]
fn one_day_range_start_shift_stops_at_end() {
    let mut state = state();
    state.set_range(d(2024, 1, 5), d(2024, 1, 5));
    state.shift_start(7);
    assert_eq!(state.requested_range, (d(2024, 1, 5), d(2024, 1, 5)));

    state.shift_end(-7);
    assert_eq!(state.requested_range, (d(2024, 1, 5), d(2024, 1, 5)));
    assert_eq!(state.series.as_ref().unwrap().len(), 1);
}

#[test]
fn start_shift_moves_start_not_end() {
    let mut state = state();
    state.set_range(d(2024, 1, 5), d(2024, 1, 20));
    state.shift_start(7);
    assert_eq!(state.requested_range, (d(2024, 1, 12), d(2024, 1, 20)));
    state.shift_start(14);
    assert_eq!(state.requested_range, (d(2024, 1, 20), d(2024, 1, 20)));
}

#[test]
fn empty_selection_is_reported_and_recoverable() {
    let dir = std::env::temp_dir().join(format!("stock-dashboard-empty-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut state = gapped_state();
    state.set_range(d(2024, 1, 6), d(2024, 1, 7));
    assert!(state.series.is_none());
    assert!(state.summary.is_none());
    assert!(state
        .status
        .as_deref()
        .unwrap()
        .starts_with("no data for this selection"));

    assert!(state.apply(UiCommand::Export, &dir));
    assert!(state.log_messages.last().unwrap().starts_with("[ERR]"));
    assert!(!dir.join("AAA_data.csv").exists());

    state.reset_range();
    assert!(state.status.is_none());
    assert_eq!(state.series.as_ref().unwrap().len(), 2);

    std::fs::remove_dir_all(&dir).ok();
}
