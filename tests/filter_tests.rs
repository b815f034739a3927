use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use stock_dashboard::error::AppError;
use stock_dashboard::filter::{filter, FilterRequest, TimeSeriesFilter};
use stock_dashboard::model::price::{MaWindow, PriceField, PriceRecord};
use stock_dashboard::model::table::PriceTable;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(series: &str, date: NaiveDate, close: f64) -> PriceRecord {
    PriceRecord {
        series_id: series.to_string(),
        date,
        open: close - 1.0,
        high: close + 2.0,
        low: close - 2.0,
        close,
        volume: 1_000 + close as u64,
    }
}

/// `days` consecutive days from 2024-01-01 with close = 1, 2, 3, ...
fn daily_series(series: &str, days: usize) -> Vec<PriceRecord> {
    (0..days)
        .map(|i| record(series, d(2024, 1, 1) + Duration::days(i as i64), (i + 1) as f64))
        .collect()
}

fn table_of(records: Vec<PriceRecord>) -> PriceTable {
    PriceTable::new(records).expect("valid table")
}

#[test]
fn full_range_is_sorted_and_unique() {
    let mut records = daily_series("AAA", 30);
    records.reverse();
    records.extend(daily_series("BBB", 10));
    let table = table_of(records);

    let request = FilterRequest::full_span(&table, "AAA", PriceField::Close).unwrap();
    let series = filter(&table, &request).unwrap();

    assert_eq!(series.len(), 30);
    let dates = series.dates();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert!(series.records().all(|r| r.series_id == "AAA"));
}

#[test]
fn ma20_example_over_twenty_five_days() {
    let table = table_of(daily_series("AAA", 25));
    let request = FilterRequest::new("AAA", d(2024, 1, 1), d(2024, 1, 25), PriceField::Close)
        .with_average(MaWindow::Ma20);
    let series = filter(&table, &request).unwrap();

    let ma20 = series.average(MaWindow::Ma20).unwrap();
    assert!(ma20[..19].iter().all(Option::is_none));
    assert_eq!(series.rows[19].record.date, d(2024, 1, 20));
    // mean(1..=20) = 10.5
    assert!((ma20[19].unwrap() - 10.5).abs() < 1e-9);
    // mean(6..=25) = 15.5
    assert!((ma20[24].unwrap() - 15.5).abs() < 1e-9);
    assert!(series.average(MaWindow::Ma50).is_none());
}

#[test]
fn moving_averages_match_naive_window_means() {
    let records: Vec<PriceRecord> = (0..120)
        .map(|i| {
            let close = 100.0 + ((i * 37) % 17) as f64 * 0.75 - (i % 5) as f64;
            record("AAA", d(2023, 1, 1) + Duration::days(i), close)
        })
        .collect();
    let table = table_of(records);
    let request = FilterRequest::full_span(&table, "AAA", PriceField::High)
        .unwrap()
        .with_average(MaWindow::Ma20)
        .with_average(MaWindow::Ma50);
    let series = filter(&table, &request).unwrap();
    let values = series.price_values();

    for window in MaWindow::ALL {
        let w = window.period();
        let column = series.average(window).unwrap();
        for (i, got) in column.iter().enumerate() {
            if i + 1 < w {
                assert_eq!(*got, None, "{} at {}", window.label(), i);
            } else {
                let expected = values[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
                assert!((got.unwrap() - expected).abs() < 1e-9, "{} at {}", window.label(), i);
            }
        }
    }
}

#[test]
fn averages_use_only_rows_inside_the_range() {
    let table = table_of(daily_series("AAA", 60));
    let request = FilterRequest::new("AAA", d(2024, 1, 31), d(2024, 2, 29), PriceField::Close)
        .with_average(MaWindow::Ma20);
    let series = filter(&table, &request).unwrap();
    let ma20 = series.average(MaWindow::Ma20).unwrap();

    // No look-back into January even though the table has it.
    assert!(ma20[..19].iter().all(Option::is_none));
    // rows start at close 31, so the first defined mean is mean(31..=50)
    assert!((ma20[19].unwrap() - 40.5).abs() < 1e-9);
}

#[test]
fn unknown_series_is_not_found() {
    let table = table_of(daily_series("AAA", 5));
    let request = FilterRequest::new("ZZZ", d(2024, 1, 1), d(2024, 1, 5), PriceField::Close);
    match filter(&table, &request) {
        Err(AppError::SeriesNotFound(id)) => assert_eq!(id, "ZZZ"),
        other => panic!("expected SeriesNotFound, got {:?}", other),
    }
    assert!(FilterRequest::full_span(&table, "ZZZ", PriceField::Close).is_err());
}

#[test]
fn inverted_range_is_swapped_not_rejected() {
    let table = table_of(daily_series("AAA", 10));
    let request = FilterRequest::new("AAA", d(2024, 1, 8), d(2024, 1, 3), PriceField::Close);
    let series = filter(&table, &request).unwrap();
    assert_eq!(series.range, (d(2024, 1, 3), d(2024, 1, 8)));
    assert_eq!(series.len(), 6);
}

#[test]
fn strict_filter_rejects_inverted_range() {
    let filter = TimeSeriesFilter::new(Arc::new(table_of(daily_series("AAA", 10))));
    let request = FilterRequest::new("AAA", d(2024, 1, 8), d(2024, 1, 3), PriceField::Close);
    assert!(matches!(
        filter.filter_strict(&request),
        Err(AppError::InvalidRange { .. })
    ));
}

#[test]
fn out_of_bounds_range_clamps_to_series_span() {
    let table = table_of(daily_series("AAA", 10));

    let wide = FilterRequest::new("AAA", d(2000, 1, 1), d(2030, 1, 1), PriceField::Close);
    let series = filter(&table, &wide).unwrap();
    assert_eq!(series.range, (d(2024, 1, 1), d(2024, 1, 10)));
    assert_eq!(series.len(), 10);

    let after = FilterRequest::new("AAA", d(2025, 1, 1), d(2025, 6, 1), PriceField::Close);
    let series = filter(&table, &after).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.rows[0].record.date, d(2024, 1, 10));
}

#[test]
fn filtering_leaves_shared_table_untouched() {
    let table = Arc::new(table_of(daily_series("AAA", 30)));
    let before = table.records("AAA").unwrap().to_vec();
    let filter = TimeSeriesFilter::new(table.clone());

    let request = FilterRequest::full_span(&table, "AAA", PriceField::Open)
        .unwrap()
        .with_average(MaWindow::Ma20);
    let first = filter.filter(&request).unwrap();
    let second = filter.filter(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(table.records("AAA").unwrap(), before.as_slice());
}

#[test]
fn price_field_selects_averaged_column() {
    let table = table_of(daily_series("AAA", 20));
    let request = FilterRequest::full_span(&table, "AAA", PriceField::Open)
        .unwrap()
        .with_average(MaWindow::Ma20);
    let series = filter(&table, &request).unwrap();
    // open = close - 1, so mean(open) = 10.5 - 1
    let last = series.rows.last().unwrap().average(MaWindow::Ma20).unwrap();
    assert!((last - 9.5).abs() < 1e-9);
}

#[test]
fn range_inside_a_trading_gap_is_empty_series() {
    // Rows on Friday 5th and Monday 8th; the weekend lies inside the span.
    let table = table_of(vec![
        record("AAA", d(2024, 1, 5), 10.0),
        record("AAA", d(2024, 1, 8), 11.0),
    ]);
    let request = FilterRequest::new("AAA", d(2024, 1, 6), d(2024, 1, 7), PriceField::Close);
    match filter(&table, &request) {
        Err(AppError::EmptySeries(msg)) => assert!(msg.contains("AAA"), "{}", msg),
        other => panic!("expected EmptySeries, got {:?}", other),
    }
}
