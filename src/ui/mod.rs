pub mod chart;
pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::dashboard::DashboardState;

use chart::{PriceChart, VolumeChart};
use dashboard::{DataTablePanel, KeybindBar, LogPanel, MetricsPanel, StatusBar};

pub fn render(frame: &mut Frame, state: &DashboardState) {
    let table_height = if state.table_open {
        u16::try_from(state.table_rows)
            .unwrap_or(u16::MAX)
            .saturating_add(3)
    } else {
        0
    };
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // status bar
            Constraint::Length(3),            // metric tiles
            Constraint::Min(8),               // price chart
            Constraint::Length(8),            // volume chart
            Constraint::Length(table_height), // raw data
            Constraint::Length(5),            // system log
            Constraint::Length(1),            // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            series_id: state.series_id(),
            series_count: state.series_ids().len(),
            series_position: state
                .series_ids()
                .iter()
                .position(|s| s == state.series_id())
                .unwrap_or(0),
            price_field: state.price_field,
            averages: state.averages.iter().copied().collect(),
            range: state.requested_range,
            rows: state.series.as_ref().map_or(0, |s| s.len()),
        },
        outer[0],
    );

    frame.render_widget(MetricsPanel::new(state.summary.as_ref()), outer[1]);
    frame.render_widget(PriceChart::new(state.series.as_ref()), outer[2]);
    frame.render_widget(VolumeChart::new(state.series.as_ref()), outer[3]);

    if state.table_open {
        frame.render_widget(
            DataTablePanel::new(state.series.as_ref(), state.table_scroll),
            outer[4],
        );
    }

    frame.render_widget(
        LogPanel::new(&state.log_messages, state.status.as_deref()),
        outer[5],
    );
    frame.render_widget(KeybindBar, outer[6]);
}
