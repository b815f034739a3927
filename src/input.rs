use crossterm::event::KeyCode;

use crate::model::price::MaWindow;

/// Days moved by one range-shift keypress.
pub const RANGE_STEP_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    PrevSeries,
    NextSeries,
    CyclePriceField,
    ToggleAverage(MaWindow),
    ShiftStart(i64),
    ShiftEnd(i64),
    ResetRange,
    Export,
    ToggleTable,
    ScrollUp,
    ScrollDown,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Left => Some(UiCommand::PrevSeries),
        KeyCode::Right => Some(UiCommand::NextSeries),
        KeyCode::Up => Some(UiCommand::ScrollUp),
        KeyCode::Down => Some(UiCommand::ScrollDown),
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char('[') => Some(UiCommand::ShiftStart(-RANGE_STEP_DAYS)),
        KeyCode::Char(']') => Some(UiCommand::ShiftStart(RANGE_STEP_DAYS)),
        KeyCode::Char('{') => Some(UiCommand::ShiftEnd(-RANGE_STEP_DAYS)),
        KeyCode::Char('}') => Some(UiCommand::ShiftEnd(RANGE_STEP_DAYS)),
        KeyCode::Char('2') => Some(UiCommand::ToggleAverage(MaWindow::Ma20)),
        KeyCode::Char('5') => Some(UiCommand::ToggleAverage(MaWindow::Ma50)),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'h' => Some(UiCommand::PrevSeries),
            'l' => Some(UiCommand::NextSeries),
            'k' => Some(UiCommand::ScrollUp),
            'j' => Some(UiCommand::ScrollDown),
            'p' => Some(UiCommand::CyclePriceField),
            'r' => Some(UiCommand::ResetRange),
            'e' => Some(UiCommand::Export),
            't' => Some(UiCommand::ToggleTable),
            _ => None,
        },
        _ => None,
    }
}
