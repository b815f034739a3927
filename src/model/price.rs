use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day of one series, laid out like a row of the source CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "Stock")]
    pub series_id: String,
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

/// Accepts `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`; the time of day is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparsable date '{}'", raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    pub const ALL: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
        }
    }

    pub fn value_of(self, record: &PriceRecord) -> f64 {
        match self {
            Self::Open => record.open,
            Self::High => record.high,
            Self::Low => record.low,
            Self::Close => record.close,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Open => Self::High,
            Self::High => Self::Low,
            Self::Low => Self::Close,
            Self::Close => Self::Open,
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            other => Err(format!(
                "unknown price field '{}', expected one of Open/High/Low/Close",
                other
            )),
        }
    }
}

/// Moving-average windows the dashboard can overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaWindow {
    Ma20,
    Ma50,
}

impl MaWindow {
    pub const ALL: [MaWindow; 2] = [MaWindow::Ma20, MaWindow::Ma50];

    pub fn period(self) -> usize {
        match self {
            Self::Ma20 => 20,
            Self::Ma50 => 50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ma20 => "MA20",
            Self::Ma50 => "MA50",
        }
    }

    pub fn from_period(period: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.period() == period)
    }
}
