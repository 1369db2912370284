//! Minute-of-day arithmetic and the time-of-day filter driven by the slider.

use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Number of minutes in a day, and the number of buckets per sequence.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Half-width of the window selected around the slider position.
pub const WINDOW_HALF_WIDTH: u16 = 60;

/// Slider value meaning "any time".
pub const ANY_TIME_SENTINEL: i32 = -1;

/// A local wall-clock minute, `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minute: u16) -> Result<Self> {
        if minute >= MINUTES_PER_DAY {
            bail!("minute of day {} out of range 0..{}", minute, MINUTES_PER_DAY);
        }
        Ok(Self(minute))
    }

    /// Hour and minute fields of `ts`, seconds discarded.
    pub fn of(ts: &NaiveDateTime) -> Self {
        // hour() < 24 and minute() < 60, so this is always in range
        Self((ts.hour() * 60 + ts.minute()) as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Short 12-hour clock label, e.g. `8:05 AM`.
    pub fn label(self) -> String {
        let hour = self.0 / 60;
        let minute = self.0 % 60;
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour12, minute, suffix)
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Which part of the day trips are counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// No filter: every bucket is included.
    #[default]
    Any,
    /// A ±60 minute window around the given minute.
    Around(MinuteOfDay),
}

impl TimeFilter {
    /// Converts a raw slider value (`-1` or `0..=1439`).
    pub fn from_slider(value: i32) -> Result<Self> {
        if value == ANY_TIME_SENTINEL {
            return Ok(TimeFilter::Any);
        }
        let minute = u16::try_from(value)
            .map_err(|_| anyhow!("slider value {} out of range -1..=1439", value))?;
        Ok(TimeFilter::Around(MinuteOfDay::new(minute)?))
    }

    /// The slider value for this filter.
    pub fn slider_value(self) -> i32 {
        match self {
            TimeFilter::Any => ANY_TIME_SENTINEL,
            TimeFilter::Around(m) => m.value() as i32,
        }
    }

    /// Bucket window selected by this filter, `None` when unfiltered.
    pub fn window(self) -> Option<Window> {
        match self {
            TimeFilter::Any => None,
            TimeFilter::Around(center) => Some(Window::around(center)),
        }
    }

    /// Text for the time label, `None` when the "(any time)" label shows.
    pub fn label(self) -> Option<String> {
        match self {
            TimeFilter::Any => None,
            TimeFilter::Around(m) => Some(m.label()),
        }
    }
}

impl std::str::FromStr for TimeFilter {
    type Err = anyhow::Error;

    /// Accepts `any`, a slider integer, or `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(TimeFilter::Any);
        }
        if let Some((h, m)) = s.split_once(':') {
            let hour: u16 = h.parse().map_err(|_| anyhow!("invalid hour in {:?}", s))?;
            let minute: u16 = m.parse().map_err(|_| anyhow!("invalid minute in {:?}", s))?;
            if hour >= 24 || minute >= 60 {
                bail!("time {:?} out of range", s);
            }
            return Ok(TimeFilter::Around(MinuteOfDay::new(hour * 60 + minute)?));
        }
        let value: i32 = s
            .parse()
            .map_err(|_| anyhow!("invalid time filter {:?}", s))?;
        Self::from_slider(value)
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Any => write!(f, "any"),
            TimeFilter::Around(m) => write!(f, "{}", m),
        }
    }
}

/// Half-open bucket window `[min, max)` taken modulo 1440.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub min: u16,
    pub max: u16,
}

impl Window {
    pub fn around(center: MinuteOfDay) -> Self {
        let c = center.value();
        Window {
            min: (c + MINUTES_PER_DAY - WINDOW_HALF_WIDTH) % MINUTES_PER_DAY,
            max: (c + WINDOW_HALF_WIDTH) % MINUTES_PER_DAY,
        }
    }

    pub fn wraps(self) -> bool {
        self.min > self.max
    }

    /// Bucket index ranges in selection order. The second range is
    /// non-empty only when the window wraps past midnight.
    pub fn ranges(self) -> [Range<usize>; 2] {
        let (min, max) = (self.min as usize, self.max as usize);
        if self.wraps() {
            [min..MINUTES_PER_DAY as usize, 0..max]
        } else {
            [min..max, 0..0]
        }
    }
}
