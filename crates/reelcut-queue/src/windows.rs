//! Recurring daily engagement windows.

use chrono::{DateTime, Days, NaiveDate, Utc};

use reelcut_models::{parse_time_of_day, EngagementWindow};

use crate::error::{QueueError, QueueResult};

/// Default windows, in UTC.
pub const DEFAULT_WINDOWS: &str = "09:00-11:00,14:00-16:00,19:00-21:00";

/// A non-empty, time-ordered, non-overlapping set of daily windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementWindows(Vec<EngagementWindow>);

impl EngagementWindows {
    /// Validate and order a set of windows.
    pub fn new(mut windows: Vec<EngagementWindow>) -> QueueResult<Self> {
        if windows.is_empty() {
            return Err(QueueError::NoWindows);
        }
        windows.sort_by_key(|w| w.start);
        for pair in windows.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(QueueError::Overlapping(
                    pair[0].to_string(),
                    pair[1].to_string(),
                ));
            }
        }
        Ok(Self(windows))
    }

    /// Parse a comma-separated list such as `09:00-11:00,14:00-16:00`.
    pub fn parse(text: &str) -> QueueResult<Self> {
        let windows = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_window)
            .collect::<QueueResult<Vec<_>>>()?;
        Self::new(windows)
    }

    pub fn as_slice(&self) -> &[EngagementWindow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Start a cursor at `not_before`.
    pub fn cursor(&self, not_before: DateTime<Utc>) -> WindowCursor<'_> {
        WindowCursor::new(self, not_before)
    }
}

impl Default for EngagementWindows {
    fn default() -> Self {
        let windows = [((9, 0), (11, 0)), ((14, 0), (16, 0)), ((19, 0), (21, 0))]
            .into_iter()
            .filter_map(|(s, e)| EngagementWindow::from_hm(s, e))
            .collect();
        Self(windows)
    }
}

impl std::fmt::Display for EngagementWindows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|w| w.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_window(text: &str) -> QueueResult<EngagementWindow> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| QueueError::invalid_window(text))?;
    let start = parse_time_of_day(start).map_err(|_| QueueError::invalid_window(text))?;
    let end = parse_time_of_day(end).map_err(|_| QueueError::invalid_window(text))?;
    if start >= end {
        return Err(QueueError::invalid_window(text));
    }
    Ok(EngagementWindow { start, end })
}

/// Walks window start times in order, wrapping to the next day after the
/// last window. Never yields a time earlier than its starting point.
#[derive(Debug, Clone)]
pub struct WindowCursor<'a> {
    windows: &'a EngagementWindows,
    day: NaiveDate,
    index: usize,
    not_before: DateTime<Utc>,
}

impl<'a> WindowCursor<'a> {
    fn new(windows: &'a EngagementWindows, not_before: DateTime<Utc>) -> Self {
        Self {
            windows,
            day: not_before.date_naive(),
            index: 0,
            not_before,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        if self.index >= self.windows.len() {
            self.index = 0;
            self.day = self.day.checked_add_days(Days::new(1)).unwrap_or(self.day);
        }
    }
}

impl Iterator for WindowCursor<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        // At most one day of windows can precede `not_before`.
        for _ in 0..=self.windows.len() {
            let window = self.windows.as_slice()[self.index];
            let slot = self.day.and_time(window.start).and_utc();
            self.advance();
            if slot >= self.not_before {
                return Some(slot);
            }
        }
        None
    }
}
