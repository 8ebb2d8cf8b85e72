//! List statistics and display helpers

use chrono::{DateTime, Datelike, Local};
use serde::Serialize;

use super::item::Item;
use crate::percent_of;

/// Counts shown in the statistics bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub purchased: usize,
    pub remaining: usize,
    /// purchased / total * 100, rounded; 0 for an empty list
    pub percent_complete: u32,
}

impl Stats {
    pub fn of(items: &[Item]) -> Self {
        let total = items.len();
        let purchased = items.iter().filter(|item| item.purchased).count();
        Self {
            total,
            purchased,
            remaining: total - purchased,
            percent_complete: percent_of(purchased, total),
        }
    }
}

/// Format an item's creation time relative to `now_millis`
pub fn format_added(created_at: i64, now_millis: i64) -> String {
    let diff_mins = now_millis.saturating_sub(created_at).max(0) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else if diff_days < 7 {
            format!("{} days ago", diff_days)
        } else {
            match DateTime::from_timestamp_millis(created_at) {
                Some(utc) => {
                    let date = utc.with_timezone(&Local);
                    format!("{}/{}/{:02}", date.month(), date.day(), date.year() % 100)
                }
                None => "Unknown".to_string(),
            }
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}
