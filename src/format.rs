//! Pure formatting of dates, durations and link annotations.

use std::str::FromStr;

use crate::error::{FormatError, RenderError};
use crate::html::HtmlString;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A date decoded from its compact `YYYY`, `YYYYMM` or `YYYYMMDD` integer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i64,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

impl DateParts {
    pub fn decode(date: i64) -> Result<Self, FormatError> {
        match date {
            d if d <= 0 => Err(FormatError::InvalidDate(date)),
            d if d <= 9999 => Ok(Self { year: d, month: None, day: None }),
            d if d <= 999_999 => Ok(Self {
                year: d / 100,
                month: Some(d % 100),
                day: None,
            }),
            d if d <= 99_999_999 => Ok(Self {
                year: d / 10_000,
                month: Some((d % 10_000) / 100),
                day: Some(d % 100),
            }),
            _ => Err(FormatError::InvalidDate(date)),
        }
    }

    pub fn sort_key(&self) -> String {
        let mut key = self.year.to_string();
        if let Some(month) = self.month {
            key.push_str(&format!("{:02}", month));
        }
        if let Some(day) = self.day {
            key.push_str(&format!("{:02}", day));
        }
        key
    }
}

pub fn month_name(date: i64, month: i64) -> Result<&'static str, FormatError> {
    usize::try_from(month - 1)
        .ok()
        .and_then(|i| MONTHS.get(i).copied())
        .ok_or(FormatError::InvalidMonth { date, month })
}

pub fn day_suffix(day: i64) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// `2001` → `2001`, `200103` → `March 2001`, `20010303` → `March 3<sup>rd</sup>, 2001`.
pub fn date_to_html(date: i64) -> Result<HtmlString, FormatError> {
    let parts = DateParts::decode(date)?;
    let mut html = HtmlString::empty();
    match (parts.month, parts.day) {
        (None, _) => {
            html.append_text(&parts.year.to_string());
        }
        (Some(month), None) => {
            html.append_text(month_name(date, month)?)
                .append_text(&format!(" {}", parts.year));
        }
        (Some(month), Some(day)) => {
            html.append_text(month_name(date, month)?)
                .append_text(&format!(" {}", day))
                .append_tag("sup", day_suffix(day))
                .append_text(&format!(", {}", parts.year));
        }
    }
    Ok(html)
}

/// Same as [`date_to_html`] without markup, for titles and logs.
pub fn date_to_text(date: i64) -> Result<String, FormatError> {
    let parts = DateParts::decode(date)?;
    Ok(match (parts.month, parts.day) {
        (None, _) => parts.year.to_string(),
        (Some(month), None) => format!("{} {}", month_name(date, month)?, parts.year),
        (Some(month), Some(day)) => format!(
            "{} {}{}, {}",
            month_name(date, month)?,
            day,
            day_suffix(day),
            parts.year
        ),
    })
}

pub fn duration_to_string(duration: i64) -> Result<String, FormatError> {
    if duration <= 0 || duration >= SECONDS_PER_DAY {
        return Err(FormatError::InvalidDuration(duration));
    }
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;
    let mut text = String::new();
    if hours > 0 {
        text.push_str(&format!("{}h ", hours));
    }
    if hours > 0 || minutes > 0 {
        text.push_str(&format!("{}m ", minutes));
    }
    text.push_str(&format!("{}s", seconds));
    Ok(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Dead,
    Zombie,
    Obsolete,
    Removed,
}

impl FromStr for LinkStatus {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dead" => Ok(Self::Dead),
            "zombie" => Ok(Self::Zombie),
            "obsolete" => Ok(Self::Obsolete),
            "removed" => Ok(Self::Removed),
            other => Err(FormatError::UnknownStatus(other.to_string())),
        }
    }
}

impl LinkStatus {
    /// Glyph and its tooltip.
    pub fn glyph(self) -> (&'static str, &'static str) {
        match self {
            Self::Dead | Self::Zombie => ("\u{1F6AB}", "dead link"),
            Self::Obsolete => ("\u{1F3DA}\u{FE0F}", "obsolete"),
            Self::Removed => ("\u{1F5D1}\u{FE0F}", "removed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    FreeRegistration,
    PayedRegistration,
}

impl FromStr for Protection {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_registration" => Ok(Self::FreeRegistration),
            "payed_registration" => Ok(Self::PayedRegistration),
            other => Err(FormatError::UnknownProtection(other.to_string())),
        }
    }
}

impl Protection {
    pub fn glyph(self) -> (&'static str, &'static str) {
        match self {
            Self::FreeRegistration => ("\u{1F193}", "free registration required"),
            Self::PayedRegistration => ("\u{1F4B0}", "payed registration required"),
        }
    }
}

fn glyph_html((glyph, title): (&str, &str)) -> Result<HtmlString, RenderError> {
    Ok(HtmlString::from_tag_with("span", glyph, &["title", title])?)
}

pub fn status_to_html(status: &str) -> Result<HtmlString, RenderError> {
    glyph_html(status.parse::<LinkStatus>()?.glyph())
}

pub fn protection_to_html(protection: &str) -> Result<HtmlString, RenderError> {
    glyph_html(protection.parse::<Protection>()?.glyph())
}
