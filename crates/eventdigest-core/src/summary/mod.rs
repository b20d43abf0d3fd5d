//! Summary post rendering.
//!
//! A summary groups events under a date header and renders one line per
//! event, wrapped between the intro and ending text of a
//! [`SummaryTemplate`]:
//!
//! ```text
//! {intro}
//! Thursday, Jun 6th:
//!
//! Open Mic, at Blue Note, 🕒 8PM
//!
//! {ending}
//! ```

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::event::{CalendarEvent, sort_by_start};

#[cfg(test)]
mod golden_tests;

/// Intro and ending text placed around the event list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryTemplate {
    pub name: String,
    pub intro: String,
    pub ending: String,
}

impl SummaryTemplate {
    /// Name of the reserved template with no intro or ending.
    pub const EMPTY_NAME: &'static str = "Empty Post";

    /// Creates a template.
    pub fn new(name: impl Into<String>, intro: impl Into<String>, ending: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intro: intro.into(),
            ending: ending.into(),
        }
    }

    /// The reserved template with blank intro and ending.
    pub fn empty() -> Self {
        Self::new(Self::EMPTY_NAME, "", "")
    }

    /// Returns the selectable templates: the empty template first, then
    /// `configured` in order, skipping duplicates of the empty one.
    pub fn with_empty_first(configured: &[SummaryTemplate]) -> Vec<SummaryTemplate> {
        let empty = Self::empty();
        std::iter::once(empty.clone())
            .chain(configured.iter().filter(|t| **t != empty).cloned())
            .collect()
    }
}

impl Default for SummaryTemplate {
    fn default() -> Self {
        Self::empty()
    }
}

/// The post being composed: events to list and an optional photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryPost {
    pub image_url: Option<Url>,
    events: Option<Vec<CalendarEvent>>,
}

impl SummaryPost {
    /// Creates an empty post.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of the post, ascending by start time.
    pub fn events(&self) -> Option<&[CalendarEvent]> {
        self.events.as_deref()
    }

    /// Replaces the events, sorting them ascending by start time.
    pub fn set_events(&mut self, events: Option<Vec<CalendarEvent>>) {
        self.events = events.map(|mut events| {
            sort_by_start(&mut events);
            events
        });
    }

    /// Builder method to set the events.
    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.set_events(Some(events));
        self
    }

    /// Builder method to attach a photo.
    pub fn with_image_url(mut self, url: Url) -> Self {
        self.image_url = Some(url);
        self
    }

    /// Renders the post in the local time zone.
    pub fn summary(&self, template: &SummaryTemplate) -> String {
        self.summary_in(&Local, template)
    }

    /// Renders the post with dates and hours in `tz`.
    pub fn summary_in<Tz: TimeZone>(&self, tz: &Tz, template: &SummaryTemplate) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        summary_in(
            tz,
            self.events().unwrap_or_default(),
            &template.intro,
            &template.ending,
        )
    }
}

/// Renders events in the local time zone. See [`summary_in`].
pub fn summary(events: &[CalendarEvent], intro: &str, ending: &str) -> String {
    summary_in(&Local, events, intro, ending)
}

/// Renders `events` between `intro` and `ending`.
///
/// Events are expected sorted by start time. A date header is written
/// whenever it differs from the previous event's header, so an unsorted
/// list repeats headers.
pub fn summary_in<Tz: TimeZone>(
    tz: &Tz,
    events: &[CalendarEvent],
    intro: &str,
    ending: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut body = String::new();
    let mut last_header = String::new();

    for event in events {
        let start = event.start_time().with_timezone(tz);

        let header = date_header(&start);
        if header != last_header {
            body.push_str(&header);
            body.push_str("\n\n");
            last_header = header;
        }

        body.push_str(&event_line(event, &start));
    }

    format!("{intro}\n{body}\n{ending}\n")
}

/// Formats a header like `Thursday, Jun 6th:`.
pub fn date_header<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}:",
        date.format("%A, %b %-d"),
        ordinal_suffix(date.day())
    )
}

/// Formats the hour like `8PM`.
pub fn hour_label<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%-I%p").to_string()
}

fn event_line<Tz: TimeZone>(event: &CalendarEvent, start: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let place = if event.is_online {
        "online".to_string()
    } else {
        match event.location {
            Some(ref location) => format!("at {location}"),
            None => "location N/A".to_string(),
        }
    };

    format!("{}, {}, 🕒 {}\n\n", event.name, place, hour_label(start))
}

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match n % 100 {
        11..=13 => "th",
        value => match value % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn ordinal_suffixes() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (30, "th"),
            (31, "st"),
            (111, "th"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "suffix for {n}");
        }
    }

    #[test]
    fn empty_summary_is_three_newlines() {
        assert_eq!(summary(&[], "", ""), "\n\n\n");
    }

    #[test]
    fn templates_list_starts_with_empty() {
        let configured = vec![
            SummaryTemplate::new("Weekly", "This week:", "See you!"),
            SummaryTemplate::empty(),
        ];
        let templates = SummaryTemplate::with_empty_first(&configured);
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0], SummaryTemplate::empty());
        assert_eq!(templates[1].name, "Weekly");
    }

    #[test]
    fn template_serde_roundtrip() {
        let template = SummaryTemplate::new("Weekly", "This week:", "See you!");
        let json = serde_json::to_string(&template).unwrap();
        let parsed: SummaryTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn post_without_events_renders_template_only() {
        let post = SummaryPost::new();
        let template = SummaryTemplate::new("Weekly", "Hello", "Bye");
        assert_eq!(post.summary_in(&Utc, &template), "Hello\n\nBye\n");
    }
}
