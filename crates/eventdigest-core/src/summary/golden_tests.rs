//! Golden tests for summary rendering.
//!
//! Rendering goes through [`summary_in`] with a fixed zone so the output does
//! not depend on the machine running the tests.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use super::{SummaryPost, SummaryTemplate, summary_in};
use crate::event::{CalendarEvent, expand_multiday};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn gig(id: &str, name: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent::new(id, name, start, start + chrono::Duration::hours(2))
}

/// Two events on Thursday and one on Friday.
fn week_events() -> Vec<CalendarEvent> {
    vec![
        gig("1", "Open Mic", utc(2024, 6, 6, 20, 0)).with_location("Blue Note"),
        gig("2", "Webinar", utc(2024, 6, 6, 21, 30)).with_online(true),
        gig("3", "Brunch", utc(2024, 6, 7, 11, 0)),
    ]
}

#[test]
fn golden_empty() {
    let output = summary_in(&Utc, &[], "", "");
    insta::assert_debug_snapshot!(output, @r#""\n\n\n""#);
}

#[test]
fn golden_intro_and_ending_without_events() {
    let output = summary_in(&Utc, &[], "This week:", "See you there!");
    insta::assert_debug_snapshot!(output, @r#""This week:\n\nSee you there!\n""#);
}

#[test]
fn golden_two_days() {
    let output = summary_in(&Utc, &week_events(), "Hi!", "Bye");
    assert_eq!(
        output,
        "Hi!\n\
         Thursday, Jun 6th:\n\n\
         Open Mic, at Blue Note, 🕒 8PM\n\n\
         Webinar, online, 🕒 9PM\n\n\
         Friday, Jun 7th:\n\n\
         Brunch, location N/A, 🕒 11AM\n\n\
         \nBye\n"
    );
}

#[test]
fn golden_headers_for_three_and_two() {
    let events = vec![
        gig("1", "A", utc(2024, 6, 1, 10, 0)),
        gig("2", "B", utc(2024, 6, 1, 12, 0)),
        gig("3", "C", utc(2024, 6, 1, 18, 0)),
        gig("4", "D", utc(2024, 6, 2, 10, 0)),
        gig("5", "E", utc(2024, 6, 2, 19, 0)),
    ];
    let output = summary_in(&Utc, &events, "", "");

    assert_eq!(output.matches("Saturday, Jun 1st:").count(), 1);
    assert_eq!(output.matches("Sunday, Jun 2nd:").count(), 1);
    assert_eq!(output.matches("🕒").count(), 5);
    assert!(output.find("Saturday").unwrap() < output.find("Sunday").unwrap());
}

#[test]
fn golden_unsorted_input_repeats_header() {
    let events = vec![
        gig("1", "A", utc(2024, 6, 1, 10, 0)),
        gig("2", "B", utc(2024, 6, 2, 10, 0)),
        gig("3", "C", utc(2024, 6, 1, 18, 0)),
    ];
    let output = summary_in(&Utc, &events, "", "");

    assert_eq!(output.matches("Saturday, Jun 1st:").count(), 2);
    assert_eq!(output.matches("Sunday, Jun 2nd:").count(), 1);
}

#[test]
fn golden_post_sorts_before_rendering() {
    let mut events = week_events();
    events.reverse();

    let post = SummaryPost::new().with_events(events);
    let template = SummaryTemplate::new("Weekly", "Hi!", "Bye");

    assert_eq!(
        post.summary_in(&Utc, &template),
        summary_in(&Utc, &week_events(), "Hi!", "Bye")
    );
}

#[test]
fn golden_midnight_and_noon_hours() {
    let events = vec![
        gig("1", "Late Set", utc(2024, 6, 3, 0, 30)),
        gig("2", "Lunch Talk", utc(2024, 6, 3, 12, 0)),
    ];
    let output = summary_in(&Utc, &events, "", "");
    insta::assert_debug_snapshot!(
        output,
        @r#""\nMonday, Jun 3rd:\n\nLate Set, location N/A, 🕒 12AM\n\nLunch Talk, location N/A, 🕒 12PM\n\n\n\n""#
    );
}

#[test]
fn golden_online_wins_over_location() {
    let events = vec![
        gig("1", "Hybrid Panel", utc(2024, 6, 11, 15, 0))
            .with_location("Town Hall")
            .with_online(true),
    ];
    let output = summary_in(&Utc, &events, "", "");
    assert!(output.contains("Hybrid Panel, online, 🕒 3PM"));
    assert!(output.contains("Tuesday, Jun 11th:"));
}

#[test]
fn golden_uses_given_time_zone() {
    // 02:00 UTC on the 7th is still the evening of the 6th at UTC-5.
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let events = vec![gig("1", "Night Owls", utc(2024, 6, 7, 2, 0))];

    let output = summary_in(&tz, &events, "", "");
    assert!(output.contains("Thursday, Jun 6th:"));
    assert!(output.contains("Night Owls, location N/A, 🕒 9PM"));
}

#[test]
fn golden_multiday_segments() {
    let festival = CalendarEvent::new(
        "fest",
        "Jazz Festival",
        utc(2024, 6, 21, 18, 0),
        utc(2024, 6, 23, 14, 0),
    )
    .with_location("Old Town Square");

    let events = expand_multiday(vec![festival], &Utc);
    let output = summary_in(&Utc, &events, "", "");

    insta::assert_debug_snapshot!(
        output,
        @r#""\nFriday, Jun 21st:\n\nJazz Festival - Day 1, at Old Town Square, 🕒 6PM\n\nSaturday, Jun 22nd:\n\nJazz Festival - Day 2, at Old Town Square, 🕒 12AM\n\nSunday, Jun 23rd:\n\nJazz Festival - Day 3, at Old Town Square, 🕒 12AM\n\n\n\n""#
    );
}
