//! Traits turning raw provider payloads into core types.
//!
//! Mapping never fails as a whole: a record missing a required field is
//! dropped (and logged at debug level), the rest keep their order.

use eventdigest_core::{Calendar, CalendarEvent};

/// Maps raw event records of one provider.
pub trait EventMapper {
    /// The provider's raw event record.
    type Raw;

    /// Maps one record, `None` if a required field is missing or malformed.
    fn map_event(&self, raw: &Self::Raw) -> Option<CalendarEvent>;

    /// Maps every record, skipping the malformed ones.
    fn map_events(&self, raws: &[Self::Raw]) -> Vec<CalendarEvent> {
        raws.iter().filter_map(|raw| self.map_event(raw)).collect()
    }
}

/// Maps raw calendar records of one provider.
pub trait CalendarMapper {
    /// The provider's raw calendar record.
    type Raw;

    /// Maps one record, `None` if a required field is missing or malformed.
    fn map_calendar(&self, raw: &Self::Raw) -> Option<Calendar>;

    /// Maps every record, skipping the malformed ones.
    fn map_calendars(&self, raws: &[Self::Raw]) -> Vec<Calendar> {
        raws.iter().filter_map(|raw| self.map_calendar(raw)).collect()
    }
}
