//! Calendars exposed by the event providers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The provider a calendar comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    /// A Facebook page and its events.
    Facebook,
    /// A Google Calendar.
    Google,
}

impl CalendarKind {
    /// Returns the stable identifier of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Google => "google",
        }
    }

    /// Returns a human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Google => "Google Calendar",
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar the user can pick as the source of a digest.
///
/// Equality covers id, name and kind: the same id renamed on the provider
/// side is a different calendar for session purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Calendar {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: CalendarKind,
}

impl Calendar {
    /// Creates a calendar.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: CalendarKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Provider identifier of the calendar.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the calendar.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider the calendar belongs to.
    pub fn kind(&self) -> CalendarKind {
        self.kind
    }
}
