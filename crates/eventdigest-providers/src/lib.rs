//! Provider collaborators, mappers and HTTP clients.
//!
//! - [`CalendarSource`], [`PhotoSource`], [`LoginService`] - what the
//!   application talks to
//! - [`EventMapper`], [`CalendarMapper`] - raw provider records to core types
//! - [`facebook`], [`google`] - Graph API, Calendar API and Photos Library
//!   clients and sources
//! - [`ProviderError`] - failures of the clients
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//! │ Graph API      │   │ Calendar API   │   │ Photos Library │
//! └───────┬────────┘   └───────┬────────┘   └───────┬────────┘
//!         │ Value              │ ApiEvent           │ ApiMediaItem
//!         ▼                    ▼                    ▼
//! ┌────────────────┐   ┌────────────────┐   ┌────────────────────┐
//! │ FacebookMapper │   │ GoogleMapper   │   │ GooglePhotosMapper │
//! └───────┬────────┘   └───────┬────────┘   └───────┬────────────┘
//!         │                    │                    │
//!         ▼                    ▼                    ▼
//!     CalendarService (CalendarSource)         GooglePhotos (PhotoSource)
//! ```

pub mod error;
pub mod facebook;
pub mod google;
mod http;
pub mod login;
pub mod mapper;
pub mod provider;
pub mod service;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use facebook::{FACEBOOK_PERMISSIONS, FacebookCalendar, FacebookMapper};
pub use google::{GOOGLE_SCOPES, GoogleCalendar, GoogleMapper, GooglePhotos, GooglePhotosMapper};
pub use http::DEFAULT_TIMEOUT;
pub use login::TokenLogin;
pub use mapper::{CalendarMapper, EventMapper};
pub use provider::{
    AccessTokenSource, BoxFuture, CalendarSource, LoginService, PhotoPage, PhotoSource,
};
pub use service::CalendarService;
