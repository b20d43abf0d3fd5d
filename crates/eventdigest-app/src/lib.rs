//! Application layer of eventdigest.
//!
//! - [`AppState`] - login, session and digest flows
//! - [`SessionManager`] - the signed-in session and its persistence
//! - [`PhotoLibrary`] - paged album browsing with hide/show
//! - [`KeyValueCache`], [`Preferences`] - persisted state
//! - [`RouteNavigator`], [`Subscribers`] - change notifications
//! - [`AppConfig`] - `config.toml`

pub mod cache;
pub mod config;
pub mod error;
pub mod photos;
pub mod preferences;
pub mod range;
pub mod routes;
pub mod session;
pub mod state;

pub use cache::{CacheKey, FileCache, KeyValueCache, KeyValueCacheExt, MemoryCache};
pub use config::AppConfig;
pub use error::{AppError, AppResult, CacheError, LibraryError, SessionError};
pub use photos::{AlbumSnapshot, DEFAULT_PAGE_SIZE, LibraryUpdate, PhotoLibrary};
pub use preferences::Preferences;
pub use range::DigestRange;
pub use routes::{Route, RouteNavigator, Subscribers, Subscription, SubscriptionId};
pub use session::{Session, SessionManager};
pub use state::AppState;
