//! Facebook pages: Graph API client, record mapping and calendar source.

pub mod client;
pub mod mapper;
pub mod provider;

pub use client::{FacebookClient, GRAPH_API_BASE, PagePost};
pub use mapper::{FacebookMapper, parse_graph_time};
pub use provider::{FACEBOOK_PERMISSIONS, FacebookCalendar};
