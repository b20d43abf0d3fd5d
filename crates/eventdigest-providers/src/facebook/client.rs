//! Facebook Graph API client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, send_json};

/// Base URL of the Graph API.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

const EVENT_FIELDS: &str = "name,start_time,end_time,place,is_online";

/// Graph API client for one access token.
#[derive(Debug)]
pub struct FacebookClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl FacebookClient {
    /// Creates a client authenticated with `access_token`.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            access_token: access_token.into(),
            base_url: GRAPH_API_BASE.to_string(),
        })
    }

    /// Points the client at another Graph API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Pages managed by the user (`me/accounts`).
    pub async fn list_pages(&self) -> ProviderResult<Vec<Value>> {
        let request = self
            .http_client
            .get(self.endpoint("me/accounts"))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "name")]);

        let list: DataList = send_json(request).await?;
        debug!(count = list.data.len(), "fetched facebook pages");
        Ok(list.data)
    }

    /// Events of a page that overlap `[since, until]`.
    pub async fn list_events(
        &self,
        page_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ProviderResult<Vec<Value>> {
        let path = format!("{}/events", urlencoding::encode(page_id));
        let request = self
            .http_client
            .get(self.endpoint(&path))
            .bearer_auth(&self.access_token)
            .query(&[
                ("fields", EVENT_FIELDS.to_string()),
                ("since", since.timestamp().to_string()),
                ("until", until.timestamp().to_string()),
            ]);

        let list: DataList = send_json(request).await?;
        debug!(page_id, count = list.data.len(), "fetched facebook events");
        Ok(list.data)
    }

    /// The page access token required to publish on `page_id`.
    pub async fn page_access_token(&self, page_id: &str) -> ProviderResult<String> {
        let request = self
            .http_client
            .get(self.endpoint(&urlencoding::encode(page_id)))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "access_token")]);

        let page: PageToken = send_json(request).await?;
        page.access_token
            .ok_or_else(|| ProviderError::missing_credential("page has no access token"))
    }

    /// Publishes a post on a page, returning the id of the new post.
    ///
    /// With a photo the post goes to the page's `photos` edge, otherwise to
    /// its `feed`. A scheduled post is created unpublished with a
    /// `scheduled_publish_time`.
    pub async fn publish(
        &self,
        page_id: &str,
        page_token: &str,
        post: &PagePost,
    ) -> ProviderResult<String> {
        let edge = if post.photo_url.is_some() { "photos" } else { "feed" };
        let path = format!("{}/{}", urlencoding::encode(page_id), edge);

        let request = self
            .http_client
            .post(self.endpoint(&path))
            .bearer_auth(page_token)
            .form(&post.form_fields());

        let created: Created = send_json(request).await?;
        let id = created
            .post_id
            .or(created.id)
            .ok_or_else(|| ProviderError::invalid_response("publish response without id"))?;

        debug!(page_id, post_id = %id, edge, "published facebook post");
        Ok(id)
    }
}

/// A post to publish on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePost {
    pub message: String,
    pub photo_url: Option<Url>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl PagePost {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            photo_url: None,
            scheduled_at: None,
        }
    }

    /// Builder method to attach a photo.
    pub fn with_photo_url(mut self, url: Option<Url>) -> Self {
        self.photo_url = url;
        self
    }

    /// Builder method to schedule the post.
    pub fn with_scheduled_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.scheduled_at = at;
        self
    }

    /// Form fields of the publish request.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        match self.photo_url {
            Some(ref url) => {
                fields.push(("caption", self.message.clone()));
                fields.push(("url", url.to_string()));
            }
            None => fields.push(("message", self.message.clone())),
        }
        if let Some(at) = self.scheduled_at {
            fields.push(("published", "false".to_string()));
            fields.push(("scheduled_publish_time", at.timestamp().to_string()));
        }
        fields
    }
}

#[derive(Debug, Deserialize)]
struct DataList {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PageToken {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: Option<String>,
    post_id: Option<String>,
}
