//! FANBOX API client.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::session::{Session, SessionToken};
use crate::api::types::{ApiResponse, PostListing};

/// FANBOX API base URL.
const API_BASE: &str = "https://api.fanbox.cc";

/// API client over an authenticated session.
pub struct FanboxApi<S> {
    session: S,
}

impl<S: Session> FanboxApi<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Session cookie header for asset downloads.
    pub fn token(&self) -> &SessionToken {
        self.session.token()
    }

    /// Fetch a creator's post listing as raw JSON items.
    ///
    /// Returns `None` if the session could not fetch or decode the listing.
    pub async fn list_creator_posts(&self, creator_id: &str, limit: u32) -> Option<Vec<Value>> {
        let url = format!(
            "{}/post.listCreator?creatorId={}&limit={}",
            API_BASE, creator_id, limit
        );
        let listing: PostListing = self.get_body(&url).await?;
        Some(listing.items)
    }

    /// Fetch the full payload of one post as raw JSON.
    pub async fn post_detail(&self, post_id: &str) -> Option<Value> {
        let url = format!("{}/post.info?postId={}", API_BASE, post_id);
        // A `null` or missing envelope body comes back as `None`
        self.get_body::<Value>(&url).await
    }

    /// Fetch a URL and unwrap the `body` envelope.
    async fn get_body<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let value = self.session.fetch_json(url).await?;
        match serde_json::from_value::<ApiResponse<T>>(value) {
            Ok(response) => response.body,
            Err(e) => {
                tracing::debug!("Unexpected response from {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Session answering from canned responses and recording requested URLs.
    #[derive(Default)]
    pub(crate) struct MockSession {
        pub responses: HashMap<String, Value>,
        pub requests: Mutex<Vec<String>>,
        pub token: SessionToken,
    }

    impl MockSession {
        pub fn with(mut self, url: &str, value: Value) -> Self {
            self.responses.insert(url.to_string(), value);
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Session for MockSession {
        async fn fetch_json(&self, url: &str) -> Option<Value> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses.get(url).cloned()
        }

        fn token(&self) -> &SessionToken {
            &self.token
        }
    }

    #[tokio::test]
    async fn test_list_creator_posts_unwraps_items() {
        let session = MockSession::default().with(
            "https://api.fanbox.cc/post.listCreator?creatorId=someone&limit=300",
            json!({ "body": { "items": [{ "id": "1" }, { "id": "2" }] } }),
        );
        let api = FanboxApi::new(session);

        let items = api.list_creator_posts("someone", 300).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "2");
    }

    #[tokio::test]
    async fn test_listing_failure_is_none() {
        let api = FanboxApi::new(MockSession::default());
        assert!(api.list_creator_posts("someone", 10).await.is_none());
    }

    #[tokio::test]
    async fn test_post_detail() {
        let session = MockSession::default()
            .with(
                "https://api.fanbox.cc/post.info?postId=1",
                json!({ "body": { "id": "1", "type": "text", "body": null } }),
            )
            .with(
                "https://api.fanbox.cc/post.info?postId=2",
                json!({ "error": "general_error" }),
            );
        let api = FanboxApi::new(session);

        assert_eq!(api.post_detail("1").await.unwrap()["type"], "text");
        assert!(api.post_detail("2").await.is_none());
        assert!(api.post_detail("3").await.is_none());
    }
}
