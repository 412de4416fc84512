//! Ticketing system client.
//!
//! Thin Zendesk-style HTTP client used by the sync and draft drivers. The
//! core pipeline never calls this directly — it consumes the tickets and
//! comments these methods return.
//!
//! Authentication uses the `ZENDESK_API_KEY` environment variable as a raw
//! `Authorization` header value; when unset, requests go out unauthenticated
//! (useful against mock servers).

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::ZendeskConfig;
use crate::models::{Comment, Ticket};

pub struct ZendeskClient {
    base_url: String,
    api_key: Option<String>,
    default_support_user_id: i64,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TicketSearchResponse {
    #[serde(default)]
    results: Vec<Ticket>,
}

#[derive(Deserialize)]
struct UserSearchResponse {
    #[serde(default)]
    results: Vec<User>,
}

#[derive(Deserialize)]
struct User {
    id: i64,
    #[serde(default)]
    role: String,
}

#[derive(Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<Comment>,
}

impl ZendeskClient {
    pub fn new(config: &ZendeskConfig) -> Result<Self> {
        let api_key = std::env::var("ZENDESK_API_KEY").ok().filter(|k| !k.is_empty());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            default_support_user_id: config.default_support_user_id,
            client,
        })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => builder.header("Authorization", key),
            None => builder,
        }
    }

    async fn search_tickets(&self, query: &str) -> Result<Vec<Ticket>> {
        let response = self
            .request(
                self.client
                    .get(format!("{}/api/v2/search", self.base_url))
                    .query(&[("query", query)]),
            )
            .send()
            .await
            .with_context(|| format!("Ticket search '{}' failed", query))?
            .error_for_status()
            .with_context(|| format!("Ticket search '{}' returned an error status", query))?;

        let parsed: TicketSearchResponse = response
            .json()
            .await
            .context("Malformed ticket search response")?;
        Ok(parsed.results)
    }

    pub async fn list_resolved_tickets(&self) -> Result<Vec<Ticket>> {
        self.search_tickets("status:solved").await
    }

    pub async fn list_open_tickets(&self) -> Result<Vec<Ticket>> {
        self.search_tickets("status:open").await
    }

    pub async fn list_comments(&self, ticket_id: i64) -> Result<Vec<Comment>> {
        let response = self
            .request(self.client.get(format!(
                "{}/api/v2/tickets/{}/comments",
                self.base_url, ticket_id
            )))
            .send()
            .await
            .with_context(|| format!("Comment fetch for ticket {} failed", ticket_id))?
            .error_for_status()
            .with_context(|| format!("Comment fetch for ticket {} returned an error status", ticket_id))?;

        let parsed: CommentsResponse = response
            .json()
            .await
            .context("Malformed comments response")?;
        Ok(parsed.comments)
    }

    /// Resolve the set of support-agent user ids.
    ///
    /// A user counts as support when its `role` is `"agent"`; that is the
    /// single authoritative rule. Falls back to the configured default id
    /// when the lookup fails or finds no agents, with a warning — the
    /// pipeline can still attribute drafts without the directory.
    pub async fn list_support_author_ids(&self) -> Vec<i64> {
        let lookup = async {
            let response = self
                .request(
                    self.client
                        .get(format!("{}/api/v2/search", self.base_url))
                        .query(&[("query", "role:agent")]),
                )
                .send()
                .await
                .context("Agent search failed")?
                .error_for_status()
                .context("Agent search returned an error status")?;

            let parsed: UserSearchResponse = response
                .json()
                .await
                .context("Malformed agent search response")?;

            let ids: Vec<i64> = parsed
                .results
                .iter()
                .filter(|u| u.role == "agent")
                .map(|u| u.id)
                .collect();
            Ok::<Vec<i64>, anyhow::Error>(ids)
        };

        match lookup.await {
            Ok(ids) if !ids.is_empty() => ids,
            Ok(_) => {
                eprintln!("Warning: no support agents found. Using default support user id.");
                vec![self.default_support_user_id]
            }
            Err(e) => {
                eprintln!("Warning: agent lookup failed ({}). Using default support user id.", e);
                vec![self.default_support_user_id]
            }
        }
    }

    /// Attach `body` to a ticket as a non-public comment authored by
    /// `author_id`.
    pub async fn post_private_comment(
        &self,
        ticket_id: i64,
        body: &str,
        author_id: i64,
    ) -> Result<()> {
        let payload = serde_json::json!({
            "tickets": [{
                "id": ticket_id,
                "comment": {
                    "body": body,
                    "public": false,
                    "author_id": author_id,
                }
            }]
        });

        self.request(
            self.client
                .post(format!("{}/api/v2/tickets/update_many", self.base_url))
                .json(&payload),
        )
        .send()
        .await
        .with_context(|| format!("Comment post for ticket {} failed", ticket_id))?
        .error_for_status()
        .with_context(|| format!("Comment post for ticket {} returned an error status", ticket_id))?;

        Ok(())
    }
}
