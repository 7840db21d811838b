//! Blocking HTTP implementation of [`ApiClient`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::ApiClient;
use super::wire::{Envelope, RawChat, RawGroup, RawMessagePage, RawSent};
use crate::config::ClientConfig;
use crate::error::{GmkitError, Result};
use crate::message::{Chat, Conversation, DeliveryReceipt, Group, Member, Message};

/// Client for the public REST API.
///
/// Every call blocks until the service answers. Failures are mapped onto
/// [`GmkitError`] and never retried:
///
/// | Status | GET | POST |
/// |--------|-----|------|
/// | 2xx | decoded | decoded |
/// | 304 | empty result | - |
/// | 400 | `Auth` | `MessageRejected` |
/// | other 4xx | `Auth` | `Auth` |
/// | 5xx | `Status` | `Status` |
///
/// # Example
///
/// ```rust,no_run
/// use gmkit::api::{ApiClient, HttpClient};
/// use gmkit::config::ClientConfig;
///
/// let client = HttpClient::new(ClientConfig::from_env())?;
/// for group in client.groups()? {
///     println!("{}", group.name);
/// }
/// # Ok::<(), gmkit::GmkitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    config: ClientConfig,
    token: String,
}

impl HttpClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::Auth`] if no token is configured, before any
    /// request is made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(GmkitError::missing_token)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            token,
        })
    }

    /// Creates a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }

    /// GET helper. `Ok(None)` stands for "nothing here": a 304, an empty body
    /// or a `null` response.
    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        let response = self
            .http
            .get(self.url(endpoint))
            .query(&[("token", self.token.as_str())])
            .query(params)
            .send()?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "API GET");

        if status == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }
        if status.is_success() {
            return decode(response);
        }
        if status.is_client_error() {
            return Err(GmkitError::auth(format!(
                "request to '{endpoint}' was refused with status {}",
                status.as_u16()
            )));
        }
        if status.is_redirection() {
            warn!(endpoint, status = status.as_u16(), "unexpected redirect status");
        }
        Err(GmkitError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        })
    }

    fn post<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<Option<T>> {
        let response = self
            .http
            .post(self.url(endpoint))
            .query(&[("token", self.token.as_str())])
            .json(body)
            .send()?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "API POST");

        if status.is_success() {
            return decode(response);
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(GmkitError::MessageRejected {
                status: status.as_u16(),
                chunk: 0,
            });
        }
        if status.is_client_error() {
            return Err(GmkitError::auth(format!(
                "post to '{endpoint}' was refused with status {}",
                status.as_u16()
            )));
        }
        Err(GmkitError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        })
    }

    /// Walks a `page`/`per_page` listing until the service returns nothing.
    fn list_all<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut page = 1usize;
        loop {
            let params = [
                ("page", page.to_string()),
                ("per_page", self.config.list_page_size.to_string()),
            ];
            match self.get::<Vec<T>>(endpoint, &params)? {
                Some(items) if !items.is_empty() => all.extend(items),
                _ => break,
            }
            page += 1;
        }
        Ok(all)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let body = response.bytes()?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let envelope: Envelope<T> = serde_json::from_slice(&body)?;
    Ok(envelope.response)
}

impl ApiClient for HttpClient {
    fn groups(&self) -> Result<Vec<Group>> {
        let raw: Vec<RawGroup> = self.list_all("groups")?;
        Ok(raw.into_iter().map(Group::from).collect())
    }

    fn chats(&self) -> Result<Vec<Chat>> {
        let raw: Vec<RawChat> = self.list_all("chats")?;
        Ok(raw.into_iter().map(Chat::from).collect())
    }

    fn group_members(&self, group_id: &str) -> Result<Vec<Member>> {
        let group: Option<RawGroup> = self.get(&format!("groups/{group_id}"), &[])?;
        Ok(group
            .map(|g| Group::from(g).members)
            .unwrap_or_default())
    }

    fn fetch_page(
        &self,
        conversation: &Conversation,
        before_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        let mut params = vec![("limit", self.config.page_size.to_string())];
        if let Some(before) = before_id {
            params.push(("before_id", before.to_string()));
        }
        let endpoint = match conversation {
            Conversation::Group { group_id } => format!("groups/{group_id}/messages"),
            Conversation::Direct { other_user_id } => {
                params.push(("other_user_id", other_user_id.clone()));
                "direct_messages".to_string()
            }
        };

        let page: Option<RawMessagePage> = self.get(&endpoint, &params)?;
        Ok(page
            .unwrap_or_default()
            .into_messages()
            .into_iter()
            .map(|raw| raw.into_message(conversation))
            .collect())
    }

    fn send(
        &self,
        conversation: &Conversation,
        text: &str,
        source_guid: &str,
    ) -> Result<DeliveryReceipt> {
        let (endpoint, body) = match conversation {
            Conversation::Group { group_id } => (
                format!("groups/{group_id}/messages"),
                json!({ "message": { "source_guid": source_guid, "text": text } }),
            ),
            Conversation::Direct { other_user_id } => (
                "direct_messages".to_string(),
                json!({
                    "direct_message": {
                        "source_guid": source_guid,
                        "recipient_id": other_user_id,
                        "text": text,
                    }
                }),
            ),
        };

        let sent: Option<RawSent> = self.post(&endpoint, &body)?;
        sent.and_then(|s| s.into_receipt(source_guid))
            .ok_or_else(|| GmkitError::Status {
                status: 200,
                endpoint,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_token() {
        let err = HttpClient::new(ClientConfig::new()).unwrap_err();
        assert!(err.is_auth());

        let err = HttpClient::new(ClientConfig::new().with_token("")).unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_url_building() {
        let client =
            HttpClient::new(ClientConfig::new().with_token("t").with_base_url("http://host/v3/"))
                .unwrap();
        assert_eq!(client.url("groups"), "http://host/v3/groups");
        assert_eq!(client.config().base_url, "http://host/v3");
    }
}
