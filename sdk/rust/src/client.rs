//! Typed async client for a running responsive-web server.

use std::collections::BTreeMap;

use reqwest::{redirect, Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
pub struct Origin {
    pub origin: String,
}

#[derive(Debug, Deserialize)]
pub struct UuidResponse {
    pub uuid: String,
}

/// A header or argument value: one string, or several in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MultiValue {
    Single(String),
    Many(Vec<String>),
}

impl MultiValue {
    pub fn first(&self) -> Option<&str> {
        match self {
            MultiValue::Single(v) => Some(v),
            MultiValue::Many(vs) => vs.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Headers {
    pub headers: BTreeMap<String, MultiValue>,
}

/// The `/get` echo.
#[derive(Debug, Deserialize)]
pub struct GetEcho {
    pub args: BTreeMap<String, MultiValue>,
    pub headers: BTreeMap<String, MultiValue>,
    pub origin: String,
    pub url: String,
}

pub struct EchoClient {
    client: Client,
    base_url: String,
}

impl EchoClient {
    /// Client that never follows redirects, so `status` observes them.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(ClientError::Status { status, body });
        }
        Ok(resp.json().await?)
    }

    /// The caller's address as seen by the server.
    pub async fn ip(&self) -> Result<String, ClientError> {
        Ok(self.get_json::<Origin>("/ip").await?.origin)
    }

    pub async fn uuid(&self) -> Result<String, ClientError> {
        Ok(self.get_json::<UuidResponse>("/uuid").await?.uuid)
    }

    pub async fn headers(&self) -> Result<Headers, ClientError> {
        self.get_json("/headers").await
    }

    /// `GET /get` with the given query pairs.
    pub async fn get(&self, query: &[(&str, &str)]) -> Result<GetEcho, ClientError> {
        let resp = self.client.get(self.url("/get")).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(ClientError::Status { status, body });
        }
        Ok(resp.json().await?)
    }

    /// Raw response of `/status/{code}`; non-2xx is not an error here.
    pub async fn status(&self, code: u16) -> Result<Response, ClientError> {
        Ok(self.client.get(self.url(&format!("/status/{code}"))).send().await?)
    }

    pub async fn bytes(&self, n: usize) -> Result<Vec<u8>, ClientError> {
        let resp = self.client.get(self.url(&format!("/bytes/{n}"))).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(ClientError::Status { status, body });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_value_shapes() {
        let single: MultiValue = serde_json::from_str("\"a\"").unwrap();
        let many: MultiValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(single.first(), Some("a"));
        assert_eq!(many, MultiValue::Many(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = EchoClient::with_client(Client::new(), "http://127.0.0.1:8080/");
        assert_eq!(client.url("/ip"), "http://127.0.0.1:8080/ip");
    }
}
