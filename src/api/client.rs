use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::library::Track;

/// Body of the catalogue endpoints.
#[derive(Debug, Deserialize)]
struct TrackList {
    #[serde(default)]
    results: Vec<Track>,
}

/// Error body the service sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

/// Blocking HTTP client for the music service.
#[derive(Debug, Clone)]
pub struct MusicApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl MusicApi {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, when there is one.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send()?;
        debug!("{} {}", response.status(), response.url());
        parse(response)
    }

    pub fn search(&self, query: &str) -> Result<Vec<Track>> {
        let request = self
            .http
            .get(self.url("/music/search"))
            .query(&[("query", query)]);
        Ok(self.execute::<TrackList>(request)?.results)
    }

    pub fn popular(&self) -> Result<Vec<Track>> {
        let request = self.http.get(self.url("/music/popular"));
        Ok(self.execute::<TrackList>(request)?.results)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = Credentials {
            username: None,
            email,
            password,
        };
        self.execute(self.http.post(self.url("/auth/login")).json(&body))
    }

    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthSession> {
        let body = Credentials {
            username: Some(username),
            email,
            password,
        };
        self.execute(self.http.post(self.url("/auth/register")).json(&body))
    }
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|m| m.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
