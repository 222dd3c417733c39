use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// The API answers either `{ "data": ... }` or the bare value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> AppResult<T> {
        let response = self.request(Method::GET, path, token).send().await?;
        Self::decode(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let response = self
            .request(Method::POST, path, token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST where only success matters.
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<()> {
        let response = self
            .request(Method::POST, path, token)
            .json(body)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    /// PUT where only success matters.
    pub async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<()> {
        let response = self
            .request(Method::PUT, path, token)
            .json(body)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("API request failed: {} - {}", status, body);
        Err(AppError::from_status(status.as_u16(), error_message(&body)))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        parse_payload(&bytes)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string())
}

pub(crate) fn parse_payload<T: DeserializeOwned>(bytes: &[u8]) -> AppResult<T> {
    let payload: Payload<T> = serde_json::from_slice(bytes)?;
    Ok(payload.into_inner())
}
