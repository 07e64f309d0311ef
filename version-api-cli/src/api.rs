use reqwest::{
    StatusCode,
    blocking::{Client, Response},
};
use serde::de::DeserializeOwned;

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, client: Client::new() }
    }

    pub fn get<O>(&self, path: &str) -> Result<O, RequestError>
    where
        O: DeserializeOwned,
    {
        let response = self.send_get(path)?;
        Ok(response.json()?)
    }

    pub fn get_text(&self, path: &str) -> Result<String, RequestError> {
        let response = self.send_get(path)?;
        Ok(response.text()?)
    }

    fn send_get(&self, path: &str) -> Result<Response, RequestError> {
        let url = self.make_url(path);
        let response = self.client.get(url).send()?;
        if response.status().is_success() { Ok(response) } else { Err(RequestError::Status(response.status())) }
    }

    fn make_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("sending request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request failed with status: {0}")]
    Status(StatusCode),
}
