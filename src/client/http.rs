use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};

use crate::client::api::{
    ApiError, Backend, BestScore, ErrorRecord, Group, MissReport, NewGroup, ResultReport,
};
use crate::session::question::ExerciseType;

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn checked(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(status.as_u16()))
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = Self::checked(response)?.text()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Backend for HttpBackend {
    fn fetch_errors(&self, name: &str, mode: ExerciseType) -> Result<Vec<ErrorRecord>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/user-errors"))
            .query(&[("name", name), ("type", mode.as_str())])
            .send()?;
        Self::decode(response)
    }

    fn fetch_best_score(&self, name: &str, mode: ExerciseType) -> Result<BestScore, ApiError> {
        let response = self
            .client
            .get(self.url("/api/user-best"))
            .query(&[("name", name), ("type", mode.as_str())])
            .send()?;
        Self::decode(response)
    }

    fn record_error(&self, report: &MissReport) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/user-error"))
            .json(report)
            .send()?;
        Self::checked(response).map(|_| ())
    }

    fn post_result(&self, report: &ResultReport) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/result"))
            .json(report)
            .send()?;
        Self::checked(response).map(|_| ())
    }

    fn find_group(&self, secret_key: &str) -> Result<Option<Group>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/groups"))
            .query(&[("secret_key", secret_key)])
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).map(Some)
    }

    fn create_group(&self, name: &str) -> Result<Group, ApiError> {
        let response = self
            .client
            .post(self.url("/api/groups"))
            .json(&NewGroup { name })
            .send()?;
        Self::decode(response)
    }
}
