use std::time::Duration;

use crate::types::{ProgressResponse, ResultsResponse, StartResponse};
use crate::{ApiError, ApiErrorKind, JobStatus, SegmentReport};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three calls the segmentation server exposes to this client.
#[async_trait::async_trait]
pub trait SegmentationApi: Send + Sync {
    /// Submits the form-encoded job parameters. `Ok` means the server
    /// acknowledged the job and polling may begin.
    async fn start_job(&self, fields: &[(String, String)]) -> Result<(), ApiError>;

    /// Queries the status endpoint once.
    async fn poll_status(&self) -> Result<JobStatus, ApiError>;

    /// Fetches the terminal result payload.
    async fn fetch_results(&self) -> Result<SegmentReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::new(ApiErrorKind::Malformed, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SegmentationApi for ReqwestApi {
    async fn start_job(&self, fields: &[(String, String)]) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/run_segmentation"))
            .form(fields)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body: StartResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiErrorKind::Malformed, err.to_string()))?;
        if body.success {
            Ok(())
        } else {
            let message = body
                .error
                .unwrap_or_else(|| "segmentation job was not accepted".to_string());
            Err(ApiError::new(ApiErrorKind::Rejected, message))
        }
    }

    async fn poll_status(&self) -> Result<JobStatus, ApiError> {
        let body: ProgressResponse = self.get_json("/api/analysis-progress").await?;
        Ok(body.status)
    }

    async fn fetch_results(&self) -> Result<SegmentReport, ApiError> {
        let body: ResultsResponse = self.get_json("/api/results").await?;
        if !body.success {
            return Err(ApiError::new(
                ApiErrorKind::Rejected,
                "server reported no results",
            ));
        }
        body.results
            .ok_or_else(|| ApiError::new(ApiErrorKind::Malformed, "results payload missing"))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
