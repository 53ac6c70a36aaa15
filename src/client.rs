use crate::model::{ClientConfig, ContainerStatus, RestartResponse};
use anyhow::{Context, Result};
use reqwest::Url;

const STATUS_ENDPOINT: &str = "api/status-nginx";
const RESTART_ENDPOINT: &str = "api/restart-nginx";

/// HTTP client for the dashboard API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(cfg.connect_timeout)
            .timeout(cfg.request_timeout)
            .build()
            .context("build HTTP client")?;

        // A trailing slash keeps Url::join from clobbering a path prefix
        // when the dashboard is mounted behind a reverse proxy.
        let mut base = cfg.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .with_context(|| format!("invalid base URL {:?}", cfg.base_url))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("build endpoint URL for {path}"))
    }

    /// `GET /api/status-nginx`: fetch the current container status.
    pub async fn fetch_status(&self) -> Result<ContainerStatus> {
        let url = self.endpoint(STATUS_ENDPOINT)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("status request failed")?
            .error_for_status()
            .context("status request rejected")?;
        resp.json::<ContainerStatus>()
            .await
            .context("malformed status response")
    }

    /// `POST /api/restart-nginx`: restart the container.
    ///
    /// The server answers 200 with a confirmation message and reports
    /// failures as HTTP 500 with the error in the same JSON shape; the body
    /// message is surfaced either way.
    pub async fn restart(&self) -> Result<RestartResponse> {
        let url = self.endpoint(RESTART_ENDPOINT)?;
        let resp = self
            .http
            .post(url)
            .send()
            .await
            .context("restart request failed")?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<RestartResponse>()
                .await
                .context("malformed restart response");
        }

        let message = resp
            .json::<RestartResponse>()
            .await
            .map(|r| r.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        anyhow::bail!("restart rejected: {message}")
    }
}
