//! [`AppLauncher`] – thin client for the HTTP application-control
//! endpoint (launch / stop). Not part of the commissioning core; a
//! failed call surfaces as a "system busy" key-command status upstream.

use matterhub_types::HubError;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct AppCommand<'a> {
    app_id: &'a str,
}

pub struct AppLauncher {
    base_url: String,
    client: reqwest::Client,
}

impl AppLauncher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn launch(&self, app_id: &str) -> Result<(), HubError> {
        self.post("launch", app_id).await
    }

    pub async fn stop(&self, app_id: &str) -> Result<(), HubError> {
        self.post("stop", app_id).await
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/apps/{action}", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, action: &str, app_id: &str) -> Result<(), HubError> {
        let url = self.endpoint(action);
        let response = self
            .client
            .post(&url)
            .json(&AppCommand { app_id })
            .send()
            .await
            .map_err(|e| HubError::Transport(format!("{action} request: {e}")))?;

        if !response.status().is_success() {
            return Err(HubError::Transport(format!(
                "{action} for '{app_id}' returned {}",
                response.status()
            )));
        }
        info!(app_id, action, "application command accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slash() {
        let launcher = AppLauncher::new("http://stb:8008/");
        assert_eq!(launcher.endpoint("launch"), "http://stb:8008/apps/launch");
        let launcher = AppLauncher::new("http://stb:8008");
        assert_eq!(launcher.endpoint("stop"), "http://stb:8008/apps/stop");
    }
}
