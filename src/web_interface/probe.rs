use std::time::Duration;

use log::debug;

/// True when something answers `GET url` with a 200 within `timeout`.
pub async fn status_service_responding(url: &str, timeout: Duration) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            debug!("Failed to create probe client: {}", e);
            return false;
        }
    };

    match client.get(url).send().await {
        Ok(response) => {
            debug!("Status probe {} answered {}", url, response.status());
            response.status() == reqwest::StatusCode::OK
        }
        Err(e) => {
            debug!("Status probe {} failed: {}", url, e);
            false
        }
    }
}
