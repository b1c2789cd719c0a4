//! Remote ingestion trigger: asks a running server to start a run.

use anyhow::{bail, Result};

use crate::RunTarget;

pub(crate) async fn trigger(
    client: &reqwest::Client,
    endpoint: &str,
    target: RunTarget,
) -> Result<serde_json::Value> {
    let url = format!("{}{}", endpoint.trim_end_matches('/'), target.path());
    tracing::debug!(%url, "Triggering remote ingestion");
    let resp = client.post(&url).send().await?;
    let status = resp.status();
    let body: serde_json::Value = resp.json().await?;
    if !status.is_success() {
        let error = body.get("error").and_then(|e| e.as_str()).unwrap_or("no error message");
        bail!("ingestion failed with {status}: {error}");
    }
    Ok(body)
}

pub(crate) async fn run(endpoint: &str, target: RunTarget) -> Result<()> {
    let client = reqwest::Client::new();
    let body = trigger(&client, endpoint, target).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "test code")]

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn posts_to_the_run_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ingest/reviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "reviewsAdded": 28,
                "validationErrors": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/", server.uri());
        let body = trigger(&reqwest::Client::new(), &endpoint, RunTarget::Reviews).await.unwrap();
        assert_eq!(body["reviewsAdded"], 28);
    }

    #[tokio::test]
    async fn failed_run_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ingest/all"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "error": "failed to clear critic_reviews: timed out"
            })))
            .mount(&server)
            .await;

        let err = trigger(&reqwest::Client::new(), &server.uri(), RunTarget::All)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("critic_reviews"), "{err}");
    }
}
