//! `fetch` client for the remote score service.
use crate::dom::{js_error_message, window};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};
use wordle_score_engine::{AllScores, PushBody, RemoteError, RemoteScores, ScoreRecord, SyncDetails};

/// Where the score service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteConfig {
    pub base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("/api"),
        }
    }
}

impl RemoteConfig {
    /// URL of the scores collection.
    #[must_use]
    pub fn scores_url(&self) -> String {
        format!("{}/scores", self.base_url.trim_end_matches('/'))
    }
}

/// Credentials travel as headers, never in the URL.
#[must_use]
pub fn auth_headers(details: &SyncDetails) -> Vec<(&'static str, &str)> {
    vec![("x-user", details.user.as_str()), ("x-password", details.password.as_str())]
}

pub struct HttpRemote {
    config: RemoteConfig,
}

impl HttpRemote {
    #[must_use]
    pub const fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    async fn send(
        &self,
        method: &str,
        details: &SyncDetails,
        body: Option<String>,
    ) -> Result<Response, RemoteError> {
        let network = |err: JsValue| RemoteError::Network(js_error_message(&err));

        let headers = Headers::new().map_err(network)?;
        for (name, value) in auth_headers(details) {
            headers.set(name, value).map_err(network)?;
        }
        let init = RequestInit::new();
        init.set_method(method);
        init.set_headers(&headers);
        if let Some(body) = body {
            headers.set("content-type", "application/json").map_err(network)?;
            init.set_body(&JsValue::from_str(&body));
        }

        let url = self.config.scores_url();
        let request = Request::new_with_str_and_init(&url, &init).map_err(network)?;
        let promise = window().map_err(network)?.fetch_with_request(&request);
        let response: Response = JsFuture::from(promise)
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(network)?;

        if !response.ok() {
            log::warn!("{method} {url} returned {}", response.status());
            return Err(RemoteError::Rejected {
                status: response.status(),
            });
        }
        Ok(response)
    }
}

#[async_trait(?Send)]
impl RemoteScores for HttpRemote {
    async fn fetch_all(&self, details: &SyncDetails) -> Result<AllScores, RemoteError> {
        let response = self.send("GET", details, None).await?;
        let promise = response
            .text()
            .map_err(|err| RemoteError::MalformedResponse(js_error_message(&err)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|err| RemoteError::Network(js_error_message(&err)))?
            .as_string()
            .ok_or_else(|| RemoteError::MalformedResponse("response body is not text".into()))?;
        AllScores::from_json(&text)
    }

    async fn push(&self, details: &SyncDetails, record: &ScoreRecord) -> Result<(), RemoteError> {
        let body = serde_json::to_string(&PushBody {
            user: &details.user,
            record,
        })
        .map_err(|err| RemoteError::Network(err.to_string()))?;
        self.send("POST", details, Some(body)).await?;
        Ok(())
    }
}
