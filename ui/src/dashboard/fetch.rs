//! Loading the dashboard payload from the server.

use std::future::Future;

use crate::dashboard::payload::{DashboardPayload, LoadError};

pub const DASHBOARD_ENDPOINT: &str = "/api/indicadores";
pub const MAX_ATTEMPTS: u32 = 2;
/// Back-off before attempt `n + 1` is `n` times this.
pub const RETRY_BASE_MS: u32 = 500;

/// Run `attempt` up to `attempts` times, sleeping `RETRY_BASE_MS × n` after
/// the `n`-th retryable failure.
pub async fn with_retry<T, A, AFut, S, SFut>(
    attempts: u32,
    mut attempt: A,
    mut sleep: S,
) -> Result<T, LoadError>
where
    A: FnMut(u32) -> AFut,
    AFut: Future<Output = Result<T, LoadError>>,
    S: FnMut(u32) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut n = 1;
    loop {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(err) if n < attempts && err.is_retryable() => {
                let delay = RETRY_BASE_MS * n;
                tracing::warn!(attempt = n, delay_ms = delay, error = %err, "dashboard load failed; retrying");
                sleep(delay).await;
                n += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Fetch and decode the dashboard payload with the default retry policy.
pub async fn load_dashboard() -> Result<DashboardPayload, LoadError> {
    let payload = with_retry(
        MAX_ATTEMPTS,
        |_| fetch_payload(DASHBOARD_ENDPOINT),
        sleep_ms,
    )
    .await?;
    tracing::info!(
        months = payload.monthly_trends.len(),
        departments = payload.departments.len(),
        "dashboard payload loaded"
    );
    Ok(payload)
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(_ms: u32) {}

#[cfg(target_arch = "wasm32")]
async fn fetch_payload(url: &str) -> Result<DashboardPayload, LoadError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestCredentials, RequestInit, Response};

    fn network(err: JsValue) -> LoadError {
        LoadError::Network(
            err.as_string()
                .unwrap_or_else(|| format!("{err:?}")),
        )
    }

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_credentials(RequestCredentials::SameOrigin);
    let request = Request::new_with_str_and_init(url, &init).map_err(network)?;

    let window =
        web_sys::window().ok_or_else(|| LoadError::Network("window unavailable".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(LoadError::Http {
            status: response.status(),
        });
    }

    let body = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .ok_or_else(|| LoadError::Network("response body is not text".to_string()))?;
    DashboardPayload::from_json(&body)
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_payload(url: &str) -> Result<DashboardPayload, LoadError> {
    Err(LoadError::Network(format!(
        "fetching {url} is only supported in the browser"
    )))
}
