use super::{ApiError, ApiResult};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    pub fn post(path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP round trip plus the delay used between retries.
///
/// Non-2xx statuses are returned as replies, not errors; the caller decides
/// what counts as a failure.
pub(crate) trait Transport {
    async fn send(&self, base_url: &str, req: &ApiRequest) -> ApiResult<ApiReply>;

    async fn pause(&self, delay: Duration);
}

/// Browser `fetch` through reqwest. Stateless, so it can live in a signal.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HttpTransport;

impl Transport for HttpTransport {
    async fn send(&self, base_url: &str, req: &ApiRequest) -> ApiResult<ApiReply> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", base_url, req.path);
        let mut builder = match req.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url),
        };
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(ApiError::network)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(ApiError::network)?;
        Ok(ApiReply { status, body })
    }

    async fn pause(&self, delay: Duration) {
        sleep(delay).await;
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}
