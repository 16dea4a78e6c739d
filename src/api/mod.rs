mod transport;

#[cfg(test)]
pub(crate) use transport::scripted::ScriptedTransport;
pub(crate) use transport::{ApiReply, ApiRequest, HttpTransport, Transport};

use crate::models::{NavMove, NavNode};
use crate::tree::{sort_by_order, stamp_order};
use leptos::logging::{error, log, warn};
use std::time::Duration;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8081";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(reply: &ApiReply, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({}): {}", reply.status, reply.body),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let api_url = window_api_url()
            .or_else(|| option_env!("NAV_API_URL").map(str::to_string))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url: normalize_base_url(&api_url),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

// We support BOTH `window.ENV.API_URL` (documented in index.html) and
// `window.ENV.api_url` for compatibility.
#[cfg(target_arch = "wasm32")]
fn window_api_url() -> Option<String> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    ["API_URL", "api_url"].into_iter().find_map(|key| {
        js_sys::Reflect::get(&env, &key.into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn window_api_url() -> Option<String> {
    None
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Bounded retry: `retries` extra attempts after the first, `delay` apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// `GET /nav` body to tree. Blank and `null` bodies are an empty tree.
pub(crate) fn decode_tree(body: &str) -> ApiResult<Vec<NavNode>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let rows: Option<Vec<NavNode>> = serde_json::from_str(body).map_err(ApiError::parse)?;
    Ok(rows.unwrap_or_default())
}

#[derive(Clone, Debug)]
pub(crate) struct NavApiClient<T = HttpTransport> {
    pub(crate) base_url: String,
    pub(crate) policy: RetryPolicy,
    pub(crate) transport: T,
}

impl NavApiClient<HttpTransport> {
    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url, HttpTransport)
    }
}

impl<T: Transport> NavApiClient<T> {
    pub fn new(base_url: String, transport: T) -> Self {
        Self {
            base_url: normalize_base_url(&base_url),
            policy: RetryPolicy::default(),
            transport,
        }
    }

    #[cfg(test)]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send `req`, retrying non-2xx replies and transport errors per the
    /// client's policy. The last failure is returned once retries run out.
    async fn request_with_retry(&self, req: ApiRequest) -> ApiResult<ApiReply> {
        let mut retries_left = self.policy.retries;
        loop {
            let err = match self.transport.send(&self.base_url, &req).await {
                Ok(reply) if reply.is_success() => return Ok(reply),
                Ok(reply) => ApiError::http(&reply, "Server responded with an error"),
                Err(e) => e,
            };

            if retries_left == 0 {
                return Err(err);
            }
            warn!(
                "{} {} failed ({}); retrying, {} left",
                req.method.as_str(),
                req.path,
                err,
                retries_left
            );
            retries_left -= 1;
            self.transport.pause(self.policy.delay).await;
        }
    }

    /// Fetch the stored tree, top level sorted by `order`.
    ///
    /// A body that is not a nav list is logged and read as an empty tree.
    pub async fn load_tree(&self) -> ApiResult<Vec<NavNode>> {
        let reply = self.request_with_retry(ApiRequest::get("/nav")).await?;
        let rows = match decode_tree(&reply.body) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Ignoring malformed nav body: {e}");
                Vec::new()
            }
        };
        Ok(sort_by_order(rows))
    }

    /// Replace the stored tree. Top-level `order` is rewritten from position.
    pub async fn save_tree(&self, tree: &[NavNode]) -> ApiResult<()> {
        let body = serde_json::to_value(stamp_order(tree)).map_err(ApiError::parse)?;
        self.request_with_retry(ApiRequest::post("/nav", body))
            .await
            .map(|_| ())
    }

    /// Report a reorder. Best-effort: failures end up in the log only.
    pub async fn track_move(&self, mv: &NavMove) {
        let body = match serde_json::to_value(mv) {
            Ok(b) => b,
            Err(e) => {
                error!("Tracking error: {e}");
                return;
            }
        };
        match self
            .request_with_retry(ApiRequest::post("/nav/track", body))
            .await
        {
            Ok(_) => log!("Tracked move of {} ({} -> {})", mv.id, mv.from, mv.to),
            Err(e) => error!("Tracking error after retries: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::transport::Method;
    use super::*;
    use crate::models::NavId;
    use pretty_assertions::assert_eq;

    fn client(t: ScriptedTransport) -> NavApiClient<ScriptedTransport> {
        NavApiClient::new("http://localhost:8081/".to_string(), t)
    }

    fn titles(tree: &[NavNode]) -> Vec<&str> {
        tree.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_default_retry_policy() {
        let p = RetryPolicy::default();
        assert_eq!(p.retries, 3);
        assert_eq!(p.delay, Duration::from_millis(500));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://api.local/"), "http://api.local");
        assert_eq!(normalize_base_url(" http://api.local// "), "http://api.local");
        assert_eq!(normalize_base_url(DEFAULT_API_URL), DEFAULT_API_URL);
    }

    #[test]
    fn test_client_new_normalizes_base_url() {
        let c = client(ScriptedTransport::new());
        assert_eq!(c.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_decode_tree_blank_and_null() {
        assert!(decode_tree("").unwrap().is_empty());
        assert!(decode_tree("  \n").unwrap().is_empty());
        assert!(decode_tree("null").unwrap().is_empty());
        assert!(decode_tree("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_tree_malformed_is_parse_error() {
        let err = decode_tree("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_load_tree_sorts_by_order() {
        let body = r#"[{"id":"a","title":"Home","order":1},{"id":"b","title":"Jobs","order":0}]"#;
        let c = client(ScriptedTransport::new().reply(200, body));

        let tree = c.load_tree().await.expect("load should succeed");
        assert_eq!(titles(&tree), vec!["Jobs", "Home"]);

        let sent = c.transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/nav");
    }

    #[tokio::test]
    async fn test_load_tree_empty_body_is_empty_tree() {
        let c = client(ScriptedTransport::new().reply(200, ""));
        assert_eq!(c.load_tree().await.unwrap(), Vec::<NavNode>::new());
    }

    #[tokio::test]
    async fn test_load_tree_malformed_body_is_empty_tree() {
        let c = client(ScriptedTransport::new().reply(200, "{not json"));
        assert!(c.load_tree().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_tree_surfaces_failure_after_retries() {
        let c = client(
            ScriptedTransport::new()
                .reply(503, "down")
                .fail("connection refused")
                .reply(500, "")
                .reply(502, "bad gateway"),
        );
        let err = c.load_tree().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert!(err.message.contains("502"));
        assert_eq!(c.transport.sent_count(), 4);
    }

    #[tokio::test]
    async fn test_save_tree_stamps_top_level_order() {
        let tree = vec![
            NavNode::new("b", "Jobs").with_order(7),
            NavNode::new("a", "Home")
                .with_order(3)
                .with_children(vec![NavNode::new("a1", "Sub").with_order(9)]),
        ];
        let c = client(ScriptedTransport::new().reply(200, "ok"));
        c.save_tree(&tree).await.expect("save should succeed");

        let sent = c.transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/nav");
        let body = sent[0].body.clone().unwrap();
        assert_eq!(body[0]["id"], "b");
        assert_eq!(body[0]["order"], 0);
        assert_eq!(body[1]["order"], 1);
        // Nested order is sent as-is.
        assert_eq!(body[1]["children"][0]["order"], 9);
    }

    #[tokio::test]
    async fn test_save_tree_reports_failure() {
        let c = client(ScriptedTransport::new().fail("offline"))
            .with_policy(RetryPolicy {
                retries: 0,
                delay: Duration::ZERO,
            });
        let err = c.save_tree(&[NavNode::new("a", "Home")]).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
        assert!(c.transport.pauses.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_track_move_recovers_on_fourth_attempt() {
        let c = client(
            ScriptedTransport::new()
                .reply(500, "")
                .reply(500, "")
                .reply(500, "")
                .reply(200, ""),
        );
        let mv = NavMove {
            id: NavId::Num(4),
            from: 0,
            to: 2,
        };
        c.track_move(&mv).await;

        let sent = c.transport.sent.borrow();
        assert_eq!(sent.len(), 4);
        assert!(sent.iter().all(|r| r.path == "/nav/track"));
        assert_eq!(
            sent[0].body,
            Some(serde_json::json!({"id": 4, "from": 0, "to": 2}))
        );
        assert_eq!(
            *c.transport.pauses.borrow(),
            vec![Duration::from_millis(500); 3]
        );
    }

    #[tokio::test]
    async fn test_track_move_gives_up_quietly() {
        let c = client(
            ScriptedTransport::new()
                .reply(500, "")
                .reply(500, "")
                .reply(500, "")
                .reply(500, "")
                .reply(200, ""),
        );
        let mv = NavMove {
            id: "a".into(),
            from: 1,
            to: 0,
        };
        c.track_move(&mv).await;
        // One initial attempt plus three retries; the fifth scripted reply is never used.
        assert_eq!(c.transport.sent_count(), 4);
        assert_eq!(c.transport.script.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_success_needs_no_pause() {
        let c = client(ScriptedTransport::new().reply(204, ""));
        c.load_tree().await.unwrap();
        assert!(c.transport.pauses.borrow().is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_env_config_reads_window_env() {
        let window = web_sys::window().expect("browser window");
        let env = js_sys::Object::new();
        js_sys::Reflect::set(&env, &"API_URL".into(), &"http://nav.test/".into()).unwrap();
        js_sys::Reflect::set(&window, &"ENV".into(), &env).unwrap();

        assert_eq!(EnvConfig::new().api_url, "http://nav.test");

        js_sys::Reflect::delete_property(&window, &"ENV".into()).unwrap();
    }
}
