use crate::domain::stock::StockRecord;
use crate::storage::StockBackend;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Upstash Redis via its REST API. The collection lives under one key as a
/// JSON-encoded string.
#[derive(Debug, Clone)]
pub struct UpstashBackend {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

/// Body of every Upstash REST reply: either `result` or `error`.
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashBackend {
    pub fn new(base_url: &str, token: &str, key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("invalid UPSTASH_REDIS_REST_TOKEN")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build upstash http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    async fn command(&self, args: &[&str]) -> anyhow::Result<Value> {
        let res = self
            .http
            .post(&self.base_url)
            .json(args)
            .send()
            .await
            .context("upstash request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read upstash response body")?;
        parse_command_response(status, &text)
    }
}

fn parse_command_response(status: reqwest::StatusCode, text: &str) -> anyhow::Result<Value> {
    let parsed = serde_json::from_str::<CommandResponse>(text);
    match parsed {
        Ok(CommandResponse {
            error: Some(error), ..
        }) => anyhow::bail!("upstash HTTP {status}: {error}"),
        Ok(_) if !status.is_success() => anyhow::bail!("upstash HTTP {status}: {text}"),
        Ok(CommandResponse { result, .. }) => Ok(result),
        Err(err) => Err(err).with_context(|| format!("upstash HTTP {status}: unexpected body {text}")),
    }
}

/// Stored value is a JSON document inside a Redis string.
fn decode_stocks(result: Value) -> anyhow::Result<Option<Vec<StockRecord>>> {
    match result {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => serde_json::from_str::<Vec<StockRecord>>(&s)
            .map(Some)
            .context("stored stock collection is not valid JSON"),
        other => anyhow::bail!("unexpected upstash GET result type: {other}"),
    }
}

#[async_trait::async_trait]
impl StockBackend for UpstashBackend {
    fn name(&self) -> &'static str {
        "upstash"
    }

    async fn load(&self) -> anyhow::Result<Option<Vec<StockRecord>>> {
        let result = self.command(&["GET", &self.key]).await?;
        decode_stocks(result)
    }

    async fn save(&self, stocks: &[StockRecord]) -> anyhow::Result<()> {
        let json = serde_json::to_string(stocks).context("stock serialize failed")?;
        let result = self.command(&["SET", &self.key, &json]).await?;
        anyhow::ensure!(
            result.as_str() == Some("OK"),
            "upstash SET returned {result}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::defaults::default_stocks;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn parses_result_and_error_bodies() {
        let ok = parse_command_response(StatusCode::OK, r#"{"result":"OK"}"#).unwrap();
        assert_eq!(ok, json!("OK"));

        let err = parse_command_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"WRONGPASS invalid password"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("WRONGPASS"));

        assert!(parse_command_response(StatusCode::BAD_GATEWAY, "<html>").is_err());
    }

    #[test]
    fn missing_key_decodes_as_empty() {
        let result = parse_command_response(StatusCode::OK, r#"{"result":null}"#).unwrap();
        assert!(decode_stocks(result).unwrap().is_none());
        assert!(decode_stocks(json!("")).unwrap().is_none());
    }

    #[test]
    fn decodes_stored_collection() {
        let stored = serde_json::to_string(&default_stocks()).unwrap();
        let decoded = decode_stocks(Value::String(stored)).unwrap().unwrap();
        assert_eq!(decoded, default_stocks());
    }

    #[test]
    fn rejects_corrupt_stored_collection() {
        assert!(decode_stocks(json!("[{\"c\": 1}]")).is_err());
        assert!(decode_stocks(json!(42)).is_err());
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_file() {
        use crate::storage::file::FileBackend;
        use crate::storage::StockStore;

        let dir = tempfile::tempdir().unwrap();
        let remote = UpstashBackend::new(
            "http://127.0.0.1:9",
            "token",
            "sgx_stocks",
            Duration::from_millis(500),
        )
        .unwrap();
        let file = FileBackend::new(dir.path().join("stocks.json"));
        let store = StockStore::new(vec![Box::new(remote), Box::new(file.clone())]);

        let mut stocks = default_stocks();
        stocks.truncate(2);
        assert_eq!(store.save(&stocks).await.unwrap(), "file");
        assert_eq!(file.load().await.unwrap(), Some(stocks.clone()));
        assert_eq!(store.load().await, stocks);
    }

    mod fake_upstash {
        use axum::extract::State;
        use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
        use axum::routing::post;
        use axum::{Json, Router};
        use serde_json::{json, Value};
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        pub const TOKEN: &str = "secret";

        #[derive(Debug, Default)]
        pub struct Recorded {
            pub values: HashMap<String, String>,
            pub commands: Vec<Vec<String>>,
            pub auth_headers: Vec<String>,
        }

        pub type Shared = Arc<Mutex<Recorded>>;

        /// Answers Upstash REST commands from an in-memory map.
        async fn command(
            State(state): State<Shared>,
            headers: HeaderMap,
            Json(cmd): Json<Vec<String>>,
        ) -> (StatusCode, Json<Value>) {
            let mut redis = state.lock().unwrap();
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            redis.auth_headers.push(auth.clone());
            redis.commands.push(cmd.clone());

            if auth != format!("Bearer {TOKEN}") {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "WRONGPASS invalid password"})),
                );
            }

            match cmd.as_slice() {
                [op, key] if op == "GET" => {
                    let value = redis.values.get(key).cloned();
                    (StatusCode::OK, Json(json!({ "result": value })))
                }
                [op, key, value] if op == "SET" => {
                    redis.values.insert(key.clone(), value.clone());
                    (StatusCode::OK, Json(json!({"result": "OK"})))
                }
                _ => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "ERR unknown command"})),
                ),
            }
        }

        /// Serves the fake on an ephemeral port and returns its base URL.
        pub async fn spawn() -> (String, Shared) {
            let state = Shared::default();
            let app = Router::new()
                .route("/", post(command))
                .with_state(state.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            (format!("http://{addr}/"), state)
        }
    }

    #[tokio::test]
    async fn get_and_set_round_trip_through_rest_api() {
        let (url, recorded) = fake_upstash::spawn().await;
        let backend = UpstashBackend::new(
            &url,
            fake_upstash::TOKEN,
            "sgx_stocks",
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(backend.load().await.unwrap().is_none());

        let mut stocks = default_stocks();
        stocks.truncate(3);
        backend.save(&stocks).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), Some(stocks.clone()));

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.commands.len(), 3);
        assert_eq!(recorded.commands[0], vec!["GET", "sgx_stocks"]);
        let set = &recorded.commands[1];
        assert_eq!(&set[..2], &["SET".to_string(), "sgx_stocks".to_string()]);
        let stored: Vec<StockRecord> = serde_json::from_str(&set[2]).unwrap();
        assert_eq!(stored, stocks);
        assert!(recorded
            .auth_headers
            .iter()
            .all(|h| h == "Bearer secret"));
    }

    #[tokio::test]
    async fn rejected_token_fails_and_store_uses_file() {
        use crate::storage::file::FileBackend;
        use crate::storage::StockStore;

        let (url, recorded) = fake_upstash::spawn().await;
        let remote =
            UpstashBackend::new(&url, "wrong", "sgx_stocks", Duration::from_secs(5)).unwrap();

        let err = remote.save(&default_stocks()).await.unwrap_err();
        assert!(format!("{err:#}").contains("WRONGPASS"));

        let dir = tempfile::tempdir().unwrap();
        let store = StockStore::new(vec![
            Box::new(remote),
            Box::new(FileBackend::new(dir.path().join("stocks.json"))),
        ]);
        let mut stocks = default_stocks();
        stocks.truncate(1);
        assert_eq!(store.save(&stocks).await.unwrap(), "file");
        assert_eq!(store.load().await, stocks);
        assert!(recorded.lock().unwrap().values.is_empty());
    }
}
