use crate::transport::{BridgeStatus, RemoteTool, ToolTransport};
use crate::{Error, Result};
use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the tool bridge (`/api/tools/call`, `/api/tools`, `/api/status`).
#[derive(Clone)]
pub struct BridgeClient {
    base: Url,
    timeout: Duration,
    http: Client<HttpConnector, Full<Bytes>>,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default, rename = "isError")]
    is_error: bool,
}

#[derive(Debug, Deserialize)]
struct ToolList {
    #[serde(default)]
    tools: Vec<RemoteTool>,
}

impl BridgeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.scheme() != "http" {
            return Err(Error::InvalidUrl(format!(
                "{}: only http:// bridges are supported",
                base_url
            )));
        }
        if base.host_str().is_none() {
            return Err(Error::InvalidUrl(format!("{}: missing host", base_url)));
        }

        let http = Client::builder(TokioExecutor::new()).build_http();

        Ok(Self {
            base,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Uri> {
        let url = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);
        url.parse::<Uri>()
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        let uri = self.endpoint(path)?;
        tracing::debug!("{} {}", method, uri);

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| Error::Http(e.to_string()))?;

        let exchange = async {
            let response = self
                .http
                .request(request)
                .await
                .map_err(|e| Error::Http(e.to_string()))?;
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::Http(e.to_string()))?
                .to_bytes();
            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_secs()))??;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }

        Ok(bytes)
    }
}

/// Human-readable message of a failed bridge response.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body)
        && let Some(detail) = value.get("detail").filter(|d| !d.is_null())
    {
        return match detail {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    }
}

/// One content item of a tool result. Text holding JSON is parsed.
fn content_value(item: Value) -> Value {
    let text = match &item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("text") => {
            map.get("text").and_then(Value::as_str)
        }
        _ => None,
    };

    match text {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        None => item,
    }
}

/// Decode the body of `POST /api/tools/call` into the tool's payload.
///
/// A single result item is unwrapped, no items is `null`, several stay an array.
pub fn decode_call_response(tool: &str, body: &[u8]) -> Result<Value> {
    let response: CallResponse = serde_json::from_slice(body)?;
    let mut items: Vec<Value> = response
        .result
        .unwrap_or_default()
        .into_iter()
        .map(content_value)
        .collect();

    if response.is_error {
        let message = items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Err(Error::Tool {
            tool: tool.to_string(),
            message: if message.is_empty() {
                "tool reported an error".to_string()
            } else {
                message
            },
        });
    }

    Ok(match items.len() {
        0 => Value::Null,
        1 => items.remove(0),
        _ => Value::Array(items),
    })
}

#[async_trait]
impl ToolTransport for BridgeClient {
    async fn invoke(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value> {
        let body = serde_json::to_vec(&json!({"name": name, "arguments": arguments}))?;
        let bytes = self.send(Method::POST, "api/tools/call", Some(body)).await?;
        let payload = decode_call_response(name, &bytes)?;
        tracing::info!("{} returned {} bytes", name, bytes.len());
        Ok(payload)
    }

    async fn list_tools(&self) -> Result<Vec<RemoteTool>> {
        let bytes = self.send(Method::GET, "api/tools", None).await?;
        let list: ToolList = serde_json::from_slice(&bytes)?;
        Ok(list.tools)
    }

    async fn status(&self) -> Result<BridgeStatus> {
        let bytes = self.send(Method::GET, "api/status", None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_single_item_is_unwrapped() {
        let body = br#"{"result": [{"applications": []}], "isError": false}"#;
        assert_eq!(
            decode_call_response("list_applications", body).unwrap(),
            json!({"applications": []})
        );
    }

    #[test]
    fn test_empty_and_missing_result_is_null() {
        assert_eq!(
            decode_call_response("list_jobs", br#"{"result": [], "isError": false}"#).unwrap(),
            Value::Null
        );
        assert_eq!(
            decode_call_response("list_jobs", br#"{"result": null}"#).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_text_items_holding_json_are_parsed() {
        let body = br#"{"result": [{"type": "text", "text": "{\"id\": \"app-1\"}"}, "plain"]}"#;
        assert_eq!(
            decode_call_response("get_application", body).unwrap(),
            json!([{"id": "app-1"}, "plain"])
        );
    }

    #[test]
    fn test_is_error_becomes_tool_error() {
        let body = br#"{"result": ["Application app-9 not found"], "isError": true}"#;
        let err = decode_call_response("get_application", body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tool get_application failed: Application app-9 not found"
        );
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, br#"{"detail": "MCP down"}"#),
            "MCP down"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b""),
            "Bad Gateway"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, b"nope"), "nope");
    }

    #[test]
    fn test_rejects_bad_urls() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            BridgeClient::new("not a url", timeout),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            BridgeClient::new("https://bridge.example.com", timeout),
            Err(Error::InvalidUrl(_))
        ));
    }

    /// Serve one canned HTTP response, returning the raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);

                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).to_string()
        });

        (base, handle)
    }

    #[tokio::test]
    async fn test_invoke_posts_name_and_arguments() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"result": [{"jobs": [{"jobId": 1}]}], "isError": false}"#,
        )
        .await;
        let client = BridgeClient::new(&base, Duration::from_secs(5)).unwrap();

        let mut arguments = Map::new();
        arguments.insert("app_id".to_string(), json!("app-1"));
        let payload = client.invoke("list_jobs", &arguments).await.unwrap();
        assert_eq!(payload, json!({"jobs": [{"jobId": 1}]}));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/tools/call HTTP/1.1"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent, json!({"name": "list_jobs", "arguments": {"app_id": "app-1"}}));
    }

    #[tokio::test]
    async fn test_non_success_status_carries_detail() {
        let (base, _server) = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#).await;
        let client = BridgeClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.invoke("list_jobs", &Map::new()).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 500, .. }));
        assert_eq!(err.to_string(), "Bridge returned 500: boom");
    }

    #[tokio::test]
    async fn test_status_and_tool_listing() {
        let (base, _server) = serve_once("200 OK", r#"{"connected": true}"#).await;
        let client = BridgeClient::new(&base, Duration::from_secs(5)).unwrap();
        assert!(client.status().await.unwrap().connected);

        let (base, server) = serve_once(
            "200 OK",
            r#"{"tools": [{"name": "list_jobs", "description": "List jobs", "inputSchema": {}}]}"#,
        )
        .await;
        let client = BridgeClient::new(&base, Duration::from_secs(5)).unwrap();
        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "list_jobs");
        assert!(server.await.unwrap().starts_with("GET /api/tools HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = BridgeClient::new(&base, Duration::from_secs(5)).unwrap();
        assert!(matches!(client.status().await, Err(Error::Http(_))));
    }
}
