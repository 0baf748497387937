use super::http::{is_retryable, retry_backoff};
use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Serves one scripted HTTP response per connection, then stops.
async fn spawn_scripted_server(responses: Vec<(u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    format!("http://{addr}/v1")
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

fn clear_embedding_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var(EmbeddingConfig::ENV_URL);
        env::remove_var(EmbeddingConfig::ENV_MODEL);
        env::remove_var(EmbeddingConfig::ENV_API_KEY);
        env::remove_var(EmbeddingConfig::ENV_TIMEOUT_SECS);
        env::remove_var(EmbeddingConfig::ENV_MAX_RETRIES);
        env::remove_var(EmbeddingConfig::ENV_DIM);
    }
}

#[tokio::test]
async fn test_stub_is_deterministic() {
    let stub = StubEmbedder::new(32).unwrap();
    let a = stub.embed("forklift operation").await.unwrap();
    let b = stub.embed("forklift operation").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
}

#[tokio::test]
async fn test_stub_vectors_are_unit_length() {
    let stub = StubEmbedder::default();
    let v = stub.embed("hazard identification").await.unwrap();
    assert_eq!(v.len(), crate::constants::DEFAULT_STUB_EMBEDDING_DIM);
    assert!((norm(&v) - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_stub_distinguishes_texts() {
    let stub = StubEmbedder::new(16).unwrap();
    let a = stub.embed("welding").await.unwrap();
    let b = stub.embed("Welding").await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_stub_rejects_empty_text() {
    let stub = StubEmbedder::new(8).unwrap();
    assert!(matches!(
        stub.embed("   ").await,
        Err(EmbeddingError::EmptyText)
    ));
}

#[test]
fn test_stub_rejects_zero_dim() {
    assert!(matches!(
        StubEmbedder::new(0),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[tokio::test]
async fn test_mock_serves_registered_vectors_and_failures() {
    let mock = MockEmbedder::new()
        .with_vector("a", vec![1.0, 0.0])
        .with_failure("b");

    assert_eq!(mock.embed("a").await.unwrap(), vec![1.0, 0.0]);
    assert!(matches!(
        mock.embed("b").await,
        Err(EmbeddingError::Unavailable { .. })
    ));
    assert!(mock.embed("c").await.is_err());
    assert_eq!(mock.calls(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_mock_stub_fallback() {
    let mock = MockEmbedder::new().with_stub_fallback(4);
    let v = mock.embed("anything").await.unwrap();
    assert_eq!(v.len(), 4);
    assert_eq!(mock.call_count(), 1);
}

#[test]
fn test_config_defaults() {
    let config = EmbeddingConfig::default();
    assert!(config.is_stub());
    assert_eq!(config.model, DEFAULT_EMBEDDING_MODEL);
    assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_bad_url() {
    let config = EmbeddingConfig::http("ftp://example.com");
    assert!(matches!(
        config.validate(),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_config_rejects_zero_retries() {
    let config = EmbeddingConfig {
        max_retries: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_config_from_env() {
    clear_embedding_env();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::set_var(EmbeddingConfig::ENV_URL, "http://localhost:9999/v1");
        env::set_var(EmbeddingConfig::ENV_MODEL, "all-MiniLM-L6-v2");
        env::set_var(EmbeddingConfig::ENV_TIMEOUT_SECS, "5");
        env::set_var(EmbeddingConfig::ENV_DIM, "384");
    }

    let config = EmbeddingConfig::from_env().expect("valid env");
    clear_embedding_env();

    assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999/v1"));
    assert_eq!(config.model, "all-MiniLM-L6-v2");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.expected_dim, Some(384));
    assert_eq!(config.stub_dim, 384);
}

#[test]
#[serial]
fn test_config_from_env_invalid_number() {
    clear_embedding_env();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe { env::set_var(EmbeddingConfig::ENV_MAX_RETRIES, "many") };

    let result = EmbeddingConfig::from_env();
    clear_embedding_env();

    assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
}

#[test]
fn test_factory_builds_stub_without_url() {
    let provider = build_provider(&EmbeddingConfig::stub(12)).unwrap();
    assert_eq!(provider.name(), "stub");
    assert_eq!(provider.embedding_dim(), Some(12));
}

#[test]
fn test_factory_builds_http_with_url() {
    let provider = build_provider(&EmbeddingConfig::http("http://localhost:1/v1")).unwrap();
    assert_eq!(provider.name(), "http");
}

#[test]
fn test_http_endpoint_normalization() {
    let embedder = HttpEmbedder::from_config(&EmbeddingConfig::http("http://host:8000/v1/")).unwrap();
    assert_eq!(embedder.endpoint(), "http://host:8000/v1/embeddings");
}

#[test]
fn test_retry_classification() {
    assert!(is_retryable(&EmbeddingError::Request {
        reason: "connection refused".into()
    }));
    assert!(is_retryable(&EmbeddingError::Status {
        status: 429,
        body: String::new()
    }));
    assert!(is_retryable(&EmbeddingError::Status {
        status: 503,
        body: String::new()
    }));
    assert!(!is_retryable(&EmbeddingError::Status {
        status: 400,
        body: String::new()
    }));
    assert!(!is_retryable(&EmbeddingError::EmptyText));
}

#[test]
fn test_retry_backoff_is_capped() {
    assert!(retry_backoff(1) < retry_backoff(2));
    assert_eq!(retry_backoff(10), retry_backoff(50));
}

#[tokio::test]
async fn test_http_embed_success() {
    let body = r#"{"data":[{"index":0,"embedding":[0.6,0.8]}]}"#.to_string();
    let url = spawn_scripted_server(vec![(200, body)]).await;

    let embedder = HttpEmbedder::from_config(&EmbeddingConfig::http(url)).unwrap();
    let v = embedder.embed("hello").await.unwrap();
    assert_eq!(v, vec![0.6, 0.8]);
}

#[tokio::test]
async fn test_http_embed_retries_server_error() {
    let ok = r#"{"data":[{"index":0,"embedding":[1.0,0.0]}]}"#.to_string();
    let url = spawn_scripted_server(vec![(503, "{}".to_string()), (200, ok)]).await;

    let config = EmbeddingConfig {
        max_retries: 2,
        ..EmbeddingConfig::http(url)
    };
    let embedder = HttpEmbedder::from_config(&config).unwrap();
    assert_eq!(embedder.embed("hello").await.unwrap(), vec![1.0, 0.0]);
}

#[tokio::test]
async fn test_http_embed_client_error_is_not_retried() {
    let url = spawn_scripted_server(vec![(400, r#"{"error":"bad"}"#.to_string())]).await;

    let embedder = HttpEmbedder::from_config(&EmbeddingConfig::http(url)).unwrap();
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_http_embed_dimension_check() {
    let body = r#"{"data":[{"index":0,"embedding":[1.0,0.0,0.0]}]}"#.to_string();
    let url = spawn_scripted_server(vec![(200, body)]).await;

    let config = EmbeddingConfig {
        expected_dim: Some(2),
        ..EmbeddingConfig::http(url)
    };
    let embedder = HttpEmbedder::from_config(&config).unwrap();
    assert!(matches!(
        embedder.embed("hello").await,
        Err(EmbeddingError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[tokio::test]
async fn test_http_embed_count_mismatch() {
    let body = r#"{"data":[]}"#.to_string();
    let url = spawn_scripted_server(vec![(200, body)]).await;

    let embedder = HttpEmbedder::from_config(&EmbeddingConfig::http(url)).unwrap();
    assert!(matches!(
        embedder.embed("hello").await,
        Err(EmbeddingError::InvalidResponse { .. })
    ));
}
