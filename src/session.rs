//! The request/response session loop.
//!
//! Reads one framed request at a time, dispatches it, writes exactly
//! one framed response, and repeats until the input stream closes.
//! Framing violations abort the loop: caller and host must agree on
//! framing or abort.

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::backend::DisplayBackend;
use crate::randr;
use crate::transport::{self, protocol, Response};

/// The single action the host understands.
const ACTION_GET_DISPLAYS: &str = "getDisplays";

/// Serve requests over stdin/stdout until the browser closes the pipe.
pub async fn serve_stdio<B: DisplayBackend>(backend: &B) -> Result<()> {
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    serve(&mut stdin, &mut stdout, backend).await
}

/// Serve requests from `reader`, answering on `writer`.
///
/// Returns `Ok(())` when the input stream closes cleanly before the
/// next frame. A framing violation propagates out instead: the
/// protocol offers no resynchronization after a malformed frame.
pub async fn serve<R, W, B>(reader: &mut R, writer: &mut W, backend: &B) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    B: DisplayBackend,
{
    loop {
        let Some(request) = transport::read_frame(reader).await? else {
            info!("Input stream closed, shutting down");
            return Ok(());
        };

        let response = dispatch(&request, backend).await;
        transport::write_frame(writer, &response).await?;
    }
}

/// Handle one request.
///
/// Every failure below the framing layer is folded into an error
/// response so the session survives it.
async fn dispatch<B: DisplayBackend>(request: &Value, backend: &B) -> Response {
    match protocol::action(request) {
        Some(ACTION_GET_DISPLAYS) => match backend.enumerate().await {
            Ok(text) => {
                let displays = randr::parse_outputs(&text);
                debug!(count = displays.len(), "Enumerated displays");
                Response::displays(displays)
            }
            Err(e) => {
                warn!(error = %e, "Display enumeration failed");
                Response::error(format!("{e:#}"))
            }
        },
        other => {
            warn!(action = ?other, "Unknown action");
            Response::error("Unknown action")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockBackend {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl MockBackend {
        fn ok(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DisplayBackend for MockBackend {
        async fn enumerate(&self) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow::anyhow!("{message}")),
            }
        }
    }

    const SAMPLE: &str = "\
DP-1 \"Dell Inc. DELL\"
  Enabled: yes
  Position: 0,0
  Scale: 1.5
  1920x1080 px, 60.000000 Hz (current)
";

    /// Frame `requests` into an input stream, run the loop to EOF, and
    /// decode every response frame written on the other side.
    async fn run_session<B: DisplayBackend>(requests: &[Value], backend: &B) -> Vec<Value> {
        let mut input = Vec::new();
        for request in requests {
            transport::write_frame(&mut input, request).await.unwrap();
        }

        let mut reader = std::io::Cursor::new(input);
        let mut output = Vec::new();
        serve(&mut reader, &mut output, backend).await.unwrap();

        let mut responses = Vec::new();
        let mut cursor = std::io::Cursor::new(output);
        while let Some(response) = transport::read_frame(&mut cursor).await.unwrap() {
            responses.push(response);
        }
        responses
    }

    #[tokio::test]
    async fn get_displays_happy_path() {
        let backend = MockBackend::ok(SAMPLE);
        let responses = run_session(&[json!({"action": "getDisplays"})], &backend).await;

        assert_eq!(responses.len(), 1);
        let displays = responses[0]["displays"].as_array().unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0]["name"], "DP-1");
        assert_eq!(displays[0]["enabled"], true);
        assert_eq!(displays[0]["width"], 1920);
        assert_eq!(displays[0]["scale"], 1.5);
    }

    #[tokio::test]
    async fn unknown_action_skips_the_backend() {
        let backend = MockBackend::ok(SAMPLE);
        let responses = run_session(&[json!({"action": "bogus"})], &backend).await;

        assert_eq!(responses[0], json!({"error": "Unknown action"}));
        assert_eq!(backend.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn missing_action_is_unknown() {
        let backend = MockBackend::ok(SAMPLE);
        let responses = run_session(&[json!({"payload": 1})], &backend).await;
        assert_eq!(responses[0], json!({"error": "Unknown action"}));
    }

    #[tokio::test]
    async fn command_failure_keeps_the_session_alive() {
        let backend = MockBackend::failing("wlr-randr is not installed");
        let responses = run_session(
            &[
                json!({"action": "getDisplays"}),
                json!({"action": "getDisplays"}),
            ],
            &backend,
        )
        .await;

        assert_eq!(responses.len(), 2);
        for response in &responses {
            let message = response["error"].as_str().unwrap();
            assert!(message.contains("wlr-randr is not installed"));
        }
        assert_eq!(backend.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn back_to_back_requests_answer_in_order() {
        let backend = MockBackend::ok(SAMPLE);
        let responses = run_session(
            &[json!({"action": "getDisplays"}), json!({"action": "bogus"})],
            &backend,
        )
        .await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0].get("displays").is_some());
        assert_eq!(responses[1], json!({"error": "Unknown action"}));
    }

    #[tokio::test]
    async fn empty_stream_shuts_down_cleanly() {
        let backend = MockBackend::ok(SAMPLE);
        let responses = run_session(&[], &backend).await;
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn malformed_frame_aborts_the_loop() {
        let backend = MockBackend::ok(SAMPLE);
        let mut input = Vec::new();
        transport::write_frame(&mut input, &json!({"action": "getDisplays"}))
            .await
            .unwrap();
        // Declares 7 payload bytes but delivers 1
        input.extend_from_slice(&[7, 0, 0, 0, b'x']);

        let mut reader = std::io::Cursor::new(input);
        let mut output = Vec::new();
        let err = serve(&mut reader, &mut output, &backend).await.unwrap_err();
        assert!(err.to_string().contains("payload"));

        // The well-formed first request was still answered before the abort
        let mut cursor = std::io::Cursor::new(output);
        let first = transport::read_frame(&mut cursor).await.unwrap();
        assert!(first.is_some());
    }
}
