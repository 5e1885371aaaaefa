//! # JSON-Lines Protocol
//!
//! One request per line:
//!
//! ```text
//! {"component":"tally","function":"CastVote","args":["E1","C1","CAND1","secret1"]}
//! ```
//!
//! One response per line, in request order:
//!
//! ```text
//! {"ok":true,"result":{"voteCount":1}}
//! {"ok":false,"kind":"conflict","error":"Permit already spent or invalid"}
//! ```
//!
//! The `ledger` component is reserved for the runtime itself:
//! `{"component":"ledger","function":"metrics"}` returns the Prometheus text
//! exposition as a JSON string.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ledger_telemetry::{gather_metrics, log_event};
use shared_types::ErrorKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::gateway::{Gateway, GatewayError};

/// A named remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub component: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            kind: None,
            error: None,
        }
    }

    pub fn failure(kind: ErrorKind, error: impl ToString) -> Self {
        Self {
            ok: false,
            result: None,
            kind: Some(kind.as_str().to_string()),
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<Value, GatewayError>> for Response {
    fn from(result: Result<Value, GatewayError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(err.kind(), err),
        }
    }
}

const RUNTIME_COMPONENT: &str = "ledger";

/// Handle one request line.
pub fn handle_line(gateway: &Gateway, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) if request.component == RUNTIME_COMPONENT => handle_runtime(&request),
        Ok(request) => gateway
            .invoke(&request.component, &request.function, &request.args)
            .into(),
        Err(err) => {
            log_event!(warn, RUNTIME_COMPONENT, "Malformed request line", error = %err);
            Response::failure(ErrorKind::Validation, format!("malformed request: {err}"))
        }
    }
}

fn handle_runtime(request: &Request) -> Response {
    match request.function.as_str() {
        "metrics" => match gather_metrics() {
            Ok(text) => Response::success(Value::String(text)),
            Err(err) => {
                log_event!(error, RUNTIME_COMPONENT, "Metrics export failed", error = %err);
                Response::failure(ErrorKind::Unavailable, err)
            }
        },
        other => Response::failure(
            ErrorKind::Validation,
            format!("Unknown operation {other} on component {RUNTIME_COMPONENT}"),
        ),
    }
}

/// Serve requests until the reader is exhausted. Returns the number of
/// requests handled.
pub async fn serve<R, W>(gateway: &Gateway, reader: R, mut writer: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(gateway, &line);
        debug!(ok = response.ok, "Request handled");

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
