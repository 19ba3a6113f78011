use http::StatusCode;
use serde::Serialize;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Take,
};

use crate::error::{AppError, AppResult, ControlError};

/// Budget for one control request, request line through body.
pub(super) const MAX_REQUEST_BYTES: u64 = 1024 * 1024;

/// A control request, reduced to what routing and the token check read.
#[derive(Debug, Default)]
pub(super) struct ControlRequest {
    pub(super) method: String,
    pub(super) path: String,
    pub(super) authorization: Option<String>,
    pub(super) body: Vec<u8>,
}

impl ControlRequest {
    pub(super) fn bears_token(&self, token: &str) -> bool {
        self.authorization
            .as_deref()
            .and_then(|value| value.strip_prefix("Bearer "))
            == Some(token)
    }
}

/// Why a connection is answered without reaching a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Refusal {
    Malformed,
    TooLarge,
    Unauthorized,
}

impl Refusal {
    pub(super) const fn status(self) -> StatusCode {
        match self {
            Self::Malformed => StatusCode::BAD_REQUEST,
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    pub(super) const fn message(self) -> &'static str {
        match self {
            Self::Malformed => "malformed request",
            Self::TooLarge => "request too large",
            Self::Unauthorized => "unauthorized",
        }
    }
}

#[derive(Serialize)]
pub(super) struct MessageBody<'msg> {
    pub(super) message: &'msg str,
}

type LimitedReader<S> = BufReader<Take<S>>;

/// Reads one request off `stream`. Only `Content-Length` and
/// `Authorization` are kept from the header block.
pub(super) async fn read_request<S>(stream: S) -> Result<ControlRequest, Refusal>
where
    S: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream.take(MAX_REQUEST_BYTES));
    let mut line = String::new();

    next_line(&mut reader, &mut line).await?;
    let mut request = {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            return Err(Refusal::Malformed);
        };
        ControlRequest {
            method: method.to_owned(),
            path: path.to_owned(),
            ..ControlRequest::default()
        }
    };

    let mut content_length = 0_u64;
    loop {
        next_line(&mut reader, &mut line).await?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').ok_or(Refusal::Malformed)?;
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().ok().ok_or(Refusal::Malformed)?;
        } else if name.eq_ignore_ascii_case("authorization") {
            request.authorization = Some(value.to_owned());
        }
    }

    if content_length > remaining_budget(&reader) {
        return Err(Refusal::TooLarge);
    }
    let length = usize::try_from(content_length)
        .ok()
        .ok_or(Refusal::TooLarge)?;
    request.body = vec![0; length];
    reader
        .read_exact(&mut request.body)
        .await
        .ok()
        .ok_or(Refusal::Malformed)?;
    Ok(request)
}

/// Reads a CRLF-terminated line into `line`, terminator stripped.
async fn next_line<S>(reader: &mut LimitedReader<S>, line: &mut String) -> Result<(), Refusal>
where
    S: AsyncRead + Unpin,
{
    line.clear();
    reader
        .read_line(line)
        .await
        .ok()
        .ok_or(Refusal::Malformed)?;
    if !line.ends_with('\n') {
        // Stream ended mid-line: either the budget ran out or the peer left.
        return Err(if reader.get_ref().limit() == 0 {
            Refusal::TooLarge
        } else {
            Refusal::Malformed
        });
    }
    let kept = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(kept);
    Ok(())
}

fn remaining_budget<S: AsyncRead>(reader: &LimitedReader<S>) -> u64 {
    let buffered = u64::try_from(reader.buffer().len()).unwrap_or(u64::MAX);
    reader.get_ref().limit().saturating_add(buffered)
}

/// Writes `payload` as a complete JSON response and closes the exchange.
pub(super) async fn write_json<S, T>(stream: &mut S, status: StatusCode, payload: &T) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload).map_err(|source| {
        AppError::control(ControlError::Serialize {
            context: "control response",
            source,
        })
    })?;
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);

    stream.write_all(&response).await.map_err(|source| {
        AppError::control(ControlError::Io {
            context: "write control response",
            source,
        })
    })?;
    stream.flush().await.map_err(|source| {
        AppError::control(ControlError::Io {
            context: "flush control response",
            source,
        })
    })
}

pub(super) async fn write_message<S>(
    stream: &mut S,
    status: StatusCode,
    message: &str,
) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
{
    write_json(stream, status, &MessageBody { message }).await
}
