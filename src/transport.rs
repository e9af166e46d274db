//! Request transports
//!
//! Ways of delivering [`RunFunctionRequest`]s to a [`Function`]:
//!
//! - [`run_once`] - decode one request document, write one response document
//! - [`serve`] - TCP server speaking newline-delimited JSON, one task per connection

use crate::config::Format;
use crate::function::Function;
use crate::proto::{RunFunctionRequest, RunFunctionResponse};
use crate::response::{self, DEFAULT_TTL};
use anyhow::{Context, Result};
use std::io::{Read, Write};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

/// Longest request line a connection accepts
pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

/// Run the function on a single request read from `reader`
pub fn run_once<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    format: Format,
    function: &Function,
) -> Result<()> {
    let req: RunFunctionRequest = match format {
        Format::Json => serde_json::from_reader(reader).context("Failed to parse request JSON")?,
        Format::Yaml => serde_yaml::from_reader(reader).context("Failed to parse request YAML")?,
    };

    let rsp = function.run_function(&req);

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, &rsp).context("Failed to write response")?;
            writeln!(writer).context("Failed to write response")?;
        }
        Format::Yaml => {
            serde_yaml::to_writer(&mut writer, &rsp).context("Failed to write response")?;
        }
    }
    writer.flush().context("Failed to flush response")?;

    Ok(())
}

/// Accept connections until the listener fails
pub async fn serve(listener: TcpListener, function: Function) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("Failed to accept connection")?;

        let function = function.clone();
        let span = tracing::info_span!("connection", id = %Uuid::new_v4(), %peer);

        tokio::spawn(
            async move {
                tracing::debug!("Connection opened");
                match handle_connection(stream, &function).await {
                    Ok(count) => tracing::debug!("Connection closed after {} requests", count),
                    Err(e) => tracing::warn!("Connection failed: {:#}", e),
                }
            }
            .instrument(span),
        );
    }
}

/// Answer every request line on `stream` until EOF; returns the number handled
pub async fn handle_connection<S>(stream: S, function: &Function) -> Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    answer_lines(stream, function, MAX_REQUEST_BYTES).await
}

async fn answer_lines<S>(stream: S, function: &Function, max_line: usize) -> Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut handled = 0;

    loop {
        line.clear();
        let read = read_line_capped(&mut reader, &mut line, max_line)
            .await
            .context("Failed to read request")?;

        let rsp = match read {
            LineRead::Eof => break,
            LineRead::Line if line.iter().all(u8::is_ascii_whitespace) => continue,
            LineRead::Line => handle_line(&line, function),
            LineRead::TooLong => {
                tracing::warn!("Rejecting request longer than {} bytes", max_line);
                rejected(format!("request exceeds {max_line} bytes"))
            }
        };

        let mut out = serde_json::to_vec(&rsp).context("Failed to encode response")?;
        out.push(b'\n');

        writer
            .write_all(&out)
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
        handled += 1;
    }

    Ok(handled)
}

#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    Line,
    TooLong,
}

/// Read one line into `buf`. A line longer than `max` bytes is consumed up to
/// its newline and discarded.
async fn read_line_capped<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let limit = max as u64 + 1;
    if AsyncReadExt::take(&mut *reader, limit).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.len() <= max || buf.ends_with(b"\n") {
        return Ok(LineRead::Line);
    }

    loop {
        buf.clear();
        let n = AsyncReadExt::take(&mut *reader, limit).read_until(b'\n', buf).await?;
        if n == 0 || buf.ends_with(b"\n") {
            break;
        }
    }
    buf.clear();
    Ok(LineRead::TooLong)
}

fn handle_line(line: &[u8], function: &Function) -> RunFunctionResponse {
    match serde_json::from_slice::<RunFunctionRequest>(line) {
        Ok(req) => function.run_function(&req),
        Err(e) => {
            tracing::warn!("Rejecting undecodable request: {}", e);
            rejected(format!("cannot decode request: {e}"))
        }
    }
}

fn rejected(message: String) -> RunFunctionResponse {
    let mut rsp = response::to(&RunFunctionRequest::default(), DEFAULT_TTL);
    response::fatal(&mut rsp, message);
    rsp
}
