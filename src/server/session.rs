//! Client sessions
//!
//! Reads request lines, dispatches them and writes replies, streaming file
//! contents where a command produced them.

use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::error::{DocbridgeError, ProtocolError};
use crate::protocol::handlers::failure;
use crate::protocol::responses::{READY, TRANSFER_COMPLETE, format_response};
use crate::protocol::{CommandData, CommandStatus, handle_command, parse_command};
use crate::provider::DocumentProvider;

/// Serves one client until it quits or disconnects.
pub async fn handle_session(
    stream: TcpStream,
    client_addr: SocketAddr,
    provider: Arc<DocumentProvider>,
    config: &ServerConfig,
) -> io::Result<()> {
    let (read_half, write_half) = stream.into_split();
    serve(
        BufReader::new(read_half),
        write_half,
        client_addr,
        provider,
        config.max_line_length,
    )
    .await
}

async fn serve<R, W>(
    mut reader: BufReader<R>,
    mut writer: W,
    client_addr: SocketAddr,
    provider: Arc<DocumentProvider>,
    max_line_length: usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format_response(READY, "docbridge ready").as_bytes())
        .await?;
    writer.flush().await?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let limit = max_line_length as u64 + 1;
        let n = match (&mut reader).take(limit).read_until(b'\n', &mut buffer).await {
            Ok(n) => n,
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                return Err(e);
            }
        };
        if n == 0 {
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        }

        if buffer.len() > max_line_length {
            if !buffer.ends_with(b"\n") {
                discard_line(&mut reader).await?;
            }
            let reply = failure(DocbridgeError::from(ProtocolError::LineTooLong(buffer.len())));
            if let Some(msg) = reply.message {
                writer.write_all(msg.as_bytes()).await?;
            }
            continue;
        }
        let line = String::from_utf8_lossy(&buffer);

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                if let Some(msg) = failure(DocbridgeError::from(e)).message {
                    writer.write_all(msg.as_bytes()).await?;
                }
                continue;
            }
        };
        info!("Received from {}: {:?}", client_addr, command);

        let result = {
            let provider = Arc::clone(&provider);
            match tokio::task::spawn_blocking(move || handle_command(&provider, &command)).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Command from {} did not complete: {}", client_addr, e);
                    return Err(io::Error::other(e));
                }
            }
        };
        if let Some(msg) = &result.message {
            writer.write_all(msg.as_bytes()).await?;
        }

        if let Some(CommandData::Stream { file, length }) = result.data {
            let mut file = tokio::fs::File::from_std(file).take(length);
            let sent = tokio::io::copy(&mut file, &mut writer).await?;
            writer
                .write_all(
                    format_response(TRANSFER_COMPLETE, &format!("Transfer complete ({sent} bytes)"))
                        .as_bytes(),
                )
                .await?;
        }
        writer.flush().await?;

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            return Ok(());
        }
    }
}

/// Skips the rest of an over-long line without buffering it.
async fn discard_line<R>(reader: &mut BufReader<R>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = Vec::new();
    loop {
        chunk.clear();
        let n = (&mut *reader).take(4096).read_until(b'\n', &mut chunk).await?;
        if n == 0 || chunk.ends_with(b"\n") {
            return Ok(());
        }
    }
}
