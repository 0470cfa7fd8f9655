//! Newline-delimited JSON-RPC over a byte stream pair.
//!
//! Every request is handled in its own task so slow vendor calls do not block
//! the reader. A single writer task owns the output and writes one response per
//! line. End of input stops reading; in-flight requests still get answered.

use findata_tools::McpHandler;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub async fn serve_stdio(handler: McpHandler) -> anyhow::Result<()> {
    info!("Serving MCP over stdio");
    serve_lines(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

pub async fn serve_lines<R, W>(handler: McpHandler, input: R, output: W) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut output = output;
        while let Some(line) = rx.recv().await {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut reader = BufReader::new(input);
    let mut buffer = Vec::new();
    let mut in_flight = JoinSet::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        // Invalid UTF-8 becomes a parse error for this line only.
        let line = String::from_utf8_lossy(&buffer).trim().to_string();
        if line.is_empty() {
            continue;
        }

        let handler = handler.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = handler.handle_message(&line).await {
                // Receiver only goes away if the writer failed.
                let _ = tx.send(response);
            }
        });
    }

    debug!("stdin closed, waiting for {} requests", in_flight.len());
    while in_flight.join_next().await.is_some() {}
    drop(tx);

    writer.await??;
    info!("stdio transport finished");
    Ok(())
}
