//! Write helpers for the fake IMAP server.
//!
//! Every response is flushed immediately so the client never waits on
//! a buffered line.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Write raw bytes (a literal's payload) and flush.
pub async fn write_bytes<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    data: &[u8],
) -> std::io::Result<()> {
    let inner = stream.get_mut();
    inner.write_all(data).await?;
    inner.flush().await
}

/// Write one protocol line. The caller supplies the CRLF.
pub async fn write_line<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    line: &str,
) -> std::io::Result<()> {
    debug_assert!(line.ends_with("\r\n"), "unterminated line: {line:?}");
    write_bytes(stream, line.as_bytes()).await
}

#[cfg(test)]
pub mod testing {
    use tokio::io::{AsyncReadExt, BufReader, DuplexStream};

    /// An in-memory connection: the client end and the buffered server
    /// end a handler writes to.
    pub fn pipe() -> (DuplexStream, BufReader<DuplexStream>) {
        let (client, server) = tokio::io::duplex(8192);
        (client, BufReader::new(server))
    }

    /// Close the server end and return everything written to it.
    pub async fn transcript(client: DuplexStream, server: BufReader<DuplexStream>) -> String {
        drop(server);
        let mut out = String::new();
        BufReader::new(client)
            .read_to_string(&mut out)
            .await
            .unwrap();
        out
    }
}
