//! Session-level command handlers: CAPABILITY, NOOP, LOGIN, LOGOUT.
//!
//! None of these touch mailbox state. LOGIN accepts any credentials.

use crate::fake_imap::io::write_line;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Capabilities advertised after STARTTLS.
pub const CAPABILITIES: &str = "IMAP4rev1 STARTTLS UIDPLUS";

pub async fn handle_capability<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    stream: &mut BufReader<S>,
) {
    let _ = write_line(stream, &format!("* CAPABILITY {CAPABILITIES}\r\n")).await;
    let _ = write_line(stream, &format!("{tag} OK CAPABILITY completed\r\n")).await;
}

pub async fn handle_noop<S: AsyncRead + AsyncWrite + Unpin>(tag: &str, stream: &mut BufReader<S>) {
    let _ = write_line(stream, &format!("{tag} OK NOOP completed\r\n")).await;
}

/// Returns `false` if the client went away.
pub async fn handle_login<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    stream: &mut BufReader<S>,
) -> bool {
    write_line(stream, &format!("{tag} OK LOGIN completed\r\n"))
        .await
        .is_ok()
}

/// RFC 3501 Section 6.1.3: untagged BYE, then the tagged OK.
pub async fn handle_logout<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    stream: &mut BufReader<S>,
) {
    let _ = write_line(stream, "* BYE Logging out\r\n").await;
    let _ = write_line(stream, &format!("{tag} OK LOGOUT completed\r\n")).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::testing::{pipe, transcript};

    #[tokio::test]
    async fn capability_lists_starttls() {
        let (client, mut stream) = pipe();
        handle_capability("A1", &mut stream).await;
        let out = transcript(client, stream).await;
        assert!(out.contains("* CAPABILITY IMAP4rev1 STARTTLS"));
        assert!(out.ends_with("A1 OK CAPABILITY completed\r\n"));
    }

    #[tokio::test]
    async fn login_echoes_tag() {
        let (client, mut stream) = pipe();
        assert!(handle_login("A0001", &mut stream).await);
        assert_eq!(transcript(client, stream).await, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn logout_says_bye_first() {
        let (client, mut stream) = pipe();
        handle_logout("A9", &mut stream).await;
        let out = transcript(client, stream).await;
        assert!(out.starts_with("* BYE"));
        assert!(out.ends_with("A9 OK LOGOUT completed\r\n"));
    }

    #[tokio::test]
    async fn noop_is_just_ok() {
        let (client, mut stream) = pipe();
        handle_noop("N1", &mut stream).await;
        assert_eq!(transcript(client, stream).await, "N1 OK NOOP completed\r\n");
    }
}
