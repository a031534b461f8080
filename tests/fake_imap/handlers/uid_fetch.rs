//! UID FETCH command handler.
//!
//! Only header fetches are served: every requested message comes back
//! as a `BODY[HEADER]` counted literal, whatever data items the client
//! named. The format is:
//!
//! ```text
//! * <seq> FETCH (UID <uid> BODY[HEADER] {<length>}
//! <exactly length bytes of header block>
//! )
//! ```
//!
//! The `{length}\r\n` is an IMAP literal marker: the next `length`
//! bytes are raw data, not protocol text. The sequence number is the
//! 1-based index of the message within the folder (RFC 3501 Section
//! 7.4.2).

use crate::fake_imap::io::{write_bytes, write_line};
use crate::fake_imap::mailbox::Mailbox;
use imap_codec::imap_types::sequence::{SeqOrUid, Sequence, SequenceSet};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Extract UIDs from a `SequenceSet`. Only single values are
/// supported, which is what the client sends for one message.
pub fn extract_uids(seq_set: &SequenceSet) -> Vec<u32> {
    seq_set
        .0
        .as_ref()
        .iter()
        .filter_map(|seq| match seq {
            Sequence::Single(SeqOrUid::Value(v)) => Some(v.get()),
            _ => None,
        })
        .collect()
}

/// Handle the UID FETCH command.
pub async fn handle_uid_fetch<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    sequence_set: &SequenceSet,
    mailbox: &Mailbox,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    let Some(folder) = mailbox.get_folder(folder_name) else {
        let resp = format!("{tag} BAD Folder not found\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    for uid in extract_uids(sequence_set) {
        let Some((idx, email)) = folder.emails.iter().enumerate().find(|(_, e)| e.uid == uid)
        else {
            continue;
        };
        let seq = idx + 1;
        let header = email.header();

        let prefix = format!("* {seq} FETCH (UID {uid} BODY[HEADER] {{{}}}\r\n", header.len());
        if write_line(stream, &prefix).await.is_err()
            || write_bytes(stream, header).await.is_err()
            || write_line(stream, ")\r\n").await.is_err()
        {
            return;
        }
    }

    let resp = format!("{tag} OK FETCH completed\r\n");
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use std::num::NonZeroU32;
    use crate::fake_imap::io::testing::{pipe, transcript};

    fn make_raw_email() -> Vec<u8> {
        b"From: a@b.com\r\nSubject: Test\r\n\r\nBody text".to_vec()
    }

    fn uid_set(uid: u32) -> SequenceSet {
        SequenceSet(
            vec![Sequence::Single(SeqOrUid::Value(
                NonZeroU32::new(uid).unwrap(),
            ))]
            .try_into()
            .unwrap(),
        )
    }

    async fn run(
        tag: &str,
        sequence_set: &SequenceSet,
        mailbox: &Mailbox,
        selected: Option<&str>,
    ) -> String {
        let (client, mut stream) = pipe();

        handle_uid_fetch(tag, sequence_set, mailbox, selected, &mut stream).await;
        transcript(client, stream).await
    }

    #[tokio::test]
    async fn fetches_header_only() {
        let raw = make_raw_email();
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .email(42, false, &raw)
            .build();

        let output = run("A1", &uid_set(42), &mailbox, Some("INBOX")).await;

        let header_len = "From: a@b.com\r\nSubject: Test\r\n\r\n".len();
        assert!(output.contains(&format!("* 1 FETCH (UID 42 BODY[HEADER] {{{header_len}}}")));
        assert!(output.contains("Subject: Test"));
        assert!(!output.contains("Body text"));
        assert!(output.contains("A1 OK FETCH completed"));
    }

    #[tokio::test]
    async fn missing_uid_returns_only_ok() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let output = run("A1", &uid_set(99), &mailbox, Some("INBOX")).await;

        assert!(!output.contains("FETCH (UID"));
        assert!(output.contains("A1 OK FETCH completed"));
    }

    #[tokio::test]
    async fn no_folder_selected_returns_bad() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let output = run("A1", &uid_set(1), &mailbox, None).await;

        assert!(output.contains("A1 BAD No folder selected"));
    }
}
