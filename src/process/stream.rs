use chrono::Utc;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StreamKind {
    Stdout,
    Stderr,
}

/// UTC wall-clock time as `HH:MM:SS.mmm`
pub fn timestamp() -> String {
    Utc::now().format("%H:%M:%S%.3f").to_string()
}

pub fn stamp_stdout(line: &str) -> String {
    format!("[{}] {}", timestamp(), line)
}

/// Like `stamp_stdout` but with the stamp on a red background
pub fn stamp_stderr(line: &str) -> String {
    format!("[{}] {}", timestamp().on_dark_red(), line)
}

/// Read lines until EOF, stamping each one and sending it to the merge channel
pub(super) async fn forward_lines<R>(reader: R, kind: StreamKind, tx: UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']);
                trace!("{:?}: {}", kind, line);
                let stamped = match kind {
                    StreamKind::Stdout => stamp_stdout(line),
                    StreamKind::Stderr => stamp_stderr(line),
                };
                if tx.send(stamped).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}", kind, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[5..6], ":");
        assert_eq!(&ts[8..9], ".");
    }

    #[test]
    fn test_stderr_stamp_is_highlighted() {
        let line = stamp_stderr("boom");
        assert!(line.contains("\u{1b}["));
        assert!(line.ends_with("] boom"));
        assert!(!stamp_stdout("ok").contains("\u{1b}["));
    }

    #[tokio::test]
    async fn test_forward_handles_missing_trailing_newline_and_bad_utf8() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let input: &[u8] = b"first\r\nsec\xffond";
        forward_lines(input, StreamKind::Stdout, tx).await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.ends_with("] first"));
        assert!(second.ends_with("] sec\u{fffd}ond"));
        assert!(rx.recv().await.is_none());
    }
}
