//! # Stdio Framing
//!
//! Language Server Protocol messages are JSON bodies preceded by HTTP-like
//! headers:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```
//!
//! Only `Content-Length` is interpreted; any other header is skipped.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::error::ServerError;

/// Read one frame body from `reader`.
///
/// Returns `Ok(None)` on a clean end of stream before any header byte. The
/// body is returned unparsed so the caller can answer malformed JSON with a
/// protocol error instead of tearing down the connection.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, ServerError> {
    let mut content_length: Option<usize> = None;
    let mut saw_header = false;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            if saw_header {
                return Err(ServerError::Frame("stream ended inside headers".to_string()));
            }
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            if saw_header {
                break;
            }
            // Stray blank line between frames.
            continue;
        }
        saw_header = true;

        if let Some((name, value)) = trimmed.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                let parsed = value.trim().parse::<usize>().map_err(|e| {
                    ServerError::Frame(format!("invalid Content-Length {:?}: {e}", value.trim()))
                })?;
                content_length = Some(parsed);
            }
        }
    }

    let len = content_length
        .ok_or_else(|| ServerError::Frame("missing Content-Length header".to_string()))?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

/// Read and parse one message.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Value>, ServerError> {
    match read_frame(reader)? {
        Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
        None => Ok(None),
    }
}

/// Write one message to `writer` and flush it.
pub fn write_message<W: Write>(writer: &mut W, message: &Value) -> Result<(), ServerError> {
    let body = serde_json::to_vec(message)?;
    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{body}", body.len())
    }

    #[test]
    fn test_write_then_read() {
        let mut out = Vec::new();
        write_message(&mut out, &json!({"jsonrpc": "2.0", "method": "exit"})).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("Content-Length: "));

        let mut reader = Cursor::new(out);
        let message = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(message["method"], "exit");
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_multiple_frames_and_extra_headers() {
        let body = r#"{"id":1}"#;
        let input = format!(
            "{}content-length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{body}",
            frame(r#"{"id":0}"#),
            body.len()
        );
        let mut reader = Cursor::new(input.into_bytes());
        assert_eq!(read_message(&mut reader).unwrap().unwrap()["id"], 0);
        assert_eq!(read_message(&mut reader).unwrap().unwrap()["id"], 1);
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_body_length_counts_bytes() {
        let body = r#"{"title":"café ☕"}"#;
        let mut reader = Cursor::new(frame(body).into_bytes());
        let message = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(message["title"], "café ☕");
    }

    #[test]
    fn test_missing_content_length() {
        let mut reader = Cursor::new(b"Content-Type: x\r\n\r\n{}".to_vec());
        assert!(matches!(read_frame(&mut reader), Err(ServerError::Frame(_))));
    }

    #[test]
    fn test_invalid_content_length() {
        let mut reader = Cursor::new(b"Content-Length: ten\r\n\r\n{}".to_vec());
        assert!(matches!(read_frame(&mut reader), Err(ServerError::Frame(_))));
    }

    #[test]
    fn test_truncated_body() {
        let mut reader = Cursor::new(b"Content-Length: 10\r\n\r\n{}".to_vec());
        assert!(matches!(read_frame(&mut reader), Err(ServerError::Io(_))));
    }

    #[test]
    fn test_eof_inside_headers() {
        let mut reader = Cursor::new(b"Content-Length: 2\r\n".to_vec());
        assert!(matches!(read_frame(&mut reader), Err(ServerError::Frame(_))));
    }

    #[test]
    fn test_malformed_body_is_returned_raw() {
        let mut reader = Cursor::new(frame("{nope").into_bytes());
        assert_eq!(read_frame(&mut reader).unwrap().unwrap(), b"{nope");
    }
}
