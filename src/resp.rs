use bytes::{Buf, BytesMut};

/// 512MB cap on a single bulk payload, matching Redis.
const MAX_BULK_LEN: usize = 512 * 1024 * 1024;
/// Cap on the number of elements in a request array.
const MAX_ELEMENTS: usize = 1024 * 1024;

/// A decoded client request: a command name plus its arguments.
///
/// The name is upper-cased at decode time; argument bytes are passed through
/// untouched, so argument values stay case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub name: String,
    pub args: Vec<Vec<u8>>,
}

impl Request {
    /// Try to decode one complete request from the buffer.
    ///
    /// Clients must send commands as RESP arrays of bulk strings:
    /// `*<n>\r\n` followed by `n` times `$<len>\r\n<payload>\r\n`. This is
    /// deliberately narrower than a general RESP value parser; anything else
    /// on the request side is a framing violation.
    ///
    /// On success the parsed bytes are consumed from `buf`. Returns
    /// `Ok(None)` when the buffer holds only a prefix of a frame, leaving the
    /// buffer untouched so the caller can read more and retry. Handles
    /// pipelined input: each call consumes exactly one frame. After an error
    /// the stream cannot be resynchronized and the connection must be closed.
    pub fn parse(buf: &mut BytesMut) -> Result<Option<Request>, RespError> {
        if buf.is_empty() {
            return Ok(None);
        }
        if buf[0] != b'*' {
            return Err(RespError::ExpectedArray(buf[0]));
        }

        let header_end = match find_crlf_from(buf, 1) {
            Some(pos) => pos,
            None => return Ok(None),
        };
        let count = parse_length(&buf[1..header_end]).ok_or(RespError::InvalidElementCount)?;
        if count == 0 {
            return Err(RespError::EmptyCommand);
        }
        if count > MAX_ELEMENTS {
            return Err(RespError::InvalidElementCount);
        }

        // Collect into a scratch vec and only consume from `buf` once the
        // whole frame is present, so a partial frame can be retried.
        let mut pos = header_end + 2;
        let mut parts: Vec<Vec<u8>> = Vec::with_capacity(count);
        for _ in 0..count {
            if pos >= buf.len() {
                return Ok(None);
            }
            if buf[pos] != b'$' {
                return Err(RespError::ExpectedBulk(buf[pos]));
            }
            let len_end = match find_crlf_from(buf, pos + 1) {
                Some(end) => end,
                None => return Ok(None),
            };
            let len = parse_length(&buf[pos + 1..len_end]).ok_or(RespError::InvalidBulkLength)?;
            if len > MAX_BULK_LEN {
                return Err(RespError::InvalidBulkLength);
            }

            let data_start = len_end + 2;
            if buf.len() < data_start + len + 2 {
                return Ok(None);
            }
            if &buf[data_start + len..data_start + len + 2] != b"\r\n" {
                return Err(RespError::MissingCrlf);
            }
            parts.push(buf[data_start..data_start + len].to_vec());
            pos = data_start + len + 2;
        }

        buf.advance(pos);

        let mut parts = parts.into_iter();
        let name = match parts.next() {
            Some(first) => String::from_utf8_lossy(&first).to_uppercase(),
            None => return Err(RespError::EmptyCommand),
        };
        Ok(Some(Request {
            name,
            args: parts.collect(),
        }))
    }
}

/// A typed server reply, one per request.
///
/// No escaping is performed when encoding; simple and error text must not
/// contain CR or LF.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// +OK\r\n
    Simple(String),
    /// -ERR message\r\n
    Error(String),
    /// :42\r\n
    Integer(i64),
    /// $5\r\nhello\r\n
    Bulk(Vec<u8>),
    /// $-1\r\n
    Nil,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Simple("OK".to_string())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Reply::Error(msg.into())
    }

    pub fn bulk(data: impl Into<Vec<u8>>) -> Self {
        Reply::Bulk(data.into())
    }

    /// Serialize this reply to RESP bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    /// Write RESP bytes into the given buffer.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Simple(s) => {
                buf.push(b'+');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Reply::Error(s) => {
                buf.push(b'-');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Reply::Integer(n) => {
                buf.push(b':');
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Reply::Bulk(data) => {
                buf.push(b'$');
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\r\n");
            }
            Reply::Nil => {
                buf.extend_from_slice(b"$-1\r\n");
            }
        }
    }
}

/// Parse a non-negative decimal length. Rejects signs, so negative counts
/// fail here rather than wrapping.
fn parse_length(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Find \r\n starting from the given position.
fn find_crlf_from(buf: &[u8], start: usize) -> Option<usize> {
    if buf.len() < start + 2 {
        return None;
    }
    for i in start..buf.len() - 1 {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            return Some(i);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum RespError {
    #[error("expected '*', got '{}'", *.0 as char)]
    ExpectedArray(u8),

    #[error("expected '$', got '{}'", *.0 as char)]
    ExpectedBulk(u8),

    #[error("invalid multibulk length")]
    InvalidElementCount,

    #[error("invalid bulk length")]
    InvalidBulkLength,

    #[error("empty command")]
    EmptyCommand,

    #[error("missing trailing CRLF after bulk payload")]
    MissingCrlf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(data: &[u8]) -> Result<Option<Request>, RespError> {
        let mut buf = BytesMut::from(data);
        Request::parse(&mut buf)
    }

    #[test]
    fn test_parse_ping() {
        let req = parse_one(b"*1\r\n$4\r\nPING\r\n").unwrap().unwrap();
        assert_eq!(req.name, "PING");
        assert!(req.args.is_empty());
    }

    #[test]
    fn test_parse_uppercases_name_only() {
        let req = parse_one(b"*3\r\n$3\r\nset\r\n$3\r\nKey\r\n$3\r\nVal\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(req.name, "SET");
        // Argument case is preserved.
        assert_eq!(req.args, vec![b"Key".to_vec(), b"Val".to_vec()]);
    }

    #[test]
    fn test_parse_empty_bulk_arg() {
        let req = parse_one(b"*2\r\n$4\r\nECHO\r\n$0\r\n\r\n").unwrap().unwrap();
        assert_eq!(req.args, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_parse_binary_arg() {
        let req = parse_one(b"*2\r\n$4\r\nECHO\r\n$4\r\na\r\nb\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(req.args, vec![b"a\r\nb".to_vec()]);
    }

    #[test]
    fn test_parse_pipelined() {
        let mut buf = BytesMut::from(&b"*1\r\n$4\r\nPING\r\n*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n"[..]);

        let first = Request::parse(&mut buf).unwrap().unwrap();
        assert_eq!(first.name, "PING");

        let second = Request::parse(&mut buf).unwrap().unwrap();
        assert_eq!(second.name, "ECHO");
        assert_eq!(second.args, vec![b"hi".to_vec()]);

        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_partial_leaves_buffer_intact() {
        // Truncate a valid frame at every possible point; each prefix must
        // parse to None without consuming anything.
        let frame = b"*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n";
        for cut in 0..frame.len() {
            let mut buf = BytesMut::from(&frame[..cut]);
            let result = Request::parse(&mut buf).unwrap();
            assert!(result.is_none(), "cut at {cut}");
            assert_eq!(&buf[..], &frame[..cut]);
        }
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_one(b"+OK\r\n"),
            Err(RespError::ExpectedArray(b'+'))
        ));
        // Inline commands are not supported.
        assert!(matches!(
            parse_one(b"PING\r\n"),
            Err(RespError::ExpectedArray(b'P'))
        ));
    }

    #[test]
    fn test_parse_rejects_negative_count() {
        assert!(matches!(
            parse_one(b"*-1\r\n"),
            Err(RespError::InvalidElementCount)
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_count() {
        assert!(matches!(
            parse_one(b"*abc\r\n"),
            Err(RespError::InvalidElementCount)
        ));
    }

    #[test]
    fn test_parse_rejects_empty_command() {
        assert!(matches!(parse_one(b"*0\r\n"), Err(RespError::EmptyCommand)));
    }

    #[test]
    fn test_parse_rejects_non_bulk_element() {
        assert!(matches!(
            parse_one(b"*1\r\n:5\r\n"),
            Err(RespError::ExpectedBulk(b':'))
        ));
    }

    #[test]
    fn test_parse_rejects_negative_bulk_length() {
        assert!(matches!(
            parse_one(b"*1\r\n$-1\r\n"),
            Err(RespError::InvalidBulkLength)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_trailing_crlf() {
        assert!(matches!(
            parse_one(b"*1\r\n$4\r\nPINGXX"),
            Err(RespError::MissingCrlf)
        ));
    }

    #[test]
    fn test_serialize_simple() {
        assert_eq!(Reply::Simple("PONG".to_string()).serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_serialize_error() {
        assert_eq!(Reply::error("ERR bad").serialize(), b"-ERR bad\r\n");
    }

    #[test]
    fn test_serialize_integer() {
        assert_eq!(Reply::Integer(42).serialize(), b":42\r\n");
        assert_eq!(Reply::Integer(-1).serialize(), b":-1\r\n");
    }

    #[test]
    fn test_serialize_bulk() {
        assert_eq!(Reply::bulk(b"hello".to_vec()).serialize(), b"$5\r\nhello\r\n");
        assert_eq!(Reply::bulk(Vec::<u8>::new()).serialize(), b"$0\r\n\r\n");
    }

    #[test]
    fn test_serialize_nil() {
        assert_eq!(Reply::Nil.serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_bulk_roundtrip() {
        // A bulk encoding embedded in a request frame decodes back to the
        // original payload, including empty and CRLF-bearing payloads.
        for payload in [&b""[..], b"hi", b"\r\n", b"\x00\xffbinary\r\n\x01"] {
            let mut frame = b"*2\r\n$4\r\nECHO\r\n".to_vec();
            frame.extend_from_slice(&Reply::bulk(payload.to_vec()).serialize());
            let req = parse_one(&frame).unwrap().unwrap();
            assert_eq!(req.args, vec![payload.to_vec()]);
        }
    }
}
