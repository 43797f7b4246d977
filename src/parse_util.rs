use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected \"{exp}\", but got \"{got}\"")]
    UnexpectedSlice { exp: String, got: String },
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let (_, bytes) = take_until_fn(|b| !b.is_ascii_whitespace(), bytes);

    bytes
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the token
pub const fn peek_1(bytes: &[u8]) -> Option<u8> {
    let [b, ..] = bytes else { return None };

    Some(*b)
}

/// Expects the next character in `bytes` to be `b`.
pub fn expect(b: u8, bytes: &[u8]) -> Result<&[u8], ParseError> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Expects `bytes` to start with `bs`, ignoring ascii case.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> Result<&'a [u8], ParseError> {
    match bytes.split_at_checked(bs.len()) {
        Some((head, rest)) if head.eq_ignore_ascii_case(bs) => Ok(rest),
        _ => {
            let n = bs.len().min(bytes.len());

            Err(ParseError::UnexpectedSlice {
                exp: String::from_utf8_lossy(bs).to_string(),
                got: String::from_utf8_lossy(&bytes[..n]).to_string(),
            })
        }
    }
}

/// Split `bytes` right before the first byte satisfying `p`.
///
/// The head may be empty. If no byte satisfies `p`, the head is all of `bytes`.
#[inline]
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (&[u8], &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| p(b)).unwrap_or(bytes.len());

    bytes.split_at(i)
}

/// Consumes one line, returning it without its line break.
///
/// A line break is any of
/// * `\n`
/// * `\r\n`
///
/// The last line of the input doesn't need one.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = take_until_fn(|b| b == b'\n', bytes);
    let (_, rest) = take_1(rest);

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    (line, rest)
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = std::str::from_utf8(bytes)?;

    let Ok(res) = str.parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_ws_full_ws() {
        let bytes = b"  \n\t";

        let res = take_ws(bytes);

        assert_eq!(res, b"")
    }

    #[test]
    fn test_take_until_fn_empty_head() {
        let (head, rest) = take_until_fn(|b| b == b',', b",1");

        assert_eq!(head, b"");
        assert_eq!(rest, b",1");
    }

    #[test]
    fn test_take_until_fn_never_found() {
        let (head, rest) = take_until_fn(|b| b == b',', b"123");

        assert_eq!(head, b"123");
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_take_line() {
        let (line, rest) = take_line(b"#N Glider\r\nbo$");
        assert_eq!(line, b"#N Glider");
        assert_eq!(rest, b"bo$");

        let (line, rest) = take_line(b"last");
        assert_eq!(line, b"last");
        assert_eq!(rest, b"");

        let (line, rest) = take_line(b"\nnext");
        assert_eq!(line, b"");
        assert_eq!(rest, b"next");
    }

    #[test]
    fn test_expect() {
        assert_eq!(expect(b'#', b"#C").unwrap(), b"C");
        assert!(matches!(
            expect(b'#', b"x"),
            Err(ParseError::UnexpectedToken { exp: '#', got: 'x' })
        ));
        assert!(matches!(
            expect(b'#', b""),
            Err(ParseError::UnexpectedEof { exp: '#' })
        ));
    }

    #[test]
    fn test_expect_slice_ignores_case() {
        assert_eq!(expect_slice(b"rule", b"RULE = b3").unwrap(), b" = b3");
        assert!(expect_slice(b"rule", b"ru").is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert::<i64>(b"-42").unwrap(), -42);
        assert!(matches!(
            convert::<i64>(b"4x"),
            Err(ConvertError::ParseError { .. })
        ));
        assert!(matches!(
            convert::<i64>(&[0xFF]),
            Err(ConvertError::InvalidUtf8(_))
        ));
    }
}
