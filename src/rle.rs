use thiserror::Error;
use tracing::warn;

use crate::Coord;
use crate::cell::Cell;
use crate::parse_util;
use crate::rule::Rule;
use crate::rule::RuleError;

pub use crate::parse_util::ConvertError;
pub use crate::parse_util::ParseError;

/// Longest run of live cells a single `<n>o` item may encode.
pub const MAX_RUN_LENGTH: Coord = 1 << 20;

#[derive(Debug, Default)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Where the top left corner of the pattern goes, from a `#P` or `#R` line.
    pub offset: Option<(Coord, Coord)>,

    /// Bounding box size `(x, y)` announced in the header line.
    pub size: Option<(Coord, Coord)>,
    pub rule: Rule,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),

    #[error("Unsupported rule {0}, only B3/S23 can be simulated")]
    UnsupportedRule(Rule),
}

/// Parse the RLE file format, calling `f` with the coordinates of every live cell.
///
/// Rows grow downward: the first row of the pattern is at `y = 0`, the next at `y = 1`. A `#P`
/// or `#R` line shifts the whole pattern.
///
/// When a header is present every live cell must lie inside its `x` by `y` box. A single run of
/// live cells is never longer than [`MAX_RUN_LENGTH`].
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(Coord, Coord),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        let res = read_line_comment(parse_util::take_ws(bytes))?;
        let (Some(line), rest) = res else { break };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y))
            }
            RleCommentLine::Rule { rule } => {
                file.rule = rule;
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    let res = read_line_header(parse_util::take_ws(bytes))?;
    if let (Some(header), rest) = res {
        let RleHeaderLine { x, y, rule } = header;

        file.size = Some((x, y));
        if let Some(rule) = rule {
            file.rule = rule;
        }

        bytes = rest;
    }

    if !file.rule.is_conway() {
        return Err(RleError::UnsupportedRule(file.rule));
    }

    let (dx, dy) = file.offset.unwrap_or_default();

    // Parse encoding
    read_encoding(bytes, (dx, dy), file.size, f)?;

    Ok(file)
}

/// Like [`read_rle`], collecting the live cells.
pub fn read_rle_cells(bytes: &[u8]) -> Result<(RleFile<'_>, Vec<Cell>), RleError> {
    let mut cells = Vec::new();
    let file = read_rle(bytes, |x, y| cells.push(Cell::new(x, y)))?;

    Ok((file, cells))
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Offset { x: Coord, y: Coord },
    Rule { rule: Rule },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(rest) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), rest) = parse_util::take_1(rest) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, rest) = parse_util::take_line(rest);
    let line = line.trim_ascii();

    let line = match b {
        // Comment line
        b'C' | b'c' => RleCommentLine::Comment,

        // Pattern name
        b'N' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            RleCommentLine::Name { name: line }
        }

        // Pattern author
        b'O' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            RleCommentLine::Author { author: line }
        }

        // Pattern offset
        b'R' | b'P' => {
            let (x, y) = read_coordinates(line)?;

            RleCommentLine::Offset { x, y }
        }

        // Pattern rules
        b'r' => {
            let rule = std::str::from_utf8(line)
                .map_err(|_| RuleError::Malformed {
                    got: String::from_utf8_lossy(line).to_string(),
                })?
                .parse::<Rule>()?;

            RleCommentLine::Rule { rule }
        }

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    };

    Ok((Some(line), rest))
}

struct RleHeaderLine {
    x: Coord,
    y: Coord,
    rule: Option<Rule>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Missing '{key}' in header")]
    MissingKey { key: char },

    #[error("Unknown header key \"{got}\"")]
    UnknownKey { got: String },

    #[error("Failed to parse {key} size: {source}")]
    Size {
        key: char,
        #[source]
        source: ConvertError,
    },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a header line such as `x = 3, y = 3, rule = B3/S23`, otherwise leaves
/// `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if !matches!(parse_util::peek_1(bytes), Some(b'x' | b'X')) {
        return Ok((None, bytes));
    }

    let (line, rest) = parse_util::take_line(bytes);

    let mut x: Option<Coord> = None;
    let mut y: Option<Coord> = None;
    let mut rule: Option<Rule> = None;

    for field in line.split(|&b| b == b',') {
        let (key, value) = parse_util::take_until_fn(|b| b == b'=', field);
        let value = parse_util::expect(b'=', value)?.trim_ascii();

        match key.trim_ascii() {
            b"x" | b"X" => {
                x = Some(
                    parse_util::convert(value)
                        .map_err(|source| RleHeaderLineError::Size { key: 'x', source })?,
                );
            }
            b"y" | b"Y" => {
                y = Some(
                    parse_util::convert(value)
                        .map_err(|source| RleHeaderLineError::Size { key: 'y', source })?,
                );
            }
            k if parse_util::expect_slice(b"rule", k).is_ok_and(|r| r.is_empty()) => {
                let value = String::from_utf8_lossy(value);
                rule = Some(value.parse::<Rule>()?);
            }
            k => {
                return Err(RleHeaderLineError::UnknownKey {
                    got: String::from_utf8_lossy(k).to_string(),
                });
            }
        }
    }

    let x = x.ok_or(RleHeaderLineError::MissingKey { key: 'x' })?;
    let y = y.ok_or(RleHeaderLineError::MissingKey { key: 'y' })?;

    Ok((Some(RleHeaderLine { x, y, rule }), rest))
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF, missing '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Run length cannot be zero")]
    ZeroRunLength,

    #[error("Pattern runs off the edge of the world")]
    Overflow,

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Run of {got} live cells, at most {} are allowed", MAX_RUN_LENGTH)]
    RunTooLong { got: Coord },

    #[error("Live cell at ({x}, {y}) is outside the declared {width}x{height} pattern")]
    OutOfBounds {
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
    },
}

/// Walk the run-length body. Live cells must fit in `size` when the header gave one.
fn read_encoding<F>(
    mut bytes: &[u8],
    (dx, dy): (Coord, Coord),
    size: Option<(Coord, Coord)>,
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(Coord, Coord),
{
    let mut rep: Coord = 1;

    let (mut x, mut y): (Coord, Coord) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            w if w.is_ascii_whitespace() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;
            }

            // End of input
            b'!' => break,

            // Dead cell
            b'b' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;

                rep = 1;
            }

            // Live cell
            b'o' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                let end = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;
                if let Some((width, height)) = size {
                    if end > width || y >= height {
                        // first offending cell, in pattern coordinates
                        let x = if y >= height { x } else { x.max(width) };

                        return Err(RleEncodingError::OutOfBounds {
                            x,
                            y,
                            width,
                            height,
                        });
                    }
                }

                if rep > MAX_RUN_LENGTH {
                    return Err(RleEncodingError::RunTooLong { got: rep });
                }

                for i in 0..rep {
                    let cx = dx
                        .checked_add(x)
                        .and_then(|cx| cx.checked_add(i))
                        .ok_or(RleEncodingError::Overflow)?;
                    let cy = dy.checked_add(y).ok_or(RleEncodingError::Overflow)?;

                    f(cx, cy)
                }

                x = end;

                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y = y.checked_add(rep).ok_or(RleEncodingError::Overflow)?;
                x = 0;

                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (n, rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes);
                bytes = rest;

                rep = parse_util::convert(n)?;

                if rep == 0 {
                    return Err(RleEncodingError::ZeroRunLength);
                }
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum RleCoordError {
    #[error("Expected x coordinate, found end of line")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of line")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

/// Parse the `<x> <y>` of an offset line.
fn read_coordinates(bytes: &[u8]) -> Result<(Coord, Coord), RleCoordError> {
    let mut parts = bytes.split(u8::is_ascii_whitespace).filter(|p| !p.is_empty());

    let x_bytes = parts.next().ok_or(RleCoordError::NoX)?;
    let x: Coord = parse_util::convert(x_bytes).map_err(RleCoordError::ParseX)?;

    let y_bytes = parts.next().ok_or(RleCoordError::NoY)?;
    let y: Coord = parse_util::convert(y_bytes).map_err(RleCoordError::ParseY)?;

    Ok((x, y))
}

#[cfg(test)]
mod test {
    use super::*;

    fn cells(bytes: &[u8]) -> Vec<Cell> {
        let (_, mut cells) = read_rle_cells(bytes).unwrap();
        cells.sort();
        cells
    }

    #[test]
    fn read_coordinates() {
        assert_eq!(super::read_coordinates(b"-3  12").unwrap(), (-3, 12));
        assert!(matches!(
            super::read_coordinates(b"7"),
            Err(RleCoordError::NoY)
        ));
        assert!(matches!(
            super::read_coordinates(b"a 1"),
            Err(RleCoordError::ParseX(_))
        ));
    }

    #[test]
    fn glider() {
        let bytes = b"#N Glider\n#O Richard K. Guy\n#C A comment\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

        let (file, mut got) = read_rle_cells(bytes).unwrap();
        got.sort();

        assert_eq!(file.name, Some(b"Glider".as_slice()));
        assert_eq!(file.author, Some(b"Richard K. Guy".as_slice()));
        assert_eq!(file.size, Some((3, 3)));
        assert_eq!(file.offset, None);
        assert!(file.rule.is_conway());

        let mut want = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].map(Cell::from).to_vec();
        want.sort();

        assert_eq!(got, want);
    }

    #[test]
    fn offset_line_shifts_the_pattern() {
        let got = cells(b"#P 10 -5\nx = 3, y = 1\n3o!");

        assert_eq!(got, [Cell::new(10, -5), Cell::new(11, -5), Cell::new(12, -5)]);
    }

    #[test]
    fn runs_of_line_ends_skip_rows() {
        let got = cells(b"x = 1, y = 4\no3$o!");

        assert_eq!(got, [Cell::new(0, 0), Cell::new(0, 3)]);
    }

    #[test]
    fn header_is_optional() {
        let got = cells(b"2o$2o!");

        assert_eq!(
            got,
            [Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
    }

    #[test]
    fn crlf_and_wrapped_lines() {
        let got = cells(b"#C wrapped\r\nx = 3, y = 2\r\n3o$\r\nb\r\no!\r\n");

        assert_eq!(
            got,
            [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn nameless_rule_comment() {
        let (file, _) = read_rle_cells(b"#r 23/3\no!").unwrap();

        assert!(file.rule.is_conway());
    }

    #[test]
    fn other_rules_are_rejected() {
        let err = read_rle_cells(b"x = 1, y = 1, rule = B36/S23\no!").unwrap_err();

        assert!(matches!(err, RleError::UnsupportedRule(r) if r.to_string() == "B36/S23"));
    }

    #[test]
    fn missing_terminator() {
        let err = read_rle_cells(b"x = 1, y = 1\no").unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnexpectedEof)
        ));
    }

    #[test]
    fn unknown_cell_state() {
        let err = read_rle_cells(b"x = 1, y = 1\nA!").unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnrecognizedByte { got: b'A' })
        ));
    }

    #[test]
    fn header_errors() {
        let err = read_rle_cells(b"x = 1\no!").unwrap_err();
        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::MissingKey { key: 'y' })
        ));

        let err = read_rle_cells(b"x = 1, y = 1, z = 2\no!").unwrap_err();
        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::UnknownKey { .. })
        ));

        let err = read_rle_cells(b"x = one, y = 1\no!").unwrap_err();
        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::Size { key: 'x', .. })
        ));
    }

    #[test]
    fn bad_comment_type() {
        let err = read_rle_cells(b"#Z what\no!").unwrap_err();

        assert!(matches!(
            err,
            RleError::CommentLine(RleCommentLineError::InvalidType { got: 'Z' })
        ));
    }

    #[test]
    fn live_runs_must_fit_the_header() {
        let err = read_rle_cells(b"x = 1, y = 1\n50000000o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OutOfBounds {
                x: 1,
                y: 0,
                width: 1,
                height: 1
            })
        ));

        // a second row in a one-row pattern
        let err = read_rle_cells(b"x = 2, y = 1\no$o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OutOfBounds { x: 0, y: 1, .. })
        ));

        // dead runs and line ends may pad past the edge
        assert_eq!(cells(b"x = 2, y = 2\no5b$bo3$!"), [Cell::new(0, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn long_runs_without_a_header() {
        let err = read_rle_cells(b"2000000o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::RunTooLong { got: 2_000_000 })
        ));

        let (_, got) = read_rle_cells(format!("{MAX_RUN_LENGTH}o!").as_bytes()).unwrap();
        assert_eq!(got.len(), MAX_RUN_LENGTH as usize);
    }

    #[test]
    fn repeated_name_uses_latest() {
        let (file, _) = read_rle_cells(b"#N first\n#N second\no!").unwrap();

        assert_eq!(file.name, Some(b"second".as_slice()));
    }
}
