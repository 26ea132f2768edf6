//! Nested brace-literal form of a lattice table.
//!
//! This is the text that gets pasted into firmware as a static array
//! initializer: braces nest x, then y, then z, and each leaf is a
//! `{a,b,c}` angle triple with six decimals. The literal has no room for
//! a missing value, so an unreachable cell is written as `{0,0,0}` and an
//! all-zero triple reads back as unreachable.

use crate::{
    kinematics::AngleTriple,
    table::{LatticeTable, TableAxes, TableCell, TableError},
};
use core::fmt::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiteralError {
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar {
        line: usize,
        column: usize,
        ch: char,
    },

    #[error("invalid number '{raw}' at line {line}, column {column}")]
    InvalidNumber {
        line: usize,
        column: usize,
        raw: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("expected {expected} at line {line}, column {column}")]
    Expected {
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("list at {path:?} has {found} entries, expected {expected}")]
    Shape {
        path: Vec<usize>,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Write `table` as a brace literal.
pub fn write_literal<S, W>(table: &LatticeTable<S>, out: &mut W) -> fmt::Result
where
    S: AsRef<[TableCell]>,
    W: Write,
{
    let [nx, ny, nz] = table.axes().dims();
    out.write_str("{\n")?;
    for i in 0..nx {
        out.write_str("  {\n")?;
        for j in 0..ny {
            out.write_str("    {")?;
            for k in 0..nz {
                let [a, b, c] = table.get([i, j, k]).unwrap_or_default().0;
                write!(out, "{{{a:.6},{b:.6},{c:.6}}}")?;
                if k + 1 < nz {
                    out.write_char(',')?;
                }
            }
            out.write_char('}')?;
            if j + 1 < ny {
                out.write_char(',')?;
            }
            out.write_char('\n')?;
        }
        out.write_str("  }")?;
        if i + 1 < nx {
            out.write_char(',')?;
        }
        out.write_char('\n')?;
    }
    out.write_str("}\n")
}

pub fn to_literal<S: AsRef<[TableCell]>>(table: &LatticeTable<S>) -> String {
    table.to_string()
}

/// A table displays as its brace literal.
impl<S: AsRef<[TableCell]>> fmt::Display for LatticeTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_literal(self, f)
    }
}

/// Parse a brace literal back into a table with the given axes.
///
/// Whitespace is free-form. A single trailing `;` is accepted so the
/// initializer can be read straight out of a source file.
pub fn from_literal(axes: TableAxes, input: &str) -> Result<LatticeTable, LiteralError> {
    axes.validate()?;
    let [nx, ny, nz] = axes.dims();
    let mut parser = Parser {
        lexer: Lexer::new(input),
    };
    let mut cells = Vec::with_capacity(axes.cell_count());

    parser.open()?;
    for i in 0..nx {
        parser.separator(i, &[], nx)?;
        parser.open()?;
        for j in 0..ny {
            parser.separator(j, &[i], ny)?;
            parser.open()?;
            for k in 0..nz {
                parser.separator(k, &[i, j], nz)?;
                let triple = parser.triple(&[i, j, k])?;
                cells.push((triple != AngleTriple::default()).then_some(triple));
            }
            parser.close(&[i, j], nz)?;
        }
        parser.close(&[i], ny)?;
    }
    parser.close(&[], nx)?;
    parser.finish()?;

    Ok(LatticeTable::new(axes, cells)?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Open,
    Close,
    Comma,
    Semicolon,
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E')
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LiteralError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.peek() {
            let (line, column) = (self.line, self.column);
            let token = |kind| Some(Ok(Token { kind, line, column }));

            if ch.is_whitespace() {
                self.bump();
                continue;
            }

            let kind = match ch {
                '{' => TokenKind::Open,
                '}' => TokenKind::Close,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                c if is_number_char(c) => {
                    let mut raw = String::new();
                    while let Some(c) = self.peek().filter(|&c| is_number_char(c)) {
                        raw.push(c);
                        self.bump();
                    }
                    return match raw.parse::<f64>() {
                        Ok(value) => token(TokenKind::Number(value)),
                        Err(source) => Some(Err(LiteralError::InvalidNumber {
                            line,
                            column,
                            raw,
                            source,
                        })),
                    };
                }
                ch => return Some(Err(LiteralError::UnexpectedChar { line, column, ch })),
            };
            self.bump();
            return token(kind);
        }
        None
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl Parser<'_> {
    fn next_token(&mut self, expected: &'static str) -> Result<Token, LiteralError> {
        self.lexer
            .next()
            .unwrap_or(Err(LiteralError::UnexpectedEof { expected }))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), LiteralError> {
        let token = self.next_token(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(LiteralError::Expected {
                expected,
                line: token.line,
                column: token.column,
            })
        }
    }

    fn open(&mut self) -> Result<(), LiteralError> {
        self.expect(TokenKind::Open, "'{'")
    }

    /// Consume the comma before every entry but the first. A closing brace
    /// in its place means the list ran short.
    fn separator(
        &mut self,
        index: usize,
        path: &[usize],
        expected: usize,
    ) -> Result<(), LiteralError> {
        if index == 0 {
            return Ok(());
        }
        let token = self.next_token("','")?;
        match token.kind {
            TokenKind::Comma => Ok(()),
            TokenKind::Close => Err(LiteralError::Shape {
                path: path.to_vec(),
                expected,
                found: index,
            }),
            _ => Err(LiteralError::Expected {
                expected: "','",
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// Consume the closing brace of a list. A comma in its place means the
    /// list ran long.
    fn close(&mut self, path: &[usize], expected: usize) -> Result<(), LiteralError> {
        let token = self.next_token("'}'")?;
        match token.kind {
            TokenKind::Close => Ok(()),
            TokenKind::Comma => Err(LiteralError::Shape {
                path: path.to_vec(),
                expected,
                found: expected + 1,
            }),
            _ => Err(LiteralError::Expected {
                expected: "'}'",
                line: token.line,
                column: token.column,
            }),
        }
    }

    fn number(&mut self) -> Result<f64, LiteralError> {
        let token = self.next_token("a number")?;
        match token.kind {
            TokenKind::Number(value) => Ok(value),
            _ => Err(LiteralError::Expected {
                expected: "a number",
                line: token.line,
                column: token.column,
            }),
        }
    }

    fn triple(&mut self, path: &[usize]) -> Result<AngleTriple, LiteralError> {
        self.open()?;
        let mut angles = [0.0; 3];
        for (n, slot) in angles.iter_mut().enumerate() {
            self.separator(n, path, 3)?;
            *slot = self.number()?;
        }
        self.close(path, 3)?;
        Ok(AngleTriple(angles))
    }

    fn finish(&mut self) -> Result<(), LiteralError> {
        let mut token = self.lexer.next().transpose()?;
        if let Some(Token {
            kind: TokenKind::Semicolon,
            ..
        }) = token
        {
            token = self.lexer.next().transpose()?;
        }
        match token {
            None => Ok(()),
            Some(token) => Err(LiteralError::Expected {
                expected: "end of input",
                line: token.line,
                column: token.column,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AxisRange;

    fn axes() -> TableAxes {
        TableAxes {
            x: AxisRange::new(0.0, 1.0, 1.0),
            y: AxisRange::new(0.0, 1.0, 1.0),
            z: AxisRange::new(-9.0, -9.0, 1.0),
        }
    }

    fn sample() -> LatticeTable {
        let cells = vec![
            Some(AngleTriple([1.5, 2.25, 3.0])),
            None,
            Some(AngleTriple([180.0, 180.0, 180.0])),
            Some(AngleTriple([144.531839, 231.817243, 231.817243])),
        ];
        LatticeTable::new(axes(), cells).unwrap()
    }

    #[test]
    fn writes_nested_literal() {
        let expected = "\
{
  {
    {{1.500000,2.250000,3.000000}},
    {{0.000000,0.000000,0.000000}}
  },
  {
    {{180.000000,180.000000,180.000000}},
    {{144.531839,231.817243,231.817243}}
  }
}
";
        assert_eq!(to_literal(&sample()), expected);
        assert_eq!(format!("{}", sample().view()), expected);
    }

    #[test]
    fn reads_back_written_literal() {
        let table = sample();
        assert_eq!(from_literal(axes(), &to_literal(&table)).unwrap(), table);
    }

    #[test]
    fn reads_compact_form_with_semicolon() {
        let input = "{{{{1,2,3}},{{0,0,0}}},{{{4,5,6}},{{-7.5,8e1,9}}}};";
        let table = from_literal(axes(), input).unwrap();
        assert_eq!(table.get([0, 0, 0]), Some(AngleTriple([1.0, 2.0, 3.0])));
        assert_eq!(table.get([0, 1, 0]), None);
        assert_eq!(table.get([1, 1, 0]), Some(AngleTriple([-7.5, 80.0, 9.0])));
    }

    #[test]
    fn short_list_reports_path() {
        let input = "{{{{1,2,3}},{{1,2,3}}},{{{1,2,3}}}}";
        let err = from_literal(axes(), input).unwrap_err();
        assert!(matches!(
            err,
            LiteralError::Shape { ref path, expected: 2, found: 1 } if path == &[1]
        ), "{err:?}");
    }

    #[test]
    fn long_triple_reports_path() {
        let input = "{{{{1,2,3,4}},{{1,2,3}}},{{{1,2,3}},{{1,2,3}}}}";
        let err = from_literal(axes(), input).unwrap_err();
        assert!(matches!(
            err,
            LiteralError::Shape { ref path, expected: 3, found: 4 } if path == &[0, 0, 0]
        ), "{err:?}");
    }

    #[test]
    fn lexical_errors() {
        let err = from_literal(axes(), "{\n  {x").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character 'x' at line 2, column 4");

        let err = from_literal(axes(), "{{{{1-2,2,3}}").unwrap_err();
        assert!(matches!(err, LiteralError::InvalidNumber { ref raw, .. } if raw == "1-2"));

        let err = from_literal(axes(), "{{{{1,2,3}}").unwrap_err();
        assert_eq!(err.to_string(), "unexpected end of input, expected ','");
    }

    #[test]
    fn trailing_garbage() {
        let input = format!("{}}}", to_literal(&sample()));
        let err = from_literal(axes(), &input).unwrap_err();
        assert!(matches!(err, LiteralError::Expected { expected: "end of input", .. }));
    }
}
