// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Tokenization of entity instance lines and a quote-aware entity scanner.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::schema::IfcType;

/// STEP/IFC Token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text' (raw, escapes not yet decoded)
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Float: 3.14
    Float(f64),
    /// Enum: .T., .ELEMENT.
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCLENGTHMEASURE(0.2), IFCLABEL('x')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Asterisk (derived value): *
    Derived,
}

/// Parse entity reference: #123
fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Parse string literal: 'text'
/// STEP escapes a single quote inside a string by doubling it
fn string_literal(input: &str) -> IResult<&str, Token> {
    fn string_content(input: &str) -> IResult<&str, &str> {
        let bytes = input.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'\'' {
                if i + 1 < bytes.len() && bytes[i + 1] == b'\'' {
                    i += 2;
                    continue;
                }
                return Ok((&input[i..], &input[..i]));
            }
            i += 1;
        }

        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    map(
        delimited(char('\''), string_content, char('\'')),
        Token::String,
    )(input)
}

/// Parse integer: 42, -42
fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Parse float: 3.14, -3.14, 1.5E-10, 0., 1.E-5
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(Token::Float),
    )(input)
}

/// Parse enum: .T., .F., .ELEMENT.
fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

/// Parse null: $
fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

/// Parse derived: *
fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

/// Parse typed value: IFCLENGTHMEASURE(0.2), IFCBOOLEAN(.T.)
fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            delimited(
                char('('),
                separated_list0(delimited(ws, char(','), ws), token),
                char(')'),
            ),
        ),
        |(type_name, args)| Token::TypedValue(type_name, args),
    )(input)
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_whitespace()), |_| ())(input)
}

/// Parse a token with optional surrounding whitespace
fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer, a float starts with digits too
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Parse list: (1, 2, 3) or nested lists
fn list(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            char(')'),
        ),
        Token::List,
    )(input)
}

/// Parse a complete entity instance
/// Example: #123=IFCWALL('guid',#2,'name',$,$,#10,#20,$);
pub fn parse_entity(input: &str) -> Result<(u32, IfcType, Vec<Token>)> {
    let result: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(
            ws,
            preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
            ws,
        ),
        preceded(
            char('='),
            delimited(
                ws,
                take_while1(|c: char| c.is_alphanumeric() || c == '_'),
                ws,
            ),
        ),
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            tuple((char(')'), ws, char(';'))),
        ),
    ))(input);

    match result {
        Ok((_, (id, type_str, args))) => Ok((id, IfcType::from_name(type_str), args)),
        Err(e) => Err(Error::parse(0, format!("Failed to parse entity: {}", e))),
    }
}

/// Find the byte offset just past the `;` that terminates an entity starting at `from`.
/// Semicolons inside string literals are skipped.
#[inline]
pub(crate) fn find_entity_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    let mut in_string = false;

    while pos < bytes.len() {
        let offset = memchr::memchr2(b'\'', b';', &bytes[pos..])?;
        pos += offset;
        match bytes[pos] {
            b'\'' => in_string = !in_string,
            _ if !in_string => return Some(pos + 1),
            _ => {}
        }
        pos += 1;
    }

    None
}

/// Decode STEP string escapes into UTF-8
///
/// Handles doubled quotes, `\\`, `\S\c` (ISO 8859 upper half),
/// `\X\hh` (ISO 8859-1 code point), `\X2\hhhh...\X0\` (UTF-16)
/// and `\X4\hhhhhhhh...\X0\` (UTF-32). Page switches (`\P?\`) are dropped.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\\') && !raw.contains("''") {
        return raw.to_string();
    }

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < bytes.len() {
        let rest = &raw[i..];

        if rest.starts_with("''") {
            out.push('\'');
            i += 2;
        } else if rest.starts_with("\\\\") {
            out.push('\\');
            i += 2;
        } else if rest.starts_with("\\X2\\") || rest.starts_with("\\X4\\") {
            let width = if rest.as_bytes()[2] == b'2' { 4 } else { 8 };
            let body_start = i + 4;
            let body_end = raw[body_start..]
                .find("\\X0\\")
                .map(|o| body_start + o)
                .unwrap_or(raw.len());
            let units: Vec<u32> = raw[body_start..body_end]
                .as_bytes()
                .chunks(width)
                .filter_map(|chunk| {
                    std::str::from_utf8(chunk)
                        .ok()
                        .and_then(|h| u32::from_str_radix(h, 16).ok())
                })
                .collect();
            if width == 4 {
                let utf16: Vec<u16> = units.iter().map(|&u| u as u16).collect();
                out.extend(char::decode_utf16(utf16).map(|r| r.unwrap_or('\u{FFFD}')));
            } else {
                out.extend(units.iter().filter_map(|&u| char::from_u32(u)));
            }
            i = (body_end + 4).min(raw.len());
        } else if rest.starts_with("\\X\\") && rest.len() >= 5 {
            match u8::from_str_radix(&rest[3..5], 16) {
                Ok(code) => out.push(code as char),
                Err(_) => out.push_str(&rest[..5]),
            }
            i += 5;
        } else if rest.starts_with("\\S\\") && rest.len() > 3 {
            let c = rest[3..].chars().next().unwrap_or(' ');
            out.push(char::from_u32(c as u32 + 128).unwrap_or(c));
            i += 3 + c.len_utf8();
        } else if rest.starts_with("\\P") && rest.len() >= 4 && rest.as_bytes()[3] == b'\\' {
            i += 4;
        } else {
            let c = rest.chars().next().unwrap_or('\\');
            out.push(c);
            i += c.len_utf8();
        }
    }

    out
}

/// Entity scanner - walks the DATA section in file order without full parsing
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a new scanner
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next entity
    /// Returns (entity_id, type_name, line_start, line_end)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        loop {
            let start_offset = memchr::memchr(b'#', &bytes[self.position..])?;
            let line_start = self.position + start_offset;

            let id_start = line_start + 1;
            let mut cursor = id_start;
            while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                cursor += 1;
            }
            let id_end = cursor;
            while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                cursor += 1;
            }

            // A reference inside an attribute list, not an instance definition
            if id_end == id_start || cursor >= bytes.len() || bytes[cursor] != b'=' {
                self.position = id_start;
                continue;
            }

            let line_end = find_entity_end(bytes, cursor)?;
            let id = self.content[id_start..id_end].parse::<u32>().ok()?;

            let type_start = self.content[cursor + 1..line_end]
                .find(|c: char| !c.is_whitespace())
                .map(|i| cursor + 1 + i)?;
            let type_end = self.content[type_start..line_end]
                .find(|c: char| c == '(' || c.is_whitespace())
                .map(|i| type_start + i)
                .unwrap_or(line_end);

            self.position = line_end;
            return Some((id, &self.content[type_start..type_end], line_start, line_end));
        }
    }

    /// Find all entities of a specific type
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<(u32, usize, usize)> {
        let mut results = Vec::new();

        while let Some((id, type_name, start, end)) = self.next_entity() {
            if type_name.eq_ignore_ascii_case(target_type) {
                results.push((id, start, end));
            }
        }

        results
    }

    /// Reset scanner to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
