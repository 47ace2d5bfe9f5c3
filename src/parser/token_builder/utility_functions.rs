/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::errors::AssemblyError;

/// Parse a numeric literal: decimal, hexadecimal (`0x`), octal (leading `0`),
/// or binary (`0b`), with an optional leading sign. The accepted value range
/// is the union of i32 and u32 so both signed constants and raw bit patterns
/// are writable.
pub fn parse_int(text: &str, line: usize) -> Result<i64, AssemblyError> {
    let bad_literal = || AssemblyError::InvalidSyntax {
        line,
        reason: format!("Invalid numeric literal: {}", text),
    };

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).map_err(|_| bad_literal())?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).map_err(|_| bad_literal())?
    } else if body.len() > 1 && body.starts_with('0') {
        i64::from_str_radix(&body[1..], 8).map_err(|_| bad_literal())?
    } else {
        body.parse::<i64>().map_err(|_| bad_literal())?
    };

    let value = if negative { -magnitude } else { magnitude };
    if value < i32::MIN as i64 || value > u32::MAX as i64 {
        return Err(AssemblyError::InvalidSyntax {
            line,
            reason: format!("Numeric literal does not fit in 32 bits: {}", text),
        });
    }

    Ok(value)
}

/// Parse a floating point literal for `.float`/`.double` arguments.
pub fn parse_float(text: &str, line: usize) -> Result<f64, AssemblyError> {
    text.parse::<f64>().map_err(|_| AssemblyError::InvalidSyntax {
        line,
        reason: format!("Invalid floating point literal: {}", text),
    })
}

/// Decode the body of a string literal into the byte sequence it stores. The
/// surface dialect stores one byte per code unit, so `\u`/`\U` code points
/// are truncated to their low byte. Recognized escapes:
/// `\n \r \t \\ \" \' \xHH \uHHHH \UHHHHHHHH`.
pub fn decode_string(text: &str, line: usize) -> Result<Vec<u8>, AssemblyError> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            bytes.push(c as u8);
            continue;
        }

        let escape = chars.next().ok_or_else(|| AssemblyError::InvalidEscapeSequence {
            line,
            reason: "String literal ends inside an escape sequence.".to_string(),
        })?;
        match escape {
            'n' => bytes.push(b'\n'),
            'r' => bytes.push(b'\r'),
            't' => bytes.push(b'\t'),
            '\\' => bytes.push(b'\\'),
            '"' => bytes.push(b'"'),
            '\'' => bytes.push(b'\''),
            'x' => bytes.push(hex_escape(&mut chars, 2, line)? as u8),
            'u' => bytes.push(hex_escape(&mut chars, 4, line)? as u8),
            'U' => bytes.push(hex_escape(&mut chars, 8, line)? as u8),
            other => {
                return Err(AssemblyError::InvalidEscapeSequence {
                    line,
                    reason: format!("Unrecognized escape sequence: \\{}", other),
                });
            }
        }
    }

    Ok(bytes)
}

// consume exactly `digits` hex digits of an \x, \u, or \U escape
fn hex_escape(
    chars: &mut std::str::Chars,
    digits: usize,
    line: usize,
) -> Result<u32, AssemblyError> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| AssemblyError::InvalidEscapeSequence {
                line,
                reason: format!("Escape sequence expects {} hex digits.", digits),
            })?;
        value = value.wrapping_mul(16).wrapping_add(digit);
    }
    Ok(value)
}
