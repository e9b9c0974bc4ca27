//! Hex color parsing.

use crate::error::{PostProcessError, Result};

/// Parse a `#rrggbb` / `rrggbb` color into an 8-bit RGB triple.
///
/// Exactly six hex digits are required after the optional `#`; shorthand
/// forms like `#fff` are rejected.
pub fn parse_hex_color(input: &str) -> Result<[u8; 3]> {
    let invalid = || PostProcessError::InvalidColorFormat {
        input: input.to_string(),
    };

    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
