//! Amount and identifier formatting.
//!
//! Converts between smallest-unit `U256` amounts and human-readable decimal
//! strings, and shortens long hex identifiers for display. Display strings are
//! always derived from the raw integer; nothing here is authoritative.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Fractional decimal digits of the AdwaitToken.
pub const TOKEN_DECIMALS: u8 = 18;

/// Maximum fractional digits rendered by [`to_display_amount`].
pub const DISPLAY_FRACTION_DIGITS: usize = 4;

/// Errors from [`to_raw_amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("amount cannot be empty")]
    Empty,
    #[error("amount must not carry a sign")]
    Signed,
    #[error("invalid decimal: unexpected character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid decimal: multiple decimal points")]
    MultipleDecimalPoints,
    #[error("invalid decimal: no digits")]
    NoDigits,
    #[error("too many decimal places: got {got}, max {max}")]
    TooManyDecimals { got: usize, max: u8 },
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// Render a smallest-unit amount as an en-US grouped decimal string.
///
/// `None` is treated as zero. At most [`DISPLAY_FRACTION_DIGITS`] fractional
/// digits are kept (truncated, not rounded) and trailing zeros are dropped:
/// `1_500_000_000_000_000_000` at 18 decimals renders as `"1.5"`.
pub fn to_display_amount(raw: Option<U256>, decimals: u8) -> String {
    let raw = raw.unwrap_or(U256::ZERO);
    if raw.is_zero() {
        return "0".to_string();
    }

    let digits = raw.to_string();
    let decimals = decimals as usize;

    let (integer, fraction) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (&digits[..split], digits[split..].to_string())
    } else {
        ("0", format!("{digits:0>decimals$}"))
    };

    let shown: String = fraction.chars().take(DISPLAY_FRACTION_DIGITS).collect();
    let shown = shown.trim_end_matches('0');
    let grouped = group_thousands(integer);

    if shown.is_empty() {
        grouped
    } else {
        format!("{grouped}.{shown}")
    }
}

/// Parse a human-readable decimal string into a smallest-unit amount.
///
/// `to_raw_amount("1.5", 18)` → `U256(1_500_000_000_000_000_000)`.
pub fn to_raw_amount(amount: &str, decimals: u8) -> Result<U256, ParseError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ParseError::Empty);
    }
    if amount.starts_with(&['-', '+'][..]) {
        return Err(ParseError::Signed);
    }

    let (integer, fractional) = amount.split_once('.').unwrap_or((amount, ""));

    if let Some(c) = integer
        .chars()
        .chain(fractional.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(if c == '.' {
            ParseError::MultipleDecimalPoints
        } else {
            ParseError::InvalidCharacter(c)
        });
    }
    if integer.is_empty() && fractional.is_empty() {
        return Err(ParseError::NoDigits);
    }
    if fractional.len() > decimals as usize {
        return Err(ParseError::TooManyDecimals {
            got: fractional.len(),
            max: decimals,
        });
    }

    let padded = format!("{fractional:0<width$}", width = decimals as usize);
    let combined = format!("{integer}{padded}");
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(combined, 10).map_err(|_| ParseError::Overflow)
}

/// Shorten an identifier to `prefix(visible + 2) + "..." + suffix(visible)`.
///
/// `"0x1234567890abcdef1234567890abcdef12345678"` with 4 → `"0x1234...5678"`.
/// Empty input yields an empty string.
pub fn shorten_identifier(identifier: &str, visible: usize) -> String {
    if identifier.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = identifier.chars().collect();
    let head: String = chars.iter().take(visible + 2).collect();
    let tail: String = chars[chars.len().saturating_sub(visible)..].iter().collect();
    format!("{head}...{tail}")
}

/// Whether `s` is a well-formed EVM address.
///
/// Requires `0x` followed by 40 hex digits. All-lowercase input is accepted
/// as is; any uppercase letter requires a valid EIP-55 checksum.
pub fn is_well_formed_address(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }
    if !hex.chars().any(|c| c.is_ascii_uppercase()) {
        return true;
    }
    Address::parse_checksummed(s, None).is_ok()
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
