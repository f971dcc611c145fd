//! Base64 decoding utilities
//!
//! Share links come from many client ecosystems and none of them agree on a
//! single Base64 alphabet or padding rule. This module tries the known variants
//! in a fixed order and returns the first successful decode.

use std::borrow::Cow;

use base64::alphabet::{self, Alphabet};
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};
use tracing::trace;

// ============================================================================
// Base64 Decoding
// ============================================================================

/// Lenient engine: non-zero trailing bits in the last symbol are accepted.
const fn lenient(alphabet: &Alphabet, padding: DecodePaddingMode) -> GeneralPurpose {
    GeneralPurpose::new(
        alphabet,
        GeneralPurposeConfig::new()
            .with_encode_padding(matches!(padding, DecodePaddingMode::RequireCanonical))
            .with_decode_padding_mode(padding)
            .with_decode_allow_trailing_bits(true),
    )
}

/// Decode attempts, in trial order. Some payloads are valid in more than one
/// variant, so the order is part of the contract.
const VARIANTS: [(&str, GeneralPurpose); 4] = [
    (
        "standard",
        lenient(&alphabet::STANDARD, DecodePaddingMode::RequireCanonical),
    ),
    (
        "standard without padding",
        lenient(&alphabet::STANDARD, DecodePaddingMode::RequireNone),
    ),
    (
        "URL-safe",
        lenient(&alphabet::URL_SAFE, DecodePaddingMode::RequireCanonical),
    ),
    (
        "URL-safe without padding",
        lenient(&alphabet::URL_SAFE, DecodePaddingMode::RequireNone),
    ),
];

/// Decodes Base64 content, trying multiple variants
///
/// Attempts to decode the content using:
/// 1. Standard Base64
/// 2. Standard Base64 without padding
/// 3. URL-safe Base64
/// 4. URL-safe Base64 without padding
///
/// Line breaks (`\r`, `\n`) are removed first and non-zero trailing bits are
/// tolerated. On total failure the error of the last attempt is returned.
pub fn decode_base64_any(content: &str) -> Result<Vec<u8>, DecodeError> {
    let content: Cow<'_, str> = if content.contains(['\r', '\n']) {
        Cow::Owned(content.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(content)
    };

    let mut last_err = None;
    for (name, engine) in &VARIANTS {
        match engine.decode(content.as_bytes()) {
            Ok(decoded) => {
                trace!("Decoded using {} Base64", name);
                return Ok(decoded);
            }
            Err(e) => last_err = Some(e),
        }
    }

    // VARIANTS is non-empty, so the loop recorded an error.
    Err(last_err.unwrap_or(DecodeError::InvalidPadding))
}
