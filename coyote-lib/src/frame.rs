//! Helpers shared by every 3-byte frame.

use crate::constants::FRAME_LEN;
use crate::error::CoyoteError;

/// Copy up to `FRAME_LEN` bytes into a zeroed frame.
pub(crate) fn pad_frame(bytes: &[u8]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    let len = bytes.len().min(FRAME_LEN);
    frame[..len].copy_from_slice(&bytes[..len]);
    frame
}

/// Parse a captured frame written as hex, e.g. `e10300`, `0xE10300`,
/// `e1 03 00`, `0xE1 0x03 0x00` or `e1:03:00`. Each whitespace-separated
/// token may carry its own `0x` prefix.
pub fn parse_hex_frame(text: &str) -> Result<Vec<u8>, CoyoteError> {
    let digits: String = text
        .split_whitespace()
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .flat_map(|token| token.chars().filter(|c| *c != ':'))
        .collect();
    Ok(hex::decode(digits)?)
}
