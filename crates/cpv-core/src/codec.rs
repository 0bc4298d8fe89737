//! # Byte Codec
//!
//! Hex encode/decode, hex-string detection, operand decoding and byte-order
//! reversal of hex digests.
//!
//! ## Operand Encoding Rule
//!
//! A concatenation operand is hex if and only if [`is_hex_string`] accepts
//! it (even length, every character a hex digit). Anything else is taken
//! as UTF-8 text. The rule decides how operand bytes are obtained; it has
//! no bearing on how the operand is displayed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from hex decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The string has an odd number of characters.
    #[error("hex string has odd length {len}")]
    OddLength {
        /// Length of the rejected string.
        len: usize,
    },

    /// A character outside `[0-9a-fA-F]` was found.
    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Its character index in the input.
        index: usize,
    },
}

/// Decode a hex string into bytes.
///
/// Accepts upper- and lowercase digits. Fails on odd length or any
/// non-hex character.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    hex::decode(s).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => CodecError::InvalidCharacter {
            character: c,
            index,
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            CodecError::OddLength { len: s.len() }
        }
    })
}

/// Encode bytes as a lowercase hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// True iff `s` has even length and every character is a hex digit.
pub fn is_hex_string(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Reverse the byte order of a hex digest.
///
/// Converts between the chain's internal byte order and its display order
/// (TXIDs and block Merkle roots are shown reversed). Applying it twice
/// returns the lowercase form of the input.
pub fn reverse_byte_order(hex_digest: &str) -> Result<String, CodecError> {
    let mut bytes = decode_hex(hex_digest)?;
    bytes.reverse();
    Ok(encode_hex(&bytes))
}

/// How a concatenation operand's bytes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandEncoding {
    /// The operand was a valid hex string and was hex-decoded.
    Hex,
    /// The operand was taken verbatim as UTF-8 text.
    Utf8,
}

/// Decode a concatenation operand into its bytes.
///
/// [`decode_hex`] accepts exactly the strings [`is_hex_string`] accepts, so
/// a successful decode is the hex case and anything else is UTF-8 text.
pub fn operand_bytes(s: &str) -> (OperandEncoding, Vec<u8>) {
    match decode_hex(s) {
        Ok(bytes) => (OperandEncoding::Hex, bytes),
        Err(_) => (OperandEncoding::Utf8, s.as_bytes().to_vec()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Byte-order reversal is self-inverse on every valid digest.
        #[test]
        fn reverse_byte_order_is_self_inverse(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let digest = encode_hex(&bytes);
            let once = reverse_byte_order(&digest).unwrap();
            let twice = reverse_byte_order(&once).unwrap();
            prop_assert_eq!(twice, digest);
        }

        /// Everything `encode_hex` produces is recognized as hex.
        #[test]
        fn encode_hex_output_is_hex(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assert!(is_hex_string(&encode_hex(&bytes)));
        }

        /// Operands decode as hex exactly when they pass the hex-string check.
        #[test]
        fn operand_encoding_follows_hex_check(s in "[0-9a-fA-F:_ xz]{0,12}") {
            let (encoding, bytes) = operand_bytes(&s);
            if is_hex_string(&s) {
                prop_assert_eq!(encoding, OperandEncoding::Hex);
                prop_assert_eq!(bytes.len(), s.len() / 2);
            } else {
                prop_assert_eq!(encoding, OperandEncoding::Utf8);
                prop_assert_eq!(bytes, s.as_bytes().to_vec());
            }
        }

        /// Any string with a non-hex character is rejected.
        #[test]
        fn non_hex_character_is_rejected(
            prefix in "[0-9a-f]{0,8}",
            bad in "[g-zG-Z_:!]",
            suffix in "[0-9a-f]{0,8}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(!is_hex_string(&s));
        }
    }
}
