//! Credential transform shared by the server, the web signup page and the
//! native game client.
//!
//! Every byte of the password is shifted up by a fixed amount (a Caesar
//! shift). The native client applies the same shift before sending a login,
//! so the stored credential and the login credential must stay byte-for-byte
//! identical across all three.
//!
//! # Security
//!
//! This is NOT a hash. The shift is unsalted and trivially reversible: anyone
//! reading the `users` table recovers every password by subtracting
//! [`FIXED_SHIFT`]. It is kept only for compatibility with the existing
//! clients. A replacement scheme (salted, slow, one-way) has to ship as a new
//! credential version together with a client update.

use thiserror::Error;

/// Shift applied to every stored and transmitted credential.
pub const FIXED_SHIFT: i16 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The shifted byte does not fit in `0..=255`. Bytes never wrap around.
    #[error("byte {byte:#04x} at index {index} cannot be shifted by {shift}")]
    OutOfRange { index: usize, byte: u8, shift: i16 },
}

/// Adds `shift` to every byte of `plaintext`.
///
/// The output has the same length as the input and the empty input maps to
/// itself. A byte that would leave the `u8` range rejects the whole input.
pub fn transform(plaintext: &[u8], shift: i16) -> Result<Vec<u8>, TransformError> {
    plaintext
        .iter()
        .enumerate()
        .map(|(index, &byte)| {
            u8::try_from(i16::from(byte) + shift)
                .map_err(|_| TransformError::OutOfRange { index, byte, shift })
        })
        .collect()
}

/// Transforms a password with [`FIXED_SHIFT`].
///
/// UTF-8 never produces a byte above `0xF4`, so the fixed shift cannot
/// overflow for any `&str`.
pub fn hash(password: &str) -> Vec<u8> {
    password
        .bytes()
        .map(|byte| byte.wrapping_add(FIXED_SHIFT as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_maps_to_empty() {
        assert_eq!(transform(b"", FIXED_SHIFT).unwrap(), Vec::<u8>::new());
        assert!(hash("").is_empty());
    }

    #[test]
    fn test_shift_is_bytewise() {
        assert_eq!(transform(b"pw", 5).unwrap(), b"u|".to_vec());
        assert_eq!(transform(b"abc", 1).unwrap(), b"bcd".to_vec());
        assert_eq!(transform(b"bcd", -1).unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_no_case_handling() {
        // 'z' + 5 leaves the alphabet instead of wrapping to 'e'
        assert_eq!(transform(b"z", 5).unwrap(), vec![b'z' + 5]);
        assert_eq!(transform(b"Z", 5).unwrap(), vec![b'_']);
    }

    #[test]
    fn test_hash_matches_transform() {
        for password in ["pw", "hunter2", "correct horse battery staple", "pässwörd", "~~~"] {
            assert_eq!(
                hash(password),
                transform(password.as_bytes(), FIXED_SHIFT).unwrap()
            );
        }
    }

    #[test]
    fn test_preserves_length() {
        for password in ["", "a", "0123456789", "ünïcödé"] {
            assert_eq!(hash(password).len(), password.len());
        }
    }

    #[test]
    fn test_distinct_inputs_stay_distinct() {
        let inputs = ["pw", "pW", "pw ", "wp", "p", "qw"];
        for (i, a) in inputs.iter().enumerate() {
            for b in &inputs[i + 1..] {
                assert_ne!(hash(a), hash(b), "{a:?} and {b:?} collided");
            }
            assert_eq!(hash(a), hash(a));
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = transform(&[b'a', 0xFC], 5).unwrap_err();
        assert_eq!(
            err,
            TransformError::OutOfRange {
                index: 1,
                byte: 0xFC,
                shift: 5
            }
        );
        assert!(err.to_string().contains("index 1"));

        assert!(transform(&[0x02], -3).is_err());
        assert_eq!(transform(&[0xFA], 5).unwrap(), vec![0xFF]);
    }
}
