//! Gateway request signature verification.
//!
//! Inbound event posts carry a hex HMAC-SHA256 of the raw body under the
//! shared signing secret. Comparison is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Errors produced while checking a request signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {SIGNATURE_HEADER} header")]
    MissingHeader,

    #[error("signature is not valid hex")]
    InvalidHex,

    #[error("signature mismatch")]
    Mismatch,
}

/// Verifier for gateway request signatures.
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    /// Creates a verifier with the given signing secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Verifies the signature over the raw request body.
    pub fn verify(&self, payload: &[u8], signature_hex: &str) -> Result<(), SignatureError> {
        let provided =
            hex::decode(signature_hex.trim()).map_err(|_| SignatureError::InvalidHex)?;

        let mut mac =
            Hmac::<Sha256>::new_from_slice(&self.secret).expect("HMAC accepts any key");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if constant_time_compare(&expected, &provided) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature for a payload, for clients and tests.
pub fn sign_payload(secret: impl AsRef<[u8]>, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_ref()).expect("HMAC accepts any key");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_correct_signature() {
        let verifier = SignatureVerifier::new("test-secret");
        let payload = br#"{"kind":"text"}"#;
        let signature = sign_payload("test-secret", payload);

        assert_eq!(verifier.verify(payload, &signature), Ok(()));
    }

    #[test]
    fn rejects_signature_from_wrong_secret() {
        let verifier = SignatureVerifier::new("test-secret");
        let payload = br#"{"kind":"text"}"#;
        let signature = sign_payload("other-secret", payload);

        assert_eq!(
            verifier.verify(payload, &signature),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_signature_over_tampered_payload() {
        let verifier = SignatureVerifier::new("test-secret");
        let signature = sign_payload("test-secret", b"original");

        assert_eq!(
            verifier.verify(b"tampered", &signature),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_non_hex_signature() {
        let verifier = SignatureVerifier::new("test-secret");

        assert_eq!(
            verifier.verify(b"payload", "not-hex!"),
            Err(SignatureError::InvalidHex)
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace_in_header_value() {
        let verifier = SignatureVerifier::new("test-secret");
        let payload = b"payload";
        let signature = format!(" {} ", sign_payload("test-secret", payload));

        assert_eq!(verifier.verify(payload, &signature), Ok(()));
    }
}
