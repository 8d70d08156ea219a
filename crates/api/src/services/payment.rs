//! Payment signature verification.
//!
//! The gateway signs `"{order_ref}|{payment_ref}"` with HMAC-SHA256 under
//! the shared key secret and sends the hex signature back with the checkout
//! callback. A transaction is treated as authentic only on exact match.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur during payment verification.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The order requires payment but no proof was supplied.
    #[error("payment proof is required for this order")]
    MissingProof,

    /// The supplied signature does not match the expected one.
    #[error("payment signature verification failed")]
    SignatureMismatch,
}

/// Gateway transaction proof as supplied by the client after checkout.
#[derive(Debug, Clone)]
pub struct PaymentProof {
    /// Gateway-side order reference.
    pub order_ref: String,
    /// Gateway-side payment reference.
    pub payment_ref: String,
    /// Hex HMAC-SHA256 signature over `"{order_ref}|{payment_ref}"`.
    pub signature: String,
}

/// Verifier for gateway payment signatures.
#[derive(Clone)]
pub struct PaymentVerifier {
    key_secret: SecretString,
}

impl PaymentVerifier {
    /// Create a verifier from the gateway configuration.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            key_secret: config.key_secret.clone(),
        }
    }

    /// Verify a transaction proof.
    ///
    /// Comparison happens on the raw MAC bytes in constant time; any
    /// mutation of the signature, order ref, or payment ref fails.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::SignatureMismatch` if the signature is not
    /// valid hex or does not match.
    pub fn verify(&self, proof: &PaymentProof) -> Result<(), PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
            .map_err(|_| PaymentError::SignatureMismatch)?;
        mac.update(proof.order_ref.as_bytes());
        mac.update(b"|");
        mac.update(proof.payment_ref.as_bytes());

        let signature = hex::decode(&proof.signature).map_err(|_| PaymentError::SignatureMismatch)?;

        mac.verify_slice(&signature)
            .map_err(|_| PaymentError::SignatureMismatch)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "gw_live_9vQ4tR7mX2kL8nB3";

    fn verifier() -> PaymentVerifier {
        PaymentVerifier {
            key_secret: SecretString::from(TEST_SECRET),
        }
    }

    fn sign(order_ref: &str, payment_ref: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(TEST_SECRET.as_bytes()).unwrap();
        mac.update(format!("{order_ref}|{payment_ref}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let proof = PaymentProof {
            order_ref: "order_9A33XWu170gUtm".to_string(),
            payment_ref: "pay_29QQoUBi66xm2f".to_string(),
            signature: sign("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f"),
        };
        assert!(verifier().verify(&proof).is_ok());
    }

    #[test]
    fn test_mutated_signature_fails() {
        let mut signature = sign("order_a", "pay_b");
        // Flip the last hex character
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });

        let proof = PaymentProof {
            order_ref: "order_a".to_string(),
            payment_ref: "pay_b".to_string(),
            signature,
        };
        assert!(matches!(
            verifier().verify(&proof),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_mutated_order_ref_fails() {
        let proof = PaymentProof {
            order_ref: "order_X".to_string(),
            payment_ref: "pay_b".to_string(),
            signature: sign("order_a", "pay_b"),
        };
        assert!(verifier().verify(&proof).is_err());
    }

    #[test]
    fn test_mutated_payment_ref_fails() {
        let proof = PaymentProof {
            order_ref: "order_a".to_string(),
            payment_ref: "pay_Y".to_string(),
            signature: sign("order_a", "pay_b"),
        };
        assert!(verifier().verify(&proof).is_err());
    }

    #[test]
    fn test_non_hex_signature_fails() {
        let proof = PaymentProof {
            order_ref: "order_a".to_string(),
            payment_ref: "pay_b".to_string(),
            signature: "not-hex!".to_string(),
        };
        assert!(verifier().verify(&proof).is_err());
    }

    #[test]
    fn test_refs_are_not_interchangeable() {
        // Signing (a, b) must not verify as (b, a)
        let proof = PaymentProof {
            order_ref: "pay_b".to_string(),
            payment_ref: "order_a".to_string(),
            signature: sign("order_a", "pay_b"),
        };
        assert!(verifier().verify(&proof).is_err());
    }
}
