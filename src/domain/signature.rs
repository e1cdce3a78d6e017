//! Gateway payment signatures.
//!
//! A confirmation is authentic when its signature equals
//! `hex(HMAC-SHA256(key_secret, "<order_id>|<payment_id>"))`. Comparison is
//! done by `Mac::verify_slice`, which runs in constant time.

use crate::error::{BookingError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        BookingError::PaymentVerificationFailed("invalid signing key".to_string())
    })?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Computes the signature the gateway would attach to this payment.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    let mac = keyed_mac(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a client-supplied signature against the expected one.
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> Result<()> {
    let provided = hex::decode(signature.trim()).map_err(|_| {
        BookingError::PaymentVerificationFailed("signature is not valid hex".to_string())
    })?;
    keyed_mac(secret, order_id, payment_id)?
        .verify_slice(&provided)
        .map_err(|_| BookingError::PaymentVerificationFailed("signature mismatch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key";
    const ORDER: &str = "order_9A33XWu170gUtm";
    const PAYMENT: &str = "pay_29QQoUBi66xm2f";
    const EXPECTED: &str = "c96ab4589bde779a8ecb195d2b803ec3f9eecf848e548fb04a40461c18d41717";

    #[test]
    fn test_sign_known_vector() {
        assert_eq!(sign(SECRET, ORDER, PAYMENT).unwrap(), EXPECTED);
    }

    #[test]
    fn test_verify_accepts_matching_signature() {
        assert!(verify(SECRET, ORDER, PAYMENT, EXPECTED).is_ok());
        assert!(verify(SECRET, ORDER, PAYMENT, &EXPECTED.to_uppercase()).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let cases = [
            (SECRET, "order_other", PAYMENT, EXPECTED),
            (SECRET, ORDER, "pay_other", EXPECTED),
            ("wrong_secret", ORDER, PAYMENT, EXPECTED),
            (SECRET, ORDER, PAYMENT, &EXPECTED[..62]),
            (SECRET, ORDER, PAYMENT, "not-hex"),
            (SECRET, ORDER, PAYMENT, ""),
        ];
        for (secret, order, payment, signature) in cases {
            assert!(matches!(
                verify(secret, order, payment, signature),
                Err(BookingError::PaymentVerificationFailed(_))
            ));
        }
    }
}
