//! Maker signatures over order and cancel digests.
//!
//! Signatures are secp256k1 ECDSA in the `(v, r, s)` form wallets emit.
//! `v` may be given as a raw parity bit (`0`/`1`) or in the legacy
//! `27`/`28` form. High-`s` signatures are rejected so that every
//! authorization has exactly one valid encoding.
//!
//! Two signing schemes are accepted for a 32-byte digest:
//!
//! - **Personal message**: EIP-191 `"\x19Ethereum Signed Message:\n32"`
//!   over the digest, what `personal_sign`/`signMessage` wallets produce
//! - **Raw digest**: the digest itself, what `eth_signTypedData_v4` produces
//!
//! The personal form is tried first.

use alloy_primitives::{b256, eip191_hash_message, Address, PrimitiveSignature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::error::{Error, Result};

/// Half the secp256k1 group order; valid `s` values are at most this.
const SECP256K1_HALF_ORDER: B256 =
    b256!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");

/// An ECDSA signature in `(v, r, s)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl OrderSignature {
    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// Sign `digest` as an EIP-191 personal message with a local private key
    pub fn sign(signer: &PrivateKeySigner, digest: &B256) -> Result<Self> {
        let signature = signer
            .sign_message_sync(digest.as_slice())
            .map_err(|_| Error::InvalidSignature)?;
        Self::from_bytes(&signature.as_bytes())
    }

    /// Sign the raw `digest` with a local private key
    pub fn sign_digest(signer: &PrivateKeySigner, digest: &B256) -> Result<Self> {
        let signature = signer
            .sign_hash_sync(digest)
            .map_err(|_| Error::InvalidSignature)?;
        Self::from_bytes(&signature.as_bytes())
    }

    /// Parse the 65-byte `r ‖ s ‖ v` encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InvalidSignature);
        }
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// Parse a hex string of the 65-byte encoding, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| Error::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    /// The 65-byte `r ‖ s ‖ v` encoding
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed hex of the 65-byte encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    fn y_parity(&self) -> Result<bool> {
        match self.v {
            0 | 27 => Ok(false),
            1 | 28 => Ok(true),
            _ => Err(Error::InvalidSignature),
        }
    }

    /// Recover the signing address of a raw 32-byte digest.
    pub fn recover(&self, digest: &B256) -> Result<Address> {
        if self.s > SECP256K1_HALF_ORDER {
            return Err(Error::InvalidSignature);
        }
        let parity = self.y_parity()?;
        let signature = PrimitiveSignature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            parity,
        );
        signature
            .recover_address_from_prehash(digest)
            .map_err(|_| Error::InvalidSignature)
    }

    /// Recover the signing address of `digest` signed as a personal message.
    pub fn recover_personal(&self, digest: &B256) -> Result<Address> {
        self.recover(&eip191_hash_message(digest))
    }

    /// Check whether `signer` signed `digest` under either scheme
    ///
    /// # Errors
    ///
    /// `InvalidSignature` if the signature recovers under neither scheme.
    pub fn is_signed_by(&self, digest: &B256, signer: Address) -> Result<bool> {
        match (self.recover_personal(digest), self.recover(digest)) {
            (Err(err), Err(_)) => Err(err),
            (personal, raw) => Ok(personal == Ok(signer) || raw == Ok(signer)),
        }
    }

    /// Check that `signer` produced this signature over `digest`.
    pub fn verify(&self, digest: &B256, signer: Address) -> Result<()> {
        match self.is_signed_by(digest, signer) {
            Ok(true) => Ok(()),
            _ => Err(Error::InvalidSignature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    fn signer() -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).expect("valid key")
    }

    fn sign(signer: &PrivateKeySigner, digest: &B256) -> OrderSignature {
        OrderSignature::sign(signer, digest).expect("signing succeeds")
    }

    #[test]
    fn test_recover_signer() {
        let signer = signer();
        let digest = keccak256(b"order");
        let signature = sign(&signer, &digest);

        assert_eq!(signature.recover_personal(&digest), Ok(signer.address()));
        assert_eq!(signature.verify(&digest, signer.address()), Ok(()));
    }

    #[test]
    fn test_wallet_message_signature_verifies() {
        let signer = signer();
        let digest = keccak256(b"order");
        let raw = signer.sign_message_sync(digest.as_slice()).expect("signing succeeds");
        let signature = OrderSignature::from_bytes(&raw.as_bytes()).unwrap();

        assert_eq!(signature, sign(&signer, &digest));
        assert_eq!(signature.verify(&digest, signer.address()), Ok(()));
        assert_ne!(signature.recover(&digest), Ok(signer.address()));
    }

    #[test]
    fn test_raw_digest_signature_verifies() {
        let signer = signer();
        let digest = keccak256(b"order");
        let raw = signer.sign_hash_sync(&digest).expect("signing succeeds");
        let signature = OrderSignature::from_bytes(&raw.as_bytes()).unwrap();

        assert_eq!(OrderSignature::sign_digest(&signer, &digest), Ok(signature));
        assert_eq!(signature.recover(&digest), Ok(signer.address()));
        assert_eq!(signature.verify(&digest, signer.address()), Ok(()));
        assert_eq!(signature.is_signed_by(&digest, Address::repeat_byte(1)), Ok(false));
    }

    #[test]
    fn test_verify_rejects_other_signer() {
        let digest = keccak256(b"order");
        let signature = sign(&signer(), &digest);

        assert_eq!(
            signature.verify(&digest, Address::repeat_byte(1)),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_rejects_other_digest() {
        let signer = signer();
        let signature = sign(&signer, &keccak256(b"order"));

        assert_eq!(
            signature.verify(&keccak256(b"other"), signer.address()),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_parity_forms_are_equivalent() {
        let signer = signer();
        let digest = keccak256(b"order");
        let legacy = sign(&signer, &digest);
        let raw = OrderSignature::new(legacy.v - 27, legacy.r, legacy.s);

        assert!(legacy.v == 27 || legacy.v == 28);
        assert_eq!(raw.recover_personal(&digest), Ok(signer.address()));
        assert_eq!(raw.verify(&digest, signer.address()), Ok(()));
    }

    #[test]
    fn test_invalid_v_is_rejected() {
        let digest = keccak256(b"order");
        let mut signature = sign(&signer(), &digest);
        signature.v = 29;

        assert_eq!(signature.recover(&digest), Err(Error::InvalidSignature));
        assert_eq!(
            signature.is_signed_by(&digest, signer().address()),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_high_s_is_rejected() {
        let digest = keccak256(b"order");
        let mut signature = sign(&signer(), &digest);
        signature.s = B256::repeat_byte(0xff);

        assert_eq!(signature.recover(&digest), Err(Error::InvalidSignature));
    }

    #[test]
    fn test_hex_encoding() {
        let signature = sign(&signer(), &keccak256(b"order"));
        let encoded = signature.to_hex();

        assert_eq!(encoded.len(), 2 + 130);
        assert_eq!(OrderSignature::from_hex(&encoded), Ok(signature));
        assert_eq!(OrderSignature::from_hex(&encoded[2..]), Ok(signature));
        assert_eq!(OrderSignature::from_hex("0xzz"), Err(Error::InvalidSignature));
        assert_eq!(OrderSignature::from_bytes(&[0u8; 64]), Err(Error::InvalidSignature));
    }
}
