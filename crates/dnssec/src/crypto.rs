//! Cryptographic collaborator (§6): pure signature and digest verification,
//! ported from the synchronous, stateless half of the donor's
//! `SignatureVerifier`. The chain-walking and DNSKEY fetching that used to
//! surround these calls lives outside this crate entirely.

use ring::signature;
use sha2::{Digest, Sha256, Sha384};

/// Three-valued verification outcome (§6). `Unsupported` is distinct from
/// `Bad` so callers can tell "the signature didn't check out" apart from
/// "we don't have an implementation for this algorithm" — the evaluators
/// route the latter to `INDETERMINATE_UNKNOWN_ALGORITHM` rather than a
/// hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tri {
    Ok,
    Bad,
    Unsupported,
}

impl Tri {
    pub fn is_ok(self) -> bool {
        matches!(self, Tri::Ok)
    }

    pub fn is_unsupported(self) -> bool {
        matches!(self, Tri::Unsupported)
    }
}

/// The crypto collaborator the evaluators call into. A trait rather than
/// free functions so tests can substitute a stub that always returns
/// `Tri::Ok`/`Tri::Bad` without touching `ring`.
pub trait CryptoVerifier {
    fn validate_rrsig(
        &self,
        algorithm: u8,
        signature: &[u8],
        signed_message: &[u8],
        public_key: &[u8],
    ) -> Tri;

    fn validate_ds_digest(&self, digest_type: u8, expected_digest: &[u8], dnskey_message: &[u8]) -> Tri;
}

/// Reference implementation backed by `ring`, covering DNSSEC algorithms
/// 8 (RSA/SHA-256), 13 (ECDSA P-256/SHA-256) and 15 (Ed25519) and DS digest
/// types 2 (SHA-256) and 4 (SHA-384). Anything else is `Unsupported`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingCryptoVerifier;

impl CryptoVerifier for RingCryptoVerifier {
    fn validate_rrsig(
        &self,
        algorithm: u8,
        sig: &[u8],
        signed_message: &[u8],
        public_key: &[u8],
    ) -> Tri {
        match algorithm {
            8 => verify_rsa_sha256(signed_message, sig, public_key),
            13 => verify_ecdsa_p256(signed_message, sig, public_key),
            15 => verify_ed25519(signed_message, sig, public_key),
            _ => Tri::Unsupported,
        }
    }

    fn validate_ds_digest(&self, digest_type: u8, expected_digest: &[u8], dnskey_message: &[u8]) -> Tri {
        let computed = match digest_type {
            2 => Sha256::digest(dnskey_message).to_vec(),
            4 => Sha384::digest(dnskey_message).to_vec(),
            _ => return Tri::Unsupported,
        };
        if computed == expected_digest {
            Tri::Ok
        } else {
            Tri::Bad
        }
    }
}

fn verify_rsa_sha256(data: &[u8], sig: &[u8], public_key: &[u8]) -> Tri {
    let Ok((exponent, modulus)) = parse_rsa_key(public_key) else {
        return Tri::Bad;
    };
    let key = signature::RsaPublicKeyComponents {
        n: &modulus,
        e: &exponent,
    };
    match key.verify(&signature::RSA_PKCS1_2048_8192_SHA256, data, sig) {
        Ok(()) => Tri::Ok,
        Err(_) => Tri::Bad,
    }
}

fn verify_ecdsa_p256(data: &[u8], sig: &[u8], public_key: &[u8]) -> Tri {
    if public_key.len() != 64 || sig.len() != 64 {
        return Tri::Bad;
    }
    let key = signature::UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, public_key);
    match key.verify(data, sig) {
        Ok(()) => Tri::Ok,
        Err(_) => Tri::Bad,
    }
}

fn verify_ed25519(data: &[u8], sig: &[u8], public_key: &[u8]) -> Tri {
    if public_key.len() != 32 || sig.len() != 64 {
        return Tri::Bad;
    }
    let key = signature::UnparsedPublicKey::new(&signature::ED25519, public_key);
    match key.verify(data, sig) {
        Ok(()) => Tri::Ok,
        Err(_) => Tri::Bad,
    }
}

/// RSA public key as carried in a DNSKEY: exponent-length-prefixed
/// exponent followed by the modulus (RFC 3110 §2).
fn parse_rsa_key(key_data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), ()> {
    if key_data.is_empty() {
        return Err(());
    }
    let first_byte = key_data[0];
    let (exp_len, exp_start) = if first_byte == 0 {
        if key_data.len() < 3 {
            return Err(());
        }
        let exp_len = u16::from_be_bytes([key_data[1], key_data[2]]) as usize;
        (exp_len, 3)
    } else {
        (first_byte as usize, 1)
    };

    let exp_end = exp_start + exp_len;
    if exp_end > key_data.len() {
        return Err(());
    }
    let exponent = key_data[exp_start..exp_end].to_vec();
    let modulus = key_data[exp_end..].to_vec();
    if modulus.is_empty() {
        return Err(());
    }
    Ok((exponent, modulus))
}

/// Builds the message an RRSIG's signature covers (RFC 4034 §3.1.8.1): the
/// RRSIG RDATA (everything but the signature itself) followed by every RR
/// in the covered RRset, each in canonical form with its TTL replaced by
/// `original_ttl`, sorted into canonical RR order.
pub fn build_signed_message(
    owner_wire: &[u8],
    rdtype: u16,
    rrsig: &crate::types::RrsigRecord,
    records: &[Vec<u8>],
) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&rrsig.type_covered.value().to_be_bytes());
    data.push(rrsig.algorithm);
    data.push(rrsig.labels);
    data.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
    data.extend_from_slice(&(rrsig.expiration as u32).to_be_bytes());
    data.extend_from_slice(&(rrsig.inception as u32).to_be_bytes());
    data.extend_from_slice(&rrsig.key_tag.to_be_bytes());
    data.extend_from_slice(&name_to_wire(&rrsig.signer.to_canonical_string()));

    let mut canonical_records: Vec<&Vec<u8>> = records.iter().collect();
    canonical_records.sort();
    for rdata in canonical_records {
        data.extend_from_slice(owner_wire);
        data.extend_from_slice(&rdtype.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes()); // class IN
        data.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
        data.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        data.extend_from_slice(rdata);
    }
    data
}

/// Builds the wire-format bytes a DNSKEY hashes into its DS digest
/// (RFC 4034 §5.1.4): owner name (wire format) followed by DNSKEY RDATA.
pub fn build_dnskey_data(owner_wire: &[u8], flags: u16, algorithm: u8, key: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(owner_wire.len() + 4 + key.len());
    data.extend_from_slice(owner_wire);
    data.extend_from_slice(&flags.to_be_bytes());
    data.push(3); // protocol
    data.push(algorithm);
    data.extend_from_slice(key);
    data
}

/// Converts a presentation-format name to DNS wire format, lowercasing for
/// canonical form (RFC 4034 §6.2).
pub fn name_to_wire(name: &str) -> Vec<u8> {
    let mut wire = Vec::new();
    let trimmed = name.trim_end_matches('.');
    if trimmed.is_empty() {
        wire.push(0);
        return wire;
    }
    for label in trimmed.split('.') {
        wire.push(label.len() as u8);
        wire.extend_from_slice(label.to_lowercase().as_bytes());
    }
    wire.push(0);
    wire
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_algorithm_is_unsupported_not_bad() {
        let verifier = RingCryptoVerifier;
        let result = verifier.validate_rrsig(99, b"sig", b"data", b"key");
        assert_eq!(result, Tri::Unsupported);
    }

    #[test]
    fn unknown_digest_type_is_unsupported() {
        let verifier = RingCryptoVerifier;
        let result = verifier.validate_ds_digest(99, b"digest", b"message");
        assert_eq!(result, Tri::Unsupported);
    }

    #[test]
    fn ds_digest_matches_sha256() {
        let verifier = RingCryptoVerifier;
        let message = b"owner-wire+dnskey-rdata";
        let digest = Sha256::digest(message).to_vec();
        assert_eq!(
            verifier.validate_ds_digest(2, &digest, message),
            Tri::Ok
        );
        assert_eq!(verifier.validate_ds_digest(2, b"wrong", message), Tri::Bad);
    }

    #[test]
    fn signed_message_sorts_records_into_canonical_order() {
        use crate::types::RrsigRecord;
        use ferrous_dns_domain::{Name, RecordType};

        let rrsig = RrsigRecord {
            type_covered: RecordType::A,
            algorithm: 8,
            labels: 2,
            original_ttl: 3600,
            inception: 1_000,
            expiration: 2_000,
            key_tag: 1,
            signer: Name::parse("example."),
            signature: vec![],
        };
        let owner_wire = name_to_wire("www.example.");
        let records = vec![vec![2, 2, 2, 2], vec![1, 1, 1, 1]];
        let message = build_signed_message(&owner_wire, RecordType::A.value(), &rrsig, &records);

        let mut sorted = records.clone();
        sorted.sort();
        assert_eq!(sorted[0], vec![1, 1, 1, 1]);
        // the [1,1,1,1] record must appear before [2,2,2,2] in the signed message
        let pos_a = message.windows(4).position(|w| w == [1, 1, 1, 1]).unwrap();
        let pos_b = message.windows(4).position(|w| w == [2, 2, 2, 2]).unwrap();
        assert!(pos_a < pos_b);
    }

    #[test]
    fn name_to_wire_is_lowercased_and_root_terminated() {
        let wire = name_to_wire("WWW.Example.com.");
        assert_eq!(wire.last(), Some(&0));
        assert_eq!(wire[0], 3);
        assert_eq!(&wire[1..4], b"www");
    }
}
