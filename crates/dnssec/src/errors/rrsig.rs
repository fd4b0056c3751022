use super::{finding_map, format_timestamp, Finding};
use serde_json::{Map, Value};

/// Warnings the RRSIG evaluator (spec §4.1) can raise. Never affects
/// `validation_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RrsigWarning {
    /// The signing algorithm isn't one the crypto collaborator implements.
    AlgorithmNotSupported { algorithm: u8 },
    /// The RRset's TTL and the TTL recorded alongside its covering RRSIG
    /// disagree — not itself a validation failure, but worth flagging.
    RrsetTtlMismatch { rrset_ttl: u32, rrsig_ttl: u32 },
}

impl Finding for RrsigWarning {
    fn name(&self) -> &'static str {
        match self {
            RrsigWarning::AlgorithmNotSupported { .. } => "AlgorithmNotSupported",
            RrsigWarning::RrsetTtlMismatch { .. } => "RRsetTTLMismatch",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        match self {
            RrsigWarning::AlgorithmNotSupported { algorithm } => finding_map(
                self.name(),
                vec![("algorithm".into(), Value::from(*algorithm))],
            ),
            RrsigWarning::RrsetTtlMismatch {
                rrset_ttl,
                rrsig_ttl,
            } => finding_map(
                self.name(),
                vec![
                    ("rrset_ttl".into(), Value::from(*rrset_ttl)),
                    ("rrsig_ttl".into(), Value::from(*rrsig_ttl)),
                ],
            ),
        }
    }
}

/// Errors the RRSIG evaluator (spec §4.1) can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RrsigError {
    /// `rrsig_info.ttl` exceeded the signature's `original_ttl` — an
    /// impossible TTL for a correctly-signed RRset.
    OriginalTtlExceeded { rrset_ttl: u32, original_ttl: u32 },
    /// The signer named in the RRSIG isn't (or doesn't cover) the zone
    /// the RRset actually belongs to.
    SignerNotZone { zone_name: String, signer_name: String },
    /// The signing DNSKEY is revoked and the RRSIG's key tag reflects the
    /// post-revocation tag — the key should never have been used again.
    DnskeyRevokedRrsig,
    /// `reference_ts` precedes the signature's inception time.
    InceptionInFuture { inception: i64, reference_time: i64 },
    /// `reference_ts` is at or past the signature's expiration time.
    ExpirationInPast { expiration: i64, reference_time: i64 },
    /// The signature is still within its validity window, but expires
    /// before its own TTL would let a cache safely hold it — a
    /// provisioning warning surfaced as an error per spec §4.1.5.
    TtlBeyondExpiration {
        expiration: i64,
        rrsig_ttl: u32,
        reference_time: i64,
    },
    /// Cryptographic verification failed outright.
    SignatureInvalid,
}

impl Finding for RrsigError {
    fn name(&self) -> &'static str {
        match self {
            RrsigError::OriginalTtlExceeded { .. } => "OriginalTTLExceeded",
            RrsigError::SignerNotZone { .. } => "SignerNotZone",
            RrsigError::DnskeyRevokedRrsig => "DNSKEYRevokedRRSIG",
            RrsigError::InceptionInFuture { .. } => "InceptionInFuture",
            RrsigError::ExpirationInPast { .. } => "ExpirationInPast",
            RrsigError::TtlBeyondExpiration { .. } => "TTLBeyondExpiration",
            RrsigError::SignatureInvalid => "SignatureInvalid",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        match self {
            RrsigError::OriginalTtlExceeded {
                rrset_ttl,
                original_ttl,
            } => finding_map(
                self.name(),
                vec![
                    ("rrset_ttl".into(), Value::from(*rrset_ttl)),
                    ("original_ttl".into(), Value::from(*original_ttl)),
                ],
            ),
            RrsigError::SignerNotZone {
                zone_name,
                signer_name,
            } => finding_map(
                self.name(),
                vec![
                    ("zone_name".into(), Value::from(zone_name.clone())),
                    ("signer_name".into(), Value::from(signer_name.clone())),
                ],
            ),
            RrsigError::DnskeyRevokedRrsig => finding_map(self.name(), vec![]),
            RrsigError::InceptionInFuture {
                inception,
                reference_time,
            } => finding_map(
                self.name(),
                vec![
                    ("inception".into(), Value::from(format_timestamp(*inception))),
                    (
                        "reference_time".into(),
                        Value::from(format_timestamp(*reference_time)),
                    ),
                ],
            ),
            RrsigError::ExpirationInPast {
                expiration,
                reference_time,
            } => finding_map(
                self.name(),
                vec![
                    ("expiration".into(), Value::from(format_timestamp(*expiration))),
                    (
                        "reference_time".into(),
                        Value::from(format_timestamp(*reference_time)),
                    ),
                ],
            ),
            RrsigError::TtlBeyondExpiration {
                expiration,
                rrsig_ttl,
                reference_time,
            } => finding_map(
                self.name(),
                vec![
                    ("expiration".into(), Value::from(format_timestamp(*expiration))),
                    ("rrsig_ttl".into(), Value::from(*rrsig_ttl)),
                    (
                        "reference_time".into(),
                        Value::from(format_timestamp(*reference_time)),
                    ),
                ],
            ),
            RrsigError::SignatureInvalid => finding_map(self.name(), vec![]),
        }
    }
}
