//! RRSIG evaluator (spec §4.1): signature, validity window, signer-scope
//! and revocation checks over an RRset and its covering signature.

use super::{servers_value, set_if_valid, Downgradeable};
use crate::crypto::{build_signed_message, name_to_wire, CryptoVerifier, Tri};
use crate::errors::{format_timestamp, Finding, RrsigError, RrsigWarning};
use crate::types::{DnskeyRecord, RrsetCarrier, RrsigRecord, ServersClients};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ferrous_dns_domain::{Name, RecordType};
use serde_json::{Map, Value};
use tracing::debug;

use super::LogLevel;

/// `RRSIGStatus.validation_status` (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrsigValidationStatus {
    Valid,
    IndeterminateNoDnskey,
    IndeterminateMatchPreRevoke,
    IndeterminateUnknownAlgorithm,
    Expired,
    Premature,
    InvalidSig,
    Invalid,
}

impl Downgradeable for RrsigValidationStatus {
    fn valid() -> Self {
        RrsigValidationStatus::Valid
    }
}

impl RrsigValidationStatus {
    fn as_str(self) -> &'static str {
        match self {
            RrsigValidationStatus::Valid => "VALID",
            RrsigValidationStatus::IndeterminateNoDnskey => "INDETERMINATE_NO_DNSKEY",
            RrsigValidationStatus::IndeterminateMatchPreRevoke => "INDETERMINATE_MATCH_PRE_REVOKE",
            RrsigValidationStatus::IndeterminateUnknownAlgorithm => {
                "INDETERMINATE_UNKNOWN_ALGORITHM"
            }
            RrsigValidationStatus::Expired => "EXPIRED",
            RrsigValidationStatus::Premature => "PREMATURE",
            RrsigValidationStatus::InvalidSig => "INVALID_SIG",
            RrsigValidationStatus::Invalid => "INVALID",
        }
    }
}

/// The outcome of evaluating one RRSIG over its covered RRset (spec §4.1).
#[derive(Debug, Clone)]
pub struct RrsigStatus {
    pub validation_status: RrsigValidationStatus,
    pub warnings: Vec<RrsigWarning>,
    pub errors: Vec<RrsigError>,
    signer: Name,
    rdtype: RecordType,
    owner: Name,
    key_tag: u16,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    inception: i64,
    expiration: i64,
    signature: Vec<u8>,
    rrsig_ttl: u32,
    reference_ts: i64,
    dnskey_key_tag: Option<u16>,
    dnskey_key_tag_no_revoke: Option<u16>,
    dnskey_rdata: Option<String>,
    servers_clients: ServersClients,
}

impl RrsigStatus {
    /// Runs every check in spec §4.1 once and returns the resulting
    /// status. `dnskey` is the signing key when the caller has one to
    /// hand; `zone_name` is the zone the RRset is believed to belong to,
    /// when known independently of the RRSIG's own `signer` field.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        rrset: &RrsetCarrier,
        rrsig: &RrsigRecord,
        dnskey: Option<&DnskeyRecord>,
        zone_name: Option<&Name>,
        reference_ts: i64,
        algorithm_unknown: bool,
        crypto: &dyn CryptoVerifier,
    ) -> RrsigStatus {
        let rrsig_info = rrset
            .rrsig_info
            .get(rrsig)
            .expect("caller contract: rrsig must be a key of rrset.rrsig_info");

        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        // `None` covers both "no key to check against" and "crypto layer
        // doesn't implement this algorithm" — the branch below tells
        // the two apart by whether `dnskey` itself was present.
        let signature_valid: Option<bool> = match dnskey {
            None => None,
            Some(key) => {
                let owner_wire = name_to_wire(&rrset.name.to_canonical_string());
                let message =
                    build_signed_message(&owner_wire, rrset.rdtype.value(), rrsig, &rrset.records);
                match crypto.validate_rrsig(rrsig.algorithm, &rrsig.signature, &message, &key.key) {
                    Tri::Ok => Some(true),
                    Tri::Bad => Some(false),
                    Tri::Unsupported => None,
                }
            }
        };

        let mut status = RrsigValidationStatus::Valid;

        // 1. Keying.
        if signature_valid.is_none() || algorithm_unknown {
            match dnskey {
                None => set_if_valid(&mut status, RrsigValidationStatus::IndeterminateNoDnskey),
                Some(_) => {
                    set_if_valid(&mut status, RrsigValidationStatus::IndeterminateUnknownAlgorithm);
                    warnings.push(RrsigWarning::AlgorithmNotSupported {
                        algorithm: rrsig.algorithm,
                    });
                }
            }
        }

        // 2. TTL sanity (never downgrades status).
        if rrset.ttl != rrsig_info.ttl {
            warnings.push(RrsigWarning::RrsetTtlMismatch {
                rrset_ttl: rrset.ttl,
                rrsig_ttl: rrsig_info.ttl,
            });
        }
        if rrsig_info.ttl > rrsig.original_ttl {
            errors.push(RrsigError::OriginalTtlExceeded {
                rrset_ttl: rrset.ttl,
                original_ttl: rrsig.original_ttl,
            });
        }
        let min_ttl = rrset.ttl.min(rrsig_info.ttl).min(rrsig.original_ttl);

        // 3. Signer scope.
        let signer_mismatch = match zone_name {
            Some(zone) => &rrsig.signer != zone,
            None => !rrset.name.is_subdomain_of(&rrsig.signer),
        };
        if signer_mismatch {
            set_if_valid(&mut status, RrsigValidationStatus::Invalid);
            let zone_name_text = zone_name.unwrap_or(&rrsig.signer).to_canonical_string();
            errors.push(RrsigError::SignerNotZone {
                zone_name: zone_name_text,
                signer_name: rrsig.signer.to_canonical_string(),
            });
        }

        // 4. Revocation cross-check.
        let mut dnskey_key_tag = None;
        let mut dnskey_key_tag_no_revoke = None;
        if let Some(key) = dnskey {
            dnskey_key_tag = Some(key.key_tag);
            dnskey_key_tag_no_revoke = Some(key.key_tag_no_revoke);
            if key.is_revoked() && rrsig.type_covered != RecordType::DNSKEY {
                if rrsig.key_tag != key.key_tag {
                    set_if_valid(&mut status, RrsigValidationStatus::IndeterminateMatchPreRevoke);
                } else {
                    errors.push(RrsigError::DnskeyRevokedRrsig);
                    set_if_valid(&mut status, RrsigValidationStatus::Invalid);
                }
            }
        }

        // 5. Validity window.
        if reference_ts < rrsig.inception {
            set_if_valid(&mut status, RrsigValidationStatus::Premature);
            errors.push(RrsigError::InceptionInFuture {
                inception: rrsig.inception,
                reference_time: reference_ts,
            });
        }
        if reference_ts >= rrsig.expiration {
            set_if_valid(&mut status, RrsigValidationStatus::Expired);
            errors.push(RrsigError::ExpirationInPast {
                expiration: rrsig.expiration,
                reference_time: reference_ts,
            });
        } else if reference_ts + i64::from(min_ttl) >= rrsig.expiration {
            errors.push(RrsigError::TtlBeyondExpiration {
                expiration: rrsig.expiration,
                rrsig_ttl: min_ttl,
                reference_time: reference_ts,
            });
        }

        // 6. Cryptographic verdict.
        if !algorithm_unknown && signature_valid == Some(false) {
            if let Some(key) = dnskey {
                if key.key_tag == rrsig.key_tag {
                    set_if_valid(&mut status, RrsigValidationStatus::InvalidSig);
                    errors.push(RrsigError::SignatureInvalid);
                }
            }
        }

        debug!(
            rrset = %rrset.name,
            rdtype = %rrset.rdtype,
            status = status.as_str(),
            "evaluated RRSIG"
        );

        RrsigStatus {
            validation_status: status,
            warnings,
            errors,
            signer: rrsig.signer.clone(),
            rdtype: rrset.rdtype,
            owner: rrset.name.clone(),
            key_tag: rrsig.key_tag,
            algorithm: rrsig.algorithm,
            labels: rrsig.labels,
            original_ttl: rrsig.original_ttl,
            inception: rrsig.inception,
            expiration: rrsig.expiration,
            signature: rrsig.signature.clone(),
            rrsig_ttl: rrsig_info.ttl,
            reference_ts,
            dnskey_key_tag,
            dnskey_key_tag_no_revoke,
            dnskey_rdata: dnskey.map(|k| BASE64.encode(&k.key)),
            servers_clients: rrsig_info.servers_clients.clone(),
        }
    }

    fn description(&self) -> String {
        format!("RRSIG covering {}/{}", self.owner, self.rdtype)
    }

    /// Serializes per the §6 contract: fixed key order, DEBUG-only
    /// `rdata`, `description`/`status` gated on `show_basic`.
    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        let mut map = Map::new();
        let show_basic = (!self.warnings.is_empty() && loglevel <= LogLevel::Warning)
            || (!self.errors.is_empty() && loglevel <= LogLevel::Error)
            || !matches!(
                self.validation_status,
                RrsigValidationStatus::Valid
                    | RrsigValidationStatus::IndeterminateNoDnskey
                    | RrsigValidationStatus::IndeterminateUnknownAlgorithm
            );

        if loglevel <= LogLevel::Info || show_basic {
            map.insert("description".into(), Value::from(self.description()));
        }
        if loglevel <= LogLevel::Debug {
            let mut rdata = Map::new();
            rdata.insert("signer".into(), Value::from(self.signer.to_canonical_string()));
            rdata.insert("algorithm".into(), Value::from(self.algorithm));
            rdata.insert("key_tag".into(), Value::from(self.key_tag));
            rdata.insert("original_ttl".into(), Value::from(self.original_ttl));
            rdata.insert("labels".into(), Value::from(self.labels));
            rdata.insert("inception".into(), Value::from(format_timestamp(self.inception)));
            rdata.insert("expiration".into(), Value::from(format_timestamp(self.expiration)));
            rdata.insert("signature".into(), Value::from(BASE64.encode(&self.signature)));
            map.insert("rdata".into(), Value::Object(rdata));

            let mut meta = Map::new();
            meta.insert("ttl".into(), Value::from(self.rrsig_ttl));
            meta.insert("age".into(), Value::from(self.reference_ts - self.inception));
            meta.insert(
                "remaining_lifetime".into(),
                Value::from(self.expiration - self.reference_ts),
            );
            if let Some(rdata) = &self.dnskey_rdata {
                meta.insert("dnskey".into(), Value::from(rdata.clone()));
            }
            if let Some(tag) = self.dnskey_key_tag {
                if tag != self.key_tag {
                    if let Some(pre_revoke) = self.dnskey_key_tag_no_revoke {
                        meta.insert("dnskey_key_tag_pre_revoke".into(), Value::from(pre_revoke));
                    }
                }
            }
            map.insert("meta".into(), Value::Object(meta));
        }
        if loglevel <= LogLevel::Info || show_basic {
            map.insert(
                "status".into(),
                Value::from(self.validation_status.as_str()),
            );
        }
        if loglevel <= LogLevel::Debug || show_basic {
            map.insert(
                "servers".into(),
                servers_value(&self.servers_clients, consolidate_clients),
            );
        }
        if !self.warnings.is_empty() && loglevel <= LogLevel::Warning {
            map.insert(
                "warnings".into(),
                Value::Array(self.warnings.iter().map(|w| Value::Object(w.serialize())).collect()),
            );
        }
        if !self.errors.is_empty() && loglevel <= LogLevel::Error {
            map.insert(
                "errors".into(),
                Value::Array(self.errors.iter().map(|e| Value::Object(e.serialize())).collect()),
            );
        }
        map
    }
}
