//! DS evaluator (spec §4.2): digest binding between a delegating DS
//! record and the child's DNSKEY.

use super::{servers_value, set_if_valid, Downgradeable, LogLevel};
use crate::crypto::{build_dnskey_data, name_to_wire, CryptoVerifier, Tri};
use crate::errors::{DsError, DsWarning, Finding};
use crate::types::{DnskeyRecord, DsMeta, DsRecord};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};
use tracing::debug;

/// `DSStatus.validation_status` (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsValidationStatus {
    Valid,
    IndeterminateNoDnskey,
    IndeterminateMatchPreRevoke,
    IndeterminateUnknownAlgorithm,
    InvalidDigest,
    Invalid,
}

impl Downgradeable for DsValidationStatus {
    fn valid() -> Self {
        DsValidationStatus::Valid
    }
}

impl DsValidationStatus {
    fn as_str(self) -> &'static str {
        match self {
            DsValidationStatus::Valid => "VALID",
            DsValidationStatus::IndeterminateNoDnskey => "INDETERMINATE_NO_DNSKEY",
            DsValidationStatus::IndeterminateMatchPreRevoke => "INDETERMINATE_MATCH_PRE_REVOKE",
            DsValidationStatus::IndeterminateUnknownAlgorithm => {
                "INDETERMINATE_UNKNOWN_ALGORITHM"
            }
            DsValidationStatus::InvalidDigest => "INVALID_DIGEST",
            DsValidationStatus::Invalid => "INVALID",
        }
    }
}

/// The outcome of evaluating one DS record against the child DNSKEY it's
/// meant to vouch for (spec §4.2).
#[derive(Debug, Clone)]
pub struct DsStatus {
    pub validation_status: DsValidationStatus,
    pub warnings: Vec<DsWarning>,
    pub errors: Vec<DsError>,
    ds_meta: DsMeta,
    algorithm: u8,
    key_tag: u16,
    digest_type: u8,
    digest: Vec<u8>,
    dnskey_present: bool,
    dnskey_key_tag: Option<u16>,
    dnskey_key_tag_no_revoke: Option<u16>,
}

impl DsStatus {
    pub fn evaluate(
        ds: &DsRecord,
        ds_meta: &DsMeta,
        dnskey: Option<&DnskeyRecord>,
        digest_algorithm_unknown: bool,
        crypto: &dyn CryptoVerifier,
    ) -> DsStatus {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let digest_valid: Option<bool> = match dnskey {
            None => None,
            Some(key) => {
                let owner_wire = name_to_wire(&ds_meta.name.to_canonical_string());
                let message = build_dnskey_data(&owner_wire, key.flags, key.algorithm, &key.key);
                match crypto.validate_ds_digest(ds.digest_type, &ds.digest, &message) {
                    Tri::Ok => Some(true),
                    Tri::Bad => Some(false),
                    Tri::Unsupported => None,
                }
            }
        };

        let mut status = DsValidationStatus::Valid;

        if digest_valid.is_none() || digest_algorithm_unknown {
            match dnskey {
                None => set_if_valid(&mut status, DsValidationStatus::IndeterminateNoDnskey),
                Some(_) => {
                    set_if_valid(&mut status, DsValidationStatus::IndeterminateUnknownAlgorithm);
                    warnings.push(DsWarning::DigestAlgorithmNotSupported {
                        algorithm: ds.digest_type,
                    });
                }
            }
        }

        let mut dnskey_key_tag = None;
        let mut dnskey_key_tag_no_revoke = None;
        if let Some(key) = dnskey {
            dnskey_key_tag = Some(key.key_tag);
            dnskey_key_tag_no_revoke = Some(key.key_tag_no_revoke);
            if key.is_revoked() {
                if key.key_tag != ds.key_tag {
                    set_if_valid(&mut status, DsValidationStatus::IndeterminateMatchPreRevoke);
                } else {
                    errors.push(DsError::DnskeyRevokedDs);
                    set_if_valid(&mut status, DsValidationStatus::Invalid);
                }
            }
        }

        if !digest_algorithm_unknown && digest_valid == Some(false) {
            if let Some(key) = dnskey {
                if key.key_tag == ds.key_tag {
                    set_if_valid(&mut status, DsValidationStatus::InvalidDigest);
                    errors.push(DsError::DigestInvalid);
                }
            }
        }

        debug!(
            owner = %ds_meta.name,
            key_tag = ds.key_tag,
            status = status.as_str(),
            "evaluated DS"
        );

        DsStatus {
            validation_status: status,
            warnings,
            errors,
            ds_meta: ds_meta.clone(),
            algorithm: ds.algorithm,
            key_tag: ds.key_tag,
            digest_type: ds.digest_type,
            digest: ds.digest.clone(),
            dnskey_present: dnskey.is_some(),
            dnskey_key_tag,
            dnskey_key_tag_no_revoke,
        }
    }

    fn description(&self) -> String {
        format!(
            "DS record(s) corresponding to DNSKEY for {} (algorithm {}, key tag {})",
            self.ds_meta.name, self.algorithm, self.key_tag
        )
    }

    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        let mut map = Map::new();
        let show_basic = (!self.warnings.is_empty() && loglevel <= LogLevel::Warning)
            || (!self.errors.is_empty() && loglevel <= LogLevel::Error)
            || !matches!(
                self.validation_status,
                DsValidationStatus::Valid
                    | DsValidationStatus::IndeterminateNoDnskey
                    | DsValidationStatus::IndeterminateUnknownAlgorithm
            );

        if loglevel <= LogLevel::Info || show_basic {
            map.insert("description".into(), Value::from(self.description()));
        }
        if loglevel <= LogLevel::Debug {
            let mut rdata = Map::new();
            rdata.insert("algorithm".into(), Value::from(self.algorithm));
            rdata.insert("key_tag".into(), Value::from(self.key_tag));
            rdata.insert("digest_type".into(), Value::from(self.digest_type));
            rdata.insert("digest".into(), Value::from(BASE64.encode(&self.digest)));
            map.insert("rdata".into(), Value::Object(rdata));

            let mut meta = Map::new();
            meta.insert("ttl".into(), Value::from(self.ds_meta.ttl));
            if !self.dnskey_present {
                meta.insert("dnskey".into(), Value::Null);
            } else if let Some(tag) = self.dnskey_key_tag {
                if tag != self.key_tag {
                    if let Some(pre_revoke) = self.dnskey_key_tag_no_revoke {
                        meta.insert("dnskey_key_tag_pre_revoke".into(), Value::from(pre_revoke));
                    }
                }
            }
            map.insert("meta".into(), Value::Object(meta));
        }
        if loglevel <= LogLevel::Info || show_basic {
            map.insert("status".into(), Value::from(self.validation_status.as_str()));
        }
        if loglevel <= LogLevel::Debug || show_basic {
            map.insert(
                "servers".into(),
                servers_value(&self.ds_meta.servers_clients, consolidate_clients),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServersClients;
    use ferrous_dns_domain::Name;

    struct StubCrypto(Tri);
    impl CryptoVerifier for StubCrypto {
        fn validate_rrsig(&self, _: u8, _: &[u8], _: &[u8], _: &[u8]) -> Tri {
            self.0
        }
        fn validate_ds_digest(&self, _: u8, _: &[u8], _: &[u8]) -> Tri {
            self.0
        }
    }

    fn make_ds(key_tag: u16) -> DsRecord {
        DsRecord {
            key_tag,
            algorithm: 8,
            digest_type: 2,
            digest: vec![1, 2, 3],
        }
    }

    fn make_ds_meta() -> DsMeta {
        DsMeta {
            name: Name::parse("example."),
            ttl: 3600,
            servers_clients: ServersClients::new(),
        }
    }

    fn make_dnskey(key_tag: u16) -> DnskeyRecord {
        DnskeyRecord {
            flags: 257,
            algorithm: 8,
            key: vec![4, 5, 6],
            key_tag,
            key_tag_no_revoke: key_tag,
        }
    }

    #[test]
    fn revoked_key_same_tag_is_invalid_scenario_3() {
        let ds = make_ds(10);
        let meta = make_ds_meta();
        let mut dnskey = make_dnskey(10);
        dnskey.flags |= crate::types::dnskey::FLAG_REVOKE;
        let status = DsStatus::evaluate(&ds, &meta, Some(&dnskey), false, &StubCrypto(Tri::Ok));
        assert_eq!(status.validation_status, DsValidationStatus::Invalid);
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].name(), "DNSKEYRevokedDS");
    }

    #[test]
    fn revoked_key_different_tag_is_pre_revoke_scenario_4() {
        let ds = make_ds(10);
        let meta = make_ds_meta();
        let mut dnskey = make_dnskey(5);
        dnskey.flags |= crate::types::dnskey::FLAG_REVOKE;
        let status = DsStatus::evaluate(&ds, &meta, Some(&dnskey), false, &StubCrypto(Tri::Ok));
        assert_eq!(
            status.validation_status,
            DsValidationStatus::IndeterminateMatchPreRevoke
        );
        assert!(status.errors.is_empty());
    }

    #[test]
    fn bad_digest_is_invalid() {
        let ds = make_ds(10);
        let meta = make_ds_meta();
        let dnskey = make_dnskey(10);
        let status = DsStatus::evaluate(&ds, &meta, Some(&dnskey), false, &StubCrypto(Tri::Bad));
        assert_eq!(status.validation_status, DsValidationStatus::InvalidDigest);
    }

    #[test]
    fn unsupported_digest_algorithm_is_indeterminate() {
        let ds = make_ds(10);
        let meta = make_ds_meta();
        let dnskey = make_dnskey(10);
        let status = DsStatus::evaluate(
            &ds,
            &meta,
            Some(&dnskey),
            false,
            &StubCrypto(Tri::Unsupported),
        );
        assert_eq!(
            status.validation_status,
            DsValidationStatus::IndeterminateUnknownAlgorithm
        );
        assert_eq!(status.warnings.len(), 1);
    }
}
