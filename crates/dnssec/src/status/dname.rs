//! DNAME/CNAME-synthesis evaluator (spec §4.5): checks that a CNAME present
//! in a response matches the one the resolver would have synthesized from
//! a covering DNAME (RFC 6672 §2.2).

use super::{servers_value, set_if_valid, Downgradeable, LogLevel};
use crate::errors::{DnameError, DnameWarning, Finding};
use crate::types::{CnameCarrier, DnameMeta};
use serde_json::{Map, Value};
use tracing::debug;

/// `DNAMEStatus.validation_status` (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnameValidationStatus {
    Valid,
    InvalidTarget,
    Invalid,
}

impl Downgradeable for DnameValidationStatus {
    fn valid() -> Self {
        DnameValidationStatus::Valid
    }
}

impl DnameValidationStatus {
    fn as_str(self) -> &'static str {
        match self {
            DnameValidationStatus::Valid => "VALID",
            DnameValidationStatus::InvalidTarget => "INVALID_TARGET",
            DnameValidationStatus::Invalid => "INVALID",
        }
    }
}

/// The outcome of checking a synthesized CNAME against the one a server
/// actually included alongside its covering DNAME (spec §4.5).
#[derive(Debug, Clone)]
pub struct DnameStatus {
    pub validation_status: DnameValidationStatus,
    pub warnings: Vec<DnameWarning>,
    pub errors: Vec<DnameError>,
    dname: DnameMeta,
    synthesized_target: CnameCarrier,
    included_cname: Option<CnameCarrier>,
}

impl DnameStatus {
    pub fn evaluate(
        dname: &DnameMeta,
        synthesized_target: &CnameCarrier,
        included_cname: Option<&CnameCarrier>,
    ) -> DnameStatus {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut status = DnameValidationStatus::Valid;

        match included_cname {
            None => {
                set_if_valid(&mut status, DnameValidationStatus::Invalid);
                errors.push(DnameError::DnameNoCname);
            }
            Some(included) => {
                if included.target != synthesized_target.target {
                    set_if_valid(&mut status, DnameValidationStatus::InvalidTarget);
                    errors.push(DnameError::DnameTargetMismatch);
                }
                if included.ttl != synthesized_target.ttl {
                    if included.ttl == 0 {
                        warnings.push(DnameWarning::DnameTtlZero);
                    } else {
                        warnings.push(DnameWarning::DnameTtlMismatch);
                    }
                }
            }
        }

        debug!(
            owner = %synthesized_target.owner,
            dname = %dname.owner,
            status = status.as_str(),
            "evaluated DNAME/CNAME synthesis"
        );

        DnameStatus {
            validation_status: status,
            warnings,
            errors,
            dname: dname.clone(),
            synthesized_target: synthesized_target.clone(),
            included_cname: included_cname.cloned(),
        }
    }

    fn description(&self) -> String {
        format!(
            "CNAME synthesis for {} from {}/DNAME",
            self.synthesized_target.owner, self.dname.owner
        )
    }

    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        let mut map = Map::new();
        let show_basic = (!self.warnings.is_empty() && loglevel <= LogLevel::Warning)
            || (!self.errors.is_empty() && loglevel <= LogLevel::Error)
            || self.validation_status != DnameValidationStatus::Valid;

        if loglevel <= LogLevel::Info || show_basic {
            map.insert("description".into(), Value::from(self.description()));
        }
        if loglevel <= LogLevel::Debug {
            let mut dname = Map::new();
            dname.insert("owner".into(), Value::from(self.dname.owner.to_canonical_string()));
            dname.insert("target".into(), Value::from(self.dname.target.to_canonical_string()));
            dname.insert("ttl".into(), Value::from(self.dname.ttl));
            map.insert("dname".into(), Value::Object(dname));

            let mut meta = Map::new();
            if let Some(included) = &self.included_cname {
                meta.insert("cname_owner".into(), Value::from(included.owner.to_canonical_string()));
                meta.insert("cname_target".into(), Value::from(included.target.to_canonical_string()));
            }
            map.insert("meta".into(), Value::Object(meta));
        }
        if loglevel <= LogLevel::Info || self.validation_status != DnameValidationStatus::Valid {
            map.insert("status".into(), Value::from(self.validation_status.as_str()));
        }
        if loglevel <= LogLevel::Debug || show_basic {
            map.insert(
                "servers".into(),
                servers_value(&self.dname.servers_clients, consolidate_clients),
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

    fn make_dname() -> DnameMeta {
        DnameMeta {
            owner: Name::parse("d.example."),
            target: Name::parse("e.example."),
            ttl: 3600,
            servers_clients: ServersClients::new(),
        }
    }

    fn make_synthesized(target: &str) -> CnameCarrier {
        CnameCarrier {
            owner: Name::parse("a.d.example."),
            target: Name::parse(target),
            ttl: 3600,
        }
    }

    #[test]
    fn missing_cname_is_invalid() {
        let dname = make_dname();
        let synthesized = make_synthesized("a.e.example.");
        let status = DnameStatus::evaluate(&dname, &synthesized, None);
        assert_eq!(status.validation_status, DnameValidationStatus::Invalid);
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].name(), "DNAMENoCNAME");
    }

    #[test]
    fn matching_target_and_ttl_is_valid() {
        let dname = make_dname();
        let synthesized = make_synthesized("a.e.example.");
        let included = CnameCarrier {
            owner: Name::parse("a.d.example."),
            target: Name::parse("a.e.example."),
            ttl: 3600,
        };
        let status = DnameStatus::evaluate(&dname, &synthesized, Some(&included));
        assert_eq!(status.validation_status, DnameValidationStatus::Valid);
        assert!(status.warnings.is_empty());
        assert!(status.errors.is_empty());
    }

    #[test]
    fn target_mismatch_is_invalid_target_scenario_8() {
        let dname = make_dname();
        let synthesized = make_synthesized("a.b.");
        let included = CnameCarrier {
            owner: Name::parse("a.d.example."),
            target: Name::parse("a.c."),
            ttl: 3600,
        };
        let status = DnameStatus::evaluate(&dname, &synthesized, Some(&included));
        assert_eq!(status.validation_status, DnameValidationStatus::InvalidTarget);
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].name(), "DNAMETargetMismatch");
        assert!(status.warnings.is_empty());
    }

    #[test]
    fn zero_ttl_warns_without_status_change() {
        let dname = make_dname();
        let synthesized = make_synthesized("a.e.example.");
        let included = CnameCarrier {
            owner: Name::parse("a.d.example."),
            target: Name::parse("a.e.example."),
            ttl: 0,
        };
        let status = DnameStatus::evaluate(&dname, &synthesized, Some(&included));
        assert_eq!(status.validation_status, DnameValidationStatus::Valid);
        assert_eq!(status.warnings.len(), 1);
        assert_eq!(status.warnings[0].name(), "DNAMETTLZero");
    }

    #[test]
    fn nonzero_ttl_mismatch_warns_generic() {
        let dname = make_dname();
        let synthesized = make_synthesized("a.e.example.");
        let included = CnameCarrier {
            owner: Name::parse("a.d.example."),
            target: Name::parse("a.e.example."),
            ttl: 7200,
        };
        let status = DnameStatus::evaluate(&dname, &synthesized, Some(&included));
        assert_eq!(status.validation_status, DnameValidationStatus::Valid);
        assert_eq!(status.warnings.len(), 1);
        assert_eq!(status.warnings[0].name(), "DNAMETTLMismatch");
    }
}
