use super::{finding_map, Finding};
use serde_json::{Map, Value};

/// Warnings the DS evaluator (spec §4.2) can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DsWarning {
    /// The DS digest type isn't one the crypto collaborator implements.
    DigestAlgorithmNotSupported { algorithm: u8 },
}

impl Finding for DsWarning {
    fn name(&self) -> &'static str {
        match self {
            DsWarning::DigestAlgorithmNotSupported { .. } => "DigestAlgorithmNotSupported",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        match self {
            DsWarning::DigestAlgorithmNotSupported { algorithm } => finding_map(
                self.name(),
                vec![("algorithm".into(), Value::from(*algorithm))],
            ),
        }
    }
}

/// Errors the DS evaluator (spec §4.2) can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DsError {
    /// The child DNSKEY is revoked and its key tag already reflects that
    /// — the DS should never have been left pointing at it.
    DnskeyRevokedDs,
    /// The digest doesn't match the DNSKEY it's supposed to bind to.
    DigestInvalid,
}

impl Finding for DsError {
    fn name(&self) -> &'static str {
        match self {
            DsError::DnskeyRevokedDs => "DNSKEYRevokedDS",
            DsError::DigestInvalid => "DigestInvalid",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        finding_map(self.name(), vec![])
    }
}
