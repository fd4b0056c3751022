use super::{finding_map, Finding};
use serde_json::{Map, Value};

/// Warnings the DNAME/CNAME-synthesis evaluator (spec §4.5) can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnameWarning {
    /// The included CNAME's TTL is zero where the synthesized one is not.
    DnameTtlZero,
    /// The included CNAME's TTL otherwise disagrees with the synthesized
    /// one's.
    DnameTtlMismatch,
}

impl Finding for DnameWarning {
    fn name(&self) -> &'static str {
        match self {
            DnameWarning::DnameTtlZero => "DNAMETTLZero",
            DnameWarning::DnameTtlMismatch => "DNAMETTLMismatch",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        finding_map(self.name(), vec![])
    }
}

/// Errors the DNAME/CNAME-synthesis evaluator (spec §4.5) can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnameError {
    /// The response included a DNAME but no corresponding CNAME.
    DnameNoCname,
    /// The included CNAME's target doesn't match the name a resolver
    /// would have synthesized from the DNAME.
    DnameTargetMismatch,
}

impl Finding for DnameError {
    fn name(&self) -> &'static str {
        match self {
            DnameError::DnameNoCname => "DNAMENoCNAME",
            DnameError::DnameTargetMismatch => "DNAMETargetMismatch",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        finding_map(self.name(), vec![])
    }
}
