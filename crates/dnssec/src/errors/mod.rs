//! The error/warning taxonomy (spec §7): a closed enumeration of named
//! findings, grouped one module per evaluator family, mirroring the
//! domain crate's `dns_record/{record,category}.rs` one-module-per-concept
//! layout. Findings are data describing a validation outcome, never a
//! thrown or propagated Rust `Error` — that role belongs to
//! `ferrous_dns_domain::DomainError`, reserved for caller-contract
//! violations (spec §7, last paragraph).

pub mod dname;
pub mod ds;
pub mod nsec;
pub mod nsec3;
pub mod rrsig;

use serde_json::{Map, Value};

/// Shared behavior every warning/error enum implements: a stable name for
/// the taxonomy entry and a JSON representation for the §6 serialization
/// contract.
pub trait Finding {
    fn name(&self) -> &'static str;
    fn serialize(&self) -> Map<String, Value>;
}

/// Builds the one-key `{ "name": Value }`-plus-fields map every finding's
/// `serialize()` produces, with `name` always first.
fn finding_map(name: &'static str, fields: Vec<(&'static str, Value)>) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(name.to_string()));
    for (key, value) in fields {
        map.insert(key.to_string(), value);
    }
    map
}

/// Renders a unix-seconds timestamp as RFC 3339, the same human-readable
/// form dnsviz's `fmt.timestamp_to_str` puts on `inception`/`expiration`
/// fields. Falls back to the raw integer for a timestamp chrono can't
/// represent rather than panicking on caller-supplied data.
pub fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

pub use dname::{DnameError, DnameWarning};
pub use ds::{DsError, DsWarning};
pub use nsec::NsecError;
pub use nsec3::Nsec3Error;
pub use rrsig::{RrsigError, RrsigWarning};
