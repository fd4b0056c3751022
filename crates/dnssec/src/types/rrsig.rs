use super::ds::ServersClients;
use ferrous_dns_domain::{Name, RecordType};
use std::collections::BTreeMap;

/// An RRSIG record covering one RRset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigRecord {
    pub type_covered: RecordType,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub inception: i64,
    pub expiration: i64,
    pub key_tag: u16,
    pub signer: Name,
    pub signature: Vec<u8>,
}

/// Per-signature metadata that sits alongside the signature itself in an
/// RRset carrier's `rrsig_info` map (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigInfo {
    pub ttl: u32,
    pub servers_clients: ServersClients,
}

/// The RRset a signature covers, read-only to the evaluators (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsetCarrier {
    pub name: Name,
    pub rdtype: RecordType,
    pub ttl: u32,
    pub records: Vec<Vec<u8>>,
    pub rrsig_info: BTreeMap<RrsigRecord, RrsigInfo>,
    pub servers_clients: ServersClients,
}

// RrsigRecord needs Ord to key a BTreeMap; signature bytes make a stable,
// if arbitrary, tiebreaker so iteration order is deterministic (§5).
impl PartialOrd for RrsigRecord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RrsigRecord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.key_tag, &self.signer, &self.signature).cmp(&(
            other.key_tag,
            &other.signer,
            &other.signature,
        ))
    }
}
