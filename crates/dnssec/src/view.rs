//! The NSEC/NSEC3 set view collaborators (§2, §6): a read-only, indexed
//! look into the NSEC or NSEC3 RRsets gathered for one denial-of-existence
//! proof. The evaluators only ever call through these traits; the
//! donor's `DnssecCache` inspired the storage shape (a flat map keyed by
//! owner) but not its concurrency or TTL machinery, both irrelevant to a
//! pure, single-evaluation view.

use crate::types::{Nsec3Params, Nsec3Record, NsecRecord, ServersClients};
use ferrous_dns_domain::{Name, RecordType};
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, BTreeSet};

/// Read-only view over a set of NSEC RRsets relevant to one proof (§6).
pub trait NsecSetView {
    /// Owners of NSEC records that cover `name`.
    fn covers(&self, name: &Name) -> BTreeSet<Name>;

    fn rdtype_exists_in_bitmap(&self, owner: &Name, rdtype: RecordType) -> bool;

    /// `next` field of the NSEC owned by `owner`, if present.
    fn next_name(&self, owner: &Name) -> Option<Name>;

    /// True when this view was collected in service of a referral answer.
    fn referral(&self) -> bool;

    fn servers_clients(&self) -> &ServersClients;

    /// All owners currently held by this view, for evidence-completeness
    /// checks (§8 property 5).
    fn owners(&self) -> BTreeSet<Name>;

    /// Structural copy restricted to the given owners (§3, §9): the core
    /// uses this to pin the minimum evidence a VALID verdict cites.
    fn project(&self, owners: &BTreeSet<Name>) -> StaticNsecSetView;
}

/// Read-only view over a set of NSEC3 RRsets relevant to one proof (§6).
pub trait Nsec3SetView {
    /// Owner hashes of NSEC3 records in `params` that cover `hash`.
    fn covering(&self, hash: &str, params: &Nsec3Params) -> BTreeSet<String>;

    fn rdtype_exists_in_bitmap(&self, owner_hash: &str, rdtype: RecordType) -> bool;

    /// True when the NSEC3 owned by `owner_hash` carries the opt-out flag
    /// (RFC 5155 §3, bit 0 of the flags octet).
    fn opt_out(&self, owner_hash: &str) -> bool;

    /// Hashes `name` under `origin` using `params`. `None` when the
    /// declared NSEC3 hash algorithm isn't one this view can compute
    /// (only algorithm 1, SHA-1, is defined by RFC 5155).
    fn get_digest_name_for_nsec3(&self, name: &Name, origin: &Name, params: &Nsec3Params) -> Option<String>;

    /// Candidate closest enclosers of `qname` under `origin`: ancestor
    /// name -> owner hashes of NSEC3 records whose owner equals that
    /// ancestor's hash, for every parameter group in this view.
    fn get_closest_encloser(&self, qname: &Name, origin: &Name) -> BTreeMap<Name, BTreeSet<String>>;

    /// `(valid_algorithms, invalid_algorithms)` declared across this
    /// view's parameter groups (§4.4.2).
    fn get_algorithm_support(&self) -> (BTreeSet<u8>, BTreeSet<u8>);

    fn nsec3_params(&self) -> BTreeMap<Nsec3Params, BTreeSet<String>>;

    /// `next_hash` field of the NSEC3 owned by `owner_hash`.
    fn name_for_nsec3_next(&self, owner_hash: &str) -> Option<String>;

    fn referral(&self) -> bool;

    fn servers_clients(&self) -> &ServersClients;

    fn owners(&self) -> BTreeSet<String>;

    fn project(&self, owner_hashes: &BTreeSet<String>) -> StaticNsec3SetView;
}

/// Reference, in-memory `NsecSetView`. Good enough both for tests and for
/// callers who have already materialized their NSEC RRsets into memory —
/// which, since the evaluator does no I/O, is every caller.
#[derive(Debug, Clone, Default)]
pub struct StaticNsecSetView {
    records: BTreeMap<Name, NsecRecord>,
    referral: bool,
    servers_clients: ServersClients,
}

impl StaticNsecSetView {
    pub fn new(referral: bool, servers_clients: ServersClients) -> Self {
        Self {
            records: BTreeMap::new(),
            referral,
            servers_clients,
        }
    }

    pub fn insert(&mut self, record: NsecRecord) {
        self.records.insert(record.owner.clone(), record);
    }

    /// The records this view carries, in canonical owner order — used to
    /// build the `nsec` evidence block at DEBUG (spec §6).
    pub fn records(&self) -> impl Iterator<Item = &NsecRecord> {
        self.records.values()
    }
}

impl NsecSetView for StaticNsecSetView {
    fn covers(&self, name: &Name) -> BTreeSet<Name> {
        self.records
            .values()
            .filter(|r| r.covers(name))
            .map(|r| r.owner.clone())
            .collect()
    }

    fn rdtype_exists_in_bitmap(&self, owner: &Name, rdtype: RecordType) -> bool {
        self.records
            .get(owner)
            .map(|r| r.type_present(rdtype))
            .unwrap_or(false)
    }

    fn next_name(&self, owner: &Name) -> Option<Name> {
        self.records.get(owner).map(|r| r.next.clone())
    }

    fn referral(&self) -> bool {
        self.referral
    }

    fn servers_clients(&self) -> &ServersClients {
        &self.servers_clients
    }

    fn owners(&self) -> BTreeSet<Name> {
        self.records.keys().cloned().collect()
    }

    fn project(&self, owners: &BTreeSet<Name>) -> StaticNsecSetView {
        StaticNsecSetView {
            records: self
                .records
                .iter()
                .filter(|(owner, _)| owners.contains(*owner))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            referral: self.referral,
            servers_clients: self.servers_clients.clone(),
        }
    }
}

/// Reference, in-memory `Nsec3SetView`.
#[derive(Debug, Clone, Default)]
pub struct StaticNsec3SetView {
    records: BTreeMap<String, Nsec3Record>,
    valid_algs: BTreeSet<u8>,
    invalid_algs: BTreeSet<u8>,
    referral: bool,
    servers_clients: ServersClients,
}

impl StaticNsec3SetView {
    pub fn new(
        valid_algs: BTreeSet<u8>,
        invalid_algs: BTreeSet<u8>,
        referral: bool,
        servers_clients: ServersClients,
    ) -> Self {
        Self {
            records: BTreeMap::new(),
            valid_algs,
            invalid_algs,
            referral,
            servers_clients,
        }
    }

    pub fn insert(&mut self, record: Nsec3Record) {
        self.records.insert(record.owner_hash.clone(), record);
    }

    /// The records this view carries, in canonical owner-hash order —
    /// used to build the `nsec3` evidence block at DEBUG (spec §6).
    pub fn records(&self) -> impl Iterator<Item = &Nsec3Record> {
        self.records.values()
    }
}

impl Nsec3SetView for StaticNsec3SetView {
    fn covering(&self, hash: &str, params: &Nsec3Params) -> BTreeSet<String> {
        self.records
            .values()
            .filter(|r| &r.params == params && r.covers_hash(hash))
            .map(|r| r.owner_hash.clone())
            .collect()
    }

    fn rdtype_exists_in_bitmap(&self, owner_hash: &str, rdtype: RecordType) -> bool {
        self.records
            .get(owner_hash)
            .map(|r| r.type_present(rdtype))
            .unwrap_or(false)
    }

    fn opt_out(&self, owner_hash: &str) -> bool {
        self.records
            .get(owner_hash)
            .map(|r| r.opt_out())
            .unwrap_or(false)
    }

    fn get_digest_name_for_nsec3(&self, name: &Name, origin: &Name, params: &Nsec3Params) -> Option<String> {
        hash_nsec3(name, origin, params)
    }

    fn get_closest_encloser(&self, qname: &Name, origin: &Name) -> BTreeMap<Name, BTreeSet<String>> {
        let mut out = BTreeMap::new();
        let mut candidate = qname.clone();
        while let Some(parent) = candidate.parent() {
            if !parent.is_subdomain_of(origin) && parent != *origin {
                break;
            }
            for params in self.nsec3_params().keys() {
                if let Some(hash) = hash_nsec3(&parent, origin, params) {
                    if let Some(record) = self.records.get(&hash) {
                        out.entry(parent.clone())
                            .or_insert_with(BTreeSet::new)
                            .insert(record.owner_hash.clone());
                    }
                }
            }
            if parent == *origin {
                break;
            }
            candidate = parent;
        }
        out
    }

    fn get_algorithm_support(&self) -> (BTreeSet<u8>, BTreeSet<u8>) {
        (self.valid_algs.clone(), self.invalid_algs.clone())
    }

    fn nsec3_params(&self) -> BTreeMap<Nsec3Params, BTreeSet<String>> {
        let mut out: BTreeMap<Nsec3Params, BTreeSet<String>> = BTreeMap::new();
        for record in self.records.values() {
            out.entry(record.params.clone())
                .or_default()
                .insert(record.owner_hash.clone());
        }
        out
    }

    fn name_for_nsec3_next(&self, owner_hash: &str) -> Option<String> {
        self.records.get(owner_hash).map(|r| r.next_hash.clone())
    }

    fn referral(&self) -> bool {
        self.referral
    }

    fn servers_clients(&self) -> &ServersClients {
        &self.servers_clients
    }

    fn owners(&self) -> BTreeSet<String> {
        self.records.keys().cloned().collect()
    }

    fn project(&self, owner_hashes: &BTreeSet<String>) -> StaticNsec3SetView {
        StaticNsec3SetView {
            records: self
                .records
                .iter()
                .filter(|(owner, _)| owner_hashes.contains(*owner))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            valid_algs: self.valid_algs.clone(),
            invalid_algs: self.invalid_algs.clone(),
            referral: self.referral,
            servers_clients: self.servers_clients.clone(),
        }
    }
}

/// RFC 5155 §5: iterated SHA-1 hash of `name` relative to `origin`,
/// base32hex-encoded with no padding. Only hash algorithm 1 (SHA-1) is
/// defined by the RFC; anything else comes back `None` (unsupported).
fn hash_nsec3(name: &Name, origin: &Name, params: &Nsec3Params) -> Option<String> {
    if params.algorithm != 1 {
        return None;
    }
    if !name.is_subdomain_of(origin) && name != origin {
        return None;
    }

    let mut wire = super::crypto::name_to_wire(&name.to_canonical_string());
    wire.extend_from_slice(&params.salt);
    let mut digest = Sha1::digest(&wire).to_vec();

    for _ in 0..params.iterations {
        let mut next_input = digest.clone();
        next_input.extend_from_slice(&params.salt);
        digest = Sha1::digest(&next_input).to_vec();
    }

    Some(base32hex_encode(&digest))
}

/// RFC 4648 §7 "base32hex" encoding (alphabet `0123456789ABCDEFGHIJKLMNOPQRSTUV`,
/// no padding), the alphabet RFC 5155 mandates for NSEC3 owner labels.
/// Hand-rolled rather than pulled from a dependency: it is a dozen lines
/// of bit-shuffling in the same vein as `crypto::name_to_wire`, and no
/// crate in reach implements this exact alphabet.
fn base32hex_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits_in_buffer = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = (buffer >> bits_in_buffer) & 0x1F;
            out.push(ALPHABET[index as usize] as char);
        }
    }
    if bits_in_buffer > 0 {
        let index = (buffer << (5 - bits_in_buffer)) & 0x1F;
        out.push(ALPHABET[index as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_algorithm_yields_none() {
        let params = Nsec3Params {
            algorithm: 7,
            iterations: 0,
            salt: vec![],
        };
        assert!(hash_nsec3(&Name::parse("example.com"), &Name::parse("com"), &params).is_none());
    }

    #[test]
    fn hash_is_deterministic() {
        let params = Nsec3Params {
            algorithm: 1,
            iterations: 1,
            salt: vec![0xAA, 0xBB],
        };
        let origin = Name::parse("example.");
        let name = Name::parse("www.example.");
        let a = hash_nsec3(&name, &origin, &params);
        let b = hash_nsec3(&name, &origin, &params);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn static_view_project_is_structurally_independent() {
        let mut view = StaticNsecSetView::new(false, ServersClients::new());
        view.insert(NsecRecord {
            owner: Name::parse("a.example."),
            next: Name::parse("z.example."),
            type_bitmap: Default::default(),
        });
        let projected = view.project(&view.owners());
        assert_eq!(projected.owners(), view.owners());
    }
}
