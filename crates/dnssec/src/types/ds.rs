use ferrous_dns_domain::Name;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A DS (Delegation Signer) record, as held by the parent zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

/// Carries the RRset a DS record belongs to, opaque to the evaluator beyond
/// what it needs for serialization (§3: "ds_meta carries the enclosing
/// RRset and its servers_clients").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsMeta {
    pub name: Name,
    pub ttl: u32,
    pub servers_clients: ServersClients,
}

/// Opaque (server, client) -> response-id mapping, carried through to
/// serialization without interpretation by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServersClients(pub BTreeMap<(String, String), BTreeSet<u64>>);

impl ServersClients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, server: impl Into<String>, client: impl Into<String>, response_id: u64) {
        self.0
            .entry((server.into(), client.into()))
            .or_default()
            .insert(response_id);
    }

    /// Flattened, canonically sorted server list, for `consolidate_clients`
    /// (spec §6: "server lists are flattened and sorted by canonical byte
    /// order").
    pub fn consolidated_servers(&self) -> Vec<String> {
        let mut servers: BTreeSet<String> = BTreeSet::new();
        for (server, _client) in self.0.keys() {
            servers.insert(server.clone());
        }
        servers.into_iter().collect()
    }

    /// Server -> sorted client list, for the non-consolidated serialization
    /// path (spec §6): the opposite of `consolidated_servers`, which only
    /// keeps the server names and drops which client observed which.
    pub fn grouped_by_server(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (server, client) in self.0.keys() {
            grouped.entry(server.clone()).or_default().insert(client.clone());
        }
        grouped
    }
}
