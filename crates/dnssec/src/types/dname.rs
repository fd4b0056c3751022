use super::ServersClients;
use ferrous_dns_domain::Name;

/// The DNAME RRset a synthesized CNAME is traced back to, carried through
/// to serialization as the `dname` evidence block (spec §4.5, §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnameMeta {
    pub owner: Name,
    pub target: Name,
    pub ttl: u32,
    pub servers_clients: ServersClients,
}

/// A CNAME record as it actually appeared in a response — either the one
/// the resolver synthesized from the DNAME, or the one the server
/// included alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnameCarrier {
    pub owner: Name,
    pub target: Name,
    pub ttl: u32,
}
