//! Status objects (spec §3, §9): one tagged type per evaluator, each
//! produced by running its evaluator's full rule set exactly once and
//! then never mutated again. Shared plumbing lives here; the evaluators
//! themselves are one file per family, matching `errors/`.

pub mod dname;
pub mod ds;
pub mod nsec;
pub mod nsec3;
pub mod rrsig;

pub use dname::DnameStatus;
pub use ds::DsStatus;
pub use nsec::{NsecStatusNoAnswer, NsecStatusNxdomain, NsecStatusWildcard};
pub use nsec3::{Nsec3StatusNoAnswer, Nsec3StatusNxdomain, Nsec3StatusWildcard};
pub use rrsig::RrsigStatus;

use crate::types::ServersClients;
use serde_json::{Map, Value};

/// Builds the `servers` evidence value every status's `serialize()` emits
/// (spec §6): consolidated to a flat, canonically sorted server-name list
/// when `consolidate_clients` holds, or a server -> sorted-client-list map
/// otherwise, so a caller can still see which client observed which server.
pub fn servers_value(servers_clients: &ServersClients, consolidate_clients: bool) -> Value {
    if consolidate_clients {
        Value::Array(
            servers_clients
                .consolidated_servers()
                .into_iter()
                .map(Value::from)
                .collect(),
        )
    } else {
        let mut obj = Map::new();
        for (server, clients) in servers_clients.grouped_by_server() {
            obj.insert(
                server,
                Value::Array(clients.into_iter().map(Value::from).collect()),
            );
        }
        Value::Object(obj)
    }
}

/// Log levels in the same relative order as Python's `logging` module
/// (`DEBUG < INFO < WARNING < ERROR`), which the serialization contract
/// (spec §6) is built against: `serialize(consolidate_clients, loglevel)`
/// reveals more detail the lower the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// The "downgrade only while VALID" idiom (spec §9): a status enum whose
/// initial value is always its VALID variant can only ever move away from
/// it, never back. Implemented as a trait so every status kind gets the
/// same one-line guard instead of repeating `if status == Valid { ... }`
/// at every branch.
pub trait Downgradeable: Copy + PartialEq {
    fn valid() -> Self;

    fn is_valid(self) -> bool {
        self == Self::valid()
    }
}

/// Only overwrites `*status` with `new` while `*status` is still VALID —
/// the core precedence rule behind every evaluator in spec §4.
pub fn set_if_valid<T: Downgradeable>(status: &mut T, new: T) {
    if status.is_valid() {
        *status = new;
    }
}
