//! Pure DNSSEC proof evaluators: RRSIG, DS, NSEC, NSEC3 and
//! DNAME/CNAME-synthesis validation, with no network I/O, caching or
//! chain-walking of its own — those live in the crate that drives these
//! evaluators from an actual resolution.
pub mod crypto;
pub mod errors;
pub mod status;
pub mod types;
pub mod view;

pub use crypto::{CryptoVerifier, RingCryptoVerifier, Tri};
pub use status::{
    DnameStatus, DsStatus, LogLevel, Nsec3StatusNoAnswer, Nsec3StatusNxdomain, Nsec3StatusWildcard,
    NsecStatusNoAnswer, NsecStatusNxdomain, NsecStatusWildcard, RrsigStatus,
};
pub use view::{Nsec3SetView, NsecSetView, StaticNsec3SetView, StaticNsecSetView};
