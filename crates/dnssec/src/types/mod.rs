pub mod dname;
pub mod dnskey;
pub mod ds;
pub mod nsec;
pub mod nsec3;
pub mod rrsig;

pub use dname::{CnameCarrier, DnameMeta};
pub use dnskey::DnskeyRecord;
pub use ds::{DsMeta, DsRecord, ServersClients};
pub use nsec::NsecRecord;
pub use nsec3::{Nsec3Params, Nsec3Record};
pub use rrsig::{RrsetCarrier, RrsigInfo, RrsigRecord};
