use ferrous_dns_domain::{Name, RecordType};
use std::collections::BTreeSet;

/// An NSEC record: authenticated denial of existence between `owner` and
/// `next`, with a bitmap of the rdtypes present at `owner`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NsecRecord {
    pub owner: Name,
    pub next: Name,
    pub type_bitmap: BTreeSet<RecordType>,
}

impl NsecRecord {
    pub fn covers(&self, name: &Name) -> bool {
        if self.owner < self.next {
            self.owner < *name && *name < self.next
        } else {
            // Wraps across the end of the zone (owner is the last NSEC).
            *name > self.owner || *name < self.next
        }
    }

    pub fn type_present(&self, rdtype: RecordType) -> bool {
        self.type_bitmap.contains(&rdtype)
    }
}
