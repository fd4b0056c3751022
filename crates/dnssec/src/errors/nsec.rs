use super::{finding_map, Finding};
use serde_json::{Map, Value};

/// Errors the NSEC evaluators (spec §4.3) can raise. NSEC carries no
/// warnings in the taxonomy — every finding here is disqualifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsecError {
    /// No NSEC in the response covers the query name.
    SnameNotCoveredNameError { sname: String },
    /// No NSEC covers the wildcard that would have to exist for the
    /// denial proof to be complete.
    WildcardNotCoveredNsec { wildcard: String },
    /// An NSEC's `next` field wraps past the zone origin, meaning the
    /// proof reaches outside the zone it's supposed to cover.
    LastNsecNextNotZone {
        nsec_owner: String,
        next_name: String,
        zone_name: String,
    },
    /// The next-closer name below a wildcard expansion isn't covered.
    WildcardExpansionInvalid {
        sname: String,
        wildcard: String,
        next_closest_encloser: String,
    },
    /// No NSEC covers the query name in a wildcard-answer proof.
    SnameNotCoveredWildcardAnswer { sname: String },
    /// A referral NSEC is missing the NS bit it must carry.
    ReferralWithoutNsBitNsec { sname: String },
    /// A referral NSEC carries the DS bit, which would make it an
    /// authoritative (non-referral) answer instead.
    ReferralWithDsBitNsec { sname: String },
    /// A referral NSEC carries the SOA bit, which can't coexist with a
    /// delegation at that owner.
    ReferralWithSoaBitNsec { sname: String },
    /// The queried rdtype is present in the bitmap of an NSEC that's
    /// supposed to prove NODATA for that very rdtype.
    StypeInBitmapNoDataNsec { sname: String, stype: String },
    /// No NSEC covers the query name in a wildcard-NODATA proof.
    SnameNotCoveredWildcardNoData { sname: String },
    /// Neither a matching NSEC, an empty-non-terminal NSEC, nor a
    /// wildcard-ancestor NSEC could be found for a NODATA proof.
    NoNsecMatchingSnameNoData { sname: String },
}

impl Finding for NsecError {
    fn name(&self) -> &'static str {
        match self {
            NsecError::SnameNotCoveredNameError { .. } => "SnameNotCoveredNameError",
            NsecError::WildcardNotCoveredNsec { .. } => "WildcardNotCoveredNSEC",
            NsecError::LastNsecNextNotZone { .. } => "LastNSECNextNotZone",
            NsecError::WildcardExpansionInvalid { .. } => "WildcardExpansionInvalid",
            NsecError::SnameNotCoveredWildcardAnswer { .. } => "SnameNotCoveredWildcardAnswer",
            NsecError::ReferralWithoutNsBitNsec { .. } => "ReferralWithoutNSBitNSEC",
            NsecError::ReferralWithDsBitNsec { .. } => "ReferralWithDSBitNSEC",
            NsecError::ReferralWithSoaBitNsec { .. } => "ReferralWithSOABitNSEC",
            NsecError::StypeInBitmapNoDataNsec { .. } => "StypeInBitmapNoDataNSEC",
            NsecError::SnameNotCoveredWildcardNoData { .. } => "SnameNotCoveredWildcardNoData",
            NsecError::NoNsecMatchingSnameNoData { .. } => "NoNSECMatchingSnameNoData",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        match self {
            NsecError::SnameNotCoveredNameError { sname }
            | NsecError::SnameNotCoveredWildcardAnswer { sname }
            | NsecError::ReferralWithoutNsBitNsec { sname }
            | NsecError::ReferralWithDsBitNsec { sname }
            | NsecError::ReferralWithSoaBitNsec { sname }
            | NsecError::SnameNotCoveredWildcardNoData { sname }
            | NsecError::NoNsecMatchingSnameNoData { sname } => {
                finding_map(self.name(), vec![("sname".into(), Value::from(sname.clone()))])
            }
            NsecError::WildcardNotCoveredNsec { wildcard } => finding_map(
                self.name(),
                vec![("wildcard".into(), Value::from(wildcard.clone()))],
            ),
            NsecError::LastNsecNextNotZone {
                nsec_owner,
                next_name,
                zone_name,
            } => finding_map(
                self.name(),
                vec![
                    ("nsec_owner".into(), Value::from(nsec_owner.clone())),
                    ("next_name".into(), Value::from(next_name.clone())),
                    ("zone_name".into(), Value::from(zone_name.clone())),
                ],
            ),
            NsecError::WildcardExpansionInvalid {
                sname,
                wildcard,
                next_closest_encloser,
            } => finding_map(
                self.name(),
                vec![
                    ("sname".into(), Value::from(sname.clone())),
                    ("wildcard".into(), Value::from(wildcard.clone())),
                    (
                        "next_closest_encloser".into(),
                        Value::from(next_closest_encloser.clone()),
                    ),
                ],
            ),
            NsecError::StypeInBitmapNoDataNsec { sname, stype } => finding_map(
                self.name(),
                vec![
                    ("sname".into(), Value::from(sname.clone())),
                    ("stype".into(), Value::from(stype.clone())),
                ],
            ),
        }
    }
}
