use super::{finding_map, Finding};
use serde_json::{Map, Value};

/// Errors the NSEC3 evaluators (spec §4.4) can raise. Like NSEC, every
/// finding here is disqualifying — NSEC3 carries no warnings distinct
/// from `UnsupportedNSEC3Algorithm`, which is itself an error per spec §7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nsec3Error {
    /// At least one NSEC3 RR in the proof used a hash algorithm this
    /// view can't compute; the proof is evaluated only as far as the
    /// remaining, supported algorithm groups allow.
    UnsupportedNsec3Algorithm { algorithm: u8 },
    /// No ancestor of the query name hashes to an existing NSEC3 owner.
    NoClosestEncloserNameError { sname: String },
    /// No NSEC3 covers the hash of the next-closer name.
    NextClosestEncloserNotCoveredNameError { next_closest_encloser: String },
    /// No NSEC3 covers the hash of the wildcard under the closest
    /// encloser.
    WildcardNotCoveredNsec3 { wildcard: String },
    /// No NSEC3 covers the hash of the next-closer name in a
    /// wildcard-answer proof.
    NextClosestEncloserNotCoveredWildcardAnswer { next_closest_encloser: String },
    /// An NSEC3 covers the wildcard hash itself, which would deny the
    /// very wildcard the answer claims was expanded.
    WildcardCoveredAnswerNsec3 { next_closest_encloser: String },
    /// A referral NSEC3 is missing the NS bit it must carry.
    ReferralWithoutNsBitNsec3 { sname: String },
    /// A referral NSEC3 carries the DS bit.
    ReferralWithDsBitNsec3 { sname: String },
    /// A referral NSEC3 carries the SOA bit.
    ReferralWithSoaBitNsec3 { sname: String },
    /// The queried rdtype (or CNAME) is present in the bitmap of an
    /// NSEC3 that's supposed to prove NODATA.
    StypeInBitmapNoDataNsec3 { sname: String, stype: String },
    /// No NSEC3 covers the hash of the next-closer name in a
    /// wildcard-NODATA proof.
    NextClosestEncloserNotCoveredWildcardNoData { next_closest_encloser: String },
    /// The rdtype queried is present in the wildcard's bitmap, so the
    /// wildcard can't be used to prove NODATA for it.
    StypeInBitmapWildcardNoDataNsec3 { sname: String, stype: String },
    /// No matching or opt-out-covering NSEC3 exists for a NODATA/DS
    /// proof.
    NoNsec3MatchingSnameDsNoData { sname: String },
    /// No matching NSEC3 exists for a NODATA proof.
    NoNsec3MatchingSnameNoData { sname: String },
}

impl Finding for Nsec3Error {
    fn name(&self) -> &'static str {
        match self {
            Nsec3Error::UnsupportedNsec3Algorithm { .. } => "UnsupportedNSEC3Algorithm",
            Nsec3Error::NoClosestEncloserNameError { .. } => "NoClosestEncloserNameError",
            Nsec3Error::NextClosestEncloserNotCoveredNameError { .. } => {
                "NextClosestEncloserNotCoveredNameError"
            }
            Nsec3Error::WildcardNotCoveredNsec3 { .. } => "WildcardNotCoveredNSEC3",
            Nsec3Error::NextClosestEncloserNotCoveredWildcardAnswer { .. } => {
                "NextClosestEncloserNotCoveredWildcardAnswer"
            }
            Nsec3Error::WildcardCoveredAnswerNsec3 { .. } => "WildcardCoveredAnswerNSEC3",
            Nsec3Error::ReferralWithoutNsBitNsec3 { .. } => "ReferralWithoutNSBitNSEC3",
            Nsec3Error::ReferralWithDsBitNsec3 { .. } => "ReferralWithDSBitNSEC3",
            Nsec3Error::ReferralWithSoaBitNsec3 { .. } => "ReferralWithSOABitNSEC3",
            Nsec3Error::StypeInBitmapNoDataNsec3 { .. } => "StypeInBitmapNoDataNSEC3",
            Nsec3Error::NextClosestEncloserNotCoveredWildcardNoData { .. } => {
                "NextClosestEncloserNotCoveredWildcardNoData"
            }
            Nsec3Error::StypeInBitmapWildcardNoDataNsec3 { .. } => {
                "StypeInBitmapWildcardNoDataNSEC3"
            }
            Nsec3Error::NoNsec3MatchingSnameDsNoData { .. } => "NoNSEC3MatchingSnameDSNoData",
            Nsec3Error::NoNsec3MatchingSnameNoData { .. } => "NoNSEC3MatchingSnameNoData",
        }
    }

    fn serialize(&self) -> Map<String, Value> {
        match self {
            Nsec3Error::UnsupportedNsec3Algorithm { algorithm } => finding_map(
                self.name(),
                vec![("algorithm".into(), Value::from(*algorithm))],
            ),
            Nsec3Error::NoClosestEncloserNameError { sname }
            | Nsec3Error::ReferralWithoutNsBitNsec3 { sname }
            | Nsec3Error::ReferralWithDsBitNsec3 { sname }
            | Nsec3Error::ReferralWithSoaBitNsec3 { sname }
            | Nsec3Error::NoNsec3MatchingSnameDsNoData { sname }
            | Nsec3Error::NoNsec3MatchingSnameNoData { sname } => {
                finding_map(self.name(), vec![("sname".into(), Value::from(sname.clone()))])
            }
            Nsec3Error::NextClosestEncloserNotCoveredNameError {
                next_closest_encloser,
            }
            | Nsec3Error::NextClosestEncloserNotCoveredWildcardAnswer {
                next_closest_encloser,
            }
            | Nsec3Error::WildcardCoveredAnswerNsec3 {
                next_closest_encloser,
            }
            | Nsec3Error::NextClosestEncloserNotCoveredWildcardNoData {
                next_closest_encloser,
            } => finding_map(
                self.name(),
                vec![(
                    "next_closest_encloser".into(),
                    Value::from(next_closest_encloser.clone()),
                )],
            ),
            Nsec3Error::WildcardNotCoveredNsec3 { wildcard } => finding_map(
                self.name(),
                vec![("wildcard".into(), Value::from(wildcard.clone()))],
            ),
            Nsec3Error::StypeInBitmapNoDataNsec3 { sname, stype }
            | Nsec3Error::StypeInBitmapWildcardNoDataNsec3 { sname, stype } => finding_map(
                self.name(),
                vec![
                    ("sname".into(), Value::from(sname.clone())),
                    ("stype".into(), Value::from(stype.clone())),
                ],
            ),
        }
    }
}
