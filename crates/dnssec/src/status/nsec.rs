//! NSEC evaluator (spec §4.3): authenticated denial of existence using
//! NSEC chains — NXDOMAIN, NODATA, and wildcard-expansion proofs. The
//! three variants are modeled as sibling constructors (spec §9) rather
//! than a subtype hierarchy: the shared covering-name discovery lives in
//! free functions both NXDOMAIN and Wildcard call into.

use super::{servers_value, set_if_valid, Downgradeable, LogLevel};
use crate::errors::{Finding, NsecError};
use crate::types::ServersClients;
use crate::view::{NsecSetView, StaticNsecSetView};
use ferrous_dns_domain::{Name, RecordType};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Shared `validation_status` for every NSEC proof variant (spec §4.3):
/// binary, since none of the three NSEC proofs define an INDETERMINATE
/// outcome the way RRSIG/DS do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsecValidationStatus {
    Valid,
    Invalid,
}

impl Downgradeable for NsecValidationStatus {
    fn valid() -> Self {
        NsecValidationStatus::Valid
    }
}

impl NsecValidationStatus {
    fn as_str(self) -> &'static str {
        match self {
            NsecValidationStatus::Valid => "VALID",
            NsecValidationStatus::Invalid => "INVALID",
        }
    }
}

/// Finds the first (in canonical order) NSEC owner covering `name`, per
/// the view's `covers()`.
fn first_covering(view: &dyn NsecSetView, name: &Name) -> Option<BTreeSet<Name>> {
    let owners = view.covers(name);
    if owners.is_empty() {
        None
    } else {
        Some(owners)
    }
}

/// Climbs from `qname` towards (but not including) `origin`, returning
/// the first ancestor `*.parent` whose wildcard NSEC is covered, along
/// with the covering owners — the shared wildcard-discovery step spec §9
/// describes as free of either sibling constructor.
fn find_covered_wildcard(
    view: &dyn NsecSetView,
    qname: &Name,
    origin: &Name,
) -> Option<(Name, BTreeSet<Name>)> {
    let mut cursor = qname.clone();
    while cursor != *origin {
        let Some(parent) = cursor.parent() else {
            break;
        };
        let wildcard = Name::from_text("*", &parent);
        if let Some(owners) = first_covering(view, &wildcard) {
            return Some((wildcard, owners));
        }
        cursor = parent;
    }
    None
}

/// `NSECStatusNXDOMAIN` — proof that `qname` does not exist (spec §4.3.1).
#[derive(Debug, Clone)]
pub struct NsecStatusNxdomain {
    pub validation_status: NsecValidationStatus,
    pub errors: Vec<NsecError>,
    qname: Name,
    wildcard_name: Name,
    retained_view: StaticNsecSetView,
    servers_clients: ServersClients,
}

impl NsecStatusNxdomain {
    pub fn evaluate(qname: &Name, origin: &Name, view: &dyn NsecSetView) -> NsecStatusNxdomain {
        let mut errors = Vec::new();
        let mut status = NsecValidationStatus::Valid;

        let qname_cover = first_covering(view, qname);
        let (wildcard_name, wildcard_cover) = match find_covered_wildcard(view, qname, origin) {
            Some((name, owners)) => (name, Some(owners)),
            None => (Name::from_text("*", origin), None),
        };
        let origin_cover = first_covering(view, origin);

        if qname_cover.is_none() {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(NsecError::SnameNotCoveredNameError {
                sname: qname.to_canonical_string(),
            });
        }
        if wildcard_cover.is_none() {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(NsecError::WildcardNotCoveredNsec {
                wildcard: wildcard_name.to_canonical_string(),
            });
        }
        if let Some(owners) = &origin_cover {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(last_nsec_next_not_zone(view, owners, origin));
        }

        let retained_view = if status.is_valid() {
            let mut cited = BTreeSet::new();
            if let Some(owners) = &qname_cover {
                cited.extend(owners.iter().cloned());
            }
            if let Some(owners) = &wildcard_cover {
                cited.extend(owners.iter().cloned());
            }
            view.project(&cited)
        } else {
            view.project(&view.owners())
        };

        debug!(qname = %qname, status = status.as_str(), "evaluated NSEC NXDOMAIN proof");

        NsecStatusNxdomain {
            validation_status: status,
            errors,
            qname: qname.clone(),
            wildcard_name,
            retained_view,
            servers_clients: view.servers_clients().clone(),
        }
    }

    fn description(&self) -> String {
        format!(
            "NSEC record(s) proving the non-existence (NXDOMAIN) of {}",
            self.qname
        )
    }

    /// The NSEC records a VALID verdict actually cites (spec §8 property 4).
    pub fn retained_view(&self) -> &StaticNsecSetView {
        &self.retained_view
    }

    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        serialize_nsec_status(
            &self.description(),
            self.validation_status.as_str(),
            &self.errors,
            &self.retained_view,
            &self.servers_clients,
            consolidate_clients,
            loglevel,
        )
    }
}

/// `NSECStatusWildcard` — proof that the answer was produced by wildcard
/// expansion of `wildcard_name` (spec §4.3.2). Shares construction with
/// `NsecStatusNxdomain` only via the free helpers above; the validation
/// rule itself differs.
#[derive(Debug, Clone)]
pub struct NsecStatusWildcard {
    pub validation_status: NsecValidationStatus,
    pub errors: Vec<NsecError>,
    qname: Name,
    wildcard_name: Name,
    retained_view: StaticNsecSetView,
    servers_clients: ServersClients,
}

impl NsecStatusWildcard {
    pub fn evaluate(
        qname: &Name,
        wildcard_name: &Name,
        origin: &Name,
        view: &dyn NsecSetView,
    ) -> NsecStatusWildcard {
        let mut errors = Vec::new();
        let mut status = NsecValidationStatus::Valid;

        let qname_cover = first_covering(view, qname);
        let origin_cover = first_covering(view, origin);

        if qname_cover.is_some() {
            let next_closer = qname.labels_from_end(wildcard_name.label_count());
            let next_closer_cover = first_covering(view, &next_closer);
            if next_closer_cover.is_none() {
                set_if_valid(&mut status, NsecValidationStatus::Invalid);
                errors.push(NsecError::WildcardExpansionInvalid {
                    sname: qname.to_canonical_string(),
                    wildcard: wildcard_name.to_canonical_string(),
                    next_closest_encloser: next_closer.to_canonical_string(),
                });
            }
        } else {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(NsecError::SnameNotCoveredWildcardAnswer {
                sname: qname.to_canonical_string(),
            });
        }

        if let Some(owners) = &origin_cover {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(last_nsec_next_not_zone(view, owners, origin));
        }

        // The retained evidence deliberately mirrors only the qname-cover
        // set, not the next-closer cover used above — the same asymmetry
        // present in the proof this evaluator is ported from.
        let retained_view = if status.is_valid() {
            let cited: BTreeSet<Name> = qname_cover.into_iter().flatten().collect();
            view.project(&cited)
        } else {
            view.project(&view.owners())
        };

        debug!(qname = %qname, status = status.as_str(), "evaluated NSEC wildcard proof");

        NsecStatusWildcard {
            validation_status: status,
            errors,
            qname: qname.clone(),
            wildcard_name: wildcard_name.clone(),
            retained_view,
            servers_clients: view.servers_clients().clone(),
        }
    }

    fn description(&self) -> String {
        format!(
            "NSEC record(s) proving the non-existence (NXDOMAIN) of {}",
            self.qname
        )
    }

    /// The wildcard name actually used for expansion.
    pub fn wildcard_name(&self) -> &Name {
        &self.wildcard_name
    }

    pub fn retained_view(&self) -> &StaticNsecSetView {
        &self.retained_view
    }

    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        serialize_nsec_status(
            &self.description(),
            self.validation_status.as_str(),
            &self.errors,
            &self.retained_view,
            &self.servers_clients,
            consolidate_clients,
            loglevel,
        )
    }
}

/// `NSECStatusNoAnswer` — proof of NODATA (spec §4.3.3).
#[derive(Debug, Clone)]
pub struct NsecStatusNoAnswer {
    pub validation_status: NsecValidationStatus,
    pub errors: Vec<NsecError>,
    qname: Name,
    rdtype: RecordType,
    retained_view: StaticNsecSetView,
    servers_clients: ServersClients,
}

impl NsecStatusNoAnswer {
    pub fn evaluate(
        qname: &Name,
        rdtype: RecordType,
        origin: &Name,
        view: &dyn NsecSetView,
    ) -> NsecStatusNoAnswer {
        let mut errors = Vec::new();
        let mut status = NsecValidationStatus::Valid;
        let referral = view.referral();

        let nsec_for_qname = find_nsec_for_qname(view, qname, rdtype);
        let qname_cover = first_covering(view, qname);
        let (wildcard_name, nsec_for_wildcard) = find_matching_wildcard_ancestor(view, qname, origin, rdtype);
        let origin_cover = first_covering(view, origin);

        let mut retained_owner = None;

        if let Some(found) = &nsec_for_qname {
            retained_owner = Some(found.owner.clone());
            if rdtype == RecordType::DS || referral {
                if !found.has_ns {
                    errors.push(NsecError::ReferralWithoutNsBitNsec {
                        sname: qname.to_canonical_string(),
                    });
                    set_if_valid(&mut status, NsecValidationStatus::Invalid);
                }
                if found.has_ds {
                    errors.push(NsecError::ReferralWithDsBitNsec {
                        sname: qname.to_canonical_string(),
                    });
                    set_if_valid(&mut status, NsecValidationStatus::Invalid);
                }
                if found.has_soa {
                    errors.push(NsecError::ReferralWithSoaBitNsec {
                        sname: qname.to_canonical_string(),
                    });
                    set_if_valid(&mut status, NsecValidationStatus::Invalid);
                }
            } else if found.has_rdtype {
                errors.push(NsecError::StypeInBitmapNoDataNsec {
                    sname: qname.to_canonical_string(),
                    stype: rdtype.to_string(),
                });
                set_if_valid(&mut status, NsecValidationStatus::Invalid);
            }
        } else if let Some((wildcard, wildcard_has_rdtype)) = &nsec_for_wildcard {
            if qname_cover.is_none() {
                set_if_valid(&mut status, NsecValidationStatus::Invalid);
                errors.push(NsecError::SnameNotCoveredWildcardNoData {
                    sname: qname.to_canonical_string(),
                });
            }
            if *wildcard_has_rdtype {
                set_if_valid(&mut status, NsecValidationStatus::Invalid);
                errors.push(NsecError::StypeInBitmapNoDataNsec {
                    sname: wildcard.to_canonical_string(),
                    stype: rdtype.to_string(),
                });
            }
            if let Some(owners) = &origin_cover {
                set_if_valid(&mut status, NsecValidationStatus::Invalid);
                errors.push(last_nsec_next_not_zone(view, owners, origin));
            }
        } else {
            set_if_valid(&mut status, NsecValidationStatus::Invalid);
            errors.push(NsecError::NoNsecMatchingSnameNoData {
                sname: qname.to_canonical_string(),
            });
        }

        let retained_view = if status.is_valid() {
            let mut cited = BTreeSet::new();
            if let Some(owner) = retained_owner {
                cited.insert(owner);
            } else if let Some(owners) = &qname_cover {
                cited.extend(owners.iter().cloned());
            }
            if nsec_for_wildcard.is_some() {
                cited.insert(wildcard_name.clone());
            }
            view.project(&cited)
        } else {
            view.project(&view.owners())
        };

        debug!(qname = %qname, rdtype = %rdtype, status = status.as_str(), "evaluated NSEC no-answer proof");

        NsecStatusNoAnswer {
            validation_status: status,
            errors,
            qname: qname.clone(),
            rdtype,
            retained_view,
            servers_clients: view.servers_clients().clone(),
        }
    }

    fn description(&self) -> String {
        format!(
            "NSEC record(s) proving non-existence (NXRRSET) of {}/{}",
            self.qname, self.rdtype
        )
    }

    pub fn retained_view(&self) -> &StaticNsecSetView {
        &self.retained_view
    }

    pub fn serialize(&self, consolidate_clients: bool, loglevel: LogLevel) -> Map<String, Value> {
        serialize_nsec_status(
            &self.description(),
            self.validation_status.as_str(),
            &self.errors,
            &self.retained_view,
            &self.servers_clients,
            consolidate_clients,
            loglevel,
        )
    }
}

struct NsecForQname {
    owner: Name,
    has_rdtype: bool,
    has_ns: bool,
    has_ds: bool,
    has_soa: bool,
}

/// Prefers a direct NSEC at `qname`; failing that, falls back to an
/// empty-non-terminal ancestor NSEC (spec §4.3.3, §9): an NSEC whose
/// `next` field strictly descends from `qname` proves `qname` carries no
/// RRsets of its own, so every bitmap flag is trivially false.
fn find_nsec_for_qname(view: &dyn NsecSetView, qname: &Name, rdtype: RecordType) -> Option<NsecForQname> {
    if view.owners().contains(qname) {
        return Some(NsecForQname {
            owner: qname.clone(),
            has_rdtype: view.rdtype_exists_in_bitmap(qname, rdtype),
            has_ns: view.rdtype_exists_in_bitmap(qname, RecordType::NS),
            has_ds: view.rdtype_exists_in_bitmap(qname, RecordType::DS),
            has_soa: view.rdtype_exists_in_bitmap(qname, RecordType::SOA),
        });
    }

    // Iterating `view.owners()` (a BTreeSet) gives the stable canonical
    // order spec §9 demands in place of the source's unordered scan.
    let mut candidates = view.owners().into_iter().filter(|owner| {
        view.next_name(owner)
            .map(|next| next.is_subdomain_of(qname) && next != *qname)
            .unwrap_or(false)
    });
    let first = candidates.next()?;
    if candidates.next().is_some() {
        debug!(qname = %qname, "multiple empty-non-terminal NSEC candidates; taking the canonically first");
    }
    Some(NsecForQname {
        owner: first,
        has_rdtype: false,
        has_ns: false,
        has_ds: false,
        has_soa: false,
    })
}

/// Climbs from `qname` to `origin` looking for an NSEC whose owner
/// exactly matches a wildcard ancestor `*.<anc>`. Unlike the
/// covering-wildcard search, this keeps climbing after a match (spec §9
/// preserves the source's behavior of letting the match closest to
/// `origin` win rather than the one closest to `qname`).
fn find_matching_wildcard_ancestor(
    view: &dyn NsecSetView,
    qname: &Name,
    origin: &Name,
    rdtype: RecordType,
) -> (Name, Option<(Name, bool)>) {
    let mut cursor = qname.clone();
    let mut found: Option<(Name, bool)> = None;
    let mut last_wildcard = Name::from_text("*", origin);
    while cursor != *origin {
        let Some(parent) = cursor.parent() else {
            break;
        };
        let wildcard = Name::from_text("*", &parent);
        if view.owners().contains(&wildcard) {
            let has_rdtype = view.rdtype_exists_in_bitmap(&wildcard, rdtype);
            found = Some((wildcard.clone(), has_rdtype));
            last_wildcard = wildcard;
        }
        cursor = parent;
    }
    (last_wildcard, found)
}

fn last_nsec_next_not_zone(view: &dyn NsecSetView, owners: &BTreeSet<Name>, origin: &Name) -> NsecError {
    let owner = owners.iter().next().expect("non-empty covering set");
    let next = view
        .next_name(owner)
        .expect("an NSEC owner always carries a next field");
    NsecError::LastNsecNextNotZone {
        nsec_owner: owner.to_canonical_string(),
        next_name: next.to_canonical_string(),
        zone_name: origin.to_canonical_string(),
    }
}

/// Shared `description`/`nsec`/`status`/`errors` shape every NSEC status
/// variant serializes to (spec §6). NSEC carries no distinct warning
/// taxonomy, so unlike RRSIG/DS there's no `warnings` key to gate.
#[allow(clippy::too_many_arguments)]
fn serialize_nsec_status(
    description: &str,
    status_str: &'static str,
    errors: &[NsecError],
    retained_view: &StaticNsecSetView,
    servers_clients: &ServersClients,
    consolidate_clients: bool,
    loglevel: LogLevel,
) -> Map<String, Value> {
    let mut map = Map::new();
    let show_basic = (!errors.is_empty() && loglevel <= LogLevel::Error) || status_str != "VALID";

    if loglevel <= LogLevel::Info || show_basic {
        map.insert("description".into(), Value::from(description));
    }
    if loglevel <= LogLevel::Debug {
        let nsec: Vec<Value> = retained_view
            .records()
            .map(|r| {
                let mut rec = Map::new();
                rec.insert("owner".into(), Value::from(r.owner.to_canonical_string()));
                rec.insert("next".into(), Value::from(r.next.to_canonical_string()));
                rec.insert(
                    "types".into(),
                    Value::Array(
                        r.type_bitmap
                            .iter()
                            .map(|t| Value::from(t.to_string()))
                            .collect(),
                    ),
                );
                Value::Object(rec)
            })
            .collect();
        if !nsec.is_empty() {
            map.insert("nsec".into(), Value::Array(nsec));
        }
    }
    if loglevel <= LogLevel::Info || show_basic {
        map.insert("status".into(), Value::from(status_str));
    }
    if loglevel <= LogLevel::Debug || show_basic {
        map.insert(
            "servers".into(),
            servers_value(servers_clients, consolidate_clients),
        );
    }
    if !errors.is_empty() && loglevel <= LogLevel::Error {
        map.insert(
            "errors".into(),
            Value::Array(errors.iter().map(|e| Value::Object(e.serialize())).collect()),
        );
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServersClients;

    fn nsec(owner: &str, next: &str, types: &[RecordType]) -> crate::types::NsecRecord {
        crate::types::NsecRecord {
            owner: Name::parse(owner),
            next: Name::parse(next),
            type_bitmap: types.iter().copied().collect(),
        }
    }

    fn view(records: Vec<crate::types::NsecRecord>, referral: bool) -> StaticNsecSetView {
        let mut v = StaticNsecSetView::new(referral, ServersClients::new());
        for r in records {
            v.insert(r);
        }
        v
    }

    #[test]
    fn nxdomain_valid_proof() {
        let origin = Name::parse("example.");
        let qname = Name::parse("nonexist.example.");
        let view = view(
            vec![
                nsec("example.", "mail.example.", &[]),
                nsec("mail.example.", "www.example.", &[]),
            ],
            false,
        );
        let status = NsecStatusNxdomain::evaluate(&qname, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Valid);
        assert!(status.errors.is_empty());
    }

    #[test]
    fn no_answer_stype_in_bitmap_is_invalid() {
        let origin = Name::parse("example.");
        let qname = Name::parse("www.example.");
        let view = view(
            vec![nsec("www.example.", "zzz.example.", &[RecordType::A])],
            false,
        );
        let status = NsecStatusNoAnswer::evaluate(&qname, RecordType::A, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Invalid);
        assert_eq!(status.errors[0].name(), "StypeInBitmapNoDataNSEC");
    }

    #[test]
    fn referral_missing_ns_bit_is_invalid() {
        let origin = Name::parse("example.");
        let qname = Name::parse("child.example.");
        let view = view(
            vec![nsec("child.example.", "zzz.example.", &[])],
            true,
        );
        let status = NsecStatusNoAnswer::evaluate(&qname, RecordType::DS, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Invalid);
        assert_eq!(status.errors[0].name(), "ReferralWithoutNSBitNSEC");
    }

    #[test]
    fn wildcard_expansion_valid_when_next_closer_covered() {
        let origin = Name::parse("example.");
        let qname = Name::parse("a.b.sub.example.");
        let wildcard_name = Name::parse("*.sub.example.");
        let view = view(vec![nsec("a.example.", "z.example.", &[])], false);
        let status = NsecStatusWildcard::evaluate(&qname, &wildcard_name, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Valid);
        assert!(status.errors.is_empty());
    }

    #[test]
    fn empty_non_terminal_nodata_is_valid() {
        let origin = Name::parse("example.");
        let qname = Name::parse("mid.example.");
        let view = view(
            vec![nsec("aaa.example.", "sub.mid.example.", &[])],
            false,
        );
        let status = NsecStatusNoAnswer::evaluate(&qname, RecordType::A, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Valid);
        assert!(status.errors.is_empty());
    }

    #[test]
    fn no_nsec_at_all_is_invalid() {
        let origin = Name::parse("example.");
        let qname = Name::parse("mid.example.");
        let view = view(vec![], false);
        let status = NsecStatusNoAnswer::evaluate(&qname, RecordType::A, &origin, &view);
        assert_eq!(status.validation_status, NsecValidationStatus::Invalid);
        assert_eq!(status.errors[0].name(), "NoNSECMatchingSnameNoData");
    }
}
