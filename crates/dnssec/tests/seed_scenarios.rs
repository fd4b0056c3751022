//! The concrete seed scenarios spec §8 enumerates, exercised end to end
//! through each evaluator's public `evaluate()` entry point rather than
//! through an in-crate test module — this file stands in for the
//! cross-module acceptance suite the donor keeps under its own
//! `crates/infrastructure/tests/` directory.

use ferrous_dns_dnssec::errors::Finding;
use ferrous_dns_dnssec::status::dname::DnameValidationStatus;
use ferrous_dns_dnssec::status::ds::DsValidationStatus;
use ferrous_dns_dnssec::status::nsec::NsecValidationStatus;
use ferrous_dns_dnssec::status::nsec3::Nsec3ValidationStatus;
use ferrous_dns_dnssec::status::rrsig::RrsigValidationStatus;
use ferrous_dns_dnssec::{
    CryptoVerifier, DnameStatus, DsStatus, NsecStatusNxdomain, RrsigStatus, StaticNsec3SetView,
    StaticNsecSetView, Tri,
};
use ferrous_dns_dnssec::{Nsec3SetView, NsecSetView};

use ferrous_dns_domain::{Name, RecordType};
use std::collections::BTreeSet;

struct StubCrypto(Tri);

impl CryptoVerifier for StubCrypto {
    fn validate_rrsig(&self, _: u8, _: &[u8], _: &[u8], _: &[u8]) -> Tri {
        self.0
    }
    fn validate_ds_digest(&self, _: u8, _: &[u8], _: &[u8]) -> Tri {
        self.0
    }
}

mod support {
    use ferrous_dns_dnssec::types::{
        DnskeyRecord, RrsetCarrier, RrsigInfo, RrsigRecord, ServersClients,
    };
    use ferrous_dns_domain::{Name, RecordType};
    use std::collections::BTreeMap;

    pub fn rrset(name: &str, ttl: u32, rrsig: &RrsigRecord, rrsig_ttl: u32) -> RrsetCarrier {
        let mut rrsig_info = BTreeMap::new();
        rrsig_info.insert(
            rrsig.clone(),
            RrsigInfo {
                ttl: rrsig_ttl,
                servers_clients: ServersClients::new(),
            },
        );
        RrsetCarrier {
            name: Name::parse(name),
            rdtype: RecordType::A,
            ttl,
            records: vec![vec![1, 2, 3, 4]],
            rrsig_info,
            servers_clients: ServersClients::new(),
        }
    }

    pub fn rrsig(signer: &str, inception: i64, expiration: i64, key_tag: u16) -> RrsigRecord {
        RrsigRecord {
            type_covered: RecordType::A,
            algorithm: 8,
            labels: 2,
            original_ttl: 3600,
            inception,
            expiration,
            key_tag,
            signer: Name::parse(signer),
            signature: vec![9, 9, 9],
        }
    }

    pub fn dnskey(key_tag: u16) -> DnskeyRecord {
        DnskeyRecord {
            flags: 256,
            algorithm: 8,
            key: vec![1, 2, 3],
            key_tag,
            key_tag_no_revoke: key_tag,
        }
    }
}

/// Scenario 1 (spec §8): a signature squarely inside its validity window,
/// signed by the zone itself, verifying cleanly. Expect VALID, no
/// warnings, no errors.
#[test]
fn scenario_1_rrsig_in_window_valid() {
    let t = 1_000_000i64;
    let rrsig = support::rrsig("example.", t - 60, t + 86_400, 10);
    let rrset = support::rrset("www.example.", 3600, &rrsig, 3600);
    let dnskey = support::dnskey(10);

    let status = RrsigStatus::evaluate(
        &rrset,
        &rrsig,
        Some(&dnskey),
        Some(&Name::parse("example.")),
        t,
        false,
        &StubCrypto(Tri::Ok),
    );

    assert_eq!(status.validation_status, RrsigValidationStatus::Valid);
    assert!(status.warnings.is_empty());
    assert!(status.errors.is_empty());
}

/// Scenario 2 (spec §8): the signer doesn't match the zone AND the
/// signature has expired. Expect INVALID with both errors present — the
/// signer check takes precedence but doesn't suppress the window check.
#[test]
fn scenario_2_rrsig_expired_and_signer_wrong() {
    let t = 1_000_000i64;
    let rrsig = support::rrsig("wrong-zone.", t - 60, t - 1, 10);
    let rrset = support::rrset("www.example.", 3600, &rrsig, 3600);
    let dnskey = support::dnskey(10);

    let status = RrsigStatus::evaluate(
        &rrset,
        &rrsig,
        Some(&dnskey),
        Some(&Name::parse("example.")),
        t,
        false,
        &StubCrypto(Tri::Ok),
    );

    assert_eq!(status.validation_status, RrsigValidationStatus::Invalid);
    let names: BTreeSet<_> = status.errors.iter().map(|e| e.name()).collect();
    assert!(names.contains("SignerNotZone"));
    assert!(names.contains("ExpirationInPast"));
}

/// Scenario 3 (spec §8): the signing DNSKEY is revoked and its key tag
/// already reflects that — the DS should never have pointed at it.
/// Expect INVALID, errors=[DNSKEYRevokedDS].
#[test]
fn scenario_3_ds_revoked_key_tag_unchanged() {
    use ferrous_dns_dnssec::types::{DsMeta, DsRecord, ServersClients};

    let ds = DsRecord {
        key_tag: 10,
        algorithm: 8,
        digest_type: 2,
        digest: vec![1, 2, 3],
    };
    let ds_meta = DsMeta {
        name: Name::parse("example."),
        ttl: 3600,
        servers_clients: ServersClients::new(),
    };
    let mut dnskey = support::dnskey(10);
    dnskey.flags |= ferrous_dns_dnssec::types::dnskey::FLAG_REVOKE;

    let status = DsStatus::evaluate(&ds, &ds_meta, Some(&dnskey), false, &StubCrypto(Tri::Ok));

    assert_eq!(status.validation_status, DsValidationStatus::Invalid);
    assert_eq!(status.errors.len(), 1);
    assert_eq!(status.errors[0].name(), "DNSKEYRevokedDS");
}

/// Scenario 4 (spec §8): the signing DNSKEY is revoked but the DS's key
/// tag matches the pre-revocation tag, not the post-revocation one — the
/// DS may simply not have been refreshed yet. Expect
/// INDETERMINATE_MATCH_PRE_REVOKE, no errors.
#[test]
fn scenario_4_ds_revoked_key_pre_revoke_tag() {
    use ferrous_dns_dnssec::types::{DsMeta, DsRecord, ServersClients};

    let ds = DsRecord {
        key_tag: 10,
        algorithm: 8,
        digest_type: 2,
        digest: vec![1, 2, 3],
    };
    let ds_meta = DsMeta {
        name: Name::parse("example."),
        ttl: 3600,
        servers_clients: ServersClients::new(),
    };
    let mut dnskey = support::dnskey(5);
    dnskey.flags |= ferrous_dns_dnssec::types::dnskey::FLAG_REVOKE;

    let status = DsStatus::evaluate(&ds, &ds_meta, Some(&dnskey), false, &StubCrypto(Tri::Ok));

    assert_eq!(
        status.validation_status,
        DsValidationStatus::IndeterminateMatchPreRevoke
    );
    assert!(status.errors.is_empty());
}

/// Scenario 5 (spec §8): an NSEC covers `qname` and a second covers the
/// wildcard under `origin`, with none covering `origin` itself. Expect
/// VALID, with the retained view holding exactly those two owners
/// (evidence minimality, property 4).
#[test]
fn scenario_5_nsec_nxdomain_valid() {
    use ferrous_dns_dnssec::types::{NsecRecord, ServersClients};

    let origin = Name::parse("example.");
    let qname = Name::parse("foo.example.");

    let mut view = StaticNsecSetView::new(false, ServersClients::new());
    view.insert(NsecRecord {
        owner: Name::parse("example."),
        next: Name::parse("bar.example."),
        type_bitmap: Default::default(),
    });
    view.insert(NsecRecord {
        owner: Name::parse("bar.example."),
        next: Name::parse("zzz.example."),
        type_bitmap: Default::default(),
    });

    let status = NsecStatusNxdomain::evaluate(&qname, &origin, &view);

    assert_eq!(status.validation_status, NsecValidationStatus::Valid);
    assert!(status.errors.is_empty());

    let retained: BTreeSet<_> = status.retained_view().owners().into_iter().collect();
    let mut expected = BTreeSet::new();
    expected.insert(Name::parse("bar.example."));
    expected.insert(Name::parse("example."));
    assert_eq!(retained, expected);
}

/// Scenario 6 (spec §8): no NSEC3 matches `qname` exactly, but a covering
/// NSEC3 over the next-closer hash carries the opt-out bit and the query
/// is for DS. Expect VALID with `opt_out()` true.
#[test]
fn scenario_6_nsec3_nodata_ds_opt_out() {
    use ferrous_dns_dnssec::types::{Nsec3Params, Nsec3Record, ServersClients};
    use ferrous_dns_dnssec::Nsec3StatusNoAnswer;

    let origin = Name::parse("example.");
    let qname = Name::parse("child.example.");
    let params = Nsec3Params {
        algorithm: 1,
        iterations: 0,
        salt: vec![],
    };

    let mut valid = BTreeSet::new();
    valid.insert(1u8);
    let mut probe =
        StaticNsec3SetView::new(valid.clone(), BTreeSet::new(), false, ServersClients::new());

    let encloser_hash = probe
        .get_digest_name_for_nsec3(&origin, &origin, &params)
        .unwrap();
    let next_closer = qname.labels_from_end(origin.label_count() + 1);
    let next_closer_hash = probe
        .get_digest_name_for_nsec3(&next_closer, &origin, &params)
        .unwrap();

    probe.insert(Nsec3Record {
        owner_hash: encloser_hash,
        next_hash: "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz".to_string(),
        flags: 0,
        params: params.clone(),
        type_bitmap: BTreeSet::new(),
    });
    // A covering (not matching) NSEC3 with the opt-out bit set, spanning
    // the next-closer hash.
    probe.insert(Nsec3Record {
        owner_hash: "000000000000000000000000000000".to_string(),
        next_hash: format!("{next_closer_hash}Z"),
        flags: ferrous_dns_dnssec::types::nsec3::FLAG_OPT_OUT,
        params,
        type_bitmap: BTreeSet::new(),
    });

    let status = Nsec3StatusNoAnswer::evaluate(&qname, RecordType::DS, &origin, &probe);

    assert_eq!(status.validation_status, Nsec3ValidationStatus::Valid);
    assert!(status.opt_out());
}

/// Scenario 7 (spec §8): only an unsupported NSEC3 hash algorithm is in
/// play and no closest encloser can be found. Expect INVALID with
/// `UnsupportedNSEC3Algorithm` as the sole error — the closest-encloser
/// failure is suppressed because no valid algorithm remains to evaluate
/// it against.
#[test]
fn scenario_7_nsec3_unsupported_algorithm_only() {
    use ferrous_dns_dnssec::types::ServersClients;

    let origin = Name::parse("example.");
    let qname = Name::parse("nonexist.example.");

    let mut invalid = BTreeSet::new();
    invalid.insert(99u8);
    let view = StaticNsec3SetView::new(BTreeSet::new(), invalid, false, ServersClients::new());

    let status = ferrous_dns_dnssec::Nsec3StatusNxdomain::evaluate(&qname, &origin, &view);

    assert_eq!(status.validation_status, Nsec3ValidationStatus::Invalid);
    assert_eq!(status.errors.len(), 1);
    assert_eq!(status.errors[0].name(), "UnsupportedNSEC3Algorithm");
}

/// Scenario 8 (spec §8): the synthesized CNAME target disagrees with the
/// one the server actually included, TTLs equal. Expect INVALID_TARGET,
/// errors=[DNAMETargetMismatch], warnings=[].
#[test]
fn scenario_8_dname_cname_target_mismatch() {
    use ferrous_dns_dnssec::types::{CnameCarrier, DnameMeta, ServersClients};

    let dname = DnameMeta {
        owner: Name::parse("d.example."),
        target: Name::parse("e.example."),
        ttl: 3600,
        servers_clients: ServersClients::new(),
    };
    let synthesized = CnameCarrier {
        owner: Name::parse("a.d.example."),
        target: Name::parse("a.b."),
        ttl: 3600,
    };
    let included = CnameCarrier {
        owner: Name::parse("a.d.example."),
        target: Name::parse("a.c."),
        ttl: 3600,
    };

    let status = DnameStatus::evaluate(&dname, &synthesized, Some(&included));

    assert_eq!(status.validation_status, DnameValidationStatus::InvalidTarget);
    assert_eq!(status.errors.len(), 1);
    assert_eq!(status.errors[0].name(), "DNAMETargetMismatch");
    assert!(status.warnings.is_empty());
}
