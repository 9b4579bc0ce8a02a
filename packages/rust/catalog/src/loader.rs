//! Catalog loading: `generate.yml` → typed [`Catalog`].
//!
//! All presence checks happen here. Later stages only see entries that have
//! the identifiers they need.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use oqsgen_shared::{
    BitSecurity, Catalog, GeneratorError, HybridBinding, KemVariant, PLACEHOLDER_OID, Result,
    SigFamily, SigVariant,
};

use crate::document::{CatalogDocument, HybridEntry, KemEntry, SigEntry, SigFamilyEntry};

/// Which disabled entries survive loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub include_disabled_sigs: bool,
    pub include_disabled_kems: bool,
}

impl LoadOptions {
    /// Enabled entries only; used for generated sources.
    pub fn production() -> Self {
        Self::default()
    }

    /// Disabled signatures kept so documentation lists them.
    pub fn documentation() -> Self {
        Self {
            include_disabled_sigs: true,
            include_disabled_kems: false,
        }
    }
}

/// Read and load the catalog at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_catalog(path: &Path, options: LoadOptions) -> Result<Catalog> {
    let source = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    let document: CatalogDocument =
        serde_yaml::from_str(&source).map_err(|e| GeneratorError::parse(path, e.to_string()))?;

    let catalog = build_catalog(document, options)?;
    info!(
        kems = catalog.kems.len(),
        sigs = catalog.sig_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Load a catalog from YAML text.
pub fn parse_catalog(source: &str, options: LoadOptions) -> Result<Catalog> {
    let document: CatalogDocument = serde_yaml::from_str(source)
        .map_err(|e| GeneratorError::parse("<inline>", e.to_string()))?;
    build_catalog(document, options)
}

fn build_catalog(document: CatalogDocument, options: LoadOptions) -> Result<Catalog> {
    let mut kems = Vec::new();
    for entry in document.kems {
        if !options.include_disabled_kems && !entry.enable_kem.unwrap_or(false) {
            continue;
        }
        // Entries without a code point predate TLS group support.
        if entry.nid.is_none() {
            debug!(group = %entry.name_group, "dropping KEM without nid");
            continue;
        }
        kems.push(build_kem(entry)?);
    }

    let sigs = document
        .sigs
        .into_iter()
        .map(|family| build_sig_family(family, options))
        .collect();

    Ok(Catalog {
        kems,
        sigs,
        extra: document.extra,
    })
}

fn build_kem(entry: KemEntry) -> Result<KemVariant> {
    let KemEntry {
        family,
        name_group,
        nid,
        oid,
        nid_hybrid,
        hybrid_oid,
        enable_kem,
        iana,
        extra_nids,
        mut extra,
    } = entry;

    let nid = nid.ok_or_else(|| GeneratorError::catalog(format!("{name_group} has no nid")))?;
    let nid_hybrid = nid_hybrid.ok_or_else(|| {
        GeneratorError::catalog(format!("{name_group} has no nid_hybrid"))
    })?;

    let mut hybrids = Vec::new();
    if let Some(nids) = extra_nids {
        if let Some(current) = nids.current.as_ref() {
            hybrids = build_extra_hybrids(&name_group, current)?;
        }
        let value = serde_json::to_value(&nids)
            .map_err(|e| GeneratorError::catalog(format!("{name_group}: extra_nids: {e}")))?;
        extra.insert("extra_nids".into(), value);
    }

    Ok(KemVariant {
        family,
        group_name: name_group,
        nid,
        oid: oid.unwrap_or_else(|| PLACEHOLDER_OID.to_string()),
        nid_hybrid,
        hybrid_oid,
        enabled: enable_kem.unwrap_or(false),
        iana: iana.unwrap_or(false),
        bit_security: None,
        hybrids,
        extra,
    })
}

/// Turn `extra_nids.current` into bindings, rejecting repeated code points.
fn build_extra_hybrids(group: &str, current: &[HybridEntry]) -> Result<Vec<HybridBinding>> {
    let mut seen = HashSet::new();
    let mut hybrids = Vec::with_capacity(current.len());

    for entry in current {
        let bit_security = BitSecurity::from_curve(&entry.hybrid_group).ok_or_else(|| {
            GeneratorError::UnknownHybridCurve {
                group: group.to_string(),
                curve: entry.hybrid_group.clone(),
            }
        })?;

        if !seen.insert(entry.nid.canonical()) {
            return Err(GeneratorError::DuplicateHybridIdentifier {
                group: group.to_string(),
                nid: entry.nid.to_string(),
            });
        }

        hybrids.push(HybridBinding {
            hybrid_group: entry.hybrid_group.clone(),
            nid: entry.nid.clone(),
            hybrid_oid: entry
                .hybrid_oid
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_OID.to_string()),
            bit_security,
            iana: entry.iana.unwrap_or(false),
            extra: entry.extra.clone(),
        });
    }

    Ok(hybrids)
}

fn build_sig_family(family: SigFamilyEntry, options: LoadOptions) -> SigFamily {
    let variants = family
        .variants
        .into_iter()
        .filter(|v| options.include_disabled_sigs || v.enable.unwrap_or(false))
        .filter_map(build_sig)
        .collect();

    SigFamily {
        family: family.family,
        variants,
        extra: family.extra,
    }
}

fn build_sig(entry: SigEntry) -> Option<SigVariant> {
    let Some(oid) = entry.oid else {
        debug!(name = %entry.name, "dropping signature without oid");
        return None;
    };

    Some(SigVariant {
        name: entry.name,
        oid,
        enabled: entry.enable.unwrap_or(false),
        security: 0,
        extra: entry.extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path() -> &'static Path {
        Path::new("../../../fixtures/catalog/generate.yml")
    }

    fn kem_names(catalog: &Catalog) -> Vec<&str> {
        catalog.kems.iter().map(|k| k.group_name.as_str()).collect()
    }

    #[test]
    fn production_load_drops_disabled_and_legacy() {
        let catalog = load_catalog(fixture_path(), LoadOptions::production()).unwrap();
        assert_eq!(kem_names(&catalog), vec!["frodo640aes", "mlkem768", "bikel1"]);

        let sig_names: Vec<_> = catalog
            .sigs
            .iter()
            .flat_map(|f| f.variants.iter().map(|v| v.name.as_str()))
            .collect();
        assert_eq!(
            sig_names,
            vec!["mldsa44", "mldsa65", "sphincssha2128fsimple", "mayo2"]
        );
    }

    #[test]
    fn documentation_load_keeps_disabled_sigs_only() {
        let catalog = load_catalog(fixture_path(), LoadOptions::documentation()).unwrap();
        assert_eq!(kem_names(&catalog), vec!["frodo640aes", "mlkem768", "bikel1"]);
        let sphincs = catalog
            .sigs
            .iter()
            .find(|f| f.family == "SPHINCS-SHA2")
            .unwrap();
        assert_eq!(sphincs.variants.len(), 2);
        assert!(!sphincs.variants[1].enabled);
        // Still no OID-less legacy entries.
        let falcon = catalog.sigs.iter().find(|f| f.family == "Falcon").unwrap();
        assert!(falcon.variants.is_empty());
    }

    #[test]
    fn include_disabled_kems() {
        let options = LoadOptions {
            include_disabled_kems: true,
            ..LoadOptions::default()
        };
        let catalog = load_catalog(fixture_path(), options).unwrap();
        // kyber768 is disabled; the nid-less legacy group is still dropped.
        assert_eq!(
            kem_names(&catalog),
            vec!["frodo640aes", "kyber768", "mlkem768", "bikel1"]
        );
    }

    #[test]
    fn explicit_hybrids_get_curve_strength_and_placeholder_oid() {
        let catalog = load_catalog(fixture_path(), LoadOptions::production()).unwrap();
        let frodo = &catalog.kems[0];
        assert_eq!(frodo.hybrids.len(), 1);
        assert_eq!(frodo.hybrids[0].hybrid_group, "x25519");
        assert_eq!(frodo.hybrids[0].bit_security, BitSecurity::Bits128);
        assert_eq!(frodo.hybrids[0].hybrid_oid, PLACEHOLDER_OID);
        assert_eq!(frodo.oid, "1.3.9999.99.1");
        assert!(frodo.bit_security.is_none());

        let mlkem = &catalog.kems[1];
        assert!(mlkem.iana);
        assert_eq!(mlkem.oid, PLACEHOLDER_OID);
        assert_eq!(mlkem.hybrids.len(), 2);
        assert!(mlkem.hybrids[0].iana);
        assert_eq!(mlkem.hybrids[0].extra["standard_name"], "X25519MLKEM768");
        assert_eq!(mlkem.hybrids[1].bit_security, BitSecurity::Bits192);
    }

    #[test]
    fn extra_keys_pass_through() {
        let catalog = load_catalog(fixture_path(), LoadOptions::production()).unwrap();
        let mlkem = &catalog.kems[1];
        assert_eq!(mlkem.extra["oqs_alg"], "OQS_KEM_alg_ml_kem_768");
        assert!(mlkem.extra["extra_nids"]["old"].is_array());
        let mldsa44 = &catalog.sigs[0].variants[0];
        assert_eq!(mldsa44.extra["pretty_name"], "ML-DSA-44");
    }

    #[test]
    fn hybrid_list_starts_empty_without_extra_nids() {
        let catalog = load_catalog(fixture_path(), LoadOptions::production()).unwrap();
        let bike = &catalog.kems[2];
        assert!(bike.hybrids.is_empty());
        assert_eq!(bike.nid.as_str(), "65030");
    }

    #[test]
    fn duplicate_hybrid_nid_aborts_load() {
        let yaml = r#"
kems:
  - family: FrodoKEM
    name_group: frodo640aes
    nid: '0xFE00'
    nid_hybrid: '0xFE01'
    enable_kem: true
    extra_nids:
      current:
        - hybrid_group: x25519
          nid: '0xFE02'
        - hybrid_group: x448
          nid: '0xFE02'
"#;
        let err = parse_catalog(yaml, LoadOptions::production()).unwrap_err();
        match &err {
            GeneratorError::DuplicateHybridIdentifier { group, nid } => {
                assert_eq!(group, "frodo640aes");
                assert_eq!(nid, "0xFE02");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_detection_compares_values_not_spelling() {
        let yaml = r#"
kems:
  - family: FrodoKEM
    name_group: frodo640aes
    nid: 65024
    nid_hybrid: 65025
    enable_kem: true
    extra_nids:
      current:
        - hybrid_group: x25519
          nid: 65026
        - hybrid_group: x448
          nid: '0xFE02'
"#;
        let err = parse_catalog(yaml, LoadOptions::production()).unwrap_err();
        assert!(matches!(err, GeneratorError::DuplicateHybridIdentifier { .. }));
    }

    #[test]
    fn unknown_curve_rejected() {
        let yaml = r#"
kems:
  - family: BIKE
    name_group: bikel1
    nid: 65030
    nid_hybrid: 65031
    enable_kem: true
    extra_nids:
      current:
        - hybrid_group: brainpool256
          nid: 65032
"#;
        let err = parse_catalog(yaml, LoadOptions::production()).unwrap_err();
        assert!(err.to_string().contains("brainpool256"));
    }

    #[test]
    fn missing_hybrid_nid_rejected() {
        let yaml = r#"
kems:
  - family: BIKE
    name_group: bikel1
    nid: 65030
    enable_kem: true
"#;
        let err = parse_catalog(yaml, LoadOptions::production()).unwrap_err();
        assert_eq!(err.to_string(), "catalog error: bikel1 has no nid_hybrid");
    }

    #[test]
    fn entries_without_enable_flag_are_disabled() {
        let yaml = r#"
kems:
  - family: BIKE
    name_group: bikel1
    nid: 65030
    nid_hybrid: 65031
sigs:
  - family: MAYO
    variants:
      - name: mayo1
        oid: 1.3.9999.8.1.3
"#;
        let catalog = parse_catalog(yaml, LoadOptions::production()).unwrap();
        assert!(catalog.kems.is_empty());
        assert!(catalog.sigs[0].variants.is_empty());
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_catalog("kems: [", LoadOptions::production()).unwrap_err();
        assert!(matches!(err, GeneratorError::Parse { .. }));
    }
}
