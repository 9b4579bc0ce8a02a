//! Security-level resolution against liboqs datasheets.

use tracing::{debug, info, instrument, warn};

use oqsgen_shared::{
    BitSecurity, Catalog, GeneratorError, HybridBinding, KemVariant, PLACEHOLDER_OID, Result,
    SigVariant,
};

use crate::matching::{datasheet_name, find_claimed_level};
use crate::source::{AlgorithmKind, DatasheetSource};

/// Fill in bit security for every group and signature in `catalog`.
///
/// Each group gains a leading hybrid binding with the NIST curve of its
/// strength. A group whose level cannot be found aborts resolution; a
/// signature without one is reported and given security 0.
#[instrument(skip_all, fields(kems = catalog.kems.len(), sigs = catalog.sig_count()))]
pub fn resolve_catalog(mut catalog: Catalog, source: &mut dyn DatasheetSource) -> Result<Catalog> {
    for kem in &mut catalog.kems {
        resolve_kem(kem, source)?;
    }

    let mut unresolved = 0usize;
    for family in &mut catalog.sigs {
        for variant in &mut family.variants {
            if !resolve_sig(&family.family, variant, source)? {
                unresolved += 1;
            }
        }
    }

    info!(
        hybrids = catalog.hybrid_count(),
        unresolved_sigs = unresolved,
        "security levels resolved"
    );
    Ok(catalog)
}

fn resolve_kem(kem: &mut KemVariant, source: &mut dyn DatasheetSource) -> Result<()> {
    let name = datasheet_name(AlgorithmKind::Kem, &kem.family);
    let sheet = source.datasheet(AlgorithmKind::Kem, &name)?;

    let bits = find_claimed_level(AlgorithmKind::Kem, sheet, &kem.group_name)
        .and_then(BitSecurity::from_nist_level)
        .ok_or_else(|| GeneratorError::UnresolvedSecurityLevel {
            family: kem.family.clone(),
            group: kem.group_name.clone(),
        })?;

    // The synthesized pairing must not reuse an explicit pairing's code
    // point; IANA groups skip the allocation checks that would catch it.
    let nid = kem.nid_hybrid.canonical();
    if kem.hybrids.iter().any(|h| h.nid.canonical() == nid) {
        return Err(GeneratorError::DuplicateHybridIdentifier {
            group: kem.group_name.clone(),
            nid: kem.nid_hybrid.to_string(),
        });
    }

    debug!(group = %kem.group_name, bits = bits.bits(), "resolved group");
    kem.bit_security = Some(bits);
    kem.hybrids.insert(
        0,
        HybridBinding {
            hybrid_group: bits.hybrid_curve().to_string(),
            nid: kem.nid_hybrid.clone(),
            hybrid_oid: kem
                .hybrid_oid
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_OID.to_string()),
            bit_security: bits,
            iana: false,
            extra: Default::default(),
        },
    );
    Ok(())
}

/// Returns whether a level was found.
fn resolve_sig(
    family: &str,
    variant: &mut SigVariant,
    source: &mut dyn DatasheetSource,
) -> Result<bool> {
    let name = datasheet_name(AlgorithmKind::Sig, family);
    let sheet = source.datasheet(AlgorithmKind::Sig, &name)?;

    match find_claimed_level(AlgorithmKind::Sig, sheet, &variant.name)
        .and_then(BitSecurity::from_nist_level)
    {
        Some(bits) => {
            variant.security = bits.bits();
            Ok(true)
        }
        None => {
            warn!(family, name = %variant.name, "no claimed NIST level; security set to 0");
            variant.security = 0;
            Ok(false)
        }
    }
}
