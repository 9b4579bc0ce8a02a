//! Private-use code point allocation checks.
//!
//! Every code point not flagged `iana` must come from [`PRIVATE_USE_RANGE`]
//! and may be claimed only once across the whole catalog.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use oqsgen_shared::{Catalog, CodePoint, GeneratorError, NextFree, PRIVATE_USE_RANGE, Result};

/// Unclaimed private-use code points for one validation pass.
#[derive(Debug, Clone)]
pub struct CodePointRegistry {
    free: BTreeSet<u32>,
}

/// Summary of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePointReport {
    /// Private-use code points claimed by the catalog.
    pub claimed: usize,
    /// Lowest private-use code point still available.
    pub next_free: Option<u32>,
}

impl CodePointRegistry {
    /// A registry holding the full private-use range.
    pub fn private_use() -> Self {
        Self {
            free: PRIVATE_USE_RANGE.collect(),
        }
    }

    /// Lowest unclaimed value.
    pub fn next_free(&self) -> Option<u32> {
        self.free.first().copied()
    }

    pub fn claimed(&self) -> usize {
        PRIVATE_USE_RANGE.len() - self.free.len()
    }

    /// Claim `code_point` on behalf of `name`.
    pub fn claim(&mut self, name: &str, code_point: &CodePoint) -> Result<u32> {
        if !code_point.is_numeric() {
            return Err(GeneratorError::InvalidCodePoint {
                name: name.to_string(),
                value: code_point.to_string(),
            });
        }

        let Some(value) = code_point.value().filter(|v| PRIVATE_USE_RANGE.contains(v)) else {
            return Err(GeneratorError::CodePointOutOfRange {
                name: name.to_string(),
                value: code_point.to_string(),
                next_free: NextFree(self.next_free()),
            });
        };

        if !self.free.remove(&value) {
            return Err(GeneratorError::CodePointCollision {
                name: name.to_string(),
                value: code_point.to_string(),
                next_free: NextFree(self.next_free()),
            });
        }

        debug!(name, value, "claimed code point");
        Ok(value)
    }
}

/// Check every non-IANA group and hybrid code point in the catalog.
///
/// A group flagged `iana` exempts its hybrids as well; they follow the
/// allocation of the standardized group.
#[instrument(skip_all, fields(kems = catalog.kems.len()))]
pub fn validate_code_points(catalog: &Catalog) -> Result<CodePointReport> {
    let mut registry = CodePointRegistry::private_use();

    for kem in catalog.kems.iter().filter(|k| !k.iana) {
        registry.claim(&kem.group_name, &kem.nid)?;

        for hybrid in kem.hybrids.iter().filter(|h| !h.iana) {
            registry.claim(&hybrid.display_name(kem), &hybrid.nid)?;
        }
    }

    Ok(CodePointReport {
        claimed: registry.claimed(),
        next_free: registry.next_free(),
    })
}

#[cfg(test)]
mod tests {
    use oqsgen_shared::{BitSecurity, HybridBinding, KemVariant, PLACEHOLDER_OID};

    use super::*;

    fn kem(group: &str, nid: &str, iana: bool) -> KemVariant {
        KemVariant {
            family: "FrodoKEM".into(),
            group_name: group.into(),
            nid: CodePoint::new(nid),
            oid: PLACEHOLDER_OID.into(),
            nid_hybrid: CodePoint::new("0"),
            hybrid_oid: None,
            enabled: true,
            iana,
            bit_security: Some(BitSecurity::Bits128),
            hybrids: Vec::new(),
            extra: Default::default(),
        }
    }

    fn hybrid(curve: &str, nid: &str, iana: bool) -> HybridBinding {
        HybridBinding {
            hybrid_group: curve.into(),
            nid: CodePoint::new(nid),
            hybrid_oid: PLACEHOLDER_OID.into(),
            bit_security: BitSecurity::Bits128,
            iana,
            extra: Default::default(),
        }
    }

    fn catalog(kems: Vec<KemVariant>) -> Catalog {
        Catalog {
            kems,
            ..Catalog::default()
        }
    }

    #[test]
    fn range_boundaries() {
        let mut registry = CodePointRegistry::private_use();
        assert!(matches!(
            registry.claim("low", &CodePoint::new("65023")),
            Err(GeneratorError::CodePointOutOfRange { .. })
        ));
        assert_eq!(registry.claim("first", &CodePoint::new("65024")).unwrap(), 65024);
        assert_eq!(registry.claim("last", &CodePoint::new("65279")).unwrap(), 65279);
        assert!(matches!(
            registry.claim("high", &CodePoint::new("65280")),
            Err(GeneratorError::CodePointOutOfRange { .. })
        ));
    }

    #[test]
    fn hex_and_decimal_spellings_collide() {
        let mut registry = CodePointRegistry::private_use();
        registry.claim("a", &CodePoint::new("0xFE00")).unwrap();
        let err = registry.claim("b", &CodePoint::new("65024")).unwrap_err();
        assert!(matches!(err, GeneratorError::CodePointCollision { .. }));
    }

    #[test]
    fn diagnostic_reports_next_free_value() {
        let mut registry = CodePointRegistry::private_use();
        registry.claim("a", &CodePoint::new("65024")).unwrap();
        registry.claim("b", &CodePoint::new("65025")).unwrap();
        let err = registry.claim("c", &CodePoint::new("0x2F00")).unwrap_err();
        match err {
            GeneratorError::CodePointOutOfRange {
                name,
                value,
                next_free,
            } => {
                assert_eq!(name, "c");
                assert_eq!(value, "0x2F00");
                assert_eq!(next_free, NextFree(Some(65026)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn numbers_outside_u32_are_out_of_range() {
        let mut registry = CodePointRegistry::private_use();
        registry.claim("a", &CodePoint::new("65024")).unwrap();
        for raw in ["0x1FFFFFFFF", "-1", "99999999999999999999999"] {
            match registry.claim("g", &CodePoint::new(raw)).unwrap_err() {
                GeneratorError::CodePointOutOfRange { value, next_free, .. } => {
                    assert_eq!(value, raw);
                    assert_eq!(next_free, NextFree(Some(65025)));
                }
                other => panic!("unexpected error for {raw}: {other}"),
            }
        }
    }

    #[test]
    fn unparsable_code_point() {
        let mut registry = CodePointRegistry::private_use();
        let err = registry.claim("x", &CodePoint::new("FE00")).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidCodePoint { .. }));
    }

    #[test]
    fn hybrid_colliding_with_its_group() {
        let mut frodo = kem("frodo640aes", "65024", false);
        frodo.hybrids.push(hybrid("p256", "65024", false));
        let err = validate_code_points(&catalog(vec![frodo])).unwrap_err();
        match err {
            GeneratorError::CodePointCollision { name, .. } => {
                assert_eq!(name, "frodo640aes_p256");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn hybrids_colliding_across_groups() {
        let mut a = kem("frodo640aes", "65024", false);
        a.hybrids.push(hybrid("p256", "65025", false));
        let mut b = kem("bikel1", "65026", false);
        b.hybrids.push(hybrid("p256", "0xFE01", false));
        let err = validate_code_points(&catalog(vec![a, b])).unwrap_err();
        assert!(err.to_string().contains("bikel1_p256"));
        assert!(err.to_string().contains("already in use"));
    }

    #[test]
    fn iana_entries_are_exempt() {
        let mut mlkem = kem("mlkem768", "0x0201", true);
        mlkem.hybrids.push(hybrid("p384", "0x2F3C", false));
        let mut frodo = kem("frodo640aes", "65024", false);
        frodo.hybrids.push(hybrid("x25519", "0x11EC", true));
        frodo.hybrids.push(hybrid("p256", "65025", false));

        let report = validate_code_points(&catalog(vec![mlkem, frodo])).unwrap();
        assert_eq!(report.claimed, 2);
        assert_eq!(report.next_free, Some(65026));
    }

    #[test]
    fn empty_catalog_claims_nothing() {
        let report = validate_code_points(&Catalog::default()).unwrap();
        assert_eq!(report.claimed, 0);
        assert_eq!(report.next_free, Some(65024));
    }

    #[test]
    fn exhausted_range_reports_none() {
        let mut registry = CodePointRegistry::private_use();
        for value in PRIVATE_USE_RANGE {
            registry.claim("fill", &CodePoint::new(value.to_string())).unwrap();
        }
        assert_eq!(registry.next_free(), None);
        let err = registry.claim("extra", &CodePoint::new("65024")).unwrap_err();
        assert!(err.to_string().ends_with("none"));
    }
}
