//! Catalog ↔ datasheet name matching.
//!
//! Catalog families and group names drift from liboqs naming. The tables
//! below list every known divergence; [`normalize`] handles the rest.

use std::borrow::Cow;

use crate::source::{AlgorithmKind, Datasheet};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Catalog family whose datasheet file is named differently.
struct FamilyAlias {
    family: &'static str,
    datasheet: &'static str,
}

const KEM_FAMILY_ALIASES: &[FamilyAlias] = &[
    FamilyAlias {
        family: "CRYSTALS-Kyber",
        datasheet: "kyber",
    },
    FamilyAlias {
        family: "SIDH",
        datasheet: "sike",
    },
    FamilyAlias {
        family: "NTRU-Prime",
        datasheet: "ntruprime",
    },
];

const SIG_FAMILY_ALIASES: &[FamilyAlias] = &[
    FamilyAlias {
        family: "CRYSTALS-Dilithium",
        datasheet: "dilithium",
    },
    FamilyAlias {
        family: "SPHINCS-Haraka",
        datasheet: "sphincs",
    },
    FamilyAlias {
        family: "SPHINCS-SHA2",
        datasheet: "sphincs",
    },
    FamilyAlias {
        family: "SPHINCS-SHAKE",
        datasheet: "sphincs",
    },
];

/// Rewrite applied to a datasheet name when it contains `trigger`.
/// Replacements run in order on the whole name.
struct NameRewrite {
    trigger: &'static str,
    replacements: &'static [(&'static str, &'static str)],
}

const KEM_NAME_REWRITES: &[NameRewrite] = &[
    NameRewrite {
        trigger: "FrodoKEM",
        replacements: &[("FrodoKEM", "Frodo")],
    },
    NameRewrite {
        trigger: "Saber-KEM",
        replacements: &[("-KEM", "")],
    },
    // Kyber512-90s is catalogued as kyber90s512.
    NameRewrite {
        trigger: "-90s",
        replacements: &[("-90s", ""), ("Kyber", "Kyber90s")],
    },
];

const KEM_SEPARATORS: &[char] = &['_', '-'];
const SIG_SEPARATORS: &[char] = &['_', '-', '+'];

fn family_aliases(kind: AlgorithmKind) -> &'static [FamilyAlias] {
    match kind {
        AlgorithmKind::Kem => KEM_FAMILY_ALIASES,
        AlgorithmKind::Sig => SIG_FAMILY_ALIASES,
    }
}

fn name_rewrites(kind: AlgorithmKind) -> &'static [NameRewrite] {
    match kind {
        AlgorithmKind::Kem => KEM_NAME_REWRITES,
        AlgorithmKind::Sig => &[],
    }
}

fn separators(kind: AlgorithmKind) -> &'static [char] {
    match kind {
        AlgorithmKind::Kem => KEM_SEPARATORS,
        AlgorithmKind::Sig => SIG_SEPARATORS,
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Datasheet file stem for a catalog family.
pub fn datasheet_name(kind: AlgorithmKind, family: &str) -> String {
    family_aliases(kind)
        .iter()
        .find(|alias| alias.family == family)
        .map(|alias| alias.datasheet.to_string())
        .unwrap_or_else(|| family.to_lowercase().replace('-', "_"))
}

/// Case-fold and drop separator characters.
pub fn normalize(kind: AlgorithmKind, name: &str) -> String {
    let separators = separators(kind);
    name.chars()
        .filter(|c| !separators.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Apply the kind's rewrite table to a datasheet name.
fn rewrite(kind: AlgorithmKind, name: &str) -> Cow<'_, str> {
    let mut name = Cow::Borrowed(name);
    for rule in name_rewrites(kind) {
        if name.contains(rule.trigger) {
            for (from, to) in rule.replacements {
                name = Cow::Owned(name.replace(from, to));
            }
        }
    }
    name
}

/// Whether a datasheet name or alias denotes the catalog entry `catalog_name`.
pub fn names_match(kind: AlgorithmKind, datasheet_name: &str, catalog_name: &str) -> bool {
    normalize(kind, &rewrite(kind, datasheet_name)) == normalize(kind, catalog_name)
}

/// Claimed NIST level of the first parameter set matching `catalog_name`.
///
/// `None` when nothing matches or the matching set declares no level.
pub fn find_claimed_level(
    kind: AlgorithmKind,
    sheet: &Datasheet,
    catalog_name: &str,
) -> Option<u8> {
    sheet
        .parameter_sets
        .iter()
        .find(|set| {
            names_match(kind, &set.name, catalog_name)
                || set
                    .alias
                    .as_deref()
                    .is_some_and(|alias| names_match(kind, alias, catalog_name))
        })
        .and_then(|set| set.claimed_nist_level)
}
