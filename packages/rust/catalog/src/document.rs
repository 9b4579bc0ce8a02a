//! On-disk shape of `generate.yml`.
//!
//! Every key the loader inspects is an explicit `Option`; everything else is
//! captured in `extra` and handed to templates unchanged.

use serde::{Deserialize, Serialize};

use oqsgen_shared::{CodePoint, Extras};

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogDocument {
    #[serde(default)]
    pub kems: Vec<KemEntry>,
    #[serde(default)]
    pub sigs: Vec<SigFamilyEntry>,
    #[serde(flatten)]
    pub extra: Extras,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KemEntry {
    pub family: String,
    pub name_group: String,
    #[serde(default)]
    pub nid: Option<CodePoint>,
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub nid_hybrid: Option<CodePoint>,
    #[serde(default)]
    pub hybrid_oid: Option<String>,
    #[serde(default)]
    pub enable_kem: Option<bool>,
    #[serde(default)]
    pub iana: Option<bool>,
    #[serde(default)]
    pub extra_nids: Option<ExtraNids>,
    #[serde(flatten)]
    pub extra: Extras,
}

/// `extra_nids` block; only `current` is interpreted, `old` and friends pass through.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ExtraNids {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Vec<HybridEntry>>,
    #[serde(flatten)]
    pub extra: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HybridEntry {
    pub hybrid_group: String,
    pub nid: CodePoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid_oid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana: Option<bool>,
    #[serde(flatten)]
    pub extra: Extras,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SigFamilyEntry {
    pub family: String,
    #[serde(default)]
    pub variants: Vec<SigEntry>,
    #[serde(flatten)]
    pub extra: Extras,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SigEntry {
    pub name: String,
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(flatten)]
    pub extra: Extras,
}
