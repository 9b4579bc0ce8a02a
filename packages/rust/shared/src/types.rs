//! Resolved algorithm catalog: the record threaded through every stage.
//!
//! These types are what templates see under `config`. Field names are
//! serialized with the catalog's own keys so fragments read like the catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Code points reserved for private use in the TLS supported-groups registry.
pub const PRIVATE_USE_RANGE: Range<u32> = 65024..65280;

/// OID emitted when the catalog does not assign one.
pub const PLACEHOLDER_OID: &str = "NULL";

/// Unrecognized catalog keys, passed through to templates untouched.
pub type Extras = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// BitSecurity
// ---------------------------------------------------------------------------

/// Coarse strength bucket derived from a claimed NIST level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u16")]
pub enum BitSecurity {
    Bits128,
    Bits192,
    Bits256,
}

impl BitSecurity {
    /// Map a claimed NIST level (1-5) to its strength bucket.
    pub fn from_nist_level(level: u8) -> Option<Self> {
        match level {
            1 | 2 => Some(Self::Bits128),
            3 | 4 => Some(Self::Bits192),
            5 => Some(Self::Bits256),
            _ => None,
        }
    }

    /// Strength of a classical curve as named in `extra_nids`.
    pub fn from_curve(curve: &str) -> Option<Self> {
        match curve {
            "x25519" | "p256" | "secp256_r1" => Some(Self::Bits128),
            "x448" | "p384" | "secp384_r1" => Some(Self::Bits192),
            "p521" | "secp521_r1" => Some(Self::Bits256),
            _ => None,
        }
    }

    /// NIST curve paired with a post-quantum group of this strength.
    pub fn hybrid_curve(self) -> &'static str {
        match self {
            Self::Bits128 => "p256",
            Self::Bits192 => "p384",
            Self::Bits256 => "p521",
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::Bits128 => 128,
            Self::Bits192 => 192,
            Self::Bits256 => 256,
        }
    }
}

impl From<BitSecurity> for u16 {
    fn from(value: BitSecurity) -> Self {
        value.bits()
    }
}

impl fmt::Display for BitSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// ---------------------------------------------------------------------------
// CodePoint
// ---------------------------------------------------------------------------

/// A TLS group code point in the form the catalog wrote it.
///
/// Catalogs mix integers (`65024`) and hex strings (`'0xFE00'`); the raw text
/// is what templates print, [`CodePoint::value`] is what validation compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodePoint(String);

impl CodePoint {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, parsed as `0x`-prefixed hex or decimal.
    pub fn value(&self) -> Option<u32> {
        let raw = self.0.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse().ok(),
        }
    }

    /// Whether the text is a number at all, including ones too large or
    /// negative for [`CodePoint::value`].
    pub fn is_numeric(&self) -> bool {
        let raw = self.0.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => {
                let digits = raw.strip_prefix('-').unwrap_or(raw);
                !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            }
        }
    }

    /// Key under which two spellings of the same value compare equal.
    pub fn canonical(&self) -> String {
        self.value()
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.0.trim().to_string())
    }
}

impl fmt::Display for CodePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CodePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CodePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Self(value.to_string()),
            Raw::Text(text) => Self(text),
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// The resolved catalog. Templates receive it as `config`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub kems: Vec<KemVariant>,
    pub sigs: Vec<SigFamily>,
    #[serde(flatten)]
    pub extra: Extras,
}

/// A post-quantum key-exchange group.
#[derive(Debug, Clone, Serialize)]
pub struct KemVariant {
    pub family: String,
    #[serde(rename = "name_group")]
    pub group_name: String,
    pub nid: CodePoint,
    /// Explicit OID, or [`PLACEHOLDER_OID`].
    pub oid: String,
    /// Code point of the synthesized NIST-curve hybrid.
    pub nid_hybrid: CodePoint,
    pub hybrid_oid: Option<String>,
    #[serde(rename = "enable_kem")]
    pub enabled: bool,
    /// Code point is IANA-registered; exempt from private-range checks.
    pub iana: bool,
    /// Filled in by the resolver.
    pub bit_security: Option<BitSecurity>,
    /// Synthesized pairing first, then explicit `extra_nids.current` entries.
    pub hybrids: Vec<HybridBinding>,
    #[serde(flatten)]
    pub extra: Extras,
}

/// A post-quantum group combined with a classical curve.
#[derive(Debug, Clone, Serialize)]
pub struct HybridBinding {
    pub hybrid_group: String,
    pub nid: CodePoint,
    pub hybrid_oid: String,
    pub bit_security: BitSecurity,
    pub iana: bool,
    #[serde(flatten)]
    pub extra: Extras,
}

/// A signature family and its variants.
#[derive(Debug, Clone, Serialize)]
pub struct SigFamily {
    pub family: String,
    pub variants: Vec<SigVariant>,
    #[serde(flatten)]
    pub extra: Extras,
}

/// A single signature algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct SigVariant {
    pub name: String,
    pub oid: String,
    #[serde(rename = "enable")]
    pub enabled: bool,
    /// Bit security, or 0 when no datasheet entry matched.
    pub security: u16,
    #[serde(flatten)]
    pub extra: Extras,
}

impl Catalog {
    /// Number of signature variants across all families.
    pub fn sig_count(&self) -> usize {
        self.sigs.iter().map(|f| f.variants.len()).sum()
    }

    /// Number of hybrid pairings across all groups.
    pub fn hybrid_count(&self) -> usize {
        self.kems.iter().map(|k| k.hybrids.len()).sum()
    }
}

impl HybridBinding {
    /// Display name used in diagnostics: `<group>_<curve>`.
    pub fn display_name(&self, kem: &KemVariant) -> String {
        format!("{}_{}", kem.group_name, self.hybrid_group)
    }
}

// ---------------------------------------------------------------------------
// MarkerStyle
// ---------------------------------------------------------------------------

/// How fragment markers are written in a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// Comment-delimited source files: `///// OQS_TEMPLATE_FRAGMENT_X_START`.
    Source,
    /// Markdown: the start marker closes the HTML comment with ` -->`.
    Document,
}

impl MarkerStyle {
    /// Markdown files use the document style; everything else is source.
    pub fn for_path(path: &str) -> Self {
        if path.ends_with(".md") {
            Self::Document
        } else {
            Self::Source
        }
    }

    /// Text closing a marker line in this style.
    pub fn closing(self) -> &'static str {
        match self {
            Self::Source => "",
            Self::Document => " -->",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nist_levels_map_to_buckets() {
        assert_eq!(BitSecurity::from_nist_level(1), Some(BitSecurity::Bits128));
        assert_eq!(BitSecurity::from_nist_level(2), Some(BitSecurity::Bits128));
        assert_eq!(BitSecurity::from_nist_level(3), Some(BitSecurity::Bits192));
        assert_eq!(BitSecurity::from_nist_level(4), Some(BitSecurity::Bits192));
        assert_eq!(BitSecurity::from_nist_level(5), Some(BitSecurity::Bits256));
        assert_eq!(BitSecurity::from_nist_level(0), None);
        assert_eq!(BitSecurity::from_nist_level(6), None);
    }

    #[test]
    fn curve_table() {
        for curve in ["x25519", "p256", "secp256_r1"] {
            assert_eq!(BitSecurity::from_curve(curve), Some(BitSecurity::Bits128));
        }
        for curve in ["x448", "p384", "secp384_r1"] {
            assert_eq!(BitSecurity::from_curve(curve), Some(BitSecurity::Bits192));
        }
        for curve in ["p521", "secp521_r1"] {
            assert_eq!(BitSecurity::from_curve(curve), Some(BitSecurity::Bits256));
        }
        assert_eq!(BitSecurity::from_curve("brainpool256"), None);
    }

    #[test]
    fn hybrid_curve_follows_strength() {
        assert_eq!(BitSecurity::Bits128.hybrid_curve(), "p256");
        assert_eq!(BitSecurity::Bits192.hybrid_curve(), "p384");
        assert_eq!(BitSecurity::Bits256.hybrid_curve(), "p521");
    }

    #[test]
    fn code_point_parses_hex_and_decimal() {
        assert_eq!(CodePoint::new("0xFE00").value(), Some(65024));
        assert_eq!(CodePoint::new("0XfE01").value(), Some(65025));
        assert_eq!(CodePoint::new("65030").value(), Some(65030));
        assert_eq!(CodePoint::new("fe00").value(), None);
        assert_eq!(CodePoint::new("0xFE00").canonical(), "65024");
        assert_eq!(CodePoint::new("bogus").canonical(), "bogus");
    }

    #[test]
    fn numeric_beyond_u32_is_still_numeric() {
        assert_eq!(CodePoint::new("0x1FFFFFFFF").value(), None);
        assert!(CodePoint::new("0x1FFFFFFFF").is_numeric());
        assert!(CodePoint::new("-1").is_numeric());
        assert!(CodePoint::new("65024").is_numeric());
        assert!(!CodePoint::new("0x").is_numeric());
        assert!(!CodePoint::new("FE00").is_numeric());
        assert!(!CodePoint::new("-").is_numeric());
    }

    #[test]
    fn code_point_deserializes_from_int_or_string() {
        let from_int: CodePoint = serde_json::from_str("65024").expect("int");
        let from_str: CodePoint = serde_json::from_str("\"0xFE00\"").expect("string");
        assert_eq!(from_int.as_str(), "65024");
        assert_eq!(from_str.as_str(), "0xFE00");
        assert_eq!(from_int.value(), from_str.value());
    }

    #[test]
    fn bit_security_serializes_as_number() {
        let json = serde_json::to_string(&BitSecurity::Bits192).expect("serialize");
        assert_eq!(json, "192");
    }

    #[test]
    fn marker_style_from_extension() {
        assert_eq!(MarkerStyle::for_path("README.md"), MarkerStyle::Document);
        assert_eq!(MarkerStyle::for_path("oqsprov/oqsprov.c"), MarkerStyle::Source);
        assert_eq!(MarkerStyle::Document.closing(), " -->");
        assert_eq!(MarkerStyle::Source.closing(), "");
    }
}
