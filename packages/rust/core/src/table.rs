//! Markdown overview of code points and OIDs.

use std::fmt::Write;

use oqsgen_shared::Catalog;

/// Render the catalog's groups and signatures as two Markdown tables.
pub fn render_table(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("| Group | Code point | Hybrids | OID | Bits |\n");
    out.push_str("|-------|------------|---------|-----|------|\n");
    for kem in &catalog.kems {
        let hybrids = kem
            .hybrids
            .iter()
            .map(|h| format!("{} {}", h.hybrid_group, h.nid))
            .collect::<Vec<_>>()
            .join(", ");
        let bits = kem
            .bit_security
            .map(|b| b.to_string())
            .unwrap_or_else(|| "?".into());
        let iana = if kem.iana { " (IANA)" } else { "" };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "| {} | {}{iana} | {hybrids} | {} | {bits} |",
            kem.group_name, kem.nid, kem.oid
        );
    }

    out.push('\n');
    out.push_str("| Family | Signature | OID | Bits | Enabled |\n");
    out.push_str("|--------|-----------|-----|------|---------|\n");
    for family in &catalog.sigs {
        for sig in &family.variants {
            let enabled = if sig.enabled { "yes" } else { "no" };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {enabled} |",
                family.family, sig.name, sig.oid, sig.security
            );
        }
    }

    out
}
