//! Marker construction and region splicing.

use std::path::Path;

use oqsgen_shared::{GeneratorError, MarkerStyle, Result};

/// How a target's content is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceMode {
    /// Replace region bodies in the target's current content.
    Incremental,
    /// Start from the target's base template and drop end markers.
    FullRewrite,
}

/// Start and end marker text for one fragment in one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
    style: MarkerStyle,
}

impl Markers {
    /// Markers for `identifier`; the identifier is upper-cased in the text.
    pub fn new(delimiter: &str, identifier: &str, style: MarkerStyle) -> Self {
        let id = identifier.to_uppercase();
        Self {
            start: format!(
                "{delimiter} OQS_TEMPLATE_FRAGMENT_{id}_START{}",
                style.closing()
            ),
            end: format!("{delimiter} OQS_TEMPLATE_FRAGMENT_{id}_END"),
            style,
        }
    }

    /// Length of the end-marker line at the start of `postamble`, including
    /// the style's closing text and one line break when present.
    fn end_line_len(&self, postamble: &str) -> usize {
        let mut rest = &postamble[self.end.len()..];
        rest = rest.strip_prefix(self.style.closing()).unwrap_or(rest);
        rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
        postamble.len() - rest.len()
    }
}

/// Replace the region delimited by `markers` in `contents` with `rendered`.
///
/// The start marker is always kept verbatim. In incremental mode the end
/// marker is kept too; in full-rewrite mode its line is removed. `target`
/// only names the file in diagnostics.
pub fn splice(
    contents: &str,
    markers: &Markers,
    rendered: &str,
    mode: SpliceMode,
    target: &Path,
) -> Result<String> {
    let missing = |marker: &str| GeneratorError::MissingMarker {
        target: target.to_path_buf(),
        marker: marker.to_string(),
    };

    let start = contents
        .find(&markers.start)
        .ok_or_else(|| missing(&markers.start))?;
    let body_start = start + markers.start.len();
    let end = contents[body_start..]
        .find(&markers.end)
        .map(|offset| body_start + offset)
        .ok_or_else(|| missing(&markers.end))?;

    let preamble = &contents[..start];
    let mut postamble = &contents[end..];
    if mode == SpliceMode::FullRewrite {
        postamble = &postamble[markers.end_line_len(postamble)..];
    }

    let mut out =
        String::with_capacity(preamble.len() + markers.start.len() + rendered.len() + postamble.len());
    out.push_str(preamble);
    out.push_str(&markers.start);
    out.push_str(rendered);
    out.push_str(postamble);
    Ok(out)
}
