//! Tera rendering of fragment bodies.

use tera::{Context, Tera};

use oqsgen_shared::{Catalog, GeneratorError, Result};

use crate::fragments::Fragment;

/// Template context shared by every fragment: the catalog as `config`.
pub fn catalog_context(catalog: &Catalog) -> Result<Context> {
    let config = serde_json::to_value(catalog)
        .map_err(|e| GeneratorError::catalog(format!("cannot serialize catalog: {e}")))?;
    Context::from_value(serde_json::json!({ "config": config }))
        .map_err(|e| GeneratorError::catalog(error_chain(&e)))
}

/// One target's fragments, compiled together so they can include each other.
pub struct FragmentRenderer {
    tera: Tera,
}

impl FragmentRenderer {
    pub fn new(fragments: &[Fragment]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(
            fragments
                .iter()
                .map(|f| (f.identifier.as_str(), f.body.as_str())),
        )
        .map_err(|e| GeneratorError::Template {
            fragment: fragments
                .iter()
                .map(|f| f.identifier.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            message: error_chain(&e),
        })?;
        Ok(Self { tera })
    }

    /// Render one fragment. A single trailing line break is dropped so the
    /// body ends where the fragment's last line of text does.
    pub fn render(&self, identifier: &str, context: &Context) -> Result<String> {
        let mut rendered =
            self.tera
                .render(identifier, context)
                .map_err(|e| GeneratorError::Template {
                    fragment: identifier.to_string(),
                    message: error_chain(&e),
                })?;

        if rendered.ends_with('\n') {
            rendered.pop();
            if rendered.ends_with('\r') {
                rendered.pop();
            }
        }
        Ok(rendered)
    }
}

/// Tera reports the useful detail in its source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
