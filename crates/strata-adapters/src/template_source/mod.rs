//! Template sources: where a [`Template`](strata_core::domain::Template) comes from.

mod builtin;
mod directory;

pub use builtin::{BuiltinTemplateSource, TEMPLATE_NAME, TEMPLATE_VERSION};
pub use directory::{DirectoryTemplateSource, MANIFEST_FILE, TemplateManifest};
