pub mod common;
pub mod generated_tree;
pub mod template;

pub use common::{Permissions, RelativePath};
pub use generated_tree::{GeneratedFile, GeneratedTree};
pub use template::{
    ContentSource, Template, TemplateBuilder, TemplateContent, TemplateFile, TemplateId,
    TemplateMetadata,
};
