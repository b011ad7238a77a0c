//! Per-language tree-sitter query sources, embedded the way the teacher's
//! `keel-parsers/src/queries/mod.rs` embeds its `.scm` files.

use symgraph_core::model::Language;

pub const TYPESCRIPT: &str = include_str!("typescript.scm");
pub const JAVASCRIPT: &str = include_str!("javascript.scm");
pub const JAVA: &str = include_str!("java.scm");
pub const KOTLIN: &str = include_str!("kotlin.scm");

pub fn query_for_language(language: Language) -> &'static str {
    match language {
        Language::TypeScript => TYPESCRIPT,
        Language::JavaScript => JAVASCRIPT,
        Language::Java => JAVA,
        Language::Kotlin => KOTLIN,
    }
}
