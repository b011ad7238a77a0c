//! The uniform syntactic model every language frontend emits.
//!
//! Language-specific flags (suspend, data, reified, sealed, inline...)
//! attach as optional booleans on the common shapes below; a frontend that
//! never produces a given flag simply leaves it `None`/`false`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Kotlin,
    Java,
    TypeScript,
    JavaScript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Kotlin => "kotlin",
            Language::Java => "java",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
        }
    }

    /// Map a file extension to the language that owns it, or `None` for
    /// anything outside the four supported frontends.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "kt" | "kts" => Some(Language::Kotlin),
            "java" => Some(Language::Java),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line_start: u32,
    pub col_start: u32,
    pub line_end: u32,
    pub col_end: u32,
}

impl SourceLocation {
    pub fn point(file_path: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line_start: line,
            col_start: col,
            line_end: line,
            col_end: col,
        }
    }

    pub fn lines(file_path: impl Into<String>, line_start: u32, line_end: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line_start,
            col_start: 0,
            line_end,
            col_end: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Import {
    pub module_specifier: String,
    pub imported_name: Option<String>,
    pub alias: Option<String>,
    pub is_wildcard: bool,
    pub is_type_only: bool,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reexport {
    pub source_specifier: String,
    pub original_name: Option<String>,
    pub exported_name: Option<String>,
    pub is_namespace: bool,
    pub is_wildcard: bool,
    pub is_type_only: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassModifiers {
    pub is_abstract: bool,
    pub is_data: bool,
    pub is_sealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedClass {
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modifiers: ClassModifiers,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<String>,
    pub properties: Vec<ParsedProperty>,
    pub functions: Vec<ParsedFunction>,
    pub nested_classes: Vec<ParsedClass>,
    pub companion: Option<Box<ParsedClass>>,
    pub companion_name: Option<String>,
    pub secondary_constructors: Vec<Vec<ParsedParameter>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionModifiers {
    pub is_abstract: bool,
    pub is_suspend: bool,
    pub is_inline: bool,
    pub is_infix: bool,
    pub is_operator: bool,
    pub is_extension: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFunction {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<ParsedParameter>,
    pub return_type: Option<String>,
    pub receiver_type: Option<String>,
    pub modifiers: FunctionModifiers,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<String>,
    pub calls: Vec<ParsedCall>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedProperty {
    pub name: String,
    pub visibility: Visibility,
    pub declared_type: Option<String>,
    pub is_immutable: bool,
    pub initializer: Option<String>,
    pub annotations: Vec<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionTypeDescriptor {
    pub parameter_types: Vec<String>,
    pub return_type: Option<String>,
    pub is_suspend: bool,
    pub receiver_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedParameter {
    pub name: String,
    pub param_type: Option<String>,
    pub has_default: bool,
    pub function_type: Option<FunctionTypeDescriptor>,
    pub is_noinline: bool,
    pub is_crossinline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTypeAlias {
    pub name: String,
    pub visibility: Visibility,
    pub aliased_type: String,
    pub type_parameters: Vec<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDestructuringDeclaration {
    pub component_names: Vec<String>,
    pub component_types: Vec<Option<String>>,
    pub is_immutable: bool,
    pub initializer: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedObjectExpression {
    pub super_types: Vec<String>,
    pub properties: Vec<ParsedProperty>,
    pub functions: Vec<ParsedFunction>,
    pub location: SourceLocation,
}

impl ParsedObjectExpression {
    /// Anonymous identity is the source position; see DESIGN.md.
    pub fn anonymous_fqn(&self, enclosing_package: &str) -> String {
        format!(
            "{}.<anonymous>@{}",
            enclosing_package, self.location.line_start
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCall {
    pub callee_name: String,
    pub receiver_expr: Option<String>,
    pub receiver_type: Option<String>,
    pub argument_count: usize,
    pub argument_type_hints: Vec<Option<String>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFile {
    pub file_path: String,
    pub language: Language,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub classes: Vec<ParsedClass>,
    pub functions: Vec<ParsedFunction>,
    pub properties: Vec<ParsedProperty>,
    pub type_aliases: Vec<ParsedTypeAlias>,
    pub destructuring_declarations: Vec<ParsedDestructuringDeclaration>,
    pub object_expressions: Vec<ParsedObjectExpression>,
    pub reexports: Vec<Reexport>,
}

impl ParsedFile {
    pub fn new(file_path: impl Into<String>, language: Language) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            package: None,
            imports: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            type_aliases: Vec::new(),
            destructuring_declarations: Vec::new(),
            object_expressions: Vec::new(),
            reexports: Vec::new(),
        }
    }
}
