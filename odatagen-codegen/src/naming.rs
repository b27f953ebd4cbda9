//! Naming conventions for generated client code.

use odatagen_core::{to_pascal_case, to_snake_case};

/// Language-specific naming conventions.
///
/// Defines how schema names become type, file and member names, and how
/// reserved words are escaped.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform a schema name to a type name (e.g., "sales_order" -> "SalesOrder")
    pub type_case: fn(&str) -> String,
    /// Transform a namespace to a file stem (e.g., "Sales.Core" -> "sales_core")
    pub file_case: fn(&str) -> String,
    /// Transform a property or operation name to a member name
    pub member_case: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g., "type" -> "r#type" in Rust)
    pub escape_reserved: fn(&str) -> String,
}

impl NamingConvention {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.type_case)(name);
        self.safe_name(&transformed)
    }

    /// Transform for use as a file stem. File names are never escaped.
    pub fn file_name(&self, name: &str) -> String {
        (self.file_case)(name)
    }

    /// Transform and make safe for use as a field or method name.
    pub fn member_name(&self, name: &str) -> String {
        let transformed = (self.member_case)(name);
        self.safe_name(&transformed)
    }

    /// Module name for a schema namespace: the namespace with dots replaced
    /// by underscores, case preserved.
    pub fn module_name(&self, namespace: &str) -> String {
        self.safe_name(&namespace.replace('.', "_"))
    }
}

fn escape_rust_reserved(name: &str) -> String {
    match name {
        // Path keywords cannot be raw identifiers.
        "self" | "Self" | "super" | "crate" => format!("{}_", name),
        _ => format!("r#{}", name),
    }
}

/// Rust naming conventions.
pub const RUST_NAMING: NamingConvention = NamingConvention {
    type_case: to_pascal_case,
    file_case: to_snake_case,
    member_case: to_snake_case,
    reserved_words: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
        "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
        "gen",
    ],
    escape_reserved: escape_rust_reserved,
};
