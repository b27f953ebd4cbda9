//! Fatal generation errors.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a generation pass.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(
        "unsupported type `{kind}` on required {element} `{member}` of `{namespace}.{owner}`"
    )]
    #[diagnostic(
        code(odatagen::codegen::unsupported_type),
        help("mark the {element} nullable in the metadata so it can be omitted")
    )]
    UnsupportedTypeKind {
        kind: String,
        /// "property", "parameter" or "return type"
        element: &'static str,
        member: String,
        namespace: String,
        owner: String,
    },

    #[error("identifier `{identifier}` is emitted twice in {scope} (second use from `{namespace}.{name}`)")]
    #[diagnostic(
        code(odatagen::codegen::name_collision),
        help("rename one of the schema elements, or remove the ambiguous overload")
    )]
    NameCollision {
        identifier: String,
        scope: String,
        namespace: String,
        name: String,
    },
}
