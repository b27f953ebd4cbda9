//! Emitters for the sections of a service artifact.
//!
//! Every emitter returns fragments; nothing here writes text directly.

mod container;
mod facades;
mod operations;
mod types;

pub use container::container;
pub use facades::resource_set_facades;
pub use operations::operation_structs;
pub use types::namespace_module;

use eyre::Result;
use odatagen_codegen::{mapped::MappedMember, names::Scope, naming::RUST_NAMING};
use odatagen_edm::QualifiedName;

use crate::{
    ast::Field,
    type_mapper::{RustTypeMapper, Site},
};

/// The field for a property or parameter, claimed in `scope`.
fn member_field(
    member: &MappedMember,
    site: Site<'_>,
    scope: &mut Scope,
    owner: &QualifiedName,
) -> Result<Field> {
    let name = RUST_NAMING.member_name(&member.name);
    scope.claim(&name, owner)?;

    let ty = RustTypeMapper.member(member, site);
    let attr = if member.is_optional() {
        format!(
            "serde(rename = \"{}\", default, skip_serializing_if = \"Option::is_none\")",
            member.name
        )
    } else {
        format!("serde(rename = \"{}\")", member.name)
    };
    Ok(Field::new(name, ty).attr(attr))
}
