//! Enumerations, complex types and entity types of one namespace.

use eyre::{Result, bail};
use odatagen_codegen::{
    builder::{CodeFragment, Renderable},
    mapped::MappedStructure,
    names::Scope,
    naming::RUST_NAMING,
    pipeline::GenerationPlan,
};
use odatagen_edm::{EnumType, QualifiedName};
use tracing::debug;

use super::member_field;
use crate::{
    ast::{Enum, Field, Fn, Impl, Module, Param, Struct, Variant},
    rust_file::Use,
    type_mapper::{RustTypeMapper, Site, type_ident},
};

const VALUE_DERIVES: [&str; 5] = [
    "Debug",
    "Clone",
    "PartialEq",
    "serde::Serialize",
    "serde::Deserialize",
];

/// A complex or entity type ready for emission.
struct Structure<'a> {
    name: &'a QualifiedName,
    base: Option<&'a QualifiedName>,
    is_abstract: bool,
    key: Option<&'a [String]>,
    mapped: &'a MappedStructure,
}

/// `pub mod <Namespace> { ... }` with every type declared in `namespace`.
///
/// Enumerations come first, then complex types, then entity types; each
/// group is sorted by simple name.
pub fn namespace_module(plan: &GenerationPlan, namespace: &str) -> Result<Module> {
    let graph = &plan.graph;
    let mut scope = Scope::new(format!("module {}", RUST_NAMING.module_name(namespace)));

    let mut enums: Vec<&EnumType> = graph
        .enums
        .values()
        .filter(|e| e.name.is_in(namespace))
        .collect();
    enums.sort_by(|a, b| a.name.name.cmp(&b.name.name));

    let mut complex: Vec<Structure<'_>> = Vec::new();
    for ty in graph.complex_types.values().filter(|t| t.name.is_in(namespace)) {
        complex.push(Structure {
            name: &ty.name,
            base: ty.base.as_ref(),
            is_abstract: ty.is_abstract,
            key: None,
            mapped: mapped_structure(plan, &ty.name)?,
        });
    }
    complex.sort_by(|a, b| a.name.name.cmp(&b.name.name));

    let mut entities: Vec<Structure<'_>> = Vec::new();
    for ty in graph.entity_types.values().filter(|t| t.name.is_in(namespace)) {
        entities.push(Structure {
            name: &ty.name,
            base: ty.base.as_ref(),
            is_abstract: ty.is_abstract,
            key: Some(graph.effective_key(ty)),
            mapped: mapped_structure(plan, &ty.name)?,
        });
    }
    entities.sort_by(|a, b| a.name.name.cmp(&b.name.name));

    debug!(
        namespace,
        enums = enums.len(),
        complex = complex.len(),
        entities = entities.len(),
        "emitting namespace module"
    );

    let mut module = Module::new(RUST_NAMING.module_name(namespace))
        .item(&Use::new("super::odata"));
    for ty in enums {
        scope.claim(&type_ident(&ty.name), &ty.name)?;
        module = module.item(&enum_type(ty)?);
    }
    for ty in complex.iter().chain(&entities) {
        scope.claim(&type_ident(ty.name), ty.name)?;
        module = module.item(&structure(ty)?);
    }
    Ok(module)
}

fn mapped_structure<'a>(plan: &'a GenerationPlan, name: &QualifiedName) -> Result<&'a MappedStructure> {
    match plan.mapped.structure(name) {
        Some(mapped) => Ok(mapped),
        None => bail!("no type mapping for `{}`", name),
    }
}

fn enum_type(ty: &EnumType) -> Result<Vec<CodeFragment>> {
    let ident = type_ident(&ty.name);
    let mut scope = Scope::new(format!("enum {}", ident));

    let mut doc = format!("`{}`", ty.name);
    if ty.is_flags {
        doc.push_str("\n\nDeclared as flags; each variant is one flag value.");
    }
    let mut decl = Enum::new(&ident).doc(doc).derives([
        "Debug",
        "Clone",
        "Copy",
        "PartialEq",
        "Eq",
        "Hash",
        "serde::Serialize",
        "serde::Deserialize",
    ]);
    if !ty.members.is_empty() {
        decl = decl.attr("repr(i64)");
    }

    let mut arms = Vec::new();
    for member in &ty.members {
        let variant = RUST_NAMING.type_name(&member.name);
        scope.claim(&variant, &ty.name)?;
        let mut v = Variant::new(&variant).discriminant(member.value);
        if variant != member.name {
            v = v.attr(format!("serde(rename = \"{}\")", member.name));
        }
        decl = decl.variant(v);
        arms.push(format!("Self::{} => \"{}\",", variant, member.name));
    }

    let as_str = if arms.is_empty() {
        Fn::new("as_str")
            .doc("The member name as declared in the schema.")
            .receiver()
            .returns("&'static str")
            .body_line("match *self {}")
    } else {
        let mut body = vec!["match self {".to_string()];
        body.extend(arms.iter().map(|arm| format!("    {}", arm)));
        body.push("}".to_string());
        Fn::new("as_str")
            .doc("The member name as declared in the schema.")
            .receiver()
            .returns("&'static str")
            .body(body.join("\n"))
    };

    let literal = Fn::new("to_literal")
        .private()
        .receiver()
        .returns("String")
        .body_line(format!("format!(\"{}'{{}}'\", self.as_str())", ty.name));

    let mut fragments = decl.to_fragments();
    fragments.push(CodeFragment::blank());
    fragments.extend(Impl::new(&ident).method(as_str).to_fragments());
    fragments.push(CodeFragment::blank());
    fragments.extend(
        Impl::new(&ident)
            .for_trait("odata::ToLiteral")
            .method(literal)
            .to_fragments(),
    );
    Ok(fragments)
}

fn structure(ty: &Structure<'_>) -> Result<Vec<CodeFragment>> {
    let ident = type_ident(ty.name);
    let site = Site::Namespace(&ty.name.namespace);
    let mut scope = Scope::new(format!("struct {}", ident));

    let mut doc = format!("`{}`", ty.name);
    if ty.is_abstract {
        doc.push_str(" (abstract)");
    }
    let mut decl = Struct::new(&ident).doc(doc).derives(VALUE_DERIVES);

    let base = ty.base.map(|base| RustTypeMapper.path(base, site));
    if let Some(base) = &base {
        scope.claim("base", ty.name)?;
        decl = decl.field(Field::new("base", base).attr("serde(flatten)"));
    }
    for member in ty.mapped.properties.iter().chain(&ty.mapped.navigation) {
        decl = decl.field(member_field(member, site, &mut scope, ty.name)?);
    }

    let mut items = vec![decl.to_fragments()];

    if let Some(base) = &base {
        items.push(
            Impl::new(&ident)
                .for_trait("std::ops::Deref")
                .item(format!("type Target = {};", base))
                .method(
                    Fn::new("deref")
                        .private()
                        .receiver()
                        .returns("&Self::Target")
                        .body_line("&self.base"),
                )
                .to_fragments(),
        );
        items.push(
            Impl::new(&ident)
                .for_trait("std::ops::DerefMut")
                .method(
                    Fn::new("deref_mut")
                        .private()
                        .param(Param::new("&mut self", ""))
                        .returns("&mut Self::Target")
                        .body_line("&mut self.base"),
                )
                .to_fragments(),
        );
    }

    items.push(
        Impl::new(&ident)
            .for_trait("odata::StructuredType")
            .item(format!(
                "const NAMESPACE: &'static str = \"{}\";",
                ty.name.namespace
            ))
            .item(format!("const NAME: &'static str = \"{}\";", ty.name.name))
            .to_fragments(),
    );

    if let Some(key) = ty.key {
        let names: Vec<String> = key.iter().map(|k| format!("\"{}\"", k)).collect();
        items.push(
            Impl::new(&ident)
                .for_trait("odata::EntityType")
                .item(format!(
                    "const KEY: &'static [&'static str] = &[{}];",
                    names.join(", ")
                ))
                .to_fragments(),
        );
    }

    Ok(CodeFragment::separated(items))
}

#[cfg(test)]
mod tests {
    use odatagen_edm::EnumMember;

    use super::*;
    use crate::ast::render;

    fn status() -> EnumType {
        EnumType {
            name: QualifiedName::new("Sales", "OrderStatus"),
            members: vec![
                EnumMember {
                    name: "Open".to_string(),
                    value: 0,
                },
                EnumMember {
                    name: "in_transit".to_string(),
                    value: 4,
                },
            ],
            is_flags: false,
        }
    }

    #[test]
    fn test_enum_type() {
        let out = render(&enum_type(&status()).unwrap());
        insta::assert_snapshot!(out, @r###"
        /// `Sales.OrderStatus`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr(i64)]
        pub enum OrderStatus {
            Open = 0,
            #[serde(rename = "in_transit")]
            InTransit = 4,
        }

        impl OrderStatus {
            /// The member name as declared in the schema.
            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::Open => "Open",
                    Self::InTransit => "in_transit",
                }
            }
        }

        impl odata::ToLiteral for OrderStatus {
            fn to_literal(&self) -> String {
                format!("Sales.OrderStatus'{}'", self.as_str())
            }
        }
        "###);
    }

    #[test]
    fn test_empty_enum_matches_never() {
        let empty = EnumType {
            members: Vec::new(),
            ..status()
        };
        let out = render(&enum_type(&empty).unwrap());
        assert!(out.contains("pub enum OrderStatus {}"));
        assert!(out.contains("match *self {}"));
        assert!(!out.contains("repr(i64)"));
    }

    #[test]
    fn test_colliding_variants_are_fatal() {
        let ty = EnumType {
            members: vec![
                EnumMember {
                    name: "open".to_string(),
                    value: 0,
                },
                EnumMember {
                    name: "Open".to_string(),
                    value: 1,
                },
            ],
            ..status()
        };
        let err = enum_type(&ty).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<odatagen_codegen::Error>(),
            Some(odatagen_codegen::Error::NameCollision { .. })
        ));
    }
}
