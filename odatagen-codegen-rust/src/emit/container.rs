//! The root container: entity-set fields, the type registry and unbound
//! operations.

use std::collections::HashMap;

use eyre::Result;
use odatagen_codegen::{
    builder::{CodeFragment, Renderable},
    names::Scope,
    naming::RUST_NAMING,
    pipeline::GenerationPlan,
};
use odatagen_edm::{OperationKind, QualifiedName};

use super::facades::{operation_set, set_ident};
use crate::ast::{Field, Fn, Impl, Param, Struct};

/// `{Context}`, `{Context}ODataTypes`, `{Context}ContainerActions` and
/// `{Context}ContainerFunctions`.
pub fn container(plan: &GenerationPlan, root: &mut Scope) -> Result<Vec<Vec<CodeFragment>>> {
    let context = &plan.target.context_name;
    let origin = QualifiedName::new(&plan.target.namespace, context);
    let types = format!("{}ODataTypes", context);
    let actions = format!("{}ContainerActions", context);
    let functions = format!("{}ContainerFunctions", context);
    for name in [context, &types, &actions, &functions] {
        root.claim(name, &origin)?;
    }

    let unbound = |kind: OperationKind| -> Vec<usize> {
        plan.graph
            .operations
            .iter()
            .enumerate()
            .filter(|(_, op)| op.binding.is_none() && op.kind == kind)
            .map(|(index, _)| index)
            .collect()
    };

    Ok(vec![
        root_struct(plan, context, &types, &actions, &functions, &origin)?,
        type_registry(plan, &types)?,
        operation_set(
            plan,
            &actions,
            &format!("Unbound actions of `{}`.", context),
            &unbound(OperationKind::Action),
        )?,
        operation_set(
            plan,
            &functions,
            &format!("Unbound functions of `{}`.", context),
            &unbound(OperationKind::Function),
        )?,
    ])
}

fn root_struct(
    plan: &GenerationPlan,
    context: &str,
    types: &str,
    actions: &str,
    functions: &str,
    origin: &QualifiedName,
) -> Result<Vec<CodeFragment>> {
    let mut scope = Scope::new(format!("struct {}", context));
    scope.claim("settings", origin)?;

    let mut sets: Vec<(String, String)> = Vec::new();
    for set in &plan.graph.resource_sets {
        let field = RUST_NAMING.member_name(&set.name);
        scope.claim(&field, &QualifiedName::new(&set.entity_type.namespace, &set.name))?;
        sets.push((field, format!("{}EntitySet", set_ident(set))));
    }
    sets.sort();

    let decl = Struct::new(context)
        .doc(format!(
            "Entry point of the `{}` service.",
            plan.target.namespace
        ))
        .derives(["Debug", "Clone"])
        .field(Field::new("settings", "odata::ClientSettings").private())
        .fields(sets.iter().map(|(field, ty)| Field::new(field, ty)));

    let mut init = vec!["Self {".to_string()];
    for (field, _) in &sets {
        init.push(format!(
            "    {}: odata::EntitySet::new(settings.clone()),",
            field
        ));
    }
    init.push("    settings,".to_string());
    init.push("}".to_string());

    let operations = "odata::OperationSet::new(self.settings.clone(), self.settings.base_url().to_string())";
    let methods = Impl::new(context)
        .method(
            Fn::new("new")
                .param(Param::new("settings", "odata::ClientSettings"))
                .returns("Self")
                .body(init.join("\n")),
        )
        .method(
            Fn::new("settings")
                .receiver()
                .returns("&odata::ClientSettings")
                .body_line("&self.settings"),
        )
        .method(
            Fn::new("odata_types")
                .doc("Qualified names of every structured type, for `@odata.type`.")
                .receiver()
                .returns(types)
                .body_line(types),
        )
        .method(
            Fn::new("actions")
                .doc("Unbound actions.")
                .receiver()
                .returns(actions)
                .body_line(operations),
        )
        .method(
            Fn::new("functions")
                .doc("Unbound functions.")
                .receiver()
                .returns(functions)
                .body_line(operations),
        );

    Ok(CodeFragment::separated([
        decl.to_fragments(),
        methods.to_fragments(),
    ]))
}

/// One `const fn` per complex and entity type, returning its `TypeName`.
///
/// Methods are `snake_case(type)`; a simple name declared in more than one
/// namespace gets `_in_<namespace>` on every occurrence.
fn type_registry(plan: &GenerationPlan, name: &str) -> Result<Vec<CodeFragment>> {
    let graph = &plan.graph;
    let structured: Vec<&QualifiedName> = graph
        .complex_types
        .keys()
        .chain(graph.entity_types.keys())
        .collect();

    let mut repeats: HashMap<&str, usize> = HashMap::new();
    for ty in &structured {
        *repeats.entry(ty.name.as_str()).or_default() += 1;
    }

    let mut scope = Scope::new(format!("impl {}", name));
    let mut entries = Vec::new();
    for ty in structured {
        let method = if repeats.get(ty.name.as_str()).copied().unwrap_or(0) > 1 {
            RUST_NAMING.member_name(&format!("{}_in_{}", ty.name, ty.namespace))
        } else {
            RUST_NAMING.member_name(&ty.name)
        };
        scope.claim(&method, ty)?;
        entries.push((method, ty));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let decl = Struct::new(name)
        .doc("Type names of the service's complex and entity types.")
        .derives(["Debug", "Clone", "Copy", "Default"])
        .unit();
    let methods = entries.into_iter().map(|(method, ty)| {
        Fn::new(method)
            .const_()
            .receiver()
            .returns("odata::TypeName")
            .body_line(format!(
                "odata::TypeName::new(\"{}\", \"{}\")",
                ty.namespace, ty.name
            ))
    });

    Ok(CodeFragment::separated([
        decl.to_fragments(),
        Impl::new(name).methods(methods).to_fragments(),
    ]))
}
