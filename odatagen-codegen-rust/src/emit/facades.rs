//! Per-resource-set facades: the four operation sets, the `ResourceSet`
//! marker and the type aliases user code names.

use std::collections::HashMap;

use eyre::{Result, eyre};
use odatagen_codegen::{
    builder::{CodeFragment, Renderable},
    names::Scope,
    naming::RUST_NAMING,
    pipeline::GenerationPlan,
};
use odatagen_edm::{OperationKind, QualifiedName, ResourceSet, SchemaGraph};
use tracing::debug;

use crate::{
    ast::{Field, Fn, Impl, Param, Struct, TypeAlias},
    type_mapper::{RustTypeMapper, Site, entity_collection},
};

/// Facades for every resource set, in declared container order.
pub fn resource_set_facades(
    plan: &GenerationPlan,
    root: &mut Scope,
) -> Result<Vec<Vec<CodeFragment>>> {
    let mut items = Vec::new();
    for set in &plan.graph.resource_sets {
        items.extend(set_facades(plan, set, root)?);
    }
    Ok(items)
}

/// Rust identifier of a resource set's marker type.
pub(super) fn set_ident(set: &ResourceSet) -> String {
    RUST_NAMING.type_name(&set.name)
}

fn set_facades(
    plan: &GenerationPlan,
    set: &ResourceSet,
    root: &mut Scope,
) -> Result<Vec<Vec<CodeFragment>>> {
    let graph = &plan.graph;
    let ident = set_ident(set);
    let origin = QualifiedName::new(&set.entity_type.namespace, &set.name);
    let chain = base_chain(graph, &set.entity_type);
    let entity = RustTypeMapper.path(&set.entity_type, Site::Root);

    let bound = |collection: bool, kind: OperationKind| -> Vec<usize> {
        graph
            .operations
            .iter()
            .enumerate()
            .filter(|(_, op)| {
                op.kind == kind
                    && op
                        .binding
                        .as_ref()
                        .is_some_and(|b| b.collection == collection && chain.contains(&&b.entity))
            })
            .map(|(index, _)| index)
            .collect()
    };

    let entity_actions = format!("{}EntityActions", ident);
    let entity_functions = format!("{}EntityFunctions", ident);
    let set_actions = format!("{}EntitySetActions", ident);
    let set_functions = format!("{}EntitySetFunctions", ident);
    let get_operation = format!("{}EntityGetOperation", ident);
    let entity_set = format!("{}EntitySet", ident);
    for name in [
        &ident,
        &entity_actions,
        &entity_functions,
        &set_actions,
        &set_functions,
        &get_operation,
        &entity_set,
    ] {
        root.claim(name, &origin)?;
    }

    let facades = [
        (&entity_actions, false, OperationKind::Action, "Actions bound to one"),
        (&entity_functions, false, OperationKind::Function, "Functions bound to one"),
        (&set_actions, true, OperationKind::Action, "Actions bound to the collection of"),
        (&set_functions, true, OperationKind::Function, "Functions bound to the collection of"),
    ];

    let mut items = Vec::new();
    for (name, collection, kind, doc) in facades {
        let operations = bound(collection, kind);
        debug!(set = %set.name, facade = %name, operations = operations.len(), "emitting facade");
        items.push(operation_set(
            plan,
            name,
            &format!("{} `{}` in `{}`.", doc, set.entity_type, set.name),
            &operations,
        )?);
    }

    let marker = Struct::new(&ident)
        .doc(format!("The `{}` entity set.", set.name))
        .derives(["Debug", "Clone", "Copy"])
        .unit();
    let resource_set = Impl::new(&ident)
        .for_trait("odata::ResourceSet")
        .item(format!("const NAME: &'static str = \"{}\";", set.name))
        .item(format!("type Entity = {};", entity))
        .item(format!("type EntityActions = {};", entity_actions))
        .item(format!("type EntityFunctions = {};", entity_functions))
        .item(format!("type SetActions = {};", set_actions))
        .item(format!("type SetFunctions = {};", set_functions));
    items.push(CodeFragment::separated([
        marker.to_fragments(),
        resource_set.to_fragments(),
    ]));

    let mut aliases = TypeAlias::new(
        &get_operation,
        format!(
            "odata::GetOperation<{}, {}, {}>",
            entity, entity_actions, entity_functions
        ),
    )
    .to_fragments();
    aliases.extend(TypeAlias::new(&entity_set, format!("odata::EntitySet<{}>", ident)).to_fragments());
    items.push(aliases);

    Ok(items)
}

/// `entity` followed by its base types, nearest first.
fn base_chain<'a>(graph: &'a SchemaGraph, entity: &'a QualifiedName) -> Vec<&'a QualifiedName> {
    let mut chain = vec![entity];
    let mut current = graph.entity_type(entity);
    while let Some(base) = current.and_then(|ty| ty.base.as_ref()) {
        if chain.contains(&base) || chain.len() > graph.entity_types.len() {
            break;
        }
        chain.push(base);
        current = graph.entity_type(base);
    }
    chain
}

/// A struct holding an `OperationContext`, implementing `OperationSet`,
/// with one method per operation in `operations`.
pub(super) fn operation_set(
    plan: &GenerationPlan,
    name: &str,
    doc: &str,
    operations: &[usize],
) -> Result<Vec<CodeFragment>> {
    let graph = &plan.graph;
    let mut scope = Scope::new(format!("impl {}", name));

    let mut repeats: HashMap<&str, usize> = HashMap::new();
    for &index in operations {
        if let Some(op) = graph.operations.get(index) {
            *repeats.entry(op.name.name.as_str()).or_default() += 1;
        }
    }

    let mut methods = Vec::new();
    for &index in operations {
        let op = graph
            .operations
            .get(index)
            .ok_or_else(|| eyre!("no operation at index {}", index))?;
        let ident = plan
            .names
            .get(index)
            .ok_or_else(|| eyre!("no resolved name for operation `{}`", op.name))?;

        let method = if repeats.get(op.name.name.as_str()).copied().unwrap_or(0) > 1 {
            RUST_NAMING.member_name(&format!("{}_in_{}", op.name.name, op.name.namespace))
        } else {
            RUST_NAMING.member_name(&op.name.name)
        };
        scope.claim(&method, &op.name)?;

        let call = Fn::new(method)
            .doc(format!("Call `{}`.", op.name))
            .receiver()
            .param(Param::new("parameters", ident));
        let call = match op.kind {
            OperationKind::Action => call
                .returns(format!("odata::ActionOperation<{}>", ident))
                .body_line("self.context.action(parameters)"),
            OperationKind::Function => {
                let returns = plan.mapped.operation(index).and_then(|m| m.returns.as_ref());
                match returns.and_then(entity_collection) {
                    Some(entity) => call
                        .returns(format!(
                            "odata::Result<odata::FunctionSetOperation<{}>>",
                            RustTypeMapper.path(entity, Site::Root)
                        ))
                        .body_line("self.context.function_set(parameters)"),
                    None => call
                        .returns(format!("odata::Result<odata::FunctionOperation<{}>>", ident))
                        .body_line("self.context.function(parameters)"),
                }
            }
        };
        methods.push(call);
    }

    let decl = Struct::new(name)
        .doc(doc)
        .derive("Debug")
        .derive("Clone")
        .field(Field::new("context", "odata::OperationContext").private());
    let operation_set = Impl::new(name).for_trait("odata::OperationSet").method(
        Fn::new("new")
            .private()
            .param(Param::new("settings", "odata::ClientSettings"))
            .param(Param::new("base_url", "String"))
            .returns("Self")
            .body("Self {\n    context: odata::OperationContext::new(settings, base_url),\n}"),
    );

    let mut groups = vec![decl.to_fragments(), operation_set.to_fragments()];
    if !methods.is_empty() {
        groups.push(Impl::new(name).methods(methods).to_fragments());
    }
    Ok(CodeFragment::separated(groups))
}
