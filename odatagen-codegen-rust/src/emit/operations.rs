//! One parameter struct per action and function.

use eyre::{Result, eyre};
use odatagen_codegen::{
    builder::{CodeFragment, Renderable},
    mapped::MappedOperation,
    names::Scope,
    naming::RUST_NAMING,
    pipeline::GenerationPlan,
};
use odatagen_edm::{Operation, OperationKind};

use super::member_field;
use crate::{
    ast::{Fn, Impl, Struct},
    type_mapper::{RustTypeMapper, Site},
};

/// Parameter structs for every operation, sorted by resolved identifier.
pub fn operation_structs(plan: &GenerationPlan) -> Result<Vec<Vec<CodeFragment>>> {
    let mut resolved: Vec<(usize, &str)> = plan.names.iter().collect();
    resolved.sort_by(|a, b| a.1.cmp(b.1));

    resolved
        .into_iter()
        .map(|(index, ident)| {
            let operation = plan
                .graph
                .operations
                .get(index)
                .ok_or_else(|| eyre!("no operation at index {}", index))?;
            let mapped = plan
                .mapped
                .operation(index)
                .ok_or_else(|| eyre!("no type mapping for operation `{}`", operation.name))?;
            operation_struct(ident, operation, mapped)
        })
        .collect()
}

fn operation_struct(
    ident: &str,
    operation: &Operation,
    mapped: &MappedOperation,
) -> Result<Vec<CodeFragment>> {
    let mut scope = Scope::new(format!("struct {}", ident));
    let (kind, trait_name) = match operation.kind {
        OperationKind::Action => ("Action", "odata::Action"),
        OperationKind::Function => ("Function", "odata::Function"),
    };
    let binding = match &operation.binding {
        Some(b) if b.collection => format!(", bound to a collection of `{}`", b.entity),
        Some(b) => format!(", bound to `{}`", b.entity),
        None => String::new(),
    };

    let mut decl = Struct::new(ident)
        .doc(format!("{} `{}`{}.", kind, operation.name, binding))
        .derives(["Debug", "Clone", "PartialEq", "serde::Serialize"]);
    for parameter in &mapped.parameters {
        decl = decl.field(member_field(parameter, Site::Root, &mut scope, &operation.name)?);
    }

    let mut imp = Impl::new(ident)
        .for_trait(trait_name)
        .item(format!("const NAME: &'static str = \"{}\";", operation.name))
        .item(format!(
            "type Output = {};",
            RustTypeMapper.output(mapped.returns.as_ref(), Site::Root)
        ));
    if operation.kind == OperationKind::Function {
        imp = imp.method(function_parameters(mapped));
    }

    Ok(CodeFragment::separated([
        decl.to_fragments(),
        imp.to_fragments(),
    ]))
}

/// `parameters()` of a function: scalars and enumerations as literals,
/// structured values and collections as JSON.
fn function_parameters(mapped: &MappedOperation) -> Fn {
    let method = Fn::new("parameters")
        .private()
        .receiver()
        .returns("odata::Result<Vec<(&'static str, odata::Literal)>>");
    if mapped.parameters.is_empty() {
        return method.body_line("Ok(Vec::new())");
    }

    let mut body = vec!["Ok(vec![".to_string()];
    for parameter in &mapped.parameters {
        let field = RUST_NAMING.member_name(&parameter.name);
        let value = if parameter.target.is_array() || parameter.target.is_structured() {
            format!("odata::Literal::json(&self.{})?", field)
        } else {
            format!("odata::Literal::of(&self.{})", field)
        };
        body.push(format!("    (\"{}\", {}),", parameter.name, value));
    }
    body.push("])".to_string());
    method.body(body.join("\n"))
}

#[cfg(test)]
mod tests {
    use odatagen_codegen::{
        mapped::MappedMember,
        type_mapper::{MappedType, NamedKind, Scalar, TargetType},
    };
    use odatagen_edm::{BindingTarget, QualifiedName};

    use super::*;
    use crate::ast::render;

    fn member(name: &str, target: TargetType, nullable: bool) -> MappedMember {
        MappedMember {
            name: name.to_string(),
            target,
            optional: false,
            nullable,
        }
    }

    fn order_total() -> (Operation, MappedOperation) {
        let operation = Operation {
            name: QualifiedName::new("Sales", "OrderTotal"),
            kind: OperationKind::Function,
            binding: Some(BindingTarget {
                parameter: "order".to_string(),
                entity: QualifiedName::new("Sales", "Order"),
                collection: false,
            }),
            parameters: Vec::new(),
            return_type: None,
        };
        let mapped = MappedOperation {
            parameters: vec![member(
                "IncludeTax",
                TargetType::Scalar(Scalar::Boolean),
                false,
            )],
            returns: Some(MappedType {
                target: TargetType::Scalar(Scalar::Number),
                optional: true,
            }),
        };
        (operation, mapped)
    }

    #[test]
    fn test_function_struct() {
        let (operation, mapped) = order_total();
        let out = render(
            &operation_struct("OrderTotalInSalesOnOrderInSales", &operation, &mapped).unwrap(),
        );
        insta::assert_snapshot!(out, @r###"
        /// Function `Sales.OrderTotal`, bound to `Sales.Order`.
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        pub struct OrderTotalInSalesOnOrderInSales {
            #[serde(rename = "IncludeTax")]
            pub include_tax: bool,
        }

        impl odata::Function for OrderTotalInSalesOnOrderInSales {
            const NAME: &'static str = "Sales.OrderTotal";
            type Output = Option<odata::SingleValue<f64>>;

            fn parameters(&self) -> odata::Result<Vec<(&'static str, odata::Literal)>> {
                Ok(vec![
                    ("IncludeTax", odata::Literal::of(&self.include_tax)),
                ])
            }
        }
        "###);
    }

    #[test]
    fn test_action_without_parameters() {
        let operation = Operation {
            name: QualifiedName::new("Sales", "ResetAll"),
            kind: OperationKind::Action,
            binding: None,
            parameters: Vec::new(),
            return_type: None,
        };
        let out = render(
            &operation_struct("ResetAllInSales", &operation, &MappedOperation::default()).unwrap(),
        );
        assert!(out.contains("pub struct ResetAllInSales {}"));
        assert!(out.contains("impl odata::Action for ResetAllInSales {"));
        assert!(out.contains("type Output = ();"));
        assert!(!out.contains("fn parameters"));
    }

    #[test]
    fn test_structured_parameters_use_json_literals() {
        let mapped = MappedOperation {
            parameters: vec![
                member(
                    "Status",
                    TargetType::Named {
                        name: QualifiedName::new("Sales", "OrderStatus"),
                        kind: NamedKind::Enum,
                    },
                    false,
                ),
                member(
                    "Address",
                    TargetType::Named {
                        name: QualifiedName::new("Sales", "Address"),
                        kind: NamedKind::Complex,
                    },
                    true,
                ),
                member(
                    "Tags",
                    TargetType::Array(Box::new(TargetType::Scalar(Scalar::Text))),
                    false,
                ),
            ],
            returns: None,
        };
        let out = render(&function_parameters(&mapped));
        assert!(out.contains("(\"Status\", odata::Literal::of(&self.status)),"));
        assert!(out.contains("(\"Address\", odata::Literal::json(&self.address)?),"));
        assert!(out.contains("(\"Tags\", odata::Literal::json(&self.tags)?),"));
    }

    #[test]
    fn test_parameter_collision_is_fatal() {
        let (operation, mut mapped) = order_total();
        mapped.parameters.push(member(
            "include_tax",
            TargetType::Scalar(Scalar::Boolean),
            false,
        ));
        let err = operation_struct("X", &operation, &mapped).unwrap_err();
        assert!(err.to_string().contains("include_tax"));
    }
}
