//! Tests for the emitted Rust client.

use odatagen_codegen::pipeline::{GenerationPlan, Pipeline, ServiceTarget};
use odatagen_codegen_rust::Generator;
use odatagen_core::LanguageCodegen;
use odatagen_edm::SchemaGraph;
use tempfile::TempDir;

const SALES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../odatagen-edm/tests/fixtures/sales.xml"
));

fn plan(xml: &str, namespace: &str, context: Option<&str>) -> eyre::Result<GenerationPlan> {
    let graph = SchemaGraph::from_csdl(xml, "test.xml")?;
    let target = ServiceTarget::new(namespace, context.map(str::to_string));
    Pipeline::new().run(graph, target)?.into_plan()
}

fn sales_artifact() -> String {
    let plan = plan(SALES, "Sales", Some("SalesService")).unwrap();
    let files = Generator::new(vec![plan]).preview().unwrap();
    files
        .into_iter()
        .find(|f| f.path == "sales.rs")
        .expect("sales.rs is generated")
        .content
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in artifact"))
}

fn schema(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Inventory" xmlns="http://docs.oasis-open.org/odata/ns/edm">
{body}
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#
    )
}

#[test]
fn test_preview_lists_artifact_and_mod() {
    let plan = plan(SALES, "Sales", None).unwrap();
    let files = Generator::new(vec![plan]).preview().unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["sales.rs", "mod.rs"]);

    let module = &files[1].content;
    insta::assert_snapshot!(module, @r###"
    // Code generated by odatagen. DO NOT EDIT.

    pub mod odata;

    pub mod sales;
    "###);
}

#[test]
fn test_artifact_preamble() {
    let artifact = sales_artifact();
    assert!(artifact.starts_with(
        "// Code generated by odatagen. DO NOT EDIT.\n\n#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, clippy::all)]\n\nuse super::odata;\n"
    ));
}

#[test]
fn test_sections_are_ordered() {
    let artifact = sales_artifact();

    let ops_module = position(&artifact, "pub mod Ops {");
    let sales_module = position(&artifact, "pub mod Sales {");
    let first_operation = position(&artifact, "pub struct ActivateInSalesOnOrderInSales {");
    let last_operation = position(&artifact, "pub struct TopCustomersInSales {");
    let customers = position(&artifact, "pub struct CustomersEntityActions {");
    let accounts = position(&artifact, "pub struct AccountsEntityActions {");
    let container = position(&artifact, "pub struct SalesService {");

    assert!(ops_module < sales_module);
    assert!(sales_module < first_operation);
    assert!(first_operation < last_operation);
    assert!(last_operation < customers);
    // Facades follow the container's declared order.
    assert!(customers < accounts);
    assert!(accounts < container);
}

#[test]
fn test_namespace_types() {
    let artifact = sales_artifact();

    // Enumerations come first and keep explicit values.
    assert!(position(&artifact, "pub enum OrderStatus {") < position(&artifact, "pub struct Address {"));
    assert!(artifact.contains("        Open = 0,\n        Shipped = 1,\n        Cancelled = 9,\n"));
    assert!(artifact.contains("format!(\"Sales.OrderStatus'{}'\", self.as_str())"));

    // Complex types before entity types, each group sorted by name.
    let address = position(&artifact, "pub struct Address {");
    let order_line = position(&artifact, "pub struct OrderLine {");
    let customer = position(&artifact, "pub struct Customer {\n        #[serde(flatten)]");
    let order = position(&artifact, "pub struct Order {");
    let party = position(&artifact, "pub struct Party {");
    assert!(address < order_line);
    assert!(order_line < customer);
    assert!(customer < order);
    assert!(order < party);

    // Inheritance flattens the base and derefs to it.
    assert!(artifact.contains("        #[serde(flatten)]\n        pub base: Party,\n"));
    assert!(artifact.contains("    impl std::ops::Deref for Customer {\n        type Target = Party;"));

    assert!(artifact.contains("        #[serde(rename = \"Name\")]\n        pub name: String,\n"));
    assert!(artifact.contains("pub address: Option<Box<Address>>,"));
    assert!(artifact.contains("        #[serde(rename = \"Tags\")]\n        pub tags: Vec<String>,\n"));
    assert!(artifact.contains("pub since: Option<odata::DateValue>,"));
    assert!(artifact.contains("pub orders: Option<Vec<Order>>,"));
    assert!(artifact.contains("pub status: OrderStatus,"));
    assert!(artifact.contains("pub customer: Option<Box<Customer>>,"));
    assert!(artifact.contains("pub shipment: Option<Box<super::Ops::Shipment>>,"));
    assert!(artifact.contains("pub destination: Option<Box<super::Sales::Address>>,"));

    // Entity keys, inherited where the type declares none.
    assert!(artifact.contains(
        "    impl odata::EntityType for Customer {\n        const KEY: &'static [&'static str] = &[\"Id\"];"
    ));
    assert!(artifact.contains("const KEY: &'static [&'static str] = &[\"Code\"];"));
}

#[test]
fn test_unsupported_nullable_property_is_omitted() {
    let plan = plan(SALES, "Sales", None).unwrap();
    assert!(
        plan.diagnostics
            .iter()
            .any(|d| d.message.contains("Location"))
    );

    let artifact = sales_artifact();
    assert!(!artifact.contains("pub location"));
    assert!(artifact.contains("pub city: String,"));
    assert!(artifact.contains("pub street: Option<String>,"));
}

#[test]
fn test_unresolved_navigation_is_omitted() {
    let xml = schema(
        r#"      <EntityType Name="Item">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="Region" Type="Geo.Region" Nullable="false"/>
      </EntityType>
      <EntityContainer Name="Store">
        <EntitySet Name="Items" EntityType="Inventory.Item"/>
      </EntityContainer>"#,
    );
    let plan = plan(&xml, "Inventory", None).unwrap();
    assert!(
        plan.diagnostics
            .iter()
            .any(|d| d.message.contains("`Region`") && d.message.contains("Geo.Region"))
    );

    let artifact = &Generator::new(vec![plan]).preview().unwrap()[0].content;
    assert!(artifact.contains("pub struct Item {"));
    assert!(!artifact.contains("pub region"));
}

#[test]
fn test_operation_structs() {
    let artifact = sales_artifact();

    assert!(artifact.contains(
        "impl odata::Action for ActivateInSalesOnOrderInSales {\n    const NAME: &'static str = \"Sales.Activate\";\n    type Output = ();\n}"
    ));
    assert!(artifact.contains("pub struct ActivateInSalesOnOrderInSalesOnEntitySet {}"));
    assert!(artifact.contains("type Output = Option<odata::SingleValue<f64>>;"));
    assert!(artifact.contains("(\"IncludeTax\", odata::Literal::of(&self.include_tax)),"));
    assert!(artifact.contains("type Output = odata::QueryResult<Sales::Customer>;"));
    assert!(artifact.contains("pub struct ResetAllInSales {}"));
}

#[test]
fn test_resource_set_facades() {
    let artifact = sales_artifact();

    insta::assert_snapshot!(
        &artifact[position(&artifact, "/// The `Orders` entity set.")..position(&artifact, "/// Actions bound to one `Ops.Shipment`")],
        @r###"
    /// The `Orders` entity set.
    #[derive(Debug, Clone, Copy)]
    pub struct Orders;

    impl odata::ResourceSet for Orders {
        const NAME: &'static str = "Orders";
        type Entity = Sales::Order;
        type EntityActions = OrdersEntityActions;
        type EntityFunctions = OrdersEntityFunctions;
        type SetActions = OrdersEntitySetActions;
        type SetFunctions = OrdersEntitySetFunctions;
    }

    pub type OrdersEntityGetOperation = odata::GetOperation<Sales::Order, OrdersEntityActions, OrdersEntityFunctions>;
    pub type OrdersEntitySet = odata::EntitySet<Orders>;
    "###
    );

    assert!(artifact.contains(
        "    pub fn activate(&self, parameters: ActivateInSalesOnOrderInSales) -> odata::ActionOperation<ActivateInSalesOnOrderInSales> {\n        self.context.action(parameters)\n    }"
    ));
    assert!(artifact.contains(
        "    pub fn activate(&self, parameters: ActivateInSalesOnOrderInSalesOnEntitySet) -> odata::ActionOperation<ActivateInSalesOnOrderInSalesOnEntitySet> {"
    ));
    assert!(artifact.contains(
        "    pub fn order_total(&self, parameters: OrderTotalInSalesOnOrderInSales) -> odata::Result<odata::FunctionOperation<OrderTotalInSalesOnOrderInSales>> {\n        self.context.function(parameters)\n    }"
    ));
}

#[test]
fn test_container() {
    let artifact = sales_artifact();

    assert!(artifact.contains(
        "pub struct SalesService {\n    settings: odata::ClientSettings,\n    pub accounts: AccountsEntitySet,\n    pub customers: CustomersEntitySet,\n    pub orders: OrdersEntitySet,\n    pub shipments: ShipmentsEntitySet,\n}"
    ));
    assert!(artifact.contains("accounts: odata::EntitySet::new(settings.clone()),\n"));
    assert!(artifact.contains(
        "    pub fn top_customers(&self, parameters: TopCustomersInSales) -> odata::Result<odata::FunctionSetOperation<Sales::Customer>> {\n        self.context.function_set(parameters)\n    }"
    ));
    assert!(artifact.contains(
        "    pub fn reset_all(&self, parameters: ResetAllInSales) -> odata::ActionOperation<ResetAllInSales> {"
    ));

    let registry: Vec<&str> = artifact
        .lines()
        .filter_map(|line| line.trim().strip_prefix("pub const fn "))
        .map(|rest| rest.split('(').next().unwrap_or_default())
        .collect();
    assert_eq!(
        registry,
        [
            "address",
            "customer_in_ops",
            "customer_in_sales",
            "order",
            "order_line",
            "party",
            "shipment"
        ]
    );
    assert!(artifact.contains("odata::TypeName::new(\"Ops\", \"Customer\")"));
}

#[test]
fn test_default_context_name() {
    let plan = plan(SALES, "Sales", None).unwrap();
    let artifact = &Generator::new(vec![plan]).preview().unwrap()[0].content;
    assert!(artifact.contains("pub struct ODataContainer {"));
    assert!(artifact.contains("pub struct ODataContainerContainerActions {"));
}

#[test]
fn test_generation_is_deterministic() {
    let render = || {
        let plan = plan(SALES, "Sales", Some("SalesService")).unwrap();
        Generator::new(vec![plan]).preview().unwrap()
    };
    assert_eq!(render(), render());

    let temp = TempDir::new().unwrap();
    let plan = plan(SALES, "Sales", Some("SalesService")).unwrap();
    let generator = Generator::new(vec![plan]);

    let first = generator.generate(temp.path()).unwrap();
    assert_eq!(first.written.len(), 2);

    let second = generator.generate(temp.path()).unwrap();
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 2);
}

#[test]
fn test_required_unsupported_property_is_fatal() {
    let xml = schema(
        r#"      <EntityType Name="Photo">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <Property Name="Content" Type="Edm.Stream" Nullable="false"/>
      </EntityType>
      <EntityContainer Name="Gallery">
        <EntitySet Name="Photos" EntityType="Inventory.Photo"/>
      </EntityContainer>"#,
    );

    let err = plan(&xml, "Inventory", None).unwrap_err();
    match err.downcast_ref::<odatagen_codegen::Error>() {
        Some(odatagen_codegen::Error::UnsupportedTypeKind {
            member, namespace, ..
        }) => {
            assert_eq!(member, "Content");
            assert_eq!(namespace, "Inventory");
        }
        other => panic!("expected UnsupportedTypeKind, got {other:?}"),
    }
}

#[test]
fn test_colliding_identifiers_are_fatal() {
    // The set marker `Inventory` collides with the namespace module.
    let xml = schema(
        r#"      <EntityType Name="Item">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
      </EntityType>
      <EntityContainer Name="Store">
        <EntitySet Name="Inventory" EntityType="Inventory.Item"/>
      </EntityContainer>"#,
    );
    let plan = plan(&xml, "Inventory", None).unwrap();

    let temp = TempDir::new().unwrap();
    let err = Generator::new(vec![plan]).generate(temp.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<odatagen_codegen::Error>(),
        Some(odatagen_codegen::Error::NameCollision { identifier, .. }) if identifier == "Inventory"
    ));
    // Nothing is written when rendering fails.
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_module_clash_between_services_is_fatal() {
    let first = plan(SALES, "Sales", None).unwrap();
    let second = plan(SALES, "Sales", None).unwrap();
    let err = Generator::new(vec![first, second]).preview().unwrap_err();
    assert!(err.to_string().contains("already uses"));
}
