//! Checks that generated clients compile against the runtime.
//!
//! Runs `cargo check` on a scratch crate, so it is ignored by default:
//! `cargo test -p odatagen-codegen-rust -- --ignored`.

use std::{fs, path::Path, process::Command};

use odatagen_codegen::pipeline::{Pipeline, ServiceTarget};
use odatagen_codegen_rust::Generator;
use odatagen_core::LanguageCodegen;
use odatagen_edm::SchemaGraph;
use tempfile::TempDir;

const SALES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../odatagen-edm/tests/fixtures/sales.xml"
));

fn assert_generated_code_compiles(xml: &str, namespace: &str) {
    let graph = SchemaGraph::from_csdl(xml, "test.xml").expect("metadata parses");
    let plan = Pipeline::new()
        .run(graph, ServiceTarget::new(namespace, None))
        .and_then(|ctx| ctx.into_plan())
        .expect("pipeline succeeds");

    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    let runtime = Path::new(env!("CARGO_MANIFEST_DIR")).join("../odatagen-runtime");

    fs::write(
        root.join("Cargo.toml"),
        format!(
            r#"[package]
name = "generated-client"
version = "0.1.0"
edition = "2024"

[dependencies]
odatagen-runtime = {{ path = "{}" }}
serde = {{ version = "1", features = ["derive"] }}

[workspace]
"#,
            runtime.display()
        ),
    )
    .unwrap();
    fs::create_dir_all(root.join("src/client")).unwrap();
    fs::write(root.join("src/lib.rs"), "pub mod client;\n").unwrap();
    fs::write(
        root.join("src/client/odata.rs"),
        "pub use odatagen_runtime::*;\n",
    )
    .unwrap();

    Generator::new(vec![plan])
        .generate(&root.join("src/client"))
        .expect("generation succeeds");

    let output = Command::new("cargo")
        .args(["check", "--message-format=short"])
        .current_dir(root)
        .output()
        .expect("cargo runs");

    if !output.status.success() {
        let generated = fs::read_to_string(root.join(format!(
            "src/client/{}.rs",
            odatagen_core::to_snake_case(namespace)
        )))
        .unwrap_or_default();
        panic!(
            "generated code failed to compile\n\nstderr:\n{}\n\n=== generated ===\n{}",
            String::from_utf8_lossy(&output.stderr),
            generated
        );
    }
}

#[test]
#[ignore = "runs cargo check on a scratch crate"]
fn test_sales_client_compiles() {
    assert_generated_code_compiles(SALES, "Sales");
}
