//! Dump the generated OpenAPI document.
//!
//! Prints to stdout by default:
//!   cargo run --bin export_openapi > openapi.json
//!
//! or writes a file with `--output`:
//!   cargo run --bin export_openapi -- --output openapi.json

use anyhow::Context;
use utoipa::OpenApi;

use taskhive::gateway::openapi::ApiDoc;

fn output_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--output" {
            return args.next();
        }
    }
    None
}

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("OpenAPI document did not serialize")?;

    match output_path() {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("failed to write {}", path))?;
            eprintln!("OpenAPI document written to {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
