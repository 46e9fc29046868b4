//! Render a template file to stdout.
//!
//! ```text
//! cargo run --example render -- page.haml [scope.json] [options.json]
//! RUST_LOG=hamlite=debug cargo run --example render -- page.haml
//! ```

use hamlite::{Options, Template};
use std::error::Error;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hamlite=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(template_path) = args.next() else {
        return Err("usage: render <template.haml> [scope.json] [options.json]".into());
    };

    let scope = match args.next() {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => serde_json::json!({}),
    };
    let options = match args.next() {
        Some(path) => Options::from_json(&fs::read_to_string(path)?)?,
        None => Options::default(),
    };

    let source = fs::read_to_string(&template_path)?;
    let template = Template::compile_with(&source, options, &Default::default())?;
    tracing::info!(template = %template_path, "compiled");

    println!("{}", template.render_json(scope)?);
    Ok(())
}
