use dragon_refs::{document, Runtime};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/app.yaml".to_string());

    // One runtime per evaluation; providers and caches die with it.
    let doc = document::load_file(&path)?;
    let resolved = Runtime::new().eval(doc)?;

    print!("{}", resolved.to_yaml_string()?);
    Ok(())
}
