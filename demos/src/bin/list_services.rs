//! Lists the services of a tenant with their mapping rules.
//!
//! # Running
//!
//! ```bash
//! export THREESCALE_PROVIDER_URL="https://acme-admin.3scale.net"
//! export THREESCALE_PROVIDER_TOKEN="your-token-here"
//!
//! cargo run -p threescale-demos --bin list_services
//! ```

use futures::TryStreamExt;
use threescale::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = Client::from_env().await?;

    for service in client.services().list().await? {
        let name = service.entity_name().unwrap_or("<unnamed>");
        println!("{} ({})", name, service.url());

        let rules = service.mapping_rules().list().await?;
        for rule in &rules {
            println!(
                "  {} {}",
                rule.attr_str("http_method").unwrap_or("?"),
                rule.attr_str("pattern").unwrap_or("?")
            );
        }
    }

    // Backends are paginated; stream them page by page
    let mut backends = client.backends().list().into_stream();
    while let Some(backend) = backends.try_next().await? {
        println!("backend {:?}", backend.entity_name());
    }

    Ok(())
}
