//! Calls a service's staging gateway as one of its applications.
//!
//! # Running
//!
//! ```bash
//! export THREESCALE_PROVIDER_URL="https://acme-admin.3scale.net"
//! export THREESCALE_PROVIDER_TOKEN="your-token-here"
//!
//! cargo run -p threescale-demos --bin call_gateway -- <account_id> <application_id> [path]
//! ```

use std::env;

use threescale::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(account_id), Some(application_id)) = (args.next(), args.next()) else {
        eprintln!("usage: call_gateway <account_id> <application_id> [path]");
        std::process::exit(2);
    };
    let path = args.next();

    let client = Client::from_env().await?;
    let mut app = client
        .accounts()
        .read(account_id)
        .applications()
        .read(application_id)
        .into_application()?;

    let auth = app.authobj(None, None).await?;
    println!("credentials go in: {}", auth.location());

    let response = app.test_request(path.as_deref(), Some(false)).await?;
    println!(
        "{} after {} attempt(s): {}",
        response.status(),
        response.attempts(),
        response.text()
    );

    Ok(())
}
