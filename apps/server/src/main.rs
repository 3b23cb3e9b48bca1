use eventgen_protocol::ServiceRegistry;
use eventgen_server::{config::Config, init_tracing, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    // Protocol services are linked in by embedding crates through `serve`
    serve(config, ServiceRegistry::new()).await
}
