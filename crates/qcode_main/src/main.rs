use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use qcode::{init_tracing, Cli, UI};
use qcode_domain::EnvironmentService;
use qcode_infra::{FileCredentialStore, QCodeEnvironmentService};
use qcode_provider::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_service = QCodeEnvironmentService::new();
    let guard = init_tracing(env_service.log_path(), cli.verbose)?;
    let env = env_service.get_environment()?;

    let credentials = Arc::new(FileCredentialStore::new(env.config_path()));
    let client = Arc::new(Client::new(&env, credentials.clone())?);

    let failed = UI::init(cli, env, client, credentials).run().await;

    drop(guard);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
