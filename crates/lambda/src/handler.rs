//! Invocation handler: the sequenced migration workflow.
//!
//! Parameter resolution → region → script staging → secret fetch →
//! credential extraction → engine configuration → clean/migrate. Each
//! step depends on the previous one's output, so the flow is strictly
//! sequential with no internal parallelism and no orchestrator-imposed
//! timeouts; the Lambda execution deadline is the only clock.

use std::collections::HashMap;

use lambda_runtime::LambdaEvent;

use sqlshift_cloud::{region_from_env, stage, staging_dir, S3Store, SecretStore, SecretsManagerStore};
use sqlshift_core::credentials::CredentialSet;
use sqlshift_core::params::ResolvedParams;
use sqlshift_engine::{perform_migration, EngineConfig, PgEngine};

use crate::error::HandlerError;

/// Fixed response literal; failures carry no structured payload back to
/// the caller, only the runtime's failure signal.
pub const SUCCESS_RESPONSE: &str = "200 OK";

/// Lambda entry point wrapper around [`run`].
pub async fn handle(
    event: LambdaEvent<HashMap<String, String>>,
) -> Result<&'static str, lambda_runtime::Error> {
    let (event, context) = event.into_parts();
    tracing::info!(request_id = %context.request_id, "invocation received");

    run(&event).await.map_err(|err| {
        tracing::error!(error = %err, "invocation failed");
        err.into()
    })
}

/// Drive one complete migration invocation.
pub async fn run(event: &HashMap<String, String>) -> Result<&'static str, HandlerError> {
    // The event holds only parameter names and keys, never credentials.
    tracing::info!(event = ?event, "invocation parameters");

    let params = ResolvedParams::from_event(event)?;

    // Region resolution is fatal before any client is constructed.
    let region = region_from_env()?;

    let dest = staging_dir();
    tracing::info!(
        bucket = %params.bucket_name,
        destination = %dest.display(),
        "staging migration scripts"
    );
    let store = S3Store::new(region.clone()).await;
    let staged = stage(&store, &params.bucket_name, &dest).await?;
    tracing::info!(files = staged.files, "migration scripts staged");

    // The secret client lives only as long as the single fetch; the
    // connection is released with it before the database is touched.
    let payload = {
        let secrets = SecretsManagerStore::new(region).await;
        secrets.get_secret_value(&params.secret_name).await?
    };
    let credentials = CredentialSet::from_payload(&payload, &params.key_map)?;

    let config = EngineConfig::new(
        &params.schema_name,
        &params.database_name,
        &params.target_version,
        staged.dir,
        &credentials,
    )?;
    tracing::info!(
        schema = %config.schema,
        target = ?config.target,
        url = %config.database_url,
        "engine configured"
    );

    let engine = PgEngine::configure(&config, &credentials).await?;
    let outcome = perform_migration(&engine, params.do_clean).await?;

    tracing::info!(
        database = %outcome.database(),
        migrations_applied = outcome.migrate.migrations_applied,
        cleaned = outcome.clean.is_some(),
        "migration invocation complete"
    );

    Ok(SUCCESS_RESPONSE)
}
