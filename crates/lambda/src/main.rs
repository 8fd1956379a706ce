use lambda_runtime::service_fn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlshift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    lambda_runtime::run(service_fn(sqlshift_lambda::handle)).await
}
