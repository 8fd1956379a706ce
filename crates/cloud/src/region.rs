//! AWS region resolution.

use aws_config::Region;

/// Environment variable carrying the deployment region.
pub const REGION_ENV: &str = "AWS_REGION";

/// The region variable was absent from the process environment.
#[derive(Debug, thiserror::Error)]
#[error("AWS_REGION expected to be set")]
pub struct RegionError;

/// Resolve the AWS region from the environment.
///
/// Absence is fatal and must be surfaced before any client is built.
pub fn region_from_env() -> Result<Region, RegionError> {
    std::env::var(REGION_ENV)
        .map(Region::new)
        .map_err(|_| RegionError)
}
