use listfilter_core::AppConfig;
use listfilter_geocode::GeocodeClient;

/// Picks the key passed on the command line, then the configured one.
pub(crate) fn resolve_api_key(config: &AppConfig, api_key: Option<&str>) -> Option<String> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| config.geocode_api_key.clone())
}

/// Resolves `address` and prints its coordinates as JSON.
///
/// # Errors
///
/// Returns an error if no API key is available, the client cannot be built,
/// or the lookup fails.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    address: &str,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let api_key = resolve_api_key(config, api_key).ok_or_else(|| {
        anyhow::anyhow!("LISTFILTER_GEOCODE_API_KEY is not set; pass --api-key")
    })?;
    let client = GeocodeClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build geocode client: {e}"))?;

    let coordinates = client.lookup(address, &api_key).await?;
    println!("{}", serde_json::to_string_pretty(&coordinates)?);
    Ok(())
}
