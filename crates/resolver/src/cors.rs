//! Per-event CORS resolution

use apig_integration_common::{CorsConfig, CorsDescriptor, CorsSpec, Error, HttpMethod, Result};
use std::collections::BTreeSet;

/// Headers allowed when CORS is enabled without an explicit header list
pub const DEFAULT_CORS_HEADERS: [&str; 6] = [
    "Content-Type",
    "X-Amz-Date",
    "Authorization",
    "X-Api-Key",
    "X-Amz-Security-Token",
    "X-Amz-User-Agent",
];

fn default_headers() -> BTreeSet<String> {
    DEFAULT_CORS_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Resolve the CORS descriptor of an event
///
/// `OPTIONS` and the event's own method are always allowed.
pub fn resolve_cors(spec: &CorsSpec, method: HttpMethod) -> Result<CorsDescriptor> {
    let mut cors = match spec {
        CorsSpec::Enabled(_) => CorsDescriptor {
            headers: default_headers(),
            methods: BTreeSet::new(),
            origins: BTreeSet::from([CorsDescriptor::DEFAULT_ORIGIN.to_string()]),
            origin: CorsDescriptor::DEFAULT_ORIGIN.to_string(),
            allow_credentials: false,
        },
        CorsSpec::Config(config) => from_config(config)?,
    };

    cors.methods.insert(HttpMethod::Options.as_str().to_string());
    cors.methods.insert(method.as_str().to_string());
    Ok(cors)
}

fn from_config(config: &CorsConfig) -> Result<CorsDescriptor> {
    let origin = config
        .origin
        .clone()
        .unwrap_or_else(|| CorsDescriptor::DEFAULT_ORIGIN.to_string());

    let origins: BTreeSet<String> = match &config.origins {
        Some(origins) if origins.is_empty() => {
            return Err(Error::InvalidCors(
                "\"origins\" must list at least one origin".to_string(),
            ))
        }
        Some(origins) => origins.iter().cloned().collect(),
        None => BTreeSet::from([origin.clone()]),
    };

    let methods = config
        .methods
        .iter()
        .flatten()
        .map(|m| {
            HttpMethod::parse(m)
                .map(|parsed| parsed.as_str().to_string())
                .ok_or_else(|| Error::InvalidCors(format!("unsupported method \"{m}\"")))
        })
        .collect::<Result<BTreeSet<_>>>()?;

    Ok(CorsDescriptor {
        headers: config
            .headers
            .as_ref()
            .map(|headers| headers.iter().cloned().collect())
            .unwrap_or_else(default_headers),
        methods,
        origins,
        origin,
        allow_credentials: config.allow_credentials.unwrap_or(false),
    })
}
