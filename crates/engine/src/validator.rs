//! HTTP event validation and normalization
//!
//! Walks every function's events, resolves each `http` event into a
//! [`NormalizedHttp`], enforces the integration/request/response rules and
//! folds per-event CORS settings into one descriptor per path.
//!
//! Input definitions are never modified; every normalized value is built
//! fresh.

use apig_integration_common::{
    AuthorizerType, CorsDescriptor, CorsPreflight, CorsSpec, Error, EventRecord,
    FunctionDefinition, HttpEventSpec, IntegrationType, Log, NormalizedHttp, NormalizedRequest,
    Result, StatusCodeMapping,
};
use apig_integration_resolver::HttpResolver;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Integration responses used for `AWS` integrations without a response mapping
///
/// The function signals an error status by including `[<code>]` in its
/// error message.
pub const DEFAULT_STATUS_CODES: [(u16, &str); 9] = [
    (200, ""),
    (400, r"[\s\S]*\[400\][\s\S]*"),
    (401, r"[\s\S]*\[401\][\s\S]*"),
    (403, r"[\s\S]*\[403\][\s\S]*"),
    (404, r"[\s\S]*\[404\][\s\S]*"),
    (422, r"[\s\S]*\[422\][\s\S]*"),
    (
        500,
        r"[\s\S]*(Process\s?exited\s?before\s?completing\s?request|\[500\])[\s\S]*",
    ),
    (502, r"[\s\S]*\[502\][\s\S]*"),
    (504, r"([\s\S]*\[504\][\s\S]*)|(^[Tt]ask timed out.*)"),
];

/// [`DEFAULT_STATUS_CODES`] as a status code table
pub fn default_status_codes() -> BTreeMap<u16, StatusCodeMapping> {
    DEFAULT_STATUS_CODES
        .iter()
        .map(|(code, pattern)| (*code, StatusCodeMapping::with_pattern(pattern)))
        .collect()
}

/// Request fields kept for a proxy integration
fn allowed_proxy_request_fields(integration: IntegrationType) -> &'static [&'static str] {
    match integration {
        IntegrationType::HttpProxy => &["parameters", "integrations", "uri"],
        _ => &["parameters", "integrations"],
    }
}

/// Output of the normalization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// Events in function order, then event order
    pub events: Vec<EventRecord>,
    /// Merged CORS settings per path
    pub cors_preflight: CorsPreflight,
}

/// Normalize every `http` event of `functions`
///
/// Events of other kinds are skipped. The first error aborts the pass; no
/// partial result is returned.
pub fn validate<R, L>(
    functions: &IndexMap<String, FunctionDefinition>,
    resolver: &R,
    log: &L,
) -> Result<Validation>
where
    R: HttpResolver + ?Sized,
    L: Log + ?Sized,
{
    let mut validation = Validation::default();

    for (function_name, function) in functions {
        for event in &function.events {
            let Some(raw) = &event.http else {
                continue;
            };

            let spec = resolver.resolve_http(raw, function_name)?;
            let http = normalize_http(&spec, function_name, resolver, log)?;

            if let Some(cors) = &http.cors {
                merge_cors(&mut validation.cors_preflight, &http.path, cors);
            }

            validation.events.push(EventRecord {
                function_name: function_name.clone(),
                http,
            });
        }
    }

    Ok(validation)
}

/// Normalize a single HTTP event
pub fn normalize_http<R, L>(
    spec: &HttpEventSpec,
    function_name: &str,
    resolver: &R,
    log: &L,
) -> Result<NormalizedHttp>
where
    R: HttpResolver + ?Sized,
    L: Log + ?Sized,
{
    let path = resolver.resolve_path(spec, function_name)?;
    let method = resolver.resolve_method(spec, function_name)?;
    let mut http = NormalizedHttp::new(path, method, IntegrationType::default());

    if spec.authorizer.is_some() {
        http.authorizer = Some(resolver.resolve_authorizer(spec, function_name)?);
    }

    if spec.cors.as_ref().is_some_and(CorsSpec::is_enabled) {
        http.cors = Some(resolver.resolve_cors(spec, method)?);
    }

    http.integration = resolver.resolve_integration_type(spec, function_name)?;

    if http.integration.is_http() && !has_request_uri(spec) {
        return Err(Error::MissingRequestUri {
            integration: http.integration,
        });
    }

    match http.integration {
        integration if integration.is_proxy() => {
            warn_ignored_claims(&http, function_name, log);
            shape_proxy(&mut http, spec, function_name, resolver, log)?
        }
        IntegrationType::Mock => shape_mock(&mut http, spec, resolver)?,
        _ => shape_request_response(&mut http, spec, resolver)?,
    }

    Ok(http)
}

fn has_request_uri(spec: &HttpEventSpec) -> bool {
    spec.request
        .as_ref()
        .and_then(|r| r.uri.as_deref())
        .is_some_and(|uri| !uri.is_empty())
}

/// `AWS` and `HTTP`: full request and response shaping
fn shape_request_response<R>(
    http: &mut NormalizedHttp,
    spec: &HttpEventSpec,
    resolver: &R,
) -> Result<()>
where
    R: HttpResolver + ?Sized,
{
    let mut request = match &spec.request {
        Some(request) => resolver.resolve_request(request)?,
        None => NormalizedRequest::default(),
    };
    request.pass_through = Some(resolver.resolve_request_pass_through(spec)?);

    let mut response = resolver.resolve_response(spec)?;
    if http.integration == IntegrationType::Aws && response.status_codes.is_empty() {
        response.status_codes = default_status_codes();
    }

    http.request = Some(request);
    http.response = Some(response);
    Ok(())
}

/// `AWS_PROXY` and `HTTP_PROXY`: keep the allowed request fields, drop the rest
fn shape_proxy<R, L>(
    http: &mut NormalizedHttp,
    spec: &HttpEventSpec,
    function_name: &str,
    resolver: &R,
    log: &L,
) -> Result<()>
where
    R: HttpResolver + ?Sized,
    L: Log + ?Sized,
{
    let allowed = allowed_proxy_request_fields(http.integration);

    if let Some(request) = &spec.request {
        let disallowed: Vec<String> = request
            .present_fields()
            .into_iter()
            .filter(|field| !allowed.contains(&field.as_str()))
            .collect();

        if !disallowed.is_empty() {
            log.log(&proxy_request_warning(
                http.integration,
                function_name,
                allowed,
                &disallowed,
            ));
        }

        let retained = request.retain_fields(allowed);
        if !retained.is_empty() {
            http.request = Some(resolver.resolve_request(&retained)?);
        }
    }

    if spec.response.is_some() {
        log.log(&proxy_response_warning(http.integration, function_name));
    }

    Ok(())
}

/// `MOCK`: shaping is taken as configured, without defaults
fn shape_mock<R>(http: &mut NormalizedHttp, spec: &HttpEventSpec, resolver: &R) -> Result<()>
where
    R: HttpResolver + ?Sized,
{
    if let Some(request) = &spec.request {
        http.request = Some(resolver.resolve_request(request)?);
    }
    if spec.response.is_some() {
        http.response = Some(resolver.resolve_response(spec)?);
    }
    Ok(())
}

/// Claims are only mapped for non-proxy integrations
fn warn_ignored_claims<L>(http: &NormalizedHttp, function_name: &str, log: &L)
where
    L: Log + ?Sized,
{
    let Some(authorizer) = &http.authorizer else {
        return;
    };
    if http.integration == IntegrationType::AwsProxy
        && authorizer.authorizer_type == AuthorizerType::CognitoUserPools
        && !authorizer.claims.is_empty()
    {
        log.log(&format!(
            "Warning! You're using the {} in combination with a claims definition \
             in your function \"{function_name}\". The claims will be ignored; they are \
             available in the request context.",
            http.integration
        ));
    }
}

fn request_fields<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields
        .map(|f| format!("request.{f}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn proxy_request_warning(
    integration: IntegrationType,
    function_name: &str,
    allowed: &[&str],
    removed: &[String],
) -> String {
    format!(
        "Warning! You're using the {integration} in combination with a request configuration \
         in your function \"{function_name}\". Only the {} configs are available in conjunction \
         with {integration}. Removing {} before deployment.",
        request_fields(allowed.iter().copied()),
        request_fields(removed.iter().map(String::as_str)),
    )
}

fn proxy_response_warning(integration: IntegrationType, function_name: &str) -> String {
    format!(
        "Warning! You're using the {integration} in combination with response configuration \
         in your function \"{function_name}\". The response configuration will be removed \
         before deployment."
    )
}

/// Fold one event's CORS settings into the descriptor of its path
///
/// Headers, methods and origins are unioned and credentials are allowed if
/// any event allows them. A non-default origin replaces the current one; the
/// default origin never overrides.
pub fn merge_cors(preflight: &mut CorsPreflight, path: &str, cors: &CorsDescriptor) {
    let merged = preflight
        .entry(path.to_string())
        .or_insert_with(CorsDescriptor::empty);

    merged.headers.extend(cors.headers.iter().cloned());
    merged.methods.extend(cors.methods.iter().cloned());
    merged.origins.extend(cors.origins.iter().cloned());
    if !cors.has_default_origin() {
        merged.origin = cors.origin.clone();
    }
    merged.allow_credentials |= cors.allow_credentials;
}
