//! Serverless framework resolution rules

use crate::{authorizer, cors, request, response, templates, HttpResolver};
use apig_integration_common::{
    CorsDescriptor, CorsSpec, Error, HttpEventSpec, HttpMethod, IntegrationResponse,
    IntegrationType, NormalizedHttp, NormalizedRequest, NormalizedResponse, PassThroughBehavior,
    RequestSpec, ResolvedAuthorizer, Result,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolver implementing the serverless framework's `http` event rules
///
/// # Examples
/// ```
/// use apig_integration_resolver::{DefaultResolver, HttpResolver};
/// use apig_integration_common::{HttpMethod, IntegrationType};
/// use serde_json::json;
///
/// let resolver = DefaultResolver::new();
/// let http = resolver.resolve_http(&json!("GET /users/"), "list").unwrap();
///
/// assert_eq!(resolver.resolve_path(&http, "list").unwrap(), "users");
/// assert_eq!(resolver.resolve_method(&http, "list").unwrap(), HttpMethod::Get);
/// assert_eq!(
///     resolver.resolve_integration_type(&http, "list").unwrap(),
///     IntegrationType::AwsProxy
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl DefaultResolver {
    pub fn new() -> Self {
        Self
    }
}

impl HttpResolver for DefaultResolver {
    fn resolve_http(&self, event: &Value, function_name: &str) -> Result<HttpEventSpec> {
        let invalid = |reason: String| Error::InvalidHttpEvent {
            function: function_name.to_string(),
            reason,
        };

        match event {
            Value::String(shorthand) => {
                let mut parts = shorthand.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(method), Some(path), None) => Ok(HttpEventSpec {
                        method: Some(method.to_string()),
                        path: Some(path.to_string()),
                        ..Default::default()
                    }),
                    _ => Err(invalid(format!(
                        "\"{shorthand}\" is not of the form \"<method> <path>\""
                    ))),
                }
            }
            Value::Object(_) => {
                let mut spec: HttpEventSpec =
                    serde_json::from_value(event.clone()).map_err(|e| invalid(e.to_string()))?;
                if let (Some(request), Some(Value::Object(raw))) =
                    (spec.request.as_mut(), event.get("request"))
                {
                    keep_null_fields(request, raw);
                }
                Ok(spec)
            }
            _ => Err(invalid(
                "expected an object or a \"<method> <path>\" string".to_string(),
            )),
        }
    }

    fn resolve_path(&self, http: &HttpEventSpec, function_name: &str) -> Result<String> {
        let path = http.path.as_deref().ok_or_else(|| Error::InvalidPath {
            function: function_name.to_string(),
        })?;
        let path = path.strip_prefix('/').unwrap_or(path);
        Ok(path.strip_suffix('/').unwrap_or(path).to_string())
    }

    fn resolve_method(&self, http: &HttpEventSpec, function_name: &str) -> Result<HttpMethod> {
        let method = http.method.as_deref().unwrap_or_default();
        HttpMethod::parse(method).ok_or_else(|| Error::InvalidMethod {
            method: method.to_string(),
            function: function_name.to_string(),
        })
    }

    fn resolve_authorizer(
        &self,
        http: &HttpEventSpec,
        function_name: &str,
    ) -> Result<ResolvedAuthorizer> {
        let spec = http
            .authorizer
            .as_ref()
            .ok_or_else(|| Error::InvalidAuthorizer {
                function: function_name.to_string(),
                reason: "no authorizer configured".to_string(),
            })?;
        authorizer::resolve_authorizer(spec, function_name)
    }

    fn resolve_cors(&self, http: &HttpEventSpec, method: HttpMethod) -> Result<CorsDescriptor> {
        cors::resolve_cors(http.cors.as_ref().unwrap_or(&CorsSpec::Enabled(true)), method)
    }

    fn resolve_integration_type(
        &self,
        http: &HttpEventSpec,
        function_name: &str,
    ) -> Result<IntegrationType> {
        let Some(integration) = http.integration.as_deref() else {
            return Ok(IntegrationType::default());
        };

        match integration.to_ascii_uppercase().replace('-', "_").as_str() {
            "LAMBDA" | "AWS" => Ok(IntegrationType::Aws),
            "LAMBDA_PROXY" | "AWS_PROXY" => Ok(IntegrationType::AwsProxy),
            "HTTP" => Ok(IntegrationType::Http),
            "HTTP_PROXY" => Ok(IntegrationType::HttpProxy),
            "MOCK" => Ok(IntegrationType::Mock),
            _ => Err(Error::InvalidIntegration {
                integration: integration.to_string(),
                function: function_name.to_string(),
            }),
        }
    }

    fn resolve_request(&self, request: &RequestSpec) -> Result<NormalizedRequest> {
        request::resolve_request(request)
    }

    fn resolve_request_pass_through(&self, http: &HttpEventSpec) -> Result<PassThroughBehavior> {
        request::resolve_pass_through(http.request.as_ref())
    }

    fn resolve_response(&self, http: &HttpEventSpec) -> Result<NormalizedResponse> {
        response::resolve_response(http.response.as_ref())
    }

    fn resolve_request_templates(
        &self,
        http: &NormalizedHttp,
        is_aws: bool,
    ) -> Option<BTreeMap<String, String>> {
        templates::request_templates(http, is_aws)
    }

    fn resolve_integration_responses(&self, http: &NormalizedHttp) -> Vec<IntegrationResponse> {
        response::integration_responses(http)
    }
}

/// Keys set to `null` are still present in the request; they deserialize to
/// `None`, so they are recorded in `extra` to be reported and stripped.
fn keep_null_fields(request: &mut RequestSpec, raw: &serde_json::Map<String, Value>) {
    for (key, value) in raw {
        if value.is_null() {
            request.extra.entry(key.clone()).or_insert(Value::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> DefaultResolver {
        DefaultResolver::new()
    }

    #[test]
    fn test_shorthand_event() {
        let http = resolver().resolve_http(&json!("post users"), "create").unwrap();
        assert_eq!(http.method.as_deref(), Some("post"));
        assert_eq!(http.path.as_deref(), Some("users"));
    }

    #[test]
    fn test_invalid_shorthand() {
        let err = resolver().resolve_http(&json!("users"), "create").unwrap_err();
        assert!(matches!(err, Error::InvalidHttpEvent { .. }));

        let err = resolver().resolve_http(&json!(42), "create").unwrap_err();
        assert!(matches!(err, Error::InvalidHttpEvent { .. }));
    }

    #[test]
    fn test_null_request_fields_stay_present() {
        let http = resolver()
            .resolve_http(
                &json!({"path": "a", "method": "get", "request": {"uri": null, "parameters": {}}}),
                "f",
            )
            .unwrap();
        let request = http.request.unwrap();

        assert_eq!(request.uri, None);
        assert_eq!(request.present_fields(), vec!["parameters", "uri"]);
    }

    #[test]
    fn test_path_trimming() {
        let spec = |path: &str| HttpEventSpec {
            path: Some(path.to_string()),
            ..Default::default()
        };

        assert_eq!(resolver().resolve_path(&spec("/a/b/"), "f").unwrap(), "a/b");
        assert_eq!(resolver().resolve_path(&spec("a/{id}"), "f").unwrap(), "a/{id}");
        assert_eq!(resolver().resolve_path(&spec("/"), "f").unwrap(), "");
        assert!(matches!(
            resolver().resolve_path(&HttpEventSpec::default(), "f"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_invalid_method() {
        let http = HttpEventSpec {
            method: Some("fetch".to_string()),
            ..Default::default()
        };
        let err = resolver().resolve_method(&http, "f").unwrap_err();
        assert!(err.to_string().contains("Invalid APIG method \"fetch\""));
    }

    #[test]
    fn test_integration_aliases() {
        let resolve = |name: &str| {
            resolver().resolve_integration_type(
                &HttpEventSpec {
                    integration: Some(name.to_string()),
                    ..Default::default()
                },
                "f",
            )
        };

        assert_eq!(resolve("lambda").unwrap(), IntegrationType::Aws);
        assert_eq!(resolve("lambda-proxy").unwrap(), IntegrationType::AwsProxy);
        assert_eq!(resolve("http-proxy").unwrap(), IntegrationType::HttpProxy);
        assert_eq!(resolve("HTTP").unwrap(), IntegrationType::Http);
        assert_eq!(resolve("mock").unwrap(), IntegrationType::Mock);
        assert_eq!(resolve("AWS_PROXY").unwrap(), IntegrationType::AwsProxy);
        assert!(matches!(
            resolve("websocket"),
            Err(Error::InvalidIntegration { .. })
        ));
    }

    #[test]
    fn test_missing_integration_defaults_to_proxy() {
        assert_eq!(
            resolver()
                .resolve_integration_type(&HttpEventSpec::default(), "f")
                .unwrap(),
            IntegrationType::AwsProxy
        );
    }
}
