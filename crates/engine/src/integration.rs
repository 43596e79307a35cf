//! Method integration synthesis
//!
//! Builds the `Integration` block of an API Gateway method from a
//! normalized event. Inputs are expected to have been through
//! [`validate`](crate::validate); nothing here fails.

use crate::parameters::integration_request_parameters;
use apig_integration_common::{
    CfnValue, IntegrationDocument, IntegrationType, MethodIntegration, NormalizedHttp,
};
use apig_integration_resolver::HttpResolver;

/// Lambda invocation URI for the function with `function_logical_id`
///
/// Region and function ARN are left as intrinsics for the template engine
/// to resolve at deploy time.
pub fn lambda_invocation_uri(function_logical_id: &str) -> CfnValue {
    CfnValue::Join(
        String::new(),
        vec![
            CfnValue::literal("arn:aws:apigateway:"),
            CfnValue::region(),
            CfnValue::literal(":lambda:path/2015-03-31/functions/"),
            CfnValue::get_att(function_logical_id, "Arn"),
            CfnValue::literal("/invocations"),
        ],
    )
}

/// Synthesize the method integration of one event
pub fn method_integration<R>(
    http: &NormalizedHttp,
    function_logical_id: &str,
    resolver: &R,
) -> MethodIntegration
where
    R: HttpResolver + ?Sized,
{
    let integration_type = http.integration;
    let request = http.request.as_ref();

    let integration_http_method = if integration_type.is_http() {
        request
            .and_then(|r| r.method.as_deref())
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| http.method.as_str().to_string())
    } else {
        "POST".to_string()
    };

    let uri = if integration_type.is_lambda() {
        Some(lambda_invocation_uri(function_logical_id))
    } else if integration_type.is_http() {
        request
            .and_then(|r| r.uri.as_deref())
            .map(CfnValue::literal)
    } else {
        None
    };

    let mut document = IntegrationDocument {
        integration_http_method,
        integration_type,
        uri,
        passthrough_behavior: None,
        request_templates: None,
        integration_responses: None,
        request_parameters: None,
    };

    if matches!(
        integration_type,
        IntegrationType::Aws | IntegrationType::Http | IntegrationType::Mock
    ) {
        document.passthrough_behavior = request.and_then(|r| r.pass_through);
        document.request_templates =
            resolver.resolve_request_templates(http, integration_type == IntegrationType::Aws);
        document.integration_responses = Some(resolver.resolve_integration_responses(http));
    }

    if let Some(request) = request {
        let forwards_parameters = matches!(
            integration_type,
            IntegrationType::Aws | IntegrationType::Http | IntegrationType::HttpProxy
        );
        if forwards_parameters
            && (!request.parameters.is_empty() || !request.integrations.is_empty())
        {
            document.request_parameters = Some(integration_request_parameters(request));
        }
    }

    MethodIntegration::from(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apig_integration_common::{HttpMethod, NormalizedRequest, PassThroughBehavior};
    use apig_integration_resolver::DefaultResolver;
    use std::collections::BTreeMap;

    #[test]
    fn test_lambda_invocation_uri() {
        let uri = lambda_invocation_uri("MyFunc");

        assert!(uri.references("MyFunc"));
        assert!(uri.references("AWS::Region"));
        assert_eq!(
            serde_json::to_value(&uri).unwrap()["Fn::Join"][1][2],
            ":lambda:path/2015-03-31/functions/"
        );
    }

    #[test]
    fn test_http_proxy_uses_event_method() {
        let mut http = NormalizedHttp::new("items", HttpMethod::Delete, IntegrationType::HttpProxy);
        http.request = Some(NormalizedRequest {
            uri: Some("https://backend.example/items".to_string()),
            ..Default::default()
        });

        let integration = method_integration(&http, "ItemsLambdaFunction", &DefaultResolver);
        let document = integration.integration();

        assert_eq!(document.integration_http_method, "DELETE");
        assert_eq!(
            document.uri,
            Some(CfnValue::literal("https://backend.example/items"))
        );
        assert_eq!(document.request_templates, None);
        assert_eq!(document.integration_responses, None);
        assert_eq!(document.request_parameters, None);
    }

    #[test]
    fn test_mock_has_no_uri_and_no_parameters() {
        let mut http = NormalizedHttp::new("health", HttpMethod::Get, IntegrationType::Mock);
        http.request = Some(NormalizedRequest {
            pass_through: Some(PassThroughBehavior::WhenNoMatch),
            parameters: BTreeMap::from([("method.request.querystring.q".to_string(), true)]),
            ..Default::default()
        });

        let integration = method_integration(&http, "HealthLambdaFunction", &DefaultResolver);
        let document = integration.integration();

        assert_eq!(document.uri, None);
        assert_eq!(document.integration_http_method, "POST");
        assert_eq!(
            document.passthrough_behavior,
            Some(PassThroughBehavior::WhenNoMatch)
        );
        assert_eq!(document.integration_responses, Some(vec![]));
        assert_eq!(document.request_parameters, None);
    }
}
