//! Integration tests for the HTTP event normalization pass

use apig_integration_common::{
    Error, HttpEventSpec, IntegrationType, MemoryLog, PassThroughBehavior, ServiceDefinition,
};
use apig_integration_engine::{default_status_codes, normalize_http, HttpEventCompiler, Validation};
use apig_integration_resolver::DefaultResolver;
use std::collections::BTreeSet;

fn validate_yaml(yaml: &str) -> (Result<Validation, Error>, Vec<String>) {
    let service = ServiceDefinition::from_yaml_str(yaml).unwrap();
    let log = MemoryLog::new();
    let result = HttpEventCompiler::new(DefaultResolver::new(), &log).validate(&service);
    (result, log.messages())
}

#[test]
fn test_integration_defaults_to_aws_proxy() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  hello:
    events:
      - http:
          path: hello
          method: get
"#,
    );

    let validation = result.unwrap();
    assert_eq!(validation.events[0].http.integration, IntegrationType::AwsProxy);
    assert_eq!(validation.events[0].http.request, None);
    assert_eq!(validation.events[0].http.response, None);
    assert!(warnings.is_empty());
}

#[test]
fn test_http_integrations_require_uri() {
    for integration in ["http", "http-proxy"] {
        let (result, _) = validate_yaml(&format!(
            r#"
functions:
  ok:
    events:
      - http: GET fine
  forward:
    events:
      - http:
          path: forward
          method: get
          integration: {integration}
          request:
            method: post
"#
        ));

        match result {
            Err(Error::MissingRequestUri { integration: found }) => {
                assert!(found.is_http());
            }
            other => panic!("expected missing uri error, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_uri_message() {
    let (result, _) = validate_yaml(
        r#"
functions:
  forward:
    events:
      - http:
          path: forward
          method: get
          integration: HTTP_PROXY
"#,
    );

    assert_eq!(
        result.unwrap_err().to_string(),
        "You need to set the request uri when using the HTTP_PROXY integration."
    );
}

#[test]
fn test_aws_proxy_keeps_parameters_without_warning() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  search:
    events:
      - http:
          path: search
          method: get
          request:
            parameters:
              querystrings:
                q: true
"#,
    );

    let request = result.unwrap().events[0].http.request.clone().unwrap();
    assert_eq!(
        request.parameters.get("method.request.querystring.q"),
        Some(&true)
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_aws_proxy_strips_uri_and_drops_empty_request() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  hello:
    events:
      - http:
          path: hello
          method: get
          integration: lambda-proxy
          request:
            uri: http://example.com
"#,
    );

    let validation = result.unwrap();
    assert_eq!(validation.events[0].http.request, None);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("AWS_PROXY"));
    assert!(warnings[0].contains("\"hello\""));
    assert!(warnings[0].contains("request.parameters, request.integrations"));
}

#[test]
fn test_aws_proxy_warns_about_null_request_fields() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  hello:
    events:
      - http:
          path: hello
          method: get
          request:
            uri: ~
"#,
    );

    assert_eq!(result.unwrap().events[0].http.request, None);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Removing request.uri"));
}

#[test]
fn test_http_proxy_keeps_uri_and_strips_template() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  forward:
    events:
      - http:
          path: forward/{id}
          method: any
          integration: http-proxy
          request:
            uri: https://backend.example/{id}
            template:
              application/json: '{}'
            parameters:
              paths:
                id: true
"#,
    );

    let request = result.unwrap().events[0].http.request.clone().unwrap();
    assert_eq!(request.uri.as_deref(), Some("https://backend.example/{id}"));
    assert!(request.template.is_empty());
    assert_eq!(request.parameters.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("request.uri"));
}

#[test]
fn test_proxy_response_is_removed_with_warning() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  hello:
    events:
      - http:
          path: hello
          method: get
          response:
            headers:
              Content-Type: "'text/html'"
"#,
    );

    assert_eq!(result.unwrap().events[0].http.response, None);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("response configuration"));
}

#[test]
fn test_aws_without_response_gets_default_status_codes() {
    let (result, _) = validate_yaml(
        r#"
functions:
  legacy:
    events:
      - http:
          path: legacy
          method: post
          integration: lambda
"#,
    );

    let http = result.unwrap().events[0].http.clone();
    let request = http.request.unwrap();
    assert_eq!(request.pass_through, Some(PassThroughBehavior::Never));
    assert_eq!(http.response.unwrap().status_codes, default_status_codes());
}

#[test]
fn test_http_without_response_gets_no_status_codes() {
    let (result, _) = validate_yaml(
        r#"
functions:
  forward:
    events:
      - http:
          path: forward
          method: get
          integration: http
          request:
            uri: https://backend.example
            passThrough: WHEN_NO_MATCH
"#,
    );

    let http = result.unwrap().events[0].http.clone();
    assert!(http.response.unwrap().status_codes.is_empty());
    assert_eq!(
        http.request.unwrap().pass_through,
        Some(PassThroughBehavior::WhenNoMatch)
    );
}

#[test]
fn test_cors_headers_union_regardless_of_order() {
    let first = r#"
      - http:
          path: users
          method: get
          cors:
            headers: [A]
"#;
    let second = r#"
      - http:
          path: users
          method: post
          cors:
            headers: [B]
"#;

    for events in [format!("{first}{second}"), format!("{second}{first}")] {
        let (result, _) = validate_yaml(&format!(
            "functions:\n  users:\n    events:{events}"
        ));
        let validation = result.unwrap();
        let cors = &validation.cors_preflight["users"];

        assert_eq!(
            cors.headers,
            BTreeSet::from(["A".to_string(), "B".to_string()])
        );
        assert_eq!(
            cors.methods,
            BTreeSet::from(["GET".to_string(), "OPTIONS".to_string(), "POST".to_string()])
        );
    }
}

#[test]
fn test_events_keep_encounter_order() {
    let (result, _) = validate_yaml(
        r#"
functions:
  zeta:
    events:
      - http: GET z1
      - http: GET z2
  alpha:
    events:
      - http: GET a1
"#,
    );

    let routes: Vec<_> = result
        .unwrap()
        .events
        .iter()
        .map(|e| format!("{}:{}", e.function_name, e.http.path))
        .collect();
    assert_eq!(routes, vec!["zeta:z1", "zeta:z2", "alpha:a1"]);
}

#[test]
fn test_collaborator_error_aborts_pass() {
    let (result, _) = validate_yaml(
        r#"
functions:
  hello:
    events:
      - http:
          path: hello
          method: get
          integration: websocket
"#,
    );

    assert!(matches!(result, Err(Error::InvalidIntegration { .. })));
}

#[test]
fn test_normalization_is_idempotent() {
    let (result, warnings) = validate_yaml(
        r#"
functions:
  legacy:
    events:
      - http:
          path: /legacy/{id}/
          method: put
          integration: lambda
          authorizer:
            name: authorize
            identitySource: method.request.header.X-Token
          cors:
            origins: [https://a.example]
            allowCredentials: true
          request:
            parameters:
              paths:
                id: true
            template:
              application/json: '{"id": "$input.params(''id'')"}'
  search:
    events:
      - http:
          path: search
          method: get
          cors: true
          request:
            parameters:
              querystrings:
                q: false
            integrations:
              integration.request.header.X-Source: "'apig'"
  forward:
    events:
      - http:
          path: forward
          method: post
          integration: http
          authorizer: arn:aws:lambda:us-east-1:123456789012:function:auth
          request:
            uri: https://backend.example/forward
            method: put
          response:
            template: $input.body
            statusCodes:
              201:
                pattern: ''
                headers:
                  Location: integration.response.header.Location
"#,
    );
    assert!(warnings.is_empty());
    let validation = result.unwrap();

    let resolver = DefaultResolver::new();
    let log = MemoryLog::new();
    for record in &validation.events {
        let spec = HttpEventSpec::from(&record.http);
        let again = normalize_http(&spec, &record.function_name, &resolver, &log).unwrap();
        assert_eq!(again, record.http);
    }
    assert!(log.is_empty());
}
