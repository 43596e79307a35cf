//! End-to-end method integration synthesis from service definitions

use apig_integration_common::{
    CfnValue, IntegrationType, MemoryLog, PassThroughBehavior, ServiceDefinition,
};
use apig_integration_engine::{HttpEventCompiler, Validation};
use apig_integration_resolver::{DefaultResolver, Naming};
use serde_json::json;

const SERVICE: &str = r#"
service: shop
functions:
  MyFunc:
    handler: handler.main
    events:
      - http:
          path: orders
          method: get
  legacy:
    events:
      - http:
          path: legacy/{id}
          method: put
          integration: lambda
          cors:
            origins: [https://a.example, https://b.example]
          request:
            parameters:
              paths:
                id: true
  forward:
    events:
      - http:
          path: forward
          method: get
          integration: http
          request:
            uri: https://backend.example/forward
            method: post
            passThrough: WHEN_NO_TEMPLATES
            parameters:
              querystrings:
                q: true
            integrations:
              integration.request.querystring.q: method.request.header.X-Query
          response:
            template: $input.body
            statusCodes:
              200:
                pattern: ''
              404:
                pattern: '.*not found.*'
                headers:
                  X-Reason: "'missing'"
  health:
    events:
      - http:
          path: health
          method: get
          integration: mock
"#;

fn compile() -> (HttpEventCompiler<DefaultResolver, MemoryLog>, Validation) {
    let service = ServiceDefinition::from_yaml_str(SERVICE).unwrap();
    let compiler = HttpEventCompiler::new(DefaultResolver::new(), MemoryLog::new());
    let validation = compiler.validate(&service).unwrap();
    (compiler, validation)
}

fn integration_for(function_name: &str) -> serde_json::Value {
    let (compiler, validation) = compile();
    let record = validation
        .events
        .iter()
        .find(|e| e.function_name == function_name)
        .unwrap();
    let integration =
        compiler.method_integration(&record.http, &Naming::lambda_logical_id(function_name));
    serde_json::to_value(integration).unwrap()
}

#[test]
fn test_aws_proxy_invokes_function_through_region() {
    let (compiler, validation) = compile();
    let record = &validation.events[0];
    assert_eq!(record.http.integration, IntegrationType::AwsProxy);

    let logical_id = Naming::lambda_logical_id("MyFunc");
    assert_eq!(logical_id, "MyFuncLambdaFunction");

    let integration = compiler.method_integration(&record.http, &logical_id);
    let document = integration.integration();
    assert_eq!(document.integration_http_method, "POST");
    assert_eq!(document.integration_type, IntegrationType::AwsProxy);

    let uri = document.uri.as_ref().unwrap();
    assert!(uri.references("MyFuncLambdaFunction"));
    assert!(uri.references("AWS::Region"));
    assert_eq!(document.request_templates, None);
    assert_eq!(document.integration_responses, None);
}

#[test]
fn test_aws_integration_document() {
    let value = integration_for("legacy");
    let integration = &value["Properties"]["Integration"];

    assert_eq!(integration["Type"], "AWS");
    assert_eq!(integration["IntegrationHttpMethod"], "POST");
    assert_eq!(integration["PassthroughBehavior"], "NEVER");
    assert!(integration["RequestTemplates"]["application/json"].is_string());
    assert!(integration["RequestTemplates"]["application/x-www-form-urlencoded"].is_string());
    assert_eq!(
        integration["RequestParameters"],
        json!({"integration.request.path.id": "method.request.path.id"})
    );

    let responses = integration["IntegrationResponses"].as_array().unwrap();
    assert_eq!(responses.len(), 9);
    assert_eq!(responses[0]["StatusCode"], 200);
    assert_eq!(
        responses[0]["ResponseParameters"]["method.response.header.Access-Control-Allow-Origin"],
        "'https://a.example,https://b.example'"
    );
}

#[test]
fn test_http_integration_document() {
    let value = integration_for("forward");
    let integration = &value["Properties"]["Integration"];

    assert_eq!(integration["Type"], "HTTP");
    assert_eq!(integration["IntegrationHttpMethod"], "POST");
    assert_eq!(integration["Uri"], "https://backend.example/forward");
    assert_eq!(integration["PassthroughBehavior"], "WHEN_NO_TEMPLATES");
    assert_eq!(
        integration["RequestParameters"],
        json!({"integration.request.querystring.q": "method.request.header.X-Query"})
    );

    let responses = integration["IntegrationResponses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[1]["StatusCode"], 404);
    assert_eq!(responses[1]["SelectionPattern"], ".*not found.*");
    assert_eq!(
        responses[1]["ResponseParameters"]["method.response.header.X-Reason"],
        "'missing'"
    );
    assert_eq!(
        responses[1]["ResponseTemplates"]["application/json"],
        "$input.body"
    );
}

#[test]
fn test_mock_integration_document() {
    let (compiler, validation) = compile();
    let record = validation.events.last().unwrap();
    assert_eq!(record.function_name, "health");

    let integration = compiler.method_integration(&record.http, "HealthLambdaFunction");
    let document = integration.integration();
    assert_eq!(document.integration_type, IntegrationType::Mock);
    assert_eq!(document.uri, None);
    assert_eq!(document.request_parameters, None);
    assert_eq!(document.integration_responses, Some(Vec::new()));
}

#[test]
fn test_request_parameters_of_validated_http_event() {
    let (compiler, validation) = compile();
    let record = validation
        .events
        .iter()
        .find(|e| e.function_name == "forward")
        .unwrap();
    let request = record.http.request.as_ref().unwrap();
    assert_eq!(request.pass_through, Some(PassThroughBehavior::WhenNoTemplates));

    let parameters = compiler.integration_request_parameters(request);
    assert_eq!(parameters.len(), 1);
    assert_eq!(
        parameters["integration.request.querystring.q"],
        "method.request.header.X-Query"
    );
}

#[test]
fn test_http_uri_is_literal() {
    let (compiler, validation) = compile();
    let record = validation
        .events
        .iter()
        .find(|e| e.function_name == "forward")
        .unwrap();

    let integration = compiler.method_integration(&record.http, "ForwardLambdaFunction");
    assert_eq!(
        integration.integration().uri,
        Some(CfnValue::literal("https://backend.example/forward"))
    );
}
