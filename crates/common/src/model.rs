//! Normalized HTTP event model
//!
//! Output of the normalization pass. Every value here has been through the
//! resolution rules, so consumers can rely on paths, methods and integration
//! types being canonical.

use crate::event::{
    AuthorizerConfig, AuthorizerSpec, CorsConfig, CorsSpec, HttpEventSpec, ParameterSpec,
    RequestSpec, ResponseSpec, StatusCodeSpec, TemplateSpec,
};
use crate::intrinsic::CfnValue;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// API Gateway backend invocation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    Aws,
    #[default]
    AwsProxy,
    Http,
    HttpProxy,
    Mock,
}

impl IntegrationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationType::Aws => "AWS",
            IntegrationType::AwsProxy => "AWS_PROXY",
            IntegrationType::Http => "HTTP",
            IntegrationType::HttpProxy => "HTTP_PROXY",
            IntegrationType::Mock => "MOCK",
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, IntegrationType::AwsProxy | IntegrationType::HttpProxy)
    }

    /// Lambda backed (`AWS` or `AWS_PROXY`)
    pub fn is_lambda(&self) -> bool {
        matches!(self, IntegrationType::Aws | IntegrationType::AwsProxy)
    }

    /// HTTP backed (`HTTP` or `HTTP_PROXY`)
    pub fn is_http(&self) -> bool {
        matches!(self, IntegrationType::Http | IntegrationType::HttpProxy)
    }
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Options,
    Head,
    Delete,
    Any,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Delete,
        HttpMethod::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Any => "ANY",
        }
    }

    /// Case-insensitive lookup
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassThroughBehavior {
    #[default]
    Never,
    WhenNoMatch,
    WhenNoTemplates,
}

impl PassThroughBehavior {
    pub const ALL: [PassThroughBehavior; 3] = [
        PassThroughBehavior::Never,
        PassThroughBehavior::WhenNoMatch,
        PassThroughBehavior::WhenNoTemplates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassThroughBehavior::Never => "NEVER",
            PassThroughBehavior::WhenNoMatch => "WHEN_NO_MATCH",
            PassThroughBehavior::WhenNoTemplates => "WHEN_NO_TEMPLATES",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizerType {
    AwsIam,
    Token,
    Request,
    CognitoUserPools,
}

/// Canonical authorizer descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAuthorizer {
    #[serde(rename = "type")]
    pub authorizer_type: AuthorizerType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<CfnValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_ttl_in_seconds: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_validation_expression: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claims: Vec<String>,
}

impl ResolvedAuthorizer {
    pub fn aws_iam() -> Self {
        Self {
            authorizer_type: AuthorizerType::AwsIam,
            name: None,
            arn: None,
            result_ttl_in_seconds: None,
            identity_source: None,
            identity_validation_expression: None,
            claims: Vec::new(),
        }
    }
}

/// Cross-origin policy for one event, or merged for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsDescriptor {
    pub headers: BTreeSet<String>,
    pub methods: BTreeSet<String>,
    pub origins: BTreeSet<String>,
    pub origin: String,
    pub allow_credentials: bool,
}

impl CorsDescriptor {
    pub const DEFAULT_ORIGIN: &'static str = "*";

    /// Descriptor with nothing allowed yet and the default origin
    pub fn empty() -> Self {
        Self {
            headers: BTreeSet::new(),
            methods: BTreeSet::new(),
            origins: BTreeSet::new(),
            origin: Self::DEFAULT_ORIGIN.to_string(),
            allow_credentials: false,
        }
    }

    pub fn has_default_origin(&self) -> bool {
        self.origin == Self::DEFAULT_ORIGIN
    }

    /// Value of the `Access-Control-Allow-Origin` header
    pub fn allow_origin(&self) -> String {
        if self.origins.is_empty() {
            self.origin.clone()
        } else {
            self.origins.iter().cloned().collect::<Vec<_>>().join(",")
        }
    }
}

/// Path to merged CORS descriptor
pub type CorsPreflight = BTreeMap<String, CorsDescriptor>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_through: Option<PassThroughBehavior>,

    /// Flat `method.request.<location>.<name>` keys to their required flag
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, bool>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub integrations: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub template: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodeMapping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Templates keyed by content type
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub template: BTreeMap<String, String>,
}

impl StatusCodeMapping {
    pub fn with_pattern(pattern: &str) -> Self {
        Self {
            pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub status_codes: BTreeMap<u16, StatusCodeMapping>,
}

impl NormalizedResponse {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.template.is_none() && self.status_codes.is_empty()
    }
}

/// A fully resolved HTTP event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedHttp {
    pub path: String,
    pub method: HttpMethod,
    pub integration: IntegrationType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<ResolvedAuthorizer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsDescriptor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<NormalizedRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<NormalizedResponse>,
}

impl NormalizedHttp {
    pub fn new(path: impl Into<String>, method: HttpMethod, integration: IntegrationType) -> Self {
        Self {
            path: path.into(),
            method,
            integration,
            authorizer: None,
            cors: None,
            request: None,
            response: None,
        }
    }

    /// Human readable identity, e.g. `GET /users/{id}`
    pub fn route(&self) -> String {
        format!("{} /{}", self.method, self.path)
    }
}

/// One normalized event and the function it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub function_name: String,
    pub http: NormalizedHttp,
}

// Normalized values can be fed back through the resolution rules. The
// conversions below produce the equivalent raw event configuration.

impl From<&NormalizedHttp> for HttpEventSpec {
    fn from(http: &NormalizedHttp) -> Self {
        HttpEventSpec {
            path: Some(http.path.clone()),
            method: Some(http.method.as_str().to_string()),
            authorizer: http.authorizer.as_ref().map(AuthorizerSpec::from),
            cors: http.cors.as_ref().map(|c| CorsSpec::Config(CorsConfig::from(c))),
            integration: Some(http.integration.as_str().to_string()),
            request: http.request.as_ref().map(RequestSpec::from),
            response: http.response.as_ref().map(ResponseSpec::from),
        }
    }
}

impl From<&ResolvedAuthorizer> for AuthorizerSpec {
    fn from(authorizer: &ResolvedAuthorizer) -> Self {
        let authorizer_type = match authorizer.authorizer_type {
            AuthorizerType::AwsIam => return AuthorizerSpec::Reference("aws_iam".to_string()),
            AuthorizerType::Request => Some("request".to_string()),
            AuthorizerType::Token | AuthorizerType::CognitoUserPools => None,
        };
        AuthorizerSpec::Config(AuthorizerConfig {
            name: authorizer.name.clone(),
            arn: authorizer
                .arn
                .as_ref()
                .and_then(|arn| arn.as_literal().map(str::to_string)),
            authorizer_type,
            result_ttl_in_seconds: authorizer.result_ttl_in_seconds,
            identity_source: authorizer.identity_source.clone(),
            identity_validation_expression: authorizer.identity_validation_expression.clone(),
            claims: Some(authorizer.claims.clone()).filter(|c| !c.is_empty()),
        })
    }
}

impl From<&CorsDescriptor> for CorsConfig {
    fn from(cors: &CorsDescriptor) -> Self {
        CorsConfig {
            origin: Some(cors.origin.clone()),
            origins: Some(cors.origins.iter().cloned().collect()),
            headers: Some(cors.headers.iter().cloned().collect()),
            methods: Some(cors.methods.iter().cloned().collect()),
            allow_credentials: Some(cors.allow_credentials),
        }
    }
}

fn non_empty<T: Clone>(map: &BTreeMap<String, T>) -> Option<BTreeMap<String, T>> {
    Some(map.clone()).filter(|m| !m.is_empty())
}

impl From<&NormalizedRequest> for RequestSpec {
    fn from(request: &NormalizedRequest) -> Self {
        RequestSpec {
            uri: request.uri.clone(),
            method: request.method.clone(),
            pass_through: request.pass_through.map(|p| p.as_str().to_string()),
            parameters: Some(
                request
                    .parameters
                    .iter()
                    .map(|(k, v)| (k.clone(), ParameterSpec::Required(*v)))
                    .collect::<BTreeMap<_, _>>(),
            )
            .filter(|p| !p.is_empty()),
            integrations: non_empty(&request.integrations),
            template: non_empty(&request.template),
            extra: BTreeMap::new(),
        }
    }
}

impl From<&NormalizedResponse> for ResponseSpec {
    fn from(response: &NormalizedResponse) -> Self {
        ResponseSpec {
            headers: non_empty(&response.headers),
            template: response.template.clone(),
            status_codes: Some(
                response
                    .status_codes
                    .iter()
                    .map(|(code, mapping)| {
                        (
                            *code,
                            StatusCodeSpec {
                                pattern: mapping.pattern.clone(),
                                headers: non_empty(&mapping.headers),
                                template: non_empty(&mapping.template)
                                    .map(TemplateSpec::ByContentType),
                            },
                        )
                    })
                    .collect::<BTreeMap<_, _>>(),
            )
            .filter(|codes| !codes.is_empty()),
        }
    }
}
