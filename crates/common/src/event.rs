//! Raw HTTP event specifications as written in a service definition
//!
//! These types mirror the user-facing `http` event shape. Every field is
//! optional here; the resolution rules decide what is required.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Declarative `http` event attached to a function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEventSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<AuthorizerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsSpec>,

    /// Integration name, e.g. `lambda-proxy`, `http`, `AWS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// Authorizer reference: a function name, an ARN, `aws_iam`, or a full object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorizerSpec {
    Reference(String),
    Config(AuthorizerConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub authorizer_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ttl_in_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_validation_expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<String>>,
}

/// `cors: true` or a CORS object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorsSpec {
    Enabled(bool),
    Config(CorsConfig),
}

impl CorsSpec {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CorsSpec::Enabled(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origins: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

/// Request shaping for the integration
///
/// Fields this crate does not know about are kept in `extra` so they can be
/// reported and stripped for proxy integrations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_through: Option<String>,

    /// Either grouped (`querystrings: {name: required}`) or flat
    /// (`method.request.querystring.name: required`) declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ParameterSpec>>,

    /// Integration request parameters copied verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<BTreeMap<String, String>>,

    /// Request templates keyed by content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RequestSpec {
    /// Names of the fields that are set, in declaration order
    pub fn present_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.uri.is_some() {
            fields.push("uri".to_string());
        }
        if self.method.is_some() {
            fields.push("method".to_string());
        }
        if self.pass_through.is_some() {
            fields.push("passThrough".to_string());
        }
        if self.parameters.is_some() {
            fields.push("parameters".to_string());
        }
        if self.integrations.is_some() {
            fields.push("integrations".to_string());
        }
        if self.template.is_some() {
            fields.push("template".to_string());
        }
        fields.extend(self.extra.keys().cloned());
        fields
    }

    /// Copy holding only the named fields
    pub fn retain_fields(&self, allowed: &[&str]) -> RequestSpec {
        let keep = |name: &str| allowed.contains(&name);
        RequestSpec {
            uri: self.uri.clone().filter(|_| keep("uri")),
            method: self.method.clone().filter(|_| keep("method")),
            pass_through: self.pass_through.clone().filter(|_| keep("passThrough")),
            parameters: self.parameters.clone().filter(|_| keep("parameters")),
            integrations: self.integrations.clone().filter(|_| keep("integrations")),
            template: self.template.clone().filter(|_| keep("template")),
            extra: self
                .extra
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// A single parameter declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterSpec {
    /// `method.request.<location>.<name>: <required>`
    Required(bool),
    /// `<locations>: {<name>: <required>}`
    Group(BTreeMap<String, bool>),
}

/// Response shaping for non-proxy integrations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<BTreeMap<u16, StatusCodeSpec>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateSpec>,
}

/// A response template, either for `application/json` or keyed by content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSpec {
    Json(String),
    ByContentType(BTreeMap<String, String>),
}
