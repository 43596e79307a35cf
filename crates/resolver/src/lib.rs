//! Resolution rules for serverless HTTP events
//!
//! The normalization pass does not interpret raw event fields itself. It
//! asks an [`HttpResolver`] for every canonical part (path, method,
//! authorizer, CORS, integration type, request and response shaping) and
//! for the template and response tables of the integration it synthesizes.
//!
//! [`DefaultResolver`] implements the rules of the serverless framework:
//!
//! - `http: GET users/{id}` shorthand or a full object
//! - `lambda` / `lambda-proxy` aliases for `AWS` / `AWS_PROXY`
//! - grouped request parameters flattened to `method.request.*` keys
//! - default VTL request templates for Lambda integrations

mod authorizer;
mod cors;
mod default_resolver;
mod naming;
mod request;
mod response;
mod templates;

pub use authorizer::{DEFAULT_IDENTITY_SOURCE, DEFAULT_RESULT_TTL_IN_SECONDS};
pub use cors::DEFAULT_CORS_HEADERS;
pub use default_resolver::DefaultResolver;
pub use naming::Naming;
pub use templates::{DEFAULT_FORM_URL_ENCODED_REQUEST_TEMPLATE, DEFAULT_JSON_REQUEST_TEMPLATE};

use apig_integration_common::{
    CorsDescriptor, HttpEventSpec, HttpMethod, IntegrationResponse, IntegrationType,
    NormalizedHttp, NormalizedRequest, NormalizedResponse, PassThroughBehavior, RequestSpec,
    ResolvedAuthorizer, Result,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Collaborator supplying the canonical parts of an HTTP event
///
/// Every fallible operation reports a configuration error; these are the
/// caller's problem and abort the pass that asked.
pub trait HttpResolver {
    /// Interpret the raw `http` payload of an event
    fn resolve_http(&self, event: &Value, function_name: &str) -> Result<HttpEventSpec>;

    fn resolve_path(&self, http: &HttpEventSpec, function_name: &str) -> Result<String>;

    fn resolve_method(&self, http: &HttpEventSpec, function_name: &str) -> Result<HttpMethod>;

    fn resolve_authorizer(
        &self,
        http: &HttpEventSpec,
        function_name: &str,
    ) -> Result<ResolvedAuthorizer>;

    /// CORS for one event; `method` is the already resolved event method
    fn resolve_cors(&self, http: &HttpEventSpec, method: HttpMethod) -> Result<CorsDescriptor>;

    fn resolve_integration_type(
        &self,
        http: &HttpEventSpec,
        function_name: &str,
    ) -> Result<IntegrationType>;

    fn resolve_request(&self, request: &RequestSpec) -> Result<NormalizedRequest>;

    /// Pass-through behavior of the event's request, `NEVER` when unset
    fn resolve_request_pass_through(&self, http: &HttpEventSpec) -> Result<PassThroughBehavior>;

    /// Response shaping of the event, empty when unset
    fn resolve_response(&self, http: &HttpEventSpec) -> Result<NormalizedResponse>;

    /// Request templates for the integration, `None` when there are none
    fn resolve_request_templates(
        &self,
        http: &NormalizedHttp,
        is_aws: bool,
    ) -> Option<BTreeMap<String, String>>;

    fn resolve_integration_responses(&self, http: &NormalizedHttp) -> Vec<IntegrationResponse>;
}
