//! Common types and utilities for apig-integration
//!
//! This crate contains the shared data model (raw HTTP event specifications,
//! their normalized form and the integration documents derived from them),
//! the error type, the warning log sink and service definition loading.

mod event;
mod integration;
mod intrinsic;
mod log;
mod model;
mod service;

pub use event::{
    AuthorizerConfig, AuthorizerSpec, CorsConfig, CorsSpec, HttpEventSpec, ParameterSpec,
    RequestSpec, ResponseSpec, StatusCodeSpec, TemplateSpec,
};
pub use integration::{IntegrationDocument, IntegrationResponse, MethodIntegration, MethodProperties};
pub use intrinsic::CfnValue;
pub use log::{Log, MemoryLog};
pub use model::{
    AuthorizerType, CorsDescriptor, CorsPreflight, EventRecord, HttpMethod, IntegrationType,
    NormalizedHttp, NormalizedRequest, NormalizedResponse, PassThroughBehavior,
    ResolvedAuthorizer, StatusCodeMapping,
};
pub use service::{FunctionDefinition, FunctionEvent, ProviderConfig, ServiceDefinition, ServiceFormat};

use thiserror::Error;

/// Errors raised while loading or normalizing HTTP events
#[derive(Error, Debug)]
pub enum Error {
    #[error("You need to set the request uri when using the {integration} integration.")]
    MissingRequestUri { integration: IntegrationType },

    #[error("Invalid http event in function \"{function}\": {reason}")]
    InvalidHttpEvent { function: String, reason: String },

    #[error("Missing or invalid \"path\" property in function \"{function}\" for http event")]
    InvalidPath { function: String },

    #[error(
        "Invalid APIG method \"{method}\" in function \"{function}\". \
         AWS supported methods are: get, post, put, patch, options, head, delete, any."
    )]
    InvalidMethod { method: String, function: String },

    #[error("Invalid authorizer in function \"{function}\": {reason}")]
    InvalidAuthorizer { function: String, reason: String },

    #[error(
        "Invalid integration \"{integration}\" in function \"{function}\". \
         Supported integrations are: lambda, lambda-proxy, http, http-proxy, mock."
    )]
    InvalidIntegration { integration: String, function: String },

    #[error("Request passThrough \"{value}\" is not one of NEVER, WHEN_NO_MATCH, WHEN_NO_TEMPLATES")]
    InvalidPassThrough { value: String },

    #[error("Invalid cors configuration: {0}")]
    InvalidCors(String),

    #[error("Invalid request configuration: {0}")]
    InvalidRequest(String),

    #[error("Invalid response configuration: {0}")]
    InvalidResponse(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for conditions raised by the normalization pass itself rather
    /// than by a resolution rule or by loading.
    pub fn is_fatal_validation(&self) -> bool {
        matches!(self, Error::MissingRequestUri { .. })
    }
}

/// Result type for normalization operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_uri_message_names_integration() {
        let err = Error::MissingRequestUri {
            integration: IntegrationType::HttpProxy,
        };
        assert_eq!(
            err.to_string(),
            "You need to set the request uri when using the HTTP_PROXY integration."
        );
        assert!(err.is_fatal_validation());
    }

    #[test]
    fn test_collaborator_errors_are_not_validation_errors() {
        let err = Error::InvalidPath {
            function: "hello".to_string(),
        };
        assert!(!err.is_fatal_validation());
    }
}
