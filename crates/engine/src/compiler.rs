//! Assembled HTTP event compiler

use crate::integration::method_integration;
use crate::parameters::integration_request_parameters;
use crate::validator::{validate, Validation};
use apig_integration_common::{
    Log, MethodIntegration, NormalizedHttp, NormalizedRequest, Result, ServiceDefinition,
};
use apig_integration_resolver::HttpResolver;
use std::collections::BTreeMap;

/// Validation and integration synthesis over one resolver and one log
///
/// The resolver supplies every canonical event part; the log receives the
/// warnings for configuration that gets stripped.
///
/// # Examples
/// ```
/// use apig_integration_common::{MemoryLog, ServiceDefinition};
/// use apig_integration_engine::HttpEventCompiler;
/// use apig_integration_resolver::DefaultResolver;
///
/// let service = ServiceDefinition::from_yaml_str(
///     "functions:\n  hello:\n    events:\n      - http: GET hello\n",
/// )
/// .unwrap();
///
/// let log = MemoryLog::new();
/// let compiler = HttpEventCompiler::new(DefaultResolver::new(), &log);
/// let validation = compiler.validate(&service).unwrap();
///
/// assert_eq!(validation.events.len(), 1);
/// assert!(log.is_empty());
/// ```
pub struct HttpEventCompiler<R, L> {
    resolver: R,
    log: L,
}

impl<R: HttpResolver, L: Log> HttpEventCompiler<R, L> {
    pub fn new(resolver: R, log: L) -> Self {
        Self { resolver, log }
    }

    /// Normalize every HTTP event of the service
    pub fn validate(&self, service: &ServiceDefinition) -> Result<Validation> {
        validate(&service.functions, &self.resolver, &self.log)
    }

    /// Integration block for one normalized event
    pub fn method_integration(
        &self,
        http: &NormalizedHttp,
        function_logical_id: &str,
    ) -> MethodIntegration {
        method_integration(http, function_logical_id, &self.resolver)
    }

    pub fn integration_request_parameters(
        &self,
        request: &NormalizedRequest,
    ) -> BTreeMap<String, String> {
        integration_request_parameters(request)
    }
}
