//! HTTP event normalization and method integration synthesis
//!
//! Two passes over a service's functions:
//!
//! 1. [`validate`] resolves every `http` event into a [`NormalizedHttp`],
//!    rejects HTTP integrations without a backend URI, strips request and
//!    response configuration that proxy integrations cannot use (with a
//!    warning), and merges CORS settings per path.
//! 2. [`method_integration`] turns one normalized event into the
//!    `Integration` block of its API Gateway method.
//!
//! [`HttpEventCompiler`] wires both passes to one resolver and one log.
//!
//! [`NormalizedHttp`]: apig_integration_common::NormalizedHttp

mod compiler;
mod integration;
mod parameters;
mod report;
mod validator;

pub use compiler::HttpEventCompiler;
pub use integration::{lambda_invocation_uri, method_integration};
pub use parameters::integration_request_parameters;
pub use report::ReportRenderer;
pub use validator::{
    default_status_codes, merge_cors, normalize_http, validate, Validation, DEFAULT_STATUS_CODES,
};
