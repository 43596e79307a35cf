//! Request shaping resolution

use apig_integration_common::{
    Error, NormalizedRequest, ParameterSpec, PassThroughBehavior, RequestSpec, Result,
};
use std::collections::BTreeMap;

const FLAT_PARAMETER_PREFIX: &str = "method.request.";

/// Grouped parameter location to its singular API Gateway name
fn parameter_location(group: &str) -> Option<&'static str> {
    match group {
        "querystrings" => Some("querystring"),
        "paths" => Some("path"),
        "headers" => Some("header"),
        _ => None,
    }
}

/// Flatten declared parameters to `method.request.<location>.<name>` keys
///
/// Keys that are already flat are kept as they are, so flattening an
/// already resolved request changes nothing.
pub fn flatten_parameters(
    parameters: &BTreeMap<String, ParameterSpec>,
) -> Result<BTreeMap<String, bool>> {
    let mut flat = BTreeMap::new();

    for (key, spec) in parameters {
        match spec {
            ParameterSpec::Required(required) if key.starts_with(FLAT_PARAMETER_PREFIX) => {
                flat.insert(key.clone(), *required);
            }
            ParameterSpec::Group(names) => {
                let location = parameter_location(key).ok_or_else(|| {
                    Error::InvalidRequest(format!(
                        "unsupported parameter location \"{key}\", use querystrings, paths or headers"
                    ))
                })?;
                for (name, required) in names {
                    flat.insert(format!("{FLAT_PARAMETER_PREFIX}{location}.{name}"), *required);
                }
            }
            ParameterSpec::Required(_) => {
                return Err(Error::InvalidRequest(format!(
                    "parameter \"{key}\" must be declared under querystrings, paths or headers"
                )))
            }
        }
    }

    Ok(flat)
}

pub fn resolve_pass_through(request: Option<&RequestSpec>) -> Result<PassThroughBehavior> {
    match request.and_then(|r| r.pass_through.as_deref()) {
        Some(value) => PassThroughBehavior::parse(value).ok_or_else(|| Error::InvalidPassThrough {
            value: value.to_string(),
        }),
        None => Ok(PassThroughBehavior::default()),
    }
}

pub fn resolve_request(request: &RequestSpec) -> Result<NormalizedRequest> {
    let pass_through = match request.pass_through {
        Some(_) => Some(resolve_pass_through(Some(request))?),
        None => None,
    };

    Ok(NormalizedRequest {
        uri: request.uri.clone(),
        method: request.method.clone(),
        pass_through,
        parameters: match &request.parameters {
            Some(parameters) => flatten_parameters(parameters)?,
            None => BTreeMap::new(),
        },
        integrations: request.integrations.clone().unwrap_or_default(),
        template: request.template.clone().unwrap_or_default(),
    })
}
