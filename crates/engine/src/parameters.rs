//! Integration request parameters

use apig_integration_common::NormalizedRequest;
use std::collections::BTreeMap;

const METHOD_PREFIX: &str = "method.";
const INTEGRATION_PREFIX: &str = "integration.";

/// Build the integration's `RequestParameters`
///
/// Every declared method parameter is forwarded under the same name on the
/// integration side (`integration.request.querystring.q` from
/// `method.request.querystring.q`). Entries of `request.integrations` are
/// copied afterwards and win on collision.
///
/// # Examples
/// ```
/// use apig_integration_common::NormalizedRequest;
/// use apig_integration_engine::integration_request_parameters;
/// use std::collections::BTreeMap;
///
/// let request = NormalizedRequest {
///     parameters: BTreeMap::from([("method.request.path.id".to_string(), true)]),
///     ..Default::default()
/// };
///
/// let parameters = integration_request_parameters(&request);
/// assert_eq!(
///     parameters["integration.request.path.id"],
///     "method.request.path.id"
/// );
/// ```
pub fn integration_request_parameters(request: &NormalizedRequest) -> BTreeMap<String, String> {
    let mut parameters: BTreeMap<String, String> = request
        .parameters
        .keys()
        .map(|key| {
            let name = key.strip_prefix(METHOD_PREFIX).unwrap_or(key);
            (format!("{INTEGRATION_PREFIX}{name}"), key.clone())
        })
        .collect();

    parameters.extend(
        request
            .integrations
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    parameters
}
