//! Response shaping and integration responses

use apig_integration_common::{
    Error, IntegrationResponse, NormalizedHttp, NormalizedResponse, ResponseSpec, Result,
    StatusCodeMapping, TemplateSpec,
};
use std::collections::BTreeMap;

const JSON_CONTENT_TYPE: &str = "application/json";
const RESPONSE_HEADER_PREFIX: &str = "method.response.header.";

fn template_by_content_type(template: &TemplateSpec) -> BTreeMap<String, String> {
    match template {
        TemplateSpec::Json(body) => BTreeMap::from([(JSON_CONTENT_TYPE.to_string(), body.clone())]),
        TemplateSpec::ByContentType(templates) => templates.clone(),
    }
}

pub fn resolve_response(response: Option<&ResponseSpec>) -> Result<NormalizedResponse> {
    let Some(response) = response else {
        return Ok(NormalizedResponse::default());
    };

    let mut status_codes = BTreeMap::new();
    for (code, spec) in response.status_codes.iter().flatten() {
        if !(100..=599).contains(code) {
            return Err(Error::InvalidResponse(format!(
                "status code {code} is not a valid HTTP status"
            )));
        }
        status_codes.insert(
            *code,
            StatusCodeMapping {
                pattern: spec.pattern.clone(),
                headers: spec.headers.clone().unwrap_or_default(),
                template: spec
                    .template
                    .as_ref()
                    .map(template_by_content_type)
                    .unwrap_or_default(),
            },
        );
    }

    Ok(NormalizedResponse {
        headers: response.headers.clone().unwrap_or_default(),
        template: response.template.clone(),
        status_codes,
    })
}

/// One integration response per configured status code, ascending
///
/// Response headers are the event's CORS origin, then the response-wide
/// headers, then the status code's own headers; later entries win.
pub fn integration_responses(http: &NormalizedHttp) -> Vec<IntegrationResponse> {
    let Some(response) = &http.response else {
        return Vec::new();
    };

    let mut shared_headers = BTreeMap::new();
    if let Some(cors) = &http.cors {
        shared_headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            format!("'{}'", cors.allow_origin()),
        );
    }
    shared_headers.extend(response.headers.clone());

    response
        .status_codes
        .iter()
        .map(|(code, mapping)| {
            let response_parameters = shared_headers
                .iter()
                .chain(mapping.headers.iter())
                .map(|(header, value)| (format!("{RESPONSE_HEADER_PREFIX}{header}"), value.clone()))
                .collect();

            let response_templates = if !mapping.template.is_empty() {
                mapping.template.clone()
            } else {
                response
                    .template
                    .iter()
                    .map(|t| (JSON_CONTENT_TYPE.to_string(), t.clone()))
                    .collect()
            };

            IntegrationResponse {
                status_code: *code,
                selection_pattern: mapping.pattern.clone().unwrap_or_default(),
                response_parameters,
                response_templates,
            }
        })
        .collect()
}
