//! Method integration documents handed to the template emitter

use crate::intrinsic::CfnValue;
use crate::model::{IntegrationType, PassThroughBehavior};
use serde::Serialize;
use std::collections::BTreeMap;

/// `{"Properties": {"Integration": ...}}`, merged by the emitter into the
/// `AWS::ApiGateway::Method` resource of the event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodIntegration {
    pub properties: MethodProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodProperties {
    pub integration: IntegrationDocument,
}

impl MethodIntegration {
    pub fn integration(&self) -> &IntegrationDocument {
        &self.properties.integration
    }
}

impl From<IntegrationDocument> for MethodIntegration {
    fn from(integration: IntegrationDocument) -> Self {
        MethodIntegration {
            properties: MethodProperties { integration },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntegrationDocument {
    pub integration_http_method: String,

    #[serde(rename = "Type")]
    pub integration_type: IntegrationType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<CfnValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthrough_behavior: Option<PassThroughBehavior>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_templates: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_responses: Option<Vec<IntegrationResponse>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_parameters: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntegrationResponse {
    pub status_code: u16,
    pub selection_pattern: String,
    pub response_parameters: BTreeMap<String, String>,
    pub response_templates: BTreeMap<String, String>,
}
