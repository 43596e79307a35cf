//! Authorizer resolution

use crate::naming::Naming;
use apig_integration_common::{
    AuthorizerConfig, AuthorizerSpec, AuthorizerType, CfnValue, Error, ResolvedAuthorizer, Result,
};

/// Header the token is read from unless configured otherwise
pub const DEFAULT_IDENTITY_SOURCE: &str = "method.request.header.Authorization";

/// Authorizer result cache lifetime unless configured otherwise
pub const DEFAULT_RESULT_TTL_IN_SECONDS: u32 = 300;

fn is_cognito_user_pool_arn(arn: &str) -> bool {
    arn.starts_with("arn:aws:cognito-idp:") && arn.contains(":userpool/")
}

fn is_aws_iam(value: &str) -> bool {
    value.eq_ignore_ascii_case("aws_iam")
}

/// Resolve the authorizer of an event
///
/// A plain string is either `aws_iam`, the name of a function in the same
/// service, or an ARN. Function names become a `Fn::GetAtt` on the
/// function's logical id.
pub fn resolve_authorizer(spec: &AuthorizerSpec, function_name: &str) -> Result<ResolvedAuthorizer> {
    match spec {
        AuthorizerSpec::Reference(reference) if is_aws_iam(reference) => {
            Ok(ResolvedAuthorizer::aws_iam())
        }
        AuthorizerSpec::Reference(reference) => resolve_config(
            &AuthorizerConfig {
                name: (!reference.contains(':')).then(|| reference.clone()),
                arn: reference.contains(':').then(|| reference.clone()),
                ..Default::default()
            },
            function_name,
        ),
        AuthorizerSpec::Config(config) => resolve_config(config, function_name),
    }
}

fn resolve_config(config: &AuthorizerConfig, function_name: &str) -> Result<ResolvedAuthorizer> {
    if config.authorizer_type.as_deref().is_some_and(is_aws_iam) {
        return Ok(ResolvedAuthorizer::aws_iam());
    }

    let (name, arn) = match (&config.name, &config.arn) {
        (name, Some(arn)) => (
            name.clone().unwrap_or_else(|| Naming::name_from_arn(arn)),
            CfnValue::literal(arn.as_str()),
        ),
        (Some(name), None) => (
            name.clone(),
            CfnValue::get_att(Naming::lambda_logical_id(name), "Arn"),
        ),
        (None, None) => {
            return Err(Error::InvalidAuthorizer {
                function: function_name.to_string(),
                reason: "Please provide either an authorizer name or ARN".to_string(),
            })
        }
    };

    let authorizer_type = match arn.as_literal() {
        Some(literal) if is_cognito_user_pool_arn(literal) => AuthorizerType::CognitoUserPools,
        _ => match config
            .authorizer_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("request") => AuthorizerType::Request,
            Some("cognito_user_pools") => AuthorizerType::CognitoUserPools,
            Some("token") | None => AuthorizerType::Token,
            Some(other) => {
                return Err(Error::InvalidAuthorizer {
                    function: function_name.to_string(),
                    reason: format!(
                        "unsupported authorizer type \"{other}\", use token, request, cognito_user_pools or aws_iam"
                    ),
                })
            }
        },
    };

    Ok(ResolvedAuthorizer {
        authorizer_type,
        name: Some(name),
        arn: Some(arn),
        result_ttl_in_seconds: Some(
            config
                .result_ttl_in_seconds
                .unwrap_or(DEFAULT_RESULT_TTL_IN_SECONDS),
        ),
        identity_source: Some(
            config
                .identity_source
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTITY_SOURCE.to_string()),
        ),
        identity_validation_expression: config.identity_validation_expression.clone(),
        claims: config.claims.clone().unwrap_or_default(),
    })
}
