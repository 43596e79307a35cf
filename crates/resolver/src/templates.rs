//! Default request templates for Lambda (`AWS`) integrations
//!
//! Both templates hand the function an event with the body, method,
//! principal, stage, headers, query, path, identity and stage variables.

use apig_integration_common::NormalizedHttp;
use std::collections::BTreeMap;

pub const DEFAULT_JSON_REQUEST_TEMPLATE: &str = r##"
  #define( $loop )
    {
    #foreach($key in $map.keySet())
        #set( $k = $util.escapeJavaScript($key) )
        #set( $v = $util.escapeJavaScript($map.get($key)).replaceAll("\\'", "'") )
        "$k":
          "$v"
          #if( $foreach.hasNext ) , #end
    #end
    }
  #end

  {
    "body": $input.json("$"),
    "method": "$context.httpMethod",
    "principalId": "$context.authorizer.principalId",
    "stage": "$context.stage",

    "cognitoPoolClaims" : {
       "sub": "$context.authorizer.claims.sub"
    },

    #set( $map = $input.params().header )
    "headers": $loop,

    #set( $map = $input.params().querystring )
    "query": $loop,

    #set( $map = $input.params().path )
    "path": $loop,

    #set( $map = $context.identity )
    "identity": $loop,

    #set( $map = $stageVariables )
    "stageVariables": $loop
  }
"##;

pub const DEFAULT_FORM_URL_ENCODED_REQUEST_TEMPLATE: &str = r##"
  #define( $body )
    {
    #foreach( $token in $input.path('$').split('&') )
      #set( $keyVal = $token.split('=') )
      #set( $keyValSize = $keyVal.size() )
      #if( $keyValSize >= 1 )
        #set( $key = $util.urlDecode($keyVal[0]) )
        #if( $keyValSize >= 2 )
          #set( $val = $util.urlDecode($keyVal[1]) )
        #else
          #set( $val = '' )
        #end
        "$key": "$val"#if($foreach.hasNext),#end
      #end
    #end
    }
  #end

  #define( $loop )
    {
    #foreach($key in $map.keySet())
        #set( $k = $util.escapeJavaScript($key) )
        #set( $v = $util.escapeJavaScript($map.get($key)).replaceAll("\\'", "'") )
        "$k":
          "$v"
          #if( $foreach.hasNext ) , #end
    #end
    }
  #end

  {
    "body": $body,
    "method": "$context.httpMethod",
    "principalId": "$context.authorizer.principalId",
    "stage": "$context.stage",

    "cognitoPoolClaims" : {
       "sub": "$context.authorizer.claims.sub"
    },

    #set( $map = $input.params().header )
    "headers": $loop,

    #set( $map = $input.params().querystring )
    "query": $loop,

    #set( $map = $input.params().path )
    "path": $loop,

    #set( $map = $context.identity )
    "identity": $loop,

    #set( $map = $stageVariables )
    "stageVariables": $loop
  }
"##;

/// Request templates for an integration
///
/// With `use_defaults` the Lambda templates for JSON and form bodies are
/// included; templates from `request.template` are applied on top.
pub fn request_templates(
    http: &NormalizedHttp,
    use_defaults: bool,
) -> Option<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();

    if use_defaults {
        templates.insert(
            "application/json".to_string(),
            DEFAULT_JSON_REQUEST_TEMPLATE.to_string(),
        );
        templates.insert(
            "application/x-www-form-urlencoded".to_string(),
            DEFAULT_FORM_URL_ENCODED_REQUEST_TEMPLATE.to_string(),
        );
    }

    if let Some(request) = &http.request {
        templates.extend(request.template.clone());
    }

    (!templates.is_empty()).then_some(templates)
}
