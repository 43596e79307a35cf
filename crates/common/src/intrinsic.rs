//! CloudFormation intrinsic values
//!
//! Values that are only known at deploy time (regions, function ARNs) are
//! never evaluated here. They are carried as intrinsic expressions and
//! serialized in the shape the template engine expects.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A literal or an unevaluated CloudFormation intrinsic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfnValue {
    /// Plain string
    Literal(String),
    /// `{"Ref": "<logical id or pseudo parameter>"}`
    Ref(String),
    /// `{"Fn::GetAtt": ["<logical id>", "<attribute>"]}`
    GetAtt(String, String),
    /// `{"Fn::Join": ["<separator>", [...]]}`
    Join(String, Vec<CfnValue>),
}

impl CfnValue {
    pub fn literal(value: impl Into<String>) -> Self {
        CfnValue::Literal(value.into())
    }

    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        CfnValue::GetAtt(logical_id.into(), attribute.into())
    }

    /// `Ref` to the `AWS::Region` pseudo parameter
    pub fn region() -> Self {
        CfnValue::Ref("AWS::Region".to_string())
    }

    /// Literal content, if this value is a plain string
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            CfnValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value, or any value nested in it, references `logical_id`
    pub fn references(&self, logical_id: &str) -> bool {
        match self {
            CfnValue::Literal(_) => false,
            CfnValue::Ref(id) | CfnValue::GetAtt(id, _) => id == logical_id,
            CfnValue::Join(_, parts) => parts.iter().any(|p| p.references(logical_id)),
        }
    }
}

impl From<&str> for CfnValue {
    fn from(value: &str) -> Self {
        CfnValue::Literal(value.to_string())
    }
}

struct GetAttArgs<'a>(&'a str, &'a str);

impl Serialize for GetAttArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.0)?;
        seq.serialize_element(self.1)?;
        seq.end()
    }
}

struct JoinArgs<'a>(&'a str, &'a [CfnValue]);

impl Serialize for JoinArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.0)?;
        seq.serialize_element(self.1)?;
        seq.end()
    }
}

impl Serialize for CfnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CfnValue::Literal(s) => serializer.serialize_str(s),
            CfnValue::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            CfnValue::GetAtt(id, attr) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &GetAttArgs(id, attr))?;
                map.end()
            }
            CfnValue::Join(sep, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &JoinArgs(sep, parts))?;
                map.end()
            }
        }
    }
}
