//! Logical id naming
//!
//! Mirrors the naming rules used when functions are emitted into the
//! CloudFormation template, so ids computed here line up with the
//! resources the emitter creates.

/// Naming helpers for template logical ids
pub struct Naming;

impl Naming {
    /// Upper-case the first character
    ///
    /// # Examples
    /// ```
    /// use apig_integration_resolver::Naming;
    ///
    /// assert_eq!(Naming::normalize_name("hello"), "Hello");
    /// assert_eq!(Naming::normalize_name(""), "");
    /// ```
    pub fn normalize_name(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Function name made safe for logical ids
    ///
    /// # Examples
    /// ```
    /// use apig_integration_resolver::Naming;
    ///
    /// assert_eq!(
    ///     Naming::normalized_function_name("create-user_v2"),
    ///     "CreateDashuserUnderscorev2"
    /// );
    /// ```
    pub fn normalized_function_name(function_name: &str) -> String {
        Self::normalize_name(
            &function_name
                .replace('-', "Dash")
                .replace('_', "Underscore"),
        )
    }

    /// Logical id of the Lambda function resource
    ///
    /// # Examples
    /// ```
    /// use apig_integration_resolver::Naming;
    ///
    /// assert_eq!(Naming::lambda_logical_id("hello"), "HelloLambdaFunction");
    /// ```
    pub fn lambda_logical_id(function_name: &str) -> String {
        format!("{}LambdaFunction", Self::normalized_function_name(function_name))
    }

    /// Last `:` separated segment of an ARN
    pub fn name_from_arn(arn: &str) -> String {
        arn.rsplit(':').next().unwrap_or(arn).to_string()
    }
}
