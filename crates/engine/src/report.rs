//! Markdown summary of a validation pass

use crate::validator::Validation;
use apig_integration_common::{Error, Result, ServiceDefinition};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Tera, Value};

/// Renders a [`Validation`] as a Markdown report
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("route_path", route_path_filter);

        tera.add_raw_template("report.md", include_str!("../templates/report.md.tera"))
            .map_err(|e| Error::Render(format!("Failed to load report template: {}", e)))?;

        Ok(Self { tera })
    }

    /// Render the report for `validation` of `service`
    pub fn render(
        &self,
        service: &ServiceDefinition,
        validation: &Validation,
        warnings: &[String],
    ) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("service_name", &service.service);
        context.insert("region", &service.provider.region);
        context.insert("stage", &service.provider.stage);
        context.insert("events", &validation.events);
        context.insert("cors_preflight", &validation.cors_preflight);
        context.insert("warnings", warnings);

        self.tera
            .render("report.md", &context)
            .map_err(|e| Error::Render(format!("Template error: {:?}", e)))
    }

    /// Render and write the report to `output_path`
    pub fn write_to(
        &self,
        output_path: &Path,
        service: &ServiceDefinition,
        validation: &Validation,
        warnings: &[String],
    ) -> Result<()> {
        let rendered = self.render(service, validation, warnings)?;
        fs::write(output_path, rendered)?;
        Ok(())
    }
}

/// Filter rendering a normalized path as a route, `users` as `/users`
fn route_path_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("route_path filter expects a string"))?;

    Ok(Value::String(format!("/{}", path)))
}
