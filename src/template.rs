//! Template and parameter loading, and the typed deployment request body.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{DeployError, FileRole, Result};
use crate::provider::TemplateCompiler;

/// Parsed template document. Always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument(Map<String, Value>);

impl TemplateDocument {
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("expected a JSON object, found {}", json_type(&other))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl Serialize for TemplateDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Deployment parameters. `None` omits the field from the request;
/// `Provided` with an empty map sends `{}`. The remote API treats these
/// differently.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Parameters {
    #[default]
    None,
    Provided(Map<String, Value>),
}

impl Parameters {
    pub fn is_none(&self) -> bool {
        matches!(self, Parameters::None)
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Parameters::None => serializer.serialize_none(),
            Parameters::Provided(map) => map.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DeploymentMode {
    /// Resources not named in the template are left untouched
    #[default]
    Incremental,
}

/// Body of a create-or-update deployment call (the ARM `properties` object)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentRequest {
    mode: DeploymentMode,
    template: TemplateDocument,
    #[serde(skip_serializing_if = "Parameters::is_none")]
    parameters: Parameters,
}

impl DeploymentRequest {
    pub fn builder(template: TemplateDocument) -> DeploymentRequestBuilder {
        DeploymentRequestBuilder {
            template,
            parameters: Parameters::None,
        }
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn template(&self) -> &TemplateDocument {
        &self.template
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

pub struct DeploymentRequestBuilder {
    template: TemplateDocument,
    parameters: Parameters,
}

impl DeploymentRequestBuilder {
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn build(self) -> DeploymentRequest {
        DeploymentRequest {
            mode: DeploymentMode::Incremental,
            template: self.template,
            parameters: self.parameters,
        }
    }
}

/// Loads template and parameter files into a [`DeploymentRequest`].
/// Touches only the local filesystem (and the Bicep compiler for `.bicep`).
#[derive(Default)]
pub struct TemplatePayloadBuilder<'a> {
    compiler: Option<&'a dyn TemplateCompiler>,
}

impl<'a> TemplatePayloadBuilder<'a> {
    pub fn new() -> Self {
        Self { compiler: None }
    }

    pub fn with_compiler(mut self, compiler: &'a dyn TemplateCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn build(&self, template_path: &Path, params_path: Option<&Path>) -> Result<DeploymentRequest> {
        // Both files must exist before either is parsed or compiled
        require_file(FileRole::Template, template_path)?;
        if let Some(path) = params_path {
            require_file(FileRole::Parameters, path)?;
        }

        let template = self.load_template(template_path)?;
        let parameters = match params_path {
            Some(path) => load_parameters(path)?,
            None => Parameters::None,
        };

        Ok(DeploymentRequest::builder(template)
            .parameters(parameters)
            .build())
    }

    fn load_template(&self, path: &Path) -> Result<TemplateDocument> {
        let value = if is_bicep(path) {
            let compiler = self.compiler.ok_or_else(|| {
                parse_error(
                    FileRole::Template,
                    path,
                    "Bicep templates need the az bicep compiler",
                )
            })?;
            debug!(template = %path.display(), "Compiling Bicep template");
            compiler
                .compile(path)
                .map_err(|e| parse_error(FileRole::Template, path, e.to_string()))?
        } else {
            read_json(FileRole::Template, path)?
        };

        TemplateDocument::from_value(value).map_err(|msg| parse_error(FileRole::Template, path, msg))
    }
}

/// Read a parameters file and extract its `parameters` member
fn load_parameters(path: &Path) -> Result<Parameters> {
    let value = read_json(FileRole::Parameters, path)?;
    let mut wrapper = match value {
        Value::Object(map) => map,
        other => {
            return Err(parse_error(
                FileRole::Parameters,
                path,
                format!("expected a JSON object, found {}", json_type(&other)),
            ))
        }
    };

    match wrapper.remove("parameters") {
        Some(Value::Object(map)) => Ok(Parameters::Provided(map)),
        Some(other) => Err(parse_error(
            FileRole::Parameters,
            path,
            format!("'parameters' must be an object, found {}", json_type(&other)),
        )),
        None => {
            warn!(
                parameters = %path.display(),
                "Parameters file has no 'parameters' member; deploying without parameters"
            );
            Ok(Parameters::None)
        }
    }
}

fn require_file(role: FileRole, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DeployError::NotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn read_json(role: FileRole, path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DeployError::NotFound {
            role,
            path: path.to_path_buf(),
        },
        _ => DeployError::Io {
            role,
            path: path.to_path_buf(),
            source,
        },
    })?;
    // ARM files written on Windows often start with a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    serde_json::from_str(content).map_err(|e| parse_error(role, path, e.to_string()))
}

fn is_bicep(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("bicep"))
        .unwrap_or(false)
}

fn parse_error(role: FileRole, path: &Path, message: impl Into<String>) -> DeployError {
    DeployError::Parse {
        role,
        path: PathBuf::from(path),
        message: message.into(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
