//! FilterNode trait and node metadata.
//!
//! The FilterNode trait is the core abstraction for every node in the crate.
//! It uses a two-phase design: validation (before execution) and execution
//! (processing). [`invoke`] drives both phases for a single call.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, NodeId, SeamweaveError, ValidationError};
use crate::core::port::{ParameterDefinition, PortDefinition};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category for organizing nodes in a host's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Texture generation
    Texture,
    /// Numeric helpers
    Math,
    /// Text and prompt helpers
    Text,
    /// Routing and inspection
    Utility,
    /// Custom/user-defined
    #[default]
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Texture => "Texture",
            Category::Math => "Math",
            Category::Text => "Text",
            Category::Utility => "Utility",
            Category::Custom => "Custom",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Texture,
            Category::Math,
            Category::Text,
            Category::Utility,
            Category::Custom,
        ]
    }
}

/// Metadata describing a node.
///
/// This struct contains all information needed to:
/// - List the node in a host or on the command line
/// - Check inputs and parameters before execution
/// - Document the node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Unique identifier for this node type (e.g., "seamless_texture")
    pub id: String,
    /// Human-readable name (e.g., "Seamless Texture")
    pub name: String,
    /// Category for UI organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Version string
    pub version: String,

    /// Input port definitions
    pub inputs: Vec<PortDefinition>,
    /// Output port definitions
    pub outputs: Vec<PortDefinition>,
    /// Parameter definitions
    pub parameters: Vec<ParameterDefinition>,

    /// Searchable tags
    pub tags: Vec<String>,
    /// Whether this node is deterministic (same inputs always give same outputs)
    pub deterministic: bool,
}

impl NodeMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> NodeMetadataBuilder {
        NodeMetadataBuilder::new(id, name)
    }

    /// Get all output port names.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find an input port by name.
    pub fn get_input(&self, name: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Find an output port by name.
    pub fn get_output(&self, name: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Builder for NodeMetadata.
pub struct NodeMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    version: String,
    inputs: Vec<PortDefinition>,
    outputs: Vec<PortDefinition>,
    parameters: Vec<ParameterDefinition>,
    tags: Vec<String>,
    deterministic: bool,
}

impl NodeMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Custom,
            description: String::new(),
            version: crate::VERSION.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
            deterministic: true,
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an input port.
    pub fn input(mut self, port: PortDefinition) -> Self {
        self.inputs.push(port);
        self
    }

    /// Add an output port.
    pub fn output(mut self, port: PortDefinition) -> Self {
        self.outputs.push(port);
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Mark as non-deterministic.
    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    /// Build the metadata.
    pub fn build(self) -> NodeMetadata {
        NodeMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            version: self.version,
            inputs: self.inputs,
            outputs: self.outputs,
            parameters: self.parameters,
            tags: self.tags,
            deterministic: self.deterministic,
        }
    }
}

/// The core trait for nodes.
///
/// # Design
///
/// The trait uses a two-phase design:
///
/// 1. **Validation Phase** (`validate`): Checks that inputs and parameters
///    make sense together before any pixels are touched.
///
/// 2. **Execution Phase** (`execute`): Reads inputs, does the work and sets
///    every declared output.
///
/// # Thread Safety
///
/// `Send + Sync` bounds let hosts share nodes across threads. Nodes hold no
/// mutable state; anything they need per call comes through the context.
///
/// # Example Implementation
///
/// ```ignore
/// struct Invert;
///
/// impl FilterNode for Invert {
///     fn metadata(&self) -> NodeMetadata {
///         NodeMetadata::builder("invert", "Invert")
///             .category(Category::Utility)
///             .input(PortDefinition::input("image", PortType::Image))
///             .output(PortDefinition::output("result", PortType::Image))
///             .build()
///     }
///
///     fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
///         ctx.get_input_image("image")?;
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
///         let image = ctx.take_input_buffer("image")?;
///         ctx.set_output("result", buffer::map_samples(&image, |v| 1.0 - v).into())
///     }
///
///     fn clone_box(&self) -> Box<dyn FilterNode> {
///         Box::new(Invert)
///     }
/// }
/// ```
pub trait FilterNode: Send + Sync {
    /// Get the metadata for this node.
    ///
    /// Should return the same value on every call.
    fn metadata(&self) -> NodeMetadata;

    /// Validate the node configuration.
    ///
    /// Parameters have already been filled with defaults and checked against
    /// their declared constraints; this hook covers cross-field rules.
    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError>;

    /// Execute the node.
    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError>;

    /// Whether hosts must re-run this node even when its inputs are unchanged.
    fn is_volatile(&self) -> bool {
        false
    }

    /// Clone this node into a boxed trait object.
    fn clone_box(&self) -> Box<dyn FilterNode>;
}

// Allow cloning Box<dyn FilterNode>
impl Clone for Box<dyn FilterNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Run one node on the given inputs and parameters.
///
/// Parameters missing from `parameters` take their declared default; every
/// parameter is checked against its type and constraints. Required inputs
/// must be present. After execution every non-optional output must be set.
pub fn invoke(
    node: &dyn FilterNode,
    inputs: HashMap<String, Value>,
    parameters: HashMap<String, Value>,
) -> Result<HashMap<String, Value>, SeamweaveError> {
    let metadata = node.metadata();
    let node_id = NodeId::new();
    let mut vctx = ValidationContext::new(node_id);

    for port in &metadata.inputs {
        match inputs.get(&port.name) {
            Some(value) if !value.is_none() => {
                port.validate(value).map_err(|error| ValidationError::ConstraintViolation {
                    node_id,
                    parameter: port.name.clone(),
                    error,
                })?;
            }
            _ if port.optional => {}
            _ => {
                return Err(ValidationError::MissingRequiredInput {
                    node_id,
                    port: port.name.clone(),
                }
                .into())
            }
        }
    }
    for (name, value) in inputs {
        if metadata.get_input(&name).is_none() {
            log::warn!("{}: ignoring unknown input '{}'", metadata.id, name);
            continue;
        }
        vctx.add_input(name, value);
    }

    for name in parameters.keys() {
        if metadata.get_parameter(name).is_none() {
            log::warn!("{}: ignoring unknown parameter '{}'", metadata.id, name);
        }
    }
    for param in &metadata.parameters {
        let value = parameters
            .get(&param.name)
            .cloned()
            .unwrap_or_else(|| param.default_value.clone());
        param.validate(&value).map_err(|error| ValidationError::ConstraintViolation {
            node_id,
            parameter: param.name.clone(),
            error,
        })?;
        vctx.add_parameter(param.name.clone(), value);
    }

    node.validate(&vctx)?;

    let mut ctx = ExecutionContext::from(vctx);
    log::debug!("executing node {} ({})", metadata.id, node_id);
    node.execute(&mut ctx)?;

    for port in metadata.outputs.iter().filter(|p| !p.optional) {
        if !ctx.has_output(&port.name) {
            return Err(ExecutionError::OutputNotSet {
                node_id,
                port: port.name.clone(),
            }
            .into());
        }
    }

    Ok(ctx.take_outputs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PortType;

    /// Doubles an integer input; used to exercise `invoke`.
    #[derive(Debug, Clone)]
    struct Doubler {
        forget_output: bool,
    }

    impl FilterNode for Doubler {
        fn metadata(&self) -> NodeMetadata {
            NodeMetadata::builder("doubler", "Doubler")
                .category(Category::Math)
                .input(PortDefinition::input("value", PortType::Integer))
                .output(PortDefinition::output("result", PortType::Integer))
                .parameter(
                    ParameterDefinition::new("factor", PortType::Integer, Value::Integer(2))
                        .with_range(1.0, 4.0),
                )
                .build()
        }

        fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
            ctx.get_input("value")?;
            Ok(())
        }

        fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
            let value = ctx
                .get_input("value")?
                .as_integer()
                .ok_or_else(|| ExecutionError::NodeExecution {
                    node_id: ctx.node_id,
                    error: "not an integer".to_string(),
                })?;
            let factor = ctx.get_integer("factor")?;
            if !self.forget_output {
                ctx.set_output("result", Value::Integer(value * factor))?;
            }
            Ok(())
        }

        fn clone_box(&self) -> Box<dyn FilterNode> {
            Box::new(self.clone())
        }
    }

    fn inputs(value: i64) -> HashMap<String, Value> {
        HashMap::from([("value".to_string(), Value::Integer(value))])
    }

    #[test]
    fn test_metadata_builder() {
        let metadata = NodeMetadata::builder("test_filter", "Test Filter")
            .category(Category::Utility)
            .description("A test filter")
            .input(PortDefinition::input("input", PortType::Image))
            .output(PortDefinition::output("output", PortType::Image))
            .tags(["test", "debug"])
            .build();

        assert_eq!(metadata.id, "test_filter");
        assert_eq!(metadata.name, "Test Filter");
        assert_eq!(metadata.category, Category::Utility);
        assert_eq!(metadata.inputs.len(), 1);
        assert_eq!(metadata.outputs.len(), 1);
        assert_eq!(metadata.tags.len(), 2);
        assert!(metadata.deterministic);
    }

    #[test]
    fn test_invoke_fills_defaults() {
        let node = Doubler { forget_output: false };
        let outputs = invoke(&node, inputs(21), HashMap::new()).unwrap();
        assert_eq!(outputs.get("result"), Some(&Value::Integer(42)));
    }

    #[test]
    fn test_invoke_checks_parameter_constraints() {
        let node = Doubler { forget_output: false };
        let params = HashMap::from([("factor".to_string(), Value::Integer(9))]);
        let err = invoke(&node, inputs(1), params).unwrap_err();
        assert!(matches!(
            err,
            SeamweaveError::Validation(ValidationError::ConstraintViolation { ref parameter, .. })
                if parameter == "factor"
        ));

        let params = HashMap::from([("factor".to_string(), Value::String("x".to_string()))]);
        assert!(invoke(&node, inputs(1), params).is_err());
    }

    #[test]
    fn test_invoke_requires_inputs() {
        let node = Doubler { forget_output: false };
        let err = invoke(&node, HashMap::new(), HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            SeamweaveError::Validation(ValidationError::MissingRequiredInput { .. })
        ));

        let wrong = HashMap::from([("value".to_string(), Value::Boolean(true))]);
        assert!(invoke(&node, wrong, HashMap::new()).is_err());
    }

    #[test]
    fn test_invoke_checks_outputs() {
        let node = Doubler { forget_output: true };
        let err = invoke(&node, inputs(1), HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            SeamweaveError::Execution(ExecutionError::OutputNotSet { ref port, .. }) if port == "result"
        ));
    }

    #[test]
    fn test_default_volatility() {
        let node = Doubler { forget_output: false };
        assert!(!node.is_volatile());
        assert!(!node.clone_box().is_volatile());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Texture.display_name(), "Texture");
        assert_eq!(Category::all().len(), 5);
        assert_eq!(Category::default(), Category::Custom);
    }
}
