//! Execution and validation contexts.
//!
//! Contexts provide access to inputs, parameters, and outputs during
//! node validation and execution. They encapsulate the data flow.

use crate::core::buffer::RgbBuffer;
use crate::core::error::{ExecutionError, NodeId, ValidationError};
use crate::core::types::{ImageValue, PortType, Value};
use std::collections::HashMap;

/// Context provided during node validation.
///
/// Inputs may carry only image metadata (no pixels); validation must not
/// depend on pixel data.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// ID of the node being validated.
    pub node_id: NodeId,
    /// Input values or metadata.
    inputs: HashMap<String, Value>,
    /// Parameter values.
    parameters: HashMap<String, Value>,
}

impl ValidationContext {
    /// Create a new validation context.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            inputs: HashMap::new(),
            parameters: HashMap::new(),
        }
    }

    /// Add an input value to the context.
    pub fn add_input(&mut self, name: impl Into<String>, value: Value) {
        self.inputs.insert(name.into(), value);
    }

    /// Add a parameter value to the context.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Get all inputs.
    pub fn inputs(&self) -> &HashMap<String, Value> {
        &self.inputs
    }

    /// Get all parameters.
    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    // ========================================================================
    // Input Getters
    // ========================================================================

    /// Get an input value by name.
    pub fn get_input(&self, name: &str) -> Result<&Value, ValidationError> {
        self.inputs.get(name).ok_or_else(|| ValidationError::MissingRequiredInput {
            node_id: self.node_id,
            port: name.to_string(),
        })
    }

    /// Get an input as an image.
    pub fn get_input_image(&self, name: &str) -> Result<&ImageValue, ValidationError> {
        let value = self.get_input(name)?;
        value.as_image().ok_or_else(|| ValidationError::TypeMismatch {
            expected: PortType::Image,
            got: value.get_type(),
        })
    }

    /// Check if an input exists.
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    // ========================================================================
    // Parameter Getters
    // ========================================================================

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> Result<&Value, ValidationError> {
        self.parameters.get(name).ok_or_else(|| ValidationError::ConstraintViolation {
            node_id: self.node_id,
            parameter: name.to_string(),
            error: "Parameter not set".to_string(),
        })
    }

    fn typed_parameter<T>(
        &self,
        name: &str,
        expected: PortType,
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Result<T, ValidationError> {
        let value = self.get_parameter(name)?;
        extract(value).ok_or_else(|| ValidationError::TypeMismatch {
            expected,
            got: value.get_type(),
        })
    }

    /// Get a parameter as an integer.
    pub fn get_integer(&self, name: &str) -> Result<i64, ValidationError> {
        self.typed_parameter(name, PortType::Integer, Value::as_integer)
    }

    /// Get a parameter as a float.
    pub fn get_float(&self, name: &str) -> Result<f64, ValidationError> {
        self.typed_parameter(name, PortType::Float, Value::as_float)
    }

    /// Get a parameter as a string.
    pub fn get_string(&self, name: &str) -> Result<&str, ValidationError> {
        let value = self.get_parameter(name)?;
        value.as_string().ok_or_else(|| ValidationError::TypeMismatch {
            expected: PortType::String,
            got: value.get_type(),
        })
    }

    /// Get a parameter as a boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool, ValidationError> {
        self.typed_parameter(name, PortType::Boolean, Value::as_bool)
    }

    /// Check if a parameter exists.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

/// Context provided during node execution.
///
/// ExecutionContext contains actual data values and allows nodes to
/// set their output values.
#[derive(Debug)]
pub struct ExecutionContext {
    /// ID of the node being executed.
    pub node_id: NodeId,
    /// Input values.
    inputs: HashMap<String, Value>,
    /// Parameter values.
    parameters: HashMap<String, Value>,
    /// Output values set by the node.
    outputs: HashMap<String, Value>,
}

impl ExecutionContext {
    /// Create a new execution context.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            inputs: HashMap::new(),
            parameters: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Add an input value to the context.
    pub fn add_input(&mut self, name: impl Into<String>, value: Value) {
        self.inputs.insert(name.into(), value);
    }

    /// Add a parameter value to the context.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Get all inputs.
    pub fn inputs(&self) -> &HashMap<String, Value> {
        &self.inputs
    }

    /// Get all parameters.
    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    /// Get all outputs.
    pub fn outputs(&self) -> &HashMap<String, Value> {
        &self.outputs
    }

    /// Take ownership of all outputs.
    pub fn take_outputs(self) -> HashMap<String, Value> {
        self.outputs
    }

    // ========================================================================
    // Input Getters
    // ========================================================================

    /// Get an input value by name.
    pub fn get_input(&self, name: &str) -> Result<&Value, ExecutionError> {
        self.inputs.get(name).ok_or_else(|| ExecutionError::MissingInput {
            node_id: self.node_id,
            port: name.to_string(),
        })
    }

    /// Get an optional input; unconnected and `None` inputs read as `Value::None`.
    pub fn get_input_or_none(&self, name: &str) -> &Value {
        static NONE: Value = Value::None;
        self.inputs.get(name).unwrap_or(&NONE)
    }

    /// Take ownership of an input value.
    pub fn take_input(&mut self, name: &str) -> Result<Value, ExecutionError> {
        self.inputs.remove(name).ok_or_else(|| ExecutionError::MissingInput {
            node_id: self.node_id,
            port: name.to_string(),
        })
    }

    /// Take ownership of an input as an ImageValue.
    pub fn take_input_image(&mut self, name: &str) -> Result<ImageValue, ExecutionError> {
        match self.take_input(name)? {
            Value::Image(img) => Ok(img),
            _ => Err(ExecutionError::NodeExecution {
                node_id: self.node_id,
                error: format!("Input '{}' is not an image", name),
            }),
        }
    }

    /// Take ownership of an image input's pixel buffer.
    pub fn take_input_buffer(&mut self, name: &str) -> Result<RgbBuffer, ExecutionError> {
        let node_id = self.node_id;
        self.take_input_image(name)?
            .into_image()
            .ok_or_else(|| ExecutionError::NodeExecution {
                node_id,
                error: format!("Input '{}' carries no pixel data", name),
            })
    }

    /// Check if an input exists.
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    // ========================================================================
    // Parameter Getters
    // ========================================================================

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> Result<&Value, ExecutionError> {
        self.parameters.get(name).ok_or_else(|| ExecutionError::MissingParameter {
            node_id: self.node_id,
            parameter: name.to_string(),
        })
    }

    /// Get a parameter as an integer.
    pub fn get_integer(&self, name: &str) -> Result<i64, ExecutionError> {
        self.get_parameter(name)?
            .as_integer()
            .ok_or_else(|| ExecutionError::NodeExecution {
                node_id: self.node_id,
                error: format!("Parameter '{}' is not an integer", name),
            })
    }

    /// Get a parameter as a float.
    pub fn get_float(&self, name: &str) -> Result<f64, ExecutionError> {
        self.get_parameter(name)?
            .as_float()
            .ok_or_else(|| ExecutionError::NodeExecution {
                node_id: self.node_id,
                error: format!("Parameter '{}' is not a float", name),
            })
    }

    /// Get a parameter as a string.
    pub fn get_string(&self, name: &str) -> Result<&str, ExecutionError> {
        self.get_parameter(name)?
            .as_string()
            .ok_or_else(|| ExecutionError::NodeExecution {
                node_id: self.node_id,
                error: format!("Parameter '{}' is not a string", name),
            })
    }

    /// Get a parameter as a boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool, ExecutionError> {
        self.get_parameter(name)?
            .as_bool()
            .ok_or_else(|| ExecutionError::NodeExecution {
                node_id: self.node_id,
                error: format!("Parameter '{}' is not a boolean", name),
            })
    }

    /// Check if a parameter exists.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    // ========================================================================
    // Output Setters
    // ========================================================================

    /// Set an output value.
    pub fn set_output(&mut self, name: impl Into<String>, value: Value) -> Result<(), ExecutionError> {
        self.outputs.insert(name.into(), value);
        Ok(())
    }

    /// Set an output image from a pixel buffer.
    pub fn set_output_image(&mut self, name: impl Into<String>, image: RgbBuffer) -> Result<(), ExecutionError> {
        self.set_output(name, Value::from(image))
    }

    /// Check if an output has been set.
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }
}

/// Convert ValidationContext to ExecutionContext.
impl From<ValidationContext> for ExecutionContext {
    fn from(val_ctx: ValidationContext) -> Self {
        let mut exec_ctx = ExecutionContext::new(val_ctx.node_id);
        for (name, value) in val_ctx.inputs {
            exec_ctx.add_input(name, value);
        }
        for (name, value) in val_ctx.parameters {
            exec_ctx.add_parameter(name, value);
        }
        exec_ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_validation_context_inputs() {
        let mut ctx = ValidationContext::new(NodeId::new());
        ctx.add_input("test", Value::Integer(42));

        assert!(ctx.has_input("test"));
        assert!(!ctx.has_input("nonexistent"));
        assert_eq!(ctx.get_integer("test").ok(), None); // integer is in inputs, not parameters
        assert!(matches!(
            ctx.get_input_image("test"),
            Err(ValidationError::TypeMismatch { got: PortType::Integer, .. })
        ));
    }

    #[test]
    fn test_validation_context_parameters() {
        let mut ctx = ValidationContext::new(NodeId::new());
        ctx.add_parameter("overlap", Value::Integer(64));
        ctx.add_parameter("detail_level", Value::Float(1.5));

        assert!(ctx.has_parameter("overlap"));
        assert_eq!(ctx.get_integer("overlap").unwrap(), 64);
        assert_eq!(ctx.get_float("overlap").unwrap(), 64.0);
        assert_eq!(ctx.get_float("detail_level").unwrap(), 1.5);
        assert!(ctx.get_bool("detail_level").is_err());
    }

    #[test]
    fn test_execution_context_outputs() {
        let mut ctx = ExecutionContext::new(NodeId::new());
        ctx.set_output("result", Value::Integer(100)).unwrap();

        assert!(ctx.has_output("result"));
        let outputs = ctx.take_outputs();
        assert_eq!(outputs.get("result"), Some(&Value::Integer(100)));
    }

    #[test]
    fn test_execution_context_take_buffer() {
        let mut ctx = ExecutionContext::new(NodeId::new());
        let buffer = RgbBuffer::from_pixel(2, 2, Rgb([0.5, 0.5, 0.5]));
        ctx.add_input("image", buffer.clone().into());
        ctx.add_input("count", Value::Integer(3));

        assert!(ctx.get_input_or_none("missing").is_none());
        assert_eq!(ctx.take_input_buffer("image").unwrap(), buffer);
        assert!(ctx.take_input_buffer("image").is_err());
        assert!(ctx.take_input_buffer("count").is_err());
    }

    #[test]
    fn test_context_conversion_keeps_values() {
        let mut vctx = ValidationContext::new(NodeId::new());
        vctx.add_input("a", Value::Boolean(true));
        vctx.add_parameter("b", Value::String("x".to_string()));

        let ctx = ExecutionContext::from(vctx);
        assert_eq!(ctx.get_input("a").unwrap(), &Value::Boolean(true));
        assert_eq!(ctx.get_string("b").unwrap(), "x");
    }
}
