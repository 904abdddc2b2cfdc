//! Port definitions and constraints for node inputs/outputs.
//!
//! Ports define the interface of a node - what data it accepts and produces.
//! Each port has a type and optional constraints for validation.

use crate::core::types::{PortType, Value};
use serde::{Deserialize, Serialize};

/// Direction of a port (input or output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// Definition of a node port (input or output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDefinition {
    /// Unique name within the node (used in code)
    pub name: String,
    /// Human-readable name (used in UI)
    pub display_name: String,
    /// Type of data this port accepts/produces
    pub port_type: PortType,
    /// Direction (input or output)
    pub direction: PortDirection,
    /// Whether this port is optional
    pub optional: bool,
    /// Description for documentation and tooltips
    pub description: String,
    /// Constraints that values must satisfy
    pub constraints: Vec<Constraint>,
}

/// UI hints for parameter display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Default input widget based on type
    #[default]
    Default,
    /// Slider for numeric values
    Slider {
        /// Whether to use logarithmic scale
        logarithmic: bool,
    },
    /// Dropdown for selecting from options
    Dropdown {
        /// Available options
        options: Vec<String>,
    },
    /// Text input field
    TextInput {
        /// Allow multiple lines
        multiline: bool,
    },
    /// Checkbox for booleans
    Checkbox,
    /// Spin box for integers
    SpinBox,
}

/// Definition of a node parameter (configuration).
///
/// Parameters differ from inputs: they are set on the node rather than fed
/// from another node, and every parameter has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Unique name within the node
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Type of the parameter
    pub param_type: PortType,
    /// Default value (required for parameters)
    pub default_value: Value,
    /// Description for documentation
    pub description: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
    /// UI widget hint
    pub ui_hint: UiHint,
    /// Group name for organizing parameters in UI
    pub group: Option<String>,
}

/// Constraints that can be applied to port/parameter values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Numeric value must be within range [min, max]
    Range { min: f64, max: f64 },
    /// Numeric value must be a multiple of step
    Step(f64),
    /// Value must be one of the specified options
    OneOf(Vec<Value>),
}

// ============================================================================
// PortDefinition Builder Pattern
// ============================================================================

impl PortDefinition {
    /// Create a new input port definition.
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            port_type,
            direction: PortDirection::Input,
            optional: false,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Create a new output port definition.
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            port_type,
            direction: PortDirection::Output,
            optional: false,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this port as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Convert snake_case name to Title Case display name.
    fn name_to_display(name: &str) -> String {
        name.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Validate a value against this port's type and constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.port_type.matches(value) {
            return Err(format!(
                "Type mismatch for port '{}': expected {}, got {}",
                self.name,
                self.port_type,
                value.get_type()
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(value)?;
        }

        Ok(())
    }
}

// ============================================================================
// ParameterDefinition Builder Pattern
// ============================================================================

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(name: impl Into<String>, param_type: PortType, default_value: Value) -> Self {
        let name = name.into();
        Self {
            display_name: PortDefinition::name_to_display(&name),
            name,
            param_type,
            default_value,
            description: String::new(),
            constraints: Vec::new(),
            ui_hint: UiHint::Default,
            group: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a range constraint and set UI hint to slider.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        if matches!(self.ui_hint, UiHint::Default) {
            self.ui_hint = UiHint::Slider { logarithmic: false };
        }
        self
    }

    /// Restrict a string parameter to a fixed set of choices (dropdown).
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.constraints.push(Constraint::OneOf(
            choices.iter().map(|c| Value::String(c.to_string())).collect(),
        ));
        self.ui_hint = UiHint::Dropdown {
            options: choices.iter().map(|c| c.to_string()).collect(),
        };
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Set the UI hint.
    pub fn with_ui_hint(mut self, ui_hint: UiHint) -> Self {
        self.ui_hint = ui_hint;
        self
    }

    /// Set the parameter group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Validate a value against this parameter's type and constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "Type mismatch for parameter '{}': expected {}, got {}",
                self.name,
                self.param_type,
                value.get_type()
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(value)?;
        }

        Ok(())
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => {
                if let Some(num) = value.as_float() {
                    if num < *min || num > *max {
                        return Err(format!("Value {} is out of range [{}, {}]", num, min, max));
                    }
                }
            }

            Constraint::Step(step) => {
                if let Some(num) = value.as_float() {
                    let ratio = num / step;
                    if (ratio - ratio.round()).abs() > 1e-9 {
                        return Err(format!("Value {} must be a multiple of {}", num, step));
                    }
                }
            }

            Constraint::OneOf(options) => {
                if !options.contains(value) {
                    return Err(format!("Value {} is not one of the allowed options", value));
                }
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Range { min, max } => format!("Must be between {} and {}", min, max),
            Constraint::Step(step) => format!("Must be a multiple of {}", step),
            Constraint::OneOf(options) => {
                let names: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                format!("One of {}", names.join(", "))
            }
        }
    }
}
