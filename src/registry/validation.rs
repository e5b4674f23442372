//! Shared validation helpers for registry command handlers.
//!
//! Centralizes checks on caller-supplied names and positions so all handlers
//! produce consistent error messages.

use crate::error::AppError;
use crate::model::Blueprint;

/// Member names must be non-empty and free of whitespace and control characters.
pub fn validate_member_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::ValidationError {
            message: "Variable name must not be empty".to_string(),
        });
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AppError::ValidationError {
            message: format!("Variable name \"{name}\" must not contain whitespace"),
        });
    }
    Ok(())
}

/// Reject a new member whose name is already taken by a variable or component.
pub fn validate_unique_member(blueprint: &Blueprint, name: &str) -> Result<(), AppError> {
    if blueprint.variable(name).is_some() {
        return Err(AppError::ValidationError {
            message: format!(
                "Variable \"{name}\" already exists on blueprint \"{}\"",
                blueprint.name
            ),
        });
    }
    if blueprint.component(name).is_some() {
        return Err(AppError::ValidationError {
            message: format!(
                "\"{name}\" is a component of blueprint \"{}\"",
                blueprint.name
            ),
        });
    }
    Ok(())
}

/// Validate that both coordinates of a node position are finite.
pub fn validate_position(position: Option<[f64; 2]>) -> Result<(), AppError> {
    match position {
        Some([x, y]) if !x.is_finite() || !y.is_finite() => Err(AppError::ValidationError {
            message: format!("Node position ({x}, {y}) must be finite"),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names() {
        assert!(validate_member_name("Health").is_ok());
        assert!(validate_member_name("").is_err());
        assert!(validate_member_name("Max Health").is_err());
    }

    #[test]
    fn test_unique_member() {
        let mut bp = Blueprint::new("PlayerChar", "Character")
            .with_component("StaticMeshComponent1", "StaticMeshComponent");
        bp.variables.push(crate::model::MemberVariable {
            name: "Health".into(),
            pin_type: crate::model::PinType::Integer,
            exposed: true,
        });
        assert!(validate_unique_member(&bp, "Armor").is_ok());
        assert!(validate_unique_member(&bp, "Health").is_err());
        assert!(validate_unique_member(&bp, "StaticMeshComponent1").is_err());
    }
}
