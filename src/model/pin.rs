use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reflect::TypeRegistry;

/// Name of the implicit target pin on instance function calls and the output
/// pin of self-reference nodes.
pub const SELF_PIN: &str = "self";
pub const EXEC_IN_PIN: &str = "execute";
pub const EXEC_OUT_PIN: &str = "then";
pub const RETURN_PIN: &str = "ReturnValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
}

/// Semantic type carried by a pin. `Struct` and `Object` name their struct or
/// class; `Wildcard` is used where the member type could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinType {
    Exec,
    Boolean,
    Integer,
    Float,
    String,
    Struct(String),
    Object(String),
    Wildcard,
}

impl PinType {
    pub fn vector() -> Self {
        PinType::Struct("Vector".to_string())
    }

    /// Map a caller-supplied variable type name to a pin type.
    /// Recognized: Boolean, Integer (alias Int), Float, String, Vector.
    pub fn from_variable_type(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(PinType::Boolean),
            "Integer" | "Int" => Some(PinType::Integer),
            "Float" => Some(PinType::Float),
            "String" => Some(PinType::String),
            "Vector" => Some(PinType::vector()),
            _ => None,
        }
    }

    pub fn is_exec(&self) -> bool {
        matches!(self, PinType::Exec)
    }

    /// Whether a link from an output of type `self` into an input of type
    /// `target` is allowed.
    pub fn can_connect_to(&self, target: &PinType, types: &dyn TypeRegistry) -> bool {
        match (self, target) {
            (PinType::Exec, PinType::Exec) => true,
            (PinType::Exec, _) | (_, PinType::Exec) => false,
            (PinType::Wildcard, _) | (_, PinType::Wildcard) => true,
            (PinType::Object(from), PinType::Object(to)) => types.is_child_of(from, to),
            (from, to) => from == to,
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinType::Exec => write!(f, "exec"),
            PinType::Boolean => write!(f, "bool"),
            PinType::Integer => write!(f, "int"),
            PinType::Float => write!(f, "float"),
            PinType::String => write!(f, "string"),
            PinType::Struct(name) => write!(f, "struct<{name}>"),
            PinType::Object(class) => write!(f, "object<{class}>"),
            PinType::Wildcard => write!(f, "wildcard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    pub direction: PinDirection,
    pub pin_type: PinType,
    /// Literal default for unconnected inputs, in the graph's native text form
    /// (`"true"`, `"1.5"`, `"(X=1.000000,Y=2.000000,Z=3.000000)"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Pin {
    pub fn input(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            direction: PinDirection::Input,
            pin_type,
            default_value: None,
        }
    }

    pub fn output(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            direction: PinDirection::Output,
            pin_type,
            default_value: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::reflect::ClassDb;

    #[test]
    fn test_variable_type_aliases() {
        assert_eq!(PinType::from_variable_type("Int"), Some(PinType::Integer));
        assert_eq!(PinType::from_variable_type("Integer"), Some(PinType::Integer));
        assert_eq!(PinType::from_variable_type("Vector"), Some(PinType::vector()));
        assert_eq!(PinType::from_variable_type("Quaternion"), None);
        assert_eq!(PinType::from_variable_type("boolean"), None);
    }

    #[test]
    fn test_exec_only_links_to_exec() {
        let db = ClassDb::builtin();
        assert!(PinType::Exec.can_connect_to(&PinType::Exec, &db));
        assert!(!PinType::Exec.can_connect_to(&PinType::Wildcard, &db));
        assert!(!PinType::Float.can_connect_to(&PinType::Exec, &db));
    }

    #[test]
    fn test_object_links_follow_hierarchy() {
        let db = ClassDb::builtin();
        let mesh = PinType::Object("StaticMeshComponent".into());
        let scene = PinType::Object("SceneComponent".into());
        assert!(mesh.can_connect_to(&scene, &db));
        assert!(!scene.can_connect_to(&mesh, &db));
        assert!(PinType::Wildcard.can_connect_to(&scene, &db));
        assert!(!PinType::Integer.can_connect_to(&PinType::Float, &db));
    }
}
