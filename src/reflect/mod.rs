//! Host reflection capability: classes, their functions and events, and the
//! project's input actions.
//!
//! The core never looks types up through a global. A [`TypeRegistry`] is
//! injected into the workspace; [`ClassDb`] is the in-process implementation.

pub mod class_db;

use serde::{Deserialize, Serialize};

use crate::model::PinType;

pub use class_db::ClassDb;

/// Upper bound on parent-chain walks. Guards against cyclic class data loaded
/// from a project file.
const MAX_HIERARCHY_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub pin_type: PinType,
    /// Out-parameter: surfaces as an output pin.
    #[serde(default)]
    pub output: bool,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            pin_type,
            output: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSig {
    pub name: String,
    #[serde(default)]
    pub is_static: bool,
    /// Pure functions have no exec pins.
    #[serde(default)]
    pub is_pure: bool,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    #[serde(default)]
    pub returns: Option<PinType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSig {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputActionDef {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Canonical name without prefix, e.g. `Actor`.
    pub name: String,
    /// Conventional native prefix (`A`, `U`); empty for generated classes.
    #[serde(default)]
    pub prefix: String,
    /// Owning package, e.g. `/Script/Engine`.
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionSig>,
    #[serde(default)]
    pub events: Vec<EventSig>,
}

impl ClassDef {
    pub fn qualified_name(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    pub fn path_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

/// Type lookup and hierarchy traversal.
pub trait TypeRegistry {
    /// Class by canonical name.
    fn class(&self, name: &str) -> Option<&ClassDef>;

    /// Class by qualified (`UGameplayStatics`) or path (`/Script/Engine.Actor`)
    /// name. Canonical names without prefix do not resolve here.
    fn resolve_type(&self, query: &str) -> Option<&ClassDef>;

    fn input_action(&self, name: &str) -> Option<&InputActionDef>;

    /// Search `class` and then its ancestors for a function by exact name.
    /// Returns the declaring class with the signature.
    fn find_function(&self, class: &str, function: &str) -> Option<(&ClassDef, &FunctionSig)> {
        let mut current = self.class(class);
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let def = current?;
            if let Some(sig) = def.functions.iter().find(|f| f.name == function) {
                return Some((def, sig));
            }
            current = def.parent.as_deref().and_then(|p| self.class(p));
        }
        None
    }

    /// Search `class` and then its ancestors for an event signature.
    fn find_event(&self, class: &str, event: &str) -> Option<(&ClassDef, &EventSig)> {
        let mut current = self.class(class);
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let def = current?;
            if let Some(sig) = def.events.iter().find(|e| e.name == event) {
                return Some((def, sig));
            }
            current = def.parent.as_deref().and_then(|p| self.class(p));
        }
        None
    }

    /// True when `class` is `ancestor` or derives from it.
    fn is_child_of(&self, class: &str, ancestor: &str) -> bool {
        let mut current = Some(class);
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let Some(name) = current else {
                return false;
            };
            if name == ancestor {
                return true;
            }
            current = self.class(name).and_then(|def| def.parent.as_deref());
        }
        false
    }
}
