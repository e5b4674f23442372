//! Resolution of the `target` argument of a function call.
//!
//! A target names, in order of preference: a component declared on the
//! blueprint, a type with static functions, or nothing at all (the blueprint
//! itself).

use tracing::debug;

use crate::error::AppError;
use crate::model::Blueprint;
use crate::reflect::{FunctionSig, TypeRegistry};

/// Conventional prefix of native object types.
const TYPE_PREFIX: &str = "U";
/// Namespace tried last for engine utility types.
const ENGINE_NAMESPACE: &str = "/Script/Engine.";

/// The object a non-static call is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetInstance {
    /// A component declared on the blueprint, by name.
    Component { name: String },
    /// The blueprint's own instance.
    SelfObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Canonical class name the function is searched on.
    pub class: String,
    pub instance: Option<TargetInstance>,
    pub is_static: bool,
}

/// Resolve `target` against `blueprint`. An empty target means "self".
pub fn resolve_target(
    blueprint: &Blueprint,
    types: &dyn TypeRegistry,
    target: &str,
) -> Result<ResolvedTarget, AppError> {
    if !target.is_empty() {
        if let Some(component) = blueprint.component(target) {
            debug!(target, class = %component.class, "target resolved to component");
            return Ok(ResolvedTarget {
                class: component.class.clone(),
                instance: Some(TargetInstance::Component {
                    name: component.name.clone(),
                }),
                is_static: false,
            });
        }

        if let Some(class) = resolve_type_name(types, target) {
            debug!(target, class, "target resolved to static type");
            return Ok(ResolvedTarget {
                class: class.to_string(),
                instance: None,
                is_static: true,
            });
        }
        debug!(target, "target unresolved, falling back to self");
    }

    match blueprint.generated_class.as_deref() {
        Some(class) => Ok(ResolvedTarget {
            class: class.to_string(),
            instance: Some(TargetInstance::SelfObject),
            is_static: false,
        }),
        None => Err(AppError::InvalidTarget {
            target: target.to_string(),
        }),
    }
}

/// Raw name, then prefixed name, then the engine namespace.
fn resolve_type_name<'t>(types: &'t dyn TypeRegistry, name: &str) -> Option<&'t str> {
    if let Some(def) = types.resolve_type(name) {
        return Some(&def.name);
    }
    if !name.starts_with(TYPE_PREFIX) {
        if let Some(def) = types.resolve_type(&format!("{TYPE_PREFIX}{name}")) {
            return Some(&def.name);
        }
    }
    types
        .resolve_type(&format!("{ENGINE_NAMESPACE}{name}"))
        .map(|def| def.name.as_str())
}

/// Find `function` on the resolved class or its ancestors.
/// Returns the declaring class name with a copy of the signature.
pub fn find_function(
    types: &dyn TypeRegistry,
    target: &ResolvedTarget,
    function: &str,
) -> Result<(String, FunctionSig), AppError> {
    types
        .find_function(&target.class, function)
        .map(|(owner, sig)| (owner.name.clone(), sig.clone()))
        .ok_or_else(|| {
            AppError::not_found(format!(
                "function '{function}' in target '{}'",
                target.class
            ))
        })
}
