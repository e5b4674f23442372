use std::collections::HashMap;

use indexmap::IndexMap;

use super::{ClassDef, EventSig, FunctionSig, InputActionDef, ParamDef, TypeRegistry};
use crate::model::{Blueprint, PinType};

const CORE_PACKAGE: &str = "/Script/CoreUObject";
const ENGINE_PACKAGE: &str = "/Script/Engine";

/// In-memory class database. Classes are keyed by canonical name; qualified
/// and path names are indexed separately for [`TypeRegistry::resolve_type`].
#[derive(Debug, Clone, Default)]
pub struct ClassDb {
    classes: IndexMap<String, ClassDef>,
    lookup: HashMap<String, String>,
    input_actions: IndexMap<String, InputActionDef>,
}

impl ClassDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a class.
    pub fn insert(&mut self, def: ClassDef) {
        self.lookup.insert(def.qualified_name(), def.name.clone());
        if !def.package.is_empty() {
            self.lookup.insert(def.path_name(), def.name.clone());
        }
        self.classes.insert(def.name.clone(), def);
    }

    pub fn insert_input_action(&mut self, action: InputActionDef) {
        self.input_actions.insert(action.name.clone(), action);
    }

    /// Register the generated class of a blueprint when it is not known yet.
    pub fn register_blueprint(&mut self, blueprint: &Blueprint) {
        let Some(generated) = blueprint.generated_class.as_deref() else {
            return;
        };
        if self.classes.contains_key(generated) {
            return;
        }
        self.insert(ClassDef {
            name: generated.to_string(),
            prefix: String::new(),
            package: format!("/Game/Blueprints/{}", blueprint.name),
            parent: Some(blueprint.parent_class.clone()),
            functions: Vec::new(),
            events: Vec::new(),
        });
    }

    /// Engine classes, functions and events most blueprints build against.
    pub fn builtin() -> Self {
        let mut db = Self::new();

        db.insert(class("Object", "U", CORE_PACKAGE, None));

        let mut actor = class("Actor", "A", ENGINE_PACKAGE, Some("Object"));
        actor.functions = vec![
            func(
                "SetActorLocation",
                &[
                    ("NewLocation", PinType::vector()),
                    ("bSweep", PinType::Boolean),
                    ("bTeleport", PinType::Boolean),
                ],
                Some(PinType::Boolean),
            ),
            pure("GetActorLocation", &[], Some(PinType::vector())),
            func("SetActorHiddenInGame", &[("bNewHidden", PinType::Boolean)], None),
            func("K2_DestroyActor", &[], None),
        ];
        actor.events = vec![
            event("BeginPlay", &[]),
            event("Tick", &[("DeltaSeconds", PinType::Float)]),
            event("EndPlay", &[]),
            event(
                "ActorBeginOverlap",
                &[("OtherActor", PinType::Object("Actor".into()))],
            ),
        ];
        db.insert(actor);

        let mut pawn = class("Pawn", "A", ENGINE_PACKAGE, Some("Actor"));
        pawn.functions = vec![func(
            "AddMovementInput",
            &[
                ("WorldDirection", PinType::vector()),
                ("ScaleValue", PinType::Float),
                ("bForce", PinType::Boolean),
            ],
            None,
        )];
        db.insert(pawn);

        let mut character = class("Character", "A", ENGINE_PACKAGE, Some("Pawn"));
        character.functions = vec![
            func("Jump", &[], None),
            func("StopJumping", &[], None),
            func(
                "LaunchCharacter",
                &[
                    ("LaunchVelocity", PinType::vector()),
                    ("bXYOverride", PinType::Boolean),
                    ("bZOverride", PinType::Boolean),
                ],
                None,
            ),
        ];
        db.insert(character);

        let mut component = class("ActorComponent", "U", ENGINE_PACKAGE, Some("Object"));
        component.functions = vec![
            func("Activate", &[("bReset", PinType::Boolean)], None),
            func("Deactivate", &[], None),
        ];
        db.insert(component);

        let mut scene = class("SceneComponent", "U", ENGINE_PACKAGE, Some("ActorComponent"));
        scene.functions = vec![
            func(
                "SetVisibility",
                &[
                    ("bNewVisibility", PinType::Boolean),
                    ("bPropagateToChildren", PinType::Boolean),
                ],
                None,
            ),
            func(
                "K2_SetWorldLocation",
                &[
                    ("NewLocation", PinType::vector()),
                    ("bSweep", PinType::Boolean),
                    ("bTeleport", PinType::Boolean),
                ],
                None,
            ),
            pure("GetForwardVector", &[], Some(PinType::vector())),
        ];
        db.insert(scene);

        let mut primitive = class(
            "PrimitiveComponent",
            "U",
            ENGINE_PACKAGE,
            Some("SceneComponent"),
        );
        primitive.functions = vec![
            func(
                "AddForce",
                &[("Force", PinType::vector()), ("bAccelChange", PinType::Boolean)],
                None,
            ),
            func("SetSimulatePhysics", &[("bSimulate", PinType::Boolean)], None),
        ];
        db.insert(primitive);

        db.insert(class(
            "StaticMeshComponent",
            "U",
            ENGINE_PACKAGE,
            Some("PrimitiveComponent"),
        ));

        db.insert(class(
            "BlueprintFunctionLibrary",
            "U",
            ENGINE_PACKAGE,
            Some("Object"),
        ));

        let mut statics = class(
            "GameplayStatics",
            "U",
            ENGINE_PACKAGE,
            Some("BlueprintFunctionLibrary"),
        );
        statics.functions = vec![
            static_pure(
                "GetPlayerPawn",
                &[("PlayerIndex", PinType::Integer)],
                Some(PinType::Object("Pawn".into())),
            ),
            static_pure(
                "GetPlayerCharacter",
                &[("PlayerIndex", PinType::Integer)],
                Some(PinType::Object("Character".into())),
            ),
            static_func(
                "SetGamePaused",
                &[("bPaused", PinType::Boolean)],
                Some(PinType::Boolean),
            ),
        ];
        db.insert(statics);

        let mut system = class(
            "KismetSystemLibrary",
            "U",
            ENGINE_PACKAGE,
            Some("BlueprintFunctionLibrary"),
        );
        system.functions = vec![static_func(
            "PrintString",
            &[
                ("InString", PinType::String),
                ("bPrintToScreen", PinType::Boolean),
                ("bPrintToLog", PinType::Boolean),
                ("Duration", PinType::Float),
            ],
            None,
        )];
        db.insert(system);

        let mut math = class(
            "KismetMathLibrary",
            "U",
            ENGINE_PACKAGE,
            Some("BlueprintFunctionLibrary"),
        );
        math.functions = vec![
            static_pure(
                "Add_IntInt",
                &[("A", PinType::Integer), ("B", PinType::Integer)],
                Some(PinType::Integer),
            ),
            static_pure(
                "MakeVector",
                &[("X", PinType::Float), ("Y", PinType::Float), ("Z", PinType::Float)],
                Some(PinType::vector()),
            ),
            static_pure("RandomFloat", &[], Some(PinType::Float)),
        ];
        db.insert(math);

        for (name, key) in [("Jump", "SpaceBar"), ("Fire", "LeftMouseButton"), ("Interact", "E")] {
            db.insert_input_action(InputActionDef {
                name: name.to_string(),
                keys: vec![key.to_string()],
            });
        }

        db
    }
}

impl TypeRegistry for ClassDb {
    fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    fn resolve_type(&self, query: &str) -> Option<&ClassDef> {
        self.lookup.get(query).and_then(|name| self.classes.get(name))
    }

    fn input_action(&self, name: &str) -> Option<&InputActionDef> {
        self.input_actions.get(name)
    }
}

// ── Catalog builders ────────────────────────────────────────────

fn class(name: &str, prefix: &str, package: &str, parent: Option<&str>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        prefix: prefix.to_string(),
        package: package.to_string(),
        parent: parent.map(str::to_string),
        functions: Vec::new(),
        events: Vec::new(),
    }
}

fn params(list: &[(&str, PinType)]) -> Vec<ParamDef> {
    list.iter()
        .map(|(name, ty)| ParamDef::new(*name, ty.clone()))
        .collect()
}

fn func(name: &str, list: &[(&str, PinType)], returns: Option<PinType>) -> FunctionSig {
    FunctionSig {
        name: name.to_string(),
        is_static: false,
        is_pure: false,
        params: params(list),
        returns,
    }
}

fn pure(name: &str, list: &[(&str, PinType)], returns: Option<PinType>) -> FunctionSig {
    FunctionSig {
        is_pure: true,
        ..func(name, list, returns)
    }
}

fn static_func(name: &str, list: &[(&str, PinType)], returns: Option<PinType>) -> FunctionSig {
    FunctionSig {
        is_static: true,
        ..func(name, list, returns)
    }
}

fn static_pure(name: &str, list: &[(&str, PinType)], returns: Option<PinType>) -> FunctionSig {
    FunctionSig {
        is_static: true,
        is_pure: true,
        ..func(name, list, returns)
    }
}

fn event(name: &str, list: &[(&str, PinType)]) -> EventSig {
    EventSig {
        name: name.to_string(),
        params: params(list),
    }
}
