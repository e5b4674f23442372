//! The set of open blueprints and the collaborators every edit needs.
//!
//! A `Workspace` owns its blueprints outright and is mutated through `&mut`;
//! callers that share it across threads wrap it in a lock (see `state`).

use indexmap::IndexMap;
use tracing::info;

use crate::error::AppError;
use crate::model::{Blueprint, Graph};
use crate::reflect::{ClassDb, TypeRegistry};

/// Receives a notification after every successful mutation of a blueprint.
pub trait ModificationSink {
    fn blueprint_modified(&mut self, name: &str);
}

/// Default sink: records the change in the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl ModificationSink for LogSink {
    fn blueprint_modified(&mut self, name: &str) {
        info!(blueprint = name, "blueprint marked modified");
    }
}

pub struct Workspace {
    blueprints: IndexMap<String, Blueprint>,
    types: Box<dyn TypeRegistry + Send>,
    sink: Box<dyn ModificationSink + Send>,
}

impl Workspace {
    pub fn new(types: impl TypeRegistry + Send + 'static) -> Self {
        Self {
            blueprints: IndexMap::new(),
            types: Box::new(types),
            sink: Box::new(LogSink),
        }
    }

    /// Build a workspace over `classes`, registering each blueprint's
    /// generated class before the registry is sealed.
    pub fn from_catalog(mut classes: ClassDb, blueprints: Vec<Blueprint>) -> Self {
        for bp in &blueprints {
            classes.register_blueprint(bp);
        }
        let mut ws = Self::new(classes);
        for bp in blueprints {
            ws.insert_blueprint(bp);
        }
        ws
    }

    pub fn with_sink(mut self, sink: impl ModificationSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Add or replace a blueprint, keyed by its name.
    pub fn insert_blueprint(&mut self, blueprint: Blueprint) {
        self.blueprints.insert(blueprint.name.clone(), blueprint);
    }

    /// Look a blueprint up by exact name. Never creates one.
    pub fn blueprint(&self, name: &str) -> Result<&Blueprint, AppError> {
        self.blueprints
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("blueprint '{name}'")))
    }

    pub fn blueprints(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.values()
    }

    pub fn types(&self) -> &dyn TypeRegistry {
        self.types.as_ref()
    }

    /// Open an edit session on one blueprint.
    pub fn edit(&mut self, name: &str) -> Result<BlueprintEdit<'_>, AppError> {
        let blueprint = self
            .blueprints
            .get_mut(name)
            .ok_or_else(|| AppError::not_found(format!("blueprint '{name}'")))?;
        Ok(BlueprintEdit {
            blueprint,
            types: self.types.as_ref(),
            sink: self.sink.as_mut(),
        })
    }

    /// Names of blueprints changed since the last [`Workspace::clear_modified`].
    pub fn modified_blueprints(&self) -> Vec<String> {
        self.blueprints
            .values()
            .filter(|bp| bp.is_modified())
            .map(|bp| bp.name.clone())
            .collect()
    }

    pub fn clear_modified(&mut self) {
        for bp in self.blueprints.values_mut() {
            bp.set_modified(false);
        }
    }
}

/// Mutable access to one blueprint plus read access to the type registry.
pub struct BlueprintEdit<'a> {
    pub blueprint: &'a mut Blueprint,
    pub types: &'a dyn TypeRegistry,
    sink: &'a mut (dyn ModificationSink + Send),
}

impl BlueprintEdit<'_> {
    pub fn event_graph(&mut self) -> &mut Graph {
        self.blueprint.find_or_create_event_graph()
    }

    /// Set the dirty flag and notify the sink. Call once per successful command.
    pub fn mark_modified(self) {
        self.blueprint.set_modified(true);
        self.sink.blueprint_modified(&self.blueprint.name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<String>>>);

    impl ModificationSink for RecordingSink {
        fn blueprint_modified(&mut self, name: &str) {
            self.0.lock().push(name.to_string());
        }
    }

    #[test]
    fn test_lookup_never_creates() {
        let mut ws = Workspace::new(ClassDb::builtin());
        let err = ws.blueprint("Ghost").unwrap_err();
        assert_eq!(err.to_string(), "not_found: blueprint 'Ghost'");
        assert!(ws.edit("Ghost").is_err());
        assert_eq!(ws.blueprints().count(), 0);
    }

    #[test]
    fn test_mark_modified_notifies_sink_and_sets_flag() {
        let sink = RecordingSink::default();
        let mut ws = Workspace::from_catalog(
            ClassDb::builtin(),
            vec![Blueprint::new("PlayerChar", "Character")],
        )
        .with_sink(sink.clone());

        assert!(ws.modified_blueprints().is_empty());
        let mut edit = ws.edit("PlayerChar").unwrap();
        edit.event_graph();
        edit.mark_modified();

        assert_eq!(ws.modified_blueprints(), vec!["PlayerChar".to_string()]);
        assert_eq!(*sink.0.lock(), vec!["PlayerChar".to_string()]);

        ws.clear_modified();
        assert!(ws.modified_blueprints().is_empty());
    }

    #[test]
    fn test_from_catalog_registers_generated_classes() {
        let ws = Workspace::from_catalog(
            ClassDb::builtin(),
            vec![Blueprint::new("PlayerChar", "Character")],
        );
        assert!(ws.types().is_child_of("PlayerChar_C", "Pawn"));
    }
}
