use crate::model::Blueprint;
use crate::project::{LoadedProject, ProjectCatalog};

pub const DEMO_BLUEPRINT: &str = "PlayerChar";
pub const DEMO_COMPONENT: &str = "StaticMeshComponent1";

/// Creates a demo project: one character blueprint with a static mesh
/// component and no event graph yet, over the builtin class catalog.
pub fn create_demo_project() -> LoadedProject {
    let player =
        Blueprint::new(DEMO_BLUEPRINT, "Character").with_component(DEMO_COMPONENT, "StaticMeshComponent");
    LoadedProject::new(ProjectCatalog::default(), vec![player])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_project_shape() {
        let demo = create_demo_project();
        let bp = demo.workspace.blueprint(DEMO_BLUEPRINT).unwrap();
        assert_eq!(bp.generated_class.as_deref(), Some("PlayerChar_C"));
        assert_eq!(bp.component(DEMO_COMPONENT).unwrap().class, "StaticMeshComponent");
        assert!(bp.event_graph().is_none());
        assert!(demo
            .workspace
            .types()
            .is_child_of("PlayerChar_C", "Character"));
    }
}
