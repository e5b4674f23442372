use serde::Serialize;

use crate::model::{Blueprint, Graph, Node, NodeId, PinDirection};

/// Structured view of a blueprint returned by `describe_blueprint`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct BlueprintDescription {
    pub summary: String,
    pub nodes: Vec<NodeSummary>,
    pub links: Vec<LinkSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct NodeSummary {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub position: [f64; 2],
    pub pins: Vec<PinSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct PinSummary {
    pub name: String,
    pub direction: String,
    pub pin_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct LinkSummary {
    pub source_node_id: String,
    pub source_pin: String,
    pub target_node_id: String,
    pub target_pin: String,
}

pub fn describe(blueprint: &Blueprint) -> BlueprintDescription {
    let graph = blueprint.event_graph();
    BlueprintDescription {
        summary: describe_blueprint(blueprint),
        nodes: graph
            .map(|g| g.nodes().iter().map(summarize_node).collect())
            .unwrap_or_default(),
        links: graph
            .map(|g| {
                g.links()
                    .iter()
                    .map(|l| LinkSummary {
                        source_node_id: l.from.node.to_string(),
                        source_pin: l.from.pin.clone(),
                        target_node_id: l.to.node.to_string(),
                        target_pin: l.to.pin.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn summarize_node(node: &Node) -> NodeSummary {
    NodeSummary {
        id: node.id.to_string(),
        kind: node.kind.type_name().to_string(),
        label: node.kind.title(),
        position: [node.position.x, node.position.y],
        pins: node
            .pins
            .iter()
            .map(|p| PinSummary {
                name: p.name.clone(),
                direction: match p.direction {
                    PinDirection::Input => "input".to_string(),
                    PinDirection::Output => "output".to_string(),
                },
                pin_type: p.pin_type.to_string(),
                default_value: p.default_value.clone(),
            })
            .collect(),
    }
}

/// Human-readable summary of a blueprint: class, members, graph contents.
pub fn describe_blueprint(blueprint: &Blueprint) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Blueprint: {} (parent: {}, class: {})",
        blueprint.name,
        blueprint.parent_class,
        blueprint.generated_class.as_deref().unwrap_or("(not generated)")
    ));

    // Components
    if !blueprint.components.is_empty() {
        lines.push(format!("\nComponents ({})", blueprint.components.len()));
        for c in &blueprint.components {
            lines.push(format!("  - {} ({})", c.name, c.class));
        }
    }

    // Variables
    if !blueprint.variables.is_empty() {
        lines.push(format!("\nVariables ({})", blueprint.variables.len()));
        for v in &blueprint.variables {
            lines.push(format!(
                "  - {}: {}{}",
                v.name,
                v.pin_type,
                if v.exposed { " (exposed)" } else { "" }
            ));
        }
    }

    match blueprint.event_graph() {
        Some(graph) => lines.push(describe_graph(graph)),
        None => lines.push("\nNo event graph yet.".to_string()),
    }

    lines.join("\n")
}

/// Nodes in graph order, then links.
pub fn describe_graph(graph: &Graph) -> String {
    let mut lines = vec![format!(
        "\n{} ({} nodes, {} links)",
        graph.name,
        graph.nodes().len(),
        graph.links().len()
    )];
    for node in graph.nodes() {
        lines.push(format!(
            "  - {} [{}] at ({:.0}, {:.0})",
            node.kind.title(),
            node.id,
            node.position.x,
            node.position.y
        ));
        for pin in node.pins.iter().filter(|p| p.default_value.is_some()) {
            lines.push(format!(
                "      {} = {}",
                pin.name,
                pin.default_value.as_deref().unwrap_or_default()
            ));
        }
    }
    for link in graph.links() {
        let title = |id: NodeId| {
            graph
                .node(id)
                .map_or_else(|| id.to_string(), |n| n.kind.title())
        };
        lines.push(format!(
            "  {}.{} -> {}.{}",
            title(link.from.node),
            link.from.pin,
            title(link.to.node),
            link.to.pin
        ));
    }
    lines.join("\n")
}
