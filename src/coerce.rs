//! Conversion of loosely typed request values into pin default literals.

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Graph, NodeId, PinDirection, PinType};

/// Literal for a value of the given pin type, or `None` when the value has no
/// literal form (null, objects, arrays other than three numbers).
pub fn coerce(pin_type: &PinType, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        Value::Number(n) => Some(number_literal(pin_type, n)),
        Value::Array(items) => vector_literal(items),
        Value::Null | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_literal(pin_type: &PinType, n: &serde_json::Number) -> String {
    if *pin_type == PinType::Integer {
        if let Some(i) = n.as_i64() {
            return i.to_string();
        }
        if let Some(u) = n.as_u64() {
            return u.to_string();
        }
        return (n.as_f64().unwrap_or_default().trunc() as i64).to_string();
    }
    float_literal(n.as_f64().unwrap_or_default())
}

/// Shortest round-trip form, always carrying a fractional part.
fn float_literal(v: f64) -> String {
    let s = format!("{v}");
    if s.contains(['.', 'e', 'E']) || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

fn vector_literal(items: &[Value]) -> Option<String> {
    let [x, y, z] = items else {
        return None;
    };
    let (x, y, z) = (x.as_f64()?, y.as_f64()?, z.as_f64()?);
    Some(format!("(X={x:.6},Y={y:.6},Z={z:.6})"))
}

/// Write literals from `params` into matching, unlinked input pins of `node`.
/// Names without a pin, linked pins and values without a literal form are
/// skipped. Returns the number of pins written.
pub fn apply_literals(graph: &mut Graph, node: NodeId, params: &Map<String, Value>) -> usize {
    let linked: Vec<bool> = params
        .keys()
        .map(|name| graph.is_input_linked(node, name))
        .collect();
    let Some(target) = graph.node_mut(node) else {
        return 0;
    };

    let mut applied = 0;
    for ((name, value), is_linked) in params.iter().zip(linked) {
        if is_linked {
            debug!(pin = %name, "literal skipped: pin is linked");
            continue;
        }
        let Some(pin) = target.find_pin_mut(name, PinDirection::Input) else {
            debug!(pin = %name, "literal skipped: no such input pin");
            continue;
        };
        match coerce(&pin.pin_type, value) {
            Some(literal) => {
                pin.default_value = Some(literal);
                applied += 1;
            }
            None => debug!(pin = %name, %value, "literal skipped: unsupported value"),
        }
    }
    applied
}
