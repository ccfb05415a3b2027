//! Forward-mode (tangent) differentiation.
//!
//! One sweep per seed: a scalar variable is one seed, a vector variable of
//! length `n` is `n` seeds, one per component. Each sweep walks the
//! topological order and pushes `t = ∂node/∂child0 · t0 + ∂node/∂child1 · t1`
//! upwards. Nodes that do not depend on the seeded variable carry no tangent
//! at all rather than an explicit zero.

use std::collections::HashMap;

use crate::config::Config;
use crate::derivatives::Derivatives;
use crate::error::Result;
use crate::eval::local_partials;
use crate::expr::{Expr, NodeId};
use crate::float::Float;
use crate::opcode::OpKind;
use crate::value::{Shape, Value};

/// The variable (and component) being differentiated in one sweep.
struct Seed<'a> {
    name: &'a str,
    /// Component index for vector variables.
    index: Option<usize>,
}

impl Seed<'_> {
    fn tangent<F: Float>(&self, shape: Shape) -> Value<F> {
        match self.index {
            Some(i) => Value::one_hot(shape.len(), i),
            None => Value::ones(shape),
        }
    }
}

/// One tangent sweep. Returns the tangent of every node that depends on the
/// seeded variable.
fn sweep<F: Float>(
    order: &[Expr<F>],
    partials: &HashMap<NodeId, Vec<Value<F>>>,
    seed: &Seed<'_>,
) -> Result<HashMap<NodeId, Value<F>>> {
    let mut tangents: HashMap<NodeId, Value<F>> = HashMap::new();
    for node in order {
        let t = match node.kind() {
            OpKind::Constant => None,
            OpKind::Variable => {
                if node.name() == Some(seed.name) {
                    Some(seed.tangent(node.value()?.shape()))
                } else {
                    None
                }
            }
            _ => {
                let Some(local) = partials.get(&node.id()) else {
                    continue;
                };
                let mut acc: Option<Value<F>> = None;
                for (child, p) in node.children().iter().zip(local) {
                    let Some(tc) = tangents.get(&child.id()) else {
                        continue;
                    };
                    let term = p.try_mul(tc)?;
                    acc = Some(match acc {
                        Some(sum) => sum.try_add(&term)?,
                        None => term,
                    });
                }
                acc
            }
        };
        if let Some(t) = t {
            log::trace!("tangent #{} d/d{}[{:?}] = {t}", node.id(), seed.name, seed.index);
            tangents.insert(node.id(), t);
        }
    }
    Ok(tangents)
}

/// Fill every node's derivative mapping with respect to each variable it
/// depends on.
pub(crate) fn differentiate<F: Float>(
    root: &Expr<F>,
    order: &[Expr<F>],
    config: &Config,
) -> Result<()> {
    // local partials are sweep-invariant
    let mut partials: HashMap<NodeId, Vec<Value<F>>> = HashMap::new();
    for node in order {
        if !node.kind().is_leaf() && !node.free_variables().is_empty() {
            partials.insert(node.id(), local_partials(node, config)?);
        }
    }

    let mut results: HashMap<NodeId, Derivatives<F>> = order
        .iter()
        .map(|n| (n.id(), Derivatives::new()))
        .collect();

    let mut sweeps = 0usize;
    for name in root.variable_names() {
        let var_shape = match root.free_variables().iter().find(|v| v.name() == Some(name)) {
            Some(v) => v.value()?.shape(),
            None => continue,
        };
        let seeds: Vec<Seed<'_>> = match var_shape {
            Shape::Scalar => vec![Seed { name, index: None }],
            Shape::Vector(n) => (0..n).map(|i| Seed { name, index: Some(i) }).collect(),
        };

        for seed in &seeds {
            let tangents = sweep(order, &partials, seed)?;
            sweeps += 1;
            for node in order {
                let Some(t) = tangents.get(&node.id()) else {
                    continue;
                };
                let node_shape = node.value()?.shape();
                let Some(entry) = results.get_mut(&node.id()) else {
                    continue;
                };
                match seed.index {
                    None => entry.insert(name, t.broadcast_to(node_shape)?),
                    Some(i) => {
                        let shape = var_shape.broadcast(node_shape)?;
                        if !entry.contains(name) {
                            entry.insert(name, Value::zeros(shape));
                        }
                        if let Some(Value::Vector(slot)) = entry.get_mut(name) {
                            slot[i] = t.get(i);
                        }
                    }
                }
            }
        }
    }
    log::debug!("forward: {sweeps} sweep(s) over {} nodes", order.len());

    for node in order {
        node.set_derivative(results.remove(&node.id()));
    }
    Ok(())
}
