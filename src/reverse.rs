//! Reverse-mode (adjoint) differentiation.
//!
//! A single sweep from the target seeds its adjoint with one and pushes
//! `adjoint(child) += adjoint(node) · ∂node/∂child` down every edge. A node
//! forwards its adjoint only once it has received a contribution along every
//! incoming edge, so each adjoint is complete before it is propagated. Edges
//! are counted with multiplicity: `a * a` delivers two contributions to `a`.

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::derivatives::Derivatives;
use crate::error::Result;
use crate::eval::local_partials;
use crate::expr::{Expr, NodeId};
use crate::float::Float;
use crate::opcode::OpKind;
use crate::value::Value;

/// Per-sweep adjoint bookkeeping.
///
/// A node is *accumulating* while `received < expected`, *ready* once they
/// are equal, and *propagated* after its adjoint has been pushed to its
/// children.
struct ReverseSweep<F: Float> {
    adjoints: HashMap<NodeId, Value<F>>,
    expected: HashMap<NodeId, usize>,
    received: HashMap<NodeId, usize>,
    propagated: HashSet<NodeId>,
}

impl<F: Float> ReverseSweep<F> {
    fn new(root: &Expr<F>, order: &[Expr<F>]) -> Self {
        let mut expected: HashMap<NodeId, usize> = HashMap::new();
        for node in order {
            for child in node.children() {
                *expected.entry(child.id()).or_insert(0) += 1;
            }
        }
        // the seed counts as the target's single incoming contribution
        *expected.entry(root.id()).or_insert(0) += 1;

        ReverseSweep {
            adjoints: HashMap::with_capacity(order.len()),
            expected,
            received: HashMap::with_capacity(order.len()),
            propagated: HashSet::with_capacity(order.len()),
        }
    }

    /// Add one contribution to `node`'s adjoint. Returns `true` when this was
    /// the last one the node was waiting for.
    fn contribute(&mut self, node: &Expr<F>, contribution: Value<F>) -> Result<bool> {
        let id = node.id();
        match self.adjoints.get_mut(&id) {
            Some(acc) => *acc = acc.try_add(&contribution)?,
            None => {
                self.adjoints.insert(id, contribution);
            }
        }
        let received = self.received.entry(id).or_insert(0);
        *received += 1;
        let expected = self.expected.get(&id).copied().unwrap_or(0);
        Ok(*received == expected)
    }

    fn adjoint(&self, id: NodeId) -> Option<&Value<F>> {
        self.adjoints.get(&id)
    }
}

/// Run one adjoint sweep from `root` and store the gradient on `root`.
///
/// Interior operator nodes are left without a derivative mapping; variable
/// leaves get their trivial `{name: ones}` mapping.
pub(crate) fn differentiate<F: Float>(
    root: &Expr<F>,
    order: &[Expr<F>],
    config: &Config,
) -> Result<()> {
    let mut sweep = ReverseSweep::new(root, order);
    let mut ready: Vec<Expr<F>> = Vec::new();
    if sweep.contribute(root, Value::Scalar(F::one()))? {
        ready.push(root.clone());
    }

    while let Some(node) = ready.pop() {
        if !node.kind().is_leaf() {
            let adj = sweep.adjoint(node.id()).cloned().unwrap_or(Value::Scalar(F::zero()));
            log::trace!("adjoint #{} {} = {adj}", node.id(), node.kind());
            if node.free_variables().is_empty() {
                // nothing below can reach a variable: deliver zeros to keep the counts
                for child in node.children() {
                    if sweep.contribute(child, Value::Scalar(F::zero()))? {
                        ready.push(child.clone());
                    }
                }
            } else {
                let local = local_partials(&node, config)?;
                for (child, p) in node.children().iter().zip(&local) {
                    if sweep.contribute(child, adj.try_mul(p)?)? {
                        ready.push(child.clone());
                    }
                }
            }
        }
        sweep.propagated.insert(node.id());
    }

    let stalled: Vec<NodeId> = order
        .iter()
        .map(Expr::id)
        .filter(|id| !sweep.propagated.contains(id))
        .collect();
    assert!(
        stalled.is_empty(),
        "reverse sweep finished with {} node(s) never ready: {stalled:?}",
        stalled.len()
    );

    let root_shape = root.value()?.shape();
    let mut gradient = Derivatives::new();
    for name in root.variable_names() {
        let mut total: Option<Value<F>> = None;
        let mut var_shape = None;
        for leaf in root.free_variables().iter().filter(|v| v.name() == Some(name)) {
            var_shape = Some(leaf.value()?.shape());
            if let Some(adj) = sweep.adjoint(leaf.id()) {
                total = Some(match total {
                    Some(sum) => sum.try_add(adj)?,
                    None => adj.clone(),
                });
            }
        }
        if let (Some(total), Some(shape)) = (total, var_shape) {
            gradient.insert(name, total.broadcast_to(shape.broadcast(root_shape)?)?);
        }
    }
    log::debug!(
        "reverse: {} nodes propagated, {} partial(s) on #{}",
        sweep.propagated.len(),
        gradient.len(),
        root.id()
    );

    for node in order {
        match node.kind() {
            OpKind::Constant => {}
            OpKind::Variable => {
                let mut own = Derivatives::new();
                if let Some(name) = node.name() {
                    own.insert(name, Value::ones(node.value()?.shape()));
                }
                node.set_derivative(Some(own));
            }
            _ => node.set_derivative(None),
        }
    }
    root.set_derivative(Some(gradient));
    Ok(())
}
