//! Graph inspection: Graphviz DOT export, size statistics and a per-node trace.
//!
//! All three walk the graph below a root once, in evaluation order, with
//! shared nodes listed once.

use std::collections::HashSet;

use crate::derivatives::Derivatives;
use crate::eval::schedule;
use crate::expr::{Expr, NodeId};
use crate::float::Float;
use crate::opcode::OpKind;
use crate::value::Value;

/// Distinct node and edge counts of the graph below a root.
///
/// An edge is a distinct `(child, parent)` pair, so `a * a` adds one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

/// One row of [`Expr::trace`].
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRow<F: Float> {
    pub id: NodeId,
    pub kind: OpKind,
    /// Variable name, constant value, or operator label.
    pub label: String,
    pub children: Vec<NodeId>,
    /// `None` if the node has not been evaluated.
    pub value: Option<Value<F>>,
    /// `None` if the node holds no derivative mapping.
    pub derivative: Option<Derivatives<F>>,
}

impl<F: Float> Expr<F> {
    /// Short human-readable label: the variable name, the constant's value,
    /// or the operator's type tag.
    pub fn label(&self) -> String {
        match self.kind() {
            OpKind::Variable => self.name().unwrap_or_default().to_owned(),
            OpKind::Constant => match self.value() {
                Ok(v) => v.to_string(),
                Err(_) => OpKind::Constant.to_string(),
            },
            kind => kind.to_string(),
        }
    }

    /// Render the graph below `self` as Graphviz DOT, edges pointing from
    /// child to parent.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph {\n");
        dot.push_str("  rankdir=BT;\n");

        let mut edges = HashSet::new();
        for node in schedule(self) {
            let (color, shape) = if node.kind().is_leaf() {
                ("indianred1", "box")
            } else {
                ("lightblue", "oval")
            };
            let label = node.label().replace('"', "\\\"");
            dot.push_str(&format!(
                "  {} [label=\"{label}\" color={color} shape={shape}];\n",
                node.id()
            ));
            for child in node.children() {
                if edges.insert((child.id(), node.id())) {
                    dot.push_str(&format!(
                        "  {} -> {} [style=filled];\n",
                        child.id(),
                        node.id()
                    ));
                }
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Distinct node and edge counts below `self`.
    pub fn graph_stats(&self) -> GraphStats {
        let order = schedule(self);
        let mut edges = HashSet::new();
        for node in &order {
            for child in node.children() {
                edges.insert((child.id(), node.id()));
            }
        }
        GraphStats {
            nodes: order.len(),
            edges: edges.len(),
        }
    }

    /// Every node below `self`, children before parents, with its current
    /// value and derivative mapping.
    pub fn trace(&self) -> Vec<TraceRow<F>> {
        schedule(self)
            .into_iter()
            .map(|node| TraceRow {
                id: node.id(),
                kind: node.kind(),
                label: node.label(),
                children: node.children().iter().map(Expr::id).collect(),
                value: node.value().ok(),
                derivative: node.derivative().ok(),
            })
            .collect()
    }
}
