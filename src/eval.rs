//! Value pass and compute orchestration.
//!
//! A compute call validates the inputs, binds them to the variable leaves,
//! evaluates every node once in topological order, then hands the same order
//! to the selected differentiator.

use std::collections::{HashMap, HashSet};

use crate::config::{Config, LogTermPolicy, Mode};
use crate::error::{AdError, Result};
use crate::expr::Expr;
use crate::float::Float;
use crate::opcode::{self, OpKind};
use crate::value::{Shape, Value};
use crate::{forward, reverse};

/// Every node reachable from `root`, each exactly once, children before parents.
///
/// Iterative post-order DFS; shared subexpressions are visited once.
pub(crate) fn schedule<F: Float>(root: &Expr<F>) -> Vec<Expr<F>> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(root.id());
    let mut stack: Vec<(Expr<F>, usize)> = vec![(root.clone(), 0)];

    loop {
        let Some((node, next)) = stack.last_mut() else {
            break;
        };
        match node.children().get(*next).cloned() {
            Some(child) => {
                *next += 1;
                if visited.insert(child.id()) {
                    stack.push((child, 0));
                }
            }
            None => {
                if let Some((done, _)) = stack.pop() {
                    order.push(done);
                }
            }
        }
    }
    order
}

/// Evaluate every operator node in `order`. Leaves must already hold values.
pub(crate) fn evaluate<F: Float>(order: &[Expr<F>]) -> Result<()> {
    for node in order {
        let kind = node.kind();
        if kind.is_leaf() {
            // surfaces NoValue for an unbound variable
            node.value()?;
            continue;
        }
        let children = node.children();
        let a = children[0].value()?;
        let r = if kind.arity() == 2 {
            let b = children[1].value()?;
            a.try_zip_map(&b, |x, y| opcode::eval_forward(kind, x, y))?
        } else {
            a.try_map(|x| opcode::eval_forward(kind, x, F::zero()))?
        };
        log::trace!("eval #{} {kind} = {r}", node.id());
        node.set_value(r);
    }
    Ok(())
}

/// Local partials of an operator node with respect to each child, in child order.
///
/// Each partial has the broadcast shape of the operands and the node's value.
pub(crate) fn local_partials<F: Float>(node: &Expr<F>, config: &Config) -> Result<Vec<Value<F>>> {
    let kind = node.kind();
    let children = node.children();
    let a = children[0].value()?;
    let b = match children.get(1) {
        Some(c) => c.value()?,
        None => Value::Scalar(F::zero()),
    };
    let r = node.value()?;

    if kind == OpKind::Power
        && config.log_term == LogTermPolicy::Error
        && !children[1].free_variables().is_empty()
        && a.any(|x| x <= F::zero())
    {
        return Err(AdError::DomainError(format!(
            "power node #{} has a non-positive base {a} and a variable exponent",
            node.id()
        )));
    }
    let suppress = config.log_term == LogTermPolicy::Suppress;

    let shape = a.shape().broadcast(b.shape())?.broadcast(r.shape())?;
    let mut da = Vec::with_capacity(shape.len());
    let mut db = Vec::with_capacity(shape.len());
    for i in 0..shape.len() {
        let (pa, pb) = opcode::reverse_partials(kind, a.get(i), b.get(i), r.get(i), suppress);
        da.push(pa);
        db.push(pb);
    }
    let wrap = |v: Vec<F>| match shape {
        Shape::Scalar => Value::Scalar(v[0]),
        Shape::Vector(_) => Value::Vector(v),
    };

    let mut partials = vec![wrap(da)];
    if kind.arity() == 2 {
        partials.push(wrap(db));
    }
    Ok(partials)
}

/// Check that the supplied names are exactly the free variable names.
fn validate_inputs<F: Float>(root: &Expr<F>, inputs: &HashMap<String, Value<F>>) -> Result<()> {
    let names = root.variable_names();
    let missing: Vec<String> = names
        .iter()
        .filter(|n| !inputs.contains_key(**n))
        .map(|n| n.to_string())
        .collect();
    let mut unexpected: Vec<String> = inputs
        .keys()
        .filter(|k| !names.contains(&k.as_str()))
        .cloned()
        .collect();
    unexpected.sort();
    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(AdError::UnrecognizedInput {
            missing,
            unexpected,
        })
    }
}

impl<F: Float> Expr<F> {
    /// Evaluate this expression and its derivatives with the default
    /// [`Config`] (forward mode).
    ///
    /// `inputs` maps every free variable name to its value; its key set must
    /// equal [`variable_names`](Self::variable_names) exactly. Returns `self`
    /// so that `value()` / `derivative()` can be chained.
    ///
    /// ```
    /// use adgraph::{api::sin, Expr};
    ///
    /// let x = Expr::<f64>::variable("x").unwrap();
    /// let y = sin(&x) * 2.0;
    /// let d = y.compute([("x", 0.0)]).unwrap().derivative().unwrap();
    /// assert_eq!(d.scalar("x"), Some(2.0));
    /// ```
    pub fn compute<K, V>(&self, inputs: impl IntoIterator<Item = (K, V)>) -> Result<&Self>
    where
        K: Into<String>,
        V: Into<Value<F>>,
    {
        self.compute_with(inputs, &Config::default())
    }

    /// [`compute`](Self::compute) with an explicit [`Config`].
    ///
    /// On error, node values and derivatives may be partially updated and
    /// should not be relied upon until the next successful compute.
    pub fn compute_with<K, V>(
        &self,
        inputs: impl IntoIterator<Item = (K, V)>,
        config: &Config,
    ) -> Result<&Self>
    where
        K: Into<String>,
        V: Into<Value<F>>,
    {
        let mut bound: HashMap<String, Value<F>> = HashMap::new();
        for (k, v) in inputs {
            let k = k.into();
            if bound.contains_key(&k) {
                return Err(AdError::InvalidArgument(format!(
                    "input {k:?} supplied more than once"
                )));
            }
            bound.insert(k, v.into());
        }
        validate_inputs(self, &bound)?;

        for var in self.free_variables() {
            if let Some(name) = var.name() {
                var.bind(bound[name].clone())?;
            }
        }

        let order = schedule(self);
        log::debug!(
            "compute #{}: {} nodes, {} variables, {} mode",
            self.id(),
            order.len(),
            bound.len(),
            config.mode
        );

        evaluate(&order)?;
        match config.mode {
            Mode::Forward => forward::differentiate(self, &order, config),
            Mode::Reverse => reverse::differentiate(self, &order, config),
        }?;
        Ok(self)
    }
}
