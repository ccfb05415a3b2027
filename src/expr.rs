//! Expression-graph nodes.
//!
//! An [`Expr`] is a shared handle to one node of an immutable-shape DAG.
//! Composing handles with operators (see [`crate::api`] and the `std::ops`
//! impls) always builds a *new* parent node; children are shared, never
//! copied. Each node also carries mutable `value` / `derivative` slots that
//! every [`compute`](Expr::compute) call overwrites in place.
//!
//! # Concurrency
//!
//! Handles are `Rc`-based and therefore neither `Send` nor `Sync`. A node
//! shared by two root expressions holds whatever the most recent compute on
//! either root wrote into it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::derivatives::Derivatives;
use crate::error::{AdError, Result};
use crate::float::Float;
use crate::opcode::OpKind;
use crate::value::{Shape, Value};

/// Process-unique node identity, assigned at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct Node<F: Float> {
    id: NodeId,
    kind: OpKind,
    children: Vec<Expr<F>>,
    /// Variable name (variables only).
    name: Option<String>,
    /// Shape a variable's bound value must have, if declared.
    declared_shape: Option<Shape>,
    /// Variable leaves below this node, in order of first appearance.
    /// Empty for leaves: a variable answers with itself, see [`Expr::free_variables`].
    free_variables: Vec<Expr<F>>,
    pub(crate) value: RefCell<Option<Value<F>>>,
    pub(crate) derivative: RefCell<Option<Derivatives<F>>>,
}

impl<F: Float> Drop for Node<F> {
    // Unlinks uniquely owned descendants onto a heap stack so that dropping a
    // long chain does not recurse once per level.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        stack.append(&mut self.free_variables);
        while let Some(expr) = stack.pop() {
            if let Ok(mut node) = Rc::try_unwrap(expr.0) {
                stack.append(&mut node.children);
                stack.append(&mut node.free_variables);
            }
        }
    }
}

/// Shared handle to an expression-graph node.
///
/// Cloning is cheap and yields a handle to the *same* node.
pub struct Expr<F: Float>(pub(crate) Rc<Node<F>>);

impl<F: Float> Clone for Expr<F> {
    #[inline]
    fn clone(&self) -> Self {
        Expr(Rc::clone(&self.0))
    }
}

/// `true` for non-empty, identifier-like names: a letter or `_`, then letters,
/// digits or `_`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn check_variable_name(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(AdError::InvalidArgument(format!(
            "variable name must be a non-empty identifier, got {name:?}"
        )))
    }
}

impl<F: Float> Expr<F> {
    fn leaf(
        kind: OpKind,
        name: Option<String>,
        declared_shape: Option<Shape>,
        value: Option<Value<F>>,
        derivative: Option<Derivatives<F>>,
    ) -> Self {
        Expr(Rc::new(Node {
            id: NodeId::next(),
            kind,
            children: Vec::new(),
            name,
            declared_shape,
            free_variables: Vec::new(),
            value: RefCell::new(value),
            derivative: RefCell::new(derivative),
        }))
    }

    /// Create a named variable. Its value is supplied at compute time.
    ///
    /// Fails with [`AdError::InvalidArgument`] if `name` is empty or not
    /// identifier-like.
    pub fn variable(name: &str) -> Result<Self> {
        check_variable_name(name)?;
        Ok(Self::leaf(
            OpKind::Variable,
            Some(name.to_owned()),
            None,
            None,
            None,
        ))
    }

    /// Create a named variable that only accepts values of `shape`.
    pub fn variable_with_shape(name: &str, shape: Shape) -> Result<Self> {
        check_variable_name(name)?;
        if shape == Shape::Vector(0) {
            return Err(AdError::InvalidArgument(format!(
                "variable {name:?} cannot have an empty vector shape"
            )));
        }
        Ok(Self::leaf(
            OpKind::Variable,
            Some(name.to_owned()),
            Some(shape),
            None,
            None,
        ))
    }

    /// Create a constant. Its derivative is permanently zero and it never
    /// appears among the free variables.
    pub fn constant(value: impl Into<Value<F>>) -> Self {
        Self::leaf(
            OpKind::Constant,
            None,
            None,
            Some(value.into()),
            Some(Derivatives::new()),
        )
    }

    /// Build a new operator node over `children`.
    ///
    /// The free variables are the union of the children's, in order of first
    /// appearance. Nothing is evaluated here.
    pub(crate) fn op(kind: OpKind, children: Vec<Expr<F>>) -> Self {
        assert_eq!(
            children.len(),
            kind.arity(),
            "{kind} takes {} operand(s)",
            kind.arity()
        );
        let mut free_variables: Vec<Expr<F>> = Vec::new();
        for child in &children {
            for var in child.free_variables() {
                if !free_variables.iter().any(|v| v.id() == var.id()) {
                    free_variables.push(var.clone());
                }
            }
        }
        Expr(Rc::new(Node {
            id: NodeId::next(),
            kind,
            children,
            name: None,
            declared_shape: None,
            free_variables,
            value: RefCell::new(None),
            derivative: RefCell::new(None),
        }))
    }

    // ── Introspection ──

    #[inline]
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    #[inline]
    pub fn kind(&self) -> OpKind {
        self.0.kind
    }

    /// Operand nodes, in operand order.
    #[inline]
    pub fn children(&self) -> &[Expr<F>] {
        &self.0.children
    }

    /// Variable name, or `None` for constants and operators.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Declared shape of a variable, if any.
    #[inline]
    pub fn declared_shape(&self) -> Option<Shape> {
        self.0.declared_shape
    }

    /// Variable leaves reachable from this node, in order of first appearance.
    pub fn free_variables(&self) -> &[Expr<F>] {
        match self.0.kind {
            OpKind::Variable => std::slice::from_ref(self),
            _ => &self.0.free_variables,
        }
    }

    /// Distinct free variable names, in order of first appearance.
    ///
    /// These are exactly the keys [`compute`](Self::compute) expects.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.free_variables().iter().filter_map(Expr::name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// True if some variable named `name` is reachable from this node.
    pub fn depends_on(&self, name: &str) -> bool {
        self.free_variables().iter().any(|v| v.name() == Some(name))
    }

    /// True if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn describe(&self) -> String {
        match (self.0.kind, self.name()) {
            (OpKind::Variable, Some(name)) => format!("variable {name:?}"),
            (kind, _) => format!("{kind} node #{}", self.0.id),
        }
    }

    // ── Values ──

    /// Current value.
    ///
    /// Fails with [`AdError::NoValue`] before the first successful bind / compute.
    pub fn value(&self) -> Result<Value<F>> {
        self.0
            .value
            .borrow()
            .clone()
            .ok_or_else(|| AdError::NoValue(format!("{} has no value", self.describe())))
    }

    /// Current partial derivatives, keyed by variable name.
    ///
    /// Fails with [`AdError::NoValue`] before the first successful compute, and
    /// for interior operator nodes after a reverse-mode compute (only the
    /// target of a reverse sweep receives a derivative mapping).
    pub fn derivative(&self) -> Result<Derivatives<F>> {
        self.0
            .derivative
            .borrow()
            .clone()
            .ok_or_else(|| AdError::NoValue(format!("{} has no derivative", self.describe())))
    }

    /// Bind `value` to this variable and reset its derivative to the matching zero.
    ///
    /// Fails with [`AdError::InvalidArgument`] on a non-variable node and with
    /// [`AdError::TypeMismatch`] on an empty vector or a value whose shape
    /// differs from the declared one.
    pub fn bind(&self, value: impl Into<Value<F>>) -> Result<()> {
        let name = match (self.0.kind, self.name()) {
            (OpKind::Variable, Some(name)) => name,
            _ => {
                return Err(AdError::InvalidArgument(format!(
                    "cannot bind a value to a {} node",
                    self.0.kind
                )))
            }
        };
        let value = value.into();
        let shape = value.shape();
        if shape == Shape::Vector(0) {
            return Err(AdError::TypeMismatch(format!(
                "variable {name:?} bound to an empty vector"
            )));
        }
        if let Some(declared) = self.0.declared_shape {
            if declared != shape {
                return Err(AdError::TypeMismatch(format!(
                    "variable {name:?} expects a {declared} value, got {shape}"
                )));
            }
        }
        let mut zero = Derivatives::new();
        zero.insert(name, Value::zeros(shape));
        *self.0.value.borrow_mut() = Some(value);
        *self.0.derivative.borrow_mut() = Some(zero);
        Ok(())
    }

    pub(crate) fn set_value(&self, value: Value<F>) {
        *self.0.value.borrow_mut() = Some(value);
    }

    pub(crate) fn set_derivative(&self, derivative: Option<Derivatives<F>>) {
        *self.0.derivative.borrow_mut() = derivative;
    }
}

impl<F: Float> fmt::Debug for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Expr");
        s.field("id", &self.0.id).field("kind", &self.0.kind);
        if let Some(name) = self.name() {
            s.field("name", &name);
        }
        s.field("value", &*self.0.value.borrow()).finish()
    }
}

impl<F: Float> From<F> for Expr<F> {
    /// Wrap a number as a [`Constant`](OpKind::Constant) node.
    #[inline]
    fn from(x: F) -> Self {
        Expr::constant(x)
    }
}

impl<F: Float> From<&Expr<F>> for Expr<F> {
    #[inline]
    fn from(e: &Expr<F>) -> Self {
        e.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_names() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("théta"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn ids_are_unique() {
        let a = Expr::<f64>::variable("a").unwrap();
        let b = Expr::<f64>::variable("a").unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn free_variables_union_in_first_appearance_order() {
        let a = Expr::<f64>::variable("a").unwrap();
        let b = Expr::<f64>::variable("b").unwrap();
        let ab = Expr::op(OpKind::Multiplication, vec![b.clone(), a.clone()]);
        let e = Expr::op(OpKind::Addition, vec![ab, a.clone()]);
        assert_eq!(e.variable_names(), vec!["b", "a"]);
        assert_eq!(e.free_variables().len(), 2);
        assert!(e.depends_on("a"));
        assert!(!e.depends_on("c"));
    }

    #[test]
    fn shaped_variable_checks_name_then_shape() {
        let v = Expr::<f64>::variable_with_shape("v", Shape::Vector(3)).unwrap();
        assert_eq!(v.name(), Some("v"));
        assert_eq!(v.declared_shape(), Some(Shape::Vector(3)));
        assert_eq!(v.kind(), OpKind::Variable);

        let err = Expr::<f64>::variable_with_shape("2v", Shape::Vector(0)).unwrap_err();
        assert!(matches!(err, AdError::InvalidArgument(ref m) if m.contains("identifier")));
        let err = Expr::<f64>::variable_with_shape("v", Shape::Vector(0)).unwrap_err();
        assert!(matches!(err, AdError::InvalidArgument(ref m) if m.contains("empty vector shape")));
    }

    #[test]
    fn dropping_a_long_chain_keeps_shared_leaves() {
        let a = Expr::<f64>::variable("a").unwrap();
        let mut y = a.clone();
        for _ in 0..100_000 {
            y = Expr::op(OpKind::Negation, vec![y]);
        }
        let keep = y.children()[0].clone();
        drop(y);
        // a node still referenced elsewhere survives with its subtree intact
        assert_eq!(keep.free_variables().len(), 1);
        assert!(keep.free_variables()[0].ptr_eq(&a));
        drop(keep);
        assert_eq!(Rc::strong_count(&a.0), 1);
    }

    #[test]
    #[should_panic(expected = "takes 2 operand(s)")]
    fn arity_is_enforced() {
        let a = Expr::<f64>::variable("a").unwrap();
        let _ = Expr::op(OpKind::Addition, vec![a]);
    }
}
