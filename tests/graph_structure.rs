use adgraph::api::{cos, exp, ln, log, sin};
use adgraph::{Expr, Expr64, GraphStats, OpKind};

fn var(name: &str) -> Expr64 {
    Expr::variable(name).unwrap()
}

fn composite() -> (Vec<Expr64>, Expr64) {
    let v: Vec<Expr64> = ["a", "b", "c", "d"].iter().map(|n| var(n)).collect();
    let (a, b, c, d) = (&v[0], &v[1], &v[2], &v[3]);
    let y = cos(&((-a).pow(2.0) / c)) - 4.0 * sin(b) * log(&(exp(d) + 1.0), 10.0);
    (v, y)
}

#[test]
fn composite_graph_size() {
    let (_, y) = composite();
    assert_eq!(y.graph_stats(), GraphStats { nodes: 19, edges: 18 });
}

#[test]
fn unary_graph_sizes() {
    let c = var("c");
    // log(c) uses an explicit constant base
    assert_eq!(ln(&c).graph_stats(), GraphStats { nodes: 3, edges: 2 });
    assert_eq!(sin(&c).graph_stats(), GraphStats { nodes: 2, edges: 1 });
    assert_eq!((-&c).graph_stats(), GraphStats { nodes: 2, edges: 1 });
    assert_eq!(c.pow(3.0).graph_stats(), GraphStats { nodes: 3, edges: 2 });
}

#[test]
fn shared_nodes_are_counted_once() {
    let a = var("a");
    let sq = &a * &a;
    assert_eq!(sq.graph_stats(), GraphStats { nodes: 2, edges: 1 });
    let y = &sq + &sq;
    assert_eq!(y.graph_stats(), GraphStats { nodes: 3, edges: 2 });
}

#[test]
fn free_variables_in_first_appearance_order() {
    let (v, y) = composite();
    assert_eq!(y.variable_names(), vec!["a", "c", "b", "d"]);
    let ids: Vec<_> = y.free_variables().iter().map(Expr::id).collect();
    assert_eq!(ids, vec![v[0].id(), v[2].id(), v[1].id(), v[3].id()]);
}

#[test]
fn children_are_shared_not_copied() {
    let x = var("x");
    let s = sin(&x);
    let y1 = &s + 1.0;
    let y2 = &s * 2.0;
    assert!(y1.children()[0].ptr_eq(&s));
    assert!(y2.children()[0].ptr_eq(&s));
    assert!(s.children()[0].ptr_eq(&x));
    assert_eq!(y1.kind().arity(), y1.children().len());
}

#[test]
fn dot_output() {
    let x = var("x");
    let y = sin(&x) + 2.0;
    let dot = y.to_dot();
    assert!(dot.starts_with("digraph {\n"));
    assert!(dot.contains("rankdir=BT;"));
    assert!(dot.contains(&format!(
        "{} [label=\"x\" color=indianred1 shape=box];",
        x.id()
    )));
    assert!(dot.contains(&format!(
        "{} [label=\"Sin\" color=lightblue shape=oval];",
        y.children()[0].id()
    )));
    assert!(dot.contains(&format!(
        "{} -> {} [style=filled];",
        x.id(),
        y.children()[0].id()
    )));
    assert!(dot.contains("[label=\"2\" color=indianred1 shape=box]"));
    assert!(dot.contains("[label=\"Addition\" color=lightblue shape=oval]"));
    assert_eq!(dot.matches("->").count(), 3);
    assert!(dot.ends_with("}\n"));
}

#[test]
fn dot_has_one_statement_per_line() {
    let (_, y) = composite();
    let dot = y.to_dot();
    let stats = y.graph_stats();
    let lines: Vec<&str> = dot.lines().collect();
    // header, rankdir, one line per node and per edge, closing brace
    assert_eq!(lines.len(), 3 + stats.nodes + stats.edges);
    assert_eq!(lines.iter().filter(|l| l.contains("shape=")).count(), stats.nodes);
    assert_eq!(lines.iter().filter(|l| l.contains(" -> ")).count(), stats.edges);
    for line in &lines[1..lines.len() - 1] {
        assert!(line.starts_with("  ") && line.ends_with(';'), "{line:?}");
    }
}

#[test]
fn dot_lists_repeated_operands_once() {
    let a = var("a");
    let y = &a * &a;
    assert_eq!(y.to_dot().matches("->").count(), 1);
}

#[test]
fn trace_rows() {
    let a = var("a");
    let b = var("b");
    let y = sin(&(&a * &b));
    let before = y.trace();
    assert_eq!(before.len(), 4);
    assert!(before.iter().all(|row| row.value.is_none()));

    y.compute([("a", 2.0), ("b", 0.5)]).unwrap();
    let rows = y.trace();
    let kinds: Vec<OpKind> = rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![OpKind::Variable, OpKind::Variable, OpKind::Multiplication, OpKind::Sin]
    );
    assert_eq!(rows[0].label, "a");
    assert_eq!(rows[2].label, "Multiplication");
    assert_eq!(rows[2].children, vec![a.id(), b.id()]);
    assert_eq!(rows[3].id, y.id());
    assert_eq!(rows[2].value.as_ref().and_then(|v| v.as_scalar()), Some(1.0));
    let d = rows[3].derivative.as_ref().unwrap();
    assert_eq!(d.scalar("a"), Some(0.5 * 1.0_f64.cos()));
}
