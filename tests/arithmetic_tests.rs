//! Property-based tests for expression precedence and associativity
//!
//! Random expression trees are printed back to mel source with the fewest
//! parentheses that keep their meaning, then parsed again. The parser has to
//! rebuild the exact same tree, which only happens if precedence and left
//! associativity are right.

use mel::parser::ast::*;
use mel::{parse, AstNode};
use proptest::prelude::*;

/// Binding strength of an expression's top-level operator; atoms bind tightest.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::BinOp(node) => match node.op {
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => 0,
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        },
        _ => 3,
    }
}

/// Print with minimal parentheses. Right operands of equal precedence need
/// parentheses because every operator is left-associative.
fn to_source(expr: &Expr) -> String {
    match expr {
        Expr::Num(n) => format!("{}", n.value),
        Expr::Ident(id) => id.name.clone(),
        Expr::BinOp(node) => {
            let p = precedence(expr);
            let left = to_source(&node.left);
            let right = to_source(&node.right);
            let left = if precedence(&node.left) < p {
                format!("({left})")
            } else {
                left
            };
            let right = if precedence(&node.right) <= p {
                format!("({right})")
            } else {
                right
            };
            format!("{left} {} {right}", node.op.symbol())
        }
    }
}

fn parse_expr(source: &str) -> Expr {
    let program = parse(&format!("output {source}"))
        .unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    match program.stmts.into_iter().next() {
        Some(Stmt::Output(OutputNode { arg })) => arg,
        other => panic!("Expected output statement, got {:?}", other),
    }
}

fn count_nodes(node: &dyn AstNode) -> usize {
    let mut count = 0;
    walk(node, &mut |_| count += 1);
    count
}

fn arb_op() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Add),
        Just(BinOp::Sub),
        Just(BinOp::Mul),
        Just(BinOp::Div),
        Just(BinOp::Lt),
        Just(BinOp::Ge),
        Just(BinOp::Eq),
        Just(BinOp::Ne),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (0u32..1000).prop_map(|n| Expr::num(f64::from(n))),
        // Starting with x/y/z keeps generated names clear of every keyword
        "[xyz][a-z0-9_]{0,4}".prop_map(|name| Expr::ident(name)),
    ]
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    arb_leaf().prop_recursive(5, 48, 2, |inner| {
        (arb_op(), inner.clone(), inner).prop_map(|(op, l, r)| Expr::binop(op, l, r))
    })
}

#[test]
fn test_mixed_precedence_example() {
    // a + b * (2 - 1) + 0  ==>  (a + (b * (2 - 1))) + 0
    let expr = parse_expr("a + b * (2 - 1) + 0");
    assert_eq!(to_source(&expr), "a + b * (2 - 1) + 0");
    assert_eq!(
        expr.tree(),
        vec![
            "+",
            "├─+",
            "│ ├─a",
            "│ └─*",
            "│   ├─b",
            "│   └─-",
            "│     ├─2.0",
            "│     └─1.0",
            "└─0.0",
        ]
    );
}

#[test]
fn test_division_is_left_associative() {
    let expected = Expr::binop(
        BinOp::Div,
        Expr::binop(BinOp::Div, Expr::num(8.0), Expr::num(4.0)),
        Expr::num(2.0),
    );
    assert_eq!(parse_expr("8 / 4 / 2"), expected);
}

#[test]
fn test_parentheses_override_associativity() {
    let expected = Expr::binop(
        BinOp::Sub,
        Expr::num(1.0),
        Expr::binop(BinOp::Sub, Expr::num(2.0), Expr::num(3.0)),
    );
    assert_eq!(parse_expr("1 - (2 - 3)"), expected);
}

proptest! {
    #[test]
    fn minimal_parentheses_round_trip(expr in arb_expr()) {
        let source = to_source(&expr);
        prop_assert_eq!(parse_expr(&source), expr);
    }

    #[test]
    fn same_precedence_chain_folds_left(
        first in arb_leaf(),
        rest in prop::collection::vec(
            (prop_oneof![Just(BinOp::Add), Just(BinOp::Sub)], arb_leaf()),
            1..8,
        ),
    ) {
        let mut source = to_source(&first);
        let mut expected = first;
        for (op, term) in rest {
            source.push_str(&format!(" {} {}", op.symbol(), to_source(&term)));
            expected = Expr::binop(op, expected, term);
        }
        prop_assert_eq!(parse_expr(&source), expected);
    }

    #[test]
    fn tree_has_one_line_per_node(expr in arb_expr()) {
        let lines = expr.tree();
        prop_assert_eq!(lines.len(), count_nodes(&expr));
        for line in &lines[1..] {
            let connector_found = line.contains("├─") || line.contains("└─");
            prop_assert!(connector_found, "line without connector: {:?}", line);
        }
    }
}
