//! AST node definitions for mel programs
//!
//! Every node type implements [`AstNode`], which exposes its ordered children
//! and a short display label. Tree rendering and pre-order traversal are built
//! on those two accessors only, so they work uniformly over `&dyn AstNode`.
//!
//! Expressions and statements are grouped into the [`Expr`] and [`Stmt`] sum
//! types; the concrete node structs hold their children by value, so the tree
//! is strictly owned top-down and never shares subtrees.

use rustc_hash::FxHashMap;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 0-based character offset into the source text
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Tag identifying the concrete variant behind an [`AstNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Num,
    Vartype,
    Ident,
    BinOp,
    Input,
    Output,
    StmtList,
    Assign,
    Declare,
    If,
    Loop,
    While,
    For,
    Scope,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Num => "Num",
            NodeKind::Vartype => "Vartype",
            NodeKind::Ident => "Ident",
            NodeKind::BinOp => "BinOp",
            NodeKind::Input => "Input",
            NodeKind::Output => "Output",
            NodeKind::StmtList => "StmtList",
            NodeKind::Assign => "Assign",
            NodeKind::Declare => "Declare",
            NodeKind::If => "If",
            NodeKind::Loop => "Loop",
            NodeKind::While => "While",
            NodeKind::For => "For",
            NodeKind::Scope => "Scope",
        }
    }
}

/// Common interface of all syntax tree nodes.
pub trait AstNode: fmt::Debug + Send + Sync {
    /// Child nodes in left-to-right syntactic order. Empty for leaves.
    fn children(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }

    /// Short text shown for this node in a rendered tree.
    fn label(&self) -> String;

    fn kind(&self) -> NodeKind;

    /// Render this subtree as box-drawing lines, one line per node.
    ///
    /// ```text
    /// =
    /// ├─c
    /// └─+
    ///   ├─a
    ///   └─1.0
    /// ```
    fn tree(&self) -> Vec<String> {
        let mut lines = vec![self.label()];
        let children = self.children();
        let last = children.len().saturating_sub(1);

        for (i, child) in children.iter().enumerate() {
            let (head, tail) = if i == last {
                ("└─", "  ")
            } else {
                ("├─", "│ ")
            };
            for (j, line) in child.tree().into_iter().enumerate() {
                let prefix = if j == 0 { head } else { tail };
                lines.push(format!("{prefix}{line}"));
            }
        }

        lines
    }

    /// Pre-order traversal: `f` sees this node, then every descendant in
    /// `children()` order.
    fn visit(&self, f: &mut dyn FnMut(&dyn AstNode))
    where
        Self: Sized,
    {
        walk(self, f);
    }
}

/// Pre-order traversal over a type-erased node.
pub fn walk(node: &dyn AstNode, f: &mut dyn FnMut(&dyn AstNode)) {
    f(node);
    for child in node.children() {
        walk(child, f);
    }
}

/// Node counts per [`NodeKind`] for a whole subtree.
#[derive(Debug, Clone, Default)]
pub struct NodeCensus {
    counts: FxHashMap<NodeKind, usize>,
    total: usize,
}

impl NodeCensus {
    pub fn of(root: &dyn AstNode) -> Self {
        let mut census = NodeCensus::default();
        walk(root, &mut |node| {
            *census.counts.entry(node.kind()).or_insert(0) += 1;
            census.total += 1;
        });
        census
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Non-zero counts, ordered by kind.
    pub fn entries(&self) -> Vec<(NodeKind, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, n)| (*k, *n)).collect();
        entries.sort();
        entries
    }
}

// ===== Expressions =====

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Numeric literal. All mel numbers are floating point.
#[derive(Debug, Clone, PartialEq)]
pub struct NumNode {
    pub value: f64,
}

impl AstNode for NumNode {
    fn label(&self) -> String {
        // Debug keeps the fractional part of integral values: `1.0`, not `1`
        format!("{:?}", self.value)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Num
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentNode {
    pub name: String,
}

impl IdentNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AstNode for IdentNode {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Ident
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOpNode {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl AstNode for BinOpNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![
            self.left.as_ref() as &dyn AstNode,
            self.right.as_ref() as &dyn AstNode,
        ]
    }

    fn label(&self) -> String {
        self.op.symbol().to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::BinOp
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(NumNode),
    Ident(IdentNode),
    BinOp(BinOpNode),
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(NumNode { value })
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(IdentNode::new(name))
    }

    pub fn binop(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOpNode {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn node(&self) -> &dyn AstNode {
        match self {
            Expr::Num(n) => n,
            Expr::Ident(n) => n,
            Expr::BinOp(n) => n,
        }
    }
}

impl AstNode for Expr {
    fn children(&self) -> Vec<&dyn AstNode> {
        self.node().children()
    }

    fn label(&self) -> String {
        self.node().label()
    }

    fn kind(&self) -> NodeKind {
        self.node().kind()
    }
}

// ===== Statements =====

/// Declarable variable types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vartype {
    Int,
    Real,
    Bool,
    Char,
}

impl Vartype {
    pub fn as_str(self) -> &'static str {
        match self {
            Vartype::Int => "int",
            Vartype::Real => "real",
            Vartype::Bool => "bool",
            Vartype::Char => "char",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VartypeNode {
    pub vartype: Vartype,
}

impl AstNode for VartypeNode {
    fn label(&self) -> String {
        self.vartype.as_str().to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Vartype
    }
}

/// `input <ident>`
#[derive(Debug, Clone, PartialEq)]
pub struct InputNode {
    pub var: IdentNode,
}

impl AstNode for InputNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.var as &dyn AstNode]
    }

    fn label(&self) -> String {
        "input".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Input
    }
}

/// `output <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNode {
    pub arg: Expr,
}

impl AstNode for OutputNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.arg as &dyn AstNode]
    }

    fn label(&self) -> String {
        "output".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Output
    }
}

/// `<ident> = <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub var: IdentNode,
    pub val: Expr,
}

impl AssignNode {
    pub fn new(var: impl Into<String>, val: Expr) -> Self {
        Self {
            var: IdentNode::new(var),
            val,
        }
    }
}

impl AstNode for AssignNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.var as &dyn AstNode, &self.val as &dyn AstNode]
    }

    fn label(&self) -> String {
        "=".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Assign
    }
}

/// `<vartype> <ident> = <expr>`; declarations always carry an initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclareNode {
    pub vartype: VartypeNode,
    pub assign: AssignNode,
}

impl AstNode for DeclareNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.vartype as &dyn AstNode, &self.assign as &dyn AstNode]
    }

    fn label(&self) -> String {
        "let".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Declare
    }
}

/// Ordered block of statements. The program root is one of these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StmtListNode {
    pub stmts: Vec<Stmt>,
}

impl StmtListNode {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl AstNode for StmtListNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        self.stmts.iter().map(|s| s as &dyn AstNode).collect()
    }

    fn label(&self) -> String {
        "...".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::StmtList
    }
}

/// One `elif <cond> then <body>` arm of an [`IfNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElifBranch {
    pub cond: Expr,
    pub body: StmtListNode,
}

/// `if ... then ... {elif ... then ...} [else ...] end if`
///
/// Children are flattened in source order: condition, then-branch, each elif
/// condition and body, and finally the else body if present.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub cond: Expr,
    pub then_branch: StmtListNode,
    pub elif_branches: Vec<ElifBranch>,
    pub else_branch: Option<StmtListNode>,
}

impl AstNode for IfNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children = vec![&self.cond as &dyn AstNode, &self.then_branch as &dyn AstNode];
        for elif in &self.elif_branches {
            children.push(&elif.cond);
            children.push(&elif.body);
        }
        if let Some(else_branch) = &self.else_branch {
            children.push(else_branch);
        }
        children
    }

    fn label(&self) -> String {
        "if".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::If
    }
}

/// Unconditional `loop ... end loop`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    pub body: StmtListNode,
}

impl AstNode for LoopNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.body as &dyn AstNode]
    }

    fn label(&self) -> String {
        "loop".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Loop
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    pub cond: Expr,
    pub body: StmtListNode,
}

impl AstNode for WhileNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.cond as &dyn AstNode, &self.body as &dyn AstNode]
    }

    fn label(&self) -> String {
        "while".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::While
    }
}

/// Init or increment clause of a `for` header.
#[derive(Debug, Clone, PartialEq)]
pub enum ForClause {
    Assign(AssignNode),
    Expr(Expr),
}

impl ForClause {
    fn node(&self) -> &dyn AstNode {
        match self {
            ForClause::Assign(n) => n,
            ForClause::Expr(n) => n,
        }
    }
}

impl AstNode for ForClause {
    fn children(&self) -> Vec<&dyn AstNode> {
        self.node().children()
    }

    fn label(&self) -> String {
        self.node().label()
    }

    fn kind(&self) -> NodeKind {
        self.node().kind()
    }
}

/// `for <init>, <cond>, <incr> loop ... end loop`
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub init: ForClause,
    pub cond: Expr,
    pub incr: ForClause,
    pub body: StmtListNode,
}

impl AstNode for ForNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![
            &self.init as &dyn AstNode,
            &self.cond as &dyn AstNode,
            &self.incr as &dyn AstNode,
            &self.body as &dyn AstNode,
        ]
    }

    fn label(&self) -> String {
        "for".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::For
    }
}

/// Nested lexical block: `begin ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeNode {
    pub body: StmtListNode,
}

impl AstNode for ScopeNode {
    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.body as &dyn AstNode]
    }

    fn label(&self) -> String {
        "scope".to_string()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Scope
    }
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Input(InputNode),
    Output(OutputNode),
    Assign(AssignNode),
    Declare(DeclareNode),
    If(IfNode),
    Loop(LoopNode),
    While(WhileNode),
    For(ForNode),
    Scope(ScopeNode),
}

impl Stmt {
    fn node(&self) -> &dyn AstNode {
        match self {
            Stmt::Input(n) => n,
            Stmt::Output(n) => n,
            Stmt::Assign(n) => n,
            Stmt::Declare(n) => n,
            Stmt::If(n) => n,
            Stmt::Loop(n) => n,
            Stmt::While(n) => n,
            Stmt::For(n) => n,
            Stmt::Scope(n) => n,
        }
    }
}

impl AstNode for Stmt {
    fn children(&self) -> Vec<&dyn AstNode> {
        self.node().children()
    }

    fn label(&self) -> String {
        self.node().label()
    }

    fn kind(&self) -> NodeKind {
        self.node().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assign() -> AssignNode {
        // c = a + 1
        AssignNode::new(
            "c",
            Expr::binop(BinOp::Add, Expr::ident("a"), Expr::num(1.0)),
        )
    }

    #[test]
    fn test_leaf_labels() {
        assert_eq!(NumNode { value: 1.0 }.label(), "1.0");
        assert_eq!(NumNode { value: 2.5 }.label(), "2.5");
        assert_eq!(IdentNode::new("abc").label(), "abc");
        assert_eq!(
            VartypeNode {
                vartype: Vartype::Real
            }
            .label(),
            "real"
        );
        assert!(NumNode { value: 3.0 }.children().is_empty());
    }

    #[test]
    fn test_tree_single_level() {
        assert_eq!(sample_assign().tree(), vec!["=", "├─c", "└─+", "  ├─a", "  └─1.0"]);
    }

    #[test]
    fn test_tree_continuation_connector() {
        let list = StmtListNode::new(vec![
            Stmt::Assign(sample_assign()),
            Stmt::Input(InputNode {
                var: IdentNode::new("x"),
            }),
        ]);

        assert_eq!(
            list.tree(),
            vec![
                "...",
                "├─=",
                "│ ├─c",
                "│ └─+",
                "│   ├─a",
                "│   └─1.0",
                "└─input",
                "  └─x",
            ]
        );
    }

    #[test]
    fn test_if_children_order() {
        let node = IfNode {
            cond: Expr::ident("a"),
            then_branch: StmtListNode::default(),
            elif_branches: vec![ElifBranch {
                cond: Expr::ident("c"),
                body: StmtListNode::default(),
            }],
            else_branch: Some(StmtListNode::default()),
        };

        let kinds: Vec<_> = node.children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Ident,
                NodeKind::StmtList,
                NodeKind::Ident,
                NodeKind::StmtList,
                NodeKind::StmtList,
            ]
        );
    }

    #[test]
    fn test_visit_is_preorder() {
        let mut labels = Vec::new();
        sample_assign().visit(&mut |node| labels.push(node.label()));
        assert_eq!(labels, vec!["=", "c", "+", "a", "1.0"]);
    }

    #[test]
    fn test_census_counts_every_node() {
        let node = sample_assign();
        let census = NodeCensus::of(&node);

        assert_eq!(census.total(), 5);
        assert_eq!(census.count(NodeKind::Ident), 2);
        assert_eq!(census.count(NodeKind::Num), 1);
        assert_eq!(census.count(NodeKind::If), 0);
        assert_eq!(census.total(), node.tree().len());
    }
}
