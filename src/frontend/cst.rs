//! Concrete syntax shared by both dialects.
//!
//! Every node keeps all of its tokens, so the source can be reconstructed
//! from a tree plus its comment list. Dialect-specific statement nodes live
//! in `frontend::java` and `frontend::pascal`; boolean and integer
//! expressions have the same shape in both and live here.

use crate::frontend::token::{Predicate, Token, TokenKind};

// =============================================================================
// Generic view
// =============================================================================

/// A child of a `SyntaxNode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxChild {
    Token(Token),
    Node(SyntaxNode),
}

/// Rule name plus ordered, role-tagged children.
///
/// This is the uniform shape handed to source formatters: it erases the
/// typed node structs but keeps every token in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub rule: &'static str,
    pub children: Vec<(&'static str, SyntaxChild)>,
}

impl SyntaxNode {
    pub fn new(rule: &'static str) -> Self {
        SyntaxNode {
            rule,
            children: Vec::new(),
        }
    }

    pub fn token(mut self, role: &'static str, token: &Token) -> Self {
        self.children.push((role, SyntaxChild::Token(token.clone())));
        self
    }

    pub fn opt_token(self, role: &'static str, token: Option<&Token>) -> Self {
        match token {
            Some(t) => self.token(role, t),
            None => self,
        }
    }

    pub fn node(mut self, role: &'static str, node: &impl Syntax) -> Self {
        self.children.push((role, SyntaxChild::Node(node.syntax())));
        self
    }

    pub fn opt_node(self, role: &'static str, node: Option<&impl Syntax>) -> Self {
        match node {
            Some(n) => self.node(role, n),
            None => self,
        }
    }

    pub fn nodes<'a, T: Syntax + 'a>(
        self,
        role: &'static str,
        nodes: impl IntoIterator<Item = &'a T>,
    ) -> Self {
        nodes.into_iter().fold(self, |acc, n| acc.node(role, n))
    }

    /// All tokens under this node, depth first, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for (_, child) in &self.children {
            match child {
                SyntaxChild::Token(t) => out.push(t),
                SyntaxChild::Node(n) => n.collect_tokens(out),
            }
        }
    }

    /// Last token that came from the source text.
    pub fn last_real_token(&self) -> Option<&Token> {
        self.tokens().into_iter().rev().find(|t| !t.inserted)
    }

    /// Rule names and token images, without positions.
    ///
    /// Two trees with the same shape describe the same program even when
    /// they were parsed from differently laid out source.
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    /// Indented tree, one rule or token per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        out.push_str(&format!("{}{}\n", "  ".repeat(depth), self.rule));
        for (role, child) in &self.children {
            match child {
                SyntaxChild::Token(t) => out.push_str(&format!(
                    "{}{} {:?} @{}:{}{}\n",
                    "  ".repeat(depth + 1),
                    role,
                    t.image,
                    t.line,
                    t.column,
                    if t.inserted { " (inserted)" } else { "" }
                )),
                SyntaxChild::Node(n) => n.write_tree(out, depth + 1),
            }
        }
    }

    fn write_shape(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.rule);
        for (role, child) in &self.children {
            out.push(' ');
            out.push_str(role);
            out.push('=');
            match child {
                SyntaxChild::Token(t) if t.inserted => out.push_str("<inserted>"),
                SyntaxChild::Token(t) => out.push_str(&t.image),
                SyntaxChild::Node(n) => n.write_shape(out),
            }
        }
        out.push(')');
    }
}

/// Conversion of a typed node into the generic view.
pub trait Syntax {
    fn syntax(&self) -> SyntaxNode;
}

impl<T: Syntax> Syntax for Box<T> {
    fn syntax(&self) -> SyntaxNode {
        (**self).syntax()
    }
}

// =============================================================================
// Shared nodes
// =============================================================================

/// A primitive robot statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Move,
    TurnLeft,
    PickBeeper,
    PutBeeper,
    TurnOff,
    Return,
}

impl Builtin {
    /// Keyword kinds, in grammar order.
    pub const KINDS: [TokenKind; 6] = [
        TokenKind::Move,
        TokenKind::TurnLeft,
        TokenKind::PickBeeper,
        TokenKind::PutBeeper,
        TokenKind::TurnOff,
        TokenKind::Return,
    ];

    pub fn from_kind(kind: TokenKind) -> Option<Builtin> {
        match kind {
            TokenKind::Move => Some(Builtin::Move),
            TokenKind::TurnLeft => Some(Builtin::TurnLeft),
            TokenKind::PickBeeper => Some(Builtin::PickBeeper),
            TokenKind::PutBeeper => Some(Builtin::PutBeeper),
            TokenKind::TurnOff => Some(Builtin::TurnOff),
            TokenKind::Return => Some(Builtin::Return),
            _ => None,
        }
    }
}

/// `( name? )` after a function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefParam {
    pub left: Token,
    pub name: Option<Token>,
    pub right: Token,
}

impl Syntax for DefParam {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("defParam")
            .token("LeftParen", &self.left)
            .opt_token("Identifier", self.name.as_ref())
            .token("RightParen", &self.right)
    }
}

/// `andTerm (OR andTerm)*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub first: AndTerm,
    pub rest: Vec<(Token, AndTerm)>,
}

/// `notTerm (AND notTerm)*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndTerm {
    pub first: NotTerm,
    pub rest: Vec<(Token, NotTerm)>,
}

/// `NOT? clause`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotTerm {
    pub not: Option<Token>,
    pub clause: Clause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    IsZero(IsZeroClause),
    BoolFun(BoolFunClause),
    Paren {
        left: Token,
        term: Box<Term>,
        right: Token,
    },
}

/// `iszero ( integer )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsZeroClause {
    pub keyword: Token,
    pub left: Token,
    pub integer: Integer,
    pub right: Token,
}

/// A predicate keyword; the Java dialect allows an empty `()` after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolFunClause {
    pub predicate: Predicate,
    pub token: Token,
    pub parens: Option<(Token, Token)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integer {
    /// A parameter reference.
    Variable(Token),
    Literal {
        token: Token,
        value: i64,
    },
    /// `succ ( integer )` or `pred ( integer )`.
    Step {
        op: Token,
        increment: bool,
        left: Token,
        inner: Box<Integer>,
        right: Token,
    },
}

impl Syntax for Term {
    fn syntax(&self) -> SyntaxNode {
        let mut node = SyntaxNode::new("term").node("andTerm", &self.first);
        for (or, and_term) in &self.rest {
            node = node.token("Or", or).node("andTerm", and_term);
        }
        node
    }
}

impl Syntax for AndTerm {
    fn syntax(&self) -> SyntaxNode {
        let mut node = SyntaxNode::new("andTerm").node("notTerm", &self.first);
        for (and, not_term) in &self.rest {
            node = node.token("And", and).node("notTerm", not_term);
        }
        node
    }
}

impl Syntax for NotTerm {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("notTerm")
            .opt_token("Not", self.not.as_ref())
            .node("clause", &self.clause)
    }
}

impl Syntax for Clause {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("clause");
        match self {
            Clause::IsZero(c) => node.node("isZeroClause", c),
            Clause::BoolFun(c) => node.node("boolFunClause", c),
            Clause::Paren { left, term, right } => node
                .token("LeftParen", left)
                .node("term", term)
                .token("RightParen", right),
        }
    }
}

impl Syntax for IsZeroClause {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("isZeroClause")
            .token("IsZero", &self.keyword)
            .token("LeftParen", &self.left)
            .node("integer", &self.integer)
            .token("RightParen", &self.right)
    }
}

impl Syntax for BoolFunClause {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("boolFunClause")
            .node("boolFun", &SyntaxNode::new("boolFun").token("BoolFun", &self.token));
        match &self.parens {
            Some((left, right)) => node.token("LeftParen", left).token("RightParen", right),
            None => node,
        }
    }
}

impl Syntax for SyntaxNode {
    fn syntax(&self) -> SyntaxNode {
        self.clone()
    }
}

impl Syntax for Integer {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("integer");
        match self {
            Integer::Variable(t) => node.token("Identifier", t),
            Integer::Literal { token, .. } => node.token("IntegerLiteral", token),
            Integer::Step {
                op,
                increment,
                left,
                inner,
                right,
            } => {
                let role = if *increment { "Succ" } else { "Pred" };
                node.node("succPred", &SyntaxNode::new("succPred").token(role, op))
                    .token("LeftParen", left)
                    .node("integer", inner)
                    .token("RightParen", right)
            }
        }
    }
}
