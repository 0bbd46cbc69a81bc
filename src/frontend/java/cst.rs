use crate::frontend::cst::{Builtin, DefParam, Integer, Syntax, SyntaxNode, Term};
use crate::frontend::token::Token;

/// `class program { def* programDef }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramClass {
    pub class: Token,
    pub program: Token,
    pub left: Token,
    pub defs: Vec<Def>,
    pub main: ProgramDef,
    /// Closing brace of the class; the entry point's final `LINE` points here.
    pub right: Token,
}

/// `program ( ) block`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDef {
    pub program: Token,
    pub left: Token,
    pub right: Token,
    pub block: Block,
}

/// `void name ( param? ) block`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Def {
    pub define: Token,
    pub name: Token,
    pub param: DefParam,
    pub block: Block,
}

/// `{ statement* }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub left: Token,
    pub statements: Vec<Statement>,
    pub right: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Single(SingleStatement),
    Cond(Cond),
    Loop(Loop),
    Repeat(Repeat),
    Block(Block),
}

/// `(builtin ( ) | call)? ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleStatement {
    pub action: Option<Action>,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Builtin {
        builtin: Builtin,
        token: Token,
        left: Token,
        right: Token,
    },
    Call(Call),
}

/// `name ( integer? )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: Token,
    pub left: Token,
    pub argument: Option<Integer>,
    pub right: Token,
}

/// `if ( term ) statement (else statement)?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cond {
    pub if_token: Token,
    pub left: Token,
    pub term: Term,
    pub right: Token,
    pub then: Box<Statement>,
    pub otherwise: Option<(Token, Box<Statement>)>,
}

/// `while ( term ) statement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub while_token: Token,
    pub left: Token,
    pub term: Term,
    pub right: Token,
    pub body: Box<Statement>,
}

/// `iterate ( integer ) statement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub iterate: Token,
    pub left: Token,
    pub count: Integer,
    pub right: Token,
    pub body: Box<Statement>,
}

impl Syntax for ProgramClass {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("programClass")
            .token("Class", &self.class)
            .token("Program", &self.program)
            .token("LeftBrace", &self.left)
            .nodes("def", &self.defs)
            .node("programDef", &self.main)
            .token("RightBrace", &self.right)
    }
}

impl Syntax for ProgramDef {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("programDef")
            .token("Program", &self.program)
            .token("LeftParen", &self.left)
            .token("RightParen", &self.right)
            .node("block", &self.block)
    }
}

impl Syntax for Def {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("def")
            .token("Define", &self.define)
            .token("Identifier", &self.name)
            .node("defParam", &self.param)
            .node("block", &self.block)
    }
}

impl Syntax for Block {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("block")
            .token("LeftBrace", &self.left)
            .nodes("statement", &self.statements)
            .token("RightBrace", &self.right)
    }
}

impl Syntax for Statement {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("statement");
        match self {
            Statement::Single(s) => node.node("singleStatement", s),
            Statement::Cond(c) => node.node("cond", c),
            Statement::Loop(l) => node.node("loop", l),
            Statement::Repeat(r) => node.node("repeat", r),
            Statement::Block(b) => node.node("block", b),
        }
    }
}

impl Syntax for SingleStatement {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("singleStatement");
        let node = match &self.action {
            Some(Action::Builtin {
                token, left, right, ..
            }) => node
                .node(
                    "statementFun",
                    &SyntaxNode::new("statementFun").token("StatementFun", token),
                )
                .token("LeftParen", left)
                .token("RightParen", right),
            Some(Action::Call(call)) => node.node("call", call),
            None => node,
        };
        node.token("Semicolon", &self.semicolon)
    }
}

impl Syntax for Call {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("call")
            .token("Identifier", &self.name)
            .token("LeftParen", &self.left)
            .opt_node("integer", self.argument.as_ref())
            .token("RightParen", &self.right)
    }
}

impl Syntax for Cond {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("cond")
            .token("If", &self.if_token)
            .token("LeftParen", &self.left)
            .node("term", &self.term)
            .token("RightParen", &self.right)
            .node("statement", &self.then);
        match &self.otherwise {
            Some((else_token, statement)) => {
                node.token("Else", else_token).node("statement", statement)
            }
            None => node,
        }
    }
}

impl Syntax for Loop {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("loop")
            .token("While", &self.while_token)
            .token("LeftParen", &self.left)
            .node("term", &self.term)
            .token("RightParen", &self.right)
            .node("statement", &self.body)
    }
}

impl Syntax for Repeat {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("repeat")
            .token("Iterate", &self.iterate)
            .token("LeftParen", &self.left)
            .node("integer", &self.count)
            .token("RightParen", &self.right)
            .node("statement", &self.body)
    }
}
