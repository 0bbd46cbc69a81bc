use crate::frontend::cst::{Builtin, DefParam, Integer, Syntax, SyntaxNode, Term};
use crate::frontend::token::Token;

/// `iniciar-programa defOrProto* programDef finalizar-programa`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub begin: Token,
    pub defs: Vec<DefOrProto>,
    pub main: ProgramDef,
    /// The entry point's final `LINE` points here.
    pub end: Token,
}

/// `inicia-ejecución statement* termina-ejecución`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDef {
    pub begin: Token,
    pub statements: Vec<Statement>,
    pub end: Token,
}

/// `inicio statement* fin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub begin: Token,
    pub statements: Vec<Statement>,
    pub end: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefOrProto {
    Def(Def),
    Proto(Proto),
}

/// `define-prototipo-instrucción name defParam? ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proto {
    pub keyword: Token,
    pub name: Token,
    pub param: Option<DefParam>,
    pub semicolon: Token,
}

/// `define-nueva-instrucción name defParam? como statement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Def {
    pub keyword: Token,
    pub name: Token,
    pub param: Option<DefParam>,
    pub as_token: Token,
    pub body: Statement,
}

impl Def {
    pub fn param_name(&self) -> Option<&Token> {
        self.param.as_ref().and_then(|p| p.name.as_ref())
    }
}

impl Proto {
    /// Parentheses alone declare the parameter, named or not.
    pub fn has_param(&self) -> bool {
        self.param.is_some()
    }
}

/// `singleStatement? ;`
///
/// The terminator may have been synthesized during recovery
/// (`semicolon.inserted`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub single: Option<SingleStatement>,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleStatement {
    Builtin { builtin: Builtin, token: Token },
    Call(Call),
    Cond(Cond),
    Loop(Loop),
    Repeat(Repeat),
    Block(Block),
}

/// `name ( ( integer ) )?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: Token,
    pub argument: Option<(Token, Integer, Token)>,
}

/// `si term entonces singleStatement (si-no singleStatement)?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cond {
    pub if_token: Token,
    pub term: Term,
    pub then_token: Token,
    pub then: Box<SingleStatement>,
    pub otherwise: Option<(Token, Box<SingleStatement>)>,
}

/// `mientras term hacer singleStatement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub while_token: Token,
    pub term: Term,
    pub do_token: Token,
    pub body: Box<SingleStatement>,
}

/// `repetir integer veces singleStatement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub repeat_token: Token,
    pub count: Integer,
    pub times: Token,
    pub body: Box<SingleStatement>,
}

impl Syntax for Program {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("program")
            .token("BeginProgram", &self.begin)
            .nodes("defOrProto", &self.defs)
            .node("programDef", &self.main)
            .token("EndProgram", &self.end)
    }
}

impl Syntax for ProgramDef {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("programDef")
            .token("BeginExecution", &self.begin)
            .nodes("statement", &self.statements)
            .token("EndExecution", &self.end)
    }
}

impl Syntax for Block {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("block")
            .token("Begin", &self.begin)
            .nodes("statement", &self.statements)
            .token("End", &self.end)
    }
}

impl Syntax for DefOrProto {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("defOrProto");
        match self {
            DefOrProto::Def(d) => node.node("def", d),
            DefOrProto::Proto(p) => node.node("proto", p),
        }
    }
}

impl Syntax for Proto {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("proto")
            .token("Proto", &self.keyword)
            .token("Identifier", &self.name)
            .opt_node("defParam", self.param.as_ref())
            .token("Semicolon", &self.semicolon)
    }
}

impl Syntax for Def {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("def")
            .token("Define", &self.keyword)
            .token("Identifier", &self.name)
            .opt_node("defParam", self.param.as_ref())
            .token("As", &self.as_token)
            .node("statement", &self.body)
    }
}

impl Syntax for Statement {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("statement")
            .opt_node("singleStatement", self.single.as_ref())
            .token("Semicolon", &self.semicolon)
    }
}

impl Syntax for SingleStatement {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("singleStatement");
        match self {
            SingleStatement::Builtin { token, .. } => node.node(
                "statementFun",
                &SyntaxNode::new("statementFun").token("StatementFun", token),
            ),
            SingleStatement::Call(c) => node.node("call", c),
            SingleStatement::Cond(c) => node.node("cond", c),
            SingleStatement::Loop(l) => node.node("loop", l),
            SingleStatement::Repeat(r) => node.node("repeat", r),
            SingleStatement::Block(b) => node.node("block", b),
        }
    }
}

impl Syntax for Call {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("call").token("Identifier", &self.name);
        match &self.argument {
            Some((left, integer, right)) => node
                .token("LeftParen", left)
                .node("integer", integer)
                .token("RightParen", right),
            None => node,
        }
    }
}

impl Syntax for Cond {
    fn syntax(&self) -> SyntaxNode {
        let node = SyntaxNode::new("cond")
            .token("If", &self.if_token)
            .node("term", &self.term)
            .token("Then", &self.then_token)
            .node("singleStatement", &self.then);
        match &self.otherwise {
            Some((else_token, statement)) => node
                .token("Else", else_token)
                .node("singleStatement", statement),
            None => node,
        }
    }
}

impl Syntax for Loop {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("loop")
            .token("While", &self.while_token)
            .node("term", &self.term)
            .token("Do", &self.do_token)
            .node("singleStatement", &self.body)
    }
}

impl Syntax for Repeat {
    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new("repeat")
            .token("Repeat", &self.repeat_token)
            .node("integer", &self.count)
            .token("Times", &self.times)
            .node("singleStatement", &self.body)
    }
}
