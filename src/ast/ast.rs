use std::fmt::{self, Display};

/// Expression node kinds.
///
/// The set is closed: every stage (printing, code generation) matches
/// exhaustively over these variants. Each node owns its children and
/// carries the source line of its introducing token. Identifiers are
/// references by name only; resolution happens during code generation.
#[derive(Debug, Clone)]
pub enum Expr {
    Identifier {
        name: String,
        line: u32,
    },
    NumberLiteral {
        value: f64,
        line: u32,
    },
    BooleanLiteral {
        value: bool,
        line: u32,
    },
    StringLiteral {
        value: String,
        line: u32,
    },
    Prefix {
        operator: String,
        operand: Box<Expr>,
        line: u32,
    },
    Infix {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
        line: u32,
    },
    If {
        condition: Box<Expr>,
        consequence: BlockStmt,
        alternative: Option<BlockStmt>,
        line: u32,
    },
    Function {
        parameters: Vec<String>,
        body: BlockStmt,
        line: u32,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        line: u32,
    },
    Array {
        elements: Vec<Expr>,
        line: u32,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
        line: u32,
    },
}

impl Expr {
    /// The source line of the node's introducing token.
    pub fn line(&self) -> u32 {
        match self {
            Expr::Identifier { line, .. }
            | Expr::NumberLiteral { line, .. }
            | Expr::BooleanLiteral { line, .. }
            | Expr::StringLiteral { line, .. }
            | Expr::Prefix { line, .. }
            | Expr::Infix { line, .. }
            | Expr::If { line, .. }
            | Expr::Function { line, .. }
            | Expr::Call { line, .. }
            | Expr::Array { line, .. }
            | Expr::Index { line, .. } => *line,
        }
    }
}

// Equality is structural only: two trees that render to the same source
// are equal regardless of the lines they were parsed from.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Identifier { name: a, .. }, Expr::Identifier { name: b, .. }) => a == b,
            (Expr::NumberLiteral { value: a, .. }, Expr::NumberLiteral { value: b, .. }) => a == b,
            (Expr::BooleanLiteral { value: a, .. }, Expr::BooleanLiteral { value: b, .. }) => {
                a == b
            }
            (Expr::StringLiteral { value: a, .. }, Expr::StringLiteral { value: b, .. }) => a == b,
            (
                Expr::Prefix {
                    operator: op_a,
                    operand: rhs_a,
                    ..
                },
                Expr::Prefix {
                    operator: op_b,
                    operand: rhs_b,
                    ..
                },
            ) => op_a == op_b && rhs_a == rhs_b,
            (
                Expr::Infix {
                    operator: op_a,
                    left: l_a,
                    right: r_a,
                    ..
                },
                Expr::Infix {
                    operator: op_b,
                    left: l_b,
                    right: r_b,
                    ..
                },
            ) => op_a == op_b && l_a == l_b && r_a == r_b,
            (
                Expr::If {
                    condition: c_a,
                    consequence: q_a,
                    alternative: alt_a,
                    ..
                },
                Expr::If {
                    condition: c_b,
                    consequence: q_b,
                    alternative: alt_b,
                    ..
                },
            ) => c_a == c_b && q_a == q_b && alt_a == alt_b,
            (
                Expr::Function {
                    parameters: p_a,
                    body: b_a,
                    ..
                },
                Expr::Function {
                    parameters: p_b,
                    body: b_b,
                    ..
                },
            ) => p_a == p_b && b_a == b_b,
            (
                Expr::Call {
                    callee: f_a,
                    arguments: args_a,
                    ..
                },
                Expr::Call {
                    callee: f_b,
                    arguments: args_b,
                    ..
                },
            ) => f_a == f_b && args_a == args_b,
            (Expr::Array { elements: a, .. }, Expr::Array { elements: b, .. }) => a == b,
            (
                Expr::Index {
                    left: l_a,
                    index: i_a,
                    ..
                },
                Expr::Index {
                    left: l_b,
                    index: i_b,
                    ..
                },
            ) => l_a == l_b && i_a == i_b,
            _ => false,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier { name, .. } => write!(f, "{}", name),
            Expr::NumberLiteral { value, .. } => write!(f, "{}", value),
            Expr::BooleanLiteral { value, .. } => write!(f, "{}", value),
            Expr::StringLiteral { value, .. } => write!(f, "\"{}\"", value),
            Expr::Prefix {
                operator, operand, ..
            } => write!(f, "({}{})", operator, operand),
            Expr::Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expr::Function {
                parameters, body, ..
            } => write!(f, "fnc({}) {}", parameters.join(", "), body),
            Expr::Call {
                callee, arguments, ..
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<String>>();
                write!(f, "{}({})", callee, arguments.join(", "))
            }
            Expr::Array { elements, .. } => {
                let elements = elements
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>();
                write!(f, "[{}]", elements.join(", "))
            }
            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

/// Statement node kinds.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        name: String,
        value: Option<Expr>,
        line: u32,
    },
    Return {
        value: Option<Expr>,
        line: u32,
    },
    Expression {
        expression: Expr,
        line: u32,
    },
    Block(BlockStmt),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::VarDecl { line, .. } | Stmt::Return { line, .. } | Stmt::Expression { line, .. } => {
                *line
            }
            Stmt::Block(block) => block.line,
        }
    }
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Stmt::VarDecl {
                    name: n_a,
                    value: v_a,
                    ..
                },
                Stmt::VarDecl {
                    name: n_b,
                    value: v_b,
                    ..
                },
            ) => n_a == n_b && v_a == v_b,
            (Stmt::Return { value: a, .. }, Stmt::Return { value: b, .. }) => a == b,
            (Stmt::Expression { expression: a, .. }, Stmt::Expression { expression: b, .. }) => {
                a == b
            }
            (Stmt::Block(a), Stmt::Block(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::VarDecl { name, value, .. } => match value {
                Some(value) => write!(f, "decl {} -> {};", name, value),
                None => write!(f, "decl {};", name),
            },
            Stmt::Return { value, .. } => match value {
                Some(value) => write!(f, "return {};", value),
                None => write!(f, "return;"),
            },
            Stmt::Expression { expression, .. } => write!(f, "{};", expression),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}

/// An ordered sequence of statements delimited by braces. Introduces a
/// lexical scope during code generation.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
    pub line: u32,
}

impl PartialEq for BlockStmt {
    fn eq(&self, other: &Self) -> bool {
        self.statements == other.statements
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }

        let statements = self
            .statements
            .iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();
        write!(f, "{{ {} }}", statements.join(" "))
    }
}

/// The compilation unit root: an ordered sequence of top-level
/// statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let statements = self
            .statements
            .iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();
        write!(f, "{}", statements.join("\n"))
    }
}
