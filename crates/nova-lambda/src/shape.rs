//! Syntax-independent view of a lambda expression.
//!
//! The parser/HIR layer lowers a lambda into a [`LambdaShape`]: the parameter list, a coarse
//! statement tree for block bodies and opaque [`ExprId`]s for expressions. Expression types are
//! provided separately through [`crate::ExprTypes`]. Nested lambdas and class bodies are opaque
//! expressions, so their `return` statements never show up here.

use nova_types::Type;

/// Identifier of an expression inside the owning body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expr {
    pub id: ExprId,
    /// Whether the expression may stand alone as a statement (calls, assignments, `x++`,
    /// instance creation).
    pub statement_shaped: bool,
}

impl Expr {
    pub fn statement(raw: u32) -> Self {
        Self {
            id: ExprId::from_raw(raw),
            statement_shaped: true,
        }
    }

    pub fn value(raw: u32) -> Self {
        Self {
            id: ExprId::from_raw(raw),
            statement_shaped: false,
        }
    }
}

/// Statement tree of a block body, reduced to what return collection and completion analysis
/// need (JLS 14.22).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Return(Option<Expr>),
    Expr(Expr),
    Throw,
    /// `break;` or `break label;`
    Break(Option<String>),
    /// `continue;` or `continue label;`
    Continue(Option<String>),
    If {
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    Block(Vec<Stmt>),
    /// `synchronized (lock) { .. }`
    Synchronized(Vec<Stmt>),
    /// `unconditional` is set when the condition is the constant `true` (`while (true)`,
    /// `for (;;)`, `do { .. } while (true)`). Enhanced `for` is a [`LoopKind::While`] that is
    /// never unconditional.
    Loop {
        kind: LoopKind,
        body: Vec<Stmt>,
        unconditional: bool,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    /// Switch statement. For `case ..:` groups each arm is the statements of one group (control
    /// falls through into the next); for `case .. ->` rules each arm is one rule body.
    /// `exhaustive` is set when there is a `default` label or the selector is covered
    /// exhaustively.
    Switch {
        arms: Vec<Vec<Stmt>>,
        arrows: bool,
        exhaustive: bool,
    },
    Try {
        body: Vec<Stmt>,
        catches: Vec<Vec<Stmt>>,
        finally: Option<Vec<Stmt>>,
    },
    /// Declarations, empty statements and anything else without control-flow impact.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopKind {
    /// `while`, basic `for` and enhanced `for`: the condition is tested before the body.
    While,
    /// `do { .. } while (cond);`
    DoWhile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LambdaBody {
    Block(Vec<Stmt>),
    Expression(Expr),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaParam {
    pub name: String,
    /// Declared type for explicit parameters; the type bound by the argument context for
    /// implicit ones ([`Type::Unknown`] when nothing is bound yet).
    pub ty: Type,
}

impl LambdaParam {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Parameter list. Java forbids mixing explicit and implicit parameters, so the two forms are
/// separate variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LambdaParams {
    Explicit(Vec<LambdaParam>),
    Implicit(Vec<LambdaParam>),
}

impl LambdaParams {
    pub fn as_slice(&self) -> &[LambdaParam] {
        match self {
            LambdaParams::Explicit(params) | LambdaParams::Implicit(params) => params,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, LambdaParams::Explicit(_))
    }
}

/// Syntactic context of a lambda, for editor assists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LambdaParent {
    /// `foo(x -> x)`
    ArgumentList,
    /// Nested in another expression (`cond ? x -> x : y -> y`, casts, parentheses).
    Expression,
    /// Variable initializer, assignment right-hand side, `return` value.
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaShape {
    pub params: LambdaParams,
    pub body: LambdaBody,
    pub void_compatible: bool,
}

impl LambdaShape {
    pub fn new(params: LambdaParams, body: LambdaBody, void_compatible: bool) -> Self {
        Self {
            params,
            body,
            void_compatible,
        }
    }

    /// Expression lambda; void-compatible iff the expression is statement-shaped.
    pub fn expression(params: LambdaParams, expr: Expr) -> Self {
        Self::new(params, LambdaBody::Expression(expr), expr.statement_shaped)
    }

    /// Block lambda; void-compatible iff every `return` in the block carries no value
    /// (JLS 15.27.2).
    pub fn block(params: LambdaParams, stmts: Vec<Stmt>) -> Self {
        let mut returns = Vec::new();
        collect_returns(&stmts, &mut returns);
        let void_compatible = returns.iter().all(|ret| ret.is_none());
        Self::new(params, LambdaBody::Block(stmts), void_compatible)
    }

    pub fn params(&self) -> &[LambdaParam] {
        self.params.as_slice()
    }

    pub fn has_explicit_types(&self) -> bool {
        self.params.is_explicit()
    }

    /// Every value produced by the body: the body itself for expression lambdas, the values of
    /// `return` statements (in source order) for block lambdas.
    pub fn return_expressions(&self) -> Vec<Expr> {
        match &self.body {
            LambdaBody::Expression(expr) => vec![*expr],
            LambdaBody::Block(stmts) => {
                let mut returns = Vec::new();
                collect_returns(stmts, &mut returns);
                returns.into_iter().flatten().collect()
            }
        }
    }

    /// Number of `return` statements, with or without a value. Zero for expression lambdas.
    pub fn return_statement_count(&self) -> usize {
        match &self.body {
            LambdaBody::Expression(_) => 0,
            LambdaBody::Block(stmts) => {
                let mut returns = Vec::new();
                collect_returns(stmts, &mut returns);
                returns.len()
            }
        }
    }

    /// Whether control can fall off the end of a block body (JLS 14.22). Loop conditions are
    /// constant only when flagged `unconditional`; reachability of the jumps themselves is not
    /// tracked.
    ///
    /// Expression bodies always produce their value and report `false`.
    pub fn can_complete_normally(&self) -> bool {
        match &self.body {
            LambdaBody::Expression(_) => false,
            LambdaBody::Block(stmts) => list_completes_normally(stmts),
        }
    }

    /// Whether an editor should insert `;` after the lambda when completing it.
    ///
    /// Block bodies always take one. Expression bodies do not when the lambda is an argument or
    /// part of a larger expression, where the enclosing construct decides.
    pub fn needs_semicolon_after(&self, parent: LambdaParent) -> bool {
        match self.body {
            LambdaBody::Block(_) => true,
            LambdaBody::Expression(_) => {
                !matches!(parent, LambdaParent::ArgumentList | LambdaParent::Expression)
            }
        }
    }
}

fn collect_returns(stmts: &[Stmt], out: &mut Vec<Option<Expr>>) {
    for stmt in stmts {
        match stmt {
            Stmt::Return(value) => out.push(*value),
            Stmt::If {
                then_branch,
                else_branch,
            } => {
                collect_returns(then_branch, out);
                if let Some(else_branch) = else_branch {
                    collect_returns(else_branch, out);
                }
            }
            Stmt::Block(body) | Stmt::Synchronized(body) | Stmt::Loop { body, .. } => {
                collect_returns(body, out)
            }
            Stmt::Labeled { body, .. } => collect_returns(std::slice::from_ref(body.as_ref()), out),
            Stmt::Switch { arms, .. } => {
                for arm in arms {
                    collect_returns(arm, out);
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                collect_returns(body, out);
                for catch in catches {
                    collect_returns(catch, out);
                }
                if let Some(finally) = finally {
                    collect_returns(finally, out);
                }
            }
            Stmt::Expr(_) | Stmt::Throw | Stmt::Break(_) | Stmt::Continue(_) | Stmt::Other => {}
        }
    }
}

fn list_completes_normally(stmts: &[Stmt]) -> bool {
    stmts.iter().all(|stmt| stmt_completes_normally(stmt, None))
}

/// `label` is the label of an enclosing [`Stmt::Labeled`] that directly wraps `stmt`.
fn stmt_completes_normally(stmt: &Stmt, label: Option<&str>) -> bool {
    match stmt {
        Stmt::Return(_) | Stmt::Throw | Stmt::Break(_) | Stmt::Continue(_) => false,
        Stmt::Expr(_) | Stmt::Other => true,
        Stmt::If {
            then_branch,
            else_branch,
        } => match else_branch {
            None => true,
            Some(else_branch) => {
                list_completes_normally(then_branch) || list_completes_normally(else_branch)
            }
        },
        Stmt::Block(body) | Stmt::Synchronized(body) => list_completes_normally(body),
        Stmt::Labeled { label, body } => {
            stmt_completes_normally(body, Some(label.as_str()))
                || jumps_to(
                    std::slice::from_ref(body.as_ref()),
                    Jump::Break,
                    Some(label.as_str()),
                    false,
                )
        }
        Stmt::Loop {
            kind,
            body,
            unconditional,
        } => {
            let exited = jumps_to(body, Jump::Break, label, true);
            match kind {
                LoopKind::While => !unconditional || exited,
                LoopKind::DoWhile => {
                    let reaches_condition =
                        list_completes_normally(body) || jumps_to(body, Jump::Continue, label, true);
                    (reaches_condition && !unconditional) || exited
                }
            }
        }
        Stmt::Switch {
            arms,
            arrows,
            exhaustive,
        } => {
            let falls_out = if *arrows {
                arms.iter().any(|arm| list_completes_normally(arm))
            } else {
                arms.last().map_or(true, |arm| list_completes_normally(arm))
            };
            !exhaustive
                || falls_out
                || arms.iter().any(|arm| jumps_to(arm, Jump::Break, label, true))
        }
        Stmt::Try {
            body,
            catches,
            finally,
        } => {
            (list_completes_normally(body) || catches.iter().any(|c| list_completes_normally(c)))
                && finally.as_deref().map_or(true, list_completes_normally)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Jump {
    Break,
    Continue,
}

/// Does `stmts` contain a `break`/`continue` that leaves the statement being analyzed?
///
/// Labeled jumps match `label`. Unlabeled ones count while `unlabeled` holds, i.e. until an
/// inner loop (or, for `break`, an inner switch) captures them. Jumps out of a `try` whose
/// `finally` cannot complete normally never arrive.
fn jumps_to(stmts: &[Stmt], jump: Jump, label: Option<&str>, unlabeled: bool) -> bool {
    let matches = |target: &Option<String>| match target {
        None => unlabeled,
        Some(target) => label == Some(target.as_str()),
    };
    stmts.iter().any(|stmt| match stmt {
        Stmt::Break(target) => jump == Jump::Break && matches(target),
        Stmt::Continue(target) => jump == Jump::Continue && matches(target),
        Stmt::If {
            then_branch,
            else_branch,
        } => {
            jumps_to(then_branch, jump, label, unlabeled)
                || else_branch
                    .as_deref()
                    .is_some_and(|stmts| jumps_to(stmts, jump, label, unlabeled))
        }
        Stmt::Block(body) | Stmt::Synchronized(body) => jumps_to(body, jump, label, unlabeled),
        Stmt::Labeled { body, .. } => {
            jumps_to(std::slice::from_ref(body.as_ref()), jump, label, unlabeled)
        }
        Stmt::Loop { body, .. } => jumps_to(body, jump, label, false),
        Stmt::Switch { arms, .. } => {
            let unlabeled = unlabeled && jump == Jump::Continue;
            arms.iter().any(|arm| jumps_to(arm, jump, label, unlabeled))
        }
        Stmt::Try {
            body,
            catches,
            finally,
        } => {
            let in_finally = finally
                .as_deref()
                .is_some_and(|stmts| jumps_to(stmts, jump, label, unlabeled));
            let finally_completes = finally.as_deref().map_or(true, list_completes_normally);
            in_finally
                || (finally_completes
                    && (jumps_to(body, jump, label, unlabeled)
                        || catches
                            .iter()
                            .any(|catch| jumps_to(catch, jump, label, unlabeled))))
        }
        Stmt::Return(_) | Stmt::Expr(_) | Stmt::Throw | Stmt::Other => false,
    })
}
