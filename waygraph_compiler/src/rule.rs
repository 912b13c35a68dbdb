//! Access rule expressions.
//!
//! Rule text such as `"Sword and (Key or any:Lockpick|Bomb)"` is parsed into an
//! [`Expr`] tree once, and everything downstream (evaluation, code generation)
//! works from the tree. Operators combine strictly left to right; the source
//! grammar has no precedence of its own, so `"A or B and C"` means
//! `(A or B) and C`. When rendering for the host, every nested compound is
//! parenthesized so the host's own precedence cannot regroup it.

use std::fmt;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser as PestParser;

use crate::emit::python::string_literal;

#[derive(PestParser)]
#[grammar = "src/rule.pest"]
struct RuleParser;

/// Reasons a rule string cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule is empty")]
    Empty,
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("empty token")]
    EmptyToken,
    #[error("dangling operator in '{0}'")]
    DanglingOperator(String),
    #[error("'{0}' needs at least one non-empty name")]
    EmptyPayload(&'static str),
    #[error("unexpected grammar shape: {0}")]
    Shape(&'static str),
}

/// Host capability that answers questions about a player's progress.
///
/// Compiled predicates only ever read through this trait; they never mutate
/// the state they are given.
pub trait StateQuery {
    /// The player holds `item`.
    fn has(&self, item: &str) -> bool;

    /// The player holds at least one of `items`.
    fn has_any(&self, items: &[String]) -> bool {
        items.iter().any(|item| self.has(item))
    }

    /// The player holds something from the named item group.
    fn has_group(&self, group: &str) -> bool;
}

/// A single capability test.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// `Name`
    Has(String),
    /// `any:A|B|C`
    HasAny(Vec<String>),
    /// `group:Name`
    HasGroup(String),
}

const ANY_PREFIX: &str = "any:";
const GROUP_PREFIX: &str = "group:";

impl Atom {
    fn parse(raw: &str) -> Result<Atom, RuleError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(RuleError::EmptyToken);
        }
        if is_dangling(text) {
            return Err(RuleError::DanglingOperator(text.to_string()));
        }
        if let Some(rest) = text.strip_prefix(ANY_PREFIX) {
            let items: Vec<String> = rest.split('|').map(|s| s.trim().to_string()).collect();
            if items.iter().any(String::is_empty) {
                return Err(RuleError::EmptyPayload(ANY_PREFIX));
            }
            return Ok(Atom::HasAny(items));
        }
        if let Some(rest) = text.strip_prefix(GROUP_PREFIX) {
            let group = rest.trim();
            if group.is_empty() {
                return Err(RuleError::EmptyPayload(GROUP_PREFIX));
            }
            return Ok(Atom::HasGroup(group.to_string()));
        }
        Ok(Atom::Has(text.to_string()))
    }

    pub fn evaluate(&self, state: &dyn StateQuery) -> bool {
        match self {
            Atom::Has(item) => state.has(item),
            Atom::HasAny(items) => state.has_any(items),
            Atom::HasGroup(group) => state.has_group(group),
        }
    }

    /// Python call against the host `state` object.
    pub fn render(&self) -> String {
        match self {
            Atom::Has(item) => format!("state.has({}, player)", string_literal(item)),
            Atom::HasAny(items) => {
                let list: Vec<String> = items.iter().map(|s| string_literal(s)).collect();
                format!("state.has_any([{}], player)", list.join(", "))
            },
            Atom::HasGroup(group) => format!("state.has_group({}, player)", string_literal(group)),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Has(item) => f.write_str(item),
            Atom::HasAny(items) => write!(f, "{ANY_PREFIX}{}", items.join("|")),
            Atom::HasGroup(group) => write!(f, "{GROUP_PREFIX}{group}"),
        }
    }
}

// A token that swallowed an operator because its neighbour was missing,
// e.g. "Sword and" or "or Wand".
fn is_dangling(text: &str) -> bool {
    text == "and"
        || text == "or"
        || text.starts_with("and ")
        || text.starts_with("or ")
        || text.ends_with(" and")
        || text.ends_with(" or")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

impl Op {
    pub fn keyword(self) -> &'static str {
        match self {
            Op::And => "and",
            Op::Or => "or",
        }
    }
}

/// Compiled boolean expression over capability atoms.
///
/// `And`/`Or` nodes always hold at least two operands and never hold a direct
/// child with the same operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Token(Atom),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Parse rule text into an expression tree.
    ///
    /// Tokens are opaque except that they cannot contain `(` or `)`, which
    /// always group, nor the separators `" and "` / `" or "`. A capability
    /// named `Arcane (Lv2)` is rejected with [`RuleError::Syntax`].
    ///
    /// ```
    /// use waygraph_compiler::rule::{Atom, Expr};
    ///
    /// let expr = Expr::parse("Sword or Wand").unwrap();
    /// assert_eq!(
    ///     expr,
    ///     Expr::Or(vec![
    ///         Expr::Token(Atom::Has("Sword".into())),
    ///         Expr::Token(Atom::Has("Wand".into())),
    ///     ])
    /// );
    /// ```
    pub fn parse(text: &str) -> Result<Expr, RuleError> {
        if text.trim().is_empty() {
            return Err(RuleError::Empty);
        }
        let mut pairs = RuleParser::parse(Rule::rule_text, text).map_err(|e| RuleError::Syntax(e.to_string()))?;
        let top = pairs.next().ok_or(RuleError::Shape("expected rule"))?;
        let expr = top
            .into_inner()
            .find(|p| p.as_rule() == Rule::expr)
            .ok_or(RuleError::Shape("expected expression"))?;
        build_expr(expr)
    }

    pub fn op(&self) -> Option<Op> {
        match self {
            Expr::Token(_) => None,
            Expr::And(_) => Some(Op::And),
            Expr::Or(_) => Some(Op::Or),
        }
    }

    fn operands(&self) -> &[Expr] {
        match self {
            Expr::Token(_) => std::slice::from_ref(self),
            Expr::And(kids) | Expr::Or(kids) => kids,
        }
    }

    /// Combine two expressions, flattening operands that already use `op`.
    pub fn join(op: Op, lhs: Expr, rhs: Expr) -> Expr {
        let mut kids = Vec::new();
        for side in [lhs, rhs] {
            match side {
                Expr::And(inner) if op == Op::And => kids.extend(inner),
                Expr::Or(inner) if op == Op::Or => kids.extend(inner),
                other => kids.push(other),
            }
        }
        match op {
            Op::And => Expr::And(kids),
            Op::Or => Expr::Or(kids),
        }
    }

    pub fn evaluate(&self, state: &dyn StateQuery) -> bool {
        match self {
            Expr::Token(atom) => atom.evaluate(state),
            Expr::And(kids) => kids.iter().all(|k| k.evaluate(state)),
            Expr::Or(kids) => kids.iter().any(|k| k.evaluate(state)),
        }
    }

    /// Atoms in source order.
    pub fn atoms(&self) -> Vec<&Atom> {
        match self {
            Expr::Token(atom) => vec![atom],
            Expr::And(kids) | Expr::Or(kids) => kids.iter().flat_map(Expr::atoms).collect(),
        }
    }

    /// Render as a Python expression starting at `column` of its line.
    ///
    /// A compound expression is wrapped in parentheses and broken before each
    /// top-level operator, continuation lines aligned one past the opening
    /// parenthesis. Nested compounds stay on one line, always parenthesized.
    pub fn render(&self, column: usize) -> String {
        let Some(op) = self.op() else {
            return self.render_inline();
        };
        let pad = " ".repeat(column + 1);
        let mut out = String::from("(");
        for (i, kid) in self.operands().iter().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&pad);
                out.push_str(op.keyword());
                out.push(' ');
            }
            out.push_str(&kid.render_inline());
        }
        out.push(')');
        out
    }

    fn render_inline(&self) -> String {
        match self {
            Expr::Token(atom) => atom.render(),
            Expr::And(kids) | Expr::Or(kids) => {
                let sep = self.op().map(|op| format!(" {} ", op.keyword())).unwrap_or_default();
                let parts: Vec<String> = kids.iter().map(Expr::render_inline).collect();
                format!("({})", parts.join(&sep))
            },
        }
    }
}

/// Source-syntax form; parsing it back yields an equal tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Token(atom) => write!(f, "{atom}"),
            Expr::And(kids) | Expr::Or(kids) => {
                let keyword = self.op().map(Op::keyword).unwrap_or_default();
                for (i, kid) in kids.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {keyword} ")?;
                    }
                    if kid.op().is_some() {
                        write!(f, "({kid})")?;
                    } else {
                        write!(f, "{kid}")?;
                    }
                }
                Ok(())
            },
        }
    }
}

fn build_expr(pair: Pair<Rule>) -> Result<Expr, RuleError> {
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or(RuleError::Shape("expression without operand"))?;
    let mut acc = build_term(first)?;
    while let Some(op) = inner.next() {
        let op = match op.as_rule() {
            Rule::and_op => Op::And,
            Rule::or_op => Op::Or,
            _ => return Err(RuleError::Shape("expected operator")),
        };
        let rhs = inner.next().ok_or(RuleError::Shape("operator without operand"))?;
        acc = Expr::join(op, acc, build_term(rhs)?);
    }
    Ok(acc)
}

fn build_term(pair: Pair<Rule>) -> Result<Expr, RuleError> {
    match pair.as_rule() {
        Rule::token => Ok(Expr::Token(Atom::parse(pair.as_str())?)),
        Rule::group => {
            let inner = pair.into_inner().next().ok_or(RuleError::Shape("empty group"))?;
            build_expr(inner)
        },
        _ => Err(RuleError::Shape("expected token or group")),
    }
}

/// Access condition of a location or exit. No rule means always true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate(Option<Expr>);

impl Predicate {
    pub fn always() -> Self {
        Predicate(None)
    }

    pub fn compile(rule: Option<&str>) -> Result<Self, RuleError> {
        rule.map(Expr::parse).transpose().map(Predicate)
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.0.as_ref()
    }

    pub fn is_always(&self) -> bool {
        self.0.is_none()
    }

    pub fn evaluate(&self, state: &dyn StateQuery) -> bool {
        self.0.as_ref().is_none_or(|e| e.evaluate(state))
    }

    pub fn render(&self, column: usize) -> String {
        match &self.0 {
            Some(expr) => expr.render(column),
            None => "True".to_string(),
        }
    }
}
