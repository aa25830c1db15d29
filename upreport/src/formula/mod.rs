//! Symbolic handling of parameter formulas.
//!
//! Formulas are parsed into a small expression tree and typeset as LaTeX for
//! the report. Anything the grammar does not understand falls back to the
//! literal text with markdown-sensitive characters escaped.

use crate::error::ReportError;
use crate::ReportResult;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

pub mod latex;

pub use latex::to_latex;

/// Deepest parenthesis nesting accepted before parsing is refused
const MAX_NESTING: usize = 64;

#[derive(Parser)]
#[grammar = "src/formula/formula.pest"]
pub struct FormulaParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// A parsed formula
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal kept as written
    Number(String),
    Symbol(String),
    Negate(Box<Expr>),
    Binary(Box<Expr>, Operator, Box<Expr>),
    Call(String, Vec<Expr>),
}

pub fn parse_formula(text: &str) -> ReportResult<Expr> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ReportError::Formula(format!(
                        "nesting deeper than {} levels",
                        MAX_NESTING
                    )));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    let mut pairs = FormulaParser::parse(Rule::formula, text)
        .map_err(|e| ReportError::Formula(format!("'{}': {}", text, e.variant.message())))?;

    let formula = pairs
        .next()
        .ok_or_else(|| ReportError::Formula(format!("no parse result for '{}'", text)))?;

    let expression = formula
        .into_inner()
        .find(|p| p.as_rule() == Rule::expression)
        .ok_or_else(|| ReportError::Formula(format!("empty formula '{}'", text)))?;

    parse_expression(expression)
}

fn parse_expression(pair: Pair<Rule>) -> ReportResult<Expr> {
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| ReportError::Formula("empty expression".to_string()))?;
    let mut left = parse_term(first)?;

    while let Some(op) = inner.next() {
        let operator = match op.as_str() {
            "+" => Operator::Add,
            _ => Operator::Subtract,
        };
        let right = inner
            .next()
            .ok_or_else(|| ReportError::Formula("missing right operand".to_string()))?;
        left = Expr::Binary(Box::new(left), operator, Box::new(parse_term(right)?));
    }

    Ok(left)
}

fn parse_term(pair: Pair<Rule>) -> ReportResult<Expr> {
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| ReportError::Formula("empty term".to_string()))?;
    let mut left = parse_unary(first)?;

    while let Some(op) = inner.next() {
        let operator = match op.as_str() {
            "*" => Operator::Multiply,
            _ => Operator::Divide,
        };
        let right = inner
            .next()
            .ok_or_else(|| ReportError::Formula("missing right operand".to_string()))?;
        left = Expr::Binary(Box::new(left), operator, Box::new(parse_unary(right)?));
    }

    Ok(left)
}

fn parse_unary(pair: Pair<Rule>) -> ReportResult<Expr> {
    let mut negations = 0;
    let mut operand = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negation => negations += 1,
            Rule::power => operand = Some(parse_power(inner)?),
            _ => {}
        }
    }

    let mut expr = operand.ok_or_else(|| ReportError::Formula("missing operand".to_string()))?;
    for _ in 0..negations {
        expr = Expr::Negate(Box::new(expr));
    }
    Ok(expr)
}

fn parse_power(pair: Pair<Rule>) -> ReportResult<Expr> {
    let mut inner = pair.into_inner();
    let base = inner
        .next()
        .ok_or_else(|| ReportError::Formula("missing base".to_string()))?;
    let base = parse_primary(base)?;

    // pow_op then the exponent
    match (inner.next(), inner.next()) {
        (Some(_), Some(exponent)) => Ok(Expr::Binary(
            Box::new(base),
            Operator::Power,
            Box::new(parse_unary(exponent)?),
        )),
        _ => Ok(base),
    }
}

fn parse_primary(pair: Pair<Rule>) -> ReportResult<Expr> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| ReportError::Formula("empty primary".to_string()))?;

    match inner.as_rule() {
        Rule::number => Ok(Expr::Number(inner.as_str().to_string())),
        Rule::identifier => Ok(Expr::Symbol(inner.as_str().to_string())),
        Rule::expression => parse_expression(inner),
        Rule::call => parse_call(inner),
        other => Err(ReportError::Formula(format!(
            "unexpected {:?} in primary",
            other
        ))),
    }
}

fn parse_call(pair: Pair<Rule>) -> ReportResult<Expr> {
    let mut name = String::new();
    let mut args = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => name = inner.as_str().to_string(),
            Rule::arguments => {
                for arg in inner.into_inner() {
                    args.push(parse_expression(arg)?);
                }
            }
            _ => {}
        }
    }

    Ok(Expr::Call(name, args))
}

/// Escape the characters markdown would treat as emphasis.
pub fn escape_markdown(text: &str) -> String {
    text.replace('*', "\\*").replace('_', "\\_")
}

/// Typeset `name = formula` as a display equation.
///
/// Either side may be empty. When either side fails to parse, the raw text
/// is returned with `*` and `_` escaped instead of LaTeX.
pub fn render_equation(name: &str, formula: &str) -> String {
    let name = name.trim();
    let formula = formula.trim();
    let has_name = !name.is_empty();
    let has_formula = !formula.is_empty();

    if !has_name && !has_formula {
        return String::new();
    }

    let typeset = |text: &str, present: bool| -> ReportResult<Option<String>> {
        if present {
            Ok(Some(to_latex(&parse_formula(text)?)))
        } else {
            Ok(None)
        }
    };

    match (typeset(name, has_name), typeset(formula, has_formula)) {
        (Ok(left), Ok(right)) => {
            let body = match (left, right) {
                (Some(l), Some(r)) => format!("{} = {}", l, r),
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (None, None) => String::new(),
            };
            format!("$$\n{}\n$$", body)
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "formula did not parse, using escaped text");
            let raw = match (has_name, has_formula) {
                (true, true) => format!("{} = {}", name, formula),
                (true, false) => name.to_string(),
                _ => formula.to_string(),
            };
            escape_markdown(&raw)
        }
    }
}
