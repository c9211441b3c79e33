//! Formula system for cost and maximum calculation.
//!
//! Settings store costs and custom maximums as small arithmetic expressions
//! that reference character attributes with `@`-prefixed dotted paths:
//!
//! ```ignore
//! "5"
//! "@attributes.prof + 1"
//! "ceil((1*@spells.spell1.max + 2*@spells.spell2.max) / 2) + @attributes.spelldc - 8"
//! ```
//!
//! Evaluation goes through the [`FormulaEvaluator`] seam so a host can supply
//! its own engine. [`ExpressionEvaluator`] is the built-in implementation,
//! running formulas on the Rhai engine.

mod bindings;
mod evaluate;

pub use bindings::Bindings;
pub use evaluate::ExpressionEvaluator;

use crate::error::{ErrorSeverity, SpellPointError};

/// Evaluates formula strings against a character's variable bindings.
pub trait FormulaEvaluator {
    /// Evaluates `formula`, resolving `@` references from `bindings`.
    fn evaluate(&self, formula: &str, bindings: &Bindings) -> Result<f64, FormulaError>;

    /// Checks that `formula` is well formed without evaluating it.
    ///
    /// Evaluators that cannot check syntax ahead of time accept everything.
    fn check(&self, formula: &str) -> Result<(), FormulaError> {
        let _ = formula;
        Ok(())
    }
}

/// Evaluates a formula and rejects infinite or NaN results.
pub fn evaluate_finite(
    evaluator: &dyn FormulaEvaluator,
    formula: &str,
    bindings: &Bindings,
) -> Result<f64, FormulaError> {
    let value = evaluator.evaluate(formula, bindings)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite {
            formula: formula.to_owned(),
        })
    }
}

/// Evaluates a formula that yields a point amount.
///
/// Points are whole numbers; fractional results are rounded to the nearest
/// integer.
pub fn evaluate_points(
    evaluator: &dyn FormulaEvaluator,
    formula: &str,
    bindings: &Bindings,
) -> Result<i64, FormulaError> {
    evaluate_finite(evaluator, formula, bindings).map(|value| value.round() as i64)
}

/// Errors raised while parsing or evaluating a formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("cannot parse `{formula}`: {message}")]
    Syntax { formula: String, message: String },

    #[error("cannot evaluate `{formula}`: {message}")]
    Evaluation { formula: String, message: String },

    #[error("unknown variable `@{0}`")]
    UnknownVariable(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("formula `{formula}` does not produce a finite number")]
    NonFinite { formula: String },
}

impl SpellPointError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "FORMULA_EMPTY",
            Self::Syntax { .. } => "FORMULA_SYNTAX",
            Self::Evaluation { .. } => "FORMULA_EVALUATION",
            Self::UnknownVariable(_) => "FORMULA_UNKNOWN_VARIABLE",
            Self::UnknownFunction(_) => "FORMULA_UNKNOWN_FUNCTION",
            Self::NonFinite { .. } => "FORMULA_NON_FINITE",
        }
    }
}
