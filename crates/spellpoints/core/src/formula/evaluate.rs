//! Built-in formula evaluation backed by the Rhai expression engine.
//!
//! Host formulas are not Rhai source. Before compiling, a formula is
//! rewritten so the engine can run it:
//!
//! - `@a.b.c` references become scope variables (`ref_0`, `ref_1`, ..).
//! - Integer literals become float literals, so `5 / 2` divides like the host.
//! - Function names map to the registered helpers (`ceil` -> `fx_ceil`).

use rhai::{Dynamic, Engine, EvalAltResult, Scope};

use super::{Bindings, FormulaError, FormulaEvaluator};

/// Host math functions and the engine symbol each one is registered under.
const FUNCTION_SYMBOLS: &[(&str, &str)] = &[
    ("ceil", "fx_ceil"),
    ("floor", "fx_floor"),
    ("round", "fx_round"),
    ("abs", "fx_abs"),
    ("min", "fx_min"),
    ("max", "fx_max"),
];

/// Arithmetic evaluator for `@`-reference formulas.
///
/// Every reference must resolve in the bindings; missing attributes are an
/// error rather than an implicit zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionEvaluator;

impl FormulaEvaluator for ExpressionEvaluator {
    fn evaluate(&self, formula: &str, bindings: &Bindings) -> Result<f64, FormulaError> {
        let rewritten = rewrite(formula)?;

        let mut scope = Scope::new();
        for (index, path) in rewritten.references.iter().enumerate() {
            let value = bindings
                .get(path)
                .ok_or_else(|| FormulaError::UnknownVariable(path.clone()))?;
            scope.push(reference_symbol(index), value);
        }

        let value = engine()
            .eval_expression_with_scope::<Dynamic>(&mut scope, &rewritten.source)
            .map_err(|error| eval_error(formula, &error))?;

        let value = value
            .as_float()
            .or_else(|_| value.as_int().map(|int| int as f64))
            .map_err(|type_name| FormulaError::Evaluation {
                formula: formula.to_owned(),
                message: format!("result is {type_name}, not a number"),
            })?;

        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite {
                formula: formula.to_owned(),
            })
        }
    }

    fn check(&self, formula: &str) -> Result<(), FormulaError> {
        let rewritten = rewrite(formula)?;

        let mut scope = Scope::new();
        for index in 0..rewritten.references.len() {
            scope.push(reference_symbol(index), 0.0_f64);
        }

        engine()
            .compile_expression_with_scope(&scope, &rewritten.source)
            .map(|_| ())
            .map_err(|error| FormulaError::Syntax {
                formula: formula.to_owned(),
                message: error.to_string(),
            })
    }
}

fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_strict_variables(true);

    engine.register_fn("fx_ceil", |x: f64| x.ceil());
    engine.register_fn("fx_floor", |x: f64| x.floor());
    // Halves round towards positive infinity.
    engine.register_fn("fx_round", |x: f64| (x + 0.5).floor());
    engine.register_fn("fx_abs", |x: f64| x.abs());
    engine.register_fn("fx_min", |a: f64, b: f64| a.min(b));
    engine.register_fn("fx_min", |a: f64, b: f64, c: f64| a.min(b).min(c));
    engine.register_fn("fx_max", |a: f64, b: f64| a.max(b));
    engine.register_fn("fx_max", |a: f64, b: f64, c: f64| a.max(b).max(c));

    engine
}

fn eval_error(formula: &str, error: &EvalAltResult) -> FormulaError {
    match error {
        EvalAltResult::ErrorParsing(parse_error, _) => FormulaError::Syntax {
            formula: formula.to_owned(),
            message: parse_error.to_string(),
        },
        other => FormulaError::Evaluation {
            formula: formula.to_owned(),
            message: other.to_string(),
        },
    }
}

fn reference_symbol(index: usize) -> String {
    format!("ref_{index}")
}

/// A host formula translated into engine source.
#[derive(Debug, PartialEq)]
struct Rewritten {
    source: String,
    /// Reference paths in order of appearance; `ref_N` binds `references[N]`.
    references: Vec<String>,
}

fn rewrite(formula: &str) -> Result<Rewritten, FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut source = String::with_capacity(formula.len() + 8);
    let mut references: Vec<String> = Vec::new();
    let mut chars = formula.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        if ch == '@' {
            let mut path = String::new();
            while let Some(&(_, next)) = chars.peek()
                && (next.is_ascii_alphanumeric() || next == '_' || next == '.')
            {
                path.push(next);
                chars.next();
            }
            let path = path.trim_end_matches('.').to_owned();
            if path.is_empty() {
                return Err(FormulaError::Syntax {
                    formula: formula.to_owned(),
                    message: format!("empty reference at position {position}"),
                });
            }

            let index = match references.iter().position(|known| *known == path) {
                Some(index) => index,
                None => {
                    references.push(path);
                    references.len() - 1
                }
            };
            source.push_str(&reference_symbol(index));
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let mut name = String::from(ch);
            while let Some(&(_, next)) = chars.peek()
                && (next.is_ascii_alphanumeric() || next == '_')
            {
                name.push(next);
                chars.next();
            }
            let symbol = FUNCTION_SYMBOLS
                .iter()
                .find(|(host, _)| *host == name)
                .map(|(_, symbol)| *symbol)
                .ok_or(FormulaError::UnknownFunction(name))?;
            source.push_str(symbol);
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut number = String::from(ch);
            while let Some(&(_, next)) = chars.peek()
                && (next.is_ascii_digit() || next == '.')
            {
                number.push(next);
                chars.next();
            }
            if number.starts_with('.') {
                source.push('0');
            }
            source.push_str(&number);
            if !number.contains('.') {
                source.push_str(".0");
            } else if number.ends_with('.') {
                source.push('0');
            }
        } else {
            source.push(ch);
        }
    }

    Ok(Rewritten { source, references })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AM_BASE_FORMULA;

    fn caster_bindings() -> Bindings {
        Bindings::new()
            .with("attributes.prof", 3)
            .with("attributes.spelldc", 15)
            .with("spells.spell1.max", 4)
            .with("spells.spell2.max", 3)
            .with("spells.spell3.max", 3)
            .with("spells.spell4.max", 3)
            .with("spells.spell5.max", 1)
            .with("spells.spell6.max", 0)
            .with("spells.spell7.max", 0)
            .with("spells.spell8.max", 0)
            .with("spells.spell9.max", 0)
    }

    #[test]
    fn rewrites_references_literals_and_functions() {
        let rewritten = rewrite("ceil(@attributes.prof / 2) + @attributes.prof * 1.5").unwrap();

        assert_eq!(rewritten.source, "fx_ceil(ref_0 / 2.0) + ref_0 * 1.5");
        assert_eq!(rewritten.references, vec!["attributes.prof".to_owned()]);
    }

    #[test]
    fn evaluates_constants_and_references() {
        let evaluator = ExpressionEvaluator;
        let bindings = caster_bindings();

        assert_eq!(evaluator.evaluate("5", &bindings), Ok(5.0));
        assert_eq!(evaluator.evaluate("5 / 2", &bindings), Ok(2.5));
        assert_eq!(evaluator.evaluate("@attributes.prof * 2 - 1", &bindings), Ok(5.0));
        assert_eq!(evaluator.evaluate("-(2 + 3) % 4", &bindings), Ok(-1.0));
    }

    #[test]
    fn evaluates_arcane_mastery_base() {
        // ceil((4 + 6 + 9 + 12 + 5) / 2) + 15 - 8 - 3 = 18 + 4
        let value = ExpressionEvaluator
            .evaluate(AM_BASE_FORMULA, &caster_bindings())
            .unwrap();
        assert_eq!(value, 22.0);
    }

    #[test]
    fn functions_follow_host_math() {
        let evaluator = ExpressionEvaluator;
        let bindings = Bindings::new();

        assert_eq!(evaluator.evaluate("round(2.5)", &bindings), Ok(3.0));
        assert_eq!(evaluator.evaluate("round(-2.5)", &bindings), Ok(-2.0));
        assert_eq!(evaluator.evaluate("floor(7 / 2)", &bindings), Ok(3.0));
        assert_eq!(evaluator.evaluate("min(4, 2, 9)", &bindings), Ok(2.0));
        assert_eq!(evaluator.evaluate("max(4, 9)", &bindings), Ok(9.0));
        assert_eq!(evaluator.evaluate("abs(-3)", &bindings), Ok(3.0));
    }

    #[test]
    fn missing_reference_is_an_error() {
        let result = ExpressionEvaluator.evaluate("@attributes.spelldc", &Bindings::new());
        assert_eq!(
            result,
            Err(FormulaError::UnknownVariable("attributes.spelldc".to_owned()))
        );
    }

    #[test]
    fn unknown_function_is_rejected_before_compiling() {
        let result = ExpressionEvaluator.check("sqrt(4)");
        assert_eq!(result, Err(FormulaError::UnknownFunction("sqrt".to_owned())));
    }

    #[test]
    fn wrong_argument_count_is_an_error() {
        let result = ExpressionEvaluator.evaluate("ceil()", &Bindings::new());
        assert!(matches!(result, Err(FormulaError::Evaluation { .. })));
    }

    #[test]
    fn check_only_validates_syntax() {
        assert_eq!(ExpressionEvaluator.check("@not.bound + 1"), Ok(()));
        assert!(matches!(
            ExpressionEvaluator.check("1 +* 2"),
            Err(FormulaError::Syntax { .. })
        ));
        assert_eq!(ExpressionEvaluator.check("   "), Err(FormulaError::Empty));
    }
}
