use std::borrow::Cow;

use tracing::{debug, trace};

use crate::{
    ast::{BinOp, Expr},
    binding::{HostBinding, ObjectBinding},
    error::{Error, EvalError, ParseError},
    lexer::Lexer,
    parser::Parser,
    value::{Value, ops},
};

/// Evaluation context: the root object bare identifiers resolve against.
///
/// Read-only for the duration of an evaluation, so one context may be shared
/// by evaluations running on different threads.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub root: &'a Value,
}

impl<'a> EvalContext<'a> {
    pub fn new(root: &'a Value) -> Self {
        EvalContext { root }
    }
}

/// Tunables for parsing and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Deepest nesting of groups, argument lists, conditional branches and
    /// prefix operators the parser accepts.
    pub max_depth: usize,
    /// Tallest expression tree the parser builds. Evaluation recurses once
    /// per level, so this bounds its stack use.
    pub max_height: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_depth: Parser::DEFAULT_MAX_DEPTH,
            max_height: Parser::DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Tree-walking evaluator.
///
/// Holds no per-evaluation state: every call parses its own tree and walks it
/// against the root it is given. Member, index and method access are delegated
/// to the [`HostBinding`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator<B: HostBinding = ObjectBinding> {
    binding: B,
    options: EvalOptions,
}

impl Evaluator {
    /// Creates an evaluator with the default [`ObjectBinding`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: HostBinding> Evaluator<B> {
    pub fn with_binding(binding: B) -> Self {
        Evaluator {
            binding,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Parses `text` under this evaluator's limits. Trailing input after the
    /// first complete expression is ignored.
    pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
        Parser::new(Lexer::new(text))
            .with_max_depth(self.options.max_depth)
            .with_max_height(self.options.max_height)
            .parse()
    }

    /// Parses and evaluates `text` against `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynexpr::{Evaluator, Record, Value};
    ///
    /// let root: Value = Record::new()
    ///     .with("c", vec![Value::from(1), Value::from(2), Value::from(3)])
    ///     .into();
    ///
    /// let evaluator = Evaluator::new();
    /// assert_eq!(evaluator.evaluate("c[0] + 100", &root).unwrap(), Value::from(101));
    /// assert_eq!(evaluator.evaluate("(1+(3-1)*4)/3", &root).unwrap(), Value::from(3));
    /// ```
    pub fn evaluate(&self, text: &str, root: &Value) -> Result<Value, Error> {
        debug!(expression = text, "evaluating");

        let expr = self.parse(text)?;
        trace!(tree = %expr, "parsed");

        let result = self.eval_expr(&expr, &EvalContext::new(root))?;
        debug!(result_type = result.type_name(), "evaluated");
        Ok(result)
    }

    /// Evaluates an already parsed tree.
    pub fn eval_expr(&self, expr: &Expr, ctx: &EvalContext) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Root => Ok(ctx.root.clone()),

            Expr::Member { target, name } => {
                let target = self.eval_target(target, ctx)?;
                non_null(&target, || format!("get property {}", name))?;
                self.binding.get_member(&target, name)
            }

            Expr::Index { target, args } => {
                let target = self.eval_target(target, ctx)?;
                non_null(&target, || "get index value".to_string())?;
                let args = self.eval_args(args, ctx)?;
                self.binding.get_index(&target, &args)
            }

            Expr::Call { target, name, args } => {
                let target = self.eval_target(target, ctx)?;
                non_null(&target, || format!("invoke method {}", name))?;
                let args = self.eval_args(args, ctx)?;
                self.binding.invoke(&target, name, &args)
            }

            Expr::Unary { op, operand } => {
                let operand = self.eval_expr(operand, ctx)?;
                ops::unary(*op, &operand)
            }

            // Right operand only when the left one does not decide the result
            Expr::Binary { op, left, right } if op.is_short_circuit() => {
                let left = self.eval_expr(left, ctx)?.to_boolean();
                if left != (*op == BinOp::And) {
                    return Ok(Value::Boolean(left));
                }
                let right = self.eval_expr(right, ctx)?.to_boolean();
                Ok(Value::Boolean(right))
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left, ctx)?;
                let right = self.eval_expr(right, ctx)?;
                ops::binary(*op, &left, &right)
            }

            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition, ctx)?.to_boolean() {
                    self.eval_expr(then_branch, ctx)
                } else {
                    self.eval_expr(else_branch, ctx)
                }
            }
        }
    }

    /// Evaluates the target of a member, index or call. The root is borrowed
    /// rather than cloned.
    fn eval_target<'a>(
        &self,
        target: &Expr,
        ctx: &EvalContext<'a>,
    ) -> Result<Cow<'a, Value>, EvalError> {
        match target {
            Expr::Root => Ok(Cow::Borrowed(ctx.root)),
            other => self.eval_expr(other, ctx).map(Cow::Owned),
        }
    }

    fn eval_args(&self, args: &[Expr], ctx: &EvalContext) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval_expr(arg, ctx)).collect()
    }
}

/// Bindings never see a null target.
fn non_null(target: &Value, access: impl FnOnce() -> String) -> Result<(), EvalError> {
    if target.is_null() {
        return Err(EvalError::NullReference { access: access() });
    }
    Ok(())
}

/// Evaluates `text` against `root` with a default [`Evaluator`].
pub fn evaluate(text: &str, root: &Value) -> Result<Value, Error> {
    Evaluator::new().evaluate(text, root)
}
