#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal,
    clippy::module_name_repetitions
)]

//! Modelexpr, a crate for building and evaluating polynomial expressions over
//! bounded variables.
//!
//! Variables live in a [`Model`](struct.Model.html), which hands out
//! [`VarId`](struct.VarId.html) handles. Handles, numbers and expressions
//! combine with the usual arithmetic operators into an
//! [`Expression`](struct.Expression.html), which can then be evaluated for
//! any assignment of values to the variable names:
//!
//! ```
//! use std::collections::HashMap;
//! use modelexpr::Model;
//!
//! let mut model = Model::new();
//! let x = model.add_variable("x", 0.0, 10.0).unwrap();
//! let y = model.add_variable("y", -5.0, 5.0).unwrap();
//!
//! let expr = x + y;
//! let mut values: HashMap<String, f64> = HashMap::new();
//! values.insert("x".into(), 1.0);
//! values.insert("y".into(), -2.0);
//! assert_eq!(expr.evaluate(&model, &values), Ok(-1.0));
//! assert_eq!(model.display(&expr).to_string(), "Expression: 1*x + 1*y");
//! ```
//!
//! Unary functions can be wrapped around a single variable, either one of
//! the built-in [`FUNCTIONS`](struct.FUNCTIONS.html) or any closure:
//!
//! ```
//! use std::collections::HashMap;
//! use modelexpr::Model;
//!
//! let mut model = Model::new();
//! let t = model.add_variable("t", 0.0, 1.0).unwrap();
//! let cos = model.add_builtin("cos", t).unwrap();
//! let double = model.add_function("double", |v| 2.0 * v, t).unwrap();
//!
//! let expr = 3.0 * cos + double * t - 1.0;
//! let mut values: HashMap<String, f64> = HashMap::new();
//! values.insert("t".into(), 0.0);
//! assert_eq!(expr.evaluate(&model, &values), Ok(2.0));
//! assert_eq!(
//!     model.display(&expr).to_string(),
//!     "Expression: 3*cos(t) + 1*double(t)*t + -1"
//! );
//! ```
//!
//! # Expressions
//!
//! An expression is a sum of terms, each with a coefficient. A term is the
//! constant term, a variable, a wrapped function or an ordered product of
//! variables and wrapped functions. Identical terms are merged by summing
//! their coefficients; no other simplification happens. In particular the
//! products `x*y` and `y*x` stay two different terms, and terms with a zero
//! coefficient are kept.
//!
//! Variables are identified by their handle and not by their name: two
//! variables registered under the same name are different terms, but
//! evaluate to the same value since values are looked up by name.
//!
//! # Technical details
//!
//! Evaluation only reads the assignment it is given, never the current
//! values stored in the variables; use
//! [`Model::evaluate_current`](struct.Model.html#method.evaluate_current) to
//! evaluate with those. All computations use `f64`.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod error;
mod expr;
mod function;
mod model;
mod ops;
mod util;
mod variable;

pub use error::Error;
pub use expr::{Expression, ExpressionDisplay, Factor, TermKey};
pub use function::{FuncId, WrappedFunction};
pub use model::Model;
pub use ops::Operand;
pub use util::{is_variable, FUNCTIONS};
pub use variable::{VarId, Variable};
