//! Arithmetic operators between variables, wrapped functions, expressions
//! and numbers.
//!
//! Every operator returns a new [`Expression`](struct.Expression.html):
//!
//! - `+` merges terms, summing the coefficients of identical terms;
//! - `-` adds the negation of the right-hand side;
//! - `*` distributes every term of the left-hand side over every term of the
//!   right-hand side, appending factors in order;
//! - unary `-` flips the sign of every coefficient.
//!
//! A number on the left-hand side gives the same result as the same number on
//! the right-hand side, and `n - e` is `(-e) + n`.

use crate::expr::{Expression, TermKey};
use crate::function::FuncId;
use crate::variable::VarId;
use crate::Error;
use std::ops::{Add, Mul, Neg, Sub};

/// Anything that can appear on either side of an arithmetic operator
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A number
    Constant(f64),
    /// A variable of a model
    Variable(VarId),
    /// A wrapped function of a model
    Function(FuncId),
    /// An expression
    Expression(Expression),
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self::Constant(f64::from(value))
    }
}

impl From<VarId> for Operand {
    fn from(id: VarId) -> Self {
        Self::Variable(id)
    }
}

impl From<FuncId> for Operand {
    fn from(id: FuncId) -> Self {
        Self::Function(id)
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Self::Expression(expr)
    }
}

impl From<&Expression> for Operand {
    fn from(expr: &Expression) -> Self {
        Self::Expression(expr.clone())
    }
}

impl From<Operand> for Expression {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Constant(value) => Self::constant(value),
            Operand::Variable(id) => Self::from_terms(vec![(TermKey::Variable(id), 1.0)]),
            Operand::Function(id) => Self::from_terms(vec![(TermKey::Function(id), 1.0)]),
            Operand::Expression(expr) => expr,
        }
    }
}

impl From<VarId> for Expression {
    fn from(id: VarId) -> Self {
        Operand::from(id).into()
    }
}

impl From<FuncId> for Expression {
    fn from(id: FuncId) -> Self {
        Operand::from(id).into()
    }
}

impl Operand {
    /// Sum of `self` and `other`. An expression operand keeps its terms
    /// first, whichever side it is on.
    fn plus(self, other: Self) -> Expression {
        match (self, other) {
            (Self::Expression(left), right) => left.merged(right.into()),
            (left, Self::Expression(right)) => right.merged(left.into()),
            (left @ Self::Constant(_), right) => Expression::from(right).merged(left.into()),
            (left, right) => Expression::from(left).merged(right.into()),
        }
    }

    fn times(self, other: Self) -> Expression {
        match (self, other) {
            (left @ Self::Constant(_), right) => Expression::from(right).product(&left.into()),
            (left, right) => Expression::from(left).product(&right.into()),
        }
    }

    fn minus(self, other: Self) -> Expression {
        let negated = -Expression::from(other);
        match self {
            Self::Constant(_) => negated.merged(self.into()),
            _ => Expression::from(self).merged(negated),
        }
    }
}

impl VarId {
    /// Raise the variable to the integer power `exponent`: `x.pow(3)` is the
    /// product `x*x*x`, `x.pow(0)` is the constant 1.
    ///
    /// Fails with `RangeError` if `exponent` is negative.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::Model;
    /// # use std::collections::HashMap;
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    ///
    /// let cube = x.pow(3).unwrap();
    /// assert_eq!(model.display(&cube).to_string(), "Expression: 1*x*x*x");
    ///
    /// let mut values: HashMap<String, f64> = HashMap::new();
    /// values.insert("x".into(), 2.0);
    /// assert_eq!(cube.evaluate(&model, &values), Ok(8.0));
    /// assert!(x.pow(-1).is_err());
    /// ```
    pub fn pow(self, exponent: i32) -> Result<Expression, Error> {
        Expression::from(self).pow(exponent)
    }
}

macro_rules! impl_binary_ops {
    ($($lhs:ty),*) => {$(
        impl<T: Into<Operand>> Add<T> for $lhs {
            type Output = Expression;
            fn add(self, rhs: T) -> Expression {
                Operand::from(self).plus(rhs.into())
            }
        }

        impl<T: Into<Operand>> Sub<T> for $lhs {
            type Output = Expression;
            fn sub(self, rhs: T) -> Expression {
                Operand::from(self).minus(rhs.into())
            }
        }

        impl<T: Into<Operand>> Mul<T> for $lhs {
            type Output = Expression;
            fn mul(self, rhs: T) -> Expression {
                Operand::from(self).times(rhs.into())
            }
        }

        impl Neg for $lhs {
            type Output = Expression;
            fn neg(self) -> Expression {
                Expression::from(Operand::from(self)).negated()
            }
        }
    )*};
}

impl_binary_ops!(VarId, FuncId, Expression, &Expression);

// numbers on the left-hand side, the right-hand side can not be generic here
macro_rules! impl_number_ops {
    ($number:ty => $($rhs:ty),*) => {$(
        impl Add<$rhs> for $number {
            type Output = Expression;
            fn add(self, rhs: $rhs) -> Expression {
                Operand::from(self).plus(rhs.into())
            }
        }

        impl Sub<$rhs> for $number {
            type Output = Expression;
            fn sub(self, rhs: $rhs) -> Expression {
                Operand::from(self).minus(rhs.into())
            }
        }

        impl Mul<$rhs> for $number {
            type Output = Expression;
            fn mul(self, rhs: $rhs) -> Expression {
                Operand::from(self).times(rhs.into())
            }
        }
    )*};
}

impl_number_ops!(f64 => VarId, FuncId, Expression, &Expression);
impl_number_ops!(i32 => VarId, FuncId, Expression, &Expression);
