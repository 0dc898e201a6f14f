use crate::function::FuncId;
use crate::model::Model;
use crate::variable::VarId;
use crate::Error;
use hashbrown::HashMap as TermIndex;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// A single factor of a product term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    /// The value of a variable
    Variable(VarId),
    /// The value of a wrapped function
    Function(FuncId),
}

/// The identity of a term inside an [`Expression`](struct.Expression.html).
///
/// Factors of a `Product` keep the order in which they were multiplied:
/// `x*y` and `y*x` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKey {
    /// The constant term
    Constant,
    /// A single variable
    Variable(VarId),
    /// A single wrapped function
    Function(FuncId),
    /// A product of at least two factors
    Product(Vec<Factor>),
}

impl TermKey {
    /// Build the key for the product of `factors`. No factor gives the
    /// constant term and a single factor gives the plain key of that factor.
    #[must_use]
    pub fn from_factors(mut factors: Vec<Factor>) -> Self {
        match factors.len() {
            0 => Self::Constant,
            1 => factors.remove(0).into(),
            _ => Self::Product(factors),
        }
    }

    /// Factors of this key, in multiplication order
    #[must_use]
    pub fn factors(&self) -> Vec<Factor> {
        match *self {
            Self::Constant => Vec::new(),
            Self::Variable(id) => vec![Factor::Variable(id)],
            Self::Function(id) => vec![Factor::Function(id)],
            Self::Product(ref factors) => factors.clone(),
        }
    }

    /// Number of factors in this key
    #[must_use]
    pub fn degree(&self) -> usize {
        match *self {
            Self::Constant => 0,
            Self::Variable(_) | Self::Function(_) => 1,
            Self::Product(ref factors) => factors.len(),
        }
    }

    fn normalized(self) -> Self {
        match self {
            Self::Product(factors) => Self::from_factors(factors),
            other => other,
        }
    }

    /// Key of the product of `self` and `other`, `self` factors first
    fn times(&self, other: &Self) -> Self {
        let mut factors = self.factors();
        factors.extend(other.factors());
        Self::from_factors(factors)
    }
}

impl From<Factor> for TermKey {
    fn from(factor: Factor) -> Self {
        match factor {
            Factor::Variable(id) => Self::Variable(id),
            Factor::Function(id) => Self::Function(id),
        }
    }
}

impl From<VarId> for TermKey {
    fn from(id: VarId) -> Self {
        Self::Variable(id)
    }
}

impl From<FuncId> for TermKey {
    fn from(id: FuncId) -> Self {
        Self::Function(id)
    }
}

/// A sum of weighted terms: constants, variables, wrapped functions and
/// products of those.
///
/// Expressions are usually built with the arithmetic operators on
/// [`VarId`](struct.VarId.html), [`FuncId`](struct.FuncId.html), numbers and
/// other expressions. Every operator returns a new expression and leaves its
/// operands untouched. Terms keep their insertion order, which only matters
/// for display.
///
/// # Examples
/// ```
/// # use modelexpr::Model;
/// # use std::collections::HashMap;
/// let mut model = Model::new();
/// let x = model.add_variable("x", 0.0, 10.0).unwrap();
/// let y = model.add_variable("y", -5.0, 5.0).unwrap();
///
/// let expr = 3.0 * x - y + 2.0;
/// let mut values: HashMap<String, f64> = HashMap::new();
/// values.insert("x".into(), 1.0);
/// values.insert("y".into(), -2.0);
/// assert_eq!(expr.evaluate(&model, &values), Ok(7.0));
/// assert_eq!(model.display(&expr).to_string(), "Expression: 3*x + -1*y + 2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Expression {
    terms: Vec<(TermKey, f64)>,
    index: TermIndex<TermKey, usize>,
}

impl Expression {
    /// Create an expression without any term, which evaluates to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an expression with a single constant term
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::from_terms(vec![(TermKey::Constant, value)])
    }

    /// Create an expression from `(key, coefficient)` pairs. Repeated keys
    /// have their coefficients summed.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::{Expression, Model, TermKey};
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    ///
    /// let expr = Expression::from_terms(vec![
    ///     (TermKey::Variable(x), 1.0),
    ///     (TermKey::Constant, 3.0),
    ///     (TermKey::Variable(x), 1.0),
    /// ]);
    /// assert_eq!(expr.len(), 2);
    /// assert_eq!(expr.coefficient(&TermKey::Variable(x)), Some(2.0));
    /// ```
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (TermKey, f64)>,
    {
        let mut expr = Self::new();
        for (key, coefficient) in terms {
            expr.add_term(key, coefficient);
        }
        expr
    }

    /// Iterate over the terms and their coefficients, in insertion order
    pub fn terms(&self) -> impl Iterator<Item = (&TermKey, f64)> {
        self.terms.iter().map(|(key, coefficient)| (key, *coefficient))
    }

    /// Coefficient of the term `key`, or `None` if the term is absent. A
    /// present term may have a zero coefficient.
    #[must_use]
    pub fn coefficient(&self, key: &TermKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.terms[i].1)
    }

    /// Number of terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the expression has no term
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Highest degree among the terms, 0 for an empty expression
    #[must_use]
    pub fn degree(&self) -> usize {
        self.terms
            .iter()
            .map(|(key, _)| key.degree())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn add_term(&mut self, key: TermKey, coefficient: f64) {
        let key = key.normalized();
        if let Some(&i) = self.index.get(&key) {
            self.terms[i].1 += coefficient;
        } else {
            self.index.insert(key.clone(), self.terms.len());
            self.terms.push((key, coefficient));
        }
    }

    /// Sum of `self` and `other`: terms of `other` are merged into a copy of
    /// `self`, shared keys have their coefficients summed.
    pub(crate) fn merged(mut self, other: Self) -> Self {
        for (key, coefficient) in other.terms {
            self.add_term(key, coefficient);
        }
        self
    }

    /// Product of `self` and `other`, distributing every term of `self` over
    /// every term of `other`.
    pub(crate) fn product(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for (left, a) in &self.terms {
            for (right, b) in &other.terms {
                result.add_term(left.times(right), a * b);
            }
        }
        result
    }

    pub(crate) fn negated(mut self) -> Self {
        for term in &mut self.terms {
            term.1 = -term.1;
        }
        self
    }

    /// Multiply every coefficient by `factor`, keeping the same keys
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut result = self.clone();
        for term in &mut result.terms {
            term.1 *= factor;
        }
        result
    }

    /// Raise the expression to the integer power `exponent`.
    ///
    /// Fails with `RangeError` if `exponent` is negative. The power 0 is the
    /// constant 1, whatever the expression.
    ///
    /// A single term is raised in one step. Other expressions are multiplied
    /// out `exponent` times, and the number of terms grows quickly.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::{Expression, Model};
    /// # use std::collections::HashMap;
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    /// let y = model.add_variable("y", 0.0, 10.0).unwrap();
    ///
    /// let expr = (x + y).pow(2).unwrap();
    /// assert_eq!(
    ///     model.display(&expr).to_string(),
    ///     "Expression: 1*x*x + 1*x*y + 1*y*x + 1*y*y"
    /// );
    /// assert_eq!((x + y).pow(0).unwrap().evaluate(&model, &HashMap::new()), Ok(1.0));
    /// assert!((x + y).pow(-1).is_err());
    /// ```
    pub fn pow(&self, exponent: i32) -> Result<Self, Error> {
        if exponent < 0 {
            return Err(Error::RangeError(format!(
                "only non negative integer powers are supported, got {}",
                exponent
            )));
        }
        #[allow(clippy::cast_sign_loss)]
        let count = exponent as usize;
        if let [(key, coefficient)] = self.terms.as_slice() {
            let key = TermKey::from_factors(key.factors().repeat(count));
            return Ok(Self::from_terms(vec![(key, coefficient.powi(exponent))]));
        }
        let mut result = Self::constant(1.0);
        for _ in 0..count {
            result = result.product(self);
        }
        Ok(result)
    }

    /// Evaluate the expression with the variable values given in `values`.
    ///
    /// Only `values` is read: the current values stored in the variables are
    /// ignored. Fails with `NameError` on the first term needing a variable
    /// missing from `values`.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::{Error, Model};
    /// # use std::collections::HashMap;
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    /// let sin = model.add_builtin("sin", x).unwrap();
    /// let expr = x * x + 2.0 * sin + 1.0;
    ///
    /// let mut values: HashMap<String, f64> = HashMap::new();
    /// assert!(matches!(expr.evaluate(&model, &values), Err(Error::NameError(_))));
    ///
    /// values.insert("x".into(), 0.0);
    /// assert_eq!(expr.evaluate(&model, &values), Ok(1.0));
    /// values.insert("x".into(), 3.0);
    /// let result = expr.evaluate(&model, &values).unwrap();
    /// assert!((result - (10.0 + 2.0 * 3f64.sin())).abs() < 1e-12);
    /// ```
    pub fn evaluate<'a, C>(&self, model: &Model, values: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        let values: &HashMap<String, f64> = values.into();
        trace!("evaluating {} terms with {} values", self.len(), values.len());
        self.terms.iter().try_fold(0.0, |sum, (key, coefficient)| {
            Ok(sum + coefficient * Self::term_value(model, key, values)?)
        })
    }

    fn term_value(
        model: &Model,
        key: &TermKey,
        values: &HashMap<String, f64>,
    ) -> Result<f64, Error> {
        match *key {
            TermKey::Constant => Ok(1.0),
            TermKey::Variable(id) => Self::factor_value(model, Factor::Variable(id), values),
            TermKey::Function(id) => Self::factor_value(model, Factor::Function(id), values),
            // the empty product is 1
            TermKey::Product(ref factors) => factors.iter().try_fold(1.0, |product, &factor| {
                Ok(product * Self::factor_value(model, factor, values)?)
            }),
        }
    }

    fn factor_value(
        model: &Model,
        factor: Factor,
        values: &HashMap<String, f64>,
    ) -> Result<f64, Error> {
        match factor {
            Factor::Variable(id) => {
                let name = model.variable(id)?.name();
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| Error::undefined(name))
            }
            Factor::Function(id) => model.function(id)?.evaluate(values),
        }
    }

    /// Names of the variables needed to evaluate this expression, including
    /// the variables of wrapped functions. Handles unknown to `model` are
    /// skipped.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::Model;
    /// # use std::collections::HashSet;
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    /// let y = model.add_variable("y", 0.0, 10.0).unwrap();
    /// let t = model.add_variable("t", 0.0, 10.0).unwrap();
    /// let cos = model.add_builtin("cos", t).unwrap();
    ///
    /// let expr = x * y + cos + 4.0;
    /// assert_eq!(expr.variables(&model), HashSet::from(["x", "y", "t"]));
    /// ```
    #[must_use]
    pub fn variables<'m>(&self, model: &'m Model) -> HashSet<&'m str> {
        let mut variables = HashSet::new();
        for (key, _) in &self.terms {
            for factor in key.factors() {
                let name = match factor {
                    Factor::Variable(id) => model.variable(id).ok().map(|v| v.name()),
                    Factor::Function(id) => model.function(id).ok().map(|f| f.variable_name()),
                };
                if let Some(name) = name {
                    variables.insert(name);
                }
            }
        }
        variables
    }

    /// Display the expression with the names registered in `model`
    #[must_use]
    pub fn display<'a>(&'a self, model: &'a Model) -> ExpressionDisplay<'a> {
        ExpressionDisplay { model, expr: self }
    }
}

impl PartialEq for Expression {
    /// Two expressions are equal when they have the same terms with the same
    /// coefficients, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .terms()
                .all(|(key, coefficient)| other.coefficient(key) == Some(coefficient))
    }
}

/// Helper to print an [`Expression`](struct.Expression.html) as
/// `Expression: 1*x + 2*x*y + 3`.
pub struct ExpressionDisplay<'a> {
    model: &'a Model,
    expr: &'a Expression,
}

impl<'a> ExpressionDisplay<'a> {
    fn write_factor(&self, fmt: &mut Formatter, factor: Factor) -> fmt::Result {
        match factor {
            Factor::Variable(id) => match self.model.variable(id) {
                Ok(variable) => write!(fmt, "{}", variable.name()),
                Err(_) => write!(fmt, "var#{}", id.index()),
            },
            Factor::Function(id) => match self.model.function(id) {
                Ok(function) => write!(fmt, "{}", function),
                Err(_) => write!(fmt, "fn#{}", id.index()),
            },
        }
    }
}

impl<'a> Display for ExpressionDisplay<'a> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "Expression: ")?;
        for (i, (key, coefficient)) in self.expr.terms().enumerate() {
            if i > 0 {
                write!(fmt, " + ")?;
            }
            write!(fmt, "{}", coefficient)?;
            for factor in key.factors() {
                write!(fmt, "*")?;
                self.write_factor(fmt, factor)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Expression, Factor, TermKey};
    use crate::{Error, Model, VarId};
    use std::collections::{HashMap, HashSet};
    use test_case::test_case;

    fn model() -> (Model, VarId, VarId) {
        let mut model = Model::new();
        let x = model.add_variable("x", 0.0, 10.0).unwrap();
        let y = model.add_variable("y", -5.0, 5.0).unwrap();
        (model, x, y)
    }

    fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|&(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn keys() {
        let (_, x, y) = model();
        assert_eq!(TermKey::from_factors(vec![]), TermKey::Constant);
        assert_eq!(
            TermKey::from_factors(vec![Factor::Variable(x)]),
            TermKey::Variable(x)
        );
        let xy = TermKey::from_factors(vec![Factor::Variable(x), Factor::Variable(y)]);
        let yx = TermKey::from_factors(vec![Factor::Variable(y), Factor::Variable(x)]);
        assert_eq!(xy.degree(), 2);
        assert_ne!(xy, yx);
        assert_eq!(TermKey::Variable(x).times(&TermKey::Constant), TermKey::Variable(x));
        assert_eq!(TermKey::Constant.times(&TermKey::Variable(y)), TermKey::Variable(y));
        assert_eq!(TermKey::Variable(x).times(&TermKey::Variable(y)), xy);
    }

    #[test]
    fn create() {
        let (model, x, y) = model();
        let sin = Model::new().add_builtin("sin", x);
        assert!(sin.is_err());

        let expr = Expression::from_terms(vec![
            (TermKey::Variable(x), 1.0),
            (TermKey::Variable(y), 2.0),
            (TermKey::Constant, 3.0),
        ]);
        assert_eq!(expr.len(), 3);
        assert_eq!(expr.coefficient(&TermKey::Variable(y)), Some(2.0));
        assert_eq!(expr.coefficient(&TermKey::Product(vec![])), None);
        assert_eq!(
            model.display(&expr).to_string(),
            "Expression: 1*x + 2*y + 3"
        );

        // single factor products are stored under the plain key
        let expr =
            Expression::from_terms(vec![(TermKey::Product(vec![Factor::Variable(x)]), 4.0)]);
        assert_eq!(expr.coefficient(&TermKey::Variable(x)), Some(4.0));

        assert!(Expression::new().is_empty());
        assert_eq!(Expression::new().degree(), 0);
        assert_eq!(Expression::new().evaluate(&model, &HashMap::new()), Ok(0.0));
    }

    #[test]
    fn evaluate() {
        let (model, x, y) = model();
        let expr = x + y;
        assert_eq!(
            expr.evaluate(&model, &values(&[("x", 1.0), ("y", -2.0)])),
            Ok(-1.0)
        );

        // zero coefficients are kept and evaluate to nothing
        let expr =
            Expression::from_terms(vec![(TermKey::Variable(x), 0.0), (TermKey::Constant, 2.0)]);
        assert_eq!(expr.len(), 2);
        assert_eq!(expr.evaluate(&model, &values(&[("x", 7.0)])), Ok(2.0));

        let expr = Expression::from_terms(vec![(
            TermKey::Product(vec![Factor::Variable(x), Factor::Variable(y), Factor::Variable(y)]),
            2.0,
        )]);
        assert_eq!(expr.evaluate(&model, &values(&[("x", 3.0), ("y", 2.0)])), Ok(24.0));
    }

    #[test]
    fn evaluate_missing() {
        let (model, x, y) = model();
        let expr = Expression::from_terms(vec![(TermKey::Variable(x), 1.0)]);
        let result = expr.evaluate(&model, &HashMap::new());
        assert_eq!(result, Err(Error::undefined("x")));

        let expr = x * y;
        assert_eq!(
            expr.evaluate(&model, &values(&[("x", 1.0)])),
            Err(Error::undefined("y"))
        );

        // unknown handles are reported instead of evaluated
        let unknown = VarId::new(x.model, 42);
        let expr = Expression::from_terms(vec![(TermKey::Variable(unknown), 1.0)]);
        assert!(matches!(
            expr.evaluate(&model, &values(&[("x", 1.0)])),
            Err(Error::NameError(_))
        ));
    }

    #[test]
    fn evaluate_functions() {
        let (mut model, x, y) = model();
        let square = model.add_function("square", |v| v * v, y).unwrap();
        let expr = x + 3.0 * square;
        assert_eq!(expr.evaluate(&model, &values(&[("x", 1.0), ("y", 2.0)])), Ok(13.0));
        assert_eq!(
            expr.evaluate(&model, &values(&[("x", 1.0)])),
            Err(Error::undefined("y"))
        );

        let expr = x * square;
        assert_eq!(expr.evaluate(&model, &values(&[("x", 2.0), ("y", 3.0)])), Ok(18.0));
        assert_eq!(model.display(&expr).to_string(), "Expression: 1*x*square(y)");
    }

    #[test_case(&[("x", 1.0), ("y", 2.0)] ; "small values")]
    #[test_case(&[("x", 10.0), ("y", -5.0)] ; "at the bounds")]
    #[test_case(&[("x", 0.5), ("y", 0.25)] ; "fractions")]
    fn linearity(pairs: &[(&str, f64)]) {
        let (model, x, y) = model();
        let values = values(pairs);
        let expr = 2.0 * x + -4.0 * y + 7.0;
        let expected = 2.0 * values["x"] - 4.0 * values["y"] + 7.0;
        assert_eq!(expr.evaluate(&model, &values), Ok(expected));

        let negated = -expr.clone();
        assert_eq!(negated.evaluate(&model, &values), Ok(-expected));

        let scaled = &expr * 3.0;
        for (key, coefficient) in expr.terms() {
            assert_eq!(scaled.coefficient(key), Some(coefficient * 3.0));
        }
        assert_eq!(scaled.evaluate(&model, &values), Ok(3.0 * expected));
    }

    #[test]
    fn pow() {
        let (model, x, y) = model();
        let expr = x + y;
        let vals = values(&[("x", 2.0), ("y", 3.0)]);

        assert_eq!(expr.pow(0).unwrap().evaluate(&model, &HashMap::new()), Ok(1.0));
        assert_eq!(expr.pow(1).unwrap(), expr);
        assert_eq!(expr.pow(2).unwrap().evaluate(&model, &vals), Ok(25.0));
        assert_eq!(expr.pow(3).unwrap().evaluate(&model, &vals), Ok(125.0));
        assert_eq!(expr.pow(3).unwrap().degree(), 3);
        assert!(matches!(expr.pow(-2), Err(Error::RangeError(_))));
    }

    #[test]
    fn pow_single_term() {
        let (model, x, y) = model();
        let term = 2.0 * x * y;
        let mut repeated = Expression::constant(1.0);
        for n in 0..4 {
            assert_eq!(term.pow(n).unwrap(), repeated);
            repeated = repeated.product(&term);
        }
        assert_eq!(
            model.display(&term.pow(2).unwrap()).to_string(),
            "Expression: 4*x*y*x*y"
        );
        assert_eq!(Expression::constant(3.0).pow(2).unwrap(), Expression::constant(9.0));

        let large = Expression::from(x).pow(20000).unwrap();
        assert_eq!(large.len(), 1);
        assert_eq!(large.degree(), 20000);
        assert_eq!(large.evaluate(&model, &values(&[("x", 1.0)])), Ok(1.0));
    }

    #[test]
    fn equality_ignores_order() {
        let (_, x, y) = model();
        assert_eq!(x + y, y + x);
        assert_ne!(x + y, x + 2.0 * y);
        assert_ne!(x * y, y * x);
    }

    #[test]
    fn variables() {
        let (mut model, x, y) = model();
        let z = model.add_variable("z", 0.0, 1.0).unwrap();
        let exp = model.add_builtin("exp", z).unwrap();
        assert_eq!((x + 1.0).variables(&model), HashSet::from(["x"]));
        assert_eq!((x * y + exp).variables(&model), HashSet::from(["x", "y", "z"]));
        assert!(Expression::constant(1.0).variables(&model).is_empty());
    }

    #[test]
    fn display() {
        let (model, x, y) = model();
        assert_eq!(model.display(&(x + y)).to_string(), "Expression: 1*x + 1*y");
        assert_eq!(model.display(&(x * y * x)).to_string(), "Expression: 1*x*y*x");
        assert_eq!(model.display(&(0.5 - x)).to_string(), "Expression: -1*x + 0.5");
        assert_eq!(model.display(&Expression::new()).to_string(), "Expression: ");
        let unknown = VarId::new(x.model, 9);
        let stale = Expression::from_terms(vec![(TermKey::Variable(unknown), 1.0)]);
        assert_eq!(model.display(&stale).to_string(), "Expression: 1*var#9");
    }
}
