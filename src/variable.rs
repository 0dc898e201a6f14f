use crate::util::is_variable;
use crate::Error;
use std::fmt::{self, Display, Formatter};

/// Handle to a [`Variable`](struct.Variable.html) stored in a
/// [`Model`](struct.Model.html).
///
/// Two handles are the same term of an expression only if they point to the
/// same model entry: variables sharing a name are still distinct. A handle
/// only resolves in the model that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId {
    pub(crate) model: usize,
    pub(crate) index: usize,
}

impl VarId {
    pub(crate) fn new(model: usize, index: usize) -> Self {
        Self { model, index }
    }

    /// Index of the variable inside its model
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

/// A named scalar restricted to the closed range `[lower_bound, upper_bound]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    lower_bound: f64,
    upper_bound: f64,
    value: Option<f64>,
}

impl Variable {
    /// Create a new variable without a value.
    ///
    /// Fails with `TypeError` if `name` is not a valid identifier (see
    /// [`is_variable`](fn.is_variable.html)) or if a bound is NaN, and with
    /// `RangeError` if `lower_bound > upper_bound`.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::{Error, Variable};
    /// let x = Variable::new("x", 0.0, 10.0).unwrap();
    /// assert_eq!(x.value(), None);
    ///
    /// assert!(matches!(Variable::new("x", 1.0, 0.0), Err(Error::RangeError(_))));
    /// assert!(matches!(Variable::new("2x", 0.0, 1.0), Err(Error::TypeError(_))));
    /// ```
    pub fn new(name: &str, lower_bound: f64, upper_bound: f64) -> Result<Self, Error> {
        if !is_variable(name) {
            return Err(Error::TypeError(format!(
                "'{}' is not a valid variable name",
                name
            )));
        }
        if lower_bound.is_nan() || upper_bound.is_nan() {
            return Err(Error::TypeError(format!(
                "the bounds of '{}' should be numbers, got [{}, {}]",
                name, lower_bound, upper_bound
            )));
        }
        if lower_bound > upper_bound {
            return Err(Error::RangeError(format!(
                "the lower bound of '{}' should not exceed its upper bound, got {} > {}",
                name, lower_bound, upper_bound
            )));
        }
        Ok(Self {
            name: name.to_owned(),
            lower_bound,
            upper_bound,
            value: None,
        })
    }

    /// Name of the variable, used as key in value assignments
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Smallest value the variable accepts
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Largest value the variable accepts
    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Current value of the variable, if one was set
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Check whether `value` lies inside the bounds of this variable
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }

    /// Set the current value. Fails with `RangeError` if `value` is outside
    /// `[lower_bound, upper_bound]`, in which case the previous value is kept.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::Variable;
    /// let mut x = Variable::new("x", 0.0, 10.0).unwrap();
    /// assert!(x.set_value(5.0).is_ok());
    /// assert!(x.set_value(11.0).is_err());
    /// assert_eq!(x.value(), Some(5.0));
    /// ```
    pub fn set_value(&mut self, value: f64) -> Result<(), Error> {
        if !self.contains(value) {
            return Err(Error::RangeError(format!(
                "the value {} of '{}' is outside the range [{}, {}]",
                value, self.name, self.lower_bound, self.upper_bound
            )));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Forget the current value
    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

impl Display for Variable {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self.value {
            Some(value) => write!(fmt, "{}: {}", self.name, value),
            None => write!(fmt, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Variable;
    use crate::Error;
    use test_case::test_case;

    #[test]
    fn create() {
        let var = Variable::new("x", 0.0, 10.0).unwrap();
        assert_eq!(var.name(), "x");
        assert_eq!(var.lower_bound(), 0.0);
        assert_eq!(var.upper_bound(), 10.0);
        assert_eq!(var.value(), None);

        // degenerate range is allowed
        assert!(Variable::new("y", 3.0, 3.0).is_ok());
        assert!(Variable::new("z", f64::NEG_INFINITY, f64::INFINITY).is_ok());
    }

    #[test_case("x", 10.0, 0.0 ; "inverted bounds")]
    #[test_case("x", 0.0, -1e-9 ; "barely inverted bounds")]
    fn create_range_error(name: &str, lower: f64, upper: f64) {
        assert!(matches!(
            Variable::new(name, lower, upper),
            Err(Error::RangeError(_))
        ));
    }

    #[test_case("", 0.0, 1.0 ; "empty name")]
    #[test_case("1x", 0.0, 1.0 ; "name starting with a digit")]
    #[test_case("x", f64::NAN, 1.0 ; "nan lower bound")]
    #[test_case("x", 0.0, f64::NAN ; "nan upper bound")]
    fn create_type_error(name: &str, lower: f64, upper: f64) {
        assert!(matches!(
            Variable::new(name, lower, upper),
            Err(Error::TypeError(_))
        ));
    }

    #[test_case(0.0 => true ; "lower bound")]
    #[test_case(5.0 => true ; "inside")]
    #[test_case(10.0 => true ; "upper bound")]
    #[test_case(-0.5 => false ; "below")]
    #[test_case(10.5 => false ; "above")]
    #[test_case(f64::NAN => false ; "nan")]
    fn set_value(value: f64) -> bool {
        let mut var = Variable::new("x", 0.0, 10.0).unwrap();
        let result = var.set_value(value);
        if let Err(ref err) = result {
            assert!(matches!(err, Error::RangeError(_)));
            assert_eq!(var.value(), None);
        } else {
            assert_eq!(var.value(), Some(value));
        }
        result.is_ok()
    }

    #[test]
    fn display() {
        let mut var = Variable::new("x", 0.0, 10.0).unwrap();
        assert_eq!(var.to_string(), "x");
        var.set_value(2.5).unwrap();
        assert_eq!(var.to_string(), "x: 2.5");
        var.clear_value();
        assert_eq!(var.to_string(), "x");
    }
}
