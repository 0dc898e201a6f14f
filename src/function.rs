use crate::variable::{VarId, Variable};
use crate::Error;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};

/// Handle to a [`WrappedFunction`](struct.WrappedFunction.html) stored in a
/// [`Model`](struct.Model.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId {
    pub(crate) model: usize,
    pub(crate) index: usize,
}

impl FuncId {
    pub(crate) fn new(model: usize, index: usize) -> Self {
        Self { model, index }
    }

    /// Index of the function inside its model
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

/// A unary function `f64 -> f64` applied to a single variable, such as
/// `sin(x)`.
///
/// Wrapped functions are created through
/// [`Model::add_function`](struct.Model.html#method.add_function) or
/// [`Model::add_builtin`](struct.Model.html#method.add_builtin).
pub struct WrappedFunction {
    name: String,
    function: Box<dyn Fn(f64) -> f64>,
    variable: VarId,
    variable_name: String,
}

impl WrappedFunction {
    pub(crate) fn new<F>(name: &str, function: F, id: VarId, variable: &Variable) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Self {
            name: name.to_owned(),
            function: Box::new(function),
            variable: id,
            variable_name: variable.name().to_owned(),
        }
    }

    /// Name of the function, used for display only
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable this function is evaluated against
    #[must_use]
    pub fn variable(&self) -> VarId {
        self.variable
    }

    /// Name of the variable this function is evaluated against
    #[must_use]
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Apply the function to `x` directly
    #[must_use]
    pub fn call(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// Evaluate the function with the value of its variable taken from
    /// `values`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use modelexpr::Model;
    /// # use std::collections::HashMap;
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    /// let double = model.add_function("double", |v| 2.0 * v, x).unwrap();
    ///
    /// let mut values: HashMap<String, f64> = HashMap::new();
    /// assert!(model.function(double).unwrap().evaluate(&values).is_err());
    /// values.insert("x".into(), 4.0);
    /// assert_eq!(model.function(double).unwrap().evaluate(&values), Ok(8.0));
    /// ```
    pub fn evaluate<'a, C>(&self, values: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        let values: &HashMap<String, f64> = values.into();
        values
            .get(&self.variable_name)
            .map(|&value| self.call(value))
            .ok_or_else(|| Error::undefined(&self.variable_name))
    }
}

impl Display for WrappedFunction {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{}({})", self.name, self.variable_name)
    }
}

impl Debug for WrappedFunction {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_struct("WrappedFunction")
            .field("name", &self.name)
            .field("variable", &self.variable)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}
