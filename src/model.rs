use crate::expr::{Expression, ExpressionDisplay};
use crate::function::{FuncId, WrappedFunction};
use crate::util::FUNCTIONS;
use crate::variable::{VarId, Variable};
use crate::Error;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_MODEL: AtomicUsize = AtomicUsize::new(0);

/// Owner of the variables and wrapped functions used by expressions.
///
/// Expressions only store [`VarId`](struct.VarId.html) and
/// [`FuncId`](struct.FuncId.html) handles; the model resolves them to names
/// and functions when evaluating or displaying. Every model gets its own
/// identity, and handles created by one model fail to resolve in another.
///
/// # Examples
/// ```
/// # use modelexpr::Model;
/// let mut model = Model::new();
/// let x = model.add_variable("x", 0.0, 10.0).unwrap();
/// let y = model.add_variable("y", -5.0, 5.0).unwrap();
///
/// model.set_value(x, 2.0).unwrap();
/// model.set_value(y, -1.0).unwrap();
/// assert_eq!(model.evaluate_current(&(x * y + 3.0)), Ok(1.0));
/// assert!(model.set_value(y, 6.0).is_err());
/// ```
#[derive(Debug)]
pub struct Model {
    id: usize,
    variables: Vec<Variable>,
    functions: Vec<WrappedFunction>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: NEXT_MODEL.fetch_add(1, Ordering::Relaxed),
            variables: Vec::new(),
            functions: Vec::new(),
        }
    }
}

impl Model {
    /// Create an empty model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new variable with the given bounds and no value. See
    /// [`Variable::new`](struct.Variable.html#method.new) for the possible
    /// errors.
    pub fn add_variable(
        &mut self,
        name: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VarId, Error> {
        let variable = Variable::new(name, lower_bound, upper_bound)?;
        let id = VarId::new(self.id, self.variables.len());
        debug!(
            "registered variable '{}' in [{}, {}] as #{}",
            name,
            lower_bound,
            upper_bound,
            id.index()
        );
        self.variables.push(variable);
        Ok(id)
    }

    /// Wrap `function` around `variable`. The `name` is only used for display.
    ///
    /// Fails with `NameError` if `variable` does not belong to this model.
    pub fn add_function<F>(
        &mut self,
        name: &str,
        function: F,
        variable: VarId,
    ) -> Result<FuncId, Error>
    where
        F: Fn(f64) -> f64 + 'static,
    {
        let wrapped = WrappedFunction::new(name, function, variable, self.variable(variable)?);
        let id = FuncId::new(self.id, self.functions.len());
        debug!("registered function {} as #{}", wrapped, id.index());
        self.functions.push(wrapped);
        Ok(id)
    }

    /// Wrap one of the built-in [`FUNCTIONS`](struct.FUNCTIONS.html) around
    /// `variable`.
    ///
    /// # Examples
    /// ```
    /// # use modelexpr::{Error, Model};
    /// let mut model = Model::new();
    /// let x = model.add_variable("x", 0.0, 10.0).unwrap();
    /// let sqrt = model.add_builtin("sqrt", x).unwrap();
    /// assert_eq!(model.function(sqrt).unwrap().call(16.0), 4.0);
    ///
    /// assert!(matches!(model.add_builtin("gamma", x), Err(Error::NameError(_))));
    /// ```
    pub fn add_builtin(&mut self, name: &str, variable: VarId) -> Result<FuncId, Error> {
        let function = *FUNCTIONS
            .get(name)
            .ok_or_else(|| Error::NameError(format!("function '{}' is not defined", name)))?;
        self.add_function(name, function, variable)
    }

    /// Get the variable behind `id`.
    ///
    /// Fails with `NameError` if `id` was created by another model.
    pub fn variable(&self, id: VarId) -> Result<&Variable, Error> {
        self.check_owner("variable", id.model, id.index)?;
        self.variables
            .get(id.index)
            .ok_or_else(|| undefined_entry("variable", id.index))
    }

    /// Get a mutable reference to the variable behind `id`
    pub fn variable_mut(&mut self, id: VarId) -> Result<&mut Variable, Error> {
        self.check_owner("variable", id.model, id.index)?;
        self.variables
            .get_mut(id.index)
            .ok_or_else(|| undefined_entry("variable", id.index))
    }

    /// Get the wrapped function behind `id`.
    ///
    /// Fails with `NameError` if `id` was created by another model.
    pub fn function(&self, id: FuncId) -> Result<&WrappedFunction, Error> {
        self.check_owner("function", id.model, id.index)?;
        self.functions
            .get(id.index)
            .ok_or_else(|| undefined_entry("function", id.index))
    }

    fn check_owner(&self, kind: &str, model: usize, index: usize) -> Result<(), Error> {
        if model == self.id {
            return Ok(());
        }
        Err(Error::NameError(format!(
            "{} #{} belongs to another model",
            kind, index
        )))
    }

    /// Find the first variable registered under `name`
    #[must_use]
    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|variable| variable.name() == name)
            .map(|index| VarId::new(self.id, index))
    }

    /// Iterate over all the variables and their handles, in registration
    /// order
    pub fn variables(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        let model = self.id;
        self.variables
            .iter()
            .enumerate()
            .map(move |(i, variable)| (VarId::new(model, i), variable))
    }

    /// Set the current value of `id`, checking its bounds
    pub fn set_value(&mut self, id: VarId, value: f64) -> Result<(), Error> {
        let variable = self.variable_mut(id)?;
        variable.set_value(value)?;
        debug!("set '{}' to {}", variable.name(), value);
        Ok(())
    }

    /// Collect the current values of the variables that have one, keyed by
    /// name. When several variables share a name, the last registered one
    /// with a value wins.
    #[must_use]
    pub fn current_values(&self) -> HashMap<String, f64> {
        self.variables
            .iter()
            .filter_map(|variable| {
                variable
                    .value()
                    .map(|value| (variable.name().to_owned(), value))
            })
            .collect()
    }

    /// Evaluate `expr` with the given `values`
    pub fn evaluate<'a, C>(&self, expr: &Expression, values: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        expr.evaluate(self, values)
    }

    /// Collect the names of the variables appearing in `expr`, see
    /// [`Expression::variables`](struct.Expression.html#method.variables)
    #[must_use]
    pub fn variables_of<'a>(&'a self, expr: &Expression) -> HashSet<&'a str> {
        expr.variables(self)
    }

    /// Evaluate `expr` with the current values of the variables, see
    /// [`current_values`](#method.current_values)
    pub fn evaluate_current(&self, expr: &Expression) -> Result<f64, Error> {
        expr.evaluate(self, &self.current_values())
    }

    /// Display `expr` with the names of this model
    #[must_use]
    pub fn display<'a>(&'a self, expr: &'a Expression) -> ExpressionDisplay<'a> {
        expr.display(self)
    }
}

fn undefined_entry(kind: &str, index: usize) -> Error {
    Error::NameError(format!("{} #{} is not defined in this model", kind, index))
}
