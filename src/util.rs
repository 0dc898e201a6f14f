use hashbrown::HashMap;

lazy_static! {
    /// Built-in unary functions that can be wrapped around a variable by name
    pub static ref FUNCTIONS: HashMap<String, fn(f64) -> f64> = {
        let mut map = HashMap::<String, fn(f64) -> f64>::new();
        map.insert("sqrt".into(), libm::sqrt);
        map.insert("cbrt".into(), libm::cbrt);
        map.insert("sin".into(), libm::sin);
        map.insert("cos".into(), libm::cos);
        map.insert("tan".into(), libm::tan);
        map.insert("asin".into(), libm::asin);
        map.insert("acos".into(), libm::acos);
        map.insert("atan".into(), libm::atan);
        map.insert("sinh".into(), libm::sinh);
        map.insert("cosh".into(), libm::cosh);
        map.insert("tanh".into(), libm::tanh);
        map.insert("asinh".into(), libm::asinh);
        map.insert("acosh".into(), libm::acosh);
        map.insert("atanh".into(), libm::atanh);
        map.insert("floor".into(), libm::floor);
        map.insert("ceil".into(), libm::ceil);
        map.insert("abs".into(), libm::fabs);
        map.insert("exp".into(), libm::exp);
        map.insert("ln".into(), libm::log);
        map.insert("log2".into(), libm::log2);
        map.insert("log10".into(), libm::log10);
        map.shrink_to_fit();
        map
    };
}

#[must_use]
/// Check if `ident` is a valid variable name
///
/// # Examples
///
/// ```
/// # use modelexpr::is_variable;
///
/// assert_eq!(is_variable("__abc3"), true);
/// assert_eq!(is_variable("34zb"), false);
/// assert_eq!(is_variable(""), false);
/// ```
pub fn is_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    if !chars.next().map_or(false, is_variable_start) {
        return false;
    }
    chars.all(is_variable_part)
}

/// Check if `c` can appear at the first character of a variable
fn is_variable_start(c: char) -> bool {
    c == '_' || (c.is_ascii() && c.is_alphabetic())
}

/// Check if `c` can appear inside a variable
fn is_variable_part(c: char) -> bool {
    c == '.' || c == '_' || c == '[' || c == ']' || (c.is_ascii() && c.is_alphanumeric())
}
