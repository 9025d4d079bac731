use env_param::EnvParam;

/// Tolerance used by the `=` and `!=` comparisons of numeric expressions.
pub static NUMERIC_EPSILON: EnvParam<f64> = EnvParam::new("PLAN_SEMANTICS_EPSILON", "0.0001");

/// Number of decimal digits kept when displaying numbers (expressions, fluents, states).
pub static DECIMAL_DIGITS: EnvParam<usize> = EnvParam::new("PLAN_SEMANTICS_DECIMAL_DIGITS", "4");

pub fn epsilon() -> f64 {
    NUMERIC_EPSILON.get()
}

pub fn decimal_digits() -> usize {
    DECIMAL_DIGITS.get()
}
