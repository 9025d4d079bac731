//! Engine tunables that can be overridden from environment variables.
//!
//! An `EnvParam` couples the name of an environment variable with the textual default used when the
//! variable is absent. The value is resolved lazily, on first access, and is then frozen for the rest
//! of the process.
//!
//! ```
//! use env_param::EnvParam;
//! static TOLERANCE: EnvParam<f64> = EnvParam::new("DOC_TOLERANCE", "0.5");
//!
//! // environment variable not set, the default is used
//! assert_eq!(TOLERANCE.get(), 0.5);
//! ```
//!
//! A parameter may also be fixed programmatically, as long as nobody read it before:
//!
//! ```
//! use env_param::{EnvParam, ParamError};
//! static DIGITS: EnvParam<usize> = EnvParam::new("DOC_DIGITS", "4");
//!
//! DIGITS.set(2).unwrap();
//! assert_eq!(DIGITS.get(), 2);
//! assert_eq!(DIGITS.set(3), Err(ParamError::AlreadyInitialized("DOC_DIGITS")));
//! ```

use std::str::FromStr;

use once_cell::sync::OnceCell;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("parameter {0} is already initialized (it was set or read before)")]
    AlreadyInitialized(&'static str),
}

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Declares a parameter read from the environment variable `env`, falling back to `default`.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn name(&self) -> &'static str {
        self.env
    }

    /// Returns true if the value has already been resolved.
    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(v) => v,
            // the default is a literal in the source code, failing here is a programming error
            Err(_) => panic!("[env_param] {}: invalid default value \"{}\"", self.env, self.default),
        }
    }

    fn resolve(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => match T::from_str(raw.trim()) {
                Ok(value) => {
                    tracing::debug!(param = self.env, value = %raw, "parameter read from environment");
                    value
                }
                Err(_) => {
                    tracing::warn!(
                        param = self.env,
                        value = %raw,
                        default = self.default,
                        "could not parse environment value, using default"
                    );
                    self.parse_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!(param = self.env, error = %err, default = self.default, "using default");
                self.parse_default()
            }
        }
    }

    /// Returns the value of the parameter, resolving it on first call.
    ///
    /// # Panic
    /// Panics if the environment variable is absent or invalid and the default cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    /// Same as [`EnvParam::get`] for parameters that are not `Copy`.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.resolve())
    }

    /// Fixes the value of the parameter, ignoring the environment.
    pub fn set(&self, value: T) -> Result<(), ParamError> {
        self.value.set(value).map_err(|_| ParamError::AlreadyInitialized(self.env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_used_when_absent() {
        static P: EnvParam<u32> = EnvParam::new("ENV_PARAM_TEST_ABSENT", "7");
        assert!(!P.is_initialized());
        assert_eq!(P.get(), 7);
        assert!(P.is_initialized());
    }

    #[test]
    fn set_before_read() {
        static P: EnvParam<f64> = EnvParam::new("ENV_PARAM_TEST_SET", "1.5");
        assert_eq!(P.set(2.5), Ok(()));
        assert_eq!(P.get(), 2.5);
        assert!(P.set(3.0).is_err());
        assert_eq!(P.name(), "ENV_PARAM_TEST_SET");
    }

    #[test]
    fn non_copy_values() {
        static P: EnvParam<String> = EnvParam::new("ENV_PARAM_TEST_STRING", "abc");
        assert_eq!(P.get_ref(), "abc");
    }

    #[test]
    #[should_panic]
    fn invalid_default() {
        static P: EnvParam<u8> = EnvParam::new("ENV_PARAM_TEST_INVALID", "not-a-number");
        P.get();
    }
}
