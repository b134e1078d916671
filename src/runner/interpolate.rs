//! Variable interpolation for strings
//!
//! This module handles parsing and replacing variables in strings using the ${var} syntax.

use crate::error::{InterpolationError, InterpolationResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::sync::LazyLock;

static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid interpolation pattern"));

/// Passes after which a still-changing string counts as self-referential
const MAX_DEPTH: usize = 32;

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from context
/// - Environment variables (when not found in context)
///
/// Unknown names are left in place so the shell can still expand them.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let mut result = s.to_string();

    // Values may themselves reference variables
    for _ in 0..MAX_DEPTH {
        let mut changed = false;

        let next = VAR_PATTERN
            .replace_all(&result, |caps: &Captures| match lookup(&caps[1], vars) {
                Some(value) => {
                    changed = true;
                    value
                }
                None => caps[0].to_string(),
            })
            .into_owned();

        if !changed {
            return Ok(next);
        }
        result = next;
    }

    Err(InterpolationError::RecursiveInterpolation)
}

/// Interpolate with strict mode - errors on undefined variables
pub fn interpolate_strict(
    s: &str,
    vars: &HashMap<String, String>,
) -> InterpolationResult<String> {
    let result = interpolate(s, vars)?;

    if let Some(caps) = VAR_PATTERN.captures(&result) {
        return Err(InterpolationError::UndefinedVariable(caps[1].to_string()));
    }

    Ok(result)
}

/// Interpolate a list of strings
pub fn interpolate_list(
    list: &[String],
    vars: &HashMap<String, String>,
) -> InterpolationResult<Vec<String>> {
    list.iter().map(|s| interpolate(s, vars)).collect()
}

fn lookup(name: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(name).cloned().or_else(|| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "world".to_string());

        let result = interpolate("Hello, ${name}!", &vars).unwrap();
        assert_eq!(result, "Hello, world!");
    }

    #[test]
    fn test_repeated_variable() {
        let mut vars = HashMap::new();
        vars.insert("app".to_string(), "freedit".to_string());

        let result = interpolate("${app}/${app}.db", &vars).unwrap();
        assert_eq!(result, "freedit/freedit.db");
    }

    #[test]
    fn test_environment_variable() {
        env::set_var("TEST_VAR_RUNDOWN", "test_value");

        let vars = HashMap::new();
        let result = interpolate("Value: ${TEST_VAR_RUNDOWN}", &vars).unwrap();
        assert_eq!(result, "Value: test_value");

        env::remove_var("TEST_VAR_RUNDOWN");
    }

    #[test]
    fn test_vars_shadow_environment() {
        env::set_var("TEST_SHADOWED_RUNDOWN", "from-env");

        let mut vars = HashMap::new();
        vars.insert("TEST_SHADOWED_RUNDOWN".to_string(), "from-vars".to_string());
        let result = interpolate("${TEST_SHADOWED_RUNDOWN}", &vars).unwrap();
        assert_eq!(result, "from-vars");

        env::remove_var("TEST_SHADOWED_RUNDOWN");
    }

    #[test]
    fn test_undefined_variable_lenient() {
        let vars = HashMap::new();
        let result = interpolate("Hello, ${undefined_rundown_var}!", &vars).unwrap();
        assert_eq!(result, "Hello, ${undefined_rundown_var}!");
    }

    #[test]
    fn test_undefined_variable_strict() {
        let vars = HashMap::new();
        let result = interpolate_strict("Hello, ${undefined_rundown_var}!", &vars);
        assert!(matches!(
            result,
            Err(InterpolationError::UndefinedVariable(ref name)) if name == "undefined_rundown_var"
        ));
    }

    #[test]
    fn test_nested_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("inner".to_string(), "value".to_string());
        vars.insert("outer".to_string(), "${inner}".to_string());

        let result = interpolate("Result: ${outer}", &vars).unwrap();
        assert_eq!(result, "Result: value");
    }

    #[test]
    fn test_recursive_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("loop".to_string(), "again ${loop}".to_string());

        let result = interpolate("${loop}", &vars);
        assert!(matches!(
            result,
            Err(InterpolationError::RecursiveInterpolation)
        ));
    }

    #[test]
    fn test_interpolate_list() {
        let mut vars = HashMap::new();
        vars.insert("profile".to_string(), "release".to_string());

        let list = vec!["--${profile}".to_string(), "static".to_string()];

        let result = interpolate_list(&list, &vars).unwrap();
        assert_eq!(result, vec!["--release", "static"]);
    }

    #[test]
    fn test_empty_variable_name() {
        let vars = HashMap::new();
        let result = interpolate("Value: ${}", &vars).unwrap();
        assert_eq!(result, "Value: ${}");
    }
}
