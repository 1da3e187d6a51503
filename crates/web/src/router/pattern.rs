//! Matching of `"METHOD /path"` candidates against route templates.
//!
//! A template such as `/users/:id/posts/:post` is compiled into an anchored regex over
//! the whole candidate, `^GET /users/([^/]+)/posts/([^/]+)$`, plus the placeholder names
//! in left-to-right order. Literal segments are escaped, so they only ever match
//! themselves byte for byte.

use std::collections::HashMap;

use http::Method;
use regex::Regex;

use crate::router::RouterError;

/// Stands in for one placeholder: a non-empty run of anything but `/`.
const PLACEHOLDER_PATTERN: &str = "([^/]+)";

#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles the pattern for `template` registered under `method`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidTemplate`] if `template` does not start with `/`.
    pub fn new(method: &Method, template: &str) -> Result<Self, RouterError> {
        if !template.starts_with('/') {
            return Err(RouterError::invalid_template(template, "must start with '/'"));
        }

        let mut pattern = String::with_capacity(template.len() * 2 + method.as_str().len() + 3);
        let mut param_names = Vec::new();

        pattern.push('^');
        pattern.push_str(&regex::escape(method.as_str()));
        pattern.push(' ');
        for (i, segment) in template.split('/').enumerate() {
            if i > 0 {
                pattern.push('/');
            }
            match placeholder_name(segment) {
                Some(name) => {
                    pattern.push_str(PLACEHOLDER_PATTERN);
                    param_names.push(name.to_string());
                }
                None => pattern.push_str(&regex::escape(segment)),
            }
        }
        pattern.push('$');

        Ok(Self { regex: Regex::new(&pattern)?, param_names })
    }

    /// Placeholder names, in the order they appear in the template.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Matches `method` + `path` and returns the captured placeholder values by name.
    ///
    /// Captured segments are returned as sent, without percent-decoding.
    pub fn matches(&self, method: &Method, path: &str) -> Option<HashMap<String, String>> {
        let candidate = format!("{method} {path}");
        let captures = self.regex.captures(&candidate)?;

        let params = self
            .param_names
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, value)| value.map(|value| (name.clone(), value.as_str().to_string())))
            .collect();
        Some(params)
    }
}

/// Returns the name of a `:name` segment.
fn placeholder_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix(':')?;
    let is_word = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    is_word.then_some(name)
}
