use regex::Regex;
use tracing::warn;

use crate::config::ExclusionConfig;

/// Generic role-account local-parts that never identify a person.
const ROLE_PREFIXES: &[&str] = &[
    "sales",
    "ventas",
    "info",
    "admin",
    "administracion",
    "support",
    "soporte",
    "noreply",
    "no-reply",
    "no_reply",
    "contact",
    "contacto",
    "hello",
    "hola",
    "marketing",
    "facturacion",
];

/// Which rule set dropped an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Matched the built-in role-account list
    RolePrefix,
    /// Matched a user-supplied pattern
    CustomPattern,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::RolePrefix => "exclusion filter: role prefix",
            ExclusionReason::CustomPattern => "exclusion filter: custom pattern",
        }
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides, from the local-part alone, whether an address is dropped
/// before classification and merge. Role-list and custom-list checks are
/// independent; either one excludes.
#[derive(Debug)]
pub struct ExclusionFilter {
    use_role_list: bool,
    custom_patterns: Vec<String>,
    /// Compiled custom patterns; None means literal-prefix matching,
    /// either by configuration or after a failed compile.
    custom_regexes: Option<Vec<Regex>>,
}

impl ExclusionFilter {
    pub fn new(config: &ExclusionConfig) -> Self {
        let custom_regexes = if config.use_regex {
            Self::compile_patterns(&config.custom_patterns)
        } else {
            None
        };
        Self {
            use_role_list: config.use_role_list,
            custom_patterns: config.custom_patterns.clone(),
            custom_regexes,
        }
    }

    /// Compiles every custom pattern up front. One invalid pattern
    /// downgrades the whole custom list to literal matching; the role
    /// list is unaffected.
    fn compile_patterns(patterns: &[String]) -> Option<Vec<Regex>> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            match Regex::new(pattern) {
                Ok(regex) => compiled.push(regex),
                Err(e) => {
                    warn!(
                        pattern = %pattern,
                        "Invalid custom exclusion regex, falling back to literal matching: {}",
                        e
                    );
                    return None;
                }
            }
        }
        Some(compiled)
    }

    /// Returns the reason an address must be dropped, or None to keep it.
    pub fn evaluate(&self, local_part: &str) -> Option<ExclusionReason> {
        if self.use_role_list
            && ROLE_PREFIXES
                .iter()
                .any(|p| matches_literal_prefix(local_part, p))
        {
            return Some(ExclusionReason::RolePrefix);
        }

        let custom_hit = match &self.custom_regexes {
            Some(regexes) => regexes.iter().any(|r| r.is_match(local_part)),
            None => self
                .custom_patterns
                .iter()
                .any(|p| matches_literal_prefix(local_part, p)),
        };
        if custom_hit {
            return Some(ExclusionReason::CustomPattern);
        }
        None
    }
}

/// Literal match: the prefix alone, or the prefix followed by a
/// plus-address or dotted subaddress.
fn matches_literal_prefix(local_part: &str, prefix: &str) -> bool {
    if local_part == prefix {
        return true;
    }
    local_part
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('+') || rest.starts_with('.'))
}
