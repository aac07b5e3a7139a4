use std::fmt;

/// Particle-type selection applied while decoding atom rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Keep every row regardless of its type column.
    #[default]
    Any,
    /// Keep only rows whose integer type is one of the listed values.
    Only(Vec<i64>),
}

impl TypeFilter {
    pub fn only(atom_type: i64) -> Self {
        Self::Only(vec![atom_type])
    }

    pub fn any_of(types: impl IntoIterator<Item = i64>) -> Self {
        let types: Vec<i64> = types.into_iter().collect();
        if types.is_empty() {
            Self::Any
        } else {
            Self::Only(types)
        }
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    #[inline]
    pub fn matches(&self, atom_type: i64) -> bool {
        match self {
            Self::Any => true,
            Self::Only(types) => types.contains(&atom_type),
        }
    }

    /// Parses a type token, tolerating float-encoded integers (`"3.0"`).
    ///
    /// The value is truncated toward zero, so `"2.9"` reads as type 2.
    pub fn parse_type_token(token: &str) -> Option<i64> {
        if let Ok(t) = token.parse::<i64>() {
            return Some(t);
        }
        let value = token.parse::<f64>().ok()?;
        if value.is_finite() {
            Some(value.trunc() as i64)
        } else {
            None
        }
    }

    /// Returns `true` when the token parses and passes the filter.
    pub fn accepts_token(&self, token: &str) -> bool {
        Self::parse_type_token(token).is_some_and(|t| self.matches(t))
    }
}

impl From<Option<i64>> for TypeFilter {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(t) => Self::only(t),
            None => Self::Any,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Only(types) => {
                let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_everything() {
        let filter = TypeFilter::Any;
        assert!(filter.matches(1));
        assert!(filter.matches(-7));
        assert!(filter.is_any());
    }

    #[test]
    fn only_matches_listed_types() {
        let filter = TypeFilter::any_of([1, 2]);
        assert!(filter.matches(1));
        assert!(filter.matches(2));
        assert!(!filter.matches(3));
    }

    #[test]
    fn empty_list_collapses_to_any() {
        assert_eq!(TypeFilter::any_of(Vec::new()), TypeFilter::Any);
    }

    #[test]
    fn float_encoded_type_tokens() {
        assert_eq!(TypeFilter::parse_type_token("3"), Some(3));
        assert_eq!(TypeFilter::parse_type_token("3.0"), Some(3));
        assert_eq!(TypeFilter::parse_type_token("2.9"), Some(2));
        assert_eq!(TypeFilter::parse_type_token("N"), None);
        assert_eq!(TypeFilter::parse_type_token("nan"), None);
    }

    #[test]
    fn accepts_token_combines_parse_and_match() {
        let filter = TypeFilter::only(3);
        assert!(filter.accepts_token("3.0"));
        assert!(!filter.accepts_token("1"));
        assert!(!filter.accepts_token("x"));
    }

    #[test]
    fn display_lists_types() {
        assert_eq!(TypeFilter::Any.to_string(), "any");
        assert_eq!(TypeFilter::any_of([1, 2]).to_string(), "1,2");
    }
}
