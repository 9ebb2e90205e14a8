//! Filter expression grammar.
//!
//! A filter is a comma-separated list of clauses, each `<field><op><value>`:
//!
//! | Operator | Meaning |
//! |---|---|
//! | `=` / `!=` | equal / not equal (`null` tests for absence) |
//! | `<` `<=` `>` `>=` | ordered comparison |
//! | `~=` | case-insensitive substring |
//! | `\|=` | membership, value is `a\|b\|c` |
//!
//! There is no escaping: a `,` always ends a clause and the first operator
//! character always ends the field name. Values may contain operator
//! characters, since everything after the operator is taken verbatim.

use std::fmt;

/// One clause split into its raw parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterExpression {
    /// The parsed operator, or `None` when the clause has no usable one.
    #[must_use]
    pub fn filter_operator(&self) -> Option<FilterOperator> {
        FilterOperator::parse(&self.operator)
    }
}

/// Comparison operators of the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `~=`
    Contains,
    /// `|=`
    In,
}

impl FilterOperator {
    #[must_use]
    pub fn parse(operator: &str) -> Option<Self> {
        match operator {
            "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "~=" => Some(Self::Contains),
            "|=" => Some(Self::In),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Contains => "~=",
            Self::In => "|=",
        }
    }

    /// `<`, `<=`, `>` and `>=`, which have no meaning against `null`.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
enum ScanState {
    Name,
    Operator,
    Value,
}

const fn starts_operator(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>' | '~' | '|')
}

/// Split one clause into field, operator and value.
///
/// An empty clause, or one without any operator character, leaves the
/// operator and value empty.
#[must_use]
pub fn parse_filter_exp(clause: &str) -> FilterExpression {
    let mut parsed = FilterExpression::default();
    let mut state = ScanState::Name;

    for c in clause.chars() {
        match state {
            ScanState::Name => {
                if starts_operator(c) {
                    parsed.operator.push(c);
                    state = ScanState::Operator;
                } else {
                    parsed.field.push(c);
                }
            }
            ScanState::Operator => {
                if c == '=' {
                    parsed.operator.push(c);
                } else {
                    parsed.value.push(c);
                }
                state = ScanState::Value;
            }
            ScanState::Value => parsed.value.push(c),
        }
    }

    parsed
}

/// Split a whole filter on `,` and parse each clause.
#[must_use]
pub fn split_filters(filter: &str) -> Vec<FilterExpression> {
    filter.split(',').map(parse_filter_exp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(clause: &str) -> (String, String, String) {
        let parsed = parse_filter_exp(clause);
        (parsed.field, parsed.operator, parsed.value)
    }

    fn owned(field: &str, operator: &str, value: &str) -> (String, String, String) {
        (field.to_string(), operator.to_string(), value.to_string())
    }

    #[test]
    fn test_single_and_double_character_operators() {
        assert_eq!(parts("name=value"), owned("name", "=", "value"));
        assert_eq!(parts("name>=value"), owned("name", ">=", "value"));
        assert_eq!(parts("name<=5"), owned("name", "<=", "5"));
        assert_eq!(parts("name!=x"), owned("name", "!=", "x"));
        assert_eq!(parts("name~=ab"), owned("name", "~=", "ab"));
        assert_eq!(parts("age<18"), owned("age", "<", "18"));
        assert_eq!(parts("age>18"), owned("age", ">", "18"));
    }

    #[test]
    fn test_membership_value_keeps_pipes() {
        assert_eq!(parts("a|=b|c"), owned("a", "|=", "b|c"));
    }

    #[test]
    fn test_value_is_taken_verbatim() {
        assert_eq!(parts("a=b=c"), owned("a", "=", "b=c"));
        assert_eq!(parts("a~=x>y "), owned("a", "~=", "x>y "));
        assert_eq!(parts(" a = b"), owned(" a ", "=", " b"));
    }

    #[test]
    fn test_empty_clause_yields_empty_parts() {
        assert_eq!(parse_filter_exp(""), FilterExpression::default());
    }

    #[test]
    fn test_clause_without_operator_has_no_operator() {
        let parsed = parse_filter_exp("justaname");
        assert_eq!(parsed.field, "justaname");
        assert!(parsed.operator.is_empty());
        assert_eq!(parsed.filter_operator(), None);
    }

    #[test]
    fn test_lone_bang_or_tilde_is_not_an_operator() {
        let parsed = parse_filter_exp("name!x");
        assert_eq!(parsed.operator, "!");
        assert_eq!(parsed.value, "x");
        assert_eq!(parsed.filter_operator(), None);
        assert_eq!(parse_filter_exp("name~x").filter_operator(), None);
    }

    #[test]
    fn test_operator_round_trip() {
        for op in ["=", "!=", "<", "<=", ">", ">=", "~=", "|="] {
            let parsed = FilterOperator::parse(op).unwrap();
            assert_eq!(parsed.as_str(), op);
            assert_eq!(parsed.to_string(), op);
        }
        assert!(FilterOperator::Ge.is_ordered());
        assert!(!FilterOperator::In.is_ordered());
    }

    #[test]
    fn test_split_filters() {
        let clauses = split_filters("status=ACTIVE,age>=18");
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].field, "status");
        assert_eq!(clauses[1].operator, ">=");
        assert_eq!(clauses[1].value, "18");
    }
}
