//! Store-agnostic predicate tree and its sea-query backend.
//!
//! Filters and free-text search build a [`Predicate`]; only this module knows
//! how that turns into a `sea_orm::Condition`.

use sea_orm::{
    Condition, Value,
    sea_query::{Alias, BinOper, Expr, Func, SimpleExpr},
};

/// Escape LIKE wildcards so user text only ever matches literally.
/// Escapes: % (match any) and _ (match single char)
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// A boolean condition over the columns of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(&'static str, Value),
    NotEquals(&'static str, Value),
    IsNull(&'static str),
    IsNotNull(&'static str),
    LessThan(&'static str, Value),
    LessOrEqual(&'static str, Value),
    GreaterThan(&'static str, Value),
    GreaterOrEqual(&'static str, Value),
    /// Case-insensitive substring match.
    Contains(&'static str, String),
    In(&'static str, Vec<Value>),
    /// Matches no row; stands in for an empty remote lookup.
    MatchNothing,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// The predicate that matches every row.
    #[must_use]
    pub const fn always() -> Self {
        Self::And(Vec::new())
    }

    #[must_use]
    pub const fn is_always(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    /// Membership test; an empty candidate list matches nothing.
    #[must_use]
    pub fn one_of(column: &'static str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            Self::MatchNothing
        } else {
            Self::In(column, values)
        }
    }

    /// Conjunction that drops always-true children and unwraps single ones.
    #[must_use]
    pub fn all(children: Vec<Self>) -> Self {
        let mut children: Vec<Self> = children
            .into_iter()
            .filter(|child| !child.is_always())
            .collect();
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::And(children)
        }
    }

    /// Disjunction; with no children it matches nothing.
    #[must_use]
    pub fn any(mut children: Vec<Self>) -> Self {
        match children.len() {
            0 => Self::MatchNothing,
            1 => children.remove(0),
            _ => Self::Or(children),
        }
    }

    /// Compile into a sea-query condition.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        match self {
            Self::And(children) => children
                .into_iter()
                .filter(|child| !child.is_always())
                .fold(Condition::all(), |condition, child| {
                    condition.add(child.into_condition())
                }),
            Self::Or(children) if children.is_empty() => Condition::all().add(match_nothing()),
            Self::Or(children) => children
                .into_iter()
                .fold(Condition::any(), |condition, child| {
                    condition.add(child.into_condition())
                }),
            leaf => Condition::all().add(leaf.into_leaf_expr()),
        }
    }

    fn into_leaf_expr(self) -> SimpleExpr {
        match self {
            Self::Equals(column, value) => col(column).eq(value),
            Self::NotEquals(column, value) => col(column).ne(value),
            Self::IsNull(column) => col(column).is_null(),
            Self::IsNotNull(column) => col(column).is_not_null(),
            Self::LessThan(column, value) => col(column).lt(value),
            Self::LessOrEqual(column, value) => col(column).lte(value),
            Self::GreaterThan(column, value) => col(column).gt(value),
            Self::GreaterOrEqual(column, value) => col(column).gte(value),
            Self::Contains(column, text) => contains_ignore_case(column, &text),
            Self::In(column, values) if !values.is_empty() => col(column).is_in(values),
            Self::In(..) | Self::MatchNothing | Self::Or(_) => match_nothing(),
            Self::And(_) => Expr::val(1).eq(1),
        }
    }
}

fn col(column: &'static str) -> Expr {
    Expr::col(Alias::new(column))
}

fn match_nothing() -> SimpleExpr {
    Expr::val(1).eq(0)
}

/// `UPPER(column) LIKE UPPER('%text%') ESCAPE '\'`
///
/// Both sides are folded by the store.
#[must_use]
pub fn contains_ignore_case(column: &'static str, text: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(text));
    let escaped = SimpleExpr::Binary(
        Box::new(Func::upper(Expr::val(pattern)).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('\\'.into())),
    );
    Expr::expr(Func::upper(col(column))).binary(BinOper::Like, escaped)
}
