use sea_orm::Order;

/// One parsed sort token: the field name and its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortToken {
    pub field: String,
    pub order: Order,
}

/// Parse one sort token.
///
/// `+name` and ` name` sort ascending, `-name` descending. Anything else
/// yields `None`; a bare `name` is deliberately not treated as ascending.
#[must_use]
pub fn parse_sort_token(token: &str) -> Option<SortToken> {
    let (order, field) = if let Some(field) = token.strip_prefix('+') {
        (Order::Asc, field)
    } else if let Some(field) = token.strip_prefix(' ') {
        (Order::Asc, field)
    } else if let Some(field) = token.strip_prefix('-') {
        (Order::Desc, field)
    } else {
        return None;
    };

    Some(SortToken {
        field: field.to_string(),
        order,
    })
}

/// Parse every token, dropping the ones without a direction prefix.
#[must_use]
pub fn parse_sorting<S: AsRef<str>>(tokens: &[S]) -> Vec<SortToken> {
    tokens
        .iter()
        .filter_map(|token| {
            let parsed = parse_sort_token(token.as_ref());
            if parsed.is_none() {
                tracing::debug!(token = token.as_ref(), "Ignoring sort token without direction");
            }
            parsed
        })
        .collect()
}
