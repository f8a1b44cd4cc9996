//! Cursor pagination: page size, pagination rules derived from a token, and
//! the parameters of the following page.

use crate::{
    error::TokenError, Comparison, Direction, Filter, PaginationToken, Sort, ValidationError,
};

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "_limit";
/// Query parameter carrying the continuation token.
pub const TOKEN_PARAM: &str = "_token";

/// Disjunction of filter conjunctions: a record is after the token's
/// reference point if it matches any one rule.
pub type PaginationRules = Vec<Vec<Filter>>;

/// Build the rules selecting records strictly after the token in `sorting`
/// order.
///
/// For every prefix of the sort order, from the longest down, the rule pins
/// all but the last key to the token's values and bounds the last key
/// strictly past its value. With `(a desc, b asc)` and a token `{a: 5, b: 10}`
/// this gives `[{a = 5, b > 10}, {a < 5}]`.
pub fn build_pagination_rules(
    sorting: &[Sort],
    token: &PaginationToken,
) -> Result<PaginationRules, TokenError> {
    let mut rules = Vec::with_capacity(sorting.len());

    for end in (1..=sorting.len()).rev() {
        let (pinned, bound) = sorting[..end].split_at(end - 1);
        let mut rule = Vec::with_capacity(end);

        for sort in pinned {
            rule.push(Filter::eq(sort.field.clone(), token_value(token, sort)?));
        }

        let last = &bound[0];
        let operator = match last.direction {
            Direction::Descending => Comparison::Lt,
            Direction::Ascending => Comparison::Gt,
        };
        rule.push(Filter::new(last.field.clone(), token_value(token, last)?, operator));

        rules.push(rule);
    }

    Ok(rules)
}

fn token_value(token: &PaginationToken, sort: &Sort) -> Result<serde_json::Value, TokenError> {
    token
        .get(&sort.field)
        .cloned()
        .ok_or_else(|| TokenError::MissingField(sort.field.clone()))
}

fn param<'a, K, V>(params: &'a [(K, V)], name: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .rev()
        .find(|(key, _)| key.as_ref().trim() == name)
        .map(|(_, value)| value.as_ref())
}

/// Page size from `_limit`, falling back to `default`.
pub fn extract_limit<K, V>(
    params: &[(K, V)],
    default: Option<usize>,
) -> Result<Option<usize>, ValidationError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    match param(params, LIMIT_PARAM) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(Some(limit)),
            _ => Err(ValidationError::querystring(
                LIMIT_PARAM,
                "_limit should be a positive integer",
            )),
        },
    }
}

/// Pagination parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub rules: PaginationRules,
    pub limit: Option<usize>,
}

/// Read `_limit` and `_token` and derive the pagination rules for `sorting`.
pub fn extract_pagination<K, V>(
    params: &[(K, V)],
    sorting: &[Sort],
    default_limit: Option<usize>,
) -> Result<Pagination, ValidationError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let limit = extract_limit(params, default_limit)?;

    let rules = match param(params, TOKEN_PARAM) {
        Some(raw) if !raw.trim().is_empty() => PaginationToken::decode(raw)
            .and_then(|token| build_pagination_rules(sorting, &token))
            .map_err(|e| {
                tracing::debug!(error = %e, "rejecting pagination token");
                ValidationError::querystring(TOKEN_PARAM, "_token should be valid base64 JSON encoded")
            })?,
        _ => Vec::new(),
    };

    Ok(Pagination { rules, limit })
}

/// Query parameters leading to the page after the current one.
///
/// Every parameter of the current request is kept, with `_limit` and
/// `_token` replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPage {
    params: Vec<(String, String)>,
    token: String,
}

impl NextPage {
    pub fn new<K, V>(current: &[(K, V)], limit: usize, token: String) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params: Vec<(String, String)> = current
            .iter()
            .filter(|(key, _)| {
                let key = key.as_ref().trim();
                key != LIMIT_PARAM && key != TOKEN_PARAM
            })
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
            .collect();
        params.push((LIMIT_PARAM.to_string(), limit.to_string()));
        params.push((TOKEN_PARAM.to_string(), token.clone()));

        Self { params, token }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
