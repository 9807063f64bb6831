//! `search` and `ordering` query parameters shared by every list endpoint.

use regex::Regex;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{Condition, EntityTrait, Order, QueryFilter, QueryOrder, Select};
use serde::Deserialize;
use utoipa::IntoParams;

lazy_static::lazy_static! {
    static ref TERM_SEPARATOR: Regex = Regex::new(r"[\s,]+").unwrap();
}

const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive text search. Every whitespace or comma separated term must match.
    pub search: Option<String>,
    /// `id`, `name`, `-id` or `-name`; several fields may be comma separated.
    pub ordering: Option<String>,
}

impl ListQuery {
    pub fn search_terms(&self) -> Vec<String> {
        self.search.as_deref().map(search_terms).unwrap_or_default()
    }

    pub fn ordering(&self) -> Vec<(OrderField, Order)> {
        parse_ordering(self.ordering.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    Name,
}

impl OrderField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(OrderField::Id),
            "name" => Some(OrderField::Name),
            _ => None,
        }
    }
}

/// Entities that can be sorted by the public ordering fields.
pub trait Orderable: EntityTrait {
    fn order_column(field: OrderField) -> Self::Column;
}

/// Lowercased search terms, split on whitespace and commas. NUL characters are dropped.
pub fn search_terms(raw: &str) -> Vec<String> {
    let raw = raw.replace('\0', "");
    TERM_SEPARATOR
        .split(&raw)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Parses `ordering`, dropping unknown or repeated fields and appending `id` as tie-breaker.
pub fn parse_ordering(raw: Option<&str>) -> Vec<(OrderField, Order)> {
    let mut fields: Vec<(OrderField, Order)> = Vec::new();

    for token in raw.unwrap_or_default().split(',').map(str::trim) {
        let (name, order) = match token.strip_prefix('-') {
            Some(rest) => (rest, Order::Desc),
            None => (token, Order::Asc),
        };
        let Some(field) = OrderField::parse(name) else {
            continue;
        };
        if fields.iter().all(|(existing, _)| *existing != field) {
            fields.push((field, order));
        }
    }

    if fields.iter().all(|(field, _)| *field != OrderField::Id) {
        fields.push((OrderField::Id, Order::Asc));
    }
    fields
}

pub fn apply_ordering<E>(select: Select<E>, ordering: &[(OrderField, Order)]) -> Select<E>
where
    E: Orderable,
{
    ordering.iter().fold(select, |select, (field, order)| {
        select.order_by(E::order_column(*field), order.clone())
    })
}

/// ANDs one condition per term, each built by `term_condition`. No terms, no filter.
pub fn apply_search<E, F>(select: Select<E>, terms: &[String], term_condition: F) -> Select<E>
where
    E: EntityTrait,
    F: Fn(&str) -> Condition,
{
    if terms.is_empty() {
        return select;
    }
    let condition = terms
        .iter()
        .fold(Condition::all(), |all, term| all.add(term_condition(term.as_str())));
    select.filter(condition)
}

/// `LOWER(column) LIKE '%term%'` with LIKE wildcards in the term escaped.
pub fn icontains<C>(column: C, term: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(like_pattern(term)).escape(LIKE_ESCAPE))
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
