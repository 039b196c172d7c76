//! Clause renderers.
//!
//! Every renderer is a pure function of its node. Binding renderers take the
//! 1-based number of the first placeholder they may use and return the text
//! together with the parameters they bound, in placeholder order; the caller
//! advances the counter by `params.len()` before rendering the next sibling.

use crate::criteria::{
    AggregateFunction, Binding, InBinding, Limit, LogicalBinding, NullBinding, Order, Projection, Relation,
    RelationalBinding, SearchCriteria, TextMatchBinding, WHOLE_OBJECT,
};
use crate::error::{OqlError, Result};
use crate::types::Value;

use super::config::is_identifier;
use super::EntityType;

/// Literal the engine reads as the null value.
pub const NIL: &str = "nil";

/// Rendered text plus the parameters its placeholders refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub params: Vec<Value>,
}

impl Fragment {
    fn text(text: String) -> Self {
        Fragment {
            text,
            params: Vec::new(),
        }
    }

    fn bound(text: String, value: Value) -> Self {
        Fragment {
            text,
            params: vec![value],
        }
    }
}

/// Renders `<alias>.<property>`.
///
/// # Errors
///
/// Returns an error if `property` is blank or is not a dot-separated path of
/// identifiers.
pub fn property_path(alias: &str, property: &str) -> Result<String> {
    if property.trim().is_empty() {
        return Err(OqlError::InvalidProperty(
            "property name must not be blank".to_string(),
        ));
    }
    if !property.split('.').all(is_identifier) {
        return Err(OqlError::InvalidProperty(format!(
            "'{property}' is not a property path"
        )));
    }
    Ok(format!("{alias}.{property}"))
}

// =============================================================================
// SELECT / FROM
// =============================================================================

/// Renders the SELECT clause. `None` criteria select distinct whole objects.
///
/// # Errors
///
/// Returns an error if a projection names a blank property or applies a
/// non-COUNT aggregate to the whole object.
pub fn select_clause(alias: &str, criteria: Option<&SearchCriteria>) -> Result<String> {
    let distinct = criteria.map_or(true, SearchCriteria::is_distinct);
    let mut clause = String::from(if distinct { "SELECT DISTINCT " } else { "SELECT " });

    match criteria.map(SearchCriteria::projections) {
        Some(projections) if !projections.is_empty() => {
            let rendered = projections
                .iter()
                .map(|p| projection(alias, p))
                .collect::<Result<Vec<_>>>()?;
            clause.push_str(&rendered.join(","));
        }
        _ => clause.push_str(alias),
    }
    Ok(clause)
}

/// Renders one projection.
///
/// # Errors
///
/// See [`select_clause`].
pub fn projection(alias: &str, projection: &Projection) -> Result<String> {
    match projection {
        Projection::Property { property } if property == WHOLE_OBJECT => Ok(alias.to_string()),
        Projection::Property { property } => property_path(alias, property),
        Projection::Aggregation {
            expression,
            function,
        } => {
            let argument = if expression == WHOLE_OBJECT {
                if *function != AggregateFunction::Count {
                    return Err(OqlError::InvalidProjection(format!(
                        "{function}({WHOLE_OBJECT}) is not supported, only COUNT accepts the whole object"
                    )));
                }
                WHOLE_OBJECT.to_string()
            } else {
                property_path(alias, expression)?
            };
            Ok(format!("{function}({argument})"))
        }
    }
}

/// Renders `FROM <type> <alias>`.
#[must_use]
pub fn from_clause(entity: &EntityType, alias: &str) -> String {
    format!("FROM {} {alias}", entity.name())
}

// =============================================================================
// WHERE
// =============================================================================

/// Renders `WHERE <binding>`, numbering placeholders from `$1`.
///
/// # Errors
///
/// Returns an error for any malformed node in the tree.
pub fn where_clause(alias: &str, binding: &Binding) -> Result<Fragment> {
    let mut fragment = render_binding(alias, binding, 1)?;
    fragment.text.insert_str(0, "WHERE ");
    Ok(fragment)
}

/// Renders one binding; `first` is the number of its first placeholder.
///
/// # Errors
///
/// Returns an error for any malformed node in the tree.
pub fn render_binding(alias: &str, binding: &Binding, first: usize) -> Result<Fragment> {
    match binding {
        Binding::Relational(b) => relational(alias, b, first),
        Binding::Null(b) => null_check(alias, b),
        Binding::Like(b) => like(alias, &b.property, &b.pattern, first),
        Binding::In(b) => in_list(alias, b, first),
        Binding::TextMatch(b) => text_match(alias, b, first),
        Binding::And(b) => logical(alias, b.elements(), "AND", first),
        Binding::Or(b) => logical(alias, b.elements(), "OR", first),
        Binding::Not(b) => {
            let inner = render_binding(alias, b.binding(), first)?;
            Ok(Fragment {
                text: format!("NOT ({})", inner.text),
                params: inner.params,
            })
        }
    }
}

fn relational(alias: &str, binding: &RelationalBinding, first: usize) -> Result<Fragment> {
    if binding.value.is_null() {
        let not_null = match binding.relation {
            Relation::Equal => false,
            Relation::NotEqual => true,
            other => {
                return Err(OqlError::InvalidBinding(format!(
                    "relational binding on '{}' compares nil with '{other}', only = and != accept nil",
                    binding.property
                )))
            }
        };
        return null_check(alias, &NullBinding::new(binding.property.clone(), not_null));
    }

    let path = property_path(alias, &binding.property)?;
    Ok(Fragment::bound(
        format!("{path} {} ${first}", binding.relation.symbol()),
        binding.value.clone(),
    ))
}

fn null_check(alias: &str, binding: &NullBinding) -> Result<Fragment> {
    let path = property_path(alias, &binding.property)?;
    let function = if binding.not_null {
        "is_defined"
    } else {
        "is_undefined"
    };
    Ok(Fragment::text(format!("{function}({path})")))
}

fn like(alias: &str, property: &str, pattern: &str, first: usize) -> Result<Fragment> {
    let path = property_path(alias, property)?;
    Ok(Fragment::bound(
        format!("{path} LIKE ${first}"),
        Value::String(pattern.to_string()),
    ))
}

fn in_list(alias: &str, binding: &InBinding, first: usize) -> Result<Fragment> {
    let path = property_path(alias, &binding.property)?;

    let params: Vec<Value> = binding
        .values
        .iter()
        .filter(|v| !v.is_null())
        .cloned()
        .collect();
    let mut terms: Vec<String> = (first..first + params.len()).map(|n| format!("${n}")).collect();
    if binding.matches_null() {
        terms.push(NIL.to_string());
    }
    if terms.is_empty() {
        return Err(OqlError::InvalidBinding(format!(
            "IN binding on '{}' has no values and does not match nil",
            binding.property
        )));
    }

    Ok(Fragment {
        text: format!("{path} IN LIST({})", terms.join(",")),
        params,
    })
}

fn text_match(alias: &str, binding: &TextMatchBinding, first: usize) -> Result<Fragment> {
    let pattern = |word: &String| format!("%{word}%");
    match binding.words() {
        [] => Err(OqlError::InvalidBinding(format!(
            "text match on '{}' needs at least one word",
            binding.property
        ))),
        [word] => like(alias, &binding.property, &pattern(word), first),
        words => {
            let likes: Vec<Binding> = words
                .iter()
                .map(|w| Binding::like(binding.property.clone(), pattern(w)))
                .collect();
            let connective = if binding.match_all { "AND" } else { "OR" };
            logical(alias, &likes, connective, first)
        }
    }
}

fn logical(alias: &str, elements: &[Binding], connective: &str, first: usize) -> Result<Fragment> {
    if elements.len() < LogicalBinding::MIN_ELEMENTS {
        return Err(OqlError::InvalidBinding(format!(
            "{connective} binding needs at least {} elements, got {}",
            LogicalBinding::MIN_ELEMENTS,
            elements.len()
        )));
    }

    let mut texts = Vec::with_capacity(elements.len());
    let mut params = Vec::new();
    for element in elements {
        let fragment = render_binding(alias, element, first + params.len())?;
        texts.push(fragment.text);
        params.extend(fragment.params);
    }

    Ok(Fragment {
        text: format!(" ({})", texts.join(&format!(" {connective} "))),
        params,
    })
}

// =============================================================================
// ORDER BY / LIMIT
// =============================================================================

/// Renders `ORDER BY ...`, or an empty string for no orders.
///
/// # Errors
///
/// Returns an error if an order names a blank property.
pub fn order_clause(alias: &str, orders: &[Order]) -> Result<String> {
    if orders.is_empty() {
        return Ok(String::new());
    }
    let terms = orders
        .iter()
        .map(|order| {
            let path = property_path(alias, &order.property)?;
            Ok(if order.descending {
                format!("{path} DESC")
            } else {
                path
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("ORDER BY {}", terms.join(",")))
}

/// Renders `LIMIT <count> OFFSET <offset>`.
#[must_use]
pub fn limit_clause(limit: &Limit) -> String {
    format!("LIMIT {} OFFSET {}", limit.count, limit.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(binding: &Binding) -> Fragment {
        render_binding("o", binding, 1).unwrap()
    }

    #[test]
    fn test_relational() {
        let fragment = render(&Binding::relational("year", Relation::GreaterEqual, 2001));
        assert_eq!(fragment.text, "o.year >= $1");
        assert_eq!(fragment.params, vec![Value::Int64(2001)]);
    }

    #[test]
    fn test_placeholder_offset() {
        let fragment = render_binding("o", &Binding::like("name", "a%"), 4).unwrap();
        assert_eq!(fragment.text, "o.name LIKE $4");
    }

    #[test]
    fn test_null_relational_collapse() {
        assert_eq!(render(&Binding::equal("p", Value::Null)).text, "is_undefined(o.p)");
        assert_eq!(
            render(&Binding::relational("p", Relation::NotEqual, Value::Null)).text,
            "is_defined(o.p)"
        );
        let err = render_binding(
            "o",
            &Binding::relational("p", Relation::LessThan, Value::Null),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, OqlError::InvalidBinding(_)));
    }

    #[test]
    fn test_in_list() {
        let fragment = render(&Binding::is_in("p", [Value::from(1), Value::from(2), Value::Null]));
        assert_eq!(fragment.text, "o.p IN LIST($1,$2,nil)");
        assert_eq!(fragment.params, vec![Value::Int64(1), Value::Int64(2)]);
    }

    #[test]
    fn test_in_list_only_nil() {
        let binding =
            Binding::In(InBinding::new("p", Vec::<Value>::new()).with_null_contained(true));
        let fragment = render(&binding);
        assert_eq!(fragment.text, "o.p IN LIST(nil)");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_in_list_empty_rejected() {
        let binding = Binding::is_in("p", Vec::<Value>::new());
        assert!(render_binding("o", &binding, 1).is_err());
    }

    #[test]
    fn test_not() {
        let fragment = render(&Binding::negate(Binding::is_null("p")));
        assert_eq!(fragment.text, "NOT (is_undefined(o.p))");
    }

    #[test]
    fn test_blank_property() {
        let err = render_binding("o", &Binding::like(" ", "x"), 1).unwrap_err();
        assert!(matches!(err, OqlError::InvalidProperty(_)));
    }

    #[test]
    fn test_property_path_segments() {
        assert_eq!(property_path("o", "address.city").unwrap(), "o.address.city");
        assert_eq!(property_path("o", "_id").unwrap(), "o._id");
        for bad in ["price$1", "a b", "a..b", ".a", "a.", "year DESC", "*", "1st"] {
            assert!(
                matches!(property_path("o", bad), Err(OqlError::InvalidProperty(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_projections() {
        assert_eq!(projection("o", &Projection::property("name")).unwrap(), "o.name");
        assert_eq!(projection("o", &Projection::whole_object()).unwrap(), "o");
        assert_eq!(projection("o", &Projection::count_all()).unwrap(), "COUNT(*)");
        assert_eq!(
            projection("o", &Projection::aggregation("price", AggregateFunction::Max)).unwrap(),
            "MAX(o.price)"
        );
        assert!(matches!(
            projection("o", &Projection::aggregation("*", AggregateFunction::Sum)),
            Err(OqlError::InvalidProjection(_))
        ));
        assert!(projection("o", &Projection::property("")).is_err());
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(order_clause("o", &[]).unwrap(), "");
        assert_eq!(
            order_clause("o", &[Order::desc("year"), Order::asc("name")]).unwrap(),
            "ORDER BY o.year DESC,o.name"
        );
    }

    #[test]
    fn test_limit_clause() {
        assert_eq!(limit_clause(&Limit::new(10, 20)), "LIMIT 10 OFFSET 20");
    }
}
