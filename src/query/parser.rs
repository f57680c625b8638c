use serde_json::{Map, Value};
use crate::core::error::{Error, Result};
use crate::query::ast::{BoolQuery, MatchQuery, RangeQuery, RangeValue, SearchRequest, SortField};
use crate::query::types::{Operator, SortOrder};
use crate::schema::schema::parse_date;

/// Decodes a JSON search body into a [`SearchRequest`].
///
/// Accepted shape:
/// - `{"query": ..., "from": 0, "size": 2, "sort": [...]}`
/// - query nodes `bool` (`must`/`filter`), `match`, `range`, `match_all`
/// - `{"match": {"title": "text"}}` or `{"match": {"title": {"query": "text", "operator": "or"}}}`
/// - `{"range": {"price": {"lte": 40}}}`; numbers are float bounds, strings are dates
/// - sort as `"price"`, `{"price": "desc"}` or `{"price": {"order": "asc"}}`, alone or in an array
///
/// Inside `bool`, match nodes always land in `must` and range nodes in
/// `filter`: both lists are conjunctive so placement does not change which
/// documents match.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    pub default_operator: Operator,
}

impl QueryParser {
    pub fn new() -> Self {
        QueryParser::default()
    }

    pub fn parse_str(&self, body: &str) -> Result<SearchRequest> {
        let value: Value = serde_json::from_str(body)?;
        self.parse(&value)
    }

    pub fn parse(&self, body: &Value) -> Result<SearchRequest> {
        let object = as_object(body, "search body")?;
        let mut request = SearchRequest::new();

        for (key, value) in object {
            match key.as_str() {
                "query" => self.parse_query(value, &mut request.query)?,
                "from" => request.from = parse_usize("from", value)?,
                "size" => request.size = Some(parse_usize("size", value)?),
                "sort" => request.sort = self.parse_sort(value)?,
                other => return Err(Error::parse(format!("unknown key [{}] in search body", other))),
            }
        }

        Ok(request)
    }

    fn parse_query(&self, node: &Value, query: &mut BoolQuery) -> Result<()> {
        let (kind, body) = single_entry(node, "query")?;

        match kind.as_str() {
            "bool" => self.parse_bool(body, query),
            "match" => {
                query.must.push(self.parse_match(body)?);
                Ok(())
            }
            "range" => {
                query.filter.push(parse_range(body)?);
                Ok(())
            }
            "match_all" => Ok(()),
            other => Err(Error::parse(format!("unsupported query type [{}]", other))),
        }
    }

    fn parse_bool(&self, body: &Value, query: &mut BoolQuery) -> Result<()> {
        for (clause, nodes) in as_object(body, "bool query")? {
            match clause.as_str() {
                "must" | "filter" => {
                    for node in one_or_many(nodes) {
                        self.parse_query(node, query)?;
                    }
                }
                other => {
                    return Err(Error::parse(format!("unsupported bool clause [{}]", other)));
                }
            }
        }
        Ok(())
    }

    fn parse_match(&self, body: &Value) -> Result<MatchQuery> {
        let (field, value) = single_entry(body, "match query")?;

        match value {
            Value::Object(options) => {
                let text = options
                    .get("query")
                    .and_then(scalar_text)
                    .ok_or_else(|| Error::parse(format!("match on [{}] needs a query", field)))?;

                let operator = match options.get("operator") {
                    None => self.default_operator,
                    Some(op) => op
                        .as_str()
                        .and_then(Operator::parse)
                        .ok_or_else(|| Error::parse(format!("invalid match operator {}", op)))?,
                };

                Ok(MatchQuery::new(field, &text).with_operator(operator))
            }
            other => {
                let text = scalar_text(other)
                    .ok_or_else(|| Error::parse(format!("invalid match text {}", other)))?;
                Ok(MatchQuery::new(field, &text).with_operator(self.default_operator))
            }
        }
    }

    fn parse_sort(&self, body: &Value) -> Result<Vec<SortField>> {
        one_or_many(body).map(parse_sort_field).collect()
    }
}

fn parse_range(body: &Value) -> Result<RangeQuery> {
    let (field, bounds) = single_entry(body, "range query")?;
    let mut range = RangeQuery::new(field);

    for (comparator, value) in as_object(bounds, "range bounds")? {
        let bound = Some(parse_range_value(value)?);
        match comparator.as_str() {
            "gt" => range.gt = bound,
            "gte" => range.gte = bound,
            "lt" => range.lt = bound,
            "lte" => range.lte = bound,
            other => return Err(Error::parse(format!("unsupported range comparator [{}]", other))),
        }
    }

    Ok(range)
}

fn parse_range_value(value: &Value) -> Result<RangeValue> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(RangeValue::Float)
            .ok_or_else(|| Error::parse(format!("invalid range bound {}", n))),
        Value::String(s) => parse_date(s)
            .map(RangeValue::Date)
            .or_else(|| s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(RangeValue::Float))
            .ok_or_else(|| Error::parse(format!("invalid range bound \"{}\"", s))),
        other => Err(Error::parse(format!("invalid range bound {}", other))),
    }
}

fn parse_sort_field(entry: &Value) -> Result<SortField> {
    match entry {
        Value::String(field) => Ok(SortField {
            field: field.clone(),
            order: SortOrder::Asc,
        }),
        Value::Object(_) => {
            let (field, value) = single_entry(entry, "sort entry")?;
            let order = match value {
                Value::String(order) => Some(order.as_str()),
                Value::Object(options) => options.get("order").and_then(Value::as_str),
                _ => None,
            };
            let order = order
                .and_then(SortOrder::parse)
                .ok_or_else(|| Error::parse(format!("invalid sort order for [{}]", field)))?;
            Ok(SortField {
                field: field.clone(),
                order,
            })
        }
        other => Err(Error::parse(format!("invalid sort entry {}", other))),
    }
}

fn as_object<'v>(value: &'v Value, what: &str) -> Result<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::parse(format!("{} must be an object, got {}", what, value)))
}

fn single_entry<'v>(value: &'v Value, what: &str) -> Result<(&'v String, &'v Value)> {
    let object = as_object(value, what)?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(Error::parse(format!("{} must have exactly one key, got {}", what, value))),
    }
}

fn one_or_many(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter()),
        single => Box::new(std::iter::once(single)),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_usize(key: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| Error::parse(format!("[{}] must be a non-negative integer, got {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bookstore_search_body() {
        let request = QueryParser::new().parse(&json!({
            "query": {
                "bool": {
                    "must": [{ "match": { "title": "Elasticsearch" } }],
                    "filter": [{ "range": { "price": { "lte": 40 } } }]
                }
            },
            "from": 0,
            "size": 2,
            "sort": [{ "price": { "order": "asc" } }]
        })).unwrap();

        assert_eq!(request.query.must, vec![MatchQuery::new("title", "Elasticsearch")]);
        assert_eq!(request.query.filter, vec![RangeQuery::new("price").lte(40.0)]);
        assert_eq!(request.sort, vec![SortField { field: "price".into(), order: SortOrder::Asc }]);
        assert_eq!((request.from, request.size), (0, Some(2)));
    }

    #[test]
    fn clauses_are_routed_by_node_type() {
        let request = QueryParser::new().parse(&json!({
            "query": { "bool": {
                "must": { "range": { "published_date": { "gte": "2020-01-01" } } },
                "filter": { "match": { "title": { "query": "search engines", "operator": "or" } } }
            }}
        })).unwrap();

        assert_eq!(request.query.must.len(), 1);
        assert_eq!(request.query.must[0].operator, Operator::Or);
        assert!(matches!(request.query.filter[0].gte, Some(RangeValue::Date(_))));
        assert_eq!(request.size, None);
    }

    #[test]
    fn sort_short_forms() {
        let sort = QueryParser::new().parse(&json!({ "sort": ["author", { "price": "desc" }] }))
            .unwrap()
            .sort;
        assert_eq!(sort[0], SortField { field: "author".into(), order: SortOrder::Asc });
        assert_eq!(sort[1], SortField { field: "price".into(), order: SortOrder::Desc });
    }

    #[test]
    fn malformed_bodies_are_parse_errors() {
        let parser = QueryParser::new();
        for body in [
            json!({ "query": { "fuzzy": { "title": "x" } } }),
            json!({ "query": { "bool": { "should": [] } } }),
            json!({ "from": -1 }),
            json!({ "sort": { "price": "sideways" } }),
            json!({ "query": { "range": { "price": { "near": 3 } } } }),
            json!({ "query": { "match": { "title": "a", "author": "b" } } }),
            json!({ "query": { "range": { "price": { "lte": "NaN" } } } }),
            json!({ "query": { "range": { "price": { "gt": "-inf" } } } }),
        ] {
            let err = parser.parse(&body).unwrap_err();
            assert_eq!(err.kind, crate::core::error::ErrorKind::Parse, "{}", body);
        }
    }

    #[test]
    fn parses_string_bodies() {
        let request = QueryParser::new()
            .parse_str(r#"{"query": {"range": {"price": {"gte": "12.5"}}}, "size": 3}"#)
            .unwrap();
        assert_eq!(request.query.filter, vec![RangeQuery::new("price").gte(12.5)]);
        assert_eq!(request.size, Some(3));
        assert!(QueryParser::new().parse_str("{").is_err());
    }
}
