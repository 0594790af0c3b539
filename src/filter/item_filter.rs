use super::filter_where::FilterWhere;
use super::pagination::Pagination;
use super::types::{JsonField, SqlResult};

const TABLE: &str = "\"data\"";

/// Search terms for the item listing. Blank terms are dropped at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    q: Option<String>,
    base: Option<String>,
    occupation: Option<String>,
}

impl ItemFilter {
    pub fn new(q: Option<&str>, base: Option<&str>, occupation: Option<&str>) -> Self {
        Self {
            q: normalize(q),
            base: normalize(base),
            occupation: normalize(occupation),
        }
    }

    /// Each present term is one predicate; all predicates must hold.
    pub(crate) fn predicates(&self) -> Vec<(&'static [JsonField], &str)> {
        const ANY: &[JsonField] = &[
            JsonField::Name,
            JsonField::WorkBase,
            JsonField::WorkOccupation,
        ];
        const BASE: &[JsonField] = &[JsonField::WorkBase];
        const OCCUPATION: &[JsonField] = &[JsonField::WorkOccupation];

        let mut out = Vec::with_capacity(3);
        if let Some(q) = &self.q {
            out.push((ANY, q.as_str()));
        }
        if let Some(base) = &self.base {
            out.push((BASE, base.as_str()));
        }
        if let Some(occupation) = &self.occupation {
            out.push((OCCUPATION, occupation.as_str()));
        }
        out
    }

    fn where_sql(&self) -> (String, Vec<String>) {
        let mut filter_where = FilterWhere::new(0);
        for (fields, needle) in self.predicates() {
            filter_where.contains_any(fields, needle);
        }
        filter_where.generate()
    }

    pub fn to_sql(&self, pagination: &Pagination) -> SqlResult {
        let (where_clause, params) = self.where_sql();
        let query = [
            format!("SELECT id, data FROM {}", TABLE),
            if where_clause.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_clause)
            },
            "ORDER BY id ASC".to_string(),
            pagination.to_sql(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = self.where_sql();
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM {}", TABLE)
        } else {
            format!("SELECT COUNT(*) AS count FROM {} WHERE {}", TABLE, where_clause)
        };
        SqlResult { query, params }
    }
}

fn normalize(term: Option<&str>) -> Option<String> {
    term.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}
