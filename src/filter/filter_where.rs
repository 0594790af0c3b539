use super::types::JsonField;

/// Accumulates AND-ed predicates over the `data` column with positional parameters.
pub struct FilterWhere {
    conditions: Vec<String>,
    param_values: Vec<String>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            conditions: vec![],
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Case-insensitive substring match of `needle` against any of `fields`.
    /// All alternatives share a single bound parameter.
    pub fn contains_any(&mut self, fields: &[JsonField], needle: &str) -> &mut Self {
        if fields.is_empty() {
            return self;
        }
        let placeholder = self.param(contains_pattern(needle));
        let alternatives: Vec<String> = fields
            .iter()
            .map(|f| format!("{} ILIKE {}", f.to_sql(), placeholder))
            .collect();

        let condition = if alternatives.len() == 1 {
            alternatives.into_iter().next().unwrap_or_default()
        } else {
            format!("({})", alternatives.join(" OR "))
        };
        self.conditions.push(condition);
        self
    }

    /// Returns the WHERE body (without the keyword) and its parameters.
    pub fn generate(self) -> (String, Vec<String>) {
        (self.conditions.join(" AND "), self.param_values)
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// `%needle%` with LIKE metacharacters in the needle matched literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
