/// Document paths the item filters can reach into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonField {
    Name,
    WorkBase,
    WorkOccupation,
}

impl JsonField {
    /// Text extraction of the field from the `data` column.
    pub fn to_sql(&self) -> &'static str {
        match self {
            JsonField::Name => "data->>'name'",
            JsonField::WorkBase => "data->'work'->>'base'",
            JsonField::WorkOccupation => "data->'work'->>'occupation'",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
