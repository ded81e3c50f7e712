//! Flat form field mapping and the positional row zipping used to decode
//! repeated form groups.
//!
//! Repeated groups use the fixed key convention `<group>[][<member>]` for
//! structured rows and `<group>[]` for flat repeated scalars.

mod normalize;

pub use normalize::normalize;

use std::collections::HashMap;

/// FormData is the flat key -> list-of-values mapping an external caller
/// extracts from a submitted form.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a field, preserving submission order
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// First submitted value for a field, or "" when absent
    pub fn first(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All submitted values for a field, in submission order
    pub fn values(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Decode a repeated group into rows.
    ///
    /// Member columns are fetched as `<group>[][<member>]` and zipped
    /// positionally: the row count is the shortest column's length (rows
    /// beyond it are dropped), and rows whose required members are empty
    /// are filtered out.
    pub fn rows<'a>(&'a self, schema: &'a GroupSchema) -> Vec<GroupRow<'a>> {
        let columns: Vec<&[String]> = schema
            .members
            .iter()
            .map(|member| self.values(&schema.member_key(member)))
            .collect();
        let count = columns.iter().map(|column| column.len()).min().unwrap_or(0);

        (0..count)
            .map(|i| GroupRow {
                schema,
                values: columns.iter().map(|column| column[i].as_str()).collect(),
            })
            .filter(|row| schema.required.iter().all(|member| !row.get(member).is_empty()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.append(key, value);
        }
        form
    }
}

/// Schema for one repeated form group: its member columns and which of
/// them a row must fill in to be kept.
#[derive(Debug)]
pub struct GroupSchema {
    pub group: &'static str,
    pub members: &'static [&'static str],
    pub required: &'static [&'static str],
}

impl GroupSchema {
    fn member_key(&self, member: &str) -> String {
        format!("{}[][{}]", self.group, member)
    }
}

/// One zipped row of a repeated group
#[derive(Debug)]
pub struct GroupRow<'a> {
    schema: &'a GroupSchema,
    values: Vec<&'a str>,
}

impl GroupRow<'_> {
    /// Value of a member column; "" for members outside the schema
    pub fn get(&self, member: &str) -> &str {
        self.schema
            .members
            .iter()
            .position(|m| *m == member)
            .map(|i| self.values[i])
            .unwrap_or("")
    }

    /// Non-empty member value as an owned optional
    pub fn opt(&self, member: &str) -> Option<String> {
        let value = self.get(member);
        (!value.is_empty()).then(|| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTS: GroupSchema = GroupSchema {
        group: "ports",
        members: &["name", "speed"],
        required: &["name"],
    };

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_first_and_values_on_absent_keys() {
        let form = form(&[("hostname", "R1")]);
        assert_eq!(form.first("hostname"), "R1");
        assert_eq!(form.first("device_type"), "");
        assert!(form.values("ports[][name]").is_empty());
    }

    #[test]
    fn test_rows_truncate_to_shortest_column() {
        let form = form(&[
            ("ports[][name]", "et1"),
            ("ports[][name]", "et2"),
            ("ports[][name]", "et3"),
            ("ports[][speed]", "10g"),
            ("ports[][speed]", "25g"),
        ]);

        let rows = form.rows(&PORTS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), "et1");
        assert_eq!(rows[0].get("speed"), "10g");
        assert_eq!(rows[1].get("name"), "et2");
        assert_eq!(rows[1].get("speed"), "25g");
    }

    #[test]
    fn test_rows_drop_entries_missing_required_members() {
        let form = form(&[
            ("ports[][name]", "et1"),
            ("ports[][name]", ""),
            ("ports[][name]", "et3"),
            ("ports[][speed]", "10g"),
            ("ports[][speed]", "25g"),
            ("ports[][speed]", "100g"),
        ]);

        let rows = form.rows(&PORTS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), "et1");
        assert_eq!(rows[1].get("name"), "et3");
        assert_eq!(rows[1].get("speed"), "100g");
    }

    #[test]
    fn test_row_members_outside_schema_read_empty() {
        let form = form(&[("ports[][name]", "et1"), ("ports[][speed]", "10g")]);
        let rows = form.rows(&PORTS);
        assert_eq!(rows[0].get("duplex"), "");
        assert_eq!(rows[0].opt("duplex"), None);
        assert_eq!(rows[0].opt("speed"), Some("10g".to_string()));
    }
}
