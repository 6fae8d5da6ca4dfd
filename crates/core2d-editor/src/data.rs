//! Data binding: properties, records and databases.
//!
//! A shape's [`Context`] carries free-form properties and an optional record
//! id. Records are owned by exactly one [`Database`]; shapes refer to them by
//! id, so every shape bound to a record sees its current values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named string value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Properties plus an optional bound record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub properties: Vec<Property>,
    pub record: Option<Uuid>,
}

impl Context {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Insert or replace a property.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(Property::new(name, value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_column_width")]
    pub width: f64,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_column_width() -> f64 {
    100.0
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width: default_column_width(),
            is_visible: true,
        }
    }
}

/// Row of values, positionally matching the owning database's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: Uuid,
    pub name: String,
    pub id_column_name: String,
    pub columns: Vec<Column>,
    pub records: Vec<Record>,
    #[serde(default)]
    pub current_record: Option<Uuid>,
}

impl Database {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            id_column_name: "Id".to_string(),
            columns,
            records: Vec::new(),
            current_record: None,
        }
    }

    pub fn record(&self, id: Uuid) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains_record(&self, id: Uuid) -> bool {
        self.record(id).is_some()
    }

    /// Value of `column` in `record`, if both exist.
    pub fn value<'a>(&self, record: &'a Record, column: &str) -> Option<&'a str> {
        if column == self.id_column_name {
            return None;
        }
        let index = self.columns.iter().position(|c| c.name == column)?;
        record.values.get(index).map(String::as_str)
    }
}

/// Resolves `{Name}` placeholders in bound text.
///
/// Lookup order: the bound record's columns, then the shape's own
/// properties, then the page properties, then the page record. Unknown
/// placeholders are left in place.
pub struct DataFlow<'a> {
    databases: &'a [Database],
    page: Option<&'a Context>,
}

impl<'a> DataFlow<'a> {
    pub fn new(databases: &'a [Database], page: Option<&'a Context>) -> Self {
        Self { databases, page }
    }

    fn find_record(&self, id: Uuid) -> Option<(&'a Database, &'a Record)> {
        self.databases
            .iter()
            .find_map(|db| db.record(id).map(|r| (db, r)))
    }

    fn lookup(&self, shape: &Context, name: &str) -> Option<String> {
        let from_record = |record: Option<Uuid>| {
            let (db, record) = self.find_record(record?)?;
            if name == db.id_column_name {
                return Some(record.id.to_string());
            }
            db.value(record, name).map(str::to_string)
        };

        from_record(shape.record)
            .or_else(|| shape.property(name).map(str::to_string))
            .or_else(|| self.page.and_then(|p| p.property(name)).map(str::to_string))
            .or_else(|| from_record(self.page.and_then(|p| p.record)))
    }

    /// Substitute every resolvable `{Name}` in `text`.
    pub fn bind_text(&self, text: &str, shape: &Context) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match self.lookup(shape, name) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Database {
        let mut db = Database::new("People", vec![Column::new("Name"), Column::new("City")]);
        db.records
            .push(Record::new(vec!["Ada".to_string(), "London".to_string()]));
        db
    }

    #[test]
    fn test_bind_from_record_then_properties() {
        let db = people();
        let record = db.records[0].id;
        let databases = [db];
        let mut page = Context::default();
        page.set_property("Title", "Sheet 1");
        let flow = DataFlow::new(&databases, Some(&page));

        let mut shape = Context {
            record: Some(record),
            ..Context::default()
        };
        shape.set_property("City", "ignored, record wins");
        shape.set_property("Rev", "B");

        assert_eq!(
            flow.bind_text("{Name} / {City} rev {Rev} on {Title} {Missing}", &shape),
            "Ada / London rev B on Sheet 1 {Missing}"
        );
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let flow = DataFlow::new(&[], None);
        assert_eq!(flow.bind_text("a {b", &Context::default()), "a {b");
    }

    #[test]
    fn test_id_column_binds_record_id() {
        let db = people();
        let record = db.records[0].id;
        let databases = [db];
        let flow = DataFlow::new(&databases, None);
        let shape = Context {
            record: Some(record),
            ..Context::default()
        };
        assert_eq!(flow.bind_text("{Id}", &shape), record.to_string());
    }
}
