//! Record binding repair for pasted, imported and loaded shapes.

use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use core2d_core::constants::IMPORTED_DATABASE_NAME;

use super::Project;
use crate::commands::Edit;
use crate::data::{Database, Record};
use crate::model::{RecordSnapshot, ShapeFragment, ShapeId};

impl Project {
    /// Edit adopting the records bound by `shapes` that no database holds.
    ///
    /// An orphan goes into the current database with its values mapped by
    /// column name. Without a current database, an "Imported" database is
    /// created from the orphan's own schema and becomes current, so a whole
    /// paste lands in one new database.
    pub fn restore_records_edit(
        &self,
        shapes: &[ShapeId],
        fragment: &ShapeFragment,
    ) -> Option<Edit> {
        let known: HashSet<Uuid> = self
            .databases
            .iter()
            .flat_map(|db| db.records.iter().map(|r| r.id))
            .collect();

        let mut orphans: Vec<&RecordSnapshot> = Vec::new();
        for id in self.store.reachable(shapes.iter().copied()) {
            let Some(record) = self.store.get(id).and_then(|s| s.data.record) else {
                continue;
            };
            if known.contains(&record) || orphans.iter().any(|o| o.record.id == record) {
                continue;
            }
            match fragment.record(record) {
                Some(snapshot) => orphans.push(snapshot),
                None => warn!("Record {} has no snapshot, leaving it unbound", record),
            }
        }
        if orphans.is_empty() {
            return None;
        }
        orphans.sort_by_key(|o| o.record.id);

        let mut databases = self.databases.clone();
        let mut current = self
            .current_database
            .filter(|id| databases.iter().any(|db| db.id == *id));

        for orphan in orphans {
            let index = match current.and_then(|id| databases.iter().position(|db| db.id == id)) {
                Some(index) => index,
                None => {
                    let mut db = Database::new(IMPORTED_DATABASE_NAME, orphan.columns.clone());
                    db.id_column_name = orphan.id_column_name.clone();
                    info!("Created database '{}' for orphaned records", db.name);
                    current = Some(db.id);
                    databases.push(db);
                    databases.len() - 1
                }
            };
            let target = &mut databases[index];
            let values = target
                .columns
                .iter()
                .map(|column| {
                    orphan
                        .columns
                        .iter()
                        .position(|c| c.name == column.name)
                        .and_then(|i| orphan.record.values.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            target.records.push(Record {
                id: orphan.record.id,
                values,
            });
        }

        Some(Edit::Databases {
            old: self.databases.clone(),
            new: databases,
            old_current: self.current_database,
            new_current: current,
        })
    }

    /// Unbind shapes whose record no database holds. Used after loading,
    /// where no schema for the missing record is available.
    pub(crate) fn repair_dangling_records(&mut self) {
        let known: HashSet<Uuid> = self
            .databases
            .iter()
            .flat_map(|db| db.records.iter().map(|r| r.id))
            .collect();
        let dangling: Vec<ShapeId> = self
            .store
            .shapes()
            .filter(|s| s.data.record.is_some_and(|r| !known.contains(&r)))
            .map(|s| s.id)
            .collect();
        for id in dangling {
            if let Some(shape) = self.store.get_mut(id) {
                warn!("Shape {} bound to a missing record, unbinding", id);
                shape.data.record = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::geometry::Point2;
    use crate::model::ShapeDefaults;

    fn orphan_fragment() -> (ShapeFragment, Uuid) {
        let mut source = Project::with_defaults("Source");
        let mut db = Database::new("People", vec![Column::new("Name"), Column::new("Age")]);
        let record = Record::new(vec!["Ada".into(), "36".into()]);
        let record_id = record.id;
        db.records.push(record);
        let rect = source.store.create_rectangle(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            ShapeDefaults::default(),
        );
        if let Some(shape) = source.store.get_mut(rect) {
            shape.data.record = Some(record_id);
        }
        (source.store.export_fragment(&[rect], &[db]), record_id)
    }

    #[test]
    fn test_orphan_creates_one_imported_database() {
        let (fragment, record_id) = orphan_fragment();
        let mut project = Project::with_defaults("Target");
        let ids = project.store.import_fragment(&fragment);
        let edit = project.restore_records_edit(&ids, &fragment).unwrap();
        project.commit("Paste", vec![edit]).unwrap();

        assert_eq!(project.databases.len(), 1);
        let db = &project.databases[0];
        assert_eq!(db.name, IMPORTED_DATABASE_NAME);
        assert_eq!(db.columns.len(), 2);
        assert_eq!(project.current_database, Some(db.id));
        let record = db.record(record_id).unwrap();
        assert_eq!(db.value(record, "Name"), Some("Ada"));

        assert!(project.undo());
        assert!(project.databases.is_empty());
    }

    #[test]
    fn test_known_record_needs_no_edit() {
        let (fragment, _) = orphan_fragment();
        let mut project = Project::with_defaults("Target");
        let ids = project.store.import_fragment(&fragment);
        let edit = project.restore_records_edit(&ids, &fragment).unwrap();
        project.commit("Paste", vec![edit]).unwrap();
        assert!(project.restore_records_edit(&ids, &fragment).is_none());
    }

    #[test]
    fn test_orphan_adopted_into_current_database() {
        let (fragment, record_id) = orphan_fragment();
        let mut project = Project::with_defaults("Target");
        let db = Database::new("Existing", vec![Column::new("Age")]);
        project.current_database = Some(db.id);
        project.databases.push(db);

        let ids = project.store.import_fragment(&fragment);
        let edit = project.restore_records_edit(&ids, &fragment).unwrap();
        project.commit("Paste", vec![edit]).unwrap();

        assert_eq!(project.databases.len(), 1);
        let db = &project.databases[0];
        assert_eq!(db.record(record_id).unwrap().values, vec!["36".to_string()]);
    }
}
