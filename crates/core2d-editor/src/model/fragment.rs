//! Structural copy of a shape sub-graph.
//!
//! A fragment holds the closure of some root shapes: every referenced
//! point, child and style, plus snapshots of bound records together with
//! their column schema. Importing remaps ids through a visited map, so an
//! object shared inside the fragment is cloned exactly once and stays shared
//! in the copy.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Shape, ShapeId, ShapeStore, StyleId};
use crate::data::{Column, Database, Record};
use crate::style::ShapeStyle;

/// A record together with the schema of the database it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub database_id: Uuid,
    pub database_name: String,
    pub id_column_name: String,
    pub columns: Vec<Column>,
    pub record: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeFragment {
    pub roots: Vec<ShapeId>,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub styles: Vec<ShapeStyle>,
    #[serde(default)]
    pub records: Vec<RecordSnapshot>,
}

impl ShapeFragment {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn record(&self, id: Uuid) -> Option<&RecordSnapshot> {
        self.records.iter().find(|r| r.record.id == id)
    }
}

impl ShapeStore {
    /// Copy `roots` and everything they reference.
    pub fn export_fragment(&self, roots: &[ShapeId], databases: &[Database]) -> ShapeFragment {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<ShapeId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(shape) = self.get(id) else {
                continue;
            };
            order.push(shape.clone());
            stack.extend(shape.kind.children().into_iter().rev());
        }

        let mut style_ids: Vec<StyleId> = Vec::new();
        let mut record_ids: Vec<Uuid> = Vec::new();
        for shape in &order {
            if let Some(style) = shape.style {
                if !style_ids.contains(&style) {
                    style_ids.push(style);
                }
            }
            if let Some(record) = shape.data.record {
                if !record_ids.contains(&record) {
                    record_ids.push(record);
                }
            }
        }

        let styles = style_ids
            .into_iter()
            .filter_map(|id| self.style(id).cloned())
            .collect();

        let records = record_ids
            .into_iter()
            .filter_map(|id| {
                databases.iter().find_map(|db| {
                    db.record(id).map(|record| RecordSnapshot {
                        database_id: db.id,
                        database_name: db.name.clone(),
                        id_column_name: db.id_column_name.clone(),
                        columns: db.columns.clone(),
                        record: record.clone(),
                    })
                })
            })
            .collect();

        ShapeFragment {
            roots: roots.iter().copied().filter(|id| visited.contains(id)).collect(),
            shapes: order,
            styles,
            records,
        }
    }

    /// Insert a copy of `fragment` under fresh ids and return the new roots.
    ///
    /// A fragment style identical to the store's style of the same id is
    /// reused instead of copied; style ids the fragment does not carry are
    /// kept when the store knows them.
    pub fn import_fragment(&mut self, fragment: &ShapeFragment) -> Vec<ShapeId> {
        let mut style_map: HashMap<StyleId, StyleId> = HashMap::new();
        for style in &fragment.styles {
            let reuse = self
                .style(style.id)
                .is_some_and(|existing| existing.same_appearance(style));
            let target = if reuse {
                style.id
            } else {
                let mut copy = style.clone();
                copy.id = StyleId(self.generate_id());
                self.insert_style(copy)
            };
            style_map.insert(style.id, target);
        }

        let id_map: HashMap<ShapeId, ShapeId> = fragment
            .shapes
            .iter()
            .map(|s| (s.id, ShapeId(self.generate_id())))
            .collect();

        for shape in &fragment.shapes {
            let mut copy = shape.clone();
            copy.id = id_map[&shape.id];
            copy.kind
                .map_ids(|old| id_map.get(&old).copied().unwrap_or(old));
            copy.style = shape.style.and_then(|s| {
                style_map
                    .get(&s)
                    .copied()
                    .or_else(|| self.style(s).map(|_| s))
            });
            self.insert(copy);
        }

        fragment
            .roots
            .iter()
            .filter_map(|id| id_map.get(id).copied())
            .collect()
    }

    /// Deep copy of `roots` within this store.
    pub fn duplicate(&mut self, roots: &[ShapeId]) -> Vec<ShapeId> {
        let fragment = self.export_fragment(roots, &[]);
        self.import_fragment(&fragment)
    }
}
