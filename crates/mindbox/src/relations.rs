//! # Relationship Rules
//!
//! Cross-entity references stay valid because every structural mutation runs
//! these rules on the staged tables before anything is persisted. They are
//! plain functions over [`Tables`], so they are tested here without a store.
//!
//! ## Rules
//!
//! - **Delete box**: collect the box and all its descendants, delete every
//!   thought that lives in one of them (with keyword cleanup for each), then
//!   delete the boxes, descendants before ancestors.
//! - **Delete thought**: remove the thought id from every keyword. Keywords
//!   survive with an empty list unless the [`KeywordPolicy`] says otherwise.
//! - **Reparent box**: refuse any move that would put a box under itself or
//!   under one of its descendants.
//!
//! ## Keyword Pruning
//!
//! Whether a keyword that lost its last thought should disappear is a policy,
//! not a rule. [`KeywordPolicy::Keep`] (default) never deletes a keyword
//! implicitly; [`KeywordPolicy::PruneEmpty`] deletes it as soon as its list
//! becomes empty through unlinking or thought deletion.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::{EntityKind, MindBoxError, Result};
use crate::model::BoxNode;
use crate::store::{CascadeReport, Tables};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordPolicy {
    #[default]
    Keep,
    PruneEmpty,
}

/// The box and all of its descendants, descendants before ancestors.
///
/// Returns an empty list when `root` does not exist.
pub fn subtree_ids(boxes: &IndexMap<Uuid, BoxNode>, root: Uuid) -> Vec<Uuid> {
    if !boxes.contains_key(&root) {
        return Vec::new();
    }

    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for node in boxes.values() {
        if let Some(parent) = node.parent_box_id {
            children.entry(parent).or_default().push(node.id);
        }
    }

    let mut ordered = Vec::new();
    let mut visited = HashSet::new();
    collect_post_order(root, &children, &mut visited, &mut ordered);
    ordered
}

fn collect_post_order(
    id: Uuid,
    children: &HashMap<Uuid, Vec<Uuid>>,
    visited: &mut HashSet<Uuid>,
    ordered: &mut Vec<Uuid>,
) {
    // A corrupt file could hold a parent cycle; visit each box once.
    if !visited.insert(id) {
        return;
    }
    if let Some(kids) = children.get(&id) {
        for child in kids {
            collect_post_order(*child, children, visited, ordered);
        }
    }
    ordered.push(id);
}

/// Checks if `candidate` sits somewhere below `ancestor` (walks up the parent chain).
pub fn is_descendant_of(boxes: &IndexMap<Uuid, BoxNode>, candidate: Uuid, ancestor: Uuid) -> bool {
    let mut current = candidate;
    let mut seen = HashSet::new();

    while seen.insert(current) {
        match boxes.get(&current).and_then(|b| b.parent_box_id) {
            Some(parent) if parent == ancestor => return true,
            Some(parent) => current = parent,
            None => return false,
        }
    }

    // Walked into a cycle that does not include `ancestor`.
    false
}

/// Removes `thought_id` from every keyword that tags it.
///
/// Does not delete the thought record itself.
pub fn on_delete_thought(
    tables: &mut Tables,
    thought_id: Uuid,
    policy: KeywordPolicy,
    report: &mut CascadeReport,
) {
    let tagging: Vec<Uuid> = tables
        .keywords
        .values()
        .filter(|k| k.tags(thought_id))
        .map(|k| k.id)
        .collect();

    for keyword_id in tagging {
        remove_reference(tables, keyword_id, thought_id, policy, report);
    }
}

/// Drops one thought reference from one keyword, pruning per policy.
pub fn remove_reference(
    tables: &mut Tables,
    keyword_id: Uuid,
    thought_id: Uuid,
    policy: KeywordPolicy,
    report: &mut CascadeReport,
) {
    let Some(keyword) = tables.keywords.get_mut(&keyword_id) else {
        return;
    };
    let before = keyword.thought_ids.len();
    keyword.thought_ids.retain(|id| *id != thought_id);
    if keyword.thought_ids.len() == before {
        return;
    }

    if keyword.thought_ids.is_empty() && policy == KeywordPolicy::PruneEmpty {
        tables.keywords.shift_remove(&keyword_id);
        report.note_removed_keyword(keyword_id);
    } else {
        report.note_updated_keyword(keyword_id);
    }
}

/// Deletes a box, its descendant boxes, and every thought inside them.
pub fn on_delete_box(tables: &mut Tables, box_id: Uuid, policy: KeywordPolicy) -> Result<CascadeReport> {
    if !tables.boxes.contains_key(&box_id) {
        return Err(MindBoxError::not_found(EntityKind::Box, box_id));
    }

    let doomed_boxes = subtree_ids(&tables.boxes, box_id);
    let doomed_set: HashSet<Uuid> = doomed_boxes.iter().copied().collect();
    let doomed_thoughts: Vec<Uuid> = tables
        .thoughts
        .values()
        .filter(|t| doomed_set.contains(&t.box_id))
        .map(|t| t.id)
        .collect();

    let mut report = CascadeReport::default();
    for thought_id in doomed_thoughts {
        tables.thoughts.shift_remove(&thought_id);
        on_delete_thought(tables, thought_id, policy, &mut report);
        report.removed_thoughts.push(thought_id);
    }

    for id in doomed_boxes {
        tables.boxes.shift_remove(&id);
        report.removed_boxes.push(id);
    }

    Ok(report)
}

/// Moves a box under `new_parent` (`None` = top level).
///
/// Returns `Ok(false)` when the box already has that parent.
pub fn on_reparent_box(
    tables: &mut Tables,
    box_id: Uuid,
    new_parent: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<bool> {
    if !tables.boxes.contains_key(&box_id) {
        return Err(MindBoxError::not_found(EntityKind::Box, box_id));
    }

    if let Some(parent_id) = new_parent {
        if !tables.boxes.contains_key(&parent_id) {
            return Err(MindBoxError::not_found(EntityKind::Box, parent_id));
        }
        if parent_id == box_id || is_descendant_of(&tables.boxes, parent_id, box_id) {
            return Err(MindBoxError::CycleDetected { box_id, parent_id });
        }
    }

    let Some(node) = tables.boxes.get_mut(&box_id) else {
        return Err(MindBoxError::not_found(EntityKind::Box, box_id));
    };
    if node.parent_box_id == new_parent {
        return Ok(false);
    }
    node.parent_box_id = new_parent;
    node.update_date = now;
    Ok(true)
}
