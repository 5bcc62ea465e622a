//! Element store: the authoritative element list and its structural edits.
//!
//! The store mutates elements but knows nothing about history or selection.
//! Each structural operation returns the ids the caller should select next.

use crate::config::EditorConfig;
use crate::element::{
    Element, ElementId, ElementKind, ElementPatch, ElementUpdate, FormField, FormFieldType,
    Geometry,
};
use crate::geometry::bounding_box;
use crate::responsive::{
    migrate_to_responsive, project, reflow_mobile, resolve_geometry, RenderElement, ViewMode,
};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors from structural store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Select at least two elements to group (got {selected})")]
    NotEnoughToGroup { selected: usize },
    #[error("Element {0} is already a group or part of one")]
    NestedGroup(ElementId),
}

/// Direction for [`ElementStore::change_layer_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerDirection {
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
}

const DESKTOP_ORIGIN: (f64, f64) = (100.0, 100.0);
const MOBILE_ORIGIN: (f64, f64) = (20.0, 100.0);

/// Desktop and mobile sizes a fresh element starts with.
fn template_size(kind: ElementKind) -> ((f64, f64), (f64, f64)) {
    match kind {
        ElementKind::Heading => ((300.0, 60.0), (350.0, 50.0)),
        ElementKind::Text => ((200.0, 100.0), (350.0, 80.0)),
        ElementKind::Button => ((150.0, 50.0), (200.0, 45.0)),
        ElementKind::Form => ((350.0, 300.0), (350.0, 280.0)),
        _ => ((200.0, 150.0), (300.0, 120.0)),
    }
}

/// A fresh element of `kind` with its stock content and style.
fn template(kind: ElementKind, z_index: u32) -> Element {
    let mut element = Element::new(kind);
    let ((dw, dh), (mw, mh)) = template_size(kind);
    let mut desktop = Geometry::new(DESKTOP_ORIGIN.0, DESKTOP_ORIGIN.1, dw, dh, z_index);
    let mut mobile = Geometry::new(MOBILE_ORIGIN.0, MOBILE_ORIGIN.1, mw, mh, z_index);

    match kind {
        ElementKind::Heading => element.content = Some("Heading Text".to_string()),
        ElementKind::Text => element.content = Some("Some text content".to_string()),
        ElementKind::Button => element.content = Some("Click me".to_string()),
        ElementKind::Form => {
            element.content = Some("Your form title".to_string());
            desktop.border_radius = Some(12.0);
            mobile.border_radius = Some(12.0);
            element.form_fields = vec![
                FormField::new("Name", FormFieldType::Text, true),
                FormField::new("Mail", FormFieldType::Email, true),
            ];
            for (key, value) in [
                ("backgroundType", json!("gradient")),
                ("gradientStartColor", json!("#C4B5FD")),
                ("gradientEndColor", json!("#A5B4FC")),
                ("gradientDirection", json!("to bottom right")),
                ("textColor", json!("#FFFFFF")),
                ("textAlign", json!("center")),
                ("fieldBackgroundColor", json!("#F3E8FF")),
                ("fieldTextColor", json!("#4A5568")),
                ("submitButtonText", json!("Submit")),
                ("submitButtonColor", json!("#4338CA")),
                ("submitButtonTextColor", json!("#FFFFFF")),
                ("submitButtonBackgroundType", json!("solid")),
            ] {
                element.style.insert(key.to_string(), value);
            }
        }
        _ => element.content = Some(String::new()),
    }

    element.desktop_properties = Some(desktop);
    element.mobile_properties = Some(mobile);
    element
}

/// Owns every element of the page.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    config: EditorConfig,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            elements: Vec::new(),
            config,
        }
    }

    /// Create a store over existing (possibly legacy) elements.
    pub fn with_elements(elements: Vec<Element>, config: EditorConfig) -> Self {
        Self { elements, config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// All elements in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Replace every element (undo/redo restore, document load).
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    fn position_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Resolved geometry of an element in `mode`.
    pub fn geometry(&self, id: ElementId, mode: ViewMode) -> Option<Geometry> {
        self.get(id)
            .map(|element| resolve_geometry(element, mode, &self.config))
    }

    /// Resolved box of an element in `mode`.
    pub fn rect(&self, id: ElementId, mode: ViewMode) -> Option<Rect> {
        self.geometry(id, mode).map(|g| g.rect())
    }

    /// Every element's box in `mode`, in document order.
    pub fn boxes(&self, mode: ViewMode) -> Vec<(ElementId, Rect)> {
        self.elements
            .iter()
            .map(|e| (e.id, resolve_geometry(e, mode, &self.config).rect()))
            .collect()
    }

    /// Members of a group.
    pub fn members(&self, group_id: ElementId) -> impl Iterator<Item = &Element> + '_ {
        self.elements
            .iter()
            .filter(move |e| e.group_id == Some(group_id))
    }

    pub fn member_ids(&self, group_id: ElementId) -> Vec<ElementId> {
        self.members(group_id).map(|e| e.id).collect()
    }

    /// Highest z-index in `mode`, or 0 for an empty page.
    pub fn max_z(&self, mode: ViewMode) -> u32 {
        self.elements
            .iter()
            .map(|e| resolve_geometry(e, mode, &self.config).z_index)
            .max()
            .unwrap_or(0)
    }

    /// Elements projected for `mode`, back to front.
    pub fn render(&self, mode: ViewMode) -> Vec<RenderElement> {
        let mut rendered: Vec<RenderElement> = self
            .elements
            .iter()
            .map(|e| project(e, mode, &self.config))
            .collect();
        rendered.sort_by_key(|e| e.geometry.z_index);
        rendered
    }

    /// Append a new element of `kind` with its stock template.
    ///
    /// Geometry in `overrides` lands in the `mode` projection; the rest is
    /// shared. The element goes on top of the stacking order in both modes.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        overrides: Option<&ElementPatch>,
        mode: ViewMode,
    ) -> ElementId {
        let z_index = ViewMode::ALL
            .iter()
            .map(|&m| self.max_z(m))
            .max()
            .unwrap_or(0)
            + 1;
        let mut element = template(kind, z_index);
        if let Some(patch) = overrides {
            patch.apply_shared(&mut element);
            if let Some(geometry) = element.projection_mut(mode) {
                patch.geometry.apply_to(geometry);
            }
        }

        let id = element.id;
        log::debug!("Added {} element {id}", kind.label());
        self.elements.push(element);
        id
    }

    /// Insert copies of a saved block.
    ///
    /// Every copy gets a fresh id and is offset from its saved position.
    /// Group membership inside the block is remapped to the new group ids;
    /// references to groups outside the block are dropped. Returns the
    /// top-level copies.
    pub fn add_block(&mut self, block: &[Element]) -> Vec<ElementId> {
        let group_ids: HashMap<ElementId, ElementId> = block
            .iter()
            .filter(|e| e.is_group())
            .map(|e| (e.id, Uuid::new_v4()))
            .collect();

        let mut copies: Vec<Element> = block
            .iter()
            .map(|source| {
                let mut copy = self.offset_copy(source);
                if let Some(&new_id) = group_ids.get(&source.id) {
                    copy.id = new_id;
                }
                match source.group_id.and_then(|g| group_ids.get(&g)) {
                    Some(&new_group) => copy.group_id = Some(new_group),
                    None => copy.leave_group(),
                }
                copy
            })
            .collect();
        self.stack_on_top(&mut copies);

        let top_level = copies
            .iter()
            .filter(|c| !c.is_grouped())
            .map(|c| c.id)
            .collect();
        log::debug!("Inserted block of {} elements", copies.len());
        self.elements.extend(copies);
        top_level
    }

    /// Apply one patch. Unknown ids are ignored. Returns `true` if applied.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch, mode: ViewMode) -> bool {
        let Some(index) = self.position_of(id) else {
            log::debug!("Ignoring update for unknown element {id}");
            return false;
        };
        let element = &mut self.elements[index];
        migrate_to_responsive(element, &self.config);
        patch.apply_shared(element);
        if let Some(geometry) = element.projection_mut(mode) {
            patch.geometry.apply_to(geometry);
        }
        true
    }

    /// Apply a batch of patches in order. Returns how many were applied.
    pub fn update_elements(&mut self, updates: &[ElementUpdate], mode: ViewMode) -> usize {
        updates
            .iter()
            .filter(|update| self.update_element(update.id, &update.patch, mode))
            .count()
    }

    /// Apply the same patch to several elements.
    pub fn update_multiple_elements(
        &mut self,
        ids: &[ElementId],
        patch: &ElementPatch,
        mode: ViewMode,
    ) -> usize {
        ids.iter()
            .filter(|&&id| self.update_element(id, patch, mode))
            .count()
    }

    /// Remove an element; removing a group removes its members too.
    /// Returns the removed ids.
    pub fn remove_element(&mut self, id: ElementId) -> Vec<ElementId> {
        let Some(target) = self.get(id) else {
            log::debug!("Ignoring removal of unknown element {id}");
            return Vec::new();
        };

        let mut removed = vec![id];
        if target.is_group() {
            removed.extend(self.member_ids(id));
        }
        self.elements.retain(|e| !removed.contains(&e.id));
        removed
    }

    /// Copy an element (and a group's members) next to the original and on
    /// top of the stack. A lone copy of a group member is not grouped.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let Some(source) = self.get(id) else {
            log::debug!("Ignoring duplicate of unknown element {id}");
            return None;
        };

        let mut root = self.offset_copy(source);
        root.leave_group();
        let new_id = root.id;
        let mut copies = vec![root];
        if source.is_group() {
            for member in self.members(id) {
                let mut copy = self.offset_copy(member);
                copy.group_id = Some(new_id);
                copies.push(copy);
            }
        }
        self.stack_on_top(&mut copies);
        self.elements.extend(copies);
        Some(new_id)
    }

    /// Move an element in the stacking order of `mode`, then renumber that
    /// mode's z-indices densely as `1..=N`.
    pub fn change_layer_order(
        &mut self,
        id: ElementId,
        direction: LayerDirection,
        mode: ViewMode,
    ) -> bool {
        if !self.contains(id) {
            log::debug!("Ignoring layer change for unknown element {id}");
            return false;
        }
        self.migrate_all();

        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| self.elements[i].projection(mode).map_or(0, |g| g.z_index));
        let Some(pos) = order.iter().position(|&i| self.elements[i].id == id) else {
            return false;
        };

        match direction {
            LayerDirection::BringToFront => {
                let index = order.remove(pos);
                order.push(index);
            }
            LayerDirection::SendToBack => {
                let index = order.remove(pos);
                order.insert(0, index);
            }
            LayerDirection::BringForward => {
                if pos + 1 < order.len() {
                    order.swap(pos, pos + 1);
                }
            }
            LayerDirection::SendBackward => {
                if pos > 0 {
                    order.swap(pos, pos - 1);
                }
            }
        }

        for (rank, index) in order.into_iter().enumerate() {
            if let Some(geometry) = self.elements[index].projection_mut(mode) {
                geometry.z_index = rank as u32 + 1;
            }
        }
        true
    }

    /// Wrap the given elements in a new group.
    ///
    /// The group box is the union of the members in each mode, and the group
    /// sits above its highest member. Member offsets are recorded relative to
    /// the group's corner in `mode`.
    pub fn group_elements(
        &mut self,
        ids: &[ElementId],
        name: &str,
        mode: ViewMode,
    ) -> Result<ElementId, StoreError> {
        let mut indices: Vec<usize> = ids.iter().filter_map(|&id| self.position_of(id)).collect();
        indices.sort_unstable();
        indices.dedup();
        if indices.len() < 2 {
            return Err(StoreError::NotEnoughToGroup {
                selected: indices.len(),
            });
        }
        if let Some(&i) = indices
            .iter()
            .find(|&&i| self.elements[i].is_group() || self.elements[i].is_grouped())
        {
            return Err(StoreError::NestedGroup(self.elements[i].id));
        }

        for &i in &indices {
            migrate_to_responsive(&mut self.elements[i], &self.config);
        }

        let mut group = Element::new(ElementKind::Group);
        group.name = Some(name.to_string());
        for m in ViewMode::ALL {
            let members: Vec<&Geometry> = indices
                .iter()
                .filter_map(|&i| self.elements[i].projection(m))
                .collect();
            let Some(bounds) = bounding_box(members.iter().map(|g| g.rect())) else {
                continue;
            };
            let top = members.iter().map(|g| g.z_index).max().unwrap_or(0);
            group.set_projection(
                m,
                Geometry::new(bounds.x0, bounds.y0, bounds.width(), bounds.height(), top + 1),
            );
        }

        let origin = group
            .projection(mode)
            .map_or(Vec2::ZERO, |g| Vec2::new(g.x, g.y));
        let group_id = group.id;
        for &i in &indices {
            let element = &mut self.elements[i];
            element.group_id = Some(group_id);
            if let Some(g) = element.projection(mode).copied() {
                element.relative_x = Some(g.x - origin.x);
                element.relative_y = Some(g.y - origin.y);
            }
        }

        log::debug!("Grouped {} elements into {group_id}", indices.len());
        self.elements.push(group);
        Ok(group_id)
    }

    /// Dissolve a group. Members keep their absolute positions.
    /// Returns the former members, or `None` if `group_id` is not a group.
    pub fn ungroup_elements(&mut self, group_id: ElementId) -> Option<Vec<ElementId>> {
        if !self.get(group_id).is_some_and(Element::is_group) {
            log::debug!("Ignoring ungroup of non-group {group_id}");
            return None;
        }

        let mut members = Vec::new();
        for element in &mut self.elements {
            if element.group_id == Some(group_id) {
                element.leave_group();
                members.push(element.id);
            }
        }
        self.elements.retain(|e| e.id != group_id);
        Some(members)
    }

    /// Prepare the elements for editing in `mode`: migrate everything and,
    /// entering mobile, stack the content vertically.
    pub fn switch_mode(&mut self, mode: ViewMode) {
        self.migrate_all();
        if mode.is_mobile() {
            reflow_mobile(&mut self.elements, &self.config);
        }
    }

    /// Re-run the mobile vertical layout.
    pub fn apply_mobile_vertical_layout(&mut self) {
        reflow_mobile(&mut self.elements, &self.config);
    }

    /// Migrate every legacy element. Returns how many changed.
    pub fn migrate_all(&mut self) -> usize {
        let config = &self.config;
        self.elements
            .iter_mut()
            .filter(|e| !e.is_responsive() || !e.legacy.is_empty())
            .map(|e| migrate_to_responsive(e, config))
            .filter(|&changed| changed)
            .count()
    }

    /// Elements whose `group_id` does not name a group in the store.
    pub fn invalid_group_refs(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| {
                e.group_id
                    .is_some_and(|g| !self.get(g).is_some_and(Element::is_group))
            })
            .map(|e| e.id)
            .collect()
    }

    /// Clone with a fresh id, migrated and offset in both modes.
    fn offset_copy(&self, source: &Element) -> Element {
        let mut copy = source.clone();
        copy.id = Uuid::new_v4();
        migrate_to_responsive(&mut copy, &self.config);
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        for mode in ViewMode::ALL {
            if let Some(geometry) = copy.projection_mut(mode) {
                geometry.translate(offset);
            }
        }
        copy
    }

    /// Renumber copies above everything in the store, keeping their relative
    /// order, independently per mode.
    fn stack_on_top(&self, copies: &mut [Element]) {
        for mode in ViewMode::ALL {
            let top = self.max_z(mode);
            let mut order: Vec<usize> = (0..copies.len()).collect();
            order.sort_by_key(|&i| copies[i].projection(mode).map_or(0, |g| g.z_index));
            for (rank, index) in order.into_iter().enumerate() {
                if let Some(geometry) = copies[index].projection_mut(mode) {
                    geometry.z_index = top + rank as u32 + 1;
                }
            }
        }
    }
}
