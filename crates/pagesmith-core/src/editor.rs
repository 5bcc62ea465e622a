//! Editor state: selection, mode, tool and history around the element store.
//!
//! Every committing operation records exactly one history snapshot. Gesture
//! updates between a start and a stop call are transient.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ElementPatch, ElementUpdate};
use crate::geometry::SnapLines;
use crate::history::{History, Snapshot};
use crate::input::{KeyEvent, Shortcut};
use crate::interaction::{HandleKind, InteractionEngine};
use crate::responsive::{RenderElement, ViewMode, canvas_size, page_height};
use crate::store::{ElementStore, LayerDirection, StoreError};
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport height assumed until the host reports one.
const DEFAULT_VIEWPORT_HEIGHT: f64 = 1080.0;

/// How prominent a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn warning(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Warning,
        }
    }
}

impl From<&StoreError> for Notification {
    fn from(error: &StoreError) -> Self {
        match error {
            StoreError::NotEnoughToGroup { .. } => Notification::warning(
                "Cannot group",
                "Select at least two elements to create a group.",
            ),
            StoreError::NestedGroup(_) => Notification::warning(
                "Cannot group",
                "Groups cannot contain other groups. Ungroup first.",
            ),
        }
    }
}

/// The page being edited.
#[derive(Debug, Clone)]
pub struct Editor {
    store: ElementStore,
    history: History,
    engine: InteractionEngine,
    selection: Vec<ElementId>,
    tool: ToolKind,
    mode: ViewMode,
    background_color: String,
    notifications: Vec<Notification>,
    panels_visible: bool,
    viewport_height: f64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty page.
    pub fn new(config: EditorConfig) -> Self {
        let background_color = config.default_page_background.clone();
        let history = History::with_capacity(
            Snapshot::new(Vec::new(), background_color.clone()),
            config.history_capacity,
        );
        Self {
            store: ElementStore::new(config),
            history,
            engine: InteractionEngine::new(),
            selection: Vec::new(),
            tool: ToolKind::default(),
            mode: ViewMode::default(),
            background_color,
            notifications: Vec::new(),
            panels_visible: true,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        self.store.config()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand pending notifications to the host.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn panels_visible(&self) -> bool {
        self.panels_visible
    }

    /// Hide or show the editing panels around the canvas.
    pub fn set_panels_visible(&mut self, visible: bool) {
        self.panels_visible = visible;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Alignment guides of the running gesture.
    pub fn guides(&self) -> &SnapLines {
        self.engine.guides()
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.engine.marquee_rect()
    }

    /// Elements in the active mode, back to front.
    pub fn render(&self) -> Vec<RenderElement> {
        self.store.render(self.mode)
    }

    /// Height of the virtual page in the active mode.
    pub fn page_height(&self) -> f64 {
        let rects = self.store.boxes(self.mode).into_iter().map(|(_, rect)| rect);
        page_height(rects, self.viewport_height, self.store.config())
    }

    /// Logical canvas size in the active mode.
    pub fn canvas_size(&self) -> Size {
        canvas_size(self.mode, self.page_height(), self.store.config())
    }

    /// The current state as a history snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.store.elements().to_vec(), self.background_color.clone())
    }

    fn commit(&mut self) {
        let snapshot = self.snapshot();
        self.history.commit(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.store.set_elements(snapshot.elements);
        self.background_color = snapshot.page_background_color;
        self.engine.reset();
        let store = &self.store;
        self.selection.retain(|&id| store.contains(id));
    }

    fn notify(&mut self, error: &StoreError) {
        log::warn!("{error}");
        self.notifications.push(Notification::from(error));
    }

    // --- Selection ---

    /// Replace the selection with the click target of `id`.
    pub fn select(&mut self, id: ElementId) {
        self.selection.clear();
        self.add_to_selection(id);
    }

    /// Add the click target of `id` to the selection.
    pub fn add_to_selection(&mut self, id: ElementId) {
        let Some(target) = self.store.get(id).map(Element::selection_target) else {
            log::debug!("Ignoring selection of unknown element {id}");
            return;
        };
        if !self.selection.contains(&target) {
            self.selection.push(target);
        }
    }

    /// Click semantics: shift toggles the target in the selection, a plain
    /// click makes it the only selection. Group members promote to the group.
    pub fn click(&mut self, id: ElementId, shift: bool) {
        let Some(target) = self.store.get(id).map(Element::selection_target) else {
            log::debug!("Ignoring click on unknown element {id}");
            return;
        };
        if !shift {
            self.selection = vec![target];
        } else if let Some(pos) = self.selection.iter().position(|&s| s == target) {
            self.selection.remove(pos);
        } else {
            self.selection.push(target);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every top-level element (groups and ungrouped elements).
    pub fn select_all(&mut self) {
        self.selection = self
            .store
            .elements()
            .iter()
            .filter(|e| !e.is_grouped())
            .map(|e| e.id)
            .collect();
    }

    // --- Committing operations ---

    /// Add an element and make it the sole selection.
    pub fn add_element(&mut self, kind: ElementKind, overrides: Option<&ElementPatch>) -> ElementId {
        let id = self.store.add_element(kind, overrides, self.mode);
        self.selection = vec![id];
        self.commit();
        id
    }

    /// Insert a saved block and select what was inserted.
    pub fn add_block(&mut self, block: &[Element]) -> Vec<ElementId> {
        let inserted = self.store.add_block(block);
        if inserted.is_empty() {
            return inserted;
        }
        self.selection = inserted.clone();
        self.commit();
        inserted
    }

    /// Patch one element and record the result.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let applied = self.store.update_element(id, patch, self.mode);
        if applied {
            self.commit();
        }
        applied
    }

    /// Patch several elements as one undo step.
    pub fn update_elements(&mut self, updates: &[ElementUpdate]) -> usize {
        let applied = self.store.update_elements(updates, self.mode);
        if applied > 0 {
            self.commit();
        }
        applied
    }

    /// Patch without recording history (live property previews).
    pub fn update_transient(&mut self, updates: &[ElementUpdate]) -> usize {
        self.store.update_elements(updates, self.mode)
    }

    /// Apply the same patch to several elements as one undo step.
    pub fn update_multiple_elements(&mut self, ids: &[ElementId], patch: &ElementPatch) -> usize {
        let applied = self.store.update_multiple_elements(ids, patch, self.mode);
        if applied > 0 {
            self.commit();
        }
        applied
    }

    /// Remove an element (a group takes its members along) and clear the selection.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        if self.store.remove_element(id).is_empty() {
            return false;
        }
        self.selection.clear();
        self.commit();
        true
    }

    /// Remove everything selected as a single undo step.
    pub fn delete_selected(&mut self) -> usize {
        let mut removed = 0;
        for id in std::mem::take(&mut self.selection) {
            removed += self.store.remove_element(id).len();
        }
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Duplicate an element and select the copy.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let copy = self.store.duplicate_element(id)?;
        self.selection = vec![copy];
        self.commit();
        Some(copy)
    }

    /// Duplicate everything selected as one undo step and select the copies.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let copies: Vec<ElementId> = self
            .selection
            .clone()
            .into_iter()
            .filter_map(|id| self.store.duplicate_element(id))
            .collect();
        if !copies.is_empty() {
            self.selection = copies.clone();
            self.commit();
        }
        copies
    }

    pub fn change_layer_order(&mut self, id: ElementId, direction: LayerDirection) -> bool {
        let changed = self.store.change_layer_order(id, direction, self.mode);
        if changed {
            self.commit();
        }
        changed
    }

    /// Group the selection under `name` and select the new group.
    ///
    /// With fewer than two elements selected nothing changes and a warning
    /// notification is queued.
    pub fn group_selected(&mut self, name: &str) -> Option<ElementId> {
        match self.store.group_elements(&self.selection, name, self.mode) {
            Ok(group) => {
                self.selection = vec![group];
                self.commit();
                Some(group)
            }
            Err(error) => {
                self.notify(&error);
                None
            }
        }
    }

    /// Name for the next group created without one.
    fn next_group_name(&self) -> String {
        let groups = self.store.elements().iter().filter(|e| e.is_group()).count();
        format!("Group {}", groups + 1)
    }

    /// Dissolve a group and clear the selection.
    pub fn ungroup(&mut self, group_id: ElementId) -> Vec<ElementId> {
        let Some(members) = self.store.ungroup_elements(group_id) else {
            return Vec::new();
        };
        self.selection.clear();
        self.commit();
        members
    }

    /// Dissolve every selected group as one undo step.
    pub fn ungroup_selected(&mut self) -> Vec<ElementId> {
        let mut members = Vec::new();
        for id in self.selection.clone() {
            if let Some(ids) = self.store.ungroup_elements(id) {
                members.extend(ids);
            }
        }
        if !members.is_empty() {
            self.selection.clear();
            self.commit();
        }
        members
    }

    /// Change the page background as an undoable edit.
    pub fn set_background_color(&mut self, color: &str) {
        if self.background_color == color {
            return;
        }
        self.background_color = color.to_string();
        self.commit();
    }

    /// Switch responsive mode. Entering mobile reflows the content.
    pub fn switch_mode(&mut self, mode: ViewMode) {
        self.engine.reset();
        self.store.switch_mode(mode);
        self.mode = mode;
        log::info!("Switched to {mode:?} mode");
        self.commit();
    }

    /// Re-stack the mobile layout. Does nothing in desktop mode.
    pub fn apply_mobile_vertical_layout(&mut self) {
        if !self.mode.is_mobile() {
            return;
        }
        self.store.apply_mobile_vertical_layout();
        self.commit();
    }

    /// Empty the page and start a fresh history.
    pub fn clear_canvas(&mut self) {
        self.engine.reset();
        self.store.clear();
        self.selection.clear();
        self.background_color = self.store.config().default_page_background.clone();
        let snapshot = self.snapshot();
        self.history.reset(snapshot);
        log::info!("Canvas cleared");
    }

    /// Replace the page with loaded content and start a fresh history.
    pub fn load_document(&mut self, elements: Vec<Element>, background_color: &str) {
        self.engine.reset();
        self.store.set_elements(elements);
        self.selection.clear();
        self.background_color = background_color.to_string();
        let snapshot = self.snapshot();
        self.history.reset(snapshot);
        log::info!("Loaded page with {} elements", self.store.len());
    }

    /// Step back one snapshot. Returns `false` at the oldest state.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Step forward one snapshot. Returns `false` at the newest state.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// React to a key press. Returns `true` if it was handled.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let Some(shortcut) = event.shortcut() else {
            return false;
        };
        match shortcut {
            Shortcut::DeleteSelection => {
                self.delete_selected();
            }
            Shortcut::ShowPanels => self.panels_visible = true,
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Duplicate => {
                self.duplicate_selected();
            }
            Shortcut::Group => {
                let name = self.next_group_name();
                self.group_selected(&name);
            }
            Shortcut::SelectAll => self.select_all(),
            Shortcut::Tool(tool) => self.tool = tool,
        }
        true
    }

    // --- Gestures ---

    /// Pointer down on an element. A plain press on something already
    /// selected keeps the selection so the whole set can move; otherwise
    /// click semantics apply.
    fn press(&mut self, id: ElementId, shift: bool) {
        let already_selected = self
            .store
            .get(id)
            .is_some_and(|e| self.selection.contains(&e.selection_target()));
        if shift || !already_selected {
            self.click(id, shift);
        }
    }

    /// Pointer down on an element: update the selection and start dragging.
    pub fn drag_start(&mut self, id: ElementId, shift: bool) -> bool {
        if !self.tool.edits_elements() {
            return false;
        }
        self.press(id, shift);
        self.engine
            .drag_start(&self.store, id, &self.selection, self.mode)
    }

    /// Pointer moved by `delta` since the drag began.
    pub fn drag(&mut self, delta: Vec2) -> bool {
        let canvas = self.canvas_size();
        self.engine.drag(&mut self.store, delta, self.mode, canvas)
    }

    /// Pointer released `delta` from where the drag began.
    pub fn drag_stop(&mut self, delta: Vec2) -> bool {
        if self.engine.drag_stop(&mut self.store, delta, self.mode).is_none() {
            return false;
        }
        self.commit();
        true
    }

    /// Pointer down on a resize handle of `id`.
    pub fn resize_start(&mut self, id: ElementId, handle: HandleKind, shift: bool) -> bool {
        if !self.tool.edits_elements() {
            return false;
        }
        self.press(id, shift);
        self.engine
            .resize_start(&self.store, id, handle, &self.selection, self.mode)
    }

    pub fn resize(&mut self, proposed: Rect) -> bool {
        let canvas = self.canvas_size();
        self.engine.resize(&mut self.store, proposed, self.mode, canvas)
    }

    pub fn resize_stop(&mut self, proposed: Rect) -> bool {
        if self.engine.resize_stop(&mut self.store, proposed, self.mode).is_none() {
            return false;
        }
        self.commit();
        true
    }

    /// Pointer down on the canvas background.
    pub fn marquee_start(&mut self, point: Point) -> bool {
        if !self.tool.edits_elements() {
            return false;
        }
        self.engine.marquee_start(point)
    }

    pub fn marquee_move(&mut self, point: Point) -> Option<Rect> {
        self.engine.marquee_move(point)
    }

    /// Pointer released: select what the marquee covered.
    pub fn marquee_end(&mut self) -> bool {
        let Some(selected) = self.engine.marquee_end(&self.store, self.mode) else {
            return false;
        };
        self.selection = selected;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::GeometryPatch;
    use crate::input::{Key, Modifiers};

    fn place(editor: &mut Editor, x: f64, y: f64, w: f64, h: f64) -> ElementId {
        let patch = ElementPatch::geometry(GeometryPatch {
            x: Some(x),
            y: Some(y),
            width: Some(w),
            height: Some(h),
            ..GeometryPatch::default()
        });
        editor.add_element(ElementKind::Shape, Some(&patch))
    }

    fn position(editor: &Editor, id: ElementId) -> (f64, f64) {
        let g = editor.store().geometry(id, editor.mode()).unwrap();
        (g.x, g.y)
    }

    #[test]
    fn test_add_element_selects_and_commits() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Heading, None);

        assert_eq!(editor.selection(), &[id]);
        assert_eq!(editor.history().len(), 2);
        assert!(editor.can_undo());

        assert!(editor.undo());
        assert!(editor.store().is_empty());
        assert!(editor.selection().is_empty());
        assert!(editor.redo());
        assert!(editor.store().contains(id));
    }

    #[test]
    fn test_drag_is_one_history_entry() {
        let mut editor = Editor::default();
        let id = place(&mut editor, 100.0, 100.0, 200.0, 150.0);
        let entries = editor.history().len();

        assert!(editor.drag_start(id, false));
        editor.drag(Vec2::new(5.0, 5.0));
        editor.drag(Vec2::new(13.0, -4.0));
        assert_eq!(editor.history().len(), entries);

        assert!(editor.drag_stop(Vec2::new(13.0, -4.0)));
        assert_eq!(editor.history().len(), entries + 1);
        assert_eq!(position(&editor, id), (110.0, 100.0));

        editor.undo();
        assert_eq!(position(&editor, id), (100.0, 100.0));
    }

    #[test]
    fn test_drag_moves_whole_selection() {
        let mut editor = Editor::default();
        let a = place(&mut editor, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut editor, 400.0, 400.0, 100.0, 100.0);
        editor.select(a);
        editor.add_to_selection(b);
        let entries = editor.history().len();

        assert!(editor.drag_start(a, false));
        assert!(editor.drag_stop(Vec2::new(20.0, 20.0)));

        assert_eq!(position(&editor, a), (120.0, 120.0));
        assert_eq!(position(&editor, b), (420.0, 420.0));
        assert_eq!(editor.selection(), &[a, b]);
        assert_eq!(editor.history().len(), entries + 1);
    }

    #[test]
    fn test_drag_unselected_element_replaces_selection() {
        let mut editor = Editor::default();
        let a = place(&mut editor, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut editor, 400.0, 400.0, 100.0, 100.0);
        let c = place(&mut editor, 700.0, 100.0, 100.0, 100.0);
        editor.select(a);
        editor.add_to_selection(b);

        editor.drag_start(c, false);
        editor.drag_stop(Vec2::new(20.0, 0.0));

        assert_eq!(editor.selection(), &[c]);
        assert_eq!(position(&editor, c), (720.0, 100.0));
        assert_eq!(position(&editor, a), (100.0, 100.0));
    }

    #[test]
    fn test_group_resize_is_one_undo_step() {
        let mut editor = Editor::default();
        let a = place(&mut editor, 100.0, 100.0, 300.0, 60.0);
        let b = place(&mut editor, 150.0, 200.0, 100.0, 50.0);
        editor.select(a);
        editor.add_to_selection(b);
        let group = editor.group_selected("G1").unwrap();
        let entries = editor.history().len();
        let handle = HandleKind::Corner(crate::interaction::Corner::BottomRight);

        editor.resize_start(b, handle, false);
        editor.resize(Rect::new(100.0, 100.0, 640.0, 370.0));
        assert!(editor.resize_stop(Rect::new(100.0, 100.0, 700.0, 400.0)));
        assert_eq!(editor.history().len(), entries + 1);
        assert_eq!(editor.store().rect(b, ViewMode::Desktop).unwrap().width(), 200.0);

        editor.undo();
        assert_eq!(
            editor.store().rect(group, ViewMode::Desktop).unwrap(),
            Rect::new(100.0, 100.0, 400.0, 250.0)
        );
        assert_eq!(position(&editor, b), (150.0, 200.0));
        assert_eq!(editor.store().rect(b, ViewMode::Desktop).unwrap().width(), 100.0);
    }

    #[test]
    fn test_drag_back_to_start_adds_nothing() {
        let mut editor = Editor::default();
        let id = place(&mut editor, 100.0, 100.0, 200.0, 150.0);
        let entries = editor.history().len();

        editor.drag_start(id, false);
        editor.drag(Vec2::new(30.0, 30.0));
        editor.drag_stop(Vec2::new(2.0, -3.0));
        assert_eq!(editor.history().len(), entries);
    }

    #[test]
    fn test_group_needs_two_and_notifies() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text, None);
        let entries = editor.history().len();
        let before = editor.store().elements().to_vec();

        assert_eq!(editor.group_selected("G1"), None);
        assert_eq!(editor.store().elements(), &before[..]);
        assert_eq!(editor.history().len(), entries);
        assert_eq!(editor.selection(), &[id]);

        let notes = editor.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
        assert!(editor.notifications().is_empty());
    }

    #[test]
    fn test_group_then_ungroup_scenario() {
        let mut editor = Editor::default();
        let heading = editor.add_element(ElementKind::Heading, None);
        let text = editor.add_element(
            ElementKind::Text,
            Some(&ElementPatch::geometry(GeometryPatch::position(150.0, 200.0))),
        );
        editor.select(heading);
        editor.click(text, true);

        let group = editor.group_selected("G1").unwrap();
        assert_eq!(editor.selection(), &[group]);
        assert_eq!(
            editor.store().rect(group, ViewMode::Desktop).unwrap(),
            Rect::new(100.0, 100.0, 400.0, 300.0)
        );

        // Clicking a member selects the group.
        editor.click(heading, false);
        assert_eq!(editor.selection(), &[group]);

        editor.ungroup(group);
        assert!(editor.selection().is_empty());
        assert!(!editor.store().contains(group));
        assert_eq!(position(&editor, text), (150.0, 200.0));
        assert!(editor.store().get(text).unwrap().group_id.is_none());
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut editor = Editor::default();
        let a = editor.add_element(ElementKind::Text, None);
        let b = editor.add_element(ElementKind::Text, None);

        editor.click(a, false);
        editor.click(b, true);
        assert_eq!(editor.selection(), &[a, b]);
        editor.click(a, true);
        assert_eq!(editor.selection(), &[b]);
        editor.click(a, false);
        assert_eq!(editor.selection(), &[a]);
    }

    #[test]
    fn test_delete_selected_is_one_undo_step() {
        let mut editor = Editor::default();
        place(&mut editor, 0.0, 0.0, 50.0, 50.0);
        place(&mut editor, 100.0, 0.0, 50.0, 50.0);
        place(&mut editor, 200.0, 0.0, 50.0, 50.0);
        editor.select_all();

        assert!(editor.handle_key(KeyEvent::new(Key::Backspace, Modifiers::NONE)));
        assert!(editor.store().is_empty());
        assert!(editor.selection().is_empty());

        editor.handle_key(KeyEvent::new(Key::Character('z'), Modifiers::ctrl()));
        assert_eq!(editor.store().len(), 3);
    }

    #[test]
    fn test_select_all_skips_members() {
        let mut editor = Editor::default();
        let a = editor.add_element(ElementKind::Text, None);
        let b = editor.add_element(ElementKind::Text, None);
        let c = editor.add_element(ElementKind::Text, None);
        editor.select(a);
        editor.add_to_selection(b);
        let group = editor.group_selected("G").unwrap();

        editor.select_all();
        assert_eq!(editor.selection(), &[c, group]);
    }

    #[test]
    fn test_background_color_is_undoable() {
        let mut editor = Editor::default();
        assert_eq!(editor.background_color(), "#485060");
        editor.set_background_color("#FFFFFF");
        editor.set_background_color("#FFFFFF");
        assert_eq!(editor.history().len(), 2);

        editor.undo();
        assert_eq!(editor.background_color(), "#485060");
    }

    #[test]
    fn test_load_document_resets_history() {
        let mut editor = Editor::default();
        editor.add_element(ElementKind::Text, None);
        let elements = editor.store().elements().to_vec();

        editor.load_document(elements, "#000000");
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.can_undo());
        assert_eq!(editor.background_color(), "#000000");
        assert_eq!(editor.store().len(), 1);
    }

    #[test]
    fn test_clear_canvas() {
        let mut editor = Editor::default();
        editor.add_element(ElementKind::Text, None);
        editor.set_background_color("#123456");

        editor.clear_canvas();
        assert!(editor.store().is_empty());
        assert_eq!(editor.background_color(), "#485060");
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_escape_restores_panels() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text, None);
        editor.set_panels_visible(false);

        editor.handle_key(KeyEvent::new(Key::Escape, Modifiers::NONE));
        assert!(editor.panels_visible());
        assert_eq!(editor.selection(), &[id]);
    }

    #[test]
    fn test_hand_tool_blocks_gestures() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text, None);
        editor.handle_key(KeyEvent::new(Key::Character('h'), Modifiers::NONE));
        assert_eq!(editor.tool(), ToolKind::Hand);

        assert!(!editor.drag_start(id, false));
        assert!(!editor.marquee_start(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_marquee_sets_selection() {
        let mut editor = Editor::default();
        let a = place(&mut editor, 100.0, 100.0, 100.0, 100.0);
        place(&mut editor, 900.0, 900.0, 100.0, 100.0);
        editor.clear_selection();

        editor.marquee_start(Point::new(0.0, 0.0));
        editor.marquee_move(Point::new(300.0, 300.0));
        assert!(editor.marquee_end());
        assert_eq!(editor.selection(), &[a]);
    }

    #[test]
    fn test_resize_commits_once() {
        let mut editor = Editor::default();
        let id = place(&mut editor, 100.0, 100.0, 200.0, 150.0);
        let entries = editor.history().len();
        let handle = HandleKind::Corner(crate::interaction::Corner::BottomRight);

        editor.resize_start(id, handle, false);
        editor.resize(Rect::new(100.0, 100.0, 333.0, 277.0));
        assert!(editor.resize_stop(Rect::new(100.0, 100.0, 333.0, 277.0)));

        assert_eq!(editor.history().len(), entries + 1);
        let g = editor.store().geometry(id, ViewMode::Desktop).unwrap();
        assert_eq!((g.width, g.height), (230.0, 180.0));
    }

    #[test]
    fn test_switch_mode_uses_mobile_geometry() {
        let mut editor = Editor::default();
        let id = place(&mut editor, 600.0, 300.0, 500.0, 100.0);

        editor.switch_mode(ViewMode::Mobile);
        let rendered = editor.render();
        assert_eq!(rendered[0].geometry.x, 20.0);
        assert!(rendered[0].geometry.width <= 350.0);
        assert_eq!(editor.canvas_size().width, 390.0);

        editor.switch_mode(ViewMode::Desktop);
        assert_eq!(position(&editor, id), (600.0, 300.0));
    }

    #[test]
    fn test_duplicate_shortcut() {
        let mut editor = Editor::default();
        let id = place(&mut editor, 100.0, 100.0, 100.0, 100.0);

        editor.handle_key(KeyEvent::new(Key::Character('d'), Modifiers::ctrl()));
        assert_eq!(editor.store().len(), 2);
        let copy = editor.selection()[0];
        assert_ne!(copy, id);
        assert_eq!(position(&editor, copy), (120.0, 120.0));
    }
}
