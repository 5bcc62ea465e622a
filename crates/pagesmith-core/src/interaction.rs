//! Pointer gestures on the canvas: drag, resize and marquee selection.
//!
//! Only one gesture is active at a time. While a gesture runs, geometry is
//! written to the store transiently; the stop call writes the grid-snapped
//! result and hands the batch back so the caller can record one history entry.

use crate::element::{ElementId, ElementPatch, ElementUpdate, GeometryPatch};
use crate::geometry::{
    SnapLines, candidate_snap_lines, lines_near, rects_overlap, snap_rect_to_grid, snap_to_grid,
};
use crate::responsive::ViewMode;
use crate::store::ElementStore;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in canvas pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Resize handle on a selected element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Edge(Edge::Top),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Edge(Edge::Right),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Edge(Edge::Left),
    ];

    /// Where this handle sits on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(rect.x0, rect.y0),
            HandleKind::Corner(Corner::TopRight) => Point::new(rect.x1, rect.y0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(rect.x0, rect.y1),
            HandleKind::Corner(Corner::BottomRight) => Point::new(rect.x1, rect.y1),
            HandleKind::Edge(Edge::Top) => Point::new(center.x, rect.y0),
            HandleKind::Edge(Edge::Right) => Point::new(rect.x1, center.y),
            HandleKind::Edge(Edge::Bottom) => Point::new(center.x, rect.y1),
            HandleKind::Edge(Edge::Left) => Point::new(rect.x0, center.y),
        }
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopRight | Corner::BottomRight)
                | HandleKind::Edge(Edge::Right)
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight)
                | HandleKind::Edge(Edge::Bottom)
        )
    }

    /// Box proposed by dragging this handle of `original` by `delta`.
    pub fn apply(self, original: Rect, delta: Vec2) -> Rect {
        let mut rect = original;
        if self.moves_left() {
            rect.x0 += delta.x;
        }
        if self.moves_right() {
            rect.x1 += delta.x;
        }
        if self.moves_top() {
            rect.y0 += delta.y;
        }
        if self.moves_bottom() {
            rect.y1 += delta.y;
        }
        rect
    }
}

/// Find the handle of `rect` under `point`, if any.
pub fn hit_test_handles(rect: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    HandleKind::ALL
        .into_iter()
        .find(|handle| (handle.position(rect) - point).hypot() <= tolerance)
}

/// State of an in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Element whose box drives the alignment guides.
    pub anchor: ElementId,
    /// Anchor box when the drag began.
    pub anchor_start: Rect,
    /// Every moving element with its starting position.
    pub starts: Vec<(ElementId, Point)>,
}

impl DragState {
    /// Ids of everything that moves.
    pub fn ids(&self) -> Vec<ElementId> {
        self.starts.iter().map(|(id, _)| *id).collect()
    }

    fn translated(&self, delta: Vec2) -> Vec<ElementUpdate> {
        self.starts
            .iter()
            .map(|(id, start)| ElementUpdate::position(*id, start.x + delta.x, start.y + delta.y))
            .collect()
    }
}

/// A group member captured at the start of a group resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberFrame {
    pub id: ElementId,
    /// Offset from the group's top-left corner.
    pub offset: Vec2,
    pub size: Size,
}

/// State of an in-progress resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub target: ElementId,
    pub handle: HandleKind,
    /// Target box when the resize began.
    pub original: Rect,
    /// Latest proposed box after guide snapping.
    pub current: Rect,
    /// Members scaled along with a group target.
    pub members: Vec<MemberFrame>,
    /// Elements excluded from snapping.
    pub excluded: Vec<ElementId>,
}

impl ResizeState {
    /// Updates placing the target at `rect` and scaling members with it.
    fn frame_updates(&self, rect: Rect) -> Vec<ElementUpdate> {
        let sx = scale(rect.width(), self.original.width());
        let sy = scale(rect.height(), self.original.height());

        let mut updates = vec![ElementUpdate::rect(self.target, rect)];
        updates.extend(self.members.iter().map(|member| {
            frame(
                member.id,
                rect.x0 + member.offset.x * sx,
                rect.y0 + member.offset.y * sy,
                member.size.width * sx,
                member.size.height * sy,
            )
        }));
        updates
    }
}

fn scale(new: f64, original: f64) -> f64 {
    if original > 0.0 { new / original } else { 1.0 }
}

fn frame(id: ElementId, x: f64, y: f64, width: f64, height: f64) -> ElementUpdate {
    ElementUpdate::new(
        id,
        ElementPatch::geometry(GeometryPatch {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..GeometryPatch::default()
        }),
    )
}

/// State of an in-progress marquee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeState {
    pub start: Point,
    pub current: Point,
}

impl MarqueeState {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

/// The active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    Marquee(MarqueeState),
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging(_) => "drag",
            Gesture::Resizing(_) => "resize",
            Gesture::Marquee(_) => "marquee",
        }
    }
}

/// Interprets pointer gestures against the element store.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    gesture: Gesture,
    guides: SnapLines,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Alignment guides to draw for the current gesture.
    pub fn guides(&self) -> &SnapLines {
        &self.guides
    }

    /// The live marquee rectangle, if a marquee is running.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }

    /// Drop any gesture without writing anything (document load, clear).
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.guides = SnapLines::default();
    }

    fn ensure_idle(&self, starting: &str) -> bool {
        if self.is_idle() {
            return true;
        }
        log::warn!(
            "Ignoring {starting} start while a {} is active",
            self.gesture.name()
        );
        false
    }

    /// Begin dragging `id`.
    ///
    /// A group, or any member of one, drags the group with all its members.
    /// Otherwise an element inside `selection` drags the whole selection
    /// (groups in it bring their members). Anything else drags alone.
    pub fn drag_start(
        &mut self,
        store: &ElementStore,
        id: ElementId,
        selection: &[ElementId],
        mode: ViewMode,
    ) -> bool {
        if !self.ensure_idle("drag") {
            return false;
        }
        let Some(element) = store.get(id) else {
            log::debug!("Ignoring drag of unknown element {id}");
            return false;
        };

        let anchor = element.selection_target();
        let roots: Vec<ElementId> = if anchor != id || element.is_group() {
            vec![anchor]
        } else if selection.contains(&id) {
            selection.to_vec()
        } else {
            vec![id]
        };

        let mut moving = Vec::new();
        for root in roots {
            if !moving.contains(&root) {
                moving.push(root);
            }
            for member in store.member_ids(root) {
                if !moving.contains(&member) {
                    moving.push(member);
                }
            }
        }

        let starts = moving
            .into_iter()
            .filter_map(|id| store.geometry(id, mode).map(|g| (id, Point::new(g.x, g.y))))
            .collect();
        let Some(anchor_start) = store.rect(anchor, mode) else {
            return false;
        };

        log::debug!("Drag started on {anchor}");
        self.gesture = Gesture::Dragging(DragState {
            anchor,
            anchor_start,
            starts,
        });
        true
    }

    /// Follow the pointer: move everything by the raw `delta` and refresh
    /// the guides the anchor lines up with.
    pub fn drag(
        &mut self,
        store: &mut ElementStore,
        delta: Vec2,
        mode: ViewMode,
        canvas: Size,
    ) -> bool {
        let Gesture::Dragging(state) = &self.gesture else {
            return false;
        };

        let threshold = store.config().snap_threshold;
        let lines = candidate_snap_lines(store.boxes(mode), &state.ids(), canvas);
        self.guides = alignment_guides(state.anchor_start + delta, &lines, threshold);

        store.update_elements(&state.translated(delta), mode);
        true
    }

    /// Finish the drag: round `delta` to half a grid unit, move everything
    /// by it and return the committed batch.
    pub fn drag_stop(
        &mut self,
        store: &mut ElementStore,
        delta: Vec2,
        mode: ViewMode,
    ) -> Option<Vec<ElementUpdate>> {
        if !matches!(self.gesture, Gesture::Dragging(_)) {
            return None;
        }
        let Gesture::Dragging(state) = std::mem::take(&mut self.gesture) else {
            return None;
        };
        self.guides = SnapLines::default();

        let half = store.config().half_grid();
        let rounded = Vec2::new(snap_to_grid(delta.x, half), snap_to_grid(delta.y, half));
        let updates = state.translated(rounded);
        store.update_elements(&updates, mode);
        log::debug!("Drag committed on {} by {rounded:?}", state.anchor);
        Some(updates)
    }

    /// Begin resizing `id` (or the group it belongs to) from `handle`.
    pub fn resize_start(
        &mut self,
        store: &ElementStore,
        id: ElementId,
        handle: HandleKind,
        selection: &[ElementId],
        mode: ViewMode,
    ) -> bool {
        if !self.ensure_idle("resize") {
            return false;
        }
        let Some(target) = store.get(id).map(|e| e.selection_target()) else {
            log::debug!("Ignoring resize of unknown element {id}");
            return false;
        };
        let Some(original) = store.rect(target, mode) else {
            return false;
        };

        let members: Vec<MemberFrame> = store
            .members(target)
            .filter_map(|member| store.rect(member.id, mode).map(|rect| (member.id, rect)))
            .map(|(id, rect)| MemberFrame {
                id,
                offset: rect.origin() - original.origin(),
                size: rect.size(),
            })
            .collect();

        let mut excluded = selection.to_vec();
        excluded.push(target);
        excluded.extend(members.iter().map(|m| m.id));

        log::debug!("Resize started on {target}");
        self.gesture = Gesture::Resizing(ResizeState {
            target,
            handle,
            original,
            current: original,
            members,
            excluded,
        });
        true
    }

    /// Follow the pointer with a proposed box. Moving edges that come within
    /// the snap threshold of another element's line are clamped onto it.
    pub fn resize(
        &mut self,
        store: &mut ElementStore,
        proposed: Rect,
        mode: ViewMode,
        canvas: Size,
    ) -> bool {
        let Gesture::Resizing(state) = &mut self.gesture else {
            return false;
        };

        let threshold = store.config().snap_threshold;
        let lines = candidate_snap_lines(store.boxes(mode), &state.excluded, canvas);
        let mut guides = SnapLines::default();
        let rect = snap_edges(proposed, state.handle, &lines, threshold, &mut guides);
        guides.normalize();

        state.current = rect;
        store.update_elements(&state.frame_updates(rect), mode);
        self.guides = guides;
        true
    }

    /// Finish the resize: enforce the minimum size, snap the box to half a
    /// grid unit, scale group members to match and return the committed batch.
    pub fn resize_stop(
        &mut self,
        store: &mut ElementStore,
        proposed: Rect,
        mode: ViewMode,
    ) -> Option<Vec<ElementUpdate>> {
        if !matches!(self.gesture, Gesture::Resizing(_)) {
            return None;
        }
        let Gesture::Resizing(state) = std::mem::take(&mut self.gesture) else {
            return None;
        };
        self.guides = SnapLines::default();

        let config = store.config();
        let half = config.half_grid();
        let min = config.min_element_size();
        let proposed = proposed.abs();
        let floored = Rect::from_origin_size(
            proposed.origin(),
            Size::new(proposed.width().max(min), proposed.height().max(min)),
        );
        let rect = snap_rect_to_grid(floored, half);

        let updates = state.frame_updates(rect);
        store.update_elements(&updates, mode);
        log::debug!("Resize committed on {} at {rect:?}", state.target);
        Some(updates)
    }

    /// Begin a marquee at a background point.
    pub fn marquee_start(&mut self, point: Point) -> bool {
        if !self.ensure_idle("marquee") {
            return false;
        }
        self.gesture = Gesture::Marquee(MarqueeState {
            start: point,
            current: point,
        });
        true
    }

    /// Track the pointer. Returns the live rectangle.
    pub fn marquee_move(&mut self, point: Point) -> Option<Rect> {
        let Gesture::Marquee(marquee) = &mut self.gesture else {
            return None;
        };
        marquee.current = point;
        Some(marquee.rect())
    }

    /// Finish the marquee and return the new selection.
    ///
    /// A rectangle below the click threshold in both axes deselects
    /// everything. Otherwise every ungrouped, non-group element overlapping
    /// the rectangle is selected.
    pub fn marquee_end(&mut self, store: &ElementStore, mode: ViewMode) -> Option<Vec<ElementId>> {
        if !matches!(self.gesture, Gesture::Marquee(_)) {
            return None;
        }
        let Gesture::Marquee(marquee) = std::mem::take(&mut self.gesture) else {
            return None;
        };

        let rect = marquee.rect();
        let click = store.config().marquee_click_threshold;
        if rect.width() < click && rect.height() < click {
            return Some(Vec::new());
        }

        let selected = store
            .elements()
            .iter()
            .filter(|e| !e.is_group() && !e.is_grouped())
            .filter(|e| store.rect(e.id, mode).is_some_and(|r| rects_overlap(r, rect)))
            .map(|e| e.id)
            .collect();
        Some(selected)
    }
}

/// Lines the left/center/right and top/middle/bottom of `rect` line up with.
fn alignment_guides(rect: Rect, lines: &SnapLines, threshold: f64) -> SnapLines {
    let center = rect.center();
    let mut guides = SnapLines::default();
    for x in [rect.x0, center.x, rect.x1] {
        guides.vertical.extend(lines_near(x, &lines.vertical, threshold));
    }
    for y in [rect.y0, center.y, rect.y1] {
        guides.horizontal.extend(lines_near(y, &lines.horizontal, threshold));
    }
    guides.normalize();
    guides
}

fn closest_line(value: f64, lines: &[f64], threshold: f64) -> Option<f64> {
    lines_near(value, lines, threshold)
        .into_iter()
        .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
}

/// Clamp the moving edges of `rect` onto nearby lines, recording each line used.
fn snap_edges(
    rect: Rect,
    handle: HandleKind,
    lines: &SnapLines,
    threshold: f64,
    guides: &mut SnapLines,
) -> Rect {
    let mut rect = rect;
    if handle.moves_left() {
        if let Some(line) = closest_line(rect.x0, &lines.vertical, threshold) {
            rect.x0 = line;
            guides.vertical.push(line);
        }
    }
    if handle.moves_right() {
        if let Some(line) = closest_line(rect.x1, &lines.vertical, threshold) {
            rect.x1 = line;
            guides.vertical.push(line);
        }
    }
    if handle.moves_top() {
        if let Some(line) = closest_line(rect.y0, &lines.horizontal, threshold) {
            rect.y0 = line;
            guides.horizontal.push(line);
        }
    }
    if handle.moves_bottom() {
        if let Some(line) = closest_line(rect.y1, &lines.horizontal, threshold) {
            rect.y1 = line;
            guides.horizontal.push(line);
        }
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::element::ElementKind;

    const CANVAS: Size = Size::new(1920.0, 1080.0);
    const DESKTOP: ViewMode = ViewMode::Desktop;

    fn place(store: &mut ElementStore, x: f64, y: f64, w: f64, h: f64) -> ElementId {
        let patch = ElementPatch::geometry(GeometryPatch {
            x: Some(x),
            y: Some(y),
            width: Some(w),
            height: Some(h),
            ..GeometryPatch::default()
        });
        store.add_element(ElementKind::Shape, Some(&patch), DESKTOP)
    }

    fn origin(store: &ElementStore, id: ElementId) -> (f64, f64) {
        let g = store.geometry(id, DESKTOP).unwrap();
        (g.x, g.y)
    }

    #[test]
    fn test_drag_follows_pointer_then_commits_rounded() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 200.0, 150.0);
        let mut engine = InteractionEngine::new();

        assert!(engine.drag_start(&store, id, &[id], DESKTOP));
        engine.drag(&mut store, Vec2::new(13.0, -4.0), DESKTOP, CANVAS);
        assert_eq!(origin(&store, id), (113.0, 96.0));

        let batch = engine.drag_stop(&mut store, Vec2::new(13.0, -4.0), DESKTOP).unwrap();
        assert_eq!(batch.len(), 1);
        // -4 rounds to the nearest multiple of 10, which is 0.
        assert_eq!(origin(&store, id), (110.0, 100.0));
        assert!(engine.is_idle());
    }

    #[test]
    fn test_drag_commit_rounds_delta_to_half_grid() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 200.0, 150.0);
        let mut engine = InteractionEngine::new();

        engine.drag_start(&store, id, &[], DESKTOP);
        engine.drag_stop(&mut store, Vec2::new(13.0, -6.0), DESKTOP);
        assert_eq!(origin(&store, id), (110.0, 90.0));
    }

    #[test]
    fn test_drag_commit_rounds_negative_halves_up() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 200.0, 150.0);
        let mut engine = InteractionEngine::new();

        engine.drag_start(&store, id, &[], DESKTOP);
        engine.drag_stop(&mut store, Vec2::new(-5.0, -15.0), DESKTOP);
        assert_eq!(origin(&store, id), (100.0, 90.0));
    }

    #[test]
    fn test_drag_member_moves_whole_group() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut store, 300.0, 140.0, 100.0, 100.0);
        let group = store.group_elements(&[a, b], "Group", DESKTOP).unwrap();
        let mut engine = InteractionEngine::new();

        engine.drag_start(&store, b, &[group], DESKTOP);
        let batch = engine.drag_stop(&mut store, Vec2::new(47.0, 21.0), DESKTOP).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(origin(&store, group), (150.0, 120.0));
        assert_eq!(origin(&store, a), (150.0, 120.0));
        assert_eq!(origin(&store, b), (350.0, 160.0));
    }

    #[test]
    fn test_drag_moves_selection_together() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut store, 400.0, 400.0, 100.0, 100.0);
        let c = place(&mut store, 700.0, 100.0, 100.0, 100.0);
        let mut engine = InteractionEngine::new();

        engine.drag_start(&store, a, &[a, b], DESKTOP);
        engine.drag_stop(&mut store, Vec2::new(20.0, 20.0), DESKTOP);

        assert_eq!(origin(&store, a), (120.0, 120.0));
        assert_eq!(origin(&store, b), (420.0, 420.0));
        assert_eq!(origin(&store, c), (700.0, 100.0));
    }

    #[test]
    fn test_drag_reports_guides_without_snapping() {
        let mut store = ElementStore::new(EditorConfig::default());
        let moving = place(&mut store, 100.0, 600.0, 100.0, 100.0);
        place(&mut store, 500.0, 100.0, 100.0, 100.0);
        let mut engine = InteractionEngine::new();

        engine.drag_start(&store, moving, &[], DESKTOP);
        engine.drag(&mut store, Vec2::new(395.0, 0.0), DESKTOP, CANVAS);

        // Left edge at 495 is within 8 of the other box's left edge.
        assert!(engine.guides().vertical.contains(&500.0));
        assert_eq!(origin(&store, moving), (495.0, 600.0));

        engine.drag_stop(&mut store, Vec2::new(395.0, 0.0), DESKTOP);
        assert!(engine.guides().is_empty());
    }

    #[test]
    fn test_drag_of_unknown_element() {
        let store = ElementStore::new(EditorConfig::default());
        let mut engine = InteractionEngine::new();
        assert!(!engine.drag_start(&store, uuid::Uuid::new_v4(), &[], DESKTOP));
        assert!(engine.is_idle());
    }

    #[test]
    fn test_second_gesture_is_ignored() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let mut engine = InteractionEngine::new();

        assert!(engine.drag_start(&store, id, &[], DESKTOP));
        assert!(!engine.marquee_start(Point::new(0.0, 0.0)));
        assert!(!engine.resize_start(&store, id, HandleKind::Edge(Edge::Right), &[], DESKTOP));
        assert!(matches!(engine.gesture(), Gesture::Dragging(_)));
    }

    #[test]
    fn test_group_resize_scales_members() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 300.0, 60.0);
        let b = place(&mut store, 150.0, 200.0, 100.0, 50.0);
        let group = store.group_elements(&[a, b], "Group", DESKTOP).unwrap();
        let handle = HandleKind::Corner(Corner::BottomRight);
        let mut engine = InteractionEngine::new();

        engine.resize_start(&store, group, handle, &[group], DESKTOP);
        engine.resize(&mut store, Rect::new(100.0, 100.0, 700.0, 400.0), DESKTOP, CANVAS);

        let child = store.geometry(b, DESKTOP).unwrap();
        assert_eq!((child.x, child.y), (100.0 + 50.0 * 2.0, 100.0 + 100.0 * 2.0));
        assert_eq!((child.width, child.height), (200.0, 100.0));
        let first = store.geometry(a, DESKTOP).unwrap();
        assert_eq!((first.x, first.y, first.width, first.height), (100.0, 100.0, 600.0, 120.0));
    }

    #[test]
    fn test_group_resize_stop_commits_group_and_members() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 300.0, 60.0);
        let b = place(&mut store, 150.0, 200.0, 100.0, 50.0);
        let group = store.group_elements(&[a, b], "Group", DESKTOP).unwrap();
        let handle = HandleKind::Corner(Corner::BottomRight);
        let mut engine = InteractionEngine::new();

        engine.resize_start(&store, a, handle, &[group], DESKTOP);
        engine.resize(&mut store, Rect::new(100.0, 100.0, 650.0, 380.0), DESKTOP, CANVAS);
        let batch = engine
            .resize_stop(&mut store, Rect::new(100.0, 100.0, 703.0, 397.0), DESKTOP)
            .unwrap();

        let ids: Vec<_> = batch.iter().map(|update| update.id).collect();
        assert_eq!(ids, vec![group, a, b]);
        assert_eq!(store.rect(group, DESKTOP).unwrap(), Rect::new(100.0, 100.0, 700.0, 400.0));
        // Members scale by 2 in both axes about the group's corner.
        assert_eq!(store.rect(a, DESKTOP).unwrap(), Rect::new(100.0, 100.0, 700.0, 220.0));
        assert_eq!(store.rect(b, DESKTOP).unwrap(), Rect::new(200.0, 300.0, 400.0, 400.0));
        assert!(engine.is_idle());
    }

    #[test]
    fn test_resize_stop_floors_and_snaps() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 200.0, 150.0);
        let mut engine = InteractionEngine::new();

        engine.resize_start(&store, id, HandleKind::Corner(Corner::TopLeft), &[id], DESKTOP);
        let batch = engine
            .resize_stop(&mut store, Rect::new(103.0, 97.0, 115.0, 294.0), DESKTOP)
            .unwrap();

        assert_eq!(batch.len(), 1);
        let g = store.geometry(id, DESKTOP).unwrap();
        assert_eq!((g.x, g.y, g.width, g.height), (100.0, 100.0, 40.0, 200.0));
    }

    #[test]
    fn test_resize_edge_snaps_to_neighbor() {
        let mut store = ElementStore::new(EditorConfig::default());
        let id = place(&mut store, 100.0, 100.0, 200.0, 150.0);
        place(&mut store, 500.0, 400.0, 100.0, 100.0);
        let handle = HandleKind::Edge(Edge::Right);
        let mut engine = InteractionEngine::new();

        engine.resize_start(&store, id, handle, &[id], DESKTOP);
        let proposed = handle.apply(Rect::new(100.0, 100.0, 300.0, 250.0), Vec2::new(196.0, 0.0));
        engine.resize(&mut store, proposed, DESKTOP, CANVAS);

        assert_eq!(store.rect(id, DESKTOP).unwrap(), Rect::new(100.0, 100.0, 500.0, 250.0));
        assert_eq!(engine.guides().vertical, vec![500.0]);
        assert!(engine.guides().horizontal.is_empty());
    }

    #[test]
    fn test_marquee_selects_ungrouped_overlaps() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut store, 300.0, 100.0, 100.0, 100.0);
        let c = place(&mut store, 500.0, 100.0, 100.0, 100.0);
        let far = place(&mut store, 1500.0, 900.0, 50.0, 50.0);
        store.group_elements(&[b, c], "Group", DESKTOP).unwrap();
        let mut engine = InteractionEngine::new();

        engine.marquee_start(Point::new(50.0, 50.0));
        assert_eq!(
            engine.marquee_move(Point::new(700.0, 300.0)),
            Some(Rect::new(50.0, 50.0, 700.0, 300.0))
        );
        let selected = engine.marquee_end(&store, DESKTOP).unwrap();

        assert_eq!(selected, vec![a]);
        assert!(!selected.contains(&far));
        assert!(engine.marquee_rect().is_none());
    }

    #[test]
    fn test_marquee_selects_enclosed_and_partially_covered() {
        let mut store = ElementStore::new(EditorConfig::default());
        let a = place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let b = place(&mut store, 300.0, 100.0, 100.0, 100.0);
        let partial = place(&mut store, 550.0, 250.0, 100.0, 100.0);
        let d = place(&mut store, 150.0, 220.0, 40.0, 40.0);
        let e = place(&mut store, 250.0, 220.0, 40.0, 40.0);
        let outside = place(&mut store, 800.0, 100.0, 100.0, 100.0);
        let group = store.group_elements(&[d, e], "Group", DESKTOP).unwrap();
        let mut engine = InteractionEngine::new();

        engine.marquee_start(Point::new(600.0, 300.0));
        engine.marquee_move(Point::new(50.0, 50.0));
        let selected = engine.marquee_end(&store, DESKTOP).unwrap();

        assert_eq!(selected, vec![a, b, partial]);
        for excluded in [d, e, group, outside] {
            assert!(!selected.contains(&excluded));
        }
    }

    #[test]
    fn test_marquee_click_deselects() {
        let mut store = ElementStore::new(EditorConfig::default());
        place(&mut store, 100.0, 100.0, 100.0, 100.0);
        let mut engine = InteractionEngine::new();

        engine.marquee_start(Point::new(150.0, 150.0));
        engine.marquee_move(Point::new(147.0, 153.0));
        assert_eq!(engine.marquee_end(&store, DESKTOP), Some(Vec::new()));
    }

    #[test]
    fn test_hit_test_handles() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            hit_test_handles(rect, Point::new(101.0, 49.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(rect, Point::new(50.0, 2.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Edge(Edge::Top))
        );
        assert_eq!(hit_test_handles(rect, Point::new(50.0, 25.0), HANDLE_HIT_TOLERANCE), None);
    }
}
