//! Desktop/mobile projections of elements.
//!
//! Every element stores one [`Geometry`] per [`ViewMode`]. Elements saved
//! before the responsive model carry a single flat geometry instead and are
//! migrated the first time they are written.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, FormField, Geometry, LegacyGeometry, Style};
use kurbo::{Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Responsive editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Desktop,
    Mobile,
}

impl ViewMode {
    /// Both modes, desktop first.
    pub const ALL: [ViewMode; 2] = [ViewMode::Desktop, ViewMode::Mobile];

    /// Logical canvas width for this mode.
    pub fn canvas_width(self, config: &EditorConfig) -> f64 {
        match self {
            ViewMode::Desktop => config.desktop_canvas_width,
            ViewMode::Mobile => config.mobile_canvas_width,
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewMode::Mobile
    }
}

const LEGACY_DEFAULT_X: f64 = 100.0;
const LEGACY_DEFAULT_Y: f64 = 100.0;
const LEGACY_DEFAULT_WIDTH: f64 = 200.0;
const LEGACY_DEFAULT_HEIGHT: f64 = 150.0;
const MOBILE_MIN_FONT_SIZE: f64 = 14.0;
const MOBILE_MIN_PADDING: f64 = 8.0;

/// Desktop projection synthesized from flat legacy fields.
fn desktop_from_legacy(legacy: &LegacyGeometry) -> Geometry {
    Geometry {
        x: legacy.x.unwrap_or(LEGACY_DEFAULT_X),
        y: legacy.y.unwrap_or(LEGACY_DEFAULT_Y),
        width: legacy.width.unwrap_or(LEGACY_DEFAULT_WIDTH),
        height: legacy.height.unwrap_or(LEGACY_DEFAULT_HEIGHT),
        z_index: legacy.z_index.unwrap_or(1),
        font_size: legacy.font_size,
        padding: legacy.padding,
        border_radius: legacy.border_radius,
    }
}

/// Mobile projection scaled down from a desktop one.
fn mobile_from_desktop(desktop: &Geometry, config: &EditorConfig) -> Geometry {
    let scale = config.mobile_scale();
    Geometry {
        x: config.mobile_margin,
        y: desktop.y,
        width: (desktop.width * scale).min(config.mobile_max_element_width),
        height: desktop.height * scale,
        z_index: desktop.z_index,
        font_size: desktop
            .font_size
            .map(|size| (size * scale).round().max(MOBILE_MIN_FONT_SIZE)),
        padding: desktop
            .padding
            .map(|padding| (padding * scale).round().max(MOBILE_MIN_PADDING)),
        border_radius: desktop.border_radius.map(|radius| (radius * scale).round()),
    }
}

/// Bring an element into the dual-projection shape.
///
/// Fills whichever projection is missing and strips the flat fields. Returns
/// `true` if anything changed; calling it again is a no-op.
pub fn migrate_to_responsive(element: &mut Element, config: &EditorConfig) -> bool {
    if element.is_responsive() && element.legacy.is_empty() {
        return false;
    }

    let desktop = match element.desktop_properties {
        Some(desktop) => desktop,
        None => desktop_from_legacy(&element.legacy),
    };
    let mobile = match element.mobile_properties {
        Some(mobile) => mobile,
        None => mobile_from_desktop(&desktop, config),
    };

    let loose = std::mem::take(&mut element.legacy.style);
    for (key, value) in loose {
        element.style.entry(key).or_insert(value);
    }
    element.desktop_properties = Some(desktop);
    element.mobile_properties = Some(mobile);
    element.legacy = LegacyGeometry::default();
    true
}

/// Geometry an element has in `mode`, synthesizing it for legacy elements
/// without touching the stored element.
pub fn resolve_geometry(element: &Element, mode: ViewMode, config: &EditorConfig) -> Geometry {
    if let Some(geometry) = element.projection(mode) {
        return *geometry;
    }
    let desktop = element
        .desktop_properties
        .unwrap_or_else(|| desktop_from_legacy(&element.legacy));
    match mode {
        ViewMode::Desktop => desktop,
        ViewMode::Mobile => mobile_from_desktop(&desktop, config),
    }
}

/// An element with its active projection merged over the shared fields.
/// This is what layout, paint and export consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub style: Style,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub form_fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl RenderElement {
    pub fn rect(&self) -> Rect {
        self.geometry.rect()
    }
}

/// Project an element for rendering in `mode`.
pub fn project(element: &Element, mode: ViewMode, config: &EditorConfig) -> RenderElement {
    RenderElement {
        id: element.id,
        kind: element.kind,
        name: element.name.clone(),
        content: element.content.clone(),
        style: element.effective_style(),
        form_fields: element.form_fields.clone(),
        group_id: element.group_id,
        geometry: resolve_geometry(element, mode, config),
    }
}

/// Stack top-level content vertically in the mobile projection.
///
/// Ungrouped elements and groups are placed one below another in document
/// order at the mobile margin. Plain elements are narrowed to the mobile
/// maximum width; a group keeps its size and its members move with it.
pub fn reflow_mobile(elements: &mut [Element], config: &EditorConfig) {
    for element in elements.iter_mut() {
        migrate_to_responsive(element, config);
    }

    let mut group_offsets: HashMap<ElementId, Vec2> = HashMap::new();
    let mut current_y = config.mobile_margin;

    for element in elements.iter_mut() {
        if element.is_grouped() {
            continue;
        }
        let is_group = element.is_group();
        let id = element.id;
        let Some(mobile) = element.mobile_properties.as_mut() else {
            continue;
        };

        let offset = Vec2::new(config.mobile_margin - mobile.x, current_y - mobile.y);
        mobile.x = config.mobile_margin;
        mobile.y = current_y;
        if is_group {
            group_offsets.insert(id, offset);
        } else {
            mobile.width = mobile.width.min(config.mobile_max_element_width);
        }
        current_y += mobile.height + config.mobile_gap;
    }

    if group_offsets.is_empty() {
        return;
    }
    for element in elements.iter_mut() {
        let Some(offset) = element.group_id.and_then(|g| group_offsets.get(&g)) else {
            continue;
        };
        if let Some(mobile) = element.mobile_properties.as_mut() {
            mobile.translate(*offset);
        }
    }
}

/// Height of the virtual page: tall enough for the viewport and for the
/// lowest element plus a margin of eight grid units.
pub fn page_height<I>(rects: I, viewport_height: f64, config: &EditorConfig) -> f64
where
    I: IntoIterator<Item = Rect>,
{
    let content = rects
        .into_iter()
        .map(|rect| rect.y1 + config.grid_size * 8.0)
        .fold(config.min_page_height, f64::max);
    (viewport_height - 100.0).max(content)
}

/// Logical canvas size for a mode given the page height.
pub fn canvas_size(mode: ViewMode, page_height: f64, config: &EditorConfig) -> Size {
    Size::new(mode.canvas_width(config), page_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_text(x: f64, y: f64, width: f64, height: f64) -> Element {
        let mut element = Element::new(ElementKind::Text);
        element.legacy = LegacyGeometry {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            z_index: Some(2),
            font_size: Some(24.0),
            padding: Some(10.0),
            border_radius: Some(12.0),
            ..LegacyGeometry::default()
        };
        element
    }

    #[test]
    fn test_migrate_legacy_element() {
        let config = EditorConfig::default();
        let mut element = legacy_text(300.0, 120.0, 1080.0, 540.0);

        assert!(migrate_to_responsive(&mut element, &config));
        assert!(element.is_responsive());
        assert!(element.legacy.is_empty());

        let desktop = element.desktop_properties.unwrap();
        assert_eq!(desktop.rect(), Rect::new(300.0, 120.0, 1380.0, 660.0));
        assert_eq!(desktop.z_index, 2);

        let mobile = element.mobile_properties.unwrap();
        assert_eq!(mobile.x, 20.0);
        assert_eq!(mobile.y, 120.0);
        // 1080 * 390/1080 = 390, clamped to 350.
        assert_eq!(mobile.width, 350.0);
        assert!((mobile.height - 195.0).abs() < 1e-9);
        // 24 * 0.36 rounds to 9, floored at 14.
        assert_eq!(mobile.font_size, Some(14.0));
        assert_eq!(mobile.padding, Some(8.0));
        assert_eq!(mobile.border_radius, Some(4.0));
    }

    #[test]
    fn test_migrate_moves_top_level_style_keys() {
        let config = EditorConfig::default();
        let mut element = legacy_text(0.0, 0.0, 100.0, 100.0);
        element.style.insert("textColor".into(), "#111111".into());
        element.legacy.style.insert("textColor".into(), "#FFFFFF".into());
        element.legacy.style.insert("backgroundColor".into(), "#000000".into());

        let before = project(&element, ViewMode::Desktop, &config);
        assert_eq!(before.style["backgroundColor"], "#000000");

        migrate_to_responsive(&mut element, &config);
        assert!(element.legacy.is_empty());
        assert_eq!(element.style["backgroundColor"], "#000000");
        assert_eq!(element.style["textColor"], "#111111");
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let config = EditorConfig::default();
        let mut element = legacy_text(0.0, 0.0, 100.0, 100.0);
        migrate_to_responsive(&mut element, &config);
        let once = element.clone();

        assert!(!migrate_to_responsive(&mut element, &config));
        assert_eq!(element, once);
    }

    #[test]
    fn test_migrate_defaults_for_missing_fields() {
        let config = EditorConfig::default();
        let mut element = Element::new(ElementKind::Shape);
        migrate_to_responsive(&mut element, &config);

        let desktop = element.desktop_properties.unwrap();
        assert_eq!(desktop, Geometry::new(100.0, 100.0, 200.0, 150.0, 1));
    }

    #[test]
    fn test_resolve_does_not_mutate() {
        let config = EditorConfig::default();
        let element = legacy_text(10.0, 20.0, 30.0, 40.0);
        let geometry = resolve_geometry(&element, ViewMode::Desktop, &config);

        assert_eq!(geometry.rect(), Rect::new(10.0, 20.0, 40.0, 60.0));
        assert!(!element.is_responsive());
    }

    #[test]
    fn test_project_merges_active_mode() {
        let config = EditorConfig::default();
        let mut element = Element::new(ElementKind::Button);
        element.content = Some("Click me".into());
        element.desktop_properties = Some(Geometry::new(100.0, 100.0, 150.0, 50.0, 1));
        element.mobile_properties = Some(Geometry::new(20.0, 100.0, 200.0, 45.0, 1));

        let desktop = project(&element, ViewMode::Desktop, &config);
        let mobile = project(&element, ViewMode::Mobile, &config);
        assert_eq!(desktop.geometry.width, 150.0);
        assert_eq!(mobile.geometry.width, 200.0);
        assert_eq!(mobile.content.as_deref(), Some("Click me"));

        let value = serde_json::to_value(&mobile).unwrap();
        assert_eq!(value["x"], 20.0);
        assert_eq!(value["type"], "button");
    }

    #[test]
    fn test_reflow_mobile_stacks_elements() {
        let config = EditorConfig::default();
        let mut first = Element::new(ElementKind::Heading);
        first.desktop_properties = Some(Geometry::new(500.0, 300.0, 300.0, 60.0, 1));
        first.mobile_properties = Some(Geometry::new(100.0, 300.0, 400.0, 50.0, 1));
        let mut second = Element::new(ElementKind::Text);
        second.desktop_properties = Some(Geometry::new(500.0, 100.0, 200.0, 100.0, 2));
        second.mobile_properties = Some(Geometry::new(60.0, 10.0, 300.0, 80.0, 2));

        let mut elements = vec![first, second];
        reflow_mobile(&mut elements, &config);

        let a = elements[0].mobile_properties.unwrap();
        let b = elements[1].mobile_properties.unwrap();
        assert_eq!((a.x, a.y, a.width), (20.0, 20.0, 350.0));
        assert_eq!((b.x, b.y, b.width), (20.0, 20.0 + 50.0 + 8.0, 300.0));
        // Desktop is untouched.
        assert_eq!(elements[0].desktop_properties.unwrap().x, 500.0);
    }

    #[test]
    fn test_reflow_mobile_moves_group_members_with_group() {
        let config = EditorConfig::default();
        let mut group = Element::new(ElementKind::Group);
        group.desktop_properties = Some(Geometry::new(0.0, 0.0, 300.0, 200.0, 3));
        group.mobile_properties = Some(Geometry::new(40.0, 100.0, 300.0, 200.0, 3));
        let mut member = Element::new(ElementKind::Text);
        member.group_id = Some(group.id);
        member.desktop_properties = Some(Geometry::new(0.0, 0.0, 100.0, 50.0, 1));
        member.mobile_properties = Some(Geometry::new(50.0, 110.0, 100.0, 50.0, 1));

        let mut elements = vec![group, member];
        reflow_mobile(&mut elements, &config);

        let group_mobile = elements[0].mobile_properties.unwrap();
        let member_mobile = elements[1].mobile_properties.unwrap();
        assert_eq!((group_mobile.x, group_mobile.y), (20.0, 20.0));
        assert_eq!((member_mobile.x, member_mobile.y), (30.0, 30.0));
    }

    #[test]
    fn test_page_height() {
        let config = EditorConfig::default();
        assert_eq!(page_height(Vec::new(), 800.0, &config), 900.0);
        assert_eq!(page_height(Vec::new(), 1200.0, &config), 1100.0);
        let low = Rect::new(0.0, 900.0, 100.0, 1000.0);
        assert_eq!(page_height([low], 800.0, &config), 1160.0);
    }
}
