//! Element definitions for the page canvas.

use crate::responsive::ViewMode;
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Free-form style attributes shared by both responsive modes
/// (colors, gradient, border, shadow, blur, font, media references).
pub type Style = BTreeMap<String, Value>;

/// Kind of visual element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Heading,
    Button,
    Image,
    Video,
    Form,
    Shape,
    Group,
}

impl ElementKind {
    /// Check if this is the group container kind.
    pub fn is_group(self) -> bool {
        self == ElementKind::Group
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Heading => "Heading",
            ElementKind::Button => "Button",
            ElementKind::Image => "Image",
            ElementKind::Video => "Video",
            ElementKind::Form => "Form",
            ElementKind::Shape => "Shape",
            ElementKind::Group => "Group",
        }
    }
}

/// Per-mode geometry and the style values that scale with the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl Geometry {
    /// Create a geometry without scalable style values.
    pub fn new(x: f64, y: f64, width: f64, height: f64, z_index: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            z_index,
            font_size: None,
            padding: None,
            border_radius: None,
        }
    }

    /// The element's box.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Replace position and size from a box.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Move by an offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.x += offset.x;
        self.y += offset.y;
    }
}

/// Flat fields carried by elements saved before the responsive model.
///
/// Serialized inline with the element, so old documents with top-level
/// `x`/`y`/`width`/... keys deserialize into it. Any other top-level key
/// (`backgroundColor`, `textColor`, ...) is kept in `style` until migration
/// moves it into the element's style map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(flatten)]
    pub style: Style,
}

impl LegacyGeometry {
    /// Check if no flat field is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Input type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Textarea,
}

/// One entry of a form element's field schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FormFieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType, required: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            field_type,
            required,
            placeholder: label.to_string(),
        }
    }
}

/// A positioned, styled visual unit on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Display name (groups are named when created).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Text, rich text markup or media URL depending on the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_fields: Vec<FormField>,
    /// Owning group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
    /// Offset from the group's left edge when the group was formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_x: Option<f64>,
    /// Offset from the group's top edge when the group was formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_properties: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_properties: Option<Geometry>,
    #[serde(flatten)]
    pub legacy: LegacyGeometry,
}

impl Element {
    /// Create a bare element of the given kind with a fresh id.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: None,
            content: None,
            style: Style::new(),
            form_fields: Vec::new(),
            group_id: None,
            relative_x: None,
            relative_y: None,
            desktop_properties: None,
            mobile_properties: None,
            legacy: LegacyGeometry::default(),
        }
    }

    /// Check if this element is a group container.
    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    /// Check if this element belongs to a group.
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }

    /// Check if both responsive projections are populated.
    pub fn is_responsive(&self) -> bool {
        self.desktop_properties.is_some() && self.mobile_properties.is_some()
    }

    /// The stored projection for a mode.
    pub fn projection(&self, mode: ViewMode) -> Option<&Geometry> {
        match mode {
            ViewMode::Desktop => self.desktop_properties.as_ref(),
            ViewMode::Mobile => self.mobile_properties.as_ref(),
        }
    }

    /// Mutable access to the stored projection for a mode.
    pub fn projection_mut(&mut self, mode: ViewMode) -> Option<&mut Geometry> {
        match mode {
            ViewMode::Desktop => self.desktop_properties.as_mut(),
            ViewMode::Mobile => self.mobile_properties.as_mut(),
        }
    }

    /// Store the projection for a mode.
    pub fn set_projection(&mut self, mode: ViewMode, geometry: Geometry) {
        match mode {
            ViewMode::Desktop => self.desktop_properties = Some(geometry),
            ViewMode::Mobile => self.mobile_properties = Some(geometry),
        }
    }

    /// Shared style, including keys an old document kept at the top level.
    /// Entries in `style` take precedence.
    pub fn effective_style(&self) -> Style {
        let mut style = self.style.clone();
        for (key, value) in &self.legacy.style {
            style.entry(key.clone()).or_insert_with(|| value.clone());
        }
        style
    }

    /// Id that a click on this element selects: the owning group if grouped.
    pub fn selection_target(&self) -> ElementId {
        self.group_id.unwrap_or(self.id)
    }

    /// Clear group membership fields.
    pub fn leave_group(&mut self) {
        self.group_id = None;
        self.relative_x = None;
        self.relative_y = None;
    }

    /// Serialize the element to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Partial geometry update for the active mode's projection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<u32>,
    pub font_size: Option<f64>,
    pub padding: Option<f64>,
    pub border_radius: Option<f64>,
}

impl GeometryPatch {
    /// Patch the position only.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch position and size from a box.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x0),
            y: Some(rect.y0),
            width: Some(rect.width()),
            height: Some(rect.height()),
            ..Self::default()
        }
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the present fields into a geometry.
    pub fn apply_to(&self, geometry: &mut Geometry) {
        if let Some(x) = self.x {
            geometry.x = x;
        }
        if let Some(y) = self.y {
            geometry.y = y;
        }
        if let Some(width) = self.width {
            geometry.width = width;
        }
        if let Some(height) = self.height {
            geometry.height = height;
        }
        if let Some(z_index) = self.z_index {
            geometry.z_index = z_index;
        }
        if self.font_size.is_some() {
            geometry.font_size = self.font_size;
        }
        if self.padding.is_some() {
            geometry.padding = self.padding;
        }
        if self.border_radius.is_some() {
            geometry.border_radius = self.border_radius;
        }
    }
}

/// Partial element update.
///
/// Geometry-bearing keys land in the active projection; everything else is
/// shared across modes. A `Value::Null` style entry removes the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub geometry: GeometryPatch,
    pub name: Option<String>,
    pub content: Option<String>,
    pub form_fields: Option<Vec<FormField>>,
    pub style: Style,
}

impl ElementPatch {
    /// A patch touching only geometry.
    pub fn geometry(geometry: GeometryPatch) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Add a style entry.
    pub fn with_style(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.style.insert(key.to_string(), value.into());
        self
    }

    /// Set the content payload.
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    /// Build a patch from loosely typed property-panel output, routing each
    /// key to geometry, a typed field, or the shared style map.
    ///
    /// Identity and membership keys (`id`, `type`, `groupId`, `relativeX`,
    /// `relativeY`) are not editable through a patch and are skipped.
    pub fn from_json(props: Map<String, Value>) -> Self {
        let mut patch = Self::default();
        for (key, value) in props {
            match key.as_str() {
                "x" => patch.geometry.x = value.as_f64(),
                "y" => patch.geometry.y = value.as_f64(),
                "width" => patch.geometry.width = value.as_f64(),
                "height" => patch.geometry.height = value.as_f64(),
                "zIndex" => {
                    patch.geometry.z_index = value.as_u64().and_then(|z| u32::try_from(z).ok())
                }
                "fontSize" => patch.geometry.font_size = value.as_f64(),
                "padding" => patch.geometry.padding = value.as_f64(),
                "borderRadius" => patch.geometry.border_radius = value.as_f64(),
                "name" => patch.name = value.as_str().map(str::to_string),
                "content" => patch.content = value.as_str().map(str::to_string),
                "formFields" => patch.form_fields = serde_json::from_value(value).ok(),
                "id" | "type" | "groupId" | "relativeX" | "relativeY" => {
                    log::debug!("Ignoring non-editable key {key} in element patch");
                }
                _ => {
                    patch.style.insert(key, value);
                }
            }
        }
        patch
    }

    /// Apply the non-geometry part of the patch.
    pub fn apply_shared(&self, element: &mut Element) {
        if let Some(name) = &self.name {
            element.name = Some(name.clone());
        }
        if let Some(content) = &self.content {
            element.content = Some(content.clone());
        }
        if let Some(fields) = &self.form_fields {
            element.form_fields = fields.clone();
        }
        for (key, value) in &self.style {
            if value.is_null() {
                element.style.remove(key);
            } else {
                element.style.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A patch addressed to one element, as produced by batched gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUpdate {
    pub id: ElementId,
    pub patch: ElementPatch,
}

impl ElementUpdate {
    pub fn new(id: ElementId, patch: ElementPatch) -> Self {
        Self { id, patch }
    }

    /// Update of position and size only.
    pub fn rect(id: ElementId, rect: Rect) -> Self {
        Self::new(id, ElementPatch::geometry(GeometryPatch::from_rect(rect)))
    }

    /// Update of position only.
    pub fn position(id: ElementId, x: f64, y: f64) -> Self {
        Self::new(id, ElementPatch::geometry(GeometryPatch::position(x, y)))
    }
}
