//! Fully resolved page data for static export.
//!
//! Every element is projected into both modes and its style is completed
//! with the per-kind defaults the canvas paints with, so an exporter never
//! has to look anything up.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, FormField, Geometry, Style};
use crate::responsive::{ViewMode, page_height, resolve_geometry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const DEFAULT_FONT_FAMILY: &str = "Roboto, sans-serif";
const DEFAULT_GRADIENT_START: &str = "#8B5CF6";
const DEFAULT_GRADIENT_END: &str = "#3B82F6";
const DEFAULT_GRADIENT_DIRECTION: &str = "to bottom right";
const TRANSPARENT: &str = "transparent";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("There is nothing on the canvas to export")]
    EmptyCanvas,
    #[error("Element {element} references missing group {group}")]
    DanglingGroup { element: ElementId, group: ElementId },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Element background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    Solid { color: String },
    Gradient { direction: String, start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub width: f64,
    pub style: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
}

/// Style with every default filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub text_align: String,
    pub color: String,
    pub opacity: f64,
    pub padding: f64,
    /// Groups have no corner radius.
    pub border_radius: Option<f64>,
    pub background: Background,
    /// `None` when the border width is zero.
    pub border: Option<Border>,
    pub shadow: Shadow,
    /// Blur radius; only media and shapes blur.
    pub blur: f64,
}

fn str_value(style: &Style, key: &str) -> Option<String> {
    match style.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Numbers may be stored as JSON numbers or numeric strings ("4", "4px").
fn num_value(style: &Style, key: &str) -> Option<f64> {
    match style.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("px").parse().ok(),
        _ => None,
    }
}

impl ResolvedStyle {
    /// Resolve an element's style against its geometry in one mode.
    pub fn resolve(kind: ElementKind, style: &Style, geometry: &Geometry) -> Self {
        use ElementKind::*;

        let font_size = geometry.font_size.unwrap_or(match kind {
            Heading => 24.0,
            Button => 16.0,
            _ => 14.0,
        });
        let padding = geometry.padding.unwrap_or(match kind {
            Image | Video | Button => 0.0,
            Form => 20.0,
            _ => 10.0,
        });
        let color = str_value(style, "textColor").unwrap_or_else(|| {
            match kind {
                Button => "#FFFFFF",
                _ => "#E2E8F0",
            }
            .to_string()
        });
        let text_align = str_value(style, "textAlign").unwrap_or_else(|| {
            match kind {
                Button => "center",
                _ => "left",
            }
            .to_string()
        });

        let gradient = str_value(style, "backgroundType").as_deref() == Some("gradient")
            && matches!(kind, Shape | Heading | Form | Text | Video);
        let background = if kind == Button {
            Background::Solid {
                color: TRANSPARENT.to_string(),
            }
        } else if gradient {
            Background::Gradient {
                direction: str_value(style, "gradientDirection")
                    .unwrap_or_else(|| DEFAULT_GRADIENT_DIRECTION.to_string()),
                start: str_value(style, "gradientStartColor")
                    .unwrap_or_else(|| DEFAULT_GRADIENT_START.to_string()),
                end: str_value(style, "gradientEndColor")
                    .unwrap_or_else(|| DEFAULT_GRADIENT_END.to_string()),
            }
        } else {
            let fallback = match kind {
                Shape => "#4A5568",
                Form => "#FFFFFF",
                _ => TRANSPARENT,
            };
            Background::Solid {
                color: str_value(style, "backgroundColor").unwrap_or_else(|| fallback.to_string()),
            }
        };

        let border_width = num_value(style, "borderWidth").unwrap_or(0.0);
        let border = (border_width > 0.0 && kind != Group).then(|| Border {
            width: border_width,
            style: str_value(style, "borderStyle").unwrap_or_else(|| "solid".to_string()),
            color: str_value(style, "borderColor").unwrap_or_else(|| TRANSPARENT.to_string()),
        });

        let shadow = Shadow {
            offset_x: num_value(style, "shadowOffsetX").unwrap_or(0.0),
            offset_y: num_value(style, "shadowOffsetY").unwrap_or(0.0),
            blur: num_value(style, "shadowBlur").unwrap_or(0.0),
            spread: num_value(style, "shadowSpread").unwrap_or(0.0),
            color: str_value(style, "shadowColor").unwrap_or_else(|| "rgba(0,0,0,0)".to_string()),
        };

        let blur = match kind {
            Image | Shape | Video => num_value(style, "blurAmount").unwrap_or(0.0).max(0.0),
            _ => 0.0,
        };

        Self {
            font_size,
            font_family: str_value(style, "fontFamily")
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            font_weight: str_value(style, "fontWeight").unwrap_or_else(|| "normal".to_string()),
            text_align,
            color,
            opacity: num_value(style, "opacity").unwrap_or(1.0),
            padding,
            border_radius: (kind != Group).then(|| geometry.border_radius.unwrap_or(0.0)),
            background,
            border,
            shadow,
            blur,
        }
    }
}

/// One element as it appears in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
    pub geometry: Geometry,
    pub style: ResolvedStyle,
    /// The raw style map, for kind-specific keys (media sources, form
    /// button colors) that have no resolved counterpart.
    pub attributes: Style,
}

/// All elements of one mode, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLayout {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<ExportElement>,
}

/// A page ready for an exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPage {
    pub name: String,
    pub page_background_color: String,
    pub desktop: ExportLayout,
    pub mobile: ExportLayout,
}

impl ExportPage {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn layout(elements: &[Element], mode: ViewMode, config: &EditorConfig) -> ExportLayout {
    let mut resolved: Vec<ExportElement> = elements
        .iter()
        .map(|element| {
            let geometry = resolve_geometry(element, mode, config);
            let style = element.effective_style();
            ExportElement {
                id: element.id,
                kind: element.kind,
                name: element.name.clone(),
                content: element.content.clone().unwrap_or_default(),
                form_fields: element.form_fields.clone(),
                group_id: element.group_id,
                style: ResolvedStyle::resolve(element.kind, &style, &geometry),
                attributes: style,
                geometry,
            }
        })
        .collect();
    resolved.sort_by_key(|e| e.geometry.z_index);

    let height = page_height(resolved.iter().map(|e| e.geometry.rect()), 0.0, config);
    ExportLayout {
        width: mode.canvas_width(config),
        height,
        elements: resolved,
    }
}

/// Resolve a page for export in both modes.
///
/// Fails on an empty page and on any element whose `group_id` does not name
/// a group on the page.
pub fn export_page(
    name: &str,
    elements: &[Element],
    page_background_color: &str,
    config: &EditorConfig,
) -> Result<ExportPage, ExportError> {
    if elements.is_empty() {
        return Err(ExportError::EmptyCanvas);
    }
    for element in elements {
        let Some(group) = element.group_id else {
            continue;
        };
        let resolves = elements.iter().any(|e| e.id == group && e.is_group());
        if !resolves {
            return Err(ExportError::DanglingGroup {
                element: element.id,
                group,
            });
        }
    }

    log::info!("Exporting '{name}' with {} elements", elements.len());
    Ok(ExportPage {
        name: name.to_string(),
        page_background_color: page_background_color.to_string(),
        desktop: layout(elements, ViewMode::Desktop, config),
        mobile: layout(elements, ViewMode::Mobile, config),
    })
}
