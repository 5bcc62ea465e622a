//! Pagesmith Core Library
//!
//! Platform-agnostic data model and editing logic for the Pagesmith page
//! builder: elements with desktop/mobile geometry, the element store, undo
//! history, pointer gestures with grid and guide snapping, and persistence.

pub mod config;
pub mod editor;
pub mod element;
pub mod export;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod responsive;
pub mod storage;
pub mod store;
pub mod tools;

pub use config::{ConfigError, EditorConfig, GRID_SIZE, SNAP_THRESHOLD};
pub use editor::{Editor, Notification, Severity};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ElementUpdate, FormField, FormFieldType,
    Geometry, GeometryPatch,
};
pub use export::{ExportError, ExportPage, export_page};
pub use geometry::{SnapLines, candidate_snap_lines, snap_to_grid};
pub use history::{History, Snapshot};
pub use input::{Key, KeyEvent, Modifiers, Shortcut};
pub use interaction::{HandleKind, InteractionEngine};
pub use responsive::{RenderElement, ViewMode, migrate_to_responsive, project};
pub use store::{ElementStore, LayerDirection, StoreError};
pub use tools::ToolKind;
