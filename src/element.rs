use egui::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a scene element
pub type ElementId = Uuid;

/// The drawable kinds a scene can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Freedraw,
    Arrow,
    Text,
    Image,
}

/// A drawable element of the scene.
///
/// Elements are immutable by convention: mutations produce a new value via the
/// `with_*` helpers, and deletion is a soft flag — deleted elements stay in the
/// scene's working set and are filtered out by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub rect: Rect,
    pub is_deleted: bool,
}

impl SceneElement {
    pub fn new(kind: ElementKind, rect: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            rect,
            is_deleted: false,
        }
    }

    /// Copy of this element with the deleted flag set
    pub fn with_deleted(&self, is_deleted: bool) -> Self {
        Self {
            is_deleted,
            ..self.clone()
        }
    }

    /// Copy of this element moved/resized to a new rectangle
    pub fn with_rect(&self, rect: Rect) -> Self {
        Self {
            rect,
            ..self.clone()
        }
    }
}

/// The non-deleted subset of an element slice, in scene order
pub fn non_deleted(elements: &[SceneElement]) -> impl Iterator<Item = &SceneElement> {
    elements.iter().filter(|element| !element.is_deleted)
}

/// Soft-delete every element, preserving order
pub fn soft_delete_all(elements: &[SceneElement]) -> Vec<SceneElement> {
    elements
        .iter()
        .map(|element| element.with_deleted(true))
        .collect()
}

/// Axis-aligned bounds enclosing the given elements, or `None` when the
/// iterator is empty
pub fn common_bounds<'a>(elements: impl Iterator<Item = &'a SceneElement>) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for element in elements {
        bounds = Some(match bounds {
            Some(acc) => acc.union(element.rect),
            None => element.rect,
        });
    }
    bounds
}
