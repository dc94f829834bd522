use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::SceneElement;

/// A binary asset referenced by image elements. The core never inspects the
/// payload; it only carries and clears the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub mime_type: String,
    pub data: String,
}

/// File-blob map keyed by file id, ordered for stable serialization
pub type FileMap = BTreeMap<String, FileBlob>;

/// The scene: an ordered collection of drawable elements.
///
/// The scene exclusively owns its elements. Actions never mutate elements in
/// place; they produce a complete next list which replaces the working set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    elements: Vec<SceneElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(elements: Vec<SceneElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    /// Swap in a complete next element list. Callers produce the full list,
    /// not a diff.
    pub fn replace_all_elements(&mut self, elements: Vec<SceneElement>) {
        self.elements = elements;
    }

    pub fn push_element(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    pub fn non_deleted_elements(&self) -> impl Iterator<Item = &SceneElement> {
        crate::element::non_deleted(&self.elements)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
