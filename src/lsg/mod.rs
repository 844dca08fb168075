//! Logical scene graph (LSG) segments.
//!
//! An LSG segment holds the assembly structure of a model: graph nodes,
//! the attributes attached to them and property atoms. Elements refer to
//! one another by object id; [`SceneGraphSegment::element`] resolves an id
//! within the segment.

mod decode;
mod elements;

use std::collections::HashMap;

pub use decode::{decode_scene_graph, read_element};
pub use elements::*;

use crate::binary::CompressionAlgorithm;
use crate::core::SegmentHeader;

/// A decoded LSG segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraphSegment {
    pub header: SegmentHeader,
    /// Algorithm of the element block when it was compressed.
    pub compression: Option<CompressionAlgorithm>,
    /// Elements in file order.
    pub elements: Vec<GraphElement>,
    /// The element list ended at an element that could not be decoded.
    pub truncated: bool,
    index: HashMap<i32, usize>,
}

impl SceneGraphSegment {
    pub fn new(
        header: SegmentHeader,
        compression: Option<CompressionAlgorithm>,
        elements: Vec<GraphElement>,
        truncated: bool,
    ) -> Self {
        let mut index = HashMap::with_capacity(elements.len());
        for (i, e) in elements.iter().enumerate() {
            // first definition wins
            index.entry(e.object_id()).or_insert(i);
        }
        Self { header, compression, elements, truncated, index }
    }

    /// First element of the list; the graph root for LSG segments.
    pub fn root(&self) -> Option<&GraphElement> {
        self.elements.first()
    }

    /// Look up an element by object id.
    pub fn element(&self, object_id: i32) -> Option<&GraphElement> {
        self.index.get(&object_id).map(|&i| &self.elements[i])
    }

    /// Child elements of `element` that were decoded in this segment.
    pub fn children<'a>(
        &'a self,
        element: &'a GraphElement,
    ) -> impl Iterator<Item = &'a GraphElement> + 'a {
        element.child_ids().iter().filter_map(move |id| self.element(*id))
    }

    /// Attribute elements attached to `element` that were decoded in this segment.
    pub fn attributes<'a>(
        &'a self,
        element: &'a GraphElement,
    ) -> impl Iterator<Item = &'a GraphElement> + 'a {
        element.attribute_ids().iter().filter_map(move |id| self.element(*id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
