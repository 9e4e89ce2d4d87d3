use std::collections::HashMap;

use crate::preview::VisualDocument;

/// The current view: projected documents addressable by mount identifier.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    mounted: HashMap<String, VisualDocument>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view holding just the preview, mounted under its own root id.
    pub fn with_preview(visual: VisualDocument) -> Self {
        let mut surface = Self::new();
        surface.mount(visual.root_id.clone(), visual);
        surface
    }

    pub fn mount(&mut self, id: impl Into<String>, visual: VisualDocument) {
        self.mounted.insert(id.into(), visual);
    }

    pub fn find(&self, id: &str) -> Option<&VisualDocument> {
        self.mounted.get(id)
    }
}
