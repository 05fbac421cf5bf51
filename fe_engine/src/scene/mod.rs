//! Ordered collection of presentable elements for the loaded layout.

mod element;
mod frame;

pub use element::{
    expand_tokens, style, Align, Bounds, Element, ElementKind, ImageElement, ListBoxElement,
    Placement, Presentable, Rgba, TextElement, TextFormat, DEFAULT_LIST_ROWS, MAX_LIST_ROWS,
};
pub use frame::{DrawItem, SceneFrame};

use fe_settings::FrontendSettings;
use slotmap::{new_key_type, SlotMap};

use crate::resources::TextureId;

new_key_type! {
    pub struct ElementId;
}

/// Page step used when the layout has no list box.
pub const FALLBACK_PAGE_SIZE: i32 = 5;

#[derive(Debug, Default)]
pub struct Scene {
    elements: SlotMap<ElementId, Element>,
    order: Vec<ElementId>,
    active_list: Option<ElementId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the draw order. The most recently added list box becomes
    /// the active list.
    pub fn add(&mut self, element: Element) -> ElementId {
        let is_list = matches!(element, Element::ListBox(_));
        let id = self.elements.insert(element);
        self.order.push(id);
        if is_list {
            self.active_list = Some(id);
        }
        id
    }

    /// Copies an image as a new element drawing from `texture`.
    pub fn clone_image(&mut self, source: ElementId, texture: TextureId) -> Option<ElementId> {
        let mut image = self.elements.get(source)?.as_image()?.clone();
        image.texture = texture;
        Some(self.add(Element::Image(image)))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.active_list = None;
        self.order.clear();
        self.elements.clear();
    }

    /// Elements in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.elements.get(*id).map(|element| (*id, element)))
    }

    pub fn active_list(&self) -> Option<&ListBoxElement> {
        self.active_list
            .and_then(|id| self.elements.get(id))
            .and_then(Element::as_list_box)
    }

    pub fn page_size(&self) -> i32 {
        self.active_list()
            .map(|list| i32::try_from(list.row_count()).unwrap_or(i32::MAX))
            .unwrap_or(FALLBACK_PAGE_SIZE)
    }

    /// Hidden elements are refreshed too.
    pub fn on_new_selection(&mut self, settings: &dyn FrontendSettings) {
        for element in self.elements.values_mut() {
            element.on_new_selection(settings);
        }
    }
}
