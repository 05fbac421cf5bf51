use std::path::PathBuf;

use fe_settings::{FrontendSettings, InfoField};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::resources::TextureId;

/// Rows shown by a list box whose character size is left automatic.
pub const DEFAULT_LIST_ROWS: usize = 11;
/// Upper bound on the rows a list box lays out.
pub const MAX_LIST_ROWS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const YELLOW: Rgba = Rgba::new(255, 255, 0, 255);
    pub const BLUE: Rgba = Rgba::new(0, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Replaces the colour channels and keeps alpha.
    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.r = r;
        self.g = g;
        self.b = b;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// State shared by every presentable element.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub bounds: Bounds,
    pub visible: bool,
    pub color: Rgba,
    pub rotation: f32,
    pub index_offset: i32,
}

impl Placement {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            visible: true,
            color: Rgba::WHITE,
            rotation: 0.0,
            index_offset: 0,
        }
    }
}

pub trait Presentable {
    fn placement(&self) -> &Placement;
    fn placement_mut(&mut self) -> &mut Placement;

    /// Refreshes selection-dependent content.
    fn on_new_selection(&mut self, _settings: &dyn FrontendSettings) {}

    fn is_visible(&self) -> bool {
        self.placement().visible
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    #[default]
    Centre,
    Right,
}

impl Align {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Align::Left),
            1 => Some(Align::Centre),
            2 => Some(Align::Right),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Align::Left => 0,
            Align::Centre => 1,
            Align::Right => 2,
        }
    }
}

pub mod style {
    pub const REGULAR: u32 = 0;
    pub const BOLD: u32 = 1;
    pub const ITALIC: u32 = 2;
    pub const UNDERLINED: u32 = 4;
}

/// Text attributes shared by Text and ListBox.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    pub bg_color: Rgba,
    /// `None` picks a size from the element height.
    pub char_size: Option<u32>,
    pub style: u32,
    pub align: Align,
    pub font: Option<PathBuf>,
}

impl TextFormat {
    pub fn new(font: Option<PathBuf>) -> Self {
        Self {
            bg_color: Rgba::TRANSPARENT,
            char_size: None,
            style: style::REGULAR,
            align: Align::Centre,
            font,
        }
    }

    /// Script-facing size, 0 when automatic.
    pub fn char_size_value(&self) -> i32 {
        self.char_size.map(|size| size as i32).unwrap_or(0)
    }

    pub fn set_char_size_value(&mut self, size: i32) {
        self.char_size = u32::try_from(size).ok().filter(|size| *size > 0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub placement: Placement,
    pub texture: TextureId,
    pub subimg: Option<Bounds>,
    pub shear: Vec2,
}

impl ImageElement {
    pub fn new(texture: TextureId, bounds: Bounds) -> Self {
        Self {
            placement: Placement::new(bounds),
            texture,
            subimg: None,
            shear: Vec2::ZERO,
        }
    }
}

impl Presentable for ImageElement {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub placement: Placement,
    pub format: TextFormat,
    template: String,
    rendered: String,
}

impl TextElement {
    pub fn new(template: impl Into<String>, bounds: Bounds, font: Option<PathBuf>) -> Self {
        let template = template.into();
        Self {
            placement: Placement::new(bounds),
            format: TextFormat::new(font),
            rendered: template.clone(),
            template,
        }
    }

    /// The string as set by the script, tokens unexpanded.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
        self.rendered = self.template.clone();
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

impl Presentable for TextElement {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn on_new_selection(&mut self, settings: &dyn FrontendSettings) {
        self.rendered = expand_tokens(&self.template, settings, self.placement.index_offset);
    }
}

/// Substitutes `[Field]` style tokens. Unknown tokens are kept verbatim.
pub fn expand_tokens(template: &str, settings: &dyn FrontendSettings, offset: i32) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find(']') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let token = &after[..end];
        match token_value(token, settings, offset) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('[');
                out.push_str(token);
                out.push(']');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn token_value(token: &str, settings: &dyn FrontendSettings, offset: i32) -> Option<String> {
    match token {
        "ListTitle" => Some(settings.list_title()),
        "ListSize" => Some(settings.list_size().to_string()),
        "ListEntry" => Some(
            settings
                .selection_index()
                .map(|index| (index + 1).to_string())
                .unwrap_or_default(),
        ),
        other => InfoField::from_name(other).map(|field| settings.game_info(offset, field)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListBoxElement {
    pub placement: Placement,
    pub format: TextFormat,
    pub sel_color: Rgba,
    pub selbg_color: Rgba,
    pub sel_style: u32,
    entries: Vec<String>,
}

impl ListBoxElement {
    pub fn new(bounds: Bounds, font: Option<PathBuf>) -> Self {
        Self {
            placement: Placement::new(bounds),
            format: TextFormat::new(font),
            sel_color: Rgba::YELLOW,
            selbg_color: Rgba::BLUE,
            sel_style: style::BOLD,
            entries: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self.format.char_size {
            Some(size) => ((self.placement.bounds.height / size as f32).floor() as usize)
                .clamp(1, MAX_LIST_ROWS),
            None => DEFAULT_LIST_ROWS,
        }
    }

    /// Row holding the current selection.
    pub fn selected_row(&self) -> usize {
        self.row_count() / 2
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Presentable for ListBoxElement {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn on_new_selection(&mut self, settings: &dyn FrontendSettings) {
        self.entries.clear();
        let Some(selected) = settings.selection_index() else {
            return;
        };
        let size = settings.list_size() as i64;
        let rows = self.row_count();
        let centre = self.selected_row() as i64;
        for row in 0..rows as i64 {
            let offset = row - centre + self.placement.index_offset as i64;
            let index = selected as i64 + offset;
            if (0..size).contains(&index) {
                self.entries
                    .push(settings.game_info(offset as i32, InfoField::Title));
            } else {
                self.entries.push(String::new());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Image,
    Text,
    ListBox,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Image(ImageElement),
    Text(TextElement),
    ListBox(ListBoxElement),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Image(_) => ElementKind::Image,
            Element::Text(_) => ElementKind::Text,
            Element::ListBox(_) => ElementKind::ListBox,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            Element::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageElement> {
        match self {
            Element::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_list_box(&self) -> Option<&ListBoxElement> {
        match self {
            Element::ListBox(list) => Some(list),
            _ => None,
        }
    }

    pub fn text_format(&self) -> Option<&TextFormat> {
        match self {
            Element::Text(text) => Some(&text.format),
            Element::ListBox(list) => Some(&list.format),
            Element::Image(_) => None,
        }
    }

    pub fn text_format_mut(&mut self) -> Option<&mut TextFormat> {
        match self {
            Element::Text(text) => Some(&mut text.format),
            Element::ListBox(list) => Some(&mut list.format),
            Element::Image(_) => None,
        }
    }
}

impl Presentable for Element {
    fn placement(&self) -> &Placement {
        match self {
            Element::Image(image) => image.placement(),
            Element::Text(text) => text.placement(),
            Element::ListBox(list) => list.placement(),
        }
    }

    fn placement_mut(&mut self) -> &mut Placement {
        match self {
            Element::Image(image) => image.placement_mut(),
            Element::Text(text) => text.placement_mut(),
            Element::ListBox(list) => list.placement_mut(),
        }
    }

    fn on_new_selection(&mut self, settings: &dyn FrontendSettings) {
        match self {
            Element::Image(image) => image.on_new_selection(settings),
            Element::Text(text) => text.on_new_selection(settings),
            Element::ListBox(list) => list.on_new_selection(settings),
        }
    }
}
