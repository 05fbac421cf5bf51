use std::path::PathBuf;

use glam::Affine2;
use serde::Serialize;

use super::element::{Align, Bounds, Element, Presentable, Rgba};
use super::Scene;
use crate::resources::{MovieState, ResourcePool};

/// Everything a render surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    /// Column-major 2x3 matrix: `[m00, m01, m10, m11, tx, ty]`.
    pub transform: [f32; 6],
    pub items: Vec<DrawItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    Image {
        bounds: Bounds,
        color: Rgba,
        rotation: f32,
        texture: Option<PathBuf>,
        subimg: Option<Bounds>,
        shear: [f32; 2],
        movie: Option<MovieState>,
    },
    Text {
        bounds: Bounds,
        color: Rgba,
        rotation: f32,
        text: String,
        bg_color: Rgba,
        char_size: Option<u32>,
        style: u32,
        align: Align,
        font: Option<PathBuf>,
    },
    ListBox {
        bounds: Bounds,
        color: Rgba,
        rotation: f32,
        rows: Vec<String>,
        selected_row: usize,
        bg_color: Rgba,
        sel_color: Rgba,
        selbg_color: Rgba,
        sel_style: u32,
        char_size: Option<u32>,
        style: u32,
        align: Align,
        font: Option<PathBuf>,
    },
}

impl SceneFrame {
    pub fn capture(scene: &Scene, pool: &ResourcePool, transform: Affine2) -> Self {
        let items = scene
            .iter()
            .filter(|(_, element)| element.is_visible())
            .map(|(_, element)| draw_item(element, pool))
            .collect();
        Self {
            transform: transform.to_cols_array(),
            items,
        }
    }

    pub fn affine(&self) -> Affine2 {
        Affine2::from_cols_array(&self.transform)
    }
}

fn draw_item(element: &Element, pool: &ResourcePool) -> DrawItem {
    let placement = element.placement();
    match element {
        Element::Image(image) => {
            let texture = pool.texture(image.texture);
            let mut bounds = placement.bounds;
            // zero-sized images take the size of their texture
            if let Some((width, height)) = texture.and_then(|texture| texture.size()) {
                if bounds.width == 0.0 {
                    bounds.width = width as f32;
                }
                if bounds.height == 0.0 {
                    bounds.height = height as f32;
                }
            }
            DrawItem::Image {
                bounds,
                color: placement.color,
                rotation: placement.rotation,
                texture: texture.and_then(|texture| texture.resolved().map(|path| path.to_path_buf())),
                subimg: image.subimg,
                shear: image.shear.to_array(),
                movie: texture.and_then(|texture| texture.movie()),
            }
        }
        Element::Text(text) => DrawItem::Text {
            bounds: placement.bounds,
            color: placement.color,
            rotation: placement.rotation,
            text: text.rendered().to_string(),
            bg_color: text.format.bg_color,
            char_size: text.format.char_size,
            style: text.format.style,
            align: text.format.align,
            font: text.format.font.clone(),
        },
        Element::ListBox(list) => DrawItem::ListBox {
            bounds: placement.bounds,
            color: placement.color,
            rotation: placement.rotation,
            rows: list.entries().to_vec(),
            selected_row: list.selected_row(),
            bg_color: list.format.bg_color,
            sel_color: list.sel_color,
            selbg_color: list.selbg_color,
            sel_style: list.sel_style,
            char_size: list.format.char_size,
            style: list.format.style,
            align: list.format.align,
            font: list.format.font.clone(),
        },
    }
}
