//! Lua proxies for elements, sounds and the layout globals.
//!
//! Each proxy is a plain table whose metatable routes reads and writes back
//! into the shared context. Keys without a native meaning are stored on the
//! table itself so scripts can hang their own data off an element.

use fe_settings::RotationState;
use mlua::{Error as LuaError, Lua, Result as LuaResult, Table, Value, Variadic};
use slotmap::{Key, KeyData};

use super::values::{
    describe_value, split_self, value_to_bool, value_to_channel, value_to_f32, value_to_i32,
    value_to_string,
};
use crate::context::{PresentContext, SharedContext};
use crate::error::PresentError;
use crate::resources::SoundId;
use crate::scene::{
    Align, Bounds, Element, ElementId, ElementKind, Presentable, Rgba, TextFormat,
};

// Lua 5.1 numbers are doubles; a 64-bit key does not fit in one.
const HANDLE_HIGH_FIELD: &str = "__handle_hi";
const HANDLE_LOW_FIELD: &str = "__handle_lo";
const KIND_FIELD: &str = "__kind";

fn stale() -> LuaError {
    LuaError::external(PresentError::StaleHandle)
}

fn expect_f32(key: &str, value: &Value) -> LuaResult<f32> {
    value_to_f32(value).ok_or_else(|| {
        LuaError::RuntimeError(format!("{key} expects a number, got {}", describe_value(value)))
    })
}

fn expect_i32(key: &str, value: &Value) -> LuaResult<i32> {
    value_to_i32(value).ok_or_else(|| {
        LuaError::RuntimeError(format!("{key} expects an integer, got {}", describe_value(value)))
    })
}

fn expect_channel(key: &str, value: &Value) -> LuaResult<u8> {
    value_to_channel(value).ok_or_else(|| {
        LuaError::RuntimeError(format!(
            "{key} expects a colour channel, got {}",
            describe_value(value)
        ))
    })
}

fn number<'lua>(value: f32) -> Value<'lua> {
    Value::Number(value as f64)
}

fn integer<'lua>(value: i64) -> Value<'lua> {
    Value::Integer(value)
}

fn store_handle(meta: &Table, id: ElementId) -> LuaResult<()> {
    let raw = id.data().as_ffi();
    meta.raw_set(HANDLE_HIGH_FIELD, raw >> 32)?;
    meta.raw_set(HANDLE_LOW_FIELD, raw & u64::from(u32::MAX))
}

fn load_handle(meta: &Table) -> Option<ElementId> {
    let high: u32 = meta.raw_get(HANDLE_HIGH_FIELD).ok()?;
    let low: u32 = meta.raw_get(HANDLE_LOW_FIELD).ok()?;
    let raw = (u64::from(high) << 32) | u64::from(low);
    Some(ElementId::from(KeyData::from_ffi(raw)))
}

/// Resolves the element behind a proxy created by [`element_proxy`].
pub(crate) fn element_handle(table: &Table) -> Option<(ElementId, String)> {
    let meta = table.get_metatable()?;
    let id = load_handle(&meta)?;
    let kind: String = meta.raw_get(KIND_FIELD).ok()?;
    Some((id, kind))
}

fn kind_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Image => "Image",
        ElementKind::Text => "Text",
        ElementKind::ListBox => "ListBox",
    }
}

pub(crate) fn element_proxy<'lua>(
    lua: &'lua Lua,
    context: SharedContext,
    id: ElementId,
) -> LuaResult<Table<'lua>> {
    let kind = context
        .borrow()
        .scene
        .get(id)
        .map(Element::kind)
        .ok_or_else(stale)?;

    let proxy = lua.create_table()?;
    let meta = lua.create_table()?;
    store_handle(&meta, id)?;
    meta.raw_set(KIND_FIELD, kind_name(kind))?;

    let read_context = context.clone();
    meta.set(
        "__index",
        lua.create_function(move |lua_ctx, (_table, key): (Table, Value)| {
            let Some(key) = value_to_string(&key) else {
                return Ok(Value::Nil);
            };
            if let Some(method) = element_method(lua_ctx, read_context.clone(), id, &key)? {
                return Ok(method);
            }
            let ctx = read_context.borrow();
            read_element(lua_ctx, &ctx, id, &key)
        })?,
    )?;

    let write_context = context;
    meta.set(
        "__newindex",
        lua.create_function(move |_, (table, key, value): (Table, Value, Value)| {
            let handled = match value_to_string(&key) {
                Some(name) => {
                    let mut ctx = write_context.borrow_mut();
                    let handled = write_element(&mut ctx, id, &name, &value)?;
                    if handled {
                        ctx.redraw_requested = true;
                    }
                    handled
                }
                None => false,
            };
            if !handled {
                table.raw_set(key, value)?;
            }
            Ok(())
        })?,
    )?;

    proxy.set_metatable(Some(meta));
    Ok(proxy)
}

fn element_method<'lua>(
    lua: &'lua Lua,
    context: SharedContext,
    id: ElementId,
    key: &str,
) -> LuaResult<Option<Value<'lua>>> {
    let target = match key {
        "set_rgb" => ColorTarget::Main,
        "set_bg_rgb" => ColorTarget::Background,
        "set_sel_rgb" => ColorTarget::Selection,
        "set_selbg_rgb" => ColorTarget::SelectionBackground,
        _ => return Ok(None),
    };
    let function = lua.create_function(move |_, args: Variadic<Value>| {
        let (_, values) = split_self(args);
        let channel = |index: usize| {
            values
                .get(index)
                .and_then(value_to_channel)
                .ok_or_else(|| LuaError::RuntimeError("set_rgb expects r, g, b".to_string()))
        };
        let (r, g, b) = (channel(0)?, channel(1)?, channel(2)?);
        let mut ctx = context.borrow_mut();
        let element = ctx.scene.get_mut(id).ok_or_else(stale)?;
        let kind = element.kind();
        let color = target.resolve(element).ok_or_else(|| {
            LuaError::RuntimeError(format!("{} has no such colour", kind_name(kind)))
        })?;
        color.set_rgb(r, g, b);
        ctx.redraw_requested = true;
        Ok(())
    })?;
    Ok(Some(Value::Function(function)))
}

#[derive(Debug, Clone, Copy)]
enum ColorTarget {
    Main,
    Background,
    Selection,
    SelectionBackground,
}

impl ColorTarget {
    fn resolve(self, element: &mut Element) -> Option<&mut Rgba> {
        match (self, element) {
            (ColorTarget::Main, element) => Some(&mut element.placement_mut().color),
            (ColorTarget::Background, element) => {
                element.text_format_mut().map(|format| &mut format.bg_color)
            }
            (ColorTarget::Selection, Element::ListBox(list)) => Some(&mut list.sel_color),
            (ColorTarget::SelectionBackground, Element::ListBox(list)) => {
                Some(&mut list.selbg_color)
            }
            _ => None,
        }
    }
}

fn read_element<'lua>(
    lua: &'lua Lua,
    ctx: &PresentContext,
    id: ElementId,
    key: &str,
) -> LuaResult<Value<'lua>> {
    let element = ctx.scene.get(id).ok_or_else(stale)?;
    let placement = element.placement();
    let value = match key {
        "visible" => Value::Boolean(placement.visible),
        "x" => number(placement.bounds.x),
        "y" => number(placement.bounds.y),
        "width" => number(placement.bounds.width),
        "height" => number(placement.bounds.height),
        "rotation" => number(placement.rotation),
        "red" => integer(placement.color.r.into()),
        "green" => integer(placement.color.g.into()),
        "blue" => integer(placement.color.b.into()),
        "alpha" => integer(placement.color.a.into()),
        "index_offset" => integer(index_offset(ctx, element).into()),
        _ => match element {
            Element::Image(image) => {
                let texture = ctx.pool.texture(image.texture);
                let (tex_w, tex_h) = texture.and_then(|texture| texture.size()).unwrap_or((0, 0));
                let subimg = image
                    .subimg
                    .unwrap_or_else(|| Bounds::new(0.0, 0.0, tex_w as f32, tex_h as f32));
                match key {
                    "shear_x" => number(image.shear.x),
                    "shear_y" => number(image.shear.y),
                    "texture_width" => integer(tex_w.into()),
                    "texture_height" => integer(tex_h.into()),
                    "subimg_x" => number(subimg.x),
                    "subimg_y" => number(subimg.y),
                    "subimg_width" => number(subimg.width),
                    "subimg_height" => number(subimg.height),
                    "movie_enabled" => Value::Boolean(
                        texture.map(|texture| texture.movie_enabled()).unwrap_or(false),
                    ),
                    _ => Value::Nil,
                }
            }
            Element::Text(text) => match key {
                "msg" => Value::String(lua.create_string(text.template())?),
                _ => read_format(&text.format, key).unwrap_or(Value::Nil),
            },
            Element::ListBox(list) => match key {
                "sel_red" => integer(list.sel_color.r.into()),
                "sel_green" => integer(list.sel_color.g.into()),
                "sel_blue" => integer(list.sel_color.b.into()),
                "sel_alpha" => integer(list.sel_color.a.into()),
                "selbg_red" => integer(list.selbg_color.r.into()),
                "selbg_green" => integer(list.selbg_color.g.into()),
                "selbg_blue" => integer(list.selbg_color.b.into()),
                "selbg_alpha" => integer(list.selbg_color.a.into()),
                "sel_style" => integer(list.sel_style.into()),
                "rows" => integer(list.row_count() as i64),
                _ => read_format(&list.format, key).unwrap_or(Value::Nil),
            },
        },
    };
    Ok(value)
}

fn index_offset(ctx: &PresentContext, element: &Element) -> i32 {
    match element {
        Element::Image(image) => ctx
            .pool
            .texture(image.texture)
            .map(|texture| texture.index_offset())
            .unwrap_or(0),
        other => other.placement().index_offset,
    }
}

fn read_format<'lua>(format: &TextFormat, key: &str) -> Option<Value<'lua>> {
    let value = match key {
        "bg_red" => integer(format.bg_color.r.into()),
        "bg_green" => integer(format.bg_color.g.into()),
        "bg_blue" => integer(format.bg_color.b.into()),
        "bg_alpha" => integer(format.bg_color.a.into()),
        "charsize" => integer(format.char_size_value().into()),
        "style" => integer(format.style.into()),
        "align" => integer(format.align.index().into()),
        _ => return None,
    };
    Some(value)
}

/// Applies a property write. Returns false for keys the element does not
/// define.
fn write_element(
    ctx: &mut PresentContext,
    id: ElementId,
    key: &str,
    value: &Value,
) -> LuaResult<bool> {
    let element = ctx.scene.get_mut(id).ok_or_else(stale)?;
    let placement = element.placement_mut();
    match key {
        "visible" => placement.visible = value_to_bool(value),
        "x" => placement.bounds.x = expect_f32(key, value)?,
        "y" => placement.bounds.y = expect_f32(key, value)?,
        "width" => placement.bounds.width = expect_f32(key, value)?,
        "height" => placement.bounds.height = expect_f32(key, value)?,
        "rotation" => placement.rotation = expect_f32(key, value)?,
        "red" => placement.color.r = expect_channel(key, value)?,
        "green" => placement.color.g = expect_channel(key, value)?,
        "blue" => placement.color.b = expect_channel(key, value)?,
        "alpha" => placement.color.a = expect_channel(key, value)?,
        "index_offset" => {
            let offset = expect_i32(key, value)?;
            placement.index_offset = offset;
            if let Some(texture) = element
                .as_image()
                .and_then(|image| ctx.pool.texture_mut(image.texture))
            {
                texture.set_index_offset(offset);
            }
            ctx.refresh_element(id);
        }
        _ => return write_specific(ctx, id, key, value),
    }
    Ok(true)
}

fn write_specific(
    ctx: &mut PresentContext,
    id: ElementId,
    key: &str,
    value: &Value,
) -> LuaResult<bool> {
    let settings = ctx.settings.as_ref();
    let element = ctx.scene.get_mut(id).ok_or_else(stale)?;
    match element {
        Element::Image(image) => {
            let texture = ctx.pool.texture_mut(image.texture);
            match key {
                "shear_x" => image.shear.x = expect_f32(key, value)?,
                "shear_y" => image.shear.y = expect_f32(key, value)?,
                "subimg_x" | "subimg_y" | "subimg_width" | "subimg_height" => {
                    let (tex_w, tex_h) = texture
                        .as_ref()
                        .and_then(|texture| texture.size())
                        .unwrap_or((0, 0));
                    let rect = image
                        .subimg
                        .get_or_insert_with(|| Bounds::new(0.0, 0.0, tex_w as f32, tex_h as f32));
                    let amount = expect_f32(key, value)?;
                    match key {
                        "subimg_x" => rect.x = amount,
                        "subimg_y" => rect.y = amount,
                        "subimg_width" => rect.width = amount,
                        _ => rect.height = amount,
                    }
                }
                "movie_enabled" => {
                    if let Some(texture) = texture {
                        texture.set_movie_enabled(value_to_bool(value));
                    }
                }
                "texture_width" | "texture_height" => {
                    return Err(LuaError::RuntimeError(format!("{key} is read-only")));
                }
                _ => return Ok(false),
            }
        }
        Element::Text(text) => match key {
            "msg" => {
                let msg = value_to_string(value).unwrap_or_default();
                text.set_template(msg);
                text.on_new_selection(settings);
            }
            _ => return write_format(&mut text.format, key, value),
        },
        Element::ListBox(list) => {
            match key {
                "sel_red" => list.sel_color.r = expect_channel(key, value)?,
                "sel_green" => list.sel_color.g = expect_channel(key, value)?,
                "sel_blue" => list.sel_color.b = expect_channel(key, value)?,
                "sel_alpha" => list.sel_color.a = expect_channel(key, value)?,
                "selbg_red" => list.selbg_color.r = expect_channel(key, value)?,
                "selbg_green" => list.selbg_color.g = expect_channel(key, value)?,
                "selbg_blue" => list.selbg_color.b = expect_channel(key, value)?,
                "selbg_alpha" => list.selbg_color.a = expect_channel(key, value)?,
                "sel_style" => list.sel_style = expect_i32(key, value)?.max(0) as u32,
                "rows" => return Err(LuaError::RuntimeError("rows is read-only".to_string())),
                _ => {
                    let handled = write_format(&mut list.format, key, value)?;
                    // the row count depends on charsize
                    if handled {
                        list.on_new_selection(settings);
                    }
                    return Ok(handled);
                }
            }
        }
    }
    Ok(true)
}

fn write_format(format: &mut TextFormat, key: &str, value: &Value) -> LuaResult<bool> {
    match key {
        "bg_red" => format.bg_color.r = expect_channel(key, value)?,
        "bg_green" => format.bg_color.g = expect_channel(key, value)?,
        "bg_blue" => format.bg_color.b = expect_channel(key, value)?,
        "bg_alpha" => format.bg_color.a = expect_channel(key, value)?,
        "charsize" => format.set_char_size_value(expect_i32(key, value)?),
        "style" => format.style = expect_i32(key, value)?.max(0) as u32,
        "align" => {
            let index = expect_i32(key, value)?;
            format.align = Align::from_index(index)
                .ok_or_else(|| LuaError::RuntimeError(format!("unknown alignment {index}")))?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

pub(crate) fn sound_proxy<'lua>(
    lua: &'lua Lua,
    context: SharedContext,
    id: SoundId,
) -> LuaResult<Table<'lua>> {
    let proxy = lua.create_table()?;
    let meta = lua.create_table()?;

    let read_context = context.clone();
    meta.set(
        "__index",
        lua.create_function(move |lua_ctx, (_table, key): (Table, Value)| {
            let Some(key) = value_to_string(&key) else {
                return Ok(Value::Nil);
            };
            match key.as_str() {
                "load" => {
                    let load_context = read_context.clone();
                    let load = lua_ctx.create_function(move |_, args: Variadic<Value>| {
                        let (_, values) = split_self(args);
                        let name = values.first().and_then(value_to_string).unwrap_or_default();
                        let loaded = load_context
                            .borrow_mut()
                            .load_sound(id, &name)
                            .map_err(LuaError::external)?;
                        Ok(loaded)
                    })?;
                    return Ok(Value::Function(load));
                }
                "play" => {
                    let play_context = read_context.clone();
                    let play = lua_ctx.create_function(move |_, _: Variadic<Value>| {
                        let request = play_context
                            .borrow_mut()
                            .play_sound(id)
                            .map_err(LuaError::external)?;
                        if let Some((audio, path, volume, pitch)) = request {
                            audio.sound_play(&path, volume, pitch);
                        }
                        Ok(())
                    })?;
                    return Ok(Value::Function(play));
                }
                _ => {}
            }
            let ctx = read_context.borrow();
            let sound = ctx.pool.sound(id).ok_or_else(stale)?;
            let value = match key.as_str() {
                "is_playing" => Value::Boolean(sound.is_playing()),
                "pitch" => number(sound.pitch()),
                "x" => number(sound.position()[0]),
                "y" => number(sound.position()[1]),
                "z" => number(sound.position()[2]),
                _ => Value::Nil,
            };
            Ok(value)
        })?,
    )?;

    let write_context = context;
    meta.set(
        "__newindex",
        lua.create_function(move |_, (table, key, value): (Table, Value, Value)| {
            let name = value_to_string(&key).unwrap_or_default();
            let axis = match name.as_str() {
                "x" => Some(0),
                "y" => Some(1),
                "z" => Some(2),
                _ => None,
            };
            if name == "pitch" || axis.is_some() {
                let amount = expect_f32(&name, &value)?;
                let mut ctx = write_context.borrow_mut();
                let sound = ctx.pool.sound_mut(id).ok_or_else(stale)?;
                match axis {
                    Some(axis) => sound.position_mut()[axis] = amount,
                    None => sound.set_pitch(amount),
                }
                ctx.redraw_requested = true;
                return Ok(());
            }
            if name == "is_playing" {
                return Err(LuaError::RuntimeError("is_playing is read-only".to_string()));
            }
            table.raw_set(key, value)
        })?,
    )?;

    proxy.set_metatable(Some(meta));
    Ok(proxy)
}

/// `fe.layout`: logical size, font and orientation of the layout.
pub(crate) fn layout_proxy(lua: &Lua, context: SharedContext) -> LuaResult<Table<'_>> {
    let proxy = lua.create_table()?;
    let meta = lua.create_table()?;

    let read_context = context.clone();
    meta.set(
        "__index",
        lua.create_function(move |lua_ctx, (_table, key): (Table, Value)| {
            let ctx = read_context.borrow();
            let layout = ctx.layout();
            let value = match value_to_string(&key).as_deref() {
                Some("width") => number(layout.layout_size.x),
                Some("height") => number(layout.layout_size.y),
                Some("font") => Value::String(lua_ctx.create_string(&layout.font_name)?),
                Some("orient") => integer(layout.base_rotation.index().into()),
                _ => Value::Nil,
            };
            Ok(value)
        })?,
    )?;

    let write_context = context;
    meta.set(
        "__newindex",
        lua.create_function(move |_, (table, key, value): (Table, Value, Value)| {
            let name = value_to_string(&key).unwrap_or_default();
            let mut ctx = write_context.borrow_mut();
            match name.as_str() {
                "width" => ctx.set_layout_width(expect_f32(&name, &value)?),
                "height" => ctx.set_layout_height(expect_f32(&name, &value)?),
                "font" => {
                    let font = value_to_string(&value).unwrap_or_default();
                    ctx.set_layout_font(&font);
                }
                "orient" => {
                    let index = expect_i32(&name, &value)?;
                    ctx.set_layout_orient(RotationState::from_index(index));
                }
                _ => {
                    drop(ctx);
                    table.raw_set(key, value)?;
                }
            }
            Ok(())
        })?,
    )?;

    proxy.set_metatable(Some(meta));
    Ok(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_survive_high_slot_versions() {
        let lua = Lua::new();
        let meta = lua.create_table().unwrap();
        // version 0x7fff_ffff, slot 5
        let id = ElementId::from(KeyData::from_ffi((0x7fff_ffff_u64 << 32) | 5));
        store_handle(&meta, id).unwrap();
        assert_eq!(load_handle(&meta), Some(id));

        let table = lua.create_table().unwrap();
        meta.raw_set(KIND_FIELD, "Image").unwrap();
        table.set_metatable(Some(meta));
        assert_eq!(element_handle(&table), Some((id, "Image".to_string())));
    }
}
