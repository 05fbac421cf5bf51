use std::fs;
use std::path::Path;

use fe_settings::{InfoField, RotationState};
use mlua::{Error as LuaError, IntoLua, Lua, Result as LuaResult, Table, Value, Variadic};

use super::objects::{element_handle, element_proxy, layout_proxy, sound_proxy};
use super::values::{describe_value, value_to_f32, value_to_i32, value_to_string};
use crate::context::SharedContext;
use crate::error::PresentError;
use crate::input::{Command, JoyAxis, KEY_NAMES};
use crate::scene::{style, Align, Bounds, ElementId};
use crate::transitions::TransitionType;

pub(crate) const FE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `major * 100 + minor * 10 + patch`, as exposed in `FeVersionNum`.
pub(crate) fn version_number() -> i64 {
    let mut parts = FE_VERSION
        .split('.')
        .map(|part| part.parse::<i64>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    let patch = parts.next().unwrap_or(0);
    major * 100 + minor * 10 + patch
}

/// Registers the whole capability surface on a fresh interpreter.
pub(crate) fn install(lua: &Lua, context: SharedContext) -> LuaResult<()> {
    install_print(lua)?;
    install_constants(lua, &context)?;
    install_fe_table(lua, context)?;
    Ok(())
}

fn install_print(lua: &Lua) -> LuaResult<()> {
    let print = lua.create_function(|_, args: Variadic<Value>| {
        let line = args
            .iter()
            .map(describe_value)
            .collect::<Vec<_>>()
            .join("\t");
        log::info!("Script: {line}");
        Ok(())
    })?;
    lua.globals().set("print", print)
}

fn enum_table<'lua, K, I>(lua: &'lua Lua, entries: I) -> LuaResult<Table<'lua>>
where
    K: IntoLua<'lua>,
    I: IntoIterator<Item = (K, i64)>,
{
    let table = lua.create_table()?;
    for (name, value) in entries {
        table.set(name, value)?;
    }
    Ok(table)
}

fn install_constants(lua: &Lua, context: &SharedContext) -> LuaResult<()> {
    let globals = lua.globals();
    let (display, screensaver_active) = {
        let ctx = context.borrow();
        (ctx.display(), ctx.layout().screensaver_active)
    };

    globals.set("FeVersion", FE_VERSION)?;
    globals.set("FeVersionNum", version_number())?;
    globals.set("ScreenWidth", i64::from(display.width))?;
    globals.set("ScreenHeight", i64::from(display.height))?;
    globals.set("ScreenSaverActive", screensaver_active)?;

    globals.set(
        "Transition",
        enum_table(
            lua,
            TransitionType::ALL
                .iter()
                .map(|kind| (kind.script_name(), i64::from(kind.index()))),
        )?,
    )?;
    globals.set(
        "Style",
        enum_table(
            lua,
            [
                ("Regular", i64::from(style::REGULAR)),
                ("Bold", i64::from(style::BOLD)),
                ("Italic", i64::from(style::ITALIC)),
                ("Underlined", i64::from(style::UNDERLINED)),
            ],
        )?,
    )?;
    globals.set(
        "Align",
        enum_table(
            lua,
            [Align::Left, Align::Centre, Align::Right].map(|align| {
                let name = match align {
                    Align::Left => "Left",
                    Align::Centre => "Centre",
                    Align::Right => "Right",
                };
                (name, i64::from(align.index()))
            }),
        )?,
    )?;
    globals.set(
        "RotateScreen",
        enum_table(
            lua,
            RotationState::ALL
                .iter()
                .map(|rotation| (rotation.name(), i64::from(rotation.index()))),
        )?,
    )?;
    globals.set(
        "Axis",
        enum_table(
            lua,
            JoyAxis::ALL
                .iter()
                .enumerate()
                .map(|(index, axis)| (axis.name(), index as i64)),
        )?,
    )?;
    globals.set(
        "Key",
        enum_table(
            lua,
            KEY_NAMES
                .iter()
                .enumerate()
                .map(|(index, name)| (*name, index as i64)),
        )?,
    )?;
    globals.set(
        "Command",
        enum_table(
            lua,
            Command::ALL
                .iter()
                .enumerate()
                .map(|(index, command)| (format!("{command:?}"), index as i64)),
        )?,
    )?;
    globals.set(
        "Info",
        enum_table(
            lua,
            InfoField::ALL
                .iter()
                .map(|field| (field.name(), i64::from(field.index()))),
        )?,
    )?;
    Ok(())
}

/// Optional `x, y[, w, h]` arguments following the first one.
fn bounds_from(values: &[Value], first: usize) -> Bounds {
    let at = |index: usize| values.get(first + index).and_then(value_to_f32).unwrap_or(0.0);
    Bounds::new(at(0), at(1), at(2), at(3))
}

fn required_string(values: &[Value], function: &str) -> LuaResult<String> {
    values
        .first()
        .and_then(value_to_string)
        .ok_or_else(|| LuaError::RuntimeError(format!("{function} expects a name")))
}

/// Wraps a new element in a proxy and appends it to `fe.obj`.
fn register_element<'lua>(
    lua: &'lua Lua,
    context: SharedContext,
    id: ElementId,
) -> LuaResult<Table<'lua>> {
    let proxy = element_proxy(lua, context, id)?;
    let fe: Table = lua.globals().get("fe")?;
    let obj: Table = fe.get("obj")?;
    obj.raw_set(obj.raw_len() + 1, proxy.clone())?;
    Ok(proxy)
}

fn install_fe_table(lua: &Lua, context: SharedContext) -> LuaResult<()> {
    let fe = lua.create_table()?;
    fe.set("obj", lua.create_table()?)?;
    fe.set("layout", layout_proxy(lua, context.clone())?)?;
    lua.globals().set("fe", fe.clone())?;

    for (name, is_artwork) in [("add_image", false), ("add_artwork", true)] {
        let image_context = context.clone();
        fe.set(
            name,
            lua.create_function(move |lua_ctx, args: Variadic<Value>| {
                let values: Vec<Value> = args.into_iter().collect();
                let asset = required_string(&values, name)?;
                let bounds = bounds_from(&values, 1);
                let id = image_context
                    .borrow_mut()
                    .add_image(is_artwork, &asset, bounds);
                register_element(lua_ctx, image_context.clone(), id)
            })?,
        )?;
    }

    let clone_context = context.clone();
    fe.set(
        "add_clone",
        lua.create_function(move |lua_ctx, source: Table| {
            let (id, kind) = element_handle(&source)
                .ok_or_else(|| LuaError::RuntimeError("add_clone expects an Image".to_string()))?;
            if kind != "Image" {
                return Err(LuaError::RuntimeError(format!(
                    "add_clone expects an Image, got {kind}"
                )));
            }
            let clone = clone_context
                .borrow_mut()
                .add_clone(id)
                .ok_or_else(|| LuaError::external(PresentError::StaleHandle))?;
            register_element(lua_ctx, clone_context.clone(), clone)
        })?,
    )?;

    let text_context = context.clone();
    fe.set(
        "add_text",
        lua.create_function(move |lua_ctx, args: Variadic<Value>| {
            let values: Vec<Value> = args.into_iter().collect();
            let msg = values.first().and_then(value_to_string).unwrap_or_default();
            let bounds = bounds_from(&values, 1);
            let id = text_context.borrow_mut().add_text(&msg, bounds);
            register_element(lua_ctx, text_context.clone(), id)
        })?,
    )?;

    let list_context = context.clone();
    fe.set(
        "add_listbox",
        lua.create_function(move |lua_ctx, args: Variadic<Value>| {
            let values: Vec<Value> = args.into_iter().collect();
            let bounds = bounds_from(&values, 0);
            let id = list_context.borrow_mut().add_listbox(bounds);
            register_element(lua_ctx, list_context.clone(), id)
        })?,
    )?;

    let sound_context = context.clone();
    fe.set(
        "add_sound",
        lua.create_function(move |lua_ctx, name: String| {
            let id = sound_context.borrow_mut().add_sound(&name);
            sound_proxy(lua_ctx, sound_context.clone(), id)
        })?,
    )?;

    let ticks_context = context.clone();
    fe.set(
        "add_ticks_callback",
        lua.create_function(move |_, name: String| {
            ticks_context.borrow_mut().callbacks.add_tick(name);
            Ok(())
        })?,
    )?;

    let transition_context = context.clone();
    fe.set(
        "add_transition_callback",
        lua.create_function(move |_, name: String| {
            transition_context
                .borrow_mut()
                .callbacks
                .add_transition(name);
            Ok(())
        })?,
    )?;

    let key_context = context.clone();
    fe.set(
        "is_keypressed",
        lua.create_function(move |_, code: i32| {
            let input = key_context.borrow().input.clone();
            Ok(input.is_key_pressed(code))
        })?,
    )?;

    let button_context = context.clone();
    fe.set(
        "is_joybuttonpressed",
        lua.create_function(move |_, (device, button): (u32, u32)| {
            let input = button_context.borrow().input.clone();
            Ok(input.is_joystick_button_pressed(device, button))
        })?,
    )?;

    let axis_context = context.clone();
    fe.set(
        "get_joyaxispos",
        lua.create_function(move |_, (device, axis): (u32, i32)| {
            let Some(axis) = JoyAxis::from_index(axis) else {
                return Ok(0.0f32);
            };
            let input = axis_context.borrow().input.clone();
            Ok(input.joystick_axis_position(device, axis))
        })?,
    )?;

    let nut_context = context.clone();
    fe.set(
        "do_nut",
        lua.create_function(move |lua_ctx, name: String| {
            let path = nut_context.borrow().layout().dir.join(&name);
            run_nested_script(lua_ctx, &path);
            Ok(())
        })?,
    )?;

    let info_context = context;
    fe.set(
        "game_info",
        lua.create_function(move |_, args: Variadic<Value>| {
            let values: Vec<Value> = args.into_iter().collect();
            let field = values
                .first()
                .and_then(value_to_i32)
                .and_then(InfoField::from_index);
            let offset = values.get(1).and_then(value_to_i32).unwrap_or(0);
            let Some(field) = field else {
                return Ok(String::new());
            };
            let ctx = info_context.borrow();
            Ok(ctx.settings().game_info(offset, field))
        })?,
    )?;

    Ok(())
}

/// Runs another script inside the current interpreter. Missing files and
/// script errors are logged and otherwise ignored.
fn run_nested_script(lua: &Lua, path: &Path) {
    if !path.is_file() {
        let missing = PresentError::MissingResource {
            kind: "script",
            path: path.to_path_buf(),
        };
        log::warn!("{missing}");
        return;
    }
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            log::error!("reading {}: {err}", path.display());
            return;
        }
    };
    let chunk_name = path.display().to_string();
    if let Err(err) = lua.load(&source).set_name(chunk_name).exec() {
        log::error!("{}", PresentError::from_lua(path, err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_number_folds_semver() {
        let expected: Vec<i64> = FE_VERSION
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect();
        assert_eq!(
            version_number(),
            expected[0] * 100 + expected[1] * 10 + expected[2]
        );
    }
}
