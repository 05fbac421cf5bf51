//! Interpreter lifecycle for layout scripts.
//!
//! A fresh interpreter is opened for every layout load and the capability
//! surface is installed into it before any script runs. Callback names are
//! resolved against the interpreter globals at call time.

mod bindings;
mod objects;
mod values;

use std::fs;
use std::path::Path;

use mlua::{Function, Lua, LuaOptions, StdLib, Value};

use crate::context::SharedContext;
use crate::error::{PresentError, PresentResult};
use crate::transitions::TransitionType;

#[derive(Default)]
pub struct ScriptHost {
    lua: Option<Lua>,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.lua.is_some()
    }

    /// Replaces any running interpreter with a fresh one bound to `context`.
    pub fn open(&mut self, context: &SharedContext) -> PresentResult<()> {
        self.close();
        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())?;
        bindings::install(&lua, context.clone())?;
        self.lua = Some(lua);
        Ok(())
    }

    pub fn close(&mut self) {
        self.lua = None;
    }

    /// Compiles and runs one script file in the open interpreter.
    pub fn run_file(&self, path: &Path) -> PresentResult<()> {
        let Some(lua) = self.lua.as_ref() else {
            return Ok(());
        };
        if !path.is_file() {
            return Err(PresentError::MissingResource {
                kind: "script",
                path: path.to_path_buf(),
            });
        }
        let source = fs::read_to_string(path).map_err(|err| PresentError::ScriptRuntime {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        lua.load(&source)
            .set_name(path.display().to_string())
            .exec()
            .map_err(|err| PresentError::from_lua(path, err))
    }

    /// Opens a fresh interpreter and runs the global script followed by the
    /// layout script. Failures in either are logged; neither stops the other.
    pub fn run_layout(&mut self, context: &SharedContext, global: &Path, layout: &Path) {
        if let Err(err) = self.open(context) {
            log::error!("opening script interpreter: {err}");
            return;
        }
        for (path, required) in [(global, false), (layout, true)] {
            match self.run_file(path) {
                Ok(()) => context
                    .borrow_mut()
                    .log_event(format!("script.run {}", path.display())),
                Err(err @ PresentError::MissingResource { .. }) => {
                    if required {
                        log::warn!("{err}");
                    } else {
                        log::debug!("{err}");
                    }
                }
                Err(err) => {
                    log::error!("{err}");
                    context
                        .borrow_mut()
                        .log_event(format!("script.error {}", path.display()));
                }
            }
        }
    }

    fn global_function<'lua>(lua: &'lua Lua, name: &str) -> PresentResult<Option<Function<'lua>>> {
        match lua.globals().get::<_, Value>(name)? {
            Value::Function(function) => Ok(Some(function)),
            _ => Ok(None),
        }
    }

    /// Calls a registered tick callback. Returns false when no function of
    /// that name exists.
    pub fn call_tick(&self, name: &str, elapsed_ms: i64) -> PresentResult<bool> {
        let Some(lua) = self.lua.as_ref() else {
            return Ok(false);
        };
        let Some(function) = Self::global_function(lua, name)? else {
            return Ok(false);
        };
        function
            .call::<_, ()>(elapsed_ms)
            .map_err(|err| PresentError::from_lua(Path::new(name), err))?;
        Ok(true)
    }

    /// Evaluates a transition callback once. `Some(true)` means the callback
    /// is still animating; `None` means no function of that name exists.
    pub fn evaluate_transition(
        &self,
        name: &str,
        kind: TransitionType,
        variant: i32,
        elapsed_ms: i64,
    ) -> PresentResult<Option<bool>> {
        let Some(lua) = self.lua.as_ref() else {
            return Ok(None);
        };
        let Some(function) = Self::global_function(lua, name)? else {
            return Ok(None);
        };
        let result: Value = function
            .call((kind.index(), variant, elapsed_ms))
            .map_err(|err| PresentError::from_lua(Path::new(name), err))?;
        Ok(Some(values::value_to_bool(&result)))
    }
}
