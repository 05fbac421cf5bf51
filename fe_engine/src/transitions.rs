//! Script callback registries and the blocking transition protocol.

use serde::Serialize;

use crate::context::SharedContext;
use crate::script_host::ScriptHost;
use crate::surface::SurfaceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    StartLayout,
    EndLayout,
    ToNewSelection,
    ToGame,
    FromGame,
}

impl TransitionType {
    pub const ALL: [TransitionType; 5] = [
        TransitionType::StartLayout,
        TransitionType::EndLayout,
        TransitionType::ToNewSelection,
        TransitionType::ToGame,
        TransitionType::FromGame,
    ];

    /// Value scripts see in the `Transition` table.
    pub fn index(self) -> i32 {
        match self {
            TransitionType::StartLayout => 0,
            TransitionType::EndLayout => 1,
            TransitionType::ToNewSelection => 2,
            TransitionType::ToGame => 3,
            TransitionType::FromGame => 4,
        }
    }

    pub fn script_name(self) -> &'static str {
        match self {
            TransitionType::StartLayout => "StartLayout",
            TransitionType::EndLayout => "EndLayout",
            TransitionType::ToNewSelection => "ToNewSelection",
            TransitionType::ToGame => "ToGame",
            TransitionType::FromGame => "FromGame",
        }
    }

    pub fn event_name(self) -> &'static str {
        match self {
            TransitionType::StartLayout => "start_layout",
            TransitionType::EndLayout => "end_layout",
            TransitionType::ToNewSelection => "to_new_selection",
            TransitionType::ToGame => "to_game",
            TransitionType::FromGame => "from_game",
        }
    }
}

/// Callback names registered by scripts. Names are looked up in the
/// interpreter's globals at call time; a missing function is skipped.
#[derive(Debug, Clone, Default)]
pub struct CallbackRegistry {
    ticks: Vec<String>,
    transitions: Vec<String>,
}

impl CallbackRegistry {
    pub fn add_tick(&mut self, name: impl Into<String>) {
        self.ticks.push(name.into());
    }

    pub fn add_transition(&mut self, name: impl Into<String>) {
        self.transitions.push(name.into());
    }

    pub fn ticks(&self) -> &[String] {
        &self.ticks
    }

    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.transitions.clear();
    }
}

/// Runs every tick callback with the time since the layout started.
/// Returns true when a callback ran or the scene changed since the last
/// call, and consumes the pending redraw request.
pub fn run_tick_callbacks(host: &ScriptHost, context: &SharedContext) -> bool {
    let (names, elapsed) = {
        let ctx = context.borrow();
        (ctx.callbacks.ticks().to_vec(), ctx.layout_elapsed())
    };
    let elapsed_ms = elapsed.as_millis() as i64;
    let mut invoked = false;
    for name in &names {
        match host.call_tick(name, elapsed_ms) {
            Ok(true) => invoked = true,
            Ok(false) => {}
            Err(err) => log::error!("tick callback {name}: {err}"),
        }
    }
    let pending = std::mem::take(&mut context.borrow_mut().redraw_requested);
    invoked || pending
}

/// Evaluates each transition callback until it reports it is done.
///
/// While a callback returns true and a surface is available the scene is
/// redrawn and presented before the callback is evaluated again. Without a
/// surface each callback is evaluated once. A callback that never returns
/// false blocks here forever unless `frame_limit` is set, in which case it is
/// abandoned after that many presented frames.
///
/// Returns true when a callback changed the scene. The request also stays
/// pending for the next [`run_tick_callbacks`].
pub fn run_transition(
    host: &ScriptHost,
    context: &SharedContext,
    kind: TransitionType,
    variant: i32,
    mut surface: SurfaceRef<'_>,
    frame_limit: Option<u32>,
) -> bool {
    let (names, start, pending) = {
        let mut ctx = context.borrow_mut();
        ctx.log_event(format!("transition.{} {variant}", kind.event_name()));
        let pending = std::mem::take(&mut ctx.redraw_requested);
        (ctx.callbacks.transitions().to_vec(), ctx.now(), pending)
    };

    for name in &names {
        let mut presented = 0u32;
        loop {
            let elapsed = context.borrow().now().saturating_sub(start);
            let animating =
                match host.evaluate_transition(name, kind, variant, elapsed.as_millis() as i64) {
                    Ok(Some(animating)) => animating,
                    Ok(None) => false,
                    Err(err) => {
                        log::error!("transition callback {name}: {err}");
                        false
                    }
                };
            if !animating {
                break;
            }
            let Some(target) = surface.as_deref_mut() else {
                break;
            };
            if frame_limit.is_some_and(|limit| presented >= limit) {
                log::warn!(
                    "transition callback {name} still animating after {presented} frames; abandoning it"
                );
                context
                    .borrow_mut()
                    .log_event(format!("transition.abandoned {name}"));
                break;
            }
            let frame = context.borrow().frame();
            target.clear();
            target.draw(&frame);
            target.display();
            presented += 1;
        }
    }

    let mut ctx = context.borrow_mut();
    let changed = ctx.redraw_requested;
    ctx.redraw_requested = changed || pending;
    changed
}
