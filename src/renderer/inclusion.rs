//! `include` and `tpl`: the self-referential template functions.
//!
//! Both functions share one [`InclusionGuard`] per root template. The guard
//! tracks how deeply every sub-template name is currently nested so that a
//! template including itself is stopped at [`RECURSION_LIMIT`] instead of
//! exhausting the stack, while bounded recursion (walking a tree) keeps
//! working.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use minijinja::value::ValueKind;
use minijinja::{context, Environment, ErrorKind, State, Value};

use crate::constants::{NO_VALUE_PLACEHOLDER, RECURSION_LIMIT};
use crate::error::Error;
use crate::renderer::definitions::register_source;

/// Live nesting depth of every sub-template name included from one root
/// template.
#[derive(Debug, Default)]
pub struct InclusionGuard {
    depths: Mutex<HashMap<String, usize>>,
}

impl InclusionGuard {
    /// Records an inclusion of `name`.
    ///
    /// Fails without touching the counter if `name` is already nested
    /// deeper than the limit. The returned token decrements the counter
    /// when dropped, so the depth is restored on success and on error.
    pub fn enter(self: &Arc<Self>, name: &str) -> Result<DepthToken, Error> {
        let mut depths = self.depths.lock().unwrap_or_else(PoisonError::into_inner);
        match depths.get_mut(name) {
            Some(depth) if *depth > RECURSION_LIMIT => {
                return Err(Error::RecursionLimitExceeded {
                    name: name.to_string(),
                    limit: RECURSION_LIMIT,
                });
            }
            Some(depth) => *depth += 1,
            None => {
                depths.insert(name.to_string(), 1);
            }
        }
        Ok(DepthToken { guard: Arc::clone(self), name: name.to_string() })
    }

    /// Current nesting depth of `name`, zero when it is not being rendered.
    pub fn depth(&self, name: &str) -> usize {
        let depths = self.depths.lock().unwrap_or_else(PoisonError::into_inner);
        depths.get(name).copied().unwrap_or_default()
    }

    fn exit(&self, name: &str) {
        let mut depths = self.depths.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(depth) = depths.get_mut(name) {
            *depth = depth.saturating_sub(1);
            if *depth == 0 {
                depths.remove(name);
            }
        }
    }
}

/// Held for the duration of one inclusion.
#[derive(Debug)]
pub struct DepthToken {
    guard: Arc<InclusionGuard>,
    name: String,
}

impl Drop for DepthToken {
    fn drop(&mut self) {
        self.guard.exit(&self.name);
    }
}

/// What `include` and `tpl` close over: the root template's name and its
/// guard.
#[derive(Debug, Clone)]
pub struct InclusionContext {
    root_name: Arc<str>,
    guard: Arc<InclusionGuard>,
}

impl InclusionContext {
    pub fn new(root_name: &str) -> Self {
        Self { root_name: Arc::from(root_name), guard: Arc::default() }
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn guard(&self) -> &Arc<InclusionGuard> {
        &self.guard
    }
}

/// Registers `include` and `tpl` on `env`.
///
/// Runs once when a root template is created and again on every
/// environment cloned by `tpl`, always with the same context, so nested
/// `tpl` calls share the recursion counter of their root.
pub fn wire_inclusion_functions(env: &mut Environment<'_>, ctx: &InclusionContext) {
    let include_ctx = ctx.clone();
    env.add_function(
        "include",
        move |state: &State, name: &str, data: Option<Value>| include(&include_ctx, state, name, data),
    );

    let tpl_ctx = ctx.clone();
    env.add_function(
        "tpl",
        move |state: &State, source: &str, data: Option<Value>| tpl(&tpl_ctx, state, source, data),
    );
}

/// Renders the sub-template `name` against `data` and returns the output.
///
/// The template is looked up in the environment that is currently
/// rendering, which makes definitions introduced by an enclosing `tpl` call
/// visible.
fn include(
    ctx: &InclusionContext,
    state: &State,
    name: &str,
    data: Option<Value>,
) -> Result<String, minijinja::Error> {
    let _depth = ctx.guard.enter(name).map_err(|err| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "unable to execute template")
            .with_source(err)
    })?;
    log::trace!("Including '{name}' (depth {})", ctx.guard.depth(name));

    let template = state.env().get_template(name)?;
    template.render(render_context(data))
}

/// Parses `source` as an ad hoc template on a clone of the current
/// environment and renders it against `data`.
///
/// The clone carries every sub-template and function of its parent;
/// definitions made by `source` stay on the clone. Placeholders of
/// unresolved values are removed from the output.
fn tpl(
    ctx: &InclusionContext,
    state: &State,
    source: &str,
    data: Option<Value>,
) -> Result<String, minijinja::Error> {
    let mut env = state.env().clone();
    wire_inclusion_functions(&mut env, ctx);

    register_source(&mut env, ctx.root_name(), source).map_err(|err| {
        minijinja::Error::new(ErrorKind::SyntaxError, format!("cannot parse template {source:?}"))
            .with_source(err)
    })?;

    let rendered = env
        .get_template(ctx.root_name())
        .and_then(|template| template.render(render_context(data)))
        .map_err(|err| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("error during tpl function execution for {source:?}"),
            )
            .with_source(err)
        })?;

    Ok(rendered.replace(NO_VALUE_PLACEHOLDER, ""))
}

/// The context a sub-template is rendered against. Mappings are used as
/// is; any other value (list, scalar) is reachable as `this`.
fn render_context(data: Option<Value>) -> Value {
    match data {
        None => context! {},
        Some(data) if data.kind() == ValueKind::Map => data,
        Some(data) => context! { this => data },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_mapping_data_is_exposed_as_this() {
        let list = render_context(Some(Value::from(vec!["curl", "git"])));
        assert_eq!(list.get_attr("this").unwrap().len(), Some(2));

        let map = render_context(Some(context! { a => 1 }));
        assert!(map.get_attr("this").unwrap().is_undefined());
        assert_eq!(map.get_attr("a").unwrap(), Value::from(1));
    }

    #[test]
    fn depth_is_restored_when_tokens_drop() {
        let guard = Arc::new(InclusionGuard::default());
        {
            let _outer = guard.enter("node").unwrap();
            let _inner = guard.enter("node").unwrap();
            assert_eq!(guard.depth("node"), 2);
        }
        assert_eq!(guard.depth("node"), 0);
    }

    #[test]
    fn names_are_counted_separately() {
        let guard = Arc::new(InclusionGuard::default());
        let _a = guard.enter("a").unwrap();
        let _b = guard.enter("b").unwrap();
        assert_eq!(guard.depth("a"), 1);
        assert_eq!(guard.depth("b"), 1);
    }

    #[test]
    fn entering_past_the_limit_fails_without_counting() {
        let guard = Arc::new(InclusionGuard::default());
        let tokens: Vec<_> =
            (0..=RECURSION_LIMIT).map(|_| guard.enter("loop").unwrap()).collect();
        assert_eq!(guard.depth("loop"), RECURSION_LIMIT + 1);

        let err = guard.enter("loop").unwrap_err();
        assert!(matches!(err, Error::RecursionLimitExceeded { ref name, .. } if name == "loop"));
        assert_eq!(guard.depth("loop"), RECURSION_LIMIT + 1);

        drop(tokens);
        assert_eq!(guard.depth("loop"), 0);
        assert!(guard.enter("loop").is_ok());
    }
}
