//! SYS call registry: maps numeric call IDs to handlers.
//!
//! Responsibilities:
//! - Keep at most one [SysHandler] per call ID; registering again replaces the previous handler.
//! - Resolve and run handlers for the VM's dispatch loop via [HandlerRegistry::invoke].
//!
//! Mutation takes `&mut self`, so registration can never interleave with an invocation through the
//! same registry. Invocation only needs `&self` and is the hot path.
use crate::error::SysError;
use alloc::{collections::btree_map::BTreeMap, sync::Arc};
use core::fmt::{self, Debug};
use log::trace;

/// Handler signature: `(sys_id, arg0, arg1, arg2) -> result`.
///
/// Arguments are usually device coordinates (kind, role, index) or operation parameters. The result
/// is handler-defined and handed back to the VM untouched.
pub type SysHandler = Arc<dyn Fn(u16, i32, i32, i32) -> i32 + Send + Sync>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<u16, SysHandler>,
}

impl HandlerRegistry {
    pub const fn new() -> HandlerRegistry {
        HandlerRegistry {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` for `sys_id`, replacing any previous one.
    ///
    /// Return `false` without touching the registry when `handler` is [None].
    pub fn register(&mut self, sys_id: u16, handler: Option<SysHandler>) -> bool {
        let Some(handler) = handler else {
            return false;
        };
        if self.handlers.insert(sys_id, handler).is_some() {
            debug_ex!("Replaced SYS handler {:#06x}.", sys_id);
        } else {
            debug_ex!("Registered SYS handler {:#06x}.", sys_id);
        }
        true
    }

    /// Register a closure or function for `sys_id`.
    pub fn register_fn<F>(&mut self, sys_id: u16, handler: F)
    where
        F: Fn(u16, i32, i32, i32) -> i32 + Send + Sync + 'static,
    {
        self.register(sys_id, Some(Arc::new(handler)));
    }

    /// Remove the handler of `sys_id`. Unknown IDs are ignored.
    pub fn unregister(&mut self, sys_id: u16) {
        self.handlers.remove(&sys_id);
    }

    pub fn lookup(&self, sys_id: u16) -> Option<SysHandler> {
        self.handlers.get(&sys_id).cloned()
    }

    /// Run the handler of `sys_id`, or report [SysError::NoHandler].
    pub fn try_invoke(&self, sys_id: u16, arg0: i32, arg1: i32, arg2: i32) -> Result<i32, SysError> {
        let handler = self.handlers.get(&sys_id).ok_or(SysError::NoHandler)?;
        Ok(handler(sys_id, arg0, arg1, arg2))
    }

    /// Run the handler of `sys_id` and return its result verbatim; `-1` if none is installed.
    pub fn invoke(&self, sys_id: u16, arg0: i32, arg1: i32, arg2: i32) -> i32 {
        match self.try_invoke(sys_id, arg0, arg1, arg2) {
            Ok(res) => res,
            Err(err) => {
                trace!("SYS {:#06x}: {}.", sys_id, err);
                err.legacy_code()
            }
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    /// Registered IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.handlers.keys().copied()
    }
}

impl Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("ids", &self.handlers.keys())
            .finish()
    }
}
