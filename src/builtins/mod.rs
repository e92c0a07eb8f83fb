//! Built-in types - boolean, integer, list and string objects
//!
//! Design: Each type is a focused module of free functions over a
//! [`Heap`], registering its payload through the single `Heap::create`
//! entry point via a static [`TypeInfo`](crate::heap::TypeInfo).

pub mod boolean;
pub mod int;
pub mod list;
pub mod string;

#[cfg(test)]
mod tests;

use crate::heap::Heap;
use crate::logging::{debug, info};

/// Initialize builtins on a fresh heap
///
/// Creates the TRUE/FALSE singletons. Call exactly once per heap.
pub fn init(heap: &mut Heap) {
    info!("Builtins initializing");
    boolean::init(heap);
    debug!("Builtins initialized (bool, int, list, string)");
}

/// Tear down builtin singletons
pub fn cleanup(heap: &mut Heap) {
    debug!("Cleaning up builtins");
    boolean::finalize(heap);
}
