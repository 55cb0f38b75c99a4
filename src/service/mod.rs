// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the two flows configuration components.
//!
//! [`ChangeFilter`] decides which change events should trigger a reconcile, and
//! [`ConfigLoader`] produces the typed configuration the reconcile then applies.
//! Both are stateless and independent; a host composes them.

pub mod change_filter;
pub mod loader;

// Re-export commonly used types
pub use change_filter::{watch_for_record, ChangeFilter};
pub use loader::ConfigLoader;
