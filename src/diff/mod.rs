//! Structural diff between two JSON documents.
//!
//! [`diff_documents`] walks both documents key by key and produces a [`Delta`]:
//! keys only on the right are Added, keys only on the left are Removed, keys
//! on both sides with different values are Modified. Objects recurse; arrays
//! and scalars are compared as whole values.
//!
//! [`render::render_delta`] turns a delta into indented, styled lines with
//! dotted path labels (`a.b.c`) for the terminal and for plain-text output.

pub mod delta;
pub mod render;

pub use delta::{Change, Delta, ROOT_LABEL, diff_documents};
pub use render::{DiffLine, LineStyle, NO_CHANGES, format_value, render_delta, render_plain};
