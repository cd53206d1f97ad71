//! Text Annotation
//!
//! This module turns raw user-authored text into safe markup fragments:
//!
//! - [`annotate`] - linkify URLs and resolve @mention tokens
//! - [`extract_mentions`] - resolve the persons a text mentions
//! - [`MarkupFragment`] - typed output (literal text vs trusted markup)
//! - [`PersonLookup`] / [`PersonRef`] - the injected name-resolution seam
//!
//! The annotator is a pure synchronous function with no store access; the
//! service layer supplies a `PersonLookup` built from the people table.

mod annotate;
mod fragment;

pub use annotate::{annotate, extract_mentions, PersonLookup, PersonRef};
pub use fragment::{MarkupFragment, Segment};
