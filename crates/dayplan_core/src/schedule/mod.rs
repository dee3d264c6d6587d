//! Pure scheduling core: date helpers, recurrence expansion and the
//! day-scoped view.
//!
//! # Responsibility
//! - Turn the current template set into dated occurrences.
//! - Select and order one day's occurrences for presentation.
//!
//! # Invariants
//! - No function here reads or writes storage; templates are passed in.
//! - Results are recomputed on every call; nothing is cached.

pub mod dates;
pub mod day_view;
pub mod recurrence;
