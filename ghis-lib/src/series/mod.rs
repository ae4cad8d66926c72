//! Running-count reconstruction
//!
//! Issue rows are reduced to deduplicated lifetimes, turned into signed unit
//! events, and summed into one cumulative series per category. Categories are
//! stacked on a shared time axis by padding every series with zero-weight
//! anchors at the timestamps of the others.

mod builder;
mod count_series;
mod events;
mod filters;
mod predicate;

pub use builder::{SeriesBuilder, SeriesSet};
pub use count_series::{CountPoint, CountSeries};
pub use events::{EventExtractor, EventOptions, UnitEvent, unit_events};
pub use filters::CrossFilters;
pub use predicate::{Predicate, Selector};
