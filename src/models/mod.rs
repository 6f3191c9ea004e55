pub mod timings;

pub use timings::{Coordinates, CoordinatesError, TimingsRecord, TuneOffsets, DEFAULT_METHOD};
