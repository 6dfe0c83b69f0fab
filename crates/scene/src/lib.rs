// Scene state for the visualizer: the matrices and vectors being edited,
// plus presets, stats, and resets. No rendering, no IO.

pub mod presets;
pub mod scene;

pub use presets::{Preset2, Preset3, PRESETS_2D, PRESETS_3D};
pub use scene::{initial_vectors_2d, initial_vectors_3d, parse_entry, Axis, MatrixStats, Scene};
