//! The fixed 24-tile course.
//!
//! Static pricing and layout only; per-game ownership and improvement
//! state lives on the `Game` aggregate. The board is built once per
//! process and shared read-only across every game.

pub mod group;
pub mod improvement;
pub mod tile;
pub mod layout;

pub use group::CourseGroup;
pub use improvement::ImprovementLevel;
pub use layout::{Board, BOARD_SIZE, HQ_POSITION, SAND_TRAP_POSITION};
pub use tile::{PropertyDef, Tile, TileKind};
