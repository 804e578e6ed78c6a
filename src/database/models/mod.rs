pub mod creation;

pub use creation::{Creation, CreationRow, NewCreation};
