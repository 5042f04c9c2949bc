pub mod ordering;
pub mod search;
pub mod types;

pub use crate::minimax::search::MinimaxSearch;
pub use crate::minimax::types::*;
