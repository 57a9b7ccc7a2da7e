//! Pure state transitions over [`Store`](crate::domain::Store) snapshots.
//!
//! Every function here takes the current snapshot by reference and returns
//! the next one; none of them mutate their input.

pub mod edit;
pub mod reorder;

pub use edit::{add_board, add_card, edit_card_text, remove_board, remove_card, rename_board};
pub use reorder::{apply_drag_result, move_between, reorder_within};
