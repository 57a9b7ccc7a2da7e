pub mod board;
pub mod card;
pub mod drag;
pub mod store;

pub use board::{BoardConfig, BoardTitle};
pub use card::{Card, CardId};
pub use drag::{ContainerKey, DragLocation, DragResult, DraggedKind, BOARD_ORDER_KEY};
pub use store::Store;
