// Grid primitives shared by the client crates

pub mod cell;
pub mod grid;
pub mod notify;
pub mod range;

pub use cell::{col_label, parse_cell, CellRef};
pub use grid::GridData;
pub use notify::{Notification, NotificationFeed, NotificationKind};
pub use range::{parse_range, CellRange, RangeError};
