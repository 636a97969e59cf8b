//! Stock widgets: buttons, table cells, paged tables and modal alerts.

mod alert;
mod button;
mod cell;
mod table;

pub use alert::Alert;
pub use button::Button;
pub use cell::Cell;
pub use table::Table;
