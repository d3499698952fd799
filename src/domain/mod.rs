pub mod budget;
pub mod transaction;
pub mod window;

pub use budget::{BudgetLimit, PeriodKind};
pub use transaction::{Direction, Transaction};
pub use window::DateWindow;
