pub mod expense;
pub mod notice;

pub use expense::{CreateExpenseResponse, ExpenseDraft, ParticipantShare, QueuedExpense};
pub use notice::Notice;
