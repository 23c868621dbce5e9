pub mod dashboard;
pub mod loans;
