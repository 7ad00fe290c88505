pub mod auth;
pub mod reimbursement;
pub mod reservation;
pub mod vehicle;
