pub mod malfunction;
pub mod reimbursement;
pub mod reservation;
pub mod user;
pub mod vehicle;
