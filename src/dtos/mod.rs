pub mod reimbursement;
pub mod vehicle;
