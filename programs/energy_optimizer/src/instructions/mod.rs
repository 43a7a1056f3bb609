pub mod admin;
pub mod analysis;
pub mod lifecycle;
pub mod oracle;
pub mod participants;
pub mod refund;
