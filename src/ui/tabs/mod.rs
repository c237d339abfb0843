pub mod account;
pub mod gists;
pub mod inbox;
pub mod issues;
pub mod repos;
pub mod workflows;
