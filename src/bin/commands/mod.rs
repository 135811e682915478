pub mod memo;
pub mod status;
