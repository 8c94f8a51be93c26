pub mod address;
pub mod audius;
pub mod track;
