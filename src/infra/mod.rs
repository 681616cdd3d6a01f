pub mod opencage;
pub mod openmeteo;
