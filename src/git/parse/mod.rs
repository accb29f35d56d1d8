pub(crate) mod cursor;
pub mod status;
