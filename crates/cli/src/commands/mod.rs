//! Command implementations.

mod info;
mod portal;
mod simulate;
mod validate;

pub use info::run_info;
pub use portal::run_portal_url;
pub use simulate::run_simulate;
pub use validate::run_validate;
