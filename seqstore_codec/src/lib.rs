pub mod io;
pub mod iters;
pub mod serde;
