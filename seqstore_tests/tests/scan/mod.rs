pub mod fixture;
pub mod full_scan;
pub mod masked_scan;
pub mod truncated;
