pub mod dxt1;

pub use dxt1::{Dxt1Block, decode_tile};
