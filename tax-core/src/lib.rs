pub mod calculations;
pub mod models;

pub use calculations::{CalculationError, Epoch, TaxEngine};
pub use models::*;
