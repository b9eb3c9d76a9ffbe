/*!
 * Core Module
 * Shared types and constants
 */

pub mod limits;
pub mod types;

pub use types::{Address, Size, Word};
