//! Core types for Dona Onça.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cep;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use cep::{Cep, CepError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
