#![allow(dead_code)]
pub mod instructions;

pub use accounts::*;
pub use fixture::*;
pub use helpers::*;
pub use instructions::*;
