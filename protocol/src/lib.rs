#![no_std]

extern crate alloc;

pub use definition::*;
pub use error::*;
pub use text::*;

mod definition;
mod error;
mod text;
