//! UI module root: exposes drawing functions for individual panels.

pub mod cpu;
pub mod header;
pub mod health;
pub mod mem;
pub mod net;
pub mod services;
pub mod util;
