//! Per-frame rendering of a pose onto a [`crate::surface::Surface`].

pub mod config;
pub mod frame;
