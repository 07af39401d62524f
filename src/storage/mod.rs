//! Local media storage module

mod media;

pub use media::MediaStorage;
