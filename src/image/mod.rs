//! Pixel containers and image I/O.
//!
//! - [`ImageRgba`]: borrowed RGBA view, the raw input handed over by a capture
//!   or import layer.
//! - [`ImageU8`]: borrowed 8-bit gray view.
//! - [`ImageF32`]: owned float plane used for intermediate Canny buffers.
//! - [`io`]: file helpers built on the `image` crate and `serde_json`.
pub mod f32;
pub mod io;
pub mod rgba;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::rgba::ImageRgba;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;
