//! Small library that renders simple scenes into BMP images.
//!
//! Scene is a text with one drawing command per line:
//! ```text
//! rectangle id="1" color="ff0000" x="0" y="0" width="2" height="2"
//! circle id="2" color="00ff00" x="5" y="5" radius="1"
//! ```
//! Main features:
//!  - Scene parsing with commands ordered by their unique identifiers
//!  - Rectangle, circle and triangle rasterization
//!  - Uncompressed 24-bit BMP encoding
//!
#![deny(warnings)]

pub mod bmp;
mod canvas;
mod color;
mod command;
mod draw;
mod error;
mod parse;
mod scene;

pub use canvas::{BGR, Canvas};
pub use color::{ColorError, RGB};
pub use command::{Circle, Command, Rectangle, Shape, Triangle};
pub use draw::{Draw, draw_command};
pub use error::Error;
pub use parse::{
    MAX_PROPERTY_NAME_LEN, Property, SceneParser, build_command, parse_line, parse_literal,
    parse_properties, tokenize,
};
pub use scene::Scene;
