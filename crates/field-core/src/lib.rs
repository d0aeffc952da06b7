pub mod assets;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod field;
pub mod glyph;
pub mod heart_pool;
pub mod messages;
pub mod placement;
pub mod scheduler;
pub mod starfield;
pub mod text_pool;
pub mod view;

pub use assets::{AssetSource, DirSource, MemorySource, Polyline};
pub use clock::FrameClock;
pub use compositor::{CosmicShaper, GlyphToken, TextShaper, TextureCompositor};
pub use config::*;
pub use controls::{ColorCycle, Parallax, ScrollDepth, Smoothed};
pub use error::{AssetError, FieldError};
pub use field::*;
pub use glyph::{GlyphCompleter, GlyphOutline, GlyphOutlineStore, GlyphReady, GlyphStatus};
pub use heart_pool::*;
pub use messages::MessageList;
pub use placement::{DepthBands, Placement, SeparationIndex};
pub use scheduler::{FrameScheduler, FrameWork, SpawnBand};
pub use starfield::Starfield;
pub use text_pool::*;
pub use view::*;
