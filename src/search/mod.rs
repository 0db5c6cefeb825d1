//! Triplet search.
//!
//! Modules
//! - [`cuts`] – scalar cut helpers (momentum, impact, vertex window).
//! - [`links`] – central/partner links in the central point's frame.
//! - [`triplet`] – the per-cell search producing ranked seeds (`CellSearch`).

pub mod cuts;
pub mod links;
pub mod triplet;

pub use cuts::VertexWindow;
pub use links::{Link, LinkBuilder, Side};
pub use triplet::{CellSearch, TripletScratch, MAX_CANDIDATES_PER_BOTTOM};
