//! FAQ matching core: text normalization, fuzzy question matching, and
//! answer rendering over a static, load-once corpus.

pub mod corpus;
pub mod matcher;
pub mod normalize;
pub mod render;

pub use corpus::load_corpus;
pub use matcher::{FaqMatch, FaqMatcher};
pub use normalize::Normalizer;
pub use render::{render, RenderedAnswer};
