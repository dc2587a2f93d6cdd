mod context;
pub mod model;
pub mod tagger;

pub use model::BigramModel;
pub use tagger::BigramTagger;
