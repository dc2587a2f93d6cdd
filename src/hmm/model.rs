use std::io::Write;

use crate::errors::Result;
use crate::quark::Quark;

use super::tagger::{Space, Tagger};

pub trait Model {
    /// Tag alphabet, boundary tags included.
    fn tags(&self) -> &Quark;
    /// Word alphabet, out-of-vocabulary sentinel included.
    fn words(&self) -> &Quark;
    /// Creates a decoder reading from this model.
    fn tagger(&self, space: Space) -> impl Tagger + '_;
    /// Writes a human readable JSON rendering of the model.
    fn dump<W: Write>(&self, w: W) -> Result<()>;
}
