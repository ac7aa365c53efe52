pub mod glyphs;
pub mod layout;
pub mod raster;
pub mod signature;

use serde::Serialize;

use crate::error::ScoringError;
use crate::model::{End, ScoringSystem};
use crate::raster::{encode_png, flatten_onto_white};
pub use layout::{ARROWS_PER_ROW, ScoresheetLayout, ScoresheetRow, ScoresheetTotals};
pub use signature::{SignatureRole, Signatures};

/// PNG bytes ready for upload. `signed` is only present when both signatures were supplied.
#[derive(Debug, Clone, Serialize)]
pub struct ScoresheetImages {
    pub unsigned: Vec<u8>,
    pub signed: Option<Vec<u8>>,
}

impl ScoresheetImages {
    /// The image that goes on record: signed when available.
    #[must_use]
    pub fn primary(&self) -> &[u8] {
        self.signed.as_deref().unwrap_or(&self.unsigned)
    }
}

/// Lays out and rasterizes the ends. Never touches the session they came from.
///
/// # Errors
///
/// Returns `ScoringError::Raster` if PNG encoding fails.
pub fn compose(
    round_name: &str,
    ends: &[End],
    system: ScoringSystem,
    signatures: &Signatures,
) -> Result<ScoresheetImages, ScoringError> {
    let layout = ScoresheetLayout::from_ends(round_name, ends, system);
    let sheet = flatten_onto_white(&raster::render_scoresheet(&layout, system));
    let signed = match signatures.both() {
        Some((archer, witness)) => Some(encode_png(&signature::stamp_signatures(
            &sheet, archer, witness,
        ))?),
        None => None,
    };
    Ok(ScoresheetImages {
        unsigned: encode_png(&sheet)?,
        signed,
    })
}
