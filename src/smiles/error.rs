use crate::model::types::Element;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("SMILES string is empty")]
    Empty,

    #[error("failed to parse SMILES: {details} (at position {position})")]
    Parse { position: usize, details: String },

    #[error("unsupported SMILES feature '{feature}' (at position {position})")]
    Unsupported { position: usize, feature: String },

    #[error("aromatic system containing atom {atom} cannot be kekulized")]
    Kekulization { atom: usize },

    #[error("more than {limit} ring closures are open at once")]
    RingClosures { limit: usize },

    #[error("atom {atom} ({element}) has valence {valence}, more than permitted")]
    Valence {
        atom: usize,
        element: Element,
        valence: u8,
    },
}

impl Error {
    pub fn parse(position: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            position,
            details: details.into(),
        }
    }

    pub fn unsupported(position: usize, feature: impl Into<String>) -> Self {
        Self::Unsupported {
            position,
            feature: feature.into(),
        }
    }
}
