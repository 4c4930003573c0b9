//! Volume factors.

mod surprise;

pub use surprise::{VolumeSurprise, VolumeSurpriseConfig};
