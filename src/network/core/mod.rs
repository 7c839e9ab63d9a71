//! network::core — parameter encoding and its validation surface.
//!
//! Purpose
//! -------
//! Hold the building blocks that turn a flattened optimizer vector into
//! structured model parameters: the layout descriptor, the zero-copy
//! segment split, the fixed interaction mask, and the scratch-matrix decode
//! codec, together with the shared construction-time validators.
//!
//! Downstream usage
//! ----------------
//! - Evaluators construct a [`params::SolutionLayout`] once from the mask
//!   and check every incoming candidate against it.
//! - Each evaluation decodes the candidate's strength segment into a
//!   private scratch matrix via [`interaction::decode_interactions`]; the
//!   mask itself is shared read-only across calls and workers.

pub mod interaction;
pub mod params;
pub mod validation;

pub use self::interaction::{decode_interactions, InteractionMask};
pub use self::params::{SolutionLayout, SolutionSegments};
