//! Catfish Fry Counter
//!
//! Counts catfish fry (bibit lele) in a photograph of a tank by segmenting
//! dark blobs and matching each one against a bank of reference silhouettes
//! tried at every 10° rotation.
//!
//! ## Pipeline
//!
//! 1. **Template bank** (`imaging::loader`): reference images are reduced to
//!    luminance and area-resampled to a canonical 64×128 raster.
//! 2. **Mask** (`imaging::preprocess`): contrast stretch (`1.8·v + 10`),
//!    BT.601 grayscale, inverted Otsu threshold and a 3×3 opening applied
//!    twice.
//! 3. **Candidates** (`imaging::contour`): every traced border whose polygon
//!    area lies strictly between 6000 and 50000 pixels.
//! 4. **Matching** (`imaging::matcher`): each candidate's mask crop is
//!    canonicalised and compared with every pre-rotated template by XOR
//!    agreement. The first template/angle pair above the threshold wins and
//!    the candidate is counted and labelled.
//!
//! ```no_run
//! use lele_counter::{load_templates, Detector, DetectorConfig};
//!
//! # fn main() -> lele_counter::Result<()> {
//! let bank = load_templates("edited/")?;
//! let detector = Detector::new(&bank, DetectorConfig::default())?;
//! let photo = image::open("tank.jpg")?.to_rgb8();
//! let result = detector.detect(&photo)?;
//! println!("{} fry", result.count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod history;
pub mod imaging;

pub use config::{DecodeFailurePolicy, DetectorConfig, LoadOptions, TEMPLATE_HEIGHT, TEMPLATE_WIDTH};
pub use detector::{detect, DetectionResult, Detector, MatchedRegion};
pub use error::{FryCountError, Result};
pub use history::{HistoryEntry, HistoryLog};
pub use imaging::loader::{load_templates, load_templates_with, Template, TemplateBank};
pub use imaging::matcher::TemplateMatch;
