//! Face detection, recognition and verification backed by Amazon Rekognition.
//!
//! The remote service does the vision work; this crate builds the requests,
//! decodes the responses and applies a single trust threshold to decide
//! whether a face, match or identity is accepted.
//!
//! ```no_run
//! use facegate::{Config, FaceTech, ImageFile};
//! use std::path::Path;
//!
//! let config = Config::load()?;
//! let tech = FaceTech::from_config(&config)?;
//! let user = tech
//!     .recognition()
//!     .find_user_using_image(&ImageFile::open(Path::new("visitor.jpg"))?)?;
//! println!("{user}");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod errors;
pub mod file;
pub mod logging;
pub mod policy;
pub mod rekognition;
pub mod services;
pub mod subject;

pub use config::Config;
pub use errors::FaceError;
pub use file::ImageFile;
pub use policy::FacePolicy;
pub use services::{
    EnrollOutcome, EnrolledFace, FaceDetectionService, FaceRecognitionService, FaceTech,
    FaceVerificationService,
};
pub use subject::{Subject, SubjectId};
