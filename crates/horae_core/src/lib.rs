//! Ephemeris access layer for the horae event-search engine.
//!
//! This crate provides:
//! - [`Body`], [`ZodiacSign`] and [`AngularPosition`] value types
//! - Angle arithmetic on the wrapped 0–360° domain
//! - The [`EphemerisProvider`] trait every search consumes
//! - [`TabulatedEphemeris`] (JSON table export) and [`SyntheticEphemeris`]
//!   (closed-form motions) providers
//!
//! The engine never computes planetary theory itself: it consumes longitudes
//! and speeds from a provider.

pub mod angle;
pub mod body;
pub mod eclipse;
pub mod error;
pub mod position;
pub mod provider;
pub mod synthetic;
pub mod tabulated;
pub mod zodiac;

pub use angle::{angular_separation, normalize_360, shortest_signed_angle};
pub use body::Body;
pub use eclipse::{EclipseHit, EclipseKind, EclipseRequest, flags as eclipse_flags};
pub use error::EphemerisError;
pub use position::AngularPosition;
pub use provider::{EphemerisProvider, ProviderConfig};
pub use synthetic::{BodyMotion, SpeedSegment, SyntheticEphemeris};
pub use tabulated::TabulatedEphemeris;
pub use zodiac::{Element, ZodiacSign};
