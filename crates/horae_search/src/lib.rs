//! Temporal event search over ephemeris-derived signals.
//!
//! This crate provides:
//! - A coarse-scan + bisection kernel for wrapped angular error functions
//! - Return search (solar returns and returns of any body)
//! - Retrograde interval finding and per-instant retrograde status
//! - Aspect engine, synastry cross-aspects and essential dignities
//! - Secondary progressions, solar arc directions and composite charts
//! - Lunar phase classification and New/Full Moon search
//! - Void-of-course Moon detection
//! - Electional scoring of candidate instants
//! - Eclipse event search with guard-capped partial results
//!
//! Every search takes a `&dyn EphemerisProvider` and plain value inputs, and
//! returns plain serialisable values.

pub mod aspect_types;
pub mod aspects;
pub mod bounded;
pub mod composite;
pub mod composite_types;
pub mod dignity;
pub mod eclipse;
pub mod eclipse_types;
pub mod electional;
pub mod electional_types;
pub mod error;
pub mod lunar_phase;
pub mod lunar_phase_types;
pub mod progressions;
pub mod progressions_types;
pub mod retrograde;
pub mod retrograde_types;
pub mod returns;
pub mod returns_types;
pub mod scan;
pub mod void_of_course;
pub mod void_of_course_types;

pub use aspect_types::{
    AspectKind, AspectMatch, AspectTone, BodyPosition, EnergySample, OrbTable,
};
pub use aspects::{
    aspect_matrix, aspect_tone, cross_aspects, find_aspect, moon_aspects, positions_at,
    transit_energy_series,
};
pub use bounded::Bounded;
pub use composite::{composite_chart, davison_chart, midpoint_composite, midpoint_longitude};
pub use composite_types::{CompositeChart, CompositeMethod, ElementBalance};
pub use dignity::{DignityKind, EssentialDignity, domiciles, essential_dignity, exaltation};
pub use eclipse::{classify_lunar, classify_solar, search_eclipses};
pub use eclipse_types::{EclipseEvent, EclipseSearchConfig, EclipseType, MAX_EVENTS_RANGE};
pub use electional::{score_instant, search_electional};
pub use electional_types::{ElectionalConfig, ElectionalScore, ElectionalWeights};
pub use error::SearchError;
pub use lunar_phase::{
    DEFAULT_LUNATION_HALF_WINDOW_DAYS, elongation, lunar_phase_at, lunar_phase_calendar,
    nearest_lunation, next_lunation,
};
pub use lunar_phase_types::{
    LUNATION_WINDOW_DAYS, LunarOctant, LunarPhase, LunarPhaseInfo, LunationEvent, LunationKind,
};
pub use progressions::{
    progressed_jd, progressed_moon_cycle, progressed_to_natal_aspects, progression_highlights,
    secondary_progressions, solar_arc_directions,
};
pub use progressions_types::{
    DirectedPosition, MAX_PROGRESSED_AGE_SPAN, ProgressedAspect, ProgressedChart,
    ProgressedMoonCycle, ProgressedMoonPhase, ProgressedPhaseChange, ProgressionConfig,
    ProgressionHighlight, SolarArcChart,
};
pub use retrograde::{find_retrograde_intervals, find_retrogrades_for, retrograde_status};
pub use retrograde_types::{
    RETROGRADE_BODIES, RetrogradeConfig, RetrogradeInterval, RetrogradeStatus,
};
pub use returns::{body_return, default_half_window_years, find_return, solar_return};
pub use returns_types::{ReturnConfig, ReturnEvent, SEARCH_YEARS_RANGE};
pub use scan::{Bracket, Continuity, ScanGrid, find_roots, refine, scan_brackets};
pub use void_of_course::void_of_course;
pub use void_of_course_types::{DEFAULT_VOC_BODIES, VocConfig, VoidOfCourseWindow};
