//! Return search: when does a body come back to a given longitude?
//!
//! Coarse scan of `f(t) = shortest_signed_angle(lon(t), target)` across a
//! window centred on a guess, then bisection of the bracket nearest the
//! guess. Used for solar returns, lunar/Saturn/Chiron returns and any other
//! "body reaches longitude X" question.

use horae_core::{Body, EphemerisProvider, normalize_360, shortest_signed_angle};
use horae_time::{JULIAN_YEAR_DAYS, UtcTime};
use tracing::{debug, instrument};

use crate::error::SearchError;
use crate::returns_types::{ReturnConfig, ReturnEvent, SEARCH_YEARS_RANGE};
use crate::scan::{Continuity, ScanGrid, refine, scan_brackets};

/// Find the instant nearest `jd_guess` at which `body` sits at
/// `target_lon_deg`.
///
/// If the guess already has zero error it is returned without scanning.
/// Fails with [`SearchError::ReturnNotFound`] when the window contains no
/// crossing; the window is never widened automatically.
#[instrument(skip_all, fields(body = %body, target = target_lon_deg, jd_guess = jd_guess))]
pub fn find_return(
    provider: &dyn EphemerisProvider,
    body: Body,
    target_lon_deg: f64,
    jd_guess: f64,
    config: &ReturnConfig,
) -> Result<ReturnEvent, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !target_lon_deg.is_finite() {
        return Err(SearchError::InvalidConfig("target longitude must be finite"));
    }
    if !jd_guess.is_finite() {
        return Err(SearchError::InvalidRange("guess must be finite"));
    }

    let target = normalize_360(target_lon_deg);
    let error_at = |t: f64| -> Result<f64, SearchError> {
        Ok(shortest_signed_angle(provider.longitude(t, body)?, target))
    };

    if error_at(jd_guess)? == 0.0 {
        return event_at(provider, body, target, jd_guess);
    }

    let half = 0.5 * config.window_days;
    let grid = ScanGrid::new(jd_guess - half, jd_guess + half, config.step_days);
    let brackets = scan_brackets(&error_at, &grid, Continuity::Angular, None)?;

    let nearest = brackets.iter().min_by(|a, b| {
        let da = (a.midpoint() - jd_guess).abs();
        let db = (b.midpoint() - jd_guess).abs();
        da.total_cmp(&db)
    });
    let Some(bracket) = nearest else {
        return Err(SearchError::ReturnNotFound {
            body,
            target_deg: target,
            window_days: config.window_days,
        });
    };

    debug!(
        candidates = brackets.len(),
        t_a = bracket.t_a,
        t_b = bracket.t_b,
        "refining nearest bracket"
    );
    let jd = refine(&error_at, bracket, config.bisection_iterations)?;
    event_at(provider, body, target, jd)
}

fn event_at(
    provider: &dyn EphemerisProvider,
    body: Body,
    target: f64,
    jd: f64,
) -> Result<ReturnEvent, SearchError> {
    let lon = provider.longitude(jd, body)?;
    Ok(ReturnEvent {
        jd,
        body,
        target_longitude_deg: target,
        longitude_deg: lon,
        residual_deg: shortest_signed_angle(lon, target),
    })
}

/// Guess for a return in `year`: the natal month, day capped at 28, and
/// natal time of day.
fn anniversary_guess(
    provider: &dyn EphemerisProvider,
    natal_jd: f64,
    year: i32,
) -> Result<f64, SearchError> {
    let natal = provider.time_to_date(natal_jd)?;
    let guess = UtcTime::new(
        year,
        natal.month,
        natal.day.min(28),
        natal.hour,
        natal.minute,
        natal.second,
    );
    Ok(provider.date_to_time(&guess)?)
}

/// Solar return: the Sun back at its natal longitude, near the birthday in
/// `year`.
pub fn solar_return(
    provider: &dyn EphemerisProvider,
    natal_jd: f64,
    year: i32,
    config: &ReturnConfig,
) -> Result<ReturnEvent, SearchError> {
    let target = provider.longitude(natal_jd, Body::Sun)?;
    let guess = anniversary_guess(provider, natal_jd, year)?;
    find_return(provider, Body::Sun, target, guess, config)
}

/// Return of any body to its natal longitude, centred on the anniversary in
/// `year`.
///
/// `search_years` is the half-window in years and must lie in
/// [`SEARCH_YEARS_RANGE`]. When omitted it defaults to 60% of the body's
/// approximate period, and never less than two years.
pub fn body_return(
    provider: &dyn EphemerisProvider,
    body: Body,
    natal_jd: f64,
    year: i32,
    search_years: Option<f64>,
    config: &ReturnConfig,
) -> Result<ReturnEvent, SearchError> {
    let half_years = match search_years {
        Some(y) if SEARCH_YEARS_RANGE.contains(&y) => y,
        Some(_) => {
            return Err(SearchError::InvalidConfig(
                "search_years must be within 0.5..=60",
            ));
        }
        None => default_half_window_years(body),
    };

    let config = ReturnConfig {
        window_days: 2.0 * half_years * JULIAN_YEAR_DAYS,
        ..*config
    };
    let target = provider.longitude(natal_jd, body)?;
    let guess = anniversary_guess(provider, natal_jd, year)?;
    find_return(provider, body, target, guess, &config)
}

/// Default half-window for [`body_return`], in years.
pub fn default_half_window_years(body: Body) -> f64 {
    (body.approx_period_years() * 0.6).max(2.0)
}
