mod output;
mod telemetry;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use horae_config::HoraeConfig;
use horae_core::{Body, EclipseKind, EphemerisProvider, TabulatedEphemeris};
use horae_search::{
    CompositeMethod, DEFAULT_LUNATION_HALF_WINDOW_DAYS, LunationKind, ProgressionConfig,
    RETROGRADE_BODIES, ScanGrid, aspect_matrix, aspect_tone, body_return, composite_chart,
    cross_aspects, find_retrogrades_for, find_return, lunar_phase_at, lunar_phase_calendar,
    nearest_lunation, next_lunation, positions_at, progressed_moon_cycle, retrograde_status,
    search_eclipses, search_electional, secondary_progressions, solar_arc_directions,
    solar_return, transit_energy_series, void_of_course,
};
use horae_time::UtcTime;
use tracing::{Level, info};

use crate::output::{AspectReport, PositionRow, emit, fmt_jd};

#[derive(Parser)]
#[command(name = "horae", version, about = "Astrological event search over a tabulated ephemeris")]
struct Cli {
    /// JSON ephemeris table (overrides [ephemeris] table in the config)
    #[arg(long, global = true, env = "HORAE_EPHEMERIS")]
    ephemeris: Option<PathBuf>,
    /// TOML configuration file
    #[arg(long, global = true, env = "HORAE_CONFIG")]
    config: Option<PathBuf>,
    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lunar phase, octant and illumination at an instant
    Phase {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ) or Julian Day
        #[arg(long)]
        date: When,
    },
    /// Lunar phase sampled over a date range
    LunarCalendar {
        #[arg(long)]
        start: When,
        #[arg(long)]
        end: When,
        /// Sampling step in days
        #[arg(long, default_value = "1.0")]
        step_days: f64,
    },
    /// Nearest New/Full Moon, or the next one of a given kind
    Lunation {
        #[arg(long)]
        date: When,
        /// Search forward for the next lunation of this kind
        #[arg(long, value_enum)]
        next: Option<LunationArg>,
        /// Half-width of the nearest-lunation window in days
        #[arg(long, default_value_t = DEFAULT_LUNATION_HALF_WINDOW_DAYS)]
        half_window_days: f64,
    },
    /// Instant a body reaches a target ecliptic longitude near a guess
    Return {
        body: Body,
        /// Target tropical longitude in degrees
        #[arg(long)]
        target: f64,
        /// Guess instant; the search window is centred here
        #[arg(long)]
        guess: When,
    },
    /// Solar return for a birth instant and year
    SolarReturn {
        #[arg(long)]
        natal: When,
        #[arg(long)]
        year: i32,
    },
    /// Return of any body to its natal longitude
    BodyReturn {
        body: Body,
        #[arg(long)]
        natal: When,
        #[arg(long)]
        year: i32,
        /// Half-window in years (default depends on the body's period)
        #[arg(long)]
        search_years: Option<f64>,
    },
    /// Retrograde intervals in a date range
    Retrogrades {
        #[arg(long)]
        start: When,
        #[arg(long)]
        end: When,
        /// Comma-separated bodies (default: Mercury through Pluto and Chiron)
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
    /// Direct/retrograde status of bodies at an instant
    RetrogradeStatus {
        #[arg(long)]
        date: When,
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
    /// Void-of-course Moon window from an instant
    VoidOfCourse {
        #[arg(long)]
        date: When,
    },
    /// Aspects at an instant, synastry with --other, or a tone series with --until
    Aspects {
        #[arg(long)]
        date: When,
        /// Second chart instant for cross-aspects
        #[arg(long, conflicts_with = "until")]
        other: Option<When>,
        /// End of a transit tone series starting at --date
        #[arg(long)]
        until: Option<When>,
        /// Tone series step in days
        #[arg(long, default_value = "1.0")]
        step_days: f64,
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
    /// Rank candidate instants for starting an undertaking
    Electional {
        #[arg(long)]
        start: When,
        #[arg(long)]
        end: When,
        #[arg(long)]
        max_results: Option<usize>,
        /// Do not penalise Mercury retrograde
        #[arg(long)]
        allow_mercury_retrograde: bool,
        /// Do not penalise a void-of-course Moon
        #[arg(long)]
        allow_void_moon: bool,
    },
    /// Solar or lunar eclipses in a date range
    Eclipses {
        #[arg(value_enum)]
        kind: EclipseArg,
        #[arg(long)]
        start: When,
        #[arg(long)]
        end: When,
        #[arg(long)]
        max_events: Option<usize>,
        /// Include raw provider flag bits
        #[arg(long)]
        debug_flags: bool,
    },
    /// Secondary progressed chart (one day per year) with aspects to natal
    Progressions {
        #[arg(long)]
        natal: When,
        /// Instant to progress to
        #[arg(long)]
        date: When,
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
    /// Natal bodies advanced by the solar arc
    SolarArc {
        #[arg(long)]
        natal: When,
        #[arg(long)]
        date: When,
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
    /// Progressed lunar phase at each whole age
    ProgressedMoon {
        #[arg(long)]
        natal: When,
        #[arg(long, default_value_t = 0)]
        from_age: u32,
        #[arg(long, default_value_t = 90)]
        to_age: u32,
    },
    /// Midpoint composite or Davison chart of two births
    Composite {
        #[arg(long)]
        first: When,
        #[arg(long)]
        second: When,
        #[arg(long, value_enum, default_value = "midpoint")]
        method: CompositeArg,
        #[arg(long, value_delimiter = ',')]
        bodies: Vec<Body>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LunationArg {
    New,
    Full,
}

impl From<LunationArg> for LunationKind {
    fn from(a: LunationArg) -> Self {
        match a {
            LunationArg::New => LunationKind::New,
            LunationArg::Full => LunationKind::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EclipseArg {
    Solar,
    Lunar,
}

impl From<EclipseArg> for EclipseKind {
    fn from(a: EclipseArg) -> Self {
        match a {
            EclipseArg::Solar => EclipseKind::Solar,
            EclipseArg::Lunar => EclipseKind::Lunar,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompositeArg {
    Midpoint,
    Davison,
}

impl From<CompositeArg> for CompositeMethod {
    fn from(a: CompositeArg) -> Self {
        match a {
            CompositeArg::Midpoint => CompositeMethod::Midpoint,
            CompositeArg::Davison => CompositeMethod::Davison,
        }
    }
}

/// Instant given on the command line: a bare Julian Day or a UTC datetime.
#[derive(Debug, Clone)]
enum When {
    Jd(f64),
    Utc(UtcTime),
}

impl FromStr for When {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(jd) = s.trim().parse::<f64>() {
            return Ok(Self::Jd(jd));
        }
        s.parse::<UtcTime>()
            .map(Self::Utc)
            .map_err(|e| format!("expected a Julian Day or YYYY-MM-DD[Thh:mm[:ss]][Z]: {e}"))
    }
}

impl When {
    fn jd(&self, provider: &dyn EphemerisProvider) -> anyhow::Result<f64> {
        match self {
            Self::Jd(jd) => Ok(*jd),
            Self::Utc(utc) => provider
                .date_to_time(utc)
                .with_context(|| format!("converting {utc} to a Julian Day")),
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<HoraeConfig> {
    match path {
        Some(p) => HoraeConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(HoraeConfig::default()),
    }
}

fn load_provider(
    ephemeris: Option<&Path>,
    config: &HoraeConfig,
) -> anyhow::Result<TabulatedEphemeris> {
    let provider_config = match ephemeris {
        Some(p) => horae_core::ProviderConfig::new(p),
        None => match config.provider_config() {
            Some(c) => c,
            None => bail!("no ephemeris table: pass --ephemeris or set [ephemeris] table"),
        },
    };
    let eph = TabulatedEphemeris::load(&provider_config)
        .with_context(|| format!("loading ephemeris {}", provider_config.table_path.display()))?;
    info!(
        path = %provider_config.table_path.display(),
        bodies = eph.bodies().len(),
        "ephemeris loaded"
    );
    Ok(eph)
}

fn or_default(bodies: Vec<Body>, default: &[Body]) -> Vec<Body> {
    if bodies.is_empty() {
        default.to_vec()
    } else {
        bodies
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json, cli.log_level);

    let config = load_config(cli.config.as_deref())?;
    let eph = load_provider(cli.ephemeris.as_deref(), &config)?;
    run(cli.command, &eph, &config, cli.json)
}

fn run(
    command: Commands,
    p: &dyn EphemerisProvider,
    config: &HoraeConfig,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Phase { date } => {
            let info = lunar_phase_at(p, date.jd(p)?)?;
            emit(json, &info, |i| output::print_phase(p, i))
        }

        Commands::LunarCalendar {
            start,
            end,
            step_days,
        } => {
            let grid = ScanGrid::new(start.jd(p)?, end.jd(p)?, step_days);
            let days = lunar_phase_calendar(p, &grid)?;
            emit(json, days.as_slice(), |days| {
                for d in days {
                    output::print_phase(p, d);
                }
            })
        }

        Commands::Lunation {
            date,
            next,
            half_window_days,
        } => {
            let jd = date.jd(p)?;
            let ev = match next {
                Some(kind) => next_lunation(p, jd, kind.into())?,
                None => nearest_lunation(p, jd, half_window_days)?,
            };
            emit(json, &ev, |ev| output::print_lunation(p, ev))
        }

        Commands::Return {
            body,
            target,
            guess,
        } => {
            let ev = find_return(p, body, target, guess.jd(p)?, &config.returns)?;
            emit(json, &ev, |ev| output::print_return(p, ev))
        }

        Commands::SolarReturn { natal, year } => {
            let ev = solar_return(p, natal.jd(p)?, year, &config.returns)?;
            emit(json, &ev, |ev| output::print_return(p, ev))
        }

        Commands::BodyReturn {
            body,
            natal,
            year,
            search_years,
        } => {
            let ev = body_return(p, body, natal.jd(p)?, year, search_years, &config.returns)?;
            emit(json, &ev, |ev| output::print_return(p, ev))
        }

        Commands::Retrogrades { start, end, bodies } => {
            let bodies = or_default(bodies, &RETROGRADE_BODIES);
            let intervals =
                find_retrogrades_for(p, &bodies, start.jd(p)?, end.jd(p)?, &config.retrograde)?;
            emit(json, intervals.as_slice(), |ivs| {
                if ivs.is_empty() {
                    println!("No retrograde intervals in range");
                }
                for iv in ivs {
                    output::print_retrograde_interval(p, iv);
                }
            })
        }

        Commands::RetrogradeStatus { date, bodies } => {
            let bodies = or_default(bodies, &RETROGRADE_BODIES);
            let jd = date.jd(p)?;
            let status = retrograde_status(p, jd, &bodies)?;
            emit(json, status.as_slice(), |status| {
                println!("{}", fmt_jd(p, jd));
                for s in status {
                    output::print_retrograde_status(s);
                }
            })
        }

        Commands::VoidOfCourse { date } => {
            let w = void_of_course(p, date.jd(p)?, &config.void_of_course())?;
            emit(json, &w, |w| output::print_void_of_course(p, w))
        }

        Commands::Aspects {
            date,
            other,
            until,
            step_days,
            bodies,
        } => {
            let bodies = or_default(bodies, &Body::PLANETS);
            let orbs = config.orb_table();
            let jd = date.jd(p)?;

            if let Some(until) = until {
                let grid = ScanGrid::new(jd, until.jd(p)?, step_days);
                let series = transit_energy_series(p, &grid, &bodies, &orbs)?;
                return emit(json, series.as_slice(), |s| output::print_energy(p, s));
            }

            let positions = positions_at(p, jd, &bodies)?;
            let aspects = match other {
                Some(other) => {
                    let theirs = positions_at(p, other.jd(p)?, &bodies)?;
                    cross_aspects(&positions, &theirs, &orbs)
                }
                None => aspect_matrix(&positions, &orbs),
            };
            let report = AspectReport {
                jd,
                positions: positions.iter().map(PositionRow::from).collect(),
                tone: aspect_tone(&aspects),
                aspects,
            };
            emit(json, &report, |r| output::print_aspect_report(p, r))
        }

        Commands::Electional {
            start,
            end,
            max_results,
            allow_mercury_retrograde,
            allow_void_moon,
        } => {
            let mut cfg = config.electional();
            if let Some(n) = max_results {
                cfg.max_results = n;
            }
            cfg.avoid_mercury_retrograde &= !allow_mercury_retrograde;
            cfg.avoid_moon_void_of_course &= !allow_void_moon;
            let ranked = search_electional(p, start.jd(p)?, end.jd(p)?, &cfg)?;
            emit(json, ranked.as_slice(), |r| output::print_electional(p, r))
        }

        Commands::Eclipses {
            kind,
            start,
            end,
            max_events,
            debug_flags,
        } => {
            let mut cfg = config.eclipses;
            if let Some(n) = max_events {
                cfg.max_events = n;
            }
            cfg.include_debug_flags |= debug_flags;
            let found = search_eclipses(p, kind.into(), start.jd(p)?, end.jd(p)?, &cfg)?;
            emit(json, &found, |found| {
                if found.items.is_empty() {
                    println!("No eclipses in range");
                }
                for ev in &found.items {
                    output::print_eclipse(p, ev);
                }
                if found.guard_exceeded {
                    println!(
                        "(search stopped after {} provider calls; results may be incomplete)",
                        found.iterations
                    );
                }
            })
        }

        Commands::Progressions {
            natal,
            date,
            bodies,
        } => {
            let cfg = with_bodies(&config.progressions, bodies);
            let chart = secondary_progressions(p, natal.jd(p)?, date.jd(p)?, &cfg)?;
            emit(json, &chart, |c| output::print_progressions(p, c))
        }

        Commands::SolarArc {
            natal,
            date,
            bodies,
        } => {
            let cfg = with_bodies(&config.progressions, bodies);
            let chart = solar_arc_directions(p, natal.jd(p)?, date.jd(p)?, &cfg)?;
            emit(json, &chart, output::print_solar_arc)
        }

        Commands::ProgressedMoon {
            natal,
            from_age,
            to_age,
        } => {
            let cycle = progressed_moon_cycle(p, natal.jd(p)?, from_age, to_age)?;
            emit(json, &cycle, output::print_progressed_moon)
        }

        Commands::Composite {
            first,
            second,
            method,
            bodies,
        } => {
            let bodies = or_default(bodies, &Body::PLANETS);
            let chart = composite_chart(p, first.jd(p)?, second.jd(p)?, &bodies, method.into())?;
            emit(json, &chart, |c| output::print_composite(p, c))
        }
    }
}

fn with_bodies(base: &ProgressionConfig, bodies: Vec<Body>) -> ProgressionConfig {
    let mut cfg = base.clone();
    if !bodies.is_empty() {
        cfg.bodies = bodies;
    }
    cfg
}
