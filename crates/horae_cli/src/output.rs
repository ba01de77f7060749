//! Text and JSON rendering of search results.

use anyhow::Context;
use horae_core::{Body, EphemerisProvider, ZodiacSign};
use horae_search::{
    AspectMatch, AspectTone, BodyPosition, CompositeChart, EclipseEvent, ElectionalScore,
    EnergySample, EssentialDignity, LunarPhaseInfo, LunationEvent, ProgressedChart,
    ProgressedMoonCycle, ProgressionHighlight, RetrogradeInterval, RetrogradeStatus, ReturnEvent,
    SolarArcChart, VoidOfCourseWindow, essential_dignity,
};
use serde::Serialize;

/// Print `value` as pretty JSON, or through `text` otherwise.
pub fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if json {
        let s = serde_json::to_string_pretty(value).context("serialising result")?;
        println!("{s}");
    } else {
        text(value);
    }
    Ok(())
}

/// `2024-04-08T18:17:00Z (JD 2460409.26181)`, or the bare JD if the provider
/// cannot convert it.
pub fn fmt_jd(provider: &dyn EphemerisProvider, jd: f64) -> String {
    match provider.time_to_date(jd) {
        Ok(utc) => format!("{utc} (JD {jd:.5})"),
        Err(_) => format!("JD {jd:.5}"),
    }
}

/// One body in an aspect report.
#[derive(Debug, Serialize)]
pub struct PositionRow {
    pub body: Body,
    pub longitude_deg: f64,
    pub speed_deg_per_day: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    pub retrograde: bool,
    pub dignity: EssentialDignity,
}

impl From<&BodyPosition> for PositionRow {
    fn from(p: &BodyPosition) -> Self {
        let sign = p.position.sign();
        Self {
            body: p.body,
            longitude_deg: p.position.longitude_deg,
            speed_deg_per_day: p.position.speed_deg_per_day,
            sign,
            degree_in_sign: p.position.degree_in_sign(),
            retrograde: p.position.is_retrograde(),
            dignity: essential_dignity(p.body, sign),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AspectReport {
    pub jd: f64,
    pub positions: Vec<PositionRow>,
    pub aspects: Vec<AspectMatch>,
    pub tone: AspectTone,
}

pub fn print_phase(provider: &dyn EphemerisProvider, info: &LunarPhaseInfo) {
    println!("{}", fmt_jd(provider, info.jd));
    println!(
        "  Phase: {} ({})  {}",
        info.phase,
        info.octant,
        if info.waxing { "waxing" } else { "waning" }
    );
    println!(
        "  Elongation: {:.4} deg  Illumination: {:.1}%",
        info.elongation_deg, info.illumination_pct
    );
}

pub fn print_lunation(provider: &dyn EphemerisProvider, ev: &LunationEvent) {
    println!("{} moon: {}", capitalise(ev.kind.name()), fmt_jd(provider, ev.jd));
    println!("  Moon lon: {:.4} deg", ev.moon_longitude_deg);
}

pub fn print_return(provider: &dyn EphemerisProvider, ev: &ReturnEvent) {
    println!(
        "{} return to {:.4} deg: {}",
        capitalise(ev.body.name()),
        ev.target_longitude_deg,
        fmt_jd(provider, ev.jd)
    );
    println!(
        "  Longitude: {:.6} deg  Residual: {:+.2e} deg",
        ev.longitude_deg, ev.residual_deg
    );
}

pub fn print_retrograde_interval(provider: &dyn EphemerisProvider, iv: &RetrogradeInterval) {
    let mut notes = Vec::new();
    if iv.began_before_scan {
        notes.push("began before scan");
    }
    if iv.ongoing {
        notes.push("ongoing at scan end");
    }
    let notes = if notes.is_empty() {
        String::new()
    } else {
        format!("  [{}]", notes.join(", "))
    };
    println!(
        "{:<8} {} -> {}  ({:.1} days){notes}",
        iv.body.name(),
        fmt_jd(provider, iv.start_jd),
        fmt_jd(provider, iv.end_jd),
        iv.duration_days()
    );
}

pub fn print_retrograde_status(s: &RetrogradeStatus) {
    println!(
        "{:<8} {:<10} {:+.4} deg/day",
        s.body.name(),
        if s.retrograde { "retrograde" } else { "direct" },
        s.speed_deg_per_day
    );
}

pub fn print_void_of_course(provider: &dyn EphemerisProvider, w: &VoidOfCourseWindow) {
    println!("Moon in {} at {}", w.moon_sign, fmt_jd(provider, w.jd_start));
    println!("  Void of course now: {}", if w.is_void_now { "yes" } else { "no" });
    println!("  Void window starts: {}", fmt_jd(provider, w.window_start_jd));
    match w.sign_change_jd {
        Some(jd) => println!("  Leaves {}: {}", w.moon_sign, fmt_jd(provider, jd)),
        None => println!("  Sign change not found within one lunation"),
    }
    if let Some(a) = &w.last_aspect {
        println!("  Last aspect: {}", fmt_aspect(a));
    }
    if w.guard_exceeded {
        println!("  (scan stopped at the iteration cap)");
    }
}

pub fn fmt_aspect(a: &AspectMatch) -> String {
    format!(
        "{} {} {}  sep {:.2} deg  dev {:.2}/{:.1}  {}",
        a.body_a.name(),
        a.kind,
        a.body_b.name(),
        a.separation_deg,
        a.deviation_deg,
        a.orb_deg,
        if a.applying { "applying" } else { "separating" }
    )
}

pub fn print_aspect_report(provider: &dyn EphemerisProvider, r: &AspectReport) {
    println!("{}", fmt_jd(provider, r.jd));
    for p in &r.positions {
        println!(
            "  {:<8} {:>9.4} deg  {:>5.2} {:<12} {}{}",
            p.body.name(),
            p.longitude_deg,
            p.degree_in_sign,
            p.sign.name(),
            if p.retrograde { "R " } else { "" },
            dignity_label(&p.dignity)
        );
    }
    print_aspects(&r.aspects);
    print_tone(&r.tone);
}

pub fn print_aspects(aspects: &[AspectMatch]) {
    if aspects.is_empty() {
        println!("  No aspects within orb");
    }
    for a in aspects {
        println!("  {}", fmt_aspect(a));
    }
}

pub fn print_tone(t: &AspectTone) {
    println!(
        "  Tone: {} harmonious, {} hard (net {:+})",
        t.harmonious,
        t.hard,
        t.net()
    );
}

pub fn print_energy(provider: &dyn EphemerisProvider, samples: &[EnergySample]) {
    for s in samples {
        println!(
            "{}  harmonious {:>2}  hard {:>2}  net {:+}",
            fmt_jd(provider, s.jd),
            s.tone.harmonious,
            s.tone.hard,
            s.tone.net()
        );
    }
}

pub fn print_electional(provider: &dyn EphemerisProvider, scores: &[ElectionalScore]) {
    for (i, s) in scores.iter().enumerate() {
        println!(
            "{:>3}. {:+6.2}  {}  {}",
            i + 1,
            s.score,
            fmt_jd(provider, s.jd),
            s.reasons.join(", ")
        );
    }
}

pub fn print_eclipse(provider: &dyn EphemerisProvider, ev: &EclipseEvent) {
    let flags = ev
        .debug_flags
        .map(|f| format!("  flags=0x{f:02x}"))
        .unwrap_or_default();
    println!(
        "{} {:<9} {}{flags}",
        capitalise(ev.kind.name()),
        ev.eclipse_type.name(),
        fmt_jd(provider, ev.jd_max)
    );
}

fn print_positions(positions: &[BodyPosition]) {
    for p in positions {
        println!(
            "  {:<8} {:>9.4} deg  {:>5.2} {}",
            p.body.name(),
            p.position.longitude_deg,
            p.position.degree_in_sign(),
            p.position.sign().name()
        );
    }
}

pub fn print_progressions(provider: &dyn EphemerisProvider, c: &ProgressedChart) {
    println!(
        "Age {:.2}: progressed chart at {}",
        c.age_years,
        fmt_jd(provider, c.progressed_jd)
    );
    print_positions(&c.positions);
    if c.aspects_to_natal.is_empty() {
        println!("  No progressed-to-natal aspects within orb");
    }
    for a in &c.aspects_to_natal {
        println!(
            "  progressed {} {} natal {}  dev {:.2}{}",
            a.aspect.body_a.name(),
            a.aspect.kind,
            a.aspect.body_b.name(),
            a.aspect.deviation_deg,
            if a.exact { "  exact" } else { "" }
        );
    }
    for h in &c.highlights {
        println!("  * {}", fmt_highlight(h));
    }
}

fn fmt_highlight(h: &ProgressionHighlight) -> String {
    match h {
        ProgressionHighlight::MoonIngress {
            sign,
            degree_in_sign,
        } => format!("Progressed Moon at {degree_in_sign:.2} deg {sign}"),
        ProgressionHighlight::SunIngress { sign } => format!("Progressed Sun entering {sign}"),
        ProgressionHighlight::NewMoon { separation_deg } => {
            format!("Progressed New Moon ({separation_deg:.2} deg)")
        }
    }
}

pub fn print_solar_arc(c: &SolarArcChart) {
    println!("Age {:.2}: solar arc {:.4} deg", c.age_years, c.arc_deg);
    for p in &c.positions {
        println!(
            "  {:<8} {:>9.4} -> {:>9.4} deg  {} -> {}{}",
            p.body.name(),
            p.natal_longitude_deg,
            p.directed_longitude_deg,
            p.natal_sign,
            p.directed_sign,
            if p.changed_sign() { "  *" } else { "" }
        );
    }
}

pub fn print_progressed_moon(cycle: &ProgressedMoonCycle) {
    for c in &cycle.changes {
        println!("Age {:>3}: {} -> {}", c.age, c.from, c.to);
    }
    if let Some(now) = cycle.current() {
        println!(
            "At age {}: {} ({:.1} deg), Moon in {}",
            now.age, now.octant, now.elongation_deg, now.moon_sign
        );
    }
}

pub fn print_composite(provider: &dyn EphemerisProvider, c: &CompositeChart) {
    match c.reference_jd {
        Some(jd) => println!("{} chart at {}", capitalise(c.method.name()), fmt_jd(provider, jd)),
        None => println!("{} composite", capitalise(c.method.name())),
    }
    print_positions(&c.positions);
    let e = &c.elements;
    println!(
        "  Elements: fire {}  earth {}  air {}  water {}",
        e.fire, e.earth, e.air, e.water
    );
}

fn dignity_label(d: &EssentialDignity) -> String {
    if d.is_peregrine() {
        String::new()
    } else {
        d.to_string()
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
