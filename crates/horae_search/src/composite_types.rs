//! Types for relationship composite charts.

use std::fmt;

use horae_core::{Body, Element};
use serde::{Deserialize, Serialize};

use crate::aspect_types::BodyPosition;

/// How two natal charts are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMethod {
    /// Each body at the shorter-arc midpoint of its two natal longitudes.
    Midpoint,
    /// The sky at the instant halfway between the two births.
    Davison,
}

impl CompositeMethod {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Midpoint => "midpoint",
            Self::Davison => "davison",
        }
    }
}

impl fmt::Display for CompositeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bodies per element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ElementBalance {
    pub fire: u32,
    pub earth: u32,
    pub air: u32,
    pub water: u32,
}

impl ElementBalance {
    pub fn from_positions(positions: &[BodyPosition]) -> Self {
        positions.iter().fold(Self::default(), |mut b, p| {
            *b.slot(p.position.sign().element()) += 1;
            b
        })
    }

    fn slot(&mut self, element: Element) -> &mut u32 {
        match element {
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Air => &mut self.air,
            Element::Water => &mut self.water,
        }
    }

    pub fn count(&self, element: Element) -> u32 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Air => self.air,
            Element::Water => self.water,
        }
    }

    /// The element holding strictly more bodies than any other.
    pub fn dominant(&self) -> Option<Element> {
        let max = Element::ALL.iter().map(|&e| self.count(e)).max()?;
        let mut top = Element::ALL.into_iter().filter(|&e| self.count(e) == max);
        match (top.next(), top.next()) {
            (Some(e), None) if max > 0 => Some(e),
            _ => None,
        }
    }
}

/// Composite chart of two people.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeChart {
    pub method: CompositeMethod,
    /// Davison midpoint instant; `None` for midpoint composites.
    pub reference_jd: Option<f64>,
    pub positions: Vec<BodyPosition>,
    pub elements: ElementBalance,
}

impl CompositeChart {
    pub fn position(&self, body: Body) -> Option<&BodyPosition> {
        self.positions.iter().find(|p| p.body == body)
    }
}
