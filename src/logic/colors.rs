//! Color allocation for round 2 onwards.
//!
//! Preference: white goes to the competitor who did not hold white last round; if both or
//! neither did, the lower running white-minus-black balance gets white, then the higher-ranked
//! side. The preferred assignment is swapped when it would push either side past the imbalance
//! limit, and the swapped assignment is kept as is.

use crate::logic::pairing::PairingWarning;
use crate::models::{Color, Competitor};

/// Returns `(white, black)`. `higher` is the better-ranked side of the pairing.
pub fn allocate_colors<'a>(
    higher: &'a Competitor,
    lower: &'a Competitor,
    max_imbalance: i32,
    warnings: &mut Vec<PairingWarning>,
) -> (&'a Competitor, &'a Competitor) {
    let (white, black) = preferred(higher, lower);
    let (white, black) = enforce_limit(white, black, max_imbalance);

    for (c, color) in [(white, Color::White), (black, Color::Black)] {
        let imbalance = c.imbalance_with(color);
        if imbalance > max_imbalance {
            log::warn!("{} takes {:?} with imbalance {}", c.name, color, imbalance);
            warnings.push(PairingWarning::ColorImbalance {
                competitor: c.id,
                imbalance,
            });
        }
    }
    (white, black)
}

fn preferred<'a>(higher: &'a Competitor, lower: &'a Competitor) -> (&'a Competitor, &'a Competitor) {
    let higher_had_white = higher.last_color() == Some(Color::White);
    let lower_had_white = lower.last_color() == Some(Color::White);
    if higher_had_white != lower_had_white {
        return if higher_had_white { (lower, higher) } else { (higher, lower) };
    }
    if lower.color_balance() < higher.color_balance() {
        (lower, higher)
    } else {
        (higher, lower)
    }
}

fn exceeds(c: &Competitor, color: Color, max_imbalance: i32) -> bool {
    c.imbalance_with(color) > max_imbalance
}

/// Swap once if the assignment breaks the limit for either side.
fn enforce_limit<'a>(
    white: &'a Competitor,
    black: &'a Competitor,
    max_imbalance: i32,
) -> (&'a Competitor, &'a Competitor) {
    if exceeds(white, Color::White, max_imbalance) || exceeds(black, Color::Black, max_imbalance) {
        log::debug!("Swapping colors for {} / {}", white.name, black.name);
        (black, white)
    } else {
        (white, black)
    }
}
