pub mod arrow;
pub mod round;

pub use arrow::{
    Arrow, ArrowValue, FIVE_ZONE_ROUND_MARKER, PlacedArrow, Placement, ScoringSystem,
    ValueCategory, category, is_gold, is_legal, legal_values, legal_values_for, numeric_value,
};
pub use round::{End, RoundCatalog, RoundConfig, RoundResult};

/// Sum, hit count and gold count over any run of arrows.
#[must_use]
pub fn tally<'a, I>(arrows: I, system: ScoringSystem) -> (u32, u32, u32)
where
    I: IntoIterator<Item = &'a Arrow>,
{
    arrows
        .into_iter()
        .fold((0, 0, 0), |(score, hits, golds), arrow| {
            (
                score + numeric_value(arrow.value),
                hits + u32::from(!arrow.value.is_miss()),
                golds + u32::from(is_gold(arrow.value, system)),
            )
        })
}
