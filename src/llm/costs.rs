//! Per-token prices for the models we know about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// (input, output) USD cost per token for `model`.
///
/// Unknown models are priced at zero so cost reporting never blocks a run.
pub fn model_cost(model: &str) -> (Decimal, Decimal) {
    let per_million = match model {
        m if m.starts_with("gpt-4o-mini") => (dec!(0.15), dec!(0.60)),
        m if m.starts_with("gpt-4o") => (dec!(2.50), dec!(10.00)),
        m if m.starts_with("gpt-4.1-mini") => (dec!(0.40), dec!(1.60)),
        m if m.starts_with("claude-3-5-haiku") => (dec!(0.80), dec!(4.00)),
        m if m.starts_with("claude-3-5-sonnet") || m.starts_with("claude-sonnet-4") => {
            (dec!(3.00), dec!(15.00))
        }
        _ => (Decimal::ZERO, Decimal::ZERO),
    };
    let million = dec!(1_000_000);
    (per_million.0 / million, per_million.1 / million)
}

/// Cost of a call given its token counts.
pub fn estimate(costs: (Decimal, Decimal), input_tokens: u32, output_tokens: u32) -> Decimal {
    costs.0 * Decimal::from(input_tokens) + costs.1 * Decimal::from(output_tokens)
}
