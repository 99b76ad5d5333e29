//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the undefined input prefix plus n bars (n changes are needed for
//! the first average).

use super::first_defined;

pub fn calculate_rsi(input: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; input.len()];
    if period == 0 {
        return values;
    }
    let Some(start) = first_defined(input) else {
        return values;
    };

    let defined: Vec<f64> = input[start..].iter().map_while(|v| *v).collect();
    if defined.len() <= period {
        return values;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (change_idx, pair) in defined.windows(2).enumerate() {
        let change = pair[1] - pair[0];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if change_idx < period {
            avg_gain += gain / period as f64;
            avg_loss += loss / period as f64;
            if change_idx < period - 1 {
                continue;
            }
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        }

        values[start + change_idx + 1] = Some(rsi_value(avg_gain, avg_loss));
    }

    values
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
