//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n defined inputs, then
//! EMA[i] = X[i]*k + EMA[i-1]*(1-k).
//! Warmup: the undefined input prefix plus (n-1) bars are undefined.

use super::first_defined;

pub fn calculate_ema(input: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; input.len()];
    if period == 0 {
        return values;
    }
    let Some(start) = first_defined(input) else {
        return values;
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (offset, x) in input[start..].iter().enumerate() {
        let Some(x) = *x else {
            // Undefined input after the prefix ends the series.
            break;
        };
        let i = start + offset;

        if offset < period - 1 {
            sum += x;
        } else if offset == period - 1 {
            sum += x;
            ema = sum / period as f64;
            values[i] = Some(ema);
        } else {
            ema = x * k + ema * (1.0 - k);
            values[i] = Some(ema);
        }
    }

    values
}
