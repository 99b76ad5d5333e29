//! Simple Moving Average, used by the trend filter.
//!
//! Rolling sum over the last n values; the first (n-1) bars are undefined.

pub fn calculate_sma(input: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; input.len()];
    }

    let mut values = Vec::with_capacity(input.len());
    let mut sum = 0.0;

    for (i, x) in input.iter().enumerate() {
        sum += x;
        if i >= period {
            sum -= input[i - period];
        }
        if i + 1 >= period {
            values.push(Some(sum / period as f64));
        } else {
            values.push(None);
        }
    }

    values
}
