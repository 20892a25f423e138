//! Sweep-value sequences and nearest-step selection.

/// Reference temperature sweep of the characterization flow:
/// -55 degC to 175 degC in 10 deg steps (24 steps).
pub fn temperature_sweep() -> Vec<f64> {
    linear_sweep(-55.0, 175.0, 10.0)
}

/// Generate an inclusive stepped sweep sequence.
///
/// The stop value is included when the accumulated value lands on it within
/// a step-relative tolerance. A zero or non-finite step yields just the
/// start value.
pub fn linear_sweep(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() {
        return vec![start];
    }
    let direction = if step > 0.0 { 1.0 } else { -1.0 };
    let tol = step.abs() * 1e-9;
    let mut values = Vec::new();
    let mut value = start;
    loop {
        values.push(value);
        value += step;
        if direction * (value - stop) > tol {
            break;
        }
    }
    values
}

/// Index of the sweep value nearest to `target`.
///
/// Ties resolve to the lowest index. An empty sequence, or one with no
/// finite distance to the target, selects step 0: a garbled sweep list must
/// not abort an extraction that is still analyzable at its first step.
pub fn nearest_step(sweep_values: &[f64], target: f64) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in sweep_values.iter().enumerate() {
        let dist = (value - target).abs();
        if !dist.is_finite() {
            continue;
        }
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((i, dist)),
        }
    }
    match best {
        Some((i, _)) => i,
        None => {
            if !sweep_values.is_empty() {
                log::debug!("no finite sweep value comparable to {target}; using step 0");
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_sweep_shape() {
        let temps = temperature_sweep();
        assert_eq!(temps.len(), 24);
        assert_eq!(temps[0], -55.0);
        assert_eq!(temps[23], 175.0);
        assert_eq!(temps[8], 25.0);
    }

    #[test]
    fn test_linear_sweep_descending() {
        let values = linear_sweep(5.0, 0.0, -2.5);
        assert_eq!(values, vec![5.0, 2.5, 0.0]);
    }

    #[test]
    fn test_linear_sweep_zero_step() {
        assert_eq!(linear_sweep(1.0, 10.0, 0.0), vec![1.0]);
    }

    #[test]
    fn test_nearest_step_exact_match() {
        // 25 is present in the sweep; it must select itself, not a neighbor.
        assert_eq!(nearest_step(&temperature_sweep(), 25.0), 8);
    }

    #[test]
    fn test_nearest_step_rounds_to_closest() {
        assert_eq!(nearest_step(&temperature_sweep(), 26.0), 8);
        assert_eq!(nearest_step(&temperature_sweep(), 31.0), 9);
    }

    #[test]
    fn test_nearest_step_clamps_to_endpoints() {
        assert_eq!(nearest_step(&temperature_sweep(), -300.0), 0);
        assert_eq!(nearest_step(&temperature_sweep(), 1000.0), 23);
    }

    #[test]
    fn test_nearest_step_tie_takes_lowest_index() {
        // 30 is equidistant from 25 (step 8) and 35 (step 9).
        assert_eq!(nearest_step(&temperature_sweep(), 30.0), 8);
    }

    #[test]
    fn test_nearest_step_empty_falls_back_to_zero() {
        assert_eq!(nearest_step(&[], 25.0), 0);
        assert_eq!(nearest_step(&[], -300.0), 0);
    }

    #[test]
    fn test_nearest_step_non_finite_values_skipped() {
        assert_eq!(nearest_step(&[f64::NAN, 20.0, 30.0], 21.0), 1);
        assert_eq!(nearest_step(&[f64::NAN, f64::NAN], 21.0), 0);
        assert_eq!(nearest_step(&[10.0, 20.0], f64::NAN), 0);
    }
}
