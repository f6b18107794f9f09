//! Stateless time-series kernels over plain Rust values.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDateTime, TimeDelta};

use crate::spec::{SpecTimeSample, SpecTimeseriesGapCount, SpecTimeseriesInfo, TseriesError};

////////////////////////////////////////////////////////////////////////////////
// #region TimeDerivative

/// Express `delta` as fractional seconds.
pub fn derive_seconds_f64(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
}

/// Rate of change "from the right" for each valid sample.
///
/// Missing samples (`None`/NaN) are dropped first, so a rate spans the nearest
/// surrounding valid samples. The first remaining sample carries `None`.
/// Each rate is `(v[i] - v[i-1]) / ((t[i] - t[i-1]) / time_unit)`.
pub fn derive_time_derivative(
    samples: &[SpecTimeSample],
    time_unit: TimeDelta,
) -> Result<Vec<SpecTimeSample>, TseriesError> {
    if time_unit.is_zero() {
        return Err(TseriesError::InvalidTimeUnit(time_unit));
    }
    let n_secs_unit = derive_seconds_f64(time_unit);

    let l_valid: Vec<(NaiveDateTime, f64)> = samples
        .iter()
        .filter_map(|sample| sample.value_valid().map(|v| (sample.timestamp, v)))
        .collect();

    let mut l_rates = Vec::with_capacity(l_valid.len());
    let mut prev: Option<(NaiveDateTime, f64)> = None;
    for (timestamp, value) in l_valid {
        let rate = prev.map(|(t_prev, v_prev)| {
            let n_units = derive_seconds_f64(timestamp - t_prev) / n_secs_unit;
            (value - v_prev) / n_units
        });
        l_rates.push(SpecTimeSample::new(timestamp, rate));
        prev = Some((timestamp, value));
    }

    Ok(l_rates)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TimeseriesInfo

/// Span and gap frequency of `timestamps` (in input order).
///
/// Gaps are ordered by descending count, ties by ascending gap. Returns `None`
/// for empty input.
pub fn derive_timeseries_info(timestamps: &[NaiveDateTime]) -> Option<SpecTimeseriesInfo> {
    let start = *timestamps.iter().min()?;
    let end = *timestamps.iter().max()?;

    let mut dict_gap_counts: BTreeMap<TimeDelta, usize> = BTreeMap::new();
    for pair in timestamps.windows(2) {
        *dict_gap_counts.entry(pair[1] - pair[0]).or_default() += 1;
    }

    let mut l_freq: Vec<SpecTimeseriesGapCount> = dict_gap_counts
        .into_iter()
        .map(|(gap, count)| SpecTimeseriesGapCount { gap, count })
        .collect();
    // Stable sort keeps ascending-gap order among equal counts.
    l_freq.sort_by(|a, b| b.count.cmp(&a.count));

    Some(SpecTimeseriesInfo {
        start,
        end,
        freq: l_freq,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BoolReport

/// Group `labels` by the flag at the same position.
///
/// Missing flags belong to no group; groups without members are absent.
pub fn derive_bool_report<L: Ord + Clone>(
    flags: &[Option<bool>],
    labels: &[L],
) -> Result<BTreeMap<bool, BTreeSet<L>>, TseriesError> {
    if flags.len() != labels.len() {
        return Err(TseriesError::LengthMismatch {
            left: flags.len(),
            right: labels.len(),
        });
    }

    let mut dict_groups: BTreeMap<bool, BTreeSet<L>> = BTreeMap::new();
    for (flag, label) in flags.iter().zip(labels) {
        if let Some(if_flag) = flag {
            dict_groups
                .entry(*if_flag)
                .or_default()
                .insert(label.clone());
        }
    }
    Ok(dict_groups)
}

/// [`derive_bool_report`] keyed by position.
pub fn derive_bool_report_by_position(flags: &[Option<bool>]) -> BTreeMap<bool, BTreeSet<usize>> {
    let mut dict_groups: BTreeMap<bool, BTreeSet<usize>> = BTreeMap::new();
    for (n_idx, flag) in flags.iter().enumerate() {
        if let Some(if_flag) = flag {
            dict_groups.entry(*if_flag).or_default().insert(n_idx);
        }
    }
    dict_groups
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn at_secs(n_secs: i64) -> NaiveDateTime {
        t0() + TimeDelta::seconds(n_secs)
    }

    #[test]
    fn test_time_derivative_shape_and_values() {
        let samples = vec![
            SpecTimeSample::new(at_secs(0), Some(1.0)),
            SpecTimeSample::new(at_secs(2), Some(5.0)),
            SpecTimeSample::new(at_secs(6), Some(3.0)),
        ];

        let l_rates = derive_time_derivative(&samples, TimeDelta::seconds(1)).unwrap();
        assert_eq!(l_rates.len(), 3);
        assert_eq!(l_rates[0], SpecTimeSample::new(at_secs(0), None));
        assert_eq!(l_rates[1], SpecTimeSample::new(at_secs(2), Some(2.0)));
        assert_eq!(l_rates[2], SpecTimeSample::new(at_secs(6), Some(-0.5)));

        let n_defined = l_rates.iter().filter(|s| s.value.is_some()).count();
        assert_eq!(n_defined, samples.len() - 1);
    }

    #[test]
    fn test_time_derivative_scales_by_time_unit() {
        let samples = vec![
            SpecTimeSample::new(at_secs(0), Some(0.0)),
            SpecTimeSample::new(at_secs(1_800), Some(10.0)),
        ];

        let l_rates = derive_time_derivative(&samples, TimeDelta::hours(1)).unwrap();
        assert_eq!(l_rates[1].value, Some(20.0));

        let l_rates = derive_time_derivative(&samples, TimeDelta::milliseconds(500)).unwrap();
        let n_rate = l_rates[1].value.unwrap();
        assert!((n_rate - 10.0 / 3_600.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_derivative_skips_missing_values() {
        let samples = vec![
            SpecTimeSample::new(at_secs(0), Some(0.0)),
            SpecTimeSample::new(at_secs(1), None),
            SpecTimeSample::new(at_secs(2), Some(f64::NAN)),
            SpecTimeSample::new(at_secs(4), Some(8.0)),
        ];

        let l_rates = derive_time_derivative(&samples, TimeDelta::seconds(1)).unwrap();
        assert_eq!(
            l_rates,
            vec![
                SpecTimeSample::new(at_secs(0), None),
                SpecTimeSample::new(at_secs(4), Some(2.0)),
            ]
        );
    }

    #[test]
    fn test_time_derivative_rejects_zero_unit() {
        assert!(matches!(
            derive_time_derivative(&[], TimeDelta::zero()),
            Err(TseriesError::InvalidTimeUnit(_))
        ));
    }

    #[test]
    fn test_timeseries_info_orders_gaps_by_frequency() {
        let l_ts = vec![at_secs(0), at_secs(60), at_secs(120), at_secs(180), at_secs(480)];

        let info = derive_timeseries_info(&l_ts).unwrap();
        assert_eq!(info.start, at_secs(0));
        assert_eq!(info.end, at_secs(480));
        assert_eq!(
            info.freq,
            vec![
                SpecTimeseriesGapCount {
                    gap: TimeDelta::seconds(60),
                    count: 3
                },
                SpecTimeseriesGapCount {
                    gap: TimeDelta::seconds(300),
                    count: 1
                },
            ]
        );
        assert_eq!(info.gap_dominant(), Some(TimeDelta::seconds(60)));
    }

    #[test]
    fn test_timeseries_info_edge_cases() {
        assert!(derive_timeseries_info(&[]).is_none());

        let info = derive_timeseries_info(&[at_secs(5)]).unwrap();
        assert_eq!(info.start, info.end);
        assert!(info.freq.is_empty());
    }

    #[test]
    fn test_bool_report_groups_positions() {
        let dict_groups = derive_bool_report_by_position(&[Some(true), Some(false), Some(true)]);
        assert_eq!(dict_groups[&true], BTreeSet::from([0, 2]));
        assert_eq!(dict_groups[&false], BTreeSet::from([1]));
    }

    #[test]
    fn test_bool_report_with_labels() {
        let dict_groups = derive_bool_report(
            &[Some(true), None, Some(true)],
            &["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .unwrap();
        assert_eq!(dict_groups.len(), 1);
        assert_eq!(
            dict_groups[&true],
            BTreeSet::from(["a".to_string(), "c".to_string()])
        );

        assert!(matches!(
            derive_bool_report(&[Some(true)], &[0, 1]),
            Err(TseriesError::LengthMismatch { left: 1, right: 2 })
        ));
    }
}
