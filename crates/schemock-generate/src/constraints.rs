//! Effective bounds computed from declared checks.
//!
//! Everything here is pure: bounds are derived fresh for every synthesis and
//! never cached on schema nodes.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use schemock_core::{Check, NumberFormat};

use crate::errors::GenerationError;
use crate::model::SizeBounds;

/// Width of the range synthesized around a single explicit bound.
pub const WINDOW: i64 = 100;
/// Numeric range used when no bound is declared.
pub const DEFAULT_NUMBER_RANGE: (i64, i64) = (0, 10_000);
/// Largest multiplier tried when turning a fractional step into an integer one.
const MAX_STEP_MULTIPLIER: i64 = 1_000;

/// Optional lower/upper pair; merge is intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: Copy + PartialOrd + fmt::Display> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Raises the lower bound if `value` is tighter.
    pub fn tighten_min(&mut self, value: T) {
        match self.min {
            Some(current) if current >= value => {}
            _ => self.min = Some(value),
        }
    }

    /// Lowers the upper bound if `value` is tighter.
    pub fn tighten_max(&mut self, value: T) {
        match self.max {
            Some(current) if current <= value => {}
            _ => self.max = Some(value),
        }
    }

    /// Intersection of two bound sets; absent bounds are non-binding.
    pub fn merge(&self, other: &Self) -> Result<Self, BoundsConflict> {
        let mut merged = *self;
        if let Some(min) = other.min {
            merged.tighten_min(min);
        }
        if let Some(max) = other.max {
            merged.tighten_max(max);
        }
        merged.check()?;
        Ok(merged)
    }

    pub fn check(&self) -> Result<(), BoundsConflict> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(BoundsConflict::new(format!(
                "min {min} is greater than max {max}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Bounds whose minimum exceeds their maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundsConflict {
    pub message: String,
}

impl BoundsConflict {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn at(self, path: &str) -> GenerationError {
        GenerationError::ConstraintConflict {
            path: path.to_string(),
            message: self.message,
        }
    }
}

impl fmt::Display for BoundsConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// String length or array item count bounds.
pub fn length_bounds(checks: &[Check]) -> Bounds<usize> {
    let mut bounds = Bounds::default();
    for check in checks {
        match check {
            Check::MinLength { value } => bounds.tighten_min(*value),
            Check::MaxLength { value } => bounds.tighten_max(*value),
            Check::Length { value } => {
                bounds.tighten_min(*value);
                bounds.tighten_max(*value);
            }
            _ => {}
        }
    }
    bounds
}

/// Set/map size bounds.
pub fn size_bounds(checks: &[Check]) -> Bounds<usize> {
    let mut bounds = Bounds::default();
    for check in checks {
        match check {
            Check::MinSize { value } => bounds.tighten_min(*value),
            Check::MaxSize { value } => bounds.tighten_max(*value),
            Check::Size { value } => {
                bounds.tighten_min(*value);
                bounds.tighten_max(*value);
            }
            _ => {}
        }
    }
    bounds
}

/// Declared numeric bounds, inclusivity ignored.
pub fn number_bounds(checks: &[Check]) -> Bounds<f64> {
    let mut bounds = Bounds::default();
    for check in checks {
        match check {
            Check::GreaterThan { value, .. } => bounds.tighten_min(*value),
            Check::LessThan { value, .. } => bounds.tighten_max(*value),
            _ => {}
        }
    }
    bounds
}

/// Declared big-integer bounds with exclusive bounds stepped inward.
pub fn big_int_bounds(checks: &[Check]) -> Bounds<i128> {
    let mut bounds = Bounds::default();
    for check in checks {
        match check {
            Check::BigIntGreaterThan { value, inclusive } => {
                bounds.tighten_min(if *inclusive {
                    *value
                } else {
                    value.saturating_add(1)
                })
            }
            Check::BigIntLessThan { value, inclusive } => {
                bounds.tighten_max(if *inclusive {
                    *value
                } else {
                    value.saturating_sub(1)
                })
            }
            _ => {}
        }
    }
    bounds
}

/// Declared date bounds (inclusive).
pub fn date_bounds(checks: &[Check]) -> Bounds<DateTime<Utc>> {
    let mut bounds = Bounds::default();
    for check in checks {
        match check {
            Check::MinDate { value } => bounds.tighten_min(*value),
            Check::MaxDate { value } => bounds.tighten_max(*value),
            _ => {}
        }
    }
    bounds
}

/// Names of overwriting check kinds declared more than once.
pub fn duplicate_overwriting(checks: &[Check]) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut duplicates = Vec::new();
    for check in checks.iter().filter(|check| check.is_overwriting()) {
        let name = check.kind_name();
        if seen.contains(&name) {
            if !duplicates.contains(&name) {
                duplicates.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    duplicates
}

/// Active string checks: lengths merged, overwriting checks last-wins,
/// `includes` additive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub length: Bounds<usize>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub includes: Vec<String>,
    pub pattern: Option<String>,
}

impl StringConstraints {
    /// Characters fixed by prefix, suffix, and includes.
    pub fn fixed_len(&self) -> usize {
        self.starts_with.as_deref().map_or(0, |value| value.chars().count())
            + self.ends_with.as_deref().map_or(0, |value| value.chars().count())
            + self
                .includes
                .iter()
                .map(|value| value.chars().count())
                .sum::<usize>()
    }

    /// Length range to synthesize, windowed around a single explicit bound.
    pub fn length_range(&self) -> Result<Option<(usize, usize)>, BoundsConflict> {
        self.length.check()?;
        let window = WINDOW as usize;
        Ok(match (self.length.min, self.length.max) {
            (None, None) => None,
            (Some(min), Some(max)) => Some((min, max)),
            (Some(min), None) => Some((min, min.saturating_add(window))),
            (None, Some(max)) => Some((max.saturating_sub(window), max)),
        })
    }
}

pub fn string_constraints(checks: &[Check]) -> StringConstraints {
    let mut constraints = StringConstraints {
        length: length_bounds(checks),
        ..StringConstraints::default()
    };
    for check in checks {
        match check {
            Check::StartsWith { value } => constraints.starts_with = Some(value.clone()),
            Check::EndsWith { value } => constraints.ends_with = Some(value.clone()),
            Check::Includes { value } => constraints.includes.push(value.clone()),
            Check::Regex { pattern } => constraints.pattern = Some(pattern.clone()),
            _ => {}
        }
    }
    constraints
}

/// Resolved numeric synthesis plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberPlan {
    /// `multiple_of` is the smallest integer multiple of the declared step.
    Int {
        min: i64,
        max: i64,
        multiple_of: Option<i64>,
    },
    Float {
        min: f64,
        max: f64,
        multiple_of: Option<f64>,
    },
}

pub fn number_plan(checks: &[Check]) -> Result<NumberPlan, BoundsConflict> {
    let mut format = None;
    let mut multiple_of = None;
    for check in checks {
        match check {
            Check::NumberFormat { format: declared } => format = Some(*declared),
            Check::MultipleOf { value } => multiple_of = Some(*value),
            _ => {}
        }
    }
    if let Some(value) = checks.iter().find_map(|check| match check {
        Check::GreaterThan { value, .. } | Check::LessThan { value, .. } if !value.is_finite() => {
            Some(*value)
        }
        _ => None,
    }) {
        return Err(BoundsConflict::new(format!(
            "numeric bounds must be finite, got {value}"
        )));
    }
    if let Some(step) = multiple_of
        && !(step.is_finite() && step > 0.0)
    {
        return Err(BoundsConflict::new(format!(
            "multiple_of must be a positive number, got {step}"
        )));
    }

    match format {
        Some(format) if format.is_integer() => int_plan(checks, format, multiple_of),
        _ => float_plan(checks, format, multiple_of),
    }
}

fn int_plan(
    checks: &[Check],
    format: NumberFormat,
    multiple_of: Option<f64>,
) -> Result<NumberPlan, BoundsConflict> {
    let mut bounds: Bounds<i64> = Bounds::default();
    for check in checks {
        match check {
            Check::GreaterThan { value, inclusive } => bounds.tighten_min(if *inclusive {
                value.ceil() as i64
            } else {
                (value.floor() as i64).saturating_add(1)
            }),
            Check::LessThan { value, inclusive } => bounds.tighten_max(if *inclusive {
                value.floor() as i64
            } else {
                (value.ceil() as i64).saturating_sub(1)
            }),
            _ => {}
        }
    }
    bounds.check()?;

    let (mut min, mut max) = match (bounds.min, bounds.max) {
        (None, None) => DEFAULT_NUMBER_RANGE,
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min.saturating_add(WINDOW)),
        (None, Some(max)) => (max.saturating_sub(WINDOW), max),
    };
    let (format_min, format_max) = format.int_range();
    min = min.max(format_min);
    max = max.min(format_max);
    if min > max {
        return Err(BoundsConflict::new(format!(
            "no {} value between {min} and {max}",
            number_format_name(format)
        )));
    }

    let multiple_of = multiple_of.map(integer_step).transpose()?;
    if let Some(step) = multiple_of {
        integer_multiple_range(min, max, step)?;
    }
    Ok(NumberPlan::Int {
        min,
        max,
        multiple_of,
    })
}

fn float_plan(
    checks: &[Check],
    format: Option<NumberFormat>,
    multiple_of: Option<f64>,
) -> Result<NumberPlan, BoundsConflict> {
    let mut bounds: Bounds<f64> = Bounds::default();
    for check in checks {
        match check {
            Check::GreaterThan { value, inclusive } => bounds.tighten_min(if *inclusive {
                *value
            } else {
                *value + epsilon_step(*value)
            }),
            Check::LessThan { value, inclusive } => bounds.tighten_max(if *inclusive {
                *value
            } else {
                *value - epsilon_step(*value)
            }),
            _ => {}
        }
    }
    bounds.check()?;

    let window = WINDOW as f64;
    let (mut min, mut max) = match (bounds.min, bounds.max) {
        (None, None) => (
            DEFAULT_NUMBER_RANGE.0 as f64,
            DEFAULT_NUMBER_RANGE.1 as f64,
        ),
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min + window),
        (None, Some(max)) => (max - window, max),
    };
    if let Some(format) = format {
        let (format_min, format_max) = format.float_range();
        min = min.max(format_min);
        max = max.min(format_max);
    }
    if min > max {
        return Err(BoundsConflict::new(format!(
            "no number between {min} and {max}"
        )));
    }

    if let Some(step) = multiple_of {
        multiple_range(min, max, step)?;
    }
    Ok(NumberPlan::Float {
        min,
        max,
        multiple_of,
    })
}

/// Range of multipliers `k` with `k * step` inside `[min, max]`.
pub fn multiple_range(min: f64, max: f64, step: f64) -> Result<(i64, i64), BoundsConflict> {
    let low = (min / step).ceil();
    let high = (max / step).floor();
    if low > high {
        return Err(BoundsConflict::new(format!(
            "no multiple of {step} between {min} and {max}"
        )));
    }
    Ok((low as i64, high as i64))
}

/// Smallest positive integer that is a whole multiple of `step`.
pub fn integer_step(step: f64) -> Result<i64, BoundsConflict> {
    for multiplier in 1..=MAX_STEP_MULTIPLIER {
        let candidate = step * multiplier as f64;
        let rounded = candidate.round();
        if rounded > i64::MAX as f64 {
            break;
        }
        if rounded >= 1.0 && (candidate - rounded).abs() <= 1e-9 * rounded {
            return Ok(rounded as i64);
        }
    }
    Err(BoundsConflict::new(format!(
        "multiple_of {step} has no integer multiple"
    )))
}

/// Range of multipliers `k` with `k * step` inside `[min, max]`, for a
/// positive integer step.
pub fn integer_multiple_range(min: i64, max: i64, step: i64) -> Result<(i64, i64), BoundsConflict> {
    let (min, max, step) = (min as i128, max as i128, step as i128);
    let low = -((-min).div_euclid(step));
    let high = max.div_euclid(step);
    if low > high {
        return Err(BoundsConflict::new(format!(
            "no multiple of {step} between {min} and {max}"
        )));
    }
    Ok((low as i64, high as i64))
}

fn epsilon_step(value: f64) -> f64 {
    value.abs().max(1.0) * f64::EPSILON
}

fn number_format_name(format: NumberFormat) -> &'static str {
    match format {
        NumberFormat::Int => "int",
        NumberFormat::SafeInt => "safe_int",
        NumberFormat::Int32 => "int32",
        NumberFormat::Uint32 => "uint32",
        NumberFormat::Float32 => "float32",
        NumberFormat::Float64 => "float64",
    }
}

/// Big-integer range, windowed like integers.
pub fn big_int_range(checks: &[Check]) -> Result<(i128, i128), BoundsConflict> {
    let bounds = big_int_bounds(checks);
    bounds.check()?;
    let window = WINDOW as i128;
    Ok(match (bounds.min, bounds.max) {
        (None, None) => (
            DEFAULT_NUMBER_RANGE.0 as i128,
            DEFAULT_NUMBER_RANGE.1 as i128,
        ),
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min.saturating_add(window)),
        (None, Some(max)) => (max.saturating_sub(window), max),
    })
}

/// Inclusive date range; the default window is the year 2024.
pub fn date_range(checks: &[Check]) -> Result<(DateTime<Utc>, DateTime<Utc>), BoundsConflict> {
    let bounds = date_bounds(checks);
    bounds.check()?;
    let window = Duration::days(WINDOW);
    Ok(match (bounds.min, bounds.max) {
        (None, None) => default_date_range(),
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min.checked_add_signed(window).unwrap_or(min)),
        (None, Some(max)) => (max.checked_sub_signed(window).unwrap_or(max), max),
    })
}

pub fn default_date_range() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let end = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    (start, end - Duration::milliseconds(1))
}

/// Container size from explicit bounds and the configured default.
///
/// Explicit `min > max` is a conflict. When only the configured default
/// makes the range empty, the default side gives way to the explicit one.
pub fn container_size(
    explicit: Bounds<usize>,
    config: SizeBounds,
) -> Result<(usize, usize), BoundsConflict> {
    explicit.check()?;
    let min = explicit.min.unwrap_or(config.min);
    let max = explicit.max.unwrap_or(config.max);
    if min <= max {
        return Ok((min, max));
    }
    match (explicit.min, explicit.max) {
        (Some(_), None) => Ok((min, min)),
        (None, Some(_)) => Ok((max, max)),
        _ => Ok((min, min)),
    }
}
