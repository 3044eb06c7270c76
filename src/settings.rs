use crate::SettingsError;

/// A partial settings update.
///
/// Every field is optional; fields left `None` retain their previous merged value.
/// Values come in as floats so that the engine can apply the same sanitation and
/// validation rules regardless of where the numbers originated (UI layers tend to
/// hand over whatever they were given).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingsUpdate {
    /// Average rendered height of one item, in px. Required for pagination.
    pub content_height: Option<f64>,
    /// Extra look-ahead height, in px. Increases generate synthetic fetch signals.
    pub buffer: Option<f64>,
    /// Emission floor, in items. Pagination only.
    pub min_quantity: Option<f64>,
    /// Emission ceiling / chunk size, in items. Pagination only.
    pub max_quantity: Option<f64>,
    /// Coalesce-and-delay window over motion deltas, in ms.
    pub debounce_ms: Option<f64>,
    /// Post-emission refractory window, in ms.
    pub throttle_ms: Option<f64>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_height(mut self, px: f64) -> Self {
        self.content_height = Some(px);
        self
    }

    pub fn with_buffer(mut self, px: f64) -> Self {
        self.buffer = Some(px);
        self
    }

    pub fn with_min_quantity(mut self, count: f64) -> Self {
        self.min_quantity = Some(count);
        self
    }

    pub fn with_max_quantity(mut self, count: f64) -> Self {
        self.max_quantity = Some(count);
        self
    }

    pub fn with_debounce_ms(mut self, ms: f64) -> Self {
        self.debounce_ms = Some(ms);
        self
    }

    pub fn with_throttle_ms(mut self, ms: f64) -> Self {
        self.throttle_ms = Some(ms);
        self
    }
}

/// The cumulative settings value: each update is shallow-merged over the previous one.
///
/// Soft fields (`buffer`, `debounce_ms`, `throttle_ms`) are sanitized at merge time: a
/// negative or non-finite number is treated as "not provided" and falls back to the
/// field default. `content_height`, `min_quantity` and `max_quantity` are stored as
/// given, because the pagination path reports bad values as hard errors instead of
/// silently defaulting them (see [`EngineSettings::validate`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineSettings {
    content_height: Option<f64>,
    buffer: f64,
    min_quantity: Option<f64>,
    max_quantity: Option<f64>,
    debounce_ms: u64,
    throttle_ms: u64,
}

fn soft_px(px: f64) -> f64 {
    if px.is_finite() && px >= 0.0 { px } else { 0.0 }
}

fn soft_ms(ms: f64) -> u64 {
    if ms.is_finite() && ms >= 0.0 {
        ms as u64
    } else {
        0
    }
}

impl EngineSettings {
    /// Merges a partial update over this value, returning the new cumulative value.
    ///
    /// Pure: the result depends only on `(self, update)`. The caller decides whether
    /// to commit it (the pagination path validates first so a bad update is never
    /// partially applied).
    #[must_use]
    pub fn merge(&self, update: &SettingsUpdate) -> Self {
        Self {
            content_height: update.content_height.or(self.content_height),
            buffer: update.buffer.map(soft_px).unwrap_or(self.buffer),
            min_quantity: update.min_quantity.or(self.min_quantity),
            max_quantity: update.max_quantity.or(self.max_quantity),
            debounce_ms: update.debounce_ms.map(soft_ms).unwrap_or(self.debounce_ms),
            throttle_ms: update.throttle_ms.map(soft_ms).unwrap_or(self.throttle_ms),
        }
    }

    /// Content height usable by the raw path: `Some` only when finite and positive.
    pub fn effective_content_height(&self) -> Option<f64> {
        self.content_height
            .filter(|h| h.is_finite() && *h > 0.0)
    }

    pub fn content_height(&self) -> Option<f64> {
        self.content_height
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    pub fn min_quantity(&self) -> Option<f64> {
        self.min_quantity
    }

    pub fn max_quantity(&self) -> Option<f64> {
        self.max_quantity
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn throttle_ms(&self) -> u64 {
        self.throttle_ms
    }

    /// Runs the pagination path's hard validation over this merged value.
    ///
    /// Checks run in declaration order of [`SettingsError`]: content height first, then
    /// min quantity, then max quantity, then their relation. The first failure wins.
    pub fn validate(&self) -> Result<PagerLimits, SettingsError> {
        let content_height = self
            .content_height
            .ok_or(SettingsError::MissingContentHeight)?;
        if !content_height.is_finite() {
            return Err(SettingsError::InvalidContentHeight);
        }
        if content_height <= 0.0 {
            return Err(SettingsError::NonPositiveContentHeight);
        }

        let min_quantity = match self.min_quantity {
            Some(min) if !min.is_finite() => return Err(SettingsError::InvalidMinQuantity),
            Some(min) if min < 0.0 => return Err(SettingsError::NegativeMinQuantity),
            Some(min) => Some(min),
            None => None,
        };
        let max_quantity = match self.max_quantity {
            Some(max) if !max.is_finite() => return Err(SettingsError::InvalidMaxQuantity),
            Some(max) if max < 1.0 => return Err(SettingsError::MaxQuantityBelowOne),
            Some(max) => Some(max),
            None => None,
        };
        if let (Some(min), Some(max)) = (min_quantity, max_quantity) {
            if min > max {
                return Err(SettingsError::MinExceedsMax);
            }
        }

        Ok(PagerLimits {
            content_height,
            min_quantity: min_quantity.map(|m| m as u64),
            max_quantity: max_quantity.map(|m| m as u64),
        })
    }
}

/// Validated limits used by the pagination accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerLimits {
    /// Always finite and > 0.
    pub content_height: f64,
    pub min_quantity: Option<u64>,
    pub max_quantity: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_last_write_wins_per_field() {
        let a = EngineSettings::default().merge(
            &SettingsUpdate::new()
                .with_content_height(50.0)
                .with_debounce_ms(100.0),
        );
        let b = a.merge(&SettingsUpdate::new().with_debounce_ms(250.0));

        assert_eq!(b.content_height(), Some(50.0));
        assert_eq!(b.debounce_ms(), 250);
        // Untouched fields keep their defaults.
        assert_eq!(b.buffer(), 0.0);
        assert_eq!(b.throttle_ms(), 0);
    }

    #[test]
    fn soft_fields_fall_back_on_negative_or_nan() {
        let s = EngineSettings::default().merge(
            &SettingsUpdate::new()
                .with_buffer(-10.0)
                .with_debounce_ms(f64::NAN)
                .with_throttle_ms(-1.0),
        );
        assert_eq!(s.buffer(), 0.0);
        assert_eq!(s.debounce_ms(), 0);
        assert_eq!(s.throttle_ms(), 0);
    }

    #[test]
    fn soft_fallback_does_not_resurrect_previous_value() {
        // A negative update means "back to the default", not "keep the old value".
        let a = EngineSettings::default().merge(&SettingsUpdate::new().with_buffer(500.0));
        let b = a.merge(&SettingsUpdate::new().with_buffer(-1.0));
        assert_eq!(b.buffer(), 0.0);
    }

    #[test]
    fn effective_content_height_ignores_bad_values() {
        let neg = EngineSettings::default().merge(&SettingsUpdate::new().with_content_height(-5.0));
        assert_eq!(neg.effective_content_height(), None);

        let nan =
            EngineSettings::default().merge(&SettingsUpdate::new().with_content_height(f64::NAN));
        assert_eq!(nan.effective_content_height(), None);

        let ok = EngineSettings::default().merge(&SettingsUpdate::new().with_content_height(48.5));
        assert_eq!(ok.effective_content_height(), Some(48.5));
    }

    #[test]
    fn validate_checks_content_height_first() {
        // Both content height and min quantity are invalid; content height wins.
        let s = EngineSettings::default().merge(&SettingsUpdate::new().with_min_quantity(-3.0));
        assert_eq!(s.validate(), Err(SettingsError::MissingContentHeight));

        let s = s.merge(&SettingsUpdate::new().with_content_height(f64::INFINITY));
        assert_eq!(s.validate(), Err(SettingsError::InvalidContentHeight));

        let s = s.merge(&SettingsUpdate::new().with_content_height(0.0));
        assert_eq!(s.validate(), Err(SettingsError::NonPositiveContentHeight));

        let s = s.merge(&SettingsUpdate::new().with_content_height(50.0));
        assert_eq!(s.validate(), Err(SettingsError::NegativeMinQuantity));
    }

    #[test]
    fn validate_quantity_rules() {
        let base = EngineSettings::default().merge(&SettingsUpdate::new().with_content_height(50.0));

        let s = base.merge(&SettingsUpdate::new().with_min_quantity(f64::NAN));
        assert_eq!(s.validate(), Err(SettingsError::InvalidMinQuantity));

        let s = base.merge(&SettingsUpdate::new().with_max_quantity(0.0));
        assert_eq!(s.validate(), Err(SettingsError::MaxQuantityBelowOne));

        let s = base.merge(&SettingsUpdate::new().with_max_quantity(f64::NAN));
        assert_eq!(s.validate(), Err(SettingsError::InvalidMaxQuantity));

        let s = base.merge(
            &SettingsUpdate::new()
                .with_min_quantity(60.0)
                .with_max_quantity(50.0),
        );
        assert_eq!(s.validate(), Err(SettingsError::MinExceedsMax));

        let s = base.merge(
            &SettingsUpdate::new()
                .with_min_quantity(20.0)
                .with_max_quantity(50.0),
        );
        let limits = s.validate().unwrap();
        assert_eq!(limits.min_quantity, Some(20));
        assert_eq!(limits.max_quantity, Some(50));
        assert_eq!(limits.content_height, 50.0);
    }
}
