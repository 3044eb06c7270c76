/// Terminal configuration errors.
///
/// These are raised by the pagination path's hard validation, run on every merged
/// settings value, in the order the variants are declared. They are not recoverable:
/// once a [`crate::Paginator`] has failed validation it returns the same error from
/// every subsequent operation and never emits another instruction.
///
/// The raw path ([`crate::SignalConditioner`]) never raises these; it falls back to
/// defaults instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettingsError {
    #[error("content height is required for pagination but was never provided")]
    MissingContentHeight,
    #[error("content height is not a usable number")]
    InvalidContentHeight,
    #[error("content height must be greater than zero")]
    NonPositiveContentHeight,
    #[error("min quantity is not a usable number")]
    InvalidMinQuantity,
    #[error("min quantity must not be negative")]
    NegativeMinQuantity,
    #[error("max quantity is not a usable number")]
    InvalidMaxQuantity,
    #[error("max quantity must be at least one")]
    MaxQuantityBelowOne,
    #[error("min quantity must not exceed max quantity")]
    MinExceedsMax,
}
