/// Configuration errors detected at construction time.
///
/// Every variant means the caller asked for a layout that would corrupt spatial
/// addressing if silently truncated, so construction is refused instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{what} must be a power of two, got {value}")]
    NotPowerOfTwo { what: &'static str, value: u32 },
    #[error("coordinate ({x}, {y}) exceeds the 16-bit Morton limit")]
    CoordinateOutOfRange { x: u32, y: u32 },
    #[error("max depth {max_depth} needs {nodes} nodes, more than a u32 index can address")]
    TreeTooDeep { max_depth: u32, nodes: u64 },
    #[error("root size {size} cannot be halved {levels} times without losing integer footprints")]
    RootNotDivisible { size: i32, levels: u32 },
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Check that a strictly positive, finite float parameter is valid.
pub fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            name,
            format!("expected a positive finite value, got {value}"),
        ))
    }
}

/// Check that `value` is a non-zero power of two.
pub fn ensure_power_of_two(what: &'static str, value: u32) -> Result<(), ConfigError> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(ConfigError::NotPowerOfTwo { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check() {
        assert!(ensure_positive("range", 1.0).is_ok());
        assert!(ensure_positive("range", 0.0).is_err());
        assert!(ensure_positive("range", f32::NAN).is_err());
        assert!(ensure_positive("range", f32::INFINITY).is_err());
    }

    #[test]
    fn power_of_two_check() {
        assert!(ensure_power_of_two("tile", 64).is_ok());
        assert_eq!(
            ensure_power_of_two("tile", 48),
            Err(ConfigError::NotPowerOfTwo {
                what: "tile",
                value: 48
            })
        );
        assert!(ensure_power_of_two("tile", 0).is_err());
    }

    #[test]
    fn error_messages_name_the_parameter() {
        let err = ConfigError::invalid("lod_zero_range", "must be positive");
        assert_eq!(err.to_string(), "invalid lod_zero_range: must be positive");
    }
}
