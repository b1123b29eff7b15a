//! Holder pool configuration

/// Default number of holder cells added each time a pool runs dry.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Configuration for the per-thread holder pools.
///
/// Applied with [`pool::configure`](crate::pool::configure); takes effect for
/// every pool growth after the call on the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of cells reserved per growth step (at least 1)
    pub chunk_size: usize,

    /// When false, holders go straight to the global allocator
    pub enabled: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            enabled: true,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with a custom chunk size.
    ///
    /// A chunk size of zero is treated as one.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..Default::default()
        }
    }

    /// Create a configuration that bypasses pooling entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfig::new();
        assert_eq!(config.chunk_size, 64);
        assert!(config.enabled);
    }

    #[test]
    fn test_zero_chunk_clamped() {
        assert_eq!(PoolConfig::with_chunk_size(0).chunk_size, 1);
        assert!(!PoolConfig::disabled().enabled);
    }
}
