//! Parallel processing configuration
//!
//! The histogram engine counts bins and sorts samples on Rayon's global pool.
//! This module sizes that pool.

use crate::errors::{HistogramError, Result};
use log::info;
use rayon::ThreadPoolBuilder;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Set up the global Rayon thread pool with the specified configuration.
    ///
    /// The global pool can only be built once per process.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::ThreadPoolError`] if the pool was already
    /// initialised or cannot be built.
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    HistogramError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;

            info!("Configured parallel processing with {} threads", num_threads);
        } else {
            info!(
                "Using default thread pool ({} threads)",
                rayon::current_num_threads()
            );
        }

        Ok(())
    }

    /// Get the current number of threads being used
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}
