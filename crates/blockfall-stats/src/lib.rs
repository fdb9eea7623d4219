//! Small statistics toolkit used by weight calibration.
//!
//! - [`descriptive`]: min, max, mean, median and spread of a sample
//! - [`regression`]: ordinary least squares fit of a linear model
//!
//! # Example
//!
//! ```
//! use blockfall_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([100.0, 300.0, 200.0]).unwrap();
//! assert_eq!(stats.mean, 200.0);
//! assert_eq!(stats.median, 200.0);
//! ```

pub mod descriptive;
pub mod regression;
