//! Persistent output of the scraper.
//!
//! # Submodules
//!
//! - [`dataset`]: per-outlet CSV files (load, render, atomic replace, provisioning)
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── ap_data.csv
//! ├── breitbart_data.csv
//! ├── ...
//! └── wt_data.csv
//! ```

pub mod dataset;
