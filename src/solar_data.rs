//! Main entry point: loads the per-source tables into a cleaned [`CanonicalFrame`] and
//! memoizes the result so that repeated interactions with the same uploads skip parsing and
//! imputation.

use crate::cleaning::imputer::impute_group_means;
use crate::error::SolarError;
use crate::frames::canonical_frame::CanonicalFrame;
use crate::loading::loader::TableLoader;
use crate::loading::options::LoadOptions;
use crate::types::source_input::SourceInput;
use crate::types::variable::Variable;
use log::{debug, info};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

/// Loads, merges and imputes the given sources in one step.
///
/// Imputation targets that are not a column of the merged table are skipped. The returned
/// frame carries the [`crate::ImputationReport`] of the run.
///
/// # Errors
///
/// Returns [`SolarError::Load`] if any input fails to load; no partial dataset is produced.
///
/// # Examples
///
/// ```
/// use solarscope::{load_sources, LoadOptions, SourceInput, Variable};
///
/// let csv = "Timestamp,GHI,Tamb\n2021-08-09 00:00,100,25\n2021-08-09 00:01,,26\n";
/// let dataset = load_sources(&[SourceInput::from_bytes("Benin", csv)], &LoadOptions::default())?;
///
/// assert_eq!(dataset.sources(), ["Benin"]);
/// assert_eq!(dataset.variables(), [Variable::Ghi, Variable::Tamb]);
/// assert_eq!(dataset.imputation_report().filled, 1);
/// # Ok::<(), solarscope::SolarError>(())
/// ```
pub fn load_sources(
    inputs: &[SourceInput],
    options: &LoadOptions,
) -> Result<CanonicalFrame, SolarError> {
    let merged = TableLoader::new(options).merge(inputs)?;

    let targets: Vec<Variable> = options
        .impute_targets()
        .iter()
        .copied()
        .filter(|variable| merged.column(variable.column_name()).is_ok())
        .collect();
    if targets.len() < options.impute_targets().len() {
        debug!(
            "Skipping imputation targets absent from the table, imputing {:?}",
            targets
        );
    }

    let imputation = impute_group_means(&merged, &targets)?;
    let labels = inputs
        .iter()
        .map(|input| input.label().to_string())
        .collect();

    Ok(CanonicalFrame::new(
        imputation.frame,
        labels,
        imputation.report,
    ))
}

/// Number of cleaned datasets [`SolarData`] keeps unless configured otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Cleaned datasets by input fingerprint; the oldest entry is evicted once `capacity` is
/// exceeded.
#[derive(Debug)]
struct FrameCache {
    capacity: usize,
    entries: HashMap<u64, CanonicalFrame>,
    order: VecDeque<u64>,
}

impl FrameCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Stores `dataset` unless the key is already present, and returns the cached value.
    fn insert(&mut self, key: u64, dataset: CanonicalFrame) -> CanonicalFrame {
        // Another caller may have loaded the same inputs while the lock was released.
        if let Some(existing) = self.entries.get(&key) {
            return existing.clone();
        }
        self.entries.insert(key, dataset.clone());
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                debug!("Evicting cached dataset {:x}", oldest);
                self.entries.remove(&oldest);
            }
        }
        dataset
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Loader with an in-memory cache of cleaned datasets.
///
/// The cache is keyed by a fingerprint of the source labels, the raw bytes and the
/// [`LoadOptions`]; identical uploads return a clone of the stored [`CanonicalFrame`]
/// instead of being parsed again. At most [`DEFAULT_CACHE_CAPACITY`] datasets are kept,
/// see [`SolarData::with_cache_capacity`].
///
/// # Examples
///
/// ```
/// use solarscope::{SolarData, SourceInput};
///
/// let data = SolarData::new();
/// let inputs = [SourceInput::from_bytes("Togo", "Timestamp,GHI\n2021-10-25 00:00,10\n")];
///
/// let first = data.load(&inputs)?;
/// let second = data.load(&inputs)?;
/// assert_eq!(data.cached_len(), 1);
/// assert!(first.frame().equals_missing(second.frame()));
/// # Ok::<(), solarscope::SolarError>(())
/// ```
#[derive(Debug)]
pub struct SolarData {
    options: LoadOptions,
    cache: Mutex<FrameCache>,
}

impl Default for SolarData {
    fn default() -> Self {
        Self::with_options(LoadOptions::default())
    }
}

impl SolarData {
    /// Creates a loader using [`LoadOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            cache: Mutex::new(FrameCache::new(DEFAULT_CACHE_CAPACITY)),
        }
    }

    /// Keeps at most `capacity` datasets (minimum 1), evicting the oldest first. Drops
    /// anything cached so far.
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            options: self.options,
            cache: Mutex::new(FrameCache::new(capacity)),
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Returns the cleaned dataset for `inputs`, from the cache if these exact inputs were
    /// loaded before.
    ///
    /// # Errors
    ///
    /// See [`load_sources`]. Failed loads are not cached.
    pub fn load(&self, inputs: &[SourceInput]) -> Result<CanonicalFrame, SolarError> {
        let key = self.fingerprint(inputs);

        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.entries.get(&key) {
                debug!("Cache hit for {} source(s)", inputs.len());
                return Ok(cached.clone());
            }
        }

        let dataset = load_sources(inputs, &self.options)?;
        info!(
            "Loaded {} rows from {} source(s)",
            dataset.height(),
            dataset.sources().len()
        );

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.insert(key, dataset))
    }

    /// Number of datasets held in the cache.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn fingerprint(&self, inputs: &[SourceInput]) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.options.hash(&mut hasher);
        for input in inputs {
            input.fingerprint_into(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_inputs, TOGO_CSV};
    use crate::LoadError;
    use std::error::Error;
    use std::io::Write;

    #[test]
    fn test_load_keeps_input_order_and_report() -> Result<(), Box<dyn Error>> {
        let dataset = load_sources(&sample_inputs(), &LoadOptions::default())?;

        assert_eq!(dataset.sources(), ["Benin", "Sierra Leone", "Togo"]);
        assert_eq!(dataset.height(), 7);
        // Benin GHI and Sierra Leone DNI are filled; Sierra Leone Tamb cannot be.
        assert_eq!(dataset.imputation_report().filled, 2);
        let warnings = &dataset.imputation_report().warnings;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "Sierra Leone");
        assert_eq!(warnings[0].variable, Variable::Tamb);
        Ok(())
    }

    #[test]
    fn test_absent_targets_are_skipped() -> Result<(), Box<dyn Error>> {
        let options = LoadOptions::builder()
            .impute(vec![Variable::Ghi, Variable::Precipitation])
            .build();
        let dataset = load_sources(&[SourceInput::from_bytes("Togo", TOGO_CSV)], &options)?;
        assert_eq!(dataset.imputation_report().filled, 0);
        assert!(!dataset.variables().contains(&Variable::Precipitation));
        Ok(())
    }

    #[test]
    fn test_load_failure_is_atomic() {
        let inputs = vec![
            SourceInput::from_bytes("Benin", "Timestamp,GHI\n2021-08-09 00:00,1\n"),
            SourceInput::from_bytes("Togo", "Time,GHI\n2021-08-09 00:00,1\n"),
        ];
        let data = SolarData::new();
        let result = data.load(&inputs);

        assert!(matches!(
            result,
            Err(SolarError::Load(LoadError::MissingTimestampColumn { .. }))
        ));
        assert_eq!(data.cached_len(), 0);
    }

    #[test]
    fn test_cache_is_keyed_by_content() -> Result<(), Box<dyn Error>> {
        let data = SolarData::new();
        data.load(&sample_inputs())?;
        data.load(&sample_inputs())?;
        assert_eq!(data.cached_len(), 1);

        // Same labels, different content.
        let mut changed = sample_inputs();
        changed[2] = SourceInput::from_bytes("Togo", "Timestamp,GHI\n2021-10-25 00:00,11\n");
        data.load(&changed)?;
        assert_eq!(data.cached_len(), 2);

        // Same content, different labels.
        let mut relabelled = sample_inputs();
        relabelled[2] = SourceInput::from_bytes("Togo North", TOGO_CSV);
        data.load(&relabelled)?;
        assert_eq!(data.cached_len(), 3);

        data.clear_cache();
        assert_eq!(data.cached_len(), 0);
        Ok(())
    }

    #[test]
    fn test_cache_evicts_oldest_beyond_capacity() -> Result<(), Box<dyn Error>> {
        let data = SolarData::new().with_cache_capacity(2);
        let togo = |ghi: u32| {
            vec![SourceInput::from_bytes(
                "Togo",
                format!("Timestamp,GHI\n2021-10-25 00:00,{ghi}\n"),
            )]
        };

        data.load(&togo(1))?;
        data.load(&togo(2))?;
        data.load(&togo(3))?;
        assert_eq!(data.cached_len(), 2);

        let cache = data.cache.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(!cache.entries.contains_key(&data.fingerprint(&togo(1))));
        assert!(cache.entries.contains_key(&data.fingerprint(&togo(3))));
        Ok(())
    }

    #[test]
    fn test_non_finite_input_is_imputed_from_finite_values() -> Result<(), Box<dyn Error>> {
        let input = SourceInput::from_bytes(
            "Benin",
            "Timestamp,GHI,Tamb\n\
             2021-08-09 00:00,NaN,24\n\
             2021-08-09 00:10,10,inf\n\
             2021-08-09 00:20,30,\n\
             2021-08-09 00:30,,26\n",
        );
        let dataset = load_sources(&[input], &LoadOptions::default())?;

        let ghi = crate::columns::float_values(dataset.frame(), Variable::Ghi)?;
        assert_eq!(ghi, [Some(20.0), Some(10.0), Some(30.0), Some(20.0)]);
        let tamb = crate::columns::float_values(dataset.frame(), Variable::Tamb)?;
        assert_eq!(tamb, [Some(24.0), Some(25.0), Some(25.0), Some(26.0)]);
        assert_eq!(dataset.imputation_report().filled, 4);
        assert!(!dataset.imputation_report().has_warnings());
        Ok(())
    }

    #[test]
    fn test_options_are_part_of_the_key() -> Result<(), Box<dyn Error>> {
        let defaults = SolarData::new();
        let only_ghi = SolarData::with_options(LoadOptions::builder().impute(vec![Variable::Ghi]).build());

        assert_ne!(
            defaults.fingerprint(&sample_inputs()),
            only_ghi.fingerprint(&sample_inputs())
        );
        // Without DNI as a target, Sierra Leone's gap stays.
        assert_eq!(only_ghi.load(&sample_inputs())?.imputation_report().filled, 1);
        Ok(())
    }

    #[test]
    fn test_load_from_path() -> Result<(), Box<dyn Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(TOGO_CSV.as_bytes())?;

        let input = SourceInput::from_path("Togo", file.path())?;
        let dataset = SolarData::new().load(&[input])?;
        assert_eq!(dataset.height(), 2);

        let missing = SourceInput::from_path("Togo", file.path().with_extension("missing"));
        assert!(matches!(missing, Err(LoadError::Io { .. })));
        Ok(())
    }
}
