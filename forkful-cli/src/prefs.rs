//! `show`, `record` and `reset`: direct access to the preference record.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use forkful_core::{Facet, KeyValueStore, PreferenceSet, PreferenceStore};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{Backend, StoreConfig};
use crate::{ARG_BACKEND, ARG_CATEGORY, ARG_PRICE, ARG_STORE_DIR, CliError, write_json};

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "show", about = "Print the learned preferences as JSON")]
#[ortho_config(prefix = "FORKFUL")]
pub(crate) struct ShowArgs {
    /// Directory holding the preference record.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// Storage backend for the preference record.
    #[arg(long = ARG_BACKEND, value_enum)]
    #[serde(default)]
    pub(crate) backend: Option<Backend>,
}

/// CLI arguments for the `record` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "record",
    long_about = "Reinforce preferences as if the diner had searched for a \
                  category or tapped a price tier. Blank values are ignored.",
    about = "Reinforce a category and/or price tier"
)]
#[ortho_config(prefix = "FORKFUL")]
pub(crate) struct RecordArgs {
    /// Directory holding the preference record.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// Storage backend for the preference record.
    #[arg(long = ARG_BACKEND, value_enum)]
    #[serde(default)]
    pub(crate) backend: Option<Backend>,
    /// Category the diner searched for.
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Price tier the diner selected, such as `€€`.
    #[arg(long = ARG_PRICE, value_name = "tier")]
    #[serde(default)]
    pub(crate) price: Option<String>,
}

/// CLI arguments for the `reset` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "reset", about = "Forget every learned preference")]
#[ortho_config(prefix = "FORKFUL")]
pub(crate) struct ResetArgs {
    /// Directory holding the preference record.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// Storage backend for the preference record.
    #[arg(long = ARG_BACKEND, value_enum)]
    #[serde(default)]
    pub(crate) backend: Option<Backend>,
}

/// Resolved `record` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordConfig {
    pub(crate) store: StoreConfig,
    pub(crate) category: Option<String>,
    pub(crate) price: Option<String>,
}

impl TryFrom<RecordArgs> for RecordConfig {
    type Error = CliError;

    fn try_from(args: RecordArgs) -> Result<Self, Self::Error> {
        if args.category.is_none() && args.price.is_none() {
            return Err(CliError::NothingToRecord);
        }
        Ok(Self {
            store: StoreConfig::resolve(args.store_dir, args.backend),
            category: args.category,
            price: args.price,
        })
    }
}

pub(crate) fn run_show_with(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let store = StoreConfig::resolve(merged.store_dir, merged.backend).open()?;
    let preferences = store
        .try_load()
        .map_err(CliError::LoadPreferences)?
        .unwrap_or_default();
    write_json(writer, &preferences)
}

pub(crate) fn run_record_with(args: RecordArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = RecordConfig::try_from(merged)?;
    let preferences = record(&config)?;
    write_json(writer, &preferences)
}

fn record(config: &RecordConfig) -> Result<PreferenceSet, CliError> {
    let store = config.store.open()?;
    record_into(&store, config.category.as_deref(), config.price.as_deref())
}

pub(crate) fn record_into<S: KeyValueStore>(
    store: &PreferenceStore<S>,
    category: Option<&str>,
    price: Option<&str>,
) -> Result<PreferenceSet, CliError> {
    let mut recorded: Option<PreferenceSet> = None;
    for (facet, key) in [(Facet::Category, category), (Facet::PriceRange, price)] {
        if let Some(key) = key {
            let mirror = recorded.unwrap_or_default();
            recorded = Some(store.increment_over(&mirror, facet, key));
        }
    }
    recorded.ok_or(CliError::NothingToRecord)
}

pub(crate) fn run_reset_with(args: ResetArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let store = StoreConfig::resolve(merged.store_dir, merged.backend).open()?;
    write_json(writer, &store.reset())
}

#[cfg(test)]
pub(crate) fn record_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecordConfig, CliError> {
    let merged = RecordArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecordConfig::try_from(merged)
}
