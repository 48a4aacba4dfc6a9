//! `rank` and `reservations`: run the ranking engine over JSON listings.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use forkful_core::{Reservation, Restaurant};
use forkful_fs::open_utf8_file;
use forkful_ranker::{RankQuery, RankingEngine};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::{Backend, StoreConfig};
use crate::{
    ARG_BACKEND, ARG_PRICE, ARG_QUERY, ARG_RESERVATIONS, ARG_RESTAURANTS, ARG_STORE_DIR, CliError,
    ENV_RESERVATIONS, ENV_RESTAURANTS, require_existing, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Filter a JSON array of restaurant rows by name or category \
                  and by exact price tier, then order the matches by the \
                  learned preferences. Equally scored restaurants keep their \
                  listing order.",
    about = "Filter and rank a restaurant listing"
)]
#[ortho_config(prefix = "FORKFUL")]
pub(crate) struct RankArgs {
    /// Path to a JSON array of restaurant rows.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) restaurants_path: Option<Utf8PathBuf>,
    /// Directory holding the preference record.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// Storage backend for the preference record.
    #[arg(long = ARG_BACKEND, value_enum)]
    #[serde(default)]
    pub(crate) backend: Option<Backend>,
    /// Case-insensitive text matched against names and categories.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Price tier restaurants must match exactly.
    #[arg(long = ARG_PRICE, value_name = "tier")]
    #[serde(default)]
    pub(crate) price: Option<String>,
}

/// CLI arguments for the `reservations` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reservations",
    about = "Filter reservations by restaurant name, status or location"
)]
#[ortho_config(prefix = "FORKFUL")]
pub(crate) struct ReservationsArgs {
    /// Path to a JSON array of reservation rows.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) reservations_path: Option<Utf8PathBuf>,
    /// Case-insensitive text matched against name, status and location.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
}

/// Resolved `rank` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    pub(crate) restaurants_path: Utf8PathBuf,
    pub(crate) store: StoreConfig,
    pub(crate) query: RankQuery,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let restaurants_path = args.restaurants_path.ok_or(CliError::MissingArgument {
            field: ARG_RESTAURANTS,
            env: ENV_RESTAURANTS,
        })?;
        let query = RankQuery::new()
            .with_text(args.query.unwrap_or_default())
            .with_price(args.price.unwrap_or_default());
        Ok(Self {
            restaurants_path,
            store: StoreConfig::resolve(args.store_dir, args.backend),
            query,
        })
    }
}

/// Resolved `reservations` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReservationsConfig {
    pub(crate) reservations_path: Utf8PathBuf,
    pub(crate) query: RankQuery,
}

impl TryFrom<ReservationsArgs> for ReservationsConfig {
    type Error = CliError;

    fn try_from(args: ReservationsArgs) -> Result<Self, Self::Error> {
        let reservations_path = args.reservations_path.ok_or(CliError::MissingArgument {
            field: ARG_RESERVATIONS,
            env: ENV_RESERVATIONS,
        })?;
        Ok(Self {
            reservations_path,
            query: RankQuery::new().with_text(args.query.unwrap_or_default()),
        })
    }
}

/// A ranked restaurant row with the score it was ordered by.
#[derive(Debug, Serialize)]
pub(crate) struct RankedRestaurant<'a> {
    #[serde(flatten)]
    pub(crate) restaurant: &'a Restaurant,
    pub(crate) score: u64,
}

pub(crate) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = RankConfig::try_from(merged)?;
    require_existing(&config.restaurants_path, ARG_RESTAURANTS)?;
    let restaurants: Vec<Restaurant> = load_rows(&config.restaurants_path, ARG_RESTAURANTS)?;
    let preferences = config.store.open()?.load();

    let ranked: Vec<_> = RankingEngine::for_restaurants()
        .rank_scored(&restaurants, &config.query, &preferences)
        .into_iter()
        .map(|ranked| RankedRestaurant {
            restaurant: ranked.candidate,
            score: ranked.score,
        })
        .collect();
    write_json(writer, &ranked)
}

pub(crate) fn run_reservations_with(
    args: ReservationsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ReservationsConfig::try_from(merged)?;
    require_existing(&config.reservations_path, ARG_RESERVATIONS)?;
    let reservations: Vec<Reservation> = load_rows(&config.reservations_path, ARG_RESERVATIONS)?;
    let matching = RankingEngine::for_reservations().filter(&reservations, &config.query);
    write_json(writer, &matching)
}

/// Loads a JSON array of backend rows from disk.
pub(crate) fn load_rows<T: DeserializeOwned>(
    path: &Utf8Path,
    field: &'static str,
) -> Result<Vec<T>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenCandidates {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseCandidates {
        field,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn rank_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
