//! `cpctl get clusters`: list or describe clusters.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use cpctl_core::{
    regions::{is_supported_region, supported_regions, DEFAULT_REGION},
    ClusterMeta, ClusterName, ControlPlaneSnapshot, WaitSettings,
};
use cpctl_engine::{list_clusters_each_region, ClientFactory, ClusterProvider, Enumeration};

use crate::client::HttpClientFactory;
use crate::GlobalArgs;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum GetCommand {
    /// Get cluster(s).
    #[command(alias = "cluster")]
    Clusters {
        /// Describe a single cluster instead of listing.
        #[arg(long, short = 'n', conflicts_with = "all_regions")]
        name: Option<String>,

        /// Region to query (defaults to us-west-2).
        #[arg(long, short = 'r', conflicts_with = "all_regions")]
        region: Option<String>,

        /// List clusters across all supported regions.
        #[arg(long, short = 'A')]
        all_regions: bool,

        /// Page size for list requests.
        #[arg(long, default_value_t = 100)]
        chunk_size: u32,

        /// Output format.
        #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

#[derive(Tabled)]
struct ClusterListRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "REGION")]
    region: String,
}

#[derive(Tabled)]
struct ClusterDetailRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

pub async fn run(command: GetCommand, global: &GlobalArgs) -> Result<()> {
    match command {
        GetCommand::Clusters {
            name,
            region,
            all_regions,
            chunk_size,
            output,
        } => {
            let region = region.unwrap_or_else(|| DEFAULT_REGION.to_string());
            if !all_regions && !is_supported_region(&region) {
                bail!("region {region:?} is not supported");
            }
            let factory = HttpClientFactory::new(global.endpoint()?);

            if let Some(name) = name {
                let provider =
                    ClusterProvider::new(factory.for_region(&region), WaitSettings::default());
                let snapshot = provider
                    .get_cluster(&ClusterName::from(name.as_str()))
                    .await
                    .with_context(|| format!("failed to describe cluster {name:?}"))?;
                return print_cluster(&snapshot, output);
            }

            if all_regions {
                let listing =
                    list_clusters_each_region(&factory, supported_regions(), chunk_size).await;
                print_clusters(&listing, output)
            } else {
                info!("using region {region}");
                let provider =
                    ClusterProvider::new(factory.for_region(&region), WaitSettings::default());
                let clusters = provider
                    .list_clusters(chunk_size)
                    .await
                    .with_context(|| format!("failed to list clusters in {region:?}"))?;
                print_clusters(
                    &Enumeration {
                        items: clusters,
                        failed: Vec::new(),
                    },
                    output,
                )
            }
        }
    }
}

fn print_clusters(listing: &Enumeration<ClusterMeta>, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(listing).context("failed to serialize clusters JSON")?
            );
        }
        OutputFormat::Table => {
            if listing.items.is_empty() {
                println!("No clusters found.");
            } else {
                let rows: Vec<ClusterListRow> = listing
                    .items
                    .iter()
                    .map(|c| ClusterListRow {
                        name: c.name.to_string(),
                        region: c.region.clone(),
                    })
                    .collect();
                let mut table = Table::new(rows);
                table.with(Style::blank());
                println!("{table}");
            }
            if !listing.failed.is_empty() {
                let failed: Vec<&str> =
                    listing.failed.iter().map(|f| f.partition.as_str()).collect();
                println!(
                    "{} listing failed in: {}",
                    "warning:".yellow().bold(),
                    failed.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn print_cluster(snapshot: &ControlPlaneSnapshot, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(snapshot).context("failed to serialize cluster JSON")?
            );
        }
        OutputFormat::Table => {
            let row = ClusterDetailRow {
                name: snapshot.name.to_string(),
                version: snapshot.version.clone().unwrap_or_else(|| "-".to_string()),
                status: snapshot.status.to_string(),
                created: format_created(snapshot.created_at),
            };
            let mut table = Table::new([row]);
            table.with(Style::blank());
            println!("{table}");
        }
    }
    Ok(())
}

fn format_created(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(at) => at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => "-".to_string(),
    }
}
