//! Voter-table address source.
//!
//! The planner only needs the list of addresses for a batch. `AddressSource`
//! reads them page by page from the voter store; `SupabaseStore` talks to a
//! PostgREST endpoint with the store's filter vocabulary.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ConfigError, StoreError};
use crate::traits::Address;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Target-voter flag filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetVoter {
    #[default]
    Any,
    Target,
    NonTarget,
}

/// Filters understood by the voter store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoterFilter {
    /// Case-insensitive match against id, name, address and party.
    pub search: Option<String>,
    pub precinct: Option<i64>,
    pub split: Option<i64>,
    pub target: TargetVoter,
}

/// One page of addresses. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressPage {
    pub addresses: Vec<Address>,
    pub page: usize,
    /// Total matching rows, when the store reports it.
    pub total: Option<usize>,
}

pub trait AddressSource {
    fn fetch_page(
        &self,
        filter: &VoterFilter,
        page: usize,
        limit: usize,
    ) -> Result<AddressPage, StoreError>;
}

/// Read every matching address, de-duplicated in first-seen order.
///
/// Blank addresses are skipped. `max_addresses` stops early once enough
/// distinct addresses have been collected.
pub fn collect_addresses<S: AddressSource + ?Sized>(
    source: &S,
    filter: &VoterFilter,
    page_size: usize,
    max_addresses: Option<usize>,
) -> Result<Vec<Address>, StoreError> {
    let page_size = page_size.max(1);
    let mut seen = HashSet::new();
    let mut addresses = Vec::new();
    let mut page = 1;
    let mut rows_read = 0;

    loop {
        let batch = source.fetch_page(filter, page, page_size)?;
        let returned = batch.addresses.len();
        rows_read += returned;

        for address in batch.addresses {
            let address = address.trim().to_string();
            if address.is_empty() || !seen.insert(address.clone()) {
                continue;
            }
            addresses.push(address);
            if max_addresses.is_some_and(|max| addresses.len() >= max) {
                return Ok(addresses);
            }
        }

        let exhausted = returned < page_size || batch.total.is_some_and(|total| rows_read >= total);
        if exhausted {
            break;
        }
        page += 1;
    }

    debug!(addresses = addresses.len(), rows = rows_read, "collected voter addresses");
    Ok(addresses)
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub address_column: String,
    pub order_column: String,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: "Wentzville Voters".to_string(),
            address_column: "Full Address".to_string(),
            order_column: "Voter ID".to_string(),
            timeout_secs: 15,
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self::new(read(URL_VAR)?, read(KEY_VAR)?))
    }
}

/// PostgREST client for the hosted voter table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    config: StoreConfig,
    client: reqwest::blocking::Client,
}

impl SupabaseStore {
    pub fn new(config: StoreConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn query_params(&self, filter: &VoterFilter) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), quoted(&self.config.address_column)),
            ("order".to_string(), format!("{}.asc", quoted(&self.config.order_column))),
        ];

        let search = filter
            .search
            .as_deref()
            .map(sanitize_search)
            .filter(|s| !s.is_empty());
        if let Some(search) = search {
            let clauses = ["Voter ID", "First Name", "Last Name", "Full Address", "Political Party"]
                .iter()
                .map(|column| format!("{}.ilike.*{}*", quoted(column), search))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("or".to_string(), format!("({})", clauses)));
        }
        if let Some(precinct) = filter.precinct {
            params.push(("Precinct".to_string(), format!("eq.{}", precinct)));
        }
        if let Some(split) = filter.split {
            params.push(("Split".to_string(), format!("eq.{}", split)));
        }
        match filter.target {
            TargetVoter::Any => {}
            TargetVoter::Target => {
                params.push(("is_target_voter".to_string(), "eq.true".to_string()))
            }
            TargetVoter::NonTarget => {
                params.push(("is_target_voter".to_string(), "eq.false".to_string()))
            }
        }

        params
    }
}

impl AddressSource for SupabaseStore {
    fn fetch_page(
        &self,
        filter: &VoterFilter,
        page: usize,
        limit: usize,
    ) -> Result<AddressPage, StoreError> {
        let page = page.max(1);
        let from = (page - 1) * limit;
        let to = from + limit.max(1) - 1;

        let url = format!(
            "{}/rest/v1/{}",
            self.config.base_url,
            urlencoding::encode(&self.config.table)
        );
        let response = self
            .client
            .get(url)
            .query(&self.query_params(filter))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Range-Unit", "items")
            .header("Range", format!("{}-{}", from, to))
            .header("Prefer", "count=exact")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);

        let rows: Vec<HashMap<String, Option<String>>> = response.json()?;
        let addresses = rows
            .into_iter()
            .filter_map(|mut row| row.remove(&self.config.address_column).flatten())
            .collect();

        Ok(AddressPage { addresses, page, total })
    }
}

fn quoted(column: &str) -> String {
    format!("\"{}\"", column)
}

/// Characters with meaning in PostgREST filter syntax are dropped.
fn sanitize_search(search: &str) -> String {
    search
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '*'))
        .collect()
}

/// Total from a `Content-Range` header such as `0-99/1234` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.parse().ok()
}
