// EnergyView API data types
//
// Read-only snapshots of server state plus the request payloads that go
// with them. Fields use `#[serde(default)]` where the API has been seen to
// omit them; identifiers and names are always present.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::timestamp::Timestamp;

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ── CSV import ──────────────────────────────────────────────────────

/// A CSV import integration configured in the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvImportIntegration {
    pub uuid: Uuid,
    pub title: String,
}

// ── Node ────────────────────────────────────────────────────────────

/// A registered monitored device / collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Domain-unique id.
    pub id: i64,
    /// Unique across domains.
    pub uuid: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Visible to every account in the domain.
    #[serde(default)]
    pub public: bool,
    /// Whether the requesting account owns the node.
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub archived: bool,
    /// Machine-oriented purpose, e.g. `circuit/heat`.
    #[serde(default)]
    pub representation: Option<String>,
    pub device: Device,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensor_ids: Vec<i64>,
    /// Expected reporting period in seconds.
    #[serde(default)]
    pub interval: Option<i64>,
}

/// Legacy purpose declaration of a node; a subset of a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub protocol_id: i64,
}

// ── Tag ─────────────────────────────────────────────────────────────

/// A sensor declaration. Names are unique only together with `protocol_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Usually the unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub postfix: String,
    pub protocol_id: i64,
}

// ── Settings ────────────────────────────────────────────────────────

/// Scope of a settings tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SettingsType {
    Cluster,
    Node,
    Report,
    Netmgr,
}

// ── Timeseries ──────────────────────────────────────────────────────

/// One sample. `ts` may be domain-local when writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub v: f64,
    pub ts: Timestamp,
}

impl DataPoint {
    pub fn new(v: f64, ts: impl Into<Timestamp>) -> Self {
        Self { v, ts: ts.into() }
    }
}

/// A node + tag pair and its ordered samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesGroup {
    pub node_id: i64,
    pub tag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<DataPoint>,
}

/// Echo of a single stored sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDataPoint {
    pub node_id: i64,
    pub tag: String,
    pub value: f64,
    pub ts: Timestamp,
}

/// Either one value or several, for filters that accept both.
///
/// A single value is sent under the singular parameter name (`node_id`,
/// `tag`), several under the plural (`node_ids`, `tags`) as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    One(T),
    Many(Vec<T>),
}

/// Time bucket applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum Resolution {
    #[strum(serialize = "second")]
    Second,
    #[strum(serialize = "minute")]
    Minute,
    #[strum(serialize = "5minute")]
    FiveMinutes,
    #[strum(serialize = "10minute")]
    TenMinutes,
    #[strum(serialize = "15minute")]
    FifteenMinutes,
    #[strum(serialize = "20minute")]
    TwentyMinutes,
    #[strum(serialize = "30minute")]
    ThirtyMinutes,
    #[strum(serialize = "hour")]
    Hour,
    #[strum(serialize = "day")]
    Day,
    #[strum(serialize = "month")]
    Month,
    #[strum(serialize = "year")]
    Year,
    #[strum(serialize = "decade")]
    Decade,
    #[strum(serialize = "century")]
    Century,
    #[strum(serialize = "millennia")]
    Millennia,
}

/// Aggregate function used with a [`Resolution`]. The server default is `avg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Aggregate {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

/// Filters for `GET timeseries`. Everything is optional; unset fields are
/// not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeseriesQuery {
    pub nodes: Option<Selection<i64>>,
    pub tags: Option<Selection<String>>,
    /// Domain-local bounds are resolved by the server; unset means now.
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub resolution: Option<Resolution>,
    pub aggregate: Option<Aggregate>,
    /// Ask for numeric Unix timestamps instead of strings.
    pub epoch: bool,
}

impl TimeseriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node_id: i64) -> Self {
        self.nodes = Some(Selection::One(node_id));
        self
    }

    pub fn nodes(mut self, node_ids: Vec<i64>) -> Self {
        self.nodes = Some(Selection::Many(node_ids));
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags = Some(Selection::One(tag.into()));
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(Selection::Many(tags.into_iter().map(Into::into).collect()));
        self
    }

    pub fn between(mut self, start: impl Into<Timestamp>, end: impl Into<Timestamp>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn epoch(mut self, epoch: bool) -> Self {
        self.epoch = epoch;
        self
    }
}

// ── Dataset ─────────────────────────────────────────────────────────

/// Storage format of a dataset's content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
    Ini,
    Json,
    Misc,
    Toml,
    Xml,
    Yaml,
}

impl DatasetFormat {
    /// `Content-Type` the server uses when returning raw content.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Ini => "text/plain; charset=utf-8",
            Self::Json => "application/json",
            Self::Misc => "application/octet-stream",
            Self::Toml => "application/toml",
            Self::Xml => "application/xml",
            Self::Yaml => "application/yaml",
        }
    }
}

/// A stored data set object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub uuid: Uuid,
    pub name: String,
    pub format: DatasetFormat,
    /// SHA-256 of the decoded content.
    pub checksum: String,
    /// Size of the decoded content in bytes.
    pub size: u64,
    /// Node / thing this dataset is bound to.
    #[serde(default)]
    pub thing_uuid: Option<Uuid>,
    #[serde(with = "crate::timestamp")]
    pub created: DateTime<FixedOffset>,
    #[serde(with = "crate::timestamp")]
    pub updated: DateTime<FixedOffset>,
    pub created_by: i64,
    pub updated_by: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Payload for creating a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDataset {
    /// Base64-encoded content.
    pub content: String,
    pub format: DatasetFormat,
    pub name: String,
    pub tags: Option<Vec<String>>,
    pub thing_uuid: Option<Uuid>,
}

impl NewDataset {
    pub fn new(name: impl Into<String>, format: DatasetFormat, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format,
            name: name.into(),
            tags: None,
            thing_uuid: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn bound_to(mut self, thing_uuid: Uuid) -> Self {
        self.thing_uuid = Some(thing_uuid);
        self
    }
}

/// Partial update of a dataset; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetUpdate {
    pub content: Option<String>,
    pub format: Option<DatasetFormat>,
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub thing_uuid: Option<Uuid>,
}
