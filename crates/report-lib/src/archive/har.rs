//! HAR 1.2 document shapes
//!
//! Only the fields the pipeline reads are modelled. Private (underscore)
//! fields carry the timing boundaries some capture tools add to each entry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Har {
    pub log: Log,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    pub version: Option<String>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub started_date_time: Option<String>,
    /// Total elapsed time of the request (ms)
    pub time: Option<f64>,
    pub request: Request,
    pub response: Response,

    #[serde(rename = "_dnsStart")]
    pub dns_start: Option<f64>,
    #[serde(rename = "_dnsEnd")]
    pub dns_end: Option<f64>,
    #[serde(rename = "_connectStart")]
    pub connect_start: Option<f64>,
    #[serde(rename = "_connectEnd")]
    pub connect_end: Option<f64>,
    #[serde(rename = "_secureStart")]
    pub secure_start: Option<f64>,
    #[serde(rename = "_secureEnd")]
    pub secure_end: Option<f64>,
    #[serde(rename = "_requestStart")]
    pub request_start: Option<f64>,
    #[serde(rename = "_responseStart")]
    pub response_start: Option<f64>,
    #[serde(rename = "_responseEnd")]
    pub response_end: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub method: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub status: i64,
    pub content: Content,
    #[serde(rename = "_transferSize")]
    pub transfer_size: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    /// Content length in bytes, -1 when unknown
    pub size: Option<f64>,
    pub mime_type: Option<String>,
}
