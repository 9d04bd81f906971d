//! Catalog records: work summaries, tags and full work details.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::remote_url::RemoteUrl;

/// A work as it appears in the root listing (and as parent/children of a detail)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Human readable page
    #[serde(rename = "url", default)]
    pub page_url: RemoteUrl,

    /// Machine readable detail endpoint
    #[serde(rename = "href")]
    pub detail_url: RemoteUrl,

    /// Unique per work; names the local directory and file prefix
    pub slug: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub title: String,
}

/// Classification label (author, epoch, kind or genre)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "url", default)]
    pub page_url: RemoteUrl,

    #[serde(rename = "href", default)]
    pub detail_url: RemoteUrl,

    pub name: String,

    #[serde(default)]
    pub slug: String,
}

/// Full record returned by a work's detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDetail {
    #[serde(default)]
    pub authors: Vec<Tag>,
    #[serde(default)]
    pub epochs: Vec<Tag>,
    #[serde(default)]
    pub kinds: Vec<Tag>,
    #[serde(default)]
    pub genres: Vec<Tag>,

    /// Not sent by the detail endpoint; stamped from the owning summary.
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<WorkSummary>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WorkSummary>,

    #[serde(rename = "url", default)]
    pub page_url: RemoteUrl,

    #[serde(rename = "txt", default)]
    pub text_url: RemoteUrl,
    #[serde(rename = "xml", default)]
    pub xml_url: RemoteUrl,
    #[serde(rename = "html", default)]
    pub html_url: RemoteUrl,
    #[serde(rename = "fb2", default)]
    pub fb2_url: RemoteUrl,
    #[serde(rename = "epub", default)]
    pub epub_url: RemoteUrl,
    #[serde(rename = "mobi", default)]
    pub mobi_url: RemoteUrl,
    #[serde(rename = "pdf", default)]
    pub pdf_url: RemoteUrl,
}

/// Downloadable content formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Text,
    Xml,
    Html,
    Fb2,
    Epub,
    Mobi,
    Pdf,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Text,
        Format::Xml,
        Format::Html,
        Format::Fb2,
        Format::Epub,
        Format::Mobi,
        Format::Pdf,
    ];

    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Xml => "xml",
            Format::Html => "html",
            Format::Fb2 => "fb2",
            Format::Epub => "epub",
            Format::Mobi => "mobi",
            Format::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl WorkDetail {
    /// Download link for a format (possibly empty)
    pub fn url_for(&self, format: Format) -> &RemoteUrl {
        match format {
            Format::Text => &self.text_url,
            Format::Xml => &self.xml_url,
            Format::Html => &self.html_url,
            Format::Fb2 => &self.fb2_url,
            Format::Epub => &self.epub_url,
            Format::Mobi => &self.mobi_url,
            Format::Pdf => &self.pdf_url,
        }
    }

    /// Formats this work can be downloaded in
    pub fn available_formats(&self) -> impl Iterator<Item = Format> + '_ {
        Format::ALL
            .into_iter()
            .filter(move |f| !self.url_for(*f).is_empty())
    }

    /// Map of local file name (`<slug>.<ext>`) to download link, one entry
    /// per available format.
    pub fn files(&self) -> BTreeMap<String, RemoteUrl> {
        self.available_formats()
            .map(|f| {
                (
                    format!("{}.{}", self.slug, f.extension()),
                    self.url_for(f).clone(),
                )
            })
            .collect()
    }
}
