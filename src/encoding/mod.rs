//! Feature encoding and alignment
//!
//! Turns a raw booking table into the exact numeric matrix the classifier
//! was fitted on:
//! - One-hot expansion of categorical fields ([`OneHotEncoder`])
//! - Label encoding of 0/1 flags in the split scheme ([`LabelEncoder`])
//! - Scheme selection at load time ([`EncodingScheme`])
//! - Reindexing to the frozen column order ([`align`])
//!
//! Unknown categories are rejected by default; see [`UnknownCategoryPolicy`].

mod align;
mod label;
mod onehot;
mod pipeline;
mod scheme;

pub use align::{align, AlignedFeatures};
pub use label::LabelEncoder;
pub use onehot::{CategoryGroup, OneHotEncoder, UnknownCategoryPolicy};
pub use pipeline::{FeaturePipeline, SchemaReport};
pub use scheme::EncodingScheme;

use crate::booking::{fields, vocabulary};

/// One-hot encoder over the booking vocabularies, categories sorted
pub fn standard_onehot() -> OneHotEncoder {
    let groups = fields::CATEGORICAL
        .iter()
        .map(|field| {
            let mut categories: Vec<&str> = vocabulary(field).map(|v| v.to_vec()).unwrap_or_default();
            categories.sort_unstable();
            CategoryGroup::new(*field, &categories)
        })
        .collect();
    OneHotEncoder::new(groups)
}

/// Combined scheme matching the frozen booking schema
pub fn standard_scheme() -> EncodingScheme {
    EncodingScheme::Combined(standard_onehot())
}

/// Split scheme matching the frozen booking schema
pub fn standard_split_scheme() -> EncodingScheme {
    EncodingScheme::Split {
        onehot: standard_onehot(),
        binary: fields::BINARY.iter().map(|f| LabelEncoder::binary(*f)).collect(),
    }
}
