// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 The Telnum Authors (Rust adaptation)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-region metadata model.
//!
//! A [`PhoneMetadataCollection`] is produced offline and shipped as an
//! opaque binary blob; [`PhoneMetadataCollection::parse_from_bytes`] is the
//! only decoding entry point the library needs. The structs mirror the
//! upstream metadata schema closely enough that a collection generated from
//! the upstream XML can be re-encoded without loss of the fields this crate
//! consumes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to decode metadata blob: {0}")]
    Decode(#[from] bincode::Error),
}

/// Patterns and possible lengths for one category of numbers (fixed line,
/// mobile, toll free, ...) within a region.
///
/// An empty `possible_length` list means the lengths are inherited from the
/// region's general descriptor; a single `-1` entry means no numbers of
/// this category exist in the region at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumberDesc {
    pub national_number_pattern: Option<String>,
    pub possible_length: Vec<i32>,
    pub possible_length_local_only: Vec<i32>,
    pub example_number: Option<String>,
}

impl PhoneNumberDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn national_number_pattern(&self) -> &str {
        self.national_number_pattern.as_deref().unwrap_or("")
    }

    pub fn has_national_number_pattern(&self) -> bool {
        self.national_number_pattern.is_some()
    }

    pub fn set_national_number_pattern(&mut self, pattern: String) {
        self.national_number_pattern = Some(pattern);
    }

    pub fn example_number(&self) -> &str {
        self.example_number.as_deref().unwrap_or("")
    }

    pub fn has_example_number(&self) -> bool {
        self.example_number.is_some()
    }

    pub fn set_example_number(&mut self, example: String) {
        self.example_number = Some(example);
    }
}

/// A single formatting rule: a grouping pattern, a replacement template
/// using `$1..$9`, and the discriminators deciding when the rule applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub pattern: Option<String>,
    pub format: Option<String>,
    /// Prefix-match patterns; the last entry is the authoritative one. A
    /// format with an empty list applies to every number the `pattern`
    /// matches.
    pub leading_digits_pattern: Vec<String>,
    /// How to prepend the national prefix, e.g. `"0$1"` or `"($1)"`. The
    /// `$NP`/`$FG` macros are already resolved in shipped metadata and only
    /// occur in caller-supplied formats.
    pub national_prefix_formatting_rule: Option<String>,
    pub national_prefix_optional_when_formatting: bool,
    /// Template containing `$CC` for the carrier selection code, e.g.
    /// `"0 $CC ($1)"`.
    pub domestic_carrier_code_formatting_rule: Option<String>,
}

impl NumberFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or("")
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn set_pattern(&mut self, pattern: String) {
        self.pattern = Some(pattern);
    }

    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("")
    }

    pub fn has_format(&self) -> bool {
        self.format.is_some()
    }

    pub fn set_format(&mut self, format: String) {
        self.format = Some(format);
    }

    pub fn add_leading_digits_pattern(&mut self, pattern: String) {
        self.leading_digits_pattern.push(pattern);
    }

    pub fn national_prefix_formatting_rule(&self) -> &str {
        self.national_prefix_formatting_rule.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix_formatting_rule(&self) -> bool {
        self.national_prefix_formatting_rule.is_some()
    }

    pub fn set_national_prefix_formatting_rule(&mut self, rule: String) {
        self.national_prefix_formatting_rule = Some(rule);
    }

    pub fn clear_national_prefix_formatting_rule(&mut self) {
        self.national_prefix_formatting_rule = None;
    }

    pub fn domestic_carrier_code_formatting_rule(&self) -> &str {
        self.domestic_carrier_code_formatting_rule
            .as_deref()
            .unwrap_or("")
    }

    pub fn has_domestic_carrier_code_formatting_rule(&self) -> bool {
        self.domestic_carrier_code_formatting_rule.is_some()
    }

    pub fn set_domestic_carrier_code_formatting_rule(&mut self, rule: String) {
        self.domestic_carrier_code_formatting_rule = Some(rule);
    }
}

/// Everything the library knows about one region (or one non-geographical
/// calling code, stored under the id `"001"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneMetadata {
    /// CLDR two-letter region code, or `"001"` for non-geographical
    /// entities.
    pub id: Option<String>,
    pub country_code: Option<i32>,
    /// The prefix dialled before an international number, as a regex when a
    /// region accepts several (e.g. `"001[12]"`).
    pub international_prefix: Option<String>,
    /// Preferred among several accepted international prefixes, for
    /// formatting purposes. May contain `~` to signal waiting for a tone.
    pub preferred_international_prefix: Option<String>,
    pub national_prefix: Option<String>,
    pub preferred_extn_prefix: Option<String>,
    /// Superset of `national_prefix` used when parsing; may contain a
    /// capturing group for a carrier selection code.
    pub national_prefix_for_parsing: Option<String>,
    /// Rewrite applied together with `national_prefix_for_parsing`, with
    /// `$1..$9` backreferences (e.g. Argentinian mobile numbers).
    pub national_prefix_transform_rule: Option<String>,
    /// Set when fixed-line and mobile patterns are identical and a number
    /// matching one necessarily matches the other.
    pub same_mobile_and_fixed_line_pattern: bool,
    pub number_format: Vec<NumberFormat>,
    /// Populated when the international grouping differs from the national
    /// one; empty means `number_format` applies to both.
    pub intl_number_format: Vec<NumberFormat>,
    pub main_country_for_code: bool,
    /// Discriminates regions sharing a calling code by NSN prefix.
    pub leading_digits: Option<String>,
    /// Kept for blob compatibility; nothing consumes it anymore.
    pub leading_zero_possible: bool,
    pub mobile_number_portable_region: bool,

    pub general_desc: PhoneNumberDesc,
    pub fixed_line: PhoneNumberDesc,
    pub mobile: PhoneNumberDesc,
    pub toll_free: PhoneNumberDesc,
    pub premium_rate: PhoneNumberDesc,
    pub shared_cost: PhoneNumberDesc,
    pub personal_number: PhoneNumberDesc,
    pub voip: PhoneNumberDesc,
    pub pager: PhoneNumberDesc,
    pub uan: PhoneNumberDesc,
    pub voicemail: PhoneNumberDesc,
    pub no_international_dialling: PhoneNumberDesc,
}

impl PhoneMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub fn country_code(&self) -> i32 {
        self.country_code.unwrap_or(0)
    }

    pub fn has_country_code(&self) -> bool {
        self.country_code.is_some()
    }

    pub fn set_country_code(&mut self, country_code: i32) {
        self.country_code = Some(country_code);
    }

    pub fn international_prefix(&self) -> &str {
        self.international_prefix.as_deref().unwrap_or("")
    }

    pub fn has_international_prefix(&self) -> bool {
        self.international_prefix.is_some()
    }

    pub fn set_international_prefix(&mut self, prefix: String) {
        self.international_prefix = Some(prefix);
    }

    pub fn preferred_international_prefix(&self) -> &str {
        self.preferred_international_prefix.as_deref().unwrap_or("")
    }

    pub fn has_preferred_international_prefix(&self) -> bool {
        self.preferred_international_prefix.is_some()
    }

    pub fn set_preferred_international_prefix(&mut self, prefix: String) {
        self.preferred_international_prefix = Some(prefix);
    }

    pub fn national_prefix(&self) -> &str {
        self.national_prefix.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix(&self) -> bool {
        self.national_prefix.is_some()
    }

    pub fn set_national_prefix(&mut self, prefix: String) {
        self.national_prefix = Some(prefix);
    }

    pub fn preferred_extn_prefix(&self) -> &str {
        self.preferred_extn_prefix.as_deref().unwrap_or("")
    }

    pub fn has_preferred_extn_prefix(&self) -> bool {
        self.preferred_extn_prefix.is_some()
    }

    pub fn set_preferred_extn_prefix(&mut self, prefix: String) {
        self.preferred_extn_prefix = Some(prefix);
    }

    pub fn national_prefix_for_parsing(&self) -> &str {
        self.national_prefix_for_parsing.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix_for_parsing(&self) -> bool {
        self.national_prefix_for_parsing.is_some()
    }

    pub fn set_national_prefix_for_parsing(&mut self, pattern: String) {
        self.national_prefix_for_parsing = Some(pattern);
    }

    pub fn clear_national_prefix_for_parsing(&mut self) {
        self.national_prefix_for_parsing = None;
    }

    pub fn national_prefix_transform_rule(&self) -> &str {
        self.national_prefix_transform_rule.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix_transform_rule(&self) -> bool {
        self.national_prefix_transform_rule.is_some()
    }

    pub fn set_national_prefix_transform_rule(&mut self, rule: String) {
        self.national_prefix_transform_rule = Some(rule);
    }

    pub fn leading_digits(&self) -> &str {
        self.leading_digits.as_deref().unwrap_or("")
    }

    pub fn has_leading_digits(&self) -> bool {
        self.leading_digits.is_some()
    }

    pub fn set_leading_digits(&mut self, leading_digits: String) {
        self.leading_digits = Some(leading_digits);
    }
}

/// The deserialized form of the metadata blob: one entry per region plus
/// one per non-geographical calling code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneMetadataCollection {
    pub metadata: Vec<PhoneMetadata>,
}

impl PhoneMetadataCollection {
    /// Decodes a collection from the serialized blob produced offline.
    pub fn parse_from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Encodes the collection back into blob form.
    pub fn write_to_bytes(&self) -> Result<Vec<u8>, MetadataError> {
        Ok(bincode::serialize(self)?)
    }
}
