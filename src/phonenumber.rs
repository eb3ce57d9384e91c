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

//! The canonical structured representation of a phone number.
//!
//! All fields are optional; an unset field reads back as its default through
//! the accessor of the same name. Two numbers compare equal when their set
//! fields are identical, so code that builds expected values must set the
//! same fields the parser sets.

/// Indicates how the country calling code of a parsed number was inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum CountryCodeSource {
    /// The number was parsed without keeping raw input, or the source could
    /// not be recorded.
    UNSPECIFIED,
    /// The country code was read off a leading plus sign.
    FROM_NUMBER_WITH_PLUS_SIGN,
    /// The country code followed an international dialing prefix of the
    /// default region.
    FROM_NUMBER_WITH_IDD,
    /// The number started with the country code without any plus sign or IDD.
    FROM_NUMBER_WITHOUT_PLUS_SIGN,
    /// The country code was taken from the default region supplied by the
    /// caller.
    FROM_DEFAULT_COUNTRY,
}

/// A parsed phone number.
///
/// `national_number` holds the digits of the national significant number as
/// an integer, which cannot encode leading zeros; those live in
/// `italian_leading_zero` / `number_of_leading_zeros` instead. Either both
/// are maintained or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    pub country_code: Option<i32>,
    pub national_number: Option<u64>,
    pub extension: Option<String>,
    pub italian_leading_zero: Option<bool>,
    pub number_of_leading_zeros: Option<i32>,
    pub raw_input: Option<String>,
    pub country_code_source: Option<CountryCodeSource>,
    pub preferred_domestic_carrier_code: Option<String>,
}

impl PhoneNumber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every field to unset.
    pub fn clear(&mut self) {
        *self = Self::default();
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

    pub fn national_number(&self) -> u64 {
        self.national_number.unwrap_or(0)
    }

    pub fn has_national_number(&self) -> bool {
        self.national_number.is_some()
    }

    pub fn set_national_number(&mut self, national_number: u64) {
        self.national_number = Some(national_number);
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or("")
    }

    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn set_extension(&mut self, extension: String) {
        self.extension = Some(extension);
    }

    pub fn clear_extension(&mut self) {
        self.extension = None;
    }

    pub fn italian_leading_zero(&self) -> bool {
        self.italian_leading_zero.unwrap_or(false)
    }

    pub fn has_italian_leading_zero(&self) -> bool {
        self.italian_leading_zero.is_some()
    }

    pub fn set_italian_leading_zero(&mut self, italian_leading_zero: bool) {
        self.italian_leading_zero = Some(italian_leading_zero);
    }

    /// Defaults to one: a set `italian_leading_zero` with no explicit count
    /// means a single leading zero.
    pub fn number_of_leading_zeros(&self) -> i32 {
        self.number_of_leading_zeros.unwrap_or(1)
    }

    pub fn has_number_of_leading_zeros(&self) -> bool {
        self.number_of_leading_zeros.is_some()
    }

    pub fn set_number_of_leading_zeros(&mut self, number_of_leading_zeros: i32) {
        self.number_of_leading_zeros = Some(number_of_leading_zeros);
    }

    pub fn raw_input(&self) -> &str {
        self.raw_input.as_deref().unwrap_or("")
    }

    pub fn has_raw_input(&self) -> bool {
        self.raw_input.is_some()
    }

    pub fn set_raw_input(&mut self, raw_input: String) {
        self.raw_input = Some(raw_input);
    }

    pub fn clear_raw_input(&mut self) {
        self.raw_input = None;
    }

    pub fn country_code_source(&self) -> CountryCodeSource {
        self.country_code_source
            .unwrap_or(CountryCodeSource::UNSPECIFIED)
    }

    pub fn has_country_code_source(&self) -> bool {
        self.country_code_source.is_some()
    }

    pub fn set_country_code_source(&mut self, source: CountryCodeSource) {
        self.country_code_source = Some(source);
    }

    pub fn clear_country_code_source(&mut self) {
        self.country_code_source = None;
    }

    pub fn preferred_domestic_carrier_code(&self) -> &str {
        self.preferred_domestic_carrier_code.as_deref().unwrap_or("")
    }

    pub fn has_preferred_domestic_carrier_code(&self) -> bool {
        self.preferred_domestic_carrier_code.is_some()
    }

    pub fn set_preferred_domestic_carrier_code(&mut self, carrier_code: String) {
        self.preferred_domestic_carrier_code = Some(carrier_code);
    }

    pub fn clear_preferred_domestic_carrier_code(&mut self) {
        self.preferred_domestic_carrier_code = None;
    }
}
