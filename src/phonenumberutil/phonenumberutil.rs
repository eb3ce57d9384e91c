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

//! This module provides the main entry point for interacting with the phone
//! number handling library.
//!
//! It exposes the `PhoneNumberUtil` struct, which contains a comprehensive
//! set of methods for parsing, formatting, validating, and analyzing phone
//! numbers from various regions around the world. This utility is designed
//! to handle the complexities of international phone number formats, country
//! codes, and numbering plans.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::{
    phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection},
    phonenumber::PhoneNumber,
    regexp_cache::InvalidRegexError,
};

use super::{
    enums::{MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType},
    errors::{
        ExtractNumberError, GetExampleNumberError, InvalidNumberError, ParseError,
        ValidationError,
    },
    phonenumberutil_internal::PhoneNumberUtilInternal,
};

const METADATA_BUG: &str = "A valid regex is expected in metadata; this indicates a library bug.";

/// The main struct for all phone number-related operations.
///
/// It encapsulates the library's core logic and provides a public API for
/// parsing, formatting, and validating phone numbers. An instance of this
/// struct is the primary entry point for using the library's features.
pub struct PhoneNumberUtil {
    util_internal: PhoneNumberUtilInternal,
}

impl PhoneNumberUtil {
    /// Creates a `PhoneNumberUtil` driven by the given metadata collection,
    /// normally one decoded with
    /// [`PhoneMetadataCollection::parse_from_bytes`].
    pub fn new_for_metadata(metadata: PhoneMetadataCollection) -> Self {
        Self {
            util_internal: PhoneNumberUtilInternal::new(metadata),
        }
    }

    /// Checks if a `PhoneNumber` can be dialed internationally.
    ///
    /// # Panics
    ///
    /// This method panics if the underlying metadata contains an invalid
    /// regular expression, which indicates a critical library bug.
    pub fn can_be_internationally_dialled(&self, phone_number: &PhoneNumber) -> bool {
        self.util_internal
            .can_be_internationally_dialled(phone_number)
            .expect(METADATA_BUG)
    }

    /// Converts all alpha characters in a phone number string to their
    /// corresponding digits.
    ///
    /// For example, an input of "1-800-FLOWERS" will be converted to
    /// "1-800-3569377".
    pub fn convert_alpha_characters_in_number(&self, number: impl AsRef<str>) -> String {
        self.util_internal
            .convert_alpha_characters_in_number(number.as_ref())
    }

    /// Formats a `PhoneNumber` into a standardized format.
    ///
    /// # Parameters
    ///
    /// * `phone_number`: The `PhoneNumber` to be formatted.
    /// * `number_format`: The `PhoneNumberFormat` to be applied (e.g., E164,
    ///   INTERNATIONAL, NATIONAL).
    ///
    /// # Returns
    ///
    /// A `Cow<'a, str>` which is either a borrowed reference to the
    /// preserved raw input or a newly allocated `String` with the formatted
    /// number.
    ///
    /// # Panics
    ///
    /// This method panics if the underlying metadata contains an invalid
    /// regular expression, indicating a library bug.
    pub fn format<'a>(
        &self,
        phone_number: &'a PhoneNumber,
        number_format: PhoneNumberFormat,
    ) -> Cow<'a, str> {
        self.util_internal
            .format(phone_number, number_format)
            .expect(METADATA_BUG)
    }

    /// Formats a `PhoneNumber` using a caller-supplied list of formatting
    /// patterns instead of the ones carried by the metadata. The rules may
    /// contain the `$NP` and `$FG` macros, which are resolved against the
    /// number's region before formatting.
    ///
    /// # Panics
    ///
    /// Panics if a caller-supplied pattern or the metadata fails to compile,
    /// indicating a caller or library bug.
    pub fn format_by_pattern(
        &self,
        phone_number: &PhoneNumber,
        number_format: PhoneNumberFormat,
        user_defined_formats: &[NumberFormat],
    ) -> String {
        self.util_internal
            .format_by_pattern(phone_number, number_format, user_defined_formats)
            .expect(METADATA_BUG)
    }

    /// Formats a `PhoneNumber`, attempting to preserve the form in which it
    /// was originally entered. The number is only reformatted when doing so
    /// does not change its digits.
    ///
    /// # Panics
    ///
    /// This method panics if metadata is invalid, which indicates a library
    /// bug.
    pub fn format_in_original_format<'a>(
        &self,
        phone_number: &'a PhoneNumber,
        region_calling_from: impl AsRef<str>,
    ) -> Cow<'a, str> {
        self.util_internal
            .format_in_original_format(phone_number, region_calling_from.as_ref())
            .expect(METADATA_BUG)
    }

    /// Formats a national number with a specified carrier selection code
    /// substituted for `$CC` in the region's carrier formatting rule.
    ///
    /// # Panics
    ///
    /// Panics if metadata is invalid, indicating a library bug.
    pub fn format_national_number_with_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        carrier_code: impl AsRef<str>,
    ) -> String {
        self.util_internal
            .format_national_number_with_carrier_code(phone_number, carrier_code.as_ref())
            .expect(METADATA_BUG)
    }

    /// Formats a national number using the carrier code stored on the number
    /// when present, falling back to the supplied one otherwise.
    ///
    /// # Panics
    ///
    /// Panics if metadata is invalid, indicating a library bug.
    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        fallback_carrier_code: impl AsRef<str>,
    ) -> String {
        self.util_internal
            .format_national_number_with_preferred_carrier_code(
                phone_number,
                fallback_carrier_code.as_ref(),
            )
            .expect(METADATA_BUG)
    }

    /// Formats a `PhoneNumber` so that it can be dialed from the given
    /// region on a mobile device. Returns an empty string when the number
    /// cannot be reached from there.
    ///
    /// # Parameters
    ///
    /// * `phone_number`: The `PhoneNumber` to format.
    /// * `region_calling_from`: The two-letter region code (ISO 3166-1)
    ///   where the user is.
    /// * `with_formatting`: If `true`, the number is formatted with
    ///   punctuation; otherwise only diallable characters are returned.
    ///
    /// # Panics
    ///
    /// Panics if formatting fails due to a library bug.
    pub fn format_number_for_mobile_dialing<'a>(
        &self,
        phone_number: &'a PhoneNumber,
        region_calling_from: impl AsRef<str>,
        with_formatting: bool,
    ) -> Cow<'a, str> {
        self.util_internal
            .format_number_for_mobile_dialing(
                phone_number,
                region_calling_from.as_ref(),
                with_formatting,
            )
            .expect(METADATA_BUG)
    }

    /// Formats a `PhoneNumber` for out-of-country calling: the calling
    /// region's international prefix (or preferred prefix), the country
    /// code, then the internationally formatted national number.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn format_out_of_country_calling_number<'a>(
        &self,
        phone_number: &'a PhoneNumber,
        region_calling_from: impl AsRef<str>,
    ) -> Cow<'a, str> {
        self.util_internal
            .format_out_of_country_calling_number(phone_number, region_calling_from.as_ref())
            .expect(METADATA_BUG)
    }

    /// Formats a `PhoneNumber` for out-of-country calling while preserving
    /// any alphabetic characters of the raw input, e.g. vanity numbers.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn format_out_of_country_keeping_alpha_chars<'a>(
        &self,
        phone_number: &'a PhoneNumber,
        region_calling_from: impl AsRef<str>,
    ) -> Cow<'a, str> {
        self.util_internal
            .format_out_of_country_keeping_alpha_chars(phone_number, region_calling_from.as_ref())
            .expect(METADATA_BUG)
    }

    /// Retrieves the country calling code for a given region, or `None` if
    /// the region code is invalid.
    pub fn get_country_code_for_region(&self, region_code: impl AsRef<str>) -> Option<i32> {
        self.util_internal
            .get_country_code_for_region(region_code.as_ref())
    }

    /// The digit inserted between country code and area code when dialling a
    /// mobile number of this country from abroad, if the country uses one.
    pub fn get_country_mobile_token(&self, country_calling_code: i32) -> Option<char> {
        self.util_internal
            .get_country_mobile_token(country_calling_code)
    }

    /// Gets a valid example `PhoneNumber` for a specific region.
    pub fn get_example_number(
        &self,
        region_code: impl AsRef<str>,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.util_internal
            .get_example_number(region_code.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Gets a valid example `PhoneNumber` of the given type for the given
    /// region.
    pub fn get_example_number_for_type_and_region_code(
        &self,
        region_code: impl AsRef<str>,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.util_internal
            .get_example_number_for_type_and_region_code(region_code.as_ref(), number_type)
            .map_err(|err| err.into_public())
    }

    /// Gets a valid example `PhoneNumber` for a specific number type,
    /// searching every supported region and non-geographical entity.
    pub fn get_example_number_for_type(
        &self,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.util_internal
            .get_example_number_for_type(number_type)
            .map_err(|err| err.into_public())
    }

    /// Gets a valid example number for a non-geographical entity such as the
    /// universal toll-free calling code.
    pub fn get_example_number_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.util_internal
            .get_example_number_for_non_geo_entity(country_calling_code)
            .map_err(|err| err.into_public())
    }

    /// Gets an invalid but plausible example `PhoneNumber` for a specific
    /// region, useful for negative test data.
    pub fn get_invalid_example_number(
        &self,
        region_code: impl AsRef<str>,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.util_internal
            .get_invalid_example_number(region_code.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Gets the length of the geographical area code of a `PhoneNumber`, or
    /// `0` if the number has none.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn get_length_of_geographical_area_code(&self, phone_number: &PhoneNumber) -> usize {
        self.util_internal
            .get_length_of_geographical_area_code(phone_number)
            .expect(METADATA_BUG)
    }

    /// Gets the length of the national destination code of a `PhoneNumber`.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn get_length_of_national_destination_code(&self, phone_number: &PhoneNumber) -> usize {
        self.util_internal
            .get_length_of_national_destination_code(phone_number)
            .expect(METADATA_BUG)
    }

    /// Gets the metadata entry for a region, mostly useful for inspection
    /// and tests.
    pub fn get_metadata_for_region(&self, region_code: impl AsRef<str>) -> Option<&PhoneMetadata> {
        self.util_internal
            .get_metadata_for_region(region_code.as_ref())
    }

    /// Gets the metadata entry for a non-geographical calling code.
    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.util_internal
            .get_metadata_for_non_geographical_region(country_calling_code)
    }

    /// Gets the National Significant Number (NSN) of a `PhoneNumber`: the
    /// digits following the country code, with leading zeros restored.
    pub fn get_national_significant_number(&self, phone_number: &PhoneNumber) -> String {
        self.util_internal
            .get_national_significant_number(phone_number)
    }

    /// The national dialling prefix of the region, with the waiting-tone
    /// marker `~` optionally removed.
    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: impl AsRef<str>,
        strip_non_digits: bool,
    ) -> Option<String> {
        self.util_internal
            .get_ndd_prefix_for_region(region_code.as_ref(), strip_non_digits)
    }

    /// Determines the `PhoneNumberType` of a given `PhoneNumber`.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> PhoneNumberType {
        self.util_internal
            .get_number_type(phone_number)
            .expect(METADATA_BUG)
    }

    /// Gets the primary region code for a given country calling code.
    ///
    /// Note: Some country codes are shared by multiple regions (e.g. +1 for
    /// USA and Canada). This returns the main region for that code (e.g.
    /// "US" for +1). Returns "ZZ" for invalid codes and "001" for
    /// non-geographical ones.
    pub fn get_region_code_for_country_code(&self, country_code: i32) -> &str {
        self.util_internal
            .get_region_code_for_country_code(country_code)
    }

    /// Gets the region code for a `PhoneNumber`, discriminating between
    /// regions sharing a calling code by leading digits or validity.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> &str {
        self.util_internal
            .get_region_code_for_number(phone_number)
            .expect(METADATA_BUG)
    }

    /// Gets all region codes associated with a country calling code, main
    /// region first.
    pub fn get_region_codes_for_country_calling_code(
        &self,
        country_code: i32,
    ) -> Option<impl ExactSizeIterator<Item = &str>> {
        self.util_internal
            .get_region_codes_for_country_calling_code(country_code)
    }

    /// Gets an iterator over all supported two-letter region codes.
    pub fn get_supported_regions(&self) -> impl ExactSizeIterator<Item = &str> {
        self.util_internal.get_supported_regions()
    }

    /// Gets an iterator over every supported country calling code,
    /// geographical or not.
    pub fn get_supported_calling_codes(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.util_internal.get_supported_calling_codes()
    }

    /// Gets an iterator over the calling codes of non-geographical entities
    /// (global networks such as +800).
    pub fn get_supported_global_network_calling_codes(
        &self,
    ) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.util_internal.get_supported_global_network_calling_codes()
    }

    /// The number types the region has metadata for. `None` for unknown
    /// regions.
    pub fn get_supported_types_for_region(
        &self,
        region_code: impl AsRef<str>,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.util_internal
            .get_supported_types_for_region(region_code.as_ref())
    }

    /// The number types a non-geographical entity has metadata for.
    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.util_internal
            .get_supported_types_for_non_geo_entity(country_calling_code)
    }

    /// Checks if a number string is a vanity number: viable and with at
    /// least three keypad letters in its main part.
    pub fn is_alpha_number(&self, number: impl AsRef<str>) -> bool {
        self.util_internal.is_alpha_number(number.as_ref())
    }

    /// Checks if a region is part of the North American Numbering Plan
    /// (NANPA).
    pub fn is_nanpa_country(&self, region_code: impl AsRef<str>) -> bool {
        self.util_internal.is_nanpa_country(region_code.as_ref())
    }

    /// Checks if a `PhoneNumber` corresponds to a specific geographic area.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn is_number_geographical(&self, phone_number: &PhoneNumber) -> bool {
        self.util_internal
            .is_number_geographical(phone_number)
            .expect(METADATA_BUG)
    }

    /// Compares two phone numbers and returns their `MatchType`.
    pub fn is_number_match(
        &self,
        first_number: &PhoneNumber,
        second_number: &PhoneNumber,
    ) -> MatchType {
        self.util_internal
            .is_number_match(first_number, second_number)
    }

    /// Compares two textual numbers, retrying region-less parsing when a
    /// country code cannot be inferred.
    pub fn is_number_match_with_two_strings(
        &self,
        first_number: impl AsRef<str>,
        second_number: impl AsRef<str>,
    ) -> Result<MatchType, InvalidNumberError> {
        self.util_internal
            .is_number_match_with_two_strings(first_number.as_ref(), second_number.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Compares a structured number with a textual one. An exact match is
    /// downgraded to an NSN match when the text had to be parsed using the
    /// structured number's region.
    pub fn is_number_match_with_one_string(
        &self,
        first_number: &PhoneNumber,
        second_number: impl AsRef<str>,
    ) -> Result<MatchType, InvalidNumberError> {
        self.util_internal
            .is_number_match_with_one_string(first_number, second_number.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Performs a fast length-based check of whether a `PhoneNumber` could
    /// possibly be valid. Less strict than `is_valid_number`.
    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.util_internal.is_possible_number(phone_number)
    }

    /// Length-based possibility check for a specific number type.
    pub fn is_possible_number_for_type(
        &self,
        phone_number: &PhoneNumber,
        number_type: PhoneNumberType,
    ) -> bool {
        self.util_internal
            .is_possible_number_for_type(phone_number, number_type)
    }

    /// Checks if a `PhoneNumber` is possibly valid and reports the reason
    /// when it is not.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<NumberLengthType, ValidationError> {
        self.util_internal.is_possible_number_with_reason(phone_number)
    }

    /// Per-type variant of [`Self::is_possible_number_with_reason`].
    pub fn is_possible_number_for_type_with_reason(
        &self,
        phone_number: &PhoneNumber,
        number_type: PhoneNumberType,
    ) -> Result<NumberLengthType, ValidationError> {
        self.util_internal
            .is_possible_number_for_type_with_reason(phone_number, number_type)
    }

    /// Parses the string and checks whether the result is possible. Returns
    /// false for unparseable input.
    pub fn is_possible_number_for_string(
        &self,
        number: impl AsRef<str>,
        region_dialing_from: impl AsRef<str>,
    ) -> bool {
        self.util_internal
            .is_possible_number_for_string(number.as_ref(), region_dialing_from.as_ref())
    }

    /// Performs a full pattern-based validation of a `PhoneNumber`.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> bool {
        self.util_internal
            .is_valid_number(phone_number)
            .expect(METADATA_BUG)
    }

    /// Validates a `PhoneNumber` against a specific region: the country code
    /// must belong to that region and the number must match its patterns.
    pub fn is_valid_number_for_region(
        &self,
        phone_number: &PhoneNumber,
        region_code: impl AsRef<str>,
    ) -> bool {
        self.util_internal
            .is_valid_number_for_region(phone_number, region_code.as_ref())
            .expect(METADATA_BUG)
    }

    /// Checks whether a string could be a phone number at all: at least two
    /// digits and only characters a phone number may contain.
    pub fn is_viable_phone_number(&self, number: impl AsRef<str>) -> bool {
        self.util_internal.is_viable_phone_number(number.as_ref())
    }

    /// Locates the portion of the text that could be a phone number:
    /// everything from the first plus sign or digit, with unwanted trailing
    /// characters and second-number suffixes removed.
    pub fn extract_possible_number<'a>(
        &self,
        number: &'a str,
    ) -> Result<&'a str, ExtractNumberError> {
        self.util_internal.extract_possible_number(number)
    }

    /// Strips a trailing extension off the number, returning the remaining
    /// number and the extension digits when one was found.
    pub fn maybe_strip_extension(&self, number: String) -> (String, Option<String>) {
        let mut number = number;
        let extension = self.util_internal.maybe_strip_extension(&mut number);
        (number, extension)
    }

    /// Strips the national prefix and an optional carrier selection code off
    /// the start of the number, applying the region's transform rule when
    /// one exists. Returns the remaining number and the captured carrier
    /// code. The number is returned unchanged when stripping would make it
    /// stop matching the region's general pattern.
    pub fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        metadata: &PhoneMetadata,
        number: impl AsRef<str>,
    ) -> Result<(String, Option<String>), InvalidRegexError> {
        let mut number = number.as_ref().to_owned();
        let mut carrier_code = String::new();
        self.util_internal.maybe_strip_national_prefix_and_carrier_code(
            &mut number,
            metadata,
            Some(&mut carrier_code),
        )?;
        let carrier_code = if carrier_code.is_empty() {
            None
        } else {
            Some(carrier_code)
        };
        Ok((number, carrier_code))
    }

    /// Normalizes a phone number string: keypad letters become digits when
    /// the number is a vanity number, all digit scripts are folded to ASCII
    /// and punctuation is dropped.
    pub fn normalize(&self, number: impl AsRef<str>) -> String {
        self.util_internal.normalize(number.as_ref())
    }

    /// Keeps nothing but decimal digits, folded to ASCII.
    pub fn normalize_digits_only(&self, number: impl AsRef<str>) -> String {
        self.util_internal.normalize_digits_only(number.as_ref())
    }

    /// Keeps only the characters meaningful when dialling: digits, `+`, `*`
    /// and `#`.
    pub fn normalize_diallable_chars_only(&self, number: impl AsRef<str>) -> String {
        self.util_internal
            .normalize_diallable_chars_only(number.as_ref())
    }

    /// Parses a string into a `PhoneNumber`.
    ///
    /// This is the primary method for converting a string representation of
    /// a number into a structured `PhoneNumber` object.
    ///
    /// # Parameters
    ///
    /// * `number_to_parse`: The phone number string.
    /// * `default_region`: The two-letter region code (ISO 3166-1) to use if
    ///   the number is not in international format, or "ZZ" when unknown.
    pub fn parse(
        &self,
        number_to_parse: impl AsRef<str>,
        default_region: impl AsRef<str>,
    ) -> Result<PhoneNumber, ParseError> {
        self.util_internal
            .parse(number_to_parse.as_ref(), default_region.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Parses a string into a `PhoneNumber`, additionally keeping the raw
    /// input, the way the country code was inferred and any carrier
    /// selection code, so the number can later be formatted back close to
    /// its original form.
    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: impl AsRef<str>,
        default_region: impl AsRef<str>,
    ) -> Result<PhoneNumber, ParseError> {
        self.util_internal
            .parse_and_keep_raw_input(number_to_parse.as_ref(), default_region.as_ref())
            .map_err(|err| err.into_public())
    }

    /// Truncates a `PhoneNumber` that is too long by repeatedly dropping its
    /// last digit until it validates. Returns `false`, leaving the number
    /// untouched, when no valid truncation exists.
    ///
    /// # Panics
    ///
    /// Panics on invalid metadata, indicating a library bug.
    pub fn truncate_too_long_number(&self, phone_number: &mut PhoneNumber) -> bool {
        self.util_internal
            .truncate_too_long_number(phone_number)
            .expect(METADATA_BUG)
    }
}
