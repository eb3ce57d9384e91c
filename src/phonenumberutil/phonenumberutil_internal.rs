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

//! The engine behind `PhoneNumberUtil`: registry construction, parsing,
//! formatting, classification and matching. Everything here returns
//! `Result` so the public wrapper can decide which failures are caller
//! errors and which indicate broken metadata.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use regex::NoExpand;

use crate::{
    interfaces::MatcherApi,
    phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection},
    phonenumber::{CountryCodeSource, PhoneNumber},
    regex_based_matcher::RegexBasedMatcher,
    regex_util::{RegexConsume, RegexFullMatch},
    regexp_cache::InvalidRegexError,
    region_code::RegionCode,
    string_util::strip_cow_prefix,
};

use super::{
    enums::{MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType},
    errors::{
        GetExampleNumberError, GetExampleNumberErrorInternal, InternalLogicError,
        InvalidMetadataForValidRegionError, InvalidNumberErrorInternal, NotANumberError,
        ParseError, ParseErrorInternal, ValidationError,
    },
    helper_constants::{
        COLOMBIA_MOBILE_TO_FIXED_LINE_PREFIX, DEFAULT_EXTN_PREFIX, MAX_INPUT_STRING_LENGTH,
        MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, MIN_LENGTH_FOR_NSN, NANPA_COUNTRY_CODE,
        PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY, RFC3966_EXTN_PREFIX, RFC3966_ISDN_SUBADDRESS,
        RFC3966_PHONE_CONTEXT, RFC3966_PREFIX,
    },
    helper_functions::{
        copy_core_fields_only, get_number_desc_by_type, get_supported_types_for_metadata,
        is_national_number_suffix_of_the_other, normalize_helper,
        prefix_number_with_country_calling_code, test_number_length,
        test_number_length_with_unknown_type,
    },
    phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings,
};

fn set_italian_leading_zeros_for_phone_number(
    national_number: &str,
    phone_number: &mut PhoneNumber,
) {
    if national_number.len() > 1 && national_number.starts_with('0') {
        phone_number.set_italian_leading_zero(true);
        let mut number_of_leading_zeros = 1;
        // Note the last digit is excluded: an all-zero number keeps its final
        // zero as the national number proper.
        while number_of_leading_zeros < national_number.len() - 1
            && national_number.as_bytes()[number_of_leading_zeros] == b'0'
        {
            number_of_leading_zeros += 1;
        }
        if number_of_leading_zeros != 1 {
            phone_number.set_number_of_leading_zeros(number_of_leading_zeros as i32);
        }
    }
}

pub(super) struct PhoneNumberUtilInternal {
    matcher: RegexBasedMatcher,
    pub(super) reg_exps: PhoneNumberRegExpsAndMappings,
    region_to_metadata: HashMap<String, PhoneMetadata>,
    country_code_to_non_geographical_metadata: HashMap<i32, PhoneMetadata>,
    country_calling_code_to_region_codes: HashMap<i32, Vec<String>>,
    nanpa_regions: HashSet<String>,
}

impl PhoneNumberUtilInternal {
    pub fn new(collection: PhoneMetadataCollection) -> Self {
        let mut region_to_metadata = HashMap::new();
        let mut country_code_to_non_geographical_metadata = HashMap::new();
        let mut country_calling_code_to_region_codes: HashMap<i32, Vec<String>> = HashMap::new();
        let mut nanpa_regions = HashSet::new();

        for metadata in collection.metadata {
            let region_code = metadata.id().to_owned();
            let country_code = metadata.country_code();
            let region_codes = country_calling_code_to_region_codes
                .entry(country_code)
                .or_default();
            // The main region for a calling code always comes first, so the
            // formatter and lookups can pick it without a second pass.
            if metadata.main_country_for_code {
                region_codes.insert(0, region_code.clone());
            } else {
                region_codes.push(region_code.clone());
            }
            if region_code == REGION_CODE_FOR_NON_GEO_ENTITY {
                country_code_to_non_geographical_metadata.insert(country_code, metadata);
            } else {
                if country_code == NANPA_COUNTRY_CODE {
                    nanpa_regions.insert(region_code.clone());
                }
                region_to_metadata.insert(region_code, metadata);
            }
        }

        Self {
            matcher: RegexBasedMatcher::new(),
            reg_exps: PhoneNumberRegExpsAndMappings::new(),
            region_to_metadata,
            country_code_to_non_geographical_metadata,
            country_calling_code_to_region_codes,
            nanpa_regions,
        }
    }

    // -----------------------------------------------------------------
    // Registry lookups.
    // -----------------------------------------------------------------

    pub fn get_metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.region_to_metadata.get(region_code)
    }

    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.country_code_to_non_geographical_metadata
            .get(&country_calling_code)
    }

    fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<&PhoneMetadata> {
        if region_code == REGION_CODE_FOR_NON_GEO_ENTITY {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    fn is_valid_region_code(&self, region_code: &str) -> bool {
        self.region_to_metadata.contains_key(region_code)
    }

    fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.country_calling_code_to_region_codes
            .contains_key(&country_calling_code)
    }

    pub fn get_supported_regions(&self) -> impl ExactSizeIterator<Item = &str> {
        self.region_to_metadata.keys().map(String::as_str)
    }

    pub fn get_supported_calling_codes(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.country_calling_code_to_region_codes.keys().copied()
    }

    pub fn get_supported_global_network_calling_codes(
        &self,
    ) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.country_code_to_non_geographical_metadata.keys().copied()
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.get_metadata_for_region(region_code).map(|metadata| {
            let mut types = HashSet::new();
            get_supported_types_for_metadata(metadata, &mut types);
            types
        })
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.get_metadata_for_non_geographical_region(country_calling_code)
            .map(|metadata| {
                let mut types = HashSet::new();
                get_supported_types_for_metadata(metadata, &mut types);
                types
            })
    }

    pub fn get_region_codes_for_country_calling_code(
        &self,
        country_calling_code: i32,
    ) -> Option<impl ExactSizeIterator<Item = &str>> {
        self.country_calling_code_to_region_codes
            .get(&country_calling_code)
            .map(|region_codes| region_codes.iter().map(String::as_str))
    }

    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &str {
        match self
            .country_calling_code_to_region_codes
            .get(&country_calling_code)
        {
            Some(region_codes) => &region_codes[0],
            None => RegionCode::get_unknown(),
        }
    }

    pub fn get_country_code_for_region(&self, region_code: &str) -> Option<i32> {
        self.get_metadata_for_region(region_code)
            .map(|metadata| metadata.country_code())
    }

    fn get_country_code_for_valid_region(
        &self,
        region_code: &str,
    ) -> Result<i32, InvalidMetadataForValidRegionError> {
        self.get_country_code_for_region(region_code)
            .ok_or(InvalidMetadataForValidRegionError)
    }

    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.nanpa_regions.contains(region_code)
    }

    pub fn get_country_mobile_token(&self, country_calling_code: i32) -> Option<char> {
        self.reg_exps
            .mobile_token_mappings
            .get(&country_calling_code)
            .copied()
    }

    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: &str,
        strip_non_digits: bool,
    ) -> Option<String> {
        let metadata = self.get_metadata_for_region(region_code)?;
        let national_prefix = metadata.national_prefix();
        if national_prefix.is_empty() {
            return None;
        }
        Some(if strip_non_digits {
            // Note: if any other non-numeric symbols are ever used in national
            // prefixes, we should remove them here as well.
            national_prefix.replace('~', "")
        } else {
            national_prefix.to_owned()
        })
    }

    // -----------------------------------------------------------------
    // Normalization.
    // -----------------------------------------------------------------

    /// Converts alpha characters to their keypad digits, folds any Unicode
    /// decimal digit to ASCII and strips punctuation. Numbers with fewer
    /// than three letters only keep their digits.
    pub fn normalize(&self, number: &str) -> String {
        if self.reg_exps.valid_alpha_phone_pattern.full_match(number) {
            let folded = dec_from_char::normalize_decimals(number);
            let mut normalized = (&*folded).to_owned();
            normalize_helper(&self.reg_exps.alpha_phone_mappings, true, &mut normalized);
            normalized
        } else {
            self.normalize_digits_only(number)
        }
    }

    pub fn normalize_digits_only(&self, number: &str) -> String {
        let folded = dec_from_char::normalize_decimals(number);
        (&*folded).chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Keeps only the characters that still matter once the number is being
    /// dialled: digits, `+`, `*` and `#`.
    pub fn normalize_diallable_chars_only(&self, number: &str) -> String {
        let mut normalized = number.to_owned();
        normalize_helper(&self.reg_exps.diallable_char_mappings, true, &mut normalized);
        normalized
    }

    pub fn convert_alpha_characters_in_number(&self, number: &str) -> String {
        let mut converted = number.to_owned();
        normalize_helper(&self.reg_exps.alpha_phone_mappings, false, &mut converted);
        converted
    }

    pub fn is_alpha_number(&self, number: &str) -> bool {
        if !self.is_viable_phone_number(number) {
            // Number is too short, or doesn't match the basic phone number
            // pattern.
            return false;
        }
        let mut stripped = number.to_owned();
        self.maybe_strip_extension(&mut stripped);
        self.reg_exps.valid_alpha_phone_pattern.full_match(&stripped)
    }

    pub fn get_national_significant_number(&self, number: &PhoneNumber) -> String {
        // If leading zero(s) have been set, we prefix this now. Note this is not a
        // national prefix. Ignore the leading zeros marker if the count is
        // nonsensical.
        let mut national_number = if number.italian_leading_zero()
            && number.number_of_leading_zeros() > 0
        {
            "0".repeat(number.number_of_leading_zeros() as usize)
        } else {
            String::new()
        };
        let mut buf = itoa::Buffer::new();
        national_number.push_str(buf.format(number.national_number()));
        national_number
    }

    // -----------------------------------------------------------------
    // Formatter.
    // -----------------------------------------------------------------

    fn choose_formatting_pattern_for_number<'a>(
        &self,
        available_formats: &'a [NumberFormat],
        national_number: &str,
    ) -> Result<Option<&'a NumberFormat>, InvalidRegexError> {
        for number_format in available_formats {
            if !number_format.leading_digits_pattern.is_empty() {
                // We always use the last leading_digits_pattern, as it is the most
                // detailed.
                let last_leading_digits = number_format
                    .leading_digits_pattern
                    .last()
                    .map(String::as_str)
                    .unwrap_or("");
                let leading_digits_regex =
                    self.reg_exps.regexp_cache.get_regex(last_leading_digits)?;
                if !leading_digits_regex.matches_start(national_number) {
                    continue;
                }
            }
            let pattern = self.reg_exps.regexp_cache.get_regex(number_format.pattern())?;
            if pattern.full_match(national_number) {
                return Ok(Some(number_format));
            }
        }
        Ok(None)
    }

    fn format_nsn_using_pattern_with_carrier(
        &self,
        national_number: &str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Result<String, InvalidRegexError> {
        let number_format_rule = formatting_pattern.format().to_owned();
        let pattern = self.reg_exps.regexp_cache.get_regex(formatting_pattern.pattern())?;
        let mut formatted;
        if number_format == PhoneNumberFormat::National
            && !carrier_code.is_empty()
            && !formatting_pattern
                .domestic_carrier_code_formatting_rule()
                .is_empty()
        {
            // Replace the $CC in the formatting rule with the desired carrier
            // code.
            let carrier_code_formatting_rule = self
                .reg_exps
                .carrier_code_pattern
                .replace(
                    formatting_pattern.domestic_carrier_code_formatting_rule(),
                    NoExpand(carrier_code),
                )
                .into_owned();
            // Now replace the $FG in the formatting rule with the first group
            // and the carrier code combined in the appropriate way. The rule is
            // inserted in place of the first group token of the format, so any
            // group reference it carries survives the substitution below.
            let with_carrier = self
                .reg_exps
                .first_group_capturing_pattern
                .replace(&number_format_rule, carrier_code_formatting_rule.as_str())
                .into_owned();
            formatted = pattern.replace(national_number, with_carrier.as_str()).into_owned();
        } else {
            // Use the national prefix formatting rule instead.
            let national_prefix_formatting_rule =
                formatting_pattern.national_prefix_formatting_rule();
            if number_format == PhoneNumberFormat::National
                && !national_prefix_formatting_rule.is_empty()
            {
                let with_prefix = self
                    .reg_exps
                    .first_group_capturing_pattern
                    .replace(&number_format_rule, national_prefix_formatting_rule)
                    .into_owned();
                formatted = pattern.replace(national_number, with_prefix.as_str()).into_owned();
            } else {
                formatted = pattern
                    .replace(national_number, number_format_rule.as_str())
                    .into_owned();
            }
        }
        if number_format == PhoneNumberFormat::RFC3966 {
            // Strip any leading punctuation.
            if let Some(separator) = self.reg_exps.separator_pattern.find_start(&formatted) {
                formatted = formatted[separator.end()..].to_owned();
            }
            // Replace the rest with a dash between each segment.
            formatted = self
                .reg_exps
                .separator_pattern
                .replace_all(&formatted, "-")
                .into_owned();
        }
        Ok(formatted)
    }

    /// Formats the national significant number according to the region's
    /// format list; numbers no pattern applies to are emitted verbatim.
    fn format_nsn(
        &self,
        national_number: &str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Result<String, InvalidRegexError> {
        // When the intl_number_format exists, we use that to format national
        // number for the INTERNATIONAL format instead of using the
        // number_format.
        let available_formats = if metadata.intl_number_format.is_empty()
            || number_format == PhoneNumberFormat::National
        {
            &metadata.number_format
        } else {
            &metadata.intl_number_format
        };
        match self.choose_formatting_pattern_for_number(available_formats, national_number)? {
            None => Ok(national_number.to_owned()),
            Some(formatting_pattern) => self.format_nsn_using_pattern_with_carrier(
                national_number,
                formatting_pattern,
                number_format,
                carrier_code,
            ),
        }
    }

    fn maybe_append_formatted_extension(
        &self,
        number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        formatted_number: &mut String,
    ) {
        if !number.has_extension() || number.extension().is_empty() {
            return;
        }
        if number_format == PhoneNumberFormat::RFC3966 {
            formatted_number.push_str(RFC3966_EXTN_PREFIX);
        } else if metadata.has_preferred_extn_prefix() {
            formatted_number.push_str(metadata.preferred_extn_prefix());
        } else {
            formatted_number.push_str(DEFAULT_EXTN_PREFIX);
        }
        formatted_number.push_str(number.extension());
    }

    pub fn format<'a>(
        &self,
        number: &'a PhoneNumber,
        number_format: PhoneNumberFormat,
    ) -> Result<Cow<'a, str>, InternalLogicError> {
        if number.national_number() == 0 {
            // Unparseable numbers that kept their raw input just use that.
            // This is the only case where a number can be formatted as E164
            // without a leading '+' symbol (but the original number wasn't
            // parseable anyway).
            let raw_input = number.raw_input();
            if !raw_input.is_empty() {
                return Ok(Cow::Borrowed(raw_input));
            }
        }
        let country_calling_code = number.country_code();
        let national_significant_number = self.get_national_significant_number(number);
        if number_format == PhoneNumberFormat::E164 {
            // Early exit for E164 case (even if the country calling code is
            // invalid) since no formatting of the national number needs to be
            // applied. Extensions are not formatted.
            let mut formatted = national_significant_number;
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted,
            );
            return Ok(Cow::Owned(formatted));
        }
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Owned(national_significant_number));
        }
        // Note get_region_code_for_country_code() is used because formatting
        // information for regions which share a country calling code is
        // contained by only one region for performance reasons.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        // Metadata cannot be null because the country calling code is valid.
        let metadata = self
            .get_metadata_for_region_or_calling_code(country_calling_code, region_code)
            .ok_or(InvalidMetadataForValidRegionError)?;
        let mut formatted =
            self.format_nsn(&national_significant_number, metadata, number_format, "")?;
        self.maybe_append_formatted_extension(number, metadata, number_format, &mut formatted);
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted,
        );
        Ok(Cow::Owned(formatted))
    }

    pub fn format_by_pattern(
        &self,
        number: &PhoneNumber,
        number_format: PhoneNumberFormat,
        user_defined_formats: &[NumberFormat],
    ) -> Result<String, InternalLogicError> {
        let country_calling_code = number.country_code();
        let national_significant_number = self.get_national_significant_number(number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(national_significant_number);
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let metadata = self
            .get_metadata_for_region_or_calling_code(country_calling_code, region_code)
            .ok_or(InvalidMetadataForValidRegionError)?;
        let mut formatted = match self
            .choose_formatting_pattern_for_number(user_defined_formats, &national_significant_number)?
        {
            // If no pattern above is matched, we format the number as a whole.
            None => national_significant_number.clone(),
            Some(formatting_pattern) => {
                let mut num_format_copy = formatting_pattern.clone();
                // Before we do a replacement of the national prefix pattern $NP
                // with the national prefix, we need to copy the rule so that
                // subsequent replacements for different numbers have the
                // appropriate national prefix.
                let national_prefix_formatting_rule =
                    formatting_pattern.national_prefix_formatting_rule();
                if !national_prefix_formatting_rule.is_empty() {
                    let national_prefix = metadata.national_prefix();
                    if !national_prefix.is_empty() {
                        // Replace $NP with national prefix and $FG with the
                        // first group ($1).
                        let rule = self
                            .reg_exps
                            .np_pattern
                            .replace(national_prefix_formatting_rule, NoExpand(national_prefix))
                            .into_owned();
                        let rule = self
                            .reg_exps
                            .fg_pattern
                            .replace(&rule, NoExpand("$1"))
                            .into_owned();
                        num_format_copy.set_national_prefix_formatting_rule(rule);
                    } else {
                        // We don't want to have a rule for how to format the
                        // national prefix if there isn't one.
                        num_format_copy.clear_national_prefix_formatting_rule();
                    }
                }
                self.format_nsn_using_pattern_with_carrier(
                    &national_significant_number,
                    &num_format_copy,
                    number_format,
                    "",
                )?
            }
        };
        self.maybe_append_formatted_extension(number, metadata, number_format, &mut formatted);
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted,
        );
        Ok(formatted)
    }

    pub fn format_national_number_with_carrier_code(
        &self,
        number: &PhoneNumber,
        carrier_code: &str,
    ) -> Result<String, InternalLogicError> {
        let country_calling_code = number.country_code();
        let national_significant_number = self.get_national_significant_number(number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(national_significant_number);
        }
        // Note get_region_code_for_country_code() is used because formatting
        // information for regions which share a country calling code is
        // contained by only one region for performance reasons.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let metadata = self
            .get_metadata_for_region_or_calling_code(country_calling_code, region_code)
            .ok_or(InvalidMetadataForValidRegionError)?;
        let mut formatted = self.format_nsn(
            &national_significant_number,
            metadata,
            PhoneNumberFormat::National,
            carrier_code,
        )?;
        self.maybe_append_formatted_extension(
            number,
            metadata,
            PhoneNumberFormat::National,
            &mut formatted,
        );
        prefix_number_with_country_calling_code(
            country_calling_code,
            PhoneNumberFormat::National,
            &mut formatted,
        );
        Ok(formatted)
    }

    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        number: &PhoneNumber,
        fallback_carrier_code: &str,
    ) -> Result<String, InternalLogicError> {
        // Historically, we set this to an empty string when parsing with no
        // carrier code present, so here we treat the empty string the same as
        // an absent field.
        let carrier_code = if !number.preferred_domestic_carrier_code().is_empty() {
            number.preferred_domestic_carrier_code()
        } else {
            fallback_carrier_code
        };
        self.format_national_number_with_carrier_code(number, carrier_code)
    }

    pub fn format_number_for_mobile_dialing<'a>(
        &self,
        number: &'a PhoneNumber,
        region_calling_from: &str,
        with_formatting: bool,
    ) -> Result<Cow<'a, str>, InternalLogicError> {
        let country_calling_code = number.country_code();
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(if number.has_raw_input() {
                Cow::Borrowed(number.raw_input())
            } else {
                Cow::Borrowed("")
            });
        }
        // Clear the extension, as that part cannot normally be dialed together
        // with the main number.
        let mut number_no_extension = number.clone();
        number_no_extension.clear_extension();
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let number_type = self.get_number_type(&number_no_extension)?;
        let is_valid_number = number_type != PhoneNumberType::Unknown;
        let formatted_number;
        if region_calling_from == region_code {
            let is_fixed_line_or_mobile = matches!(
                number_type,
                PhoneNumberType::FixedLine
                    | PhoneNumberType::Mobile
                    | PhoneNumberType::FixedLineOrMobile
            );
            // Carrier codes may be needed in some countries. We handle this here.
            if region_code == "CO" && number_type == PhoneNumberType::FixedLine {
                formatted_number = self.format_national_number_with_carrier_code(
                    &number_no_extension,
                    COLOMBIA_MOBILE_TO_FIXED_LINE_PREFIX,
                )?;
            } else if region_code == "BR" && is_fixed_line_or_mobile {
                formatted_number = if !number_no_extension
                    .preferred_domestic_carrier_code()
                    .is_empty()
                {
                    self.format_national_number_with_preferred_carrier_code(
                        &number_no_extension,
                        "",
                    )?
                } else {
                    // Brazilian fixed line and mobile numbers need to be dialed
                    // with a carrier code when called within Brazil. Without
                    // that, most of the carriers won't connect the call.
                    // Because of that, we return an empty string here.
                    String::new()
                };
            } else if region_code == "HU" && is_valid_number {
                // The national format for HU numbers doesn't contain the
                // national prefix, because that is how numbers are normally
                // written down. However, the national prefix is obligatory when
                // dialing from a mobile phone.
                let national = self
                    .format(&number_no_extension, PhoneNumberFormat::National)?
                    .into_owned();
                let hu_national_prefix = self
                    .get_ndd_prefix_for_region(region_code, true)
                    .unwrap_or_default();
                formatted_number =
                    fast_cat::concat_str!(&hu_national_prefix, " ", &national);
            } else if country_calling_code == NANPA_COUNTRY_CODE {
                // For NANPA countries, we output international format for
                // numbers that can be dialed internationally, since that always
                // works.
                let region_metadata = self
                    .get_metadata_for_region(region_calling_from)
                    .ok_or(InvalidMetadataForValidRegionError)?;
                let national_number =
                    self.get_national_significant_number(&number_no_extension);
                if self.can_be_internationally_dialled(&number_no_extension)?
                    && test_number_length_with_unknown_type(&national_number, region_metadata)
                        != Err(ValidationError::TooShort)
                {
                    formatted_number = self
                        .format(&number_no_extension, PhoneNumberFormat::International)?
                        .into_owned();
                } else {
                    formatted_number = self
                        .format(&number_no_extension, PhoneNumberFormat::National)?
                        .into_owned();
                }
            } else {
                // For non-geographical countries, and Mexican, Chilean and
                // Uzbek fixed line and mobile numbers, we output international
                // format for numbers that can be dialed internationally, as
                // that always works.
                if (region_code == REGION_CODE_FOR_NON_GEO_ENTITY
                    || ((region_code == "MX" || region_code == "CL" || region_code == "UZ")
                        && is_fixed_line_or_mobile))
                    && self.can_be_internationally_dialled(&number_no_extension)?
                {
                    formatted_number = self
                        .format(&number_no_extension, PhoneNumberFormat::International)?
                        .into_owned();
                } else {
                    formatted_number = self
                        .format(&number_no_extension, PhoneNumberFormat::National)?
                        .into_owned();
                }
            }
        } else if is_valid_number
            && self.can_be_internationally_dialled(&number_no_extension)?
        {
            // We assume that short numbers are not diallable from outside their
            // region, so if a number is not a valid regular length phone
            // number, we treat it as if it cannot be internationally dialled.
            return Ok(Cow::Owned(if with_formatting {
                self.format(&number_no_extension, PhoneNumberFormat::International)?
                    .into_owned()
            } else {
                self.format(&number_no_extension, PhoneNumberFormat::E164)?
                    .into_owned()
            }));
        } else {
            formatted_number = String::new();
        }
        Ok(Cow::Owned(if with_formatting {
            formatted_number
        } else {
            self.normalize_diallable_chars_only(&formatted_number)
        }))
    }

    pub fn format_out_of_country_calling_number<'a>(
        &self,
        number: &'a PhoneNumber,
        region_calling_from: &str,
    ) -> Result<Cow<'a, str>, InternalLogicError> {
        if !self.is_valid_region_code(region_calling_from) {
            return self.format(number, PhoneNumberFormat::International);
        }
        let country_calling_code = number.country_code();
        let national_significant_number = self.get_national_significant_number(number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Owned(national_significant_number));
        }
        if country_calling_code == NANPA_COUNTRY_CODE {
            if self.is_nanpa_country(region_calling_from) {
                // For NANPA regions, return the national format for these
                // regions but prefix it with the country calling code.
                let national = self.format(number, PhoneNumberFormat::National)?.into_owned();
                let mut buf = itoa::Buffer::new();
                let country_code_str = buf.format(country_calling_code);
                return Ok(Cow::Owned(fast_cat::concat_str!(
                    country_code_str,
                    " ",
                    &national
                )));
            }
        } else if country_calling_code
            == self.get_country_code_for_valid_region(region_calling_from)?
        {
            // If regions share a country calling code, the country calling
            // code need not be dialled. This also applies when dialling within
            // a region, so this if clause covers both these cases. Technically
            // this is the case for dialling from La Reunion to other overseas
            // departments of France (French Guiana, Martinique, Guadeloupe),
            // but not vice versa, so we don't cover this edge case for now and
            // for those cases return the version including country calling
            // code.
            return self.format(number, PhoneNumberFormat::National);
        }
        let metadata_calling_from = self
            .get_metadata_for_region(region_calling_from)
            .ok_or(InvalidMetadataForValidRegionError)?;
        let international_prefix = metadata_calling_from.international_prefix();
        // In general, if there is a preferred international prefix, use that.
        // Otherwise, for regions that have multiple international prefixes, the
        // international format of the number is returned since we would not
        // know which one to use.
        let international_prefix_for_formatting = if self
            .reg_exps
            .single_international_prefix
            .full_match(international_prefix)
        {
            international_prefix
        } else if metadata_calling_from.has_preferred_international_prefix() {
            metadata_calling_from.preferred_international_prefix()
        } else {
            ""
        };
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        // Metadata cannot be null because the country calling code is valid.
        let metadata_for_region = self
            .get_metadata_for_region_or_calling_code(country_calling_code, region_code)
            .ok_or(InvalidMetadataForValidRegionError)?;
        let mut formatted = self.format_nsn(
            &national_significant_number,
            metadata_for_region,
            PhoneNumberFormat::International,
            "",
        )?;
        self.maybe_append_formatted_extension(
            number,
            metadata_for_region,
            PhoneNumberFormat::International,
            &mut formatted,
        );
        if !international_prefix_for_formatting.is_empty() {
            let mut buf = itoa::Buffer::new();
            let country_code_str = buf.format(country_calling_code);
            formatted = fast_cat::concat_str!(
                international_prefix_for_formatting,
                " ",
                country_code_str,
                " ",
                &formatted
            );
        } else {
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::International,
                &mut formatted,
            );
        }
        Ok(Cow::Owned(formatted))
    }

    pub fn format_out_of_country_keeping_alpha_chars<'a>(
        &self,
        number: &'a PhoneNumber,
        region_calling_from: &str,
    ) -> Result<Cow<'a, str>, InternalLogicError> {
        let raw_input = number.raw_input();
        // If there is no raw input, then we can't keep alpha characters because
        // there aren't any. In this case, we return
        // format_out_of_country_calling_number.
        if raw_input.is_empty() {
            return self.format_out_of_country_calling_number(number, region_calling_from);
        }
        let country_calling_code = number.country_code();
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Borrowed(raw_input));
        }
        // Strip any prefix such as country calling code, IDD, that was present.
        // We do this by comparing the number in raw_input with the parsed
        // number. To do this, first we normalize punctuation. We retain number
        // grouping symbols such as " " only.
        let mut raw_input_copy = raw_input.to_owned();
        normalize_helper(
            &self.reg_exps.all_plus_number_grouping_symbols,
            true,
            &mut raw_input_copy,
        );
        // The extension cannot be kept inline; it is cut off here and appended
        // back, formatted, at the end.
        self.maybe_strip_extension(&mut raw_input_copy);
        // Now we trim everything before the first three digits in the parsed
        // number. We choose three because all valid alpha numbers have 3 digits
        // at the start - if it does not, then we don't trim anything at all.
        // Similarly, if the national number was less than three digits, we
        // don't trim anything at all.
        let national_number = self.get_national_significant_number(number);
        if national_number.len() > 3 {
            if let Some(first_national_number_digit) =
                raw_input_copy.find(&national_number[..3])
            {
                raw_input_copy = raw_input_copy[first_national_number_digit..].to_owned();
            }
        }
        let metadata_calling_from = self.get_metadata_for_region(region_calling_from);
        let mut formatted;
        'formatting: {
            if country_calling_code == NANPA_COUNTRY_CODE {
                if self.is_nanpa_country(region_calling_from) {
                    let mut buf = itoa::Buffer::new();
                    let country_code_str = buf.format(country_calling_code);
                    formatted =
                        fast_cat::concat_str!(country_code_str, " ", &raw_input_copy);
                    break 'formatting;
                }
            } else if metadata_calling_from.is_some()
                && country_calling_code
                    == self.get_country_code_for_valid_region(region_calling_from)?
            {
                let metadata = metadata_calling_from.ok_or(InvalidMetadataForValidRegionError)?;
                match self
                    .choose_formatting_pattern_for_number(&metadata.number_format, &national_number)?
                {
                    None => {
                        formatted = raw_input_copy;
                        break 'formatting;
                    }
                    Some(formatting_pattern) => {
                        let mut new_format = formatting_pattern.clone();
                        // The first group is the first group of digits that the
                        // user wrote together.
                        new_format.set_pattern("(\\d+)(.*)".to_owned());
                        // Here we just concatenate them back together after the
                        // national prefix has been fixed.
                        new_format.set_format("$1$2".to_owned());
                        // Now we format using this pattern instead of the
                        // default pattern, but with the national prefix
                        // prefixed if necessary. This will not work in the case
                        // where we have to apply a national prefix
                        // transformation rule, since the number portion might
                        // then differ from the raw input.
                        formatted = self.format_nsn_using_pattern_with_carrier(
                            &raw_input_copy,
                            &new_format,
                            PhoneNumberFormat::National,
                            "",
                        )?;
                        break 'formatting;
                    }
                }
            }
            let mut international_prefix_for_formatting = "";
            // If an unsupported region-calling-from is entered, or a country
            // with multiple international prefixes, the international format of
            // the number is returned, unless there is a preferred international
            // prefix.
            if let Some(metadata) = metadata_calling_from {
                let international_prefix = metadata.international_prefix();
                international_prefix_for_formatting = if self
                    .reg_exps
                    .single_international_prefix
                    .full_match(international_prefix)
                {
                    international_prefix
                } else {
                    metadata.preferred_international_prefix()
                };
            }
            if !international_prefix_for_formatting.is_empty() {
                let mut buf = itoa::Buffer::new();
                let country_code_str = buf.format(country_calling_code);
                formatted = fast_cat::concat_str!(
                    international_prefix_for_formatting,
                    " ",
                    country_code_str,
                    " ",
                    &raw_input_copy
                );
            } else {
                // Invalid region entered as country-calling-from (so no
                // metadata was found for it) or the region chosen has multiple
                // international dialling prefixes.
                formatted = raw_input_copy;
                prefix_number_with_country_calling_code(
                    country_calling_code,
                    PhoneNumberFormat::International,
                    &mut formatted,
                );
            }
        }
        // The extension (if any) goes back on the end, formatted per the
        // conventions of the number's own region.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        if let Some(metadata_for_region) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        {
            self.maybe_append_formatted_extension(
                number,
                metadata_for_region,
                PhoneNumberFormat::International,
                &mut formatted,
            );
        }
        Ok(Cow::Owned(formatted))
    }

    fn has_formatting_pattern_for_number(
        &self,
        number: &PhoneNumber,
    ) -> Result<bool, InternalLogicError> {
        let country_calling_code = number.country_code();
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let metadata =
            match self.get_metadata_for_region_or_calling_code(country_calling_code, region_code) {
                None => return Ok(false),
                Some(metadata) => metadata,
            };
        let national_number = self.get_national_significant_number(number);
        Ok(self
            .choose_formatting_pattern_for_number(&metadata.number_format, &national_number)?
            .is_some())
    }

    /// Checks whether the raw input of a number began with the region's
    /// national prefix, by verifying that what remains after it parses as a
    /// valid number. Plain prefix matching would mistake numbers that merely
    /// start with the same digits.
    fn raw_input_contains_national_prefix(
        &self,
        raw_input: &str,
        national_prefix: &str,
        region_code: &str,
    ) -> bool {
        let normalized_national_number = self.normalize_digits_only(raw_input);
        if let Some(remainder) = normalized_national_number.strip_prefix(national_prefix) {
            match self.parse(remainder, region_code) {
                Ok(parsed) => self.is_valid_number(&parsed).unwrap_or(false),
                Err(_) => false,
            }
        } else {
            false
        }
    }

    pub fn format_in_original_format<'a>(
        &self,
        number: &'a PhoneNumber,
        region_calling_from: &str,
    ) -> Result<Cow<'a, str>, InternalLogicError> {
        if number.has_raw_input() && !self.has_formatting_pattern_for_number(number)? {
            // We check if we have the formatting pattern because without that,
            // we might format the number as a group without national prefix.
            return Ok(Cow::Borrowed(number.raw_input()));
        }
        if !number.has_country_code_source() {
            return self.format(number, PhoneNumberFormat::National);
        }
        let formatted = match number.country_code_source() {
            CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN => self
                .format(number, PhoneNumberFormat::International)?
                .into_owned(),
            CountryCodeSource::FROM_NUMBER_WITH_IDD => self
                .format_out_of_country_calling_number(number, region_calling_from)?
                .into_owned(),
            CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN => {
                let international = self.format(number, PhoneNumberFormat::International)?;
                strip_cow_prefix(international, PLUS_SIGN)
                    .map(Cow::into_owned)
                    .unwrap_or_default()
            }
            CountryCodeSource::FROM_DEFAULT_COUNTRY | CountryCodeSource::UNSPECIFIED => {
                let region_code =
                    self.get_region_code_for_country_code(number.country_code());
                // We strip non-digits from the NDD here, and from the raw input
                // later, so that we can compare them easily.
                let national_prefix = self.get_ndd_prefix_for_region(region_code, true);
                let national_format = self
                    .format(number, PhoneNumberFormat::National)?
                    .into_owned();
                match national_prefix {
                    None => national_format,
                    Some(national_prefix) if national_prefix.is_empty() => national_format,
                    Some(national_prefix) => {
                        if self.raw_input_contains_national_prefix(
                            number.raw_input(),
                            &national_prefix,
                            region_code,
                        ) {
                            // If so, we can safely return the national format.
                            national_format
                        } else {
                            // Metadata cannot be null here because
                            // get_ndd_prefix_for_region() (above) returns null
                            // if there is no metadata for the region.
                            let metadata = self
                                .get_metadata_for_region(region_code)
                                .ok_or(InvalidMetadataForValidRegionError)?;
                            let national_number =
                                self.get_national_significant_number(number);
                            let format_rule = self.choose_formatting_pattern_for_number(
                                &metadata.number_format,
                                &national_number,
                            )?;
                            match format_rule {
                                // If no format pattern matches the number, we
                                // format it as the national format.
                                None => national_format,
                                Some(format_rule) => {
                                    // The format rule could still be null here
                                    // if the national number was 0 and there
                                    // was no raw input (this should not be
                                    // possible for numbers generated by the
                                    // phonenumber library as they would also
                                    // not have a country calling code and we
                                    // would have exited earlier).
                                    let candidate_rule =
                                        format_rule.national_prefix_formatting_rule();
                                    // When the format we apply to this number
                                    // doesn't contain national prefix, we can
                                    // just return the national format.
                                    match candidate_rule.find("$1") {
                                        None | Some(0) => national_format,
                                        Some(index_of_first_group) => {
                                            let candidate = self.normalize_digits_only(
                                                &candidate_rule[..index_of_first_group],
                                            );
                                            if candidate.is_empty() {
                                                national_format
                                            } else {
                                                // Otherwise, we need to remove
                                                // the national prefix from our
                                                // output.
                                                let mut copy = format_rule.clone();
                                                copy.clear_national_prefix_formatting_rule();
                                                self.format_by_pattern(
                                                    number,
                                                    PhoneNumberFormat::National,
                                                    &[copy],
                                                )?
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };
        // If no digit is inserted/removed/modified as a result of our
        // formatting, we return the formatted phone number; otherwise we
        // return the raw input the user entered.
        let raw_input = number.raw_input();
        if !formatted.is_empty() && !raw_input.is_empty() {
            let normalized_formatted = self.normalize_diallable_chars_only(&formatted);
            let normalized_raw_input = self.normalize_diallable_chars_only(raw_input);
            if normalized_formatted != normalized_raw_input {
                return Ok(Cow::Borrowed(raw_input));
            }
        }
        Ok(Cow::Owned(formatted))
    }

    // -----------------------------------------------------------------
    // Classifier.
    // -----------------------------------------------------------------

    fn is_number_matching_desc(
        &self,
        national_number: &str,
        desc: &crate::phonemetadata::PhoneNumberDesc,
    ) -> bool {
        // Check if any possible number lengths are present; if so, we use them
        // to avoid checking the validation pattern if they don't match. If they
        // are absent, this means they match the general description, which we
        // have already checked before a specific number type.
        let actual_length = national_number.len() as i32;
        if !desc.possible_length.is_empty() && !desc.possible_length.contains(&actual_length) {
            return false;
        }
        self.matcher.match_national_number(national_number, desc, false)
    }

    fn get_number_type_helper(
        &self,
        national_number: &str,
        metadata: &PhoneMetadata,
    ) -> PhoneNumberType {
        if !self.is_number_matching_desc(national_number, &metadata.general_desc) {
            return PhoneNumberType::Unknown;
        }
        if self.is_number_matching_desc(national_number, &metadata.premium_rate) {
            return PhoneNumberType::PremiumRate;
        }
        if self.is_number_matching_desc(national_number, &metadata.toll_free) {
            return PhoneNumberType::TollFree;
        }
        if self.is_number_matching_desc(national_number, &metadata.shared_cost) {
            return PhoneNumberType::SharedCost;
        }
        if self.is_number_matching_desc(national_number, &metadata.voip) {
            return PhoneNumberType::VoIP;
        }
        if self.is_number_matching_desc(national_number, &metadata.personal_number) {
            return PhoneNumberType::PersonalNumber;
        }
        if self.is_number_matching_desc(national_number, &metadata.pager) {
            return PhoneNumberType::Pager;
        }
        if self.is_number_matching_desc(national_number, &metadata.uan) {
            return PhoneNumberType::UAN;
        }
        if self.is_number_matching_desc(national_number, &metadata.voicemail) {
            return PhoneNumberType::VoiceMail;
        }
        if self.is_number_matching_desc(national_number, &metadata.fixed_line) {
            if metadata.same_mobile_and_fixed_line_pattern {
                return PhoneNumberType::FixedLineOrMobile;
            }
            if self.is_number_matching_desc(national_number, &metadata.mobile) {
                return PhoneNumberType::FixedLineOrMobile;
            }
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if
        // certain that the patterns for mobile and fixed line aren't the same.
        if !metadata.same_mobile_and_fixed_line_pattern
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            return PhoneNumberType::Mobile;
        }
        PhoneNumberType::Unknown
    }

    pub fn get_number_type(
        &self,
        number: &PhoneNumber,
    ) -> Result<PhoneNumberType, InternalLogicError> {
        let region_code = self.get_region_code_for_number(number)?;
        let metadata =
            self.get_metadata_for_region_or_calling_code(number.country_code(), region_code);
        match metadata {
            None => Ok(PhoneNumberType::Unknown),
            Some(metadata) => {
                let national_significant_number = self.get_national_significant_number(number);
                Ok(self.get_number_type_helper(&national_significant_number, metadata))
            }
        }
    }

    pub fn get_region_code_for_number(
        &self,
        number: &PhoneNumber,
    ) -> Result<&str, InternalLogicError> {
        let country_calling_code = number.country_code();
        match self
            .country_calling_code_to_region_codes
            .get(&country_calling_code)
        {
            None => Ok(RegionCode::get_unknown()),
            Some(region_codes) => {
                if region_codes.len() == 1 {
                    Ok(&region_codes[0])
                } else {
                    self.get_region_code_for_number_from_region_list(number, region_codes)
                }
            }
        }
    }

    fn get_region_code_for_number_from_region_list<'a>(
        &'a self,
        number: &PhoneNumber,
        region_codes: &'a [String],
    ) -> Result<&'a str, InternalLogicError> {
        let national_number = self.get_national_significant_number(number);
        for region_code in region_codes {
            // If leading_digits is present, use this. Otherwise, do full
            // validation. Metadata cannot be null because the region codes come
            // from the country calling code map.
            let metadata = self
                .get_metadata_for_region(region_code)
                .ok_or(InvalidMetadataForValidRegionError)?;
            if metadata.has_leading_digits() {
                let leading_digits_regex = self
                    .reg_exps
                    .regexp_cache
                    .get_regex(metadata.leading_digits())?;
                if leading_digits_regex.matches_start(&national_number) {
                    return Ok(region_code);
                }
            } else if self.get_number_type_helper(&national_number, metadata)
                != PhoneNumberType::Unknown
            {
                return Ok(region_code);
            }
        }
        Ok(RegionCode::get_unknown())
    }

    pub fn is_valid_number(&self, number: &PhoneNumber) -> Result<bool, InternalLogicError> {
        let region_code = self.get_region_code_for_number(number)?;
        self.is_valid_number_for_region(number, region_code)
    }

    pub fn is_valid_number_for_region(
        &self,
        number: &PhoneNumber,
        region_code: &str,
    ) -> Result<bool, InternalLogicError> {
        let country_code = number.country_code();
        let metadata = self.get_metadata_for_region_or_calling_code(country_code, region_code);
        let metadata = match metadata {
            None => return Ok(false),
            Some(metadata) => metadata,
        };
        if region_code != REGION_CODE_FOR_NON_GEO_ENTITY
            && metadata.country_code() != country_code
        {
            // Either the region code was invalid, or the country calling code
            // for a given region was not the same as that of the number.
            return Ok(false);
        }
        let national_number = self.get_national_significant_number(number);
        // Legacy metadata may carry no general pattern at all; fall back to a
        // pure length check.
        if !metadata.general_desc.has_national_number_pattern() {
            let number_length = national_number.len();
            return Ok(number_length > MIN_LENGTH_FOR_NSN && number_length <= MAX_LENGTH_FOR_NSN);
        }
        Ok(self.get_number_type_helper(&national_number, metadata) != PhoneNumberType::Unknown)
    }

    pub fn is_possible_number(&self, number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(number).is_ok()
    }

    pub fn is_possible_number_for_type(
        &self,
        number: &PhoneNumber,
        number_type: PhoneNumberType,
    ) -> bool {
        self.is_possible_number_for_type_with_reason(number, number_type)
            .is_ok()
    }

    pub fn is_possible_number_with_reason(
        &self,
        number: &PhoneNumber,
    ) -> Result<NumberLengthType, ValidationError> {
        self.is_possible_number_for_type_with_reason(number, PhoneNumberType::Unknown)
    }

    pub fn is_possible_number_for_type_with_reason(
        &self,
        number: &PhoneNumber,
        number_type: PhoneNumberType,
    ) -> Result<NumberLengthType, ValidationError> {
        let national_number = self.get_national_significant_number(number);
        let country_code = number.country_code();
        // Note: for regions that share a country calling code, like NANPA
        // numbers, we just use the rules from the default region (US in this
        // case) since the get_region_code_for_number will not work if the
        // number is possible but not valid.
        if !self.has_valid_country_calling_code(country_code) {
            return Err(ValidationError::InvalidCountryCode);
        }
        let region_code = self.get_region_code_for_country_code(country_code);
        // Metadata cannot be null because the country calling code is valid.
        let metadata =
            match self.get_metadata_for_region_or_calling_code(country_code, region_code) {
                None => return Err(ValidationError::InvalidCountryCode),
                Some(metadata) => metadata,
            };
        test_number_length(&national_number, metadata, number_type)
    }

    pub fn is_possible_number_for_string(
        &self,
        number: &str,
        region_dialing_from: &str,
    ) -> bool {
        match self.parse(number, region_dialing_from) {
            Ok(parsed) => self.is_possible_number(&parsed),
            Err(_) => false,
        }
    }

    fn is_number_geographical_helper(
        &self,
        number_type: PhoneNumberType,
        country_calling_code: i32,
    ) -> bool {
        number_type == PhoneNumberType::FixedLine
            || number_type == PhoneNumberType::FixedLineOrMobile
            || (self
                .reg_exps
                .geo_mobile_countries
                .contains(&country_calling_code)
                && number_type == PhoneNumberType::Mobile)
    }

    pub fn is_number_geographical(
        &self,
        number: &PhoneNumber,
    ) -> Result<bool, InternalLogicError> {
        let number_type = self.get_number_type(number)?;
        Ok(self.is_number_geographical_helper(number_type, number.country_code()))
    }

    pub fn get_length_of_geographical_area_code(
        &self,
        number: &PhoneNumber,
    ) -> Result<usize, InternalLogicError> {
        let region_code = self.get_region_code_for_number(number)?;
        let metadata = match self.get_metadata_for_region(region_code) {
            None => return Ok(0),
            Some(metadata) => metadata,
        };
        let country_calling_code = number.country_code();
        // If a country doesn't use a national prefix, and this number doesn't
        // have an Italian leading zero, we assume it is a closed dialling plan
        // with no area codes.
        if !metadata.has_national_prefix()
            && !number.italian_leading_zero()
            && !self
                .reg_exps
                .countries_without_national_prefix_with_area_codes
                .contains(&country_calling_code)
        {
            return Ok(0);
        }
        let number_type = self.get_number_type(number)?;
        if number_type == PhoneNumberType::Mobile
            && self
                .reg_exps
                .geo_mobile_countries_without_mobile_area_codes
                .contains(&country_calling_code)
        {
            // Note this is a rough heuristic; it doesn't cover Indonesia etc.
            return Ok(0);
        }
        if !self.is_number_geographical_helper(number_type, country_calling_code) {
            return Ok(0);
        }
        self.get_length_of_national_destination_code(number)
    }

    pub fn get_length_of_national_destination_code(
        &self,
        number: &PhoneNumber,
    ) -> Result<usize, InternalLogicError> {
        let copied_proto = if number.has_extension() {
            // We don't want to alter the proto given to us, but we don't want to
            // include the extension when we format it, so we copy it and clear
            // the extension here.
            let mut copy = number.clone();
            copy.clear_extension();
            Cow::Owned(copy)
        } else {
            Cow::Borrowed(number)
        };
        let formatted_number = self.format(&copied_proto, PhoneNumberFormat::International)?;
        let digit_groups: Vec<&str> = self
            .reg_exps
            .capturing_ascii_digits_pattern
            .find_iter(&formatted_number)
            .map(|m| m.as_str())
            .collect();
        // The international format starts with "+COUNTRY_CODE", so the first
        // group of digits is the country calling code, and the second is the
        // national destination code, if it is not the last group.
        if digit_groups.len() <= 2 {
            return Ok(0);
        }
        if self.get_number_type(number)? == PhoneNumberType::Mobile {
            // For example Argentinian mobile numbers, when formatted in the
            // international format, are in the form of +54 9 NDC XXXX.... As a
            // result, we take the length of the third group (NDC) and add the
            // length of the mobile token.
            if self
                .get_country_mobile_token(number.country_code())
                .is_some()
            {
                return Ok(digit_groups[1].len() + digit_groups[2].len());
            }
        }
        Ok(digit_groups[1].len())
    }

    pub fn can_be_internationally_dialled(
        &self,
        number: &PhoneNumber,
    ) -> Result<bool, InternalLogicError> {
        let region_code = self.get_region_code_for_number(number)?;
        let metadata = match self.get_metadata_for_region(region_code) {
            // Note numbers belonging to non-geographical entities (global
            // networks) are always internationally diallable, and will be
            // caught here.
            None => return Ok(true),
            Some(metadata) => metadata,
        };
        let national_significant_number = self.get_national_significant_number(number);
        Ok(!self.is_number_matching_desc(
            &national_significant_number,
            &metadata.no_international_dialling,
        ))
    }

    pub fn truncate_too_long_number(
        &self,
        number: &mut PhoneNumber,
    ) -> Result<bool, InternalLogicError> {
        if self.is_valid_number(number)? {
            return Ok(true);
        }
        let mut number_copy = number.clone();
        let mut national_number = number.national_number();
        loop {
            national_number /= 10;
            number_copy.set_national_number(national_number);
            if national_number == 0
                || self.is_possible_number_with_reason(&number_copy)
                    == Err(ValidationError::TooShort)
            {
                return Ok(false);
            }
            if self.is_valid_number(&number_copy)? {
                break;
            }
        }
        number.set_national_number(national_number);
        Ok(true)
    }

    // -----------------------------------------------------------------
    // Example numbers.
    // -----------------------------------------------------------------

    pub fn get_example_number(
        &self,
        region_code: &str,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        self.get_example_number_for_type_and_region_code(region_code, PhoneNumberType::FixedLine)
    }

    pub fn get_example_number_for_type_and_region_code(
        &self,
        region_code: &str,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        let metadata = match self.get_metadata_for_region(region_code) {
            None => return Err(GetExampleNumberError::InvalidRegionCode.into()),
            Some(metadata) => metadata,
        };
        let desc = get_number_desc_by_type(metadata, number_type);
        if desc.has_example_number() {
            return self
                .parse(desc.example_number(), region_code)
                .map_err(GetExampleNumberErrorInternal::from);
        }
        Err(GetExampleNumberError::NoExampleNumber.into())
    }

    pub fn get_example_number_for_type(
        &self,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        for region_code in self.region_to_metadata.keys() {
            if let Ok(number) =
                self.get_example_number_for_type_and_region_code(region_code, number_type)
            {
                return Ok(number);
            }
        }
        // If there wasn't an example number for a region, try the
        // non-geographical entities.
        for country_calling_code in self.country_code_to_non_geographical_metadata.keys() {
            let metadata = match self.get_metadata_for_non_geographical_region(*country_calling_code)
            {
                None => continue,
                Some(metadata) => metadata,
            };
            let desc = get_number_desc_by_type(metadata, number_type);
            if desc.has_example_number() {
                let mut buf = itoa::Buffer::new();
                let candidate = fast_cat::concat_str!(
                    PLUS_SIGN,
                    buf.format(*country_calling_code),
                    desc.example_number()
                );
                if let Ok(number) = self.parse(&candidate, RegionCode::get_unknown()) {
                    return Ok(number);
                }
            }
        }
        // There are no example numbers of this type for any country in the
        // library.
        Err(GetExampleNumberError::CouldNotGetNumber.into())
    }

    pub fn get_example_number_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        let metadata = match self.get_metadata_for_non_geographical_region(country_calling_code) {
            None => return Err(GetExampleNumberError::InvalidRegionCode.into()),
            Some(metadata) => metadata,
        };
        // For geographical entities, fixed-line data is always present.
        // However, for non-geographical entities, this is not the case, so we
        // have to go through different types to find the example number.
        for desc in [
            &metadata.mobile,
            &metadata.toll_free,
            &metadata.shared_cost,
            &metadata.voip,
            &metadata.voicemail,
            &metadata.uan,
            &metadata.premium_rate,
        ] {
            if desc.has_example_number() {
                let mut buf = itoa::Buffer::new();
                let candidate = fast_cat::concat_str!(
                    PLUS_SIGN,
                    buf.format(country_calling_code),
                    desc.example_number()
                );
                if let Ok(number) = self.parse(&candidate, RegionCode::get_unknown()) {
                    return Ok(number);
                }
            }
        }
        Err(GetExampleNumberError::CouldNotGetNumber.into())
    }

    pub fn get_invalid_example_number(
        &self,
        region_code: &str,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        let metadata = match self.get_metadata_for_region(region_code) {
            None => return Err(GetExampleNumberError::InvalidRegionCode.into()),
            Some(metadata) => metadata,
        };
        // We start off with a valid fixed-line number since every country
        // supports this. Alternatively we could start with a different number
        // type, since fixed-line numbers typically have a wide breadth of valid
        // number lengths and we may have to make it very short before we get an
        // invalid number.
        let desc = get_number_desc_by_type(metadata, PhoneNumberType::FixedLine);
        if !desc.has_example_number() {
            // This shouldn't happen; we have a test for this.
            return Err(GetExampleNumberError::NoExampleNumber.into());
        }
        let example_number = desc.example_number();
        // Try and make the number invalid. We do this by changing the length.
        // We try reducing the length of the number, since currently no region
        // has a number that is the same length as MIN_LENGTH_FOR_NSN. This is
        // probably quicker than making the number longer, which is another
        // alternative. We could also use the possible number pattern to extract
        // the possible lengths of the number to make this faster, but this
        // method is only for unit-testing purposes since it doesn't work for
        // test numbers anyway.
        for phone_number_length in (MIN_LENGTH_FOR_NSN..example_number.len()).rev() {
            let number_to_try = &example_number[..phone_number_length];
            if let Ok(possibly_valid_number) = self.parse(number_to_try, region_code) {
                if !self.is_valid_number(&possibly_valid_number).unwrap_or(true) {
                    return Ok(possibly_valid_number);
                }
            }
            // Shouldn't happen: we have already checked the length, we know
            // example numbers have only valid digits, and we know the region
            // code is fine.
        }
        Err(GetExampleNumberError::CouldNotGetNumber.into())
    }

    // -----------------------------------------------------------------
    // Matcher.
    // -----------------------------------------------------------------

    pub fn is_number_match(
        &self,
        first_number_in: &PhoneNumber,
        second_number_in: &PhoneNumber,
    ) -> MatchType {
        // We only care about the fields that uniquely define a number, so we
        // copy these across explicitly.
        let mut first_number = PhoneNumber::new();
        copy_core_fields_only(first_number_in, &mut first_number);
        let mut second_number = PhoneNumber::new();
        copy_core_fields_only(second_number_in, &mut second_number);
        // Early exit if both had extensions and these are different.
        if first_number.has_extension()
            && second_number.has_extension()
            && first_number.extension() != second_number.extension()
        {
            return MatchType::NoMatch;
        }
        let first_number_country_code = first_number.country_code();
        let second_number_country_code = second_number.country_code();
        // Both had country calling code specified.
        if first_number_country_code != 0 && second_number_country_code != 0 {
            if first_number == second_number {
                return MatchType::ExactMatch;
            } else if first_number_country_code == second_number_country_code
                && is_national_number_suffix_of_the_other(&first_number, &second_number)
            {
                // A SHORT_NSN_MATCH occurs if there is a difference because of
                // the presence or absence of an 'Italian leading zero', the
                // presence or absence of an extension, or one NSN being a
                // shorter variant of the other.
                return MatchType::ShortNsnMatch;
            }
            // This is not a match.
            return MatchType::NoMatch;
        }
        // Checks cases where one or both country calling codes were not
        // specified. To make equality checks easier, we first set the country
        // code fields to be equal.
        first_number.set_country_code(second_number_country_code);
        // If all else was the same, then this is an NSN_MATCH.
        if first_number == second_number {
            return MatchType::NsnMatch;
        }
        if is_national_number_suffix_of_the_other(&first_number, &second_number) {
            return MatchType::ShortNsnMatch;
        }
        MatchType::NoMatch
    }

    pub fn is_number_match_with_two_strings(
        &self,
        first_number: &str,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberErrorInternal> {
        match self.parse(first_number, RegionCode::get_unknown()) {
            Ok(first_number_as_proto) => {
                self.is_number_match_with_one_string(&first_number_as_proto, second_number)
            }
            // Parsing against the unknown region reports the lack of a
            // country code either way, depending on whether a plus sign was
            // present; both mean we should try harder.
            Err(ParseErrorInternal::FailedToParse(
                ParseError::InvalidCountryCode | ParseError::MissingOrInvalidDefaultRegion,
            )) => {
                match self.parse(second_number, RegionCode::get_unknown()) {
                    Ok(second_number_as_proto) => {
                        self.is_number_match_with_one_string(&second_number_as_proto, first_number)
                    }
                    Err(ParseErrorInternal::FailedToParse(
                        ParseError::InvalidCountryCode
                        | ParseError::MissingOrInvalidDefaultRegion,
                    )) => {
                        let mut first_number_proto = PhoneNumber::new();
                        let mut second_number_proto = PhoneNumber::new();
                        self.parse_helper(first_number, None, false, false, &mut first_number_proto)
                            .map_err(InvalidNumberErrorInternal::from)?;
                        self.parse_helper(
                            second_number,
                            None,
                            false,
                            false,
                            &mut second_number_proto,
                        )
                        .map_err(InvalidNumberErrorInternal::from)?;
                        Ok(self.is_number_match(&first_number_proto, &second_number_proto))
                    }
                    Err(err) => Err(InvalidNumberErrorInternal::from(err)),
                }
            }
            Err(err) => Err(InvalidNumberErrorInternal::from(err)),
        }
    }

    // -----------------------------------------------------------------
    // Parser.
    // -----------------------------------------------------------------

    /// Attempts to extract a possible number from the string passed in.
    /// Starts from the first `+` or digit of any script, then trims
    /// trailing characters that are neither alphanumeric nor `#`, and cuts
    /// off anything that looks like the start of a second number.
    pub fn extract_possible_number<'a>(
        &self,
        number: &'a str,
    ) -> Result<&'a str, super::errors::ExtractNumberError> {
        let start = match self.reg_exps.valid_start_char_pattern.find(number) {
            None => return Err(super::errors::ExtractNumberError::NoValidStartCharacter),
            Some(m) => m.start(),
        };
        let mut number = &number[start..];
        // Remove trailing non-alpha non-numerical characters.
        while let Some(last) = number.chars().next_back() {
            let mut char_buf = [0u8; 4];
            let last_str: &str = last.encode_utf8(&mut char_buf);
            if self.reg_exps.unwanted_end_char_pattern.full_match(last_str) {
                number = &number[..number.len() - last.len_utf8()];
            } else {
                break;
            }
        }
        // Check for extra numbers at the end.
        if let Some(second_number) = self.reg_exps.second_number_start_pattern.find(number) {
            number = &number[..second_number.start()];
        }
        Ok(number)
    }

    /// Checks to see if the string of characters could possibly be a phone
    /// number at all. At the moment, checks to see that the string begins
    /// with at least 2 digits, ignoring any punctuation commonly found in
    /// phone numbers. This method does not require the number to be
    /// normalized in advance.
    pub fn is_viable_phone_number(&self, number: &str) -> bool {
        if number.len() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.full_match(number)
    }

    /// Strips any extension (as in, the part of the number dialled after the
    /// call is connected, usually indicated with extn, ext, x or similar) from
    /// the end of the number, and returns it.
    pub fn maybe_strip_extension(&self, number: &mut String) -> Option<String> {
        let (match_start, extension) = {
            let captures = self.reg_exps.extn_pattern.captures(number.as_str())?;
            let whole_match = captures.get(0)?;
            // If we find a potential extension, and the number preceding this is
            // a viable number, we assume it is an extension.
            if !self.is_viable_phone_number(&number[..whole_match.start()]) {
                return None;
            }
            // The numbers are captured into groups in the regular expression.
            let mut extension = None;
            for group_index in 1..captures.len() {
                if let Some(group) = captures.get(group_index) {
                    extension = Some(group.as_str().to_owned());
                    break;
                }
            }
            (whole_match.start(), extension?)
        };
        // We go through the capturing groups until one was matched.
        number.truncate(match_start);
        Some(extension)
    }

    /// Strips the IDD from the start of the number if present. Helper
    /// function used by maybe_strip_international_prefix_and_normalize.
    fn parse_prefix_as_idd(&self, idd_pattern: &regex::Regex, number: &mut String) -> bool {
        if let Some(idd_match) = idd_pattern.find_start(number) {
            let match_end = idd_match.end();
            // Only strip this if the first digit after the match is not a 0,
            // since country calling codes cannot begin with 0.
            if let Some(captures) = self
                .reg_exps
                .capturing_digit_pattern
                .captures(&number[match_end..])
            {
                if let Some(digit) = captures.get(1) {
                    let normalized_group = self.normalize_digits_only(digit.as_str());
                    if normalized_group == "0" {
                        return false;
                    }
                }
            }
            number.drain(..match_end);
            return true;
        }
        false
    }

    /// Strips any international prefix (such as +, 00, 011) present in the
    /// number provided, normalizes the resulting number, and reports how the
    /// country code was indicated.
    pub fn maybe_strip_international_prefix_and_normalize(
        &self,
        number: &mut String,
        possible_idd_prefix: &str,
    ) -> Result<CountryCodeSource, InvalidRegexError> {
        if number.is_empty() {
            return Ok(CountryCodeSource::FROM_DEFAULT_COUNTRY);
        }
        if let Some(plus_match) = self.reg_exps.plus_chars_pattern.find_start(number) {
            let match_end = plus_match.end();
            number.drain(..match_end);
            // Can now normalize the rest of the number since we've consumed
            // the "+" sign at the start.
            *number = self.normalize(number);
            return Ok(CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN);
        }
        // Attempt to parse the first digits as an international prefix.
        let idd_pattern = self.reg_exps.regexp_cache.get_regex(possible_idd_prefix)?;
        *number = self.normalize(number);
        Ok(if self.parse_prefix_as_idd(&idd_pattern, number) {
            CountryCodeSource::FROM_NUMBER_WITH_IDD
        } else {
            CountryCodeSource::FROM_DEFAULT_COUNTRY
        })
    }

    /// Strips any national prefix (such as 0, 1) present in the number
    /// provided, rewriting it via the transform rule when one applies, and
    /// appending a captured carrier selection code to `carrier_code`.
    /// Returns true if a national prefix or carrier code was stripped.
    pub fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        number: &mut String,
        metadata: &PhoneMetadata,
        carrier_code: Option<&mut String>,
    ) -> Result<bool, InvalidRegexError> {
        let possible_national_prefix = metadata.national_prefix_for_parsing();
        if number.is_empty() || possible_national_prefix.is_empty() {
            // Early return for numbers of zero length or with no national
            // prefix possible.
            return Ok(false);
        }
        // Attempt to parse the first digits as a national prefix.
        let prefix_regex = self
            .reg_exps
            .regexp_cache
            .get_regex(possible_national_prefix)?;
        let (whole_match_end, num_of_groups, last_group_present, first_group) = {
            let captures = match prefix_regex.captures_start(number.as_str()) {
                None => return Ok(false),
                Some(captures) => captures,
            };
            let num_of_groups = captures.len() - 1;
            (
                captures.get(0).map(|m| m.end()).unwrap_or(0),
                num_of_groups,
                num_of_groups > 0 && captures.get(num_of_groups).is_some(),
                captures.get(1).map(|m| m.as_str().to_owned()),
            )
        };
        let general_desc = &metadata.general_desc;
        // Check if the original number is viable.
        let is_viable_original_number =
            self.matcher.match_national_number(number, general_desc, false);
        // prefix_regex.group(num_of_groups) == null implies nothing was
        // captured by the capturing groups in possible_national_prefix;
        // therefore, no transformation is necessary, and we just remove the
        // national prefix.
        let transform_rule = metadata.national_prefix_transform_rule();
        if transform_rule.is_empty() || !last_group_present {
            // If the original number was viable, and the resultant number is
            // not, we return.
            if is_viable_original_number
                && !self.matcher.match_national_number(
                    &number[whole_match_end..],
                    general_desc,
                    false,
                )
            {
                return Ok(false);
            }
            if let Some(carrier_code) = carrier_code {
                if num_of_groups > 0 && last_group_present {
                    if let Some(first_group) = &first_group {
                        carrier_code.push_str(first_group);
                    }
                }
            }
            number.drain(..whole_match_end);
            Ok(true)
        } else {
            // Check that the resultant number is still viable. If not, return.
            // Check this by copying the string and making the transformation on
            // the copy first.
            let transformed = prefix_regex.replace(number.as_str(), transform_rule).into_owned();
            if is_viable_original_number
                && !self
                    .matcher
                    .match_national_number(&transformed, general_desc, false)
            {
                return Ok(false);
            }
            if let Some(carrier_code) = carrier_code {
                if num_of_groups > 1 {
                    if let Some(first_group) = &first_group {
                        carrier_code.push_str(first_group);
                    }
                }
            }
            *number = transformed;
            Ok(true)
        }
    }

    /// Extracts country calling code from `full_number`, returning it and the
    /// number with the calling code removed. It assumes that the leading plus
    /// sign or IDD has already been removed. Returns 0 and the untouched
    /// number if `full_number` doesn't start with a valid country calling
    /// code.
    fn extract_country_code<'a>(&self, full_number: &'a str) -> (i32, &'a str) {
        if full_number.is_empty() || full_number.starts_with('0') {
            // Country codes do not begin with a '0'.
            return (0, full_number);
        }
        for length in 1..=MAX_LENGTH_COUNTRY_CODE.min(full_number.len()) {
            if !full_number.is_char_boundary(length) {
                break;
            }
            let potential_country_code = &full_number[..length];
            if let Ok(country_code) = potential_country_code.parse::<i32>() {
                if self.country_calling_code_to_region_codes.contains_key(&country_code) {
                    return (country_code, &full_number[length..]);
                }
            }
        }
        (0, full_number)
    }

    /// Tries to extract a country calling code from a number, filling in the
    /// source on `phone_number` when the raw input is kept. Returns the code
    /// and the national number remainder; a code of 0 means the default
    /// region's calling code should be used.
    fn maybe_extract_country_code(
        &self,
        number: &str,
        default_region_metadata: Option<&PhoneMetadata>,
        keep_raw_input: bool,
        phone_number: &mut PhoneNumber,
    ) -> Result<(i32, String), ParseErrorInternal> {
        if number.is_empty() {
            return Ok((0, String::new()));
        }
        let mut full_number = number.to_owned();
        // Set the default prefix to be something that will never match if
        // there is no default region.
        let possible_idd_prefix = default_region_metadata
            .map(|metadata| metadata.international_prefix())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or("NonMatch");
        let country_code_source =
            self.maybe_strip_international_prefix_and_normalize(&mut full_number, possible_idd_prefix)?;
        if keep_raw_input {
            phone_number.set_country_code_source(country_code_source);
        }
        if country_code_source != CountryCodeSource::FROM_DEFAULT_COUNTRY {
            if full_number.len() <= MIN_LENGTH_FOR_NSN {
                return Err(ParseError::TooShortAfterIdd.into());
            }
            let (potential_country_code, rest) = self.extract_country_code(&full_number);
            if potential_country_code != 0 {
                phone_number.set_country_code(potential_country_code);
                return Ok((potential_country_code, rest.to_owned()));
            }
            // If this fails, they must be using a strange country calling code
            // that we don't recognize, or that doesn't exist.
            return Err(ParseError::InvalidCountryCode.into());
        } else if let Some(default_metadata) = default_region_metadata {
            // Check to see if the number starts with the country calling code
            // for the default region. If so, we remove the country calling
            // code, and do some checks on the validity of the number before and
            // after.
            let default_country_code = default_metadata.country_code();
            let mut buf = itoa::Buffer::new();
            let default_country_code_string = buf.format(default_country_code);
            if let Some(potential_national_number) =
                full_number.strip_prefix(default_country_code_string)
            {
                let mut potential_national_number = potential_national_number.to_owned();
                let general_desc = &default_metadata.general_desc;
                self.maybe_strip_national_prefix_and_carrier_code(
                    &mut potential_national_number,
                    default_metadata,
                    None,
                )?;
                // If the number was not valid before but is valid now, or if it
                // was too long before, we consider the number with the country
                // calling code stripped to be a better result and keep that
                // instead.
                if (!self
                    .matcher
                    .match_national_number(&full_number, general_desc, false)
                    && self.matcher.match_national_number(
                        &potential_national_number,
                        general_desc,
                        false,
                    ))
                    || test_number_length_with_unknown_type(&full_number, default_metadata)
                        == Err(ValidationError::TooLong)
                {
                    if keep_raw_input {
                        phone_number
                            .set_country_code_source(CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN);
                    }
                    phone_number.set_country_code(default_country_code);
                    return Ok((default_country_code, potential_national_number));
                }
            }
        }
        // No country calling code present.
        phone_number.set_country_code(0);
        Ok((0, String::new()))
    }

    /// Converts `number_to_parse` to a form that can be parsed, handling the
    /// RFC 3966 `phone-context` and `isub` parameters along the way.
    fn build_national_number_for_parsing(
        &self,
        number_to_parse: &str,
    ) -> Result<String, ParseErrorInternal> {
        let mut national_number = String::new();
        if let Some(index_of_phone_context) = number_to_parse.find(RFC3966_PHONE_CONTEXT) {
            let phone_context_start = index_of_phone_context + RFC3966_PHONE_CONTEXT.len();
            let phone_context = match number_to_parse[phone_context_start..].find(';') {
                Some(relative_end) => {
                    &number_to_parse[phone_context_start..phone_context_start + relative_end]
                }
                None => &number_to_parse[phone_context_start..],
            };
            // The phone-context value is either a global number or a domain.
            if !(self
                .reg_exps
                .rfc3966_global_number_digits_pattern
                .is_match(phone_context)
                || self.reg_exps.rfc3966_domainname_pattern.is_match(phone_context))
            {
                return Err(ParseError::NotANumber(NotANumberError::InvalidPhoneContext).into());
            }
            // If the phone context contains a phone number prefix, we need to
            // capture it, whereas domains will be ignored.
            if phone_context.starts_with(PLUS_SIGN) {
                // Additional parameters might follow the phone context. If so,
                // we will remove them here because the parameters after phone
                // context are not important for parsing the phone number.
                national_number.push_str(phone_context);
            }
            // Now append everything between the "tel:" prefix and the
            // phone-context. This should include the national number, an
            // optional extension or isdn-subaddress component. Note we also
            // handle the case when "tel:" is missing, as we have seen in some
            // of the phone number inputs.
            let index_of_national_number = match number_to_parse.find(RFC3966_PREFIX) {
                Some(index_of_rfc_prefix) if index_of_rfc_prefix < index_of_phone_context => {
                    index_of_rfc_prefix + RFC3966_PREFIX.len()
                }
                _ => 0,
            };
            national_number
                .push_str(&number_to_parse[index_of_national_number..index_of_phone_context]);
        } else {
            // Extract a possible number from the string passed in (this strips
            // leading characters that could not be the start of a phone
            // number.)
            national_number.push_str(
                self.extract_possible_number(number_to_parse)
                    .map_err(ParseError::from)?,
            );
        }
        // Delete the isdn-subaddress and everything after it if it is present.
        // Note extension won't appear at the same time with isdn-subaddress
        // according to paragraph 5.3 of the RFC3966 spec.
        if let Some(index_of_isdn) = national_number.find(RFC3966_ISDN_SUBADDRESS) {
            national_number.truncate(index_of_isdn);
        }
        // If both phone context and isdn-subaddress are absent but other
        // parameters are present, the parameters are left in nationalNumber.
        // This is because we are concerned about deleting content from a
        // potential number string when there is no strong evidence that the
        // number is actually written in RFC3966.
        Ok(national_number)
    }

    /// Checks to see that the region code used is valid, or if it is not
    /// valid, that the number to parse starts with a + symbol so that we can
    /// attempt to infer the region from the number.
    fn check_region_for_parsing(
        &self,
        number_to_parse: &str,
        default_region: Option<&str>,
    ) -> bool {
        if default_region.map_or(false, |region| self.is_valid_region_code(region)) {
            return true;
        }
        !number_to_parse.is_empty()
            && self.reg_exps.plus_chars_pattern.matches_start(number_to_parse)
    }

    pub fn parse(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseErrorInternal> {
        let mut phone_number = PhoneNumber::new();
        self.parse_helper(number_to_parse, Some(default_region), false, true, &mut phone_number)?;
        Ok(phone_number)
    }

    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseErrorInternal> {
        let mut phone_number = PhoneNumber::new();
        self.parse_helper(number_to_parse, Some(default_region), true, true, &mut phone_number)?;
        Ok(phone_number)
    }

    pub(super) fn parse_helper(
        &self,
        number_to_parse: &str,
        default_region: Option<&str>,
        keep_raw_input: bool,
        check_region: bool,
        phone_number: &mut PhoneNumber,
    ) -> Result<(), ParseErrorInternal> {
        if number_to_parse.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }
        if number_to_parse.len() > MAX_INPUT_STRING_LENGTH {
            return Err(ParseError::InputTooLong.into());
        }
        let mut national_number = self.build_national_number_for_parsing(number_to_parse)?;
        if !self.is_viable_phone_number(&national_number) {
            return Err(
                ParseError::NotANumber(NotANumberError::NotMatchedValidNumberPattern).into(),
            );
        }
        // Check the region supplied is valid, or that the extracted number
        // starts with some sort of + sign so the number's region can be
        // determined.
        if check_region && !self.check_region_for_parsing(&national_number, default_region) {
            return Err(ParseError::MissingOrInvalidDefaultRegion.into());
        }
        if keep_raw_input {
            phone_number.set_raw_input(number_to_parse.to_owned());
        }
        if let Some(extension) = self.maybe_strip_extension(&mut national_number) {
            phone_number.set_extension(extension);
        }
        let mut region_metadata =
            default_region.and_then(|region| self.get_metadata_for_region(region));
        let mut country_code;
        let mut normalized_national_number;
        match self.maybe_extract_country_code(
            &national_number,
            region_metadata,
            keep_raw_input,
            phone_number,
        ) {
            Ok((extracted_code, national_number_rest)) => {
                country_code = extracted_code;
                normalized_national_number = national_number_rest;
            }
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {
                match self.reg_exps.plus_chars_pattern.find_start(&national_number) {
                    Some(plus_match) => {
                        // Strip the plus-char, and try again.
                        let (extracted_code, national_number_rest) = self
                            .maybe_extract_country_code(
                                &national_number[plus_match.end()..],
                                region_metadata,
                                keep_raw_input,
                                phone_number,
                            )?;
                        if extracted_code == 0 {
                            return Err(ParseError::InvalidCountryCode.into());
                        }
                        country_code = extracted_code;
                        normalized_national_number = national_number_rest;
                    }
                    None => return Err(ParseError::InvalidCountryCode.into()),
                }
            }
            Err(err) => return Err(err),
        }
        if country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(country_code);
            if Some(phone_number_region) != default_region {
                // Metadata cannot be null because the country calling code is
                // valid.
                region_metadata =
                    self.get_metadata_for_region_or_calling_code(country_code, phone_number_region);
            }
        } else {
            // If no extracted country calling code, use the region supplied
            // instead. The national number is just the normalized version of
            // the number we were given to parse.
            normalized_national_number.push_str(&self.normalize(&national_number));
            if default_region.is_some() {
                if let Some(metadata) = region_metadata {
                    country_code = metadata.country_code();
                    phone_number.set_country_code(country_code);
                }
            } else if keep_raw_input {
                phone_number.clear_country_code_source();
            }
        }
        if normalized_national_number.len() < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn.into());
        }
        if let Some(metadata) = region_metadata {
            let mut carrier_code = String::new();
            let mut potential_national_number = normalized_national_number.clone();
            self.maybe_strip_national_prefix_and_carrier_code(
                &mut potential_national_number,
                metadata,
                Some(&mut carrier_code),
            )?;
            // We require that the NSN remaining after stripping the national
            // prefix and carrier code be long enough to be a possible length
            // for the region. Otherwise, we don't do the stripping, since the
            // original number could be a valid short number.
            match test_number_length_with_unknown_type(&potential_national_number, metadata) {
                Err(ValidationError::TooShort)
                | Err(ValidationError::InvalidLength)
                | Ok(NumberLengthType::IsPossibleLocalOnly) => {}
                _ => {
                    normalized_national_number = potential_national_number;
                    if keep_raw_input && !carrier_code.is_empty() {
                        phone_number.set_preferred_domestic_carrier_code(carrier_code);
                    }
                }
            }
        }
        let length_of_national_number = normalized_national_number.len();
        if length_of_national_number < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn.into());
        }
        if length_of_national_number > MAX_LENGTH_FOR_NSN {
            return Err(ParseError::TooLongNsn.into());
        }
        set_italian_leading_zeros_for_phone_number(&normalized_national_number, phone_number);
        let parsed_national_number: u64 = normalized_national_number.parse().map_err(
            |err: std::num::ParseIntError| {
                ParseError::NotANumber(NotANumberError::FailedToParseNumberAsInt(err))
            },
        )?;
        phone_number.set_national_number(parsed_national_number);
        Ok(())
    }

    pub fn is_number_match_with_one_string(
        &self,
        first_number: &PhoneNumber,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberErrorInternal> {
        // First see if the second number has an implicit country calling code,
        // by attempting to parse it.
        match self.parse(second_number, RegionCode::get_unknown()) {
            Ok(second_number_as_proto) => {
                Ok(self.is_number_match(first_number, &second_number_as_proto))
            }
            Err(ParseErrorInternal::FailedToParse(
                ParseError::InvalidCountryCode | ParseError::MissingOrInvalidDefaultRegion,
            )) => {
                // The second number has no country calling code. EXACT_MATCH is
                // no longer possible. We parse it as if the region was the same
                // as that for the first number, and if EXACT_MATCH is returned,
                // we replace this with NSN_MATCH.
                let first_number_region =
                    self.get_region_code_for_country_code(first_number.country_code());
                if first_number_region != RegionCode::get_unknown() {
                    let second_number_with_first_number_region = self
                        .parse(second_number, first_number_region)
                        .map_err(InvalidNumberErrorInternal::from)?;
                    let match_type =
                        self.is_number_match(first_number, &second_number_with_first_number_region);
                    Ok(if match_type == MatchType::ExactMatch {
                        MatchType::NsnMatch
                    } else {
                        match_type
                    })
                } else {
                    // If the first number didn't have a valid country calling
                    // code, then we parse the second number without one as
                    // well.
                    let mut second_number_proto = PhoneNumber::new();
                    self.parse_helper(second_number, None, false, false, &mut second_number_proto)
                        .map_err(InvalidNumberErrorInternal::from)?;
                    Ok(self.is_number_match(first_number, &second_number_proto))
                }
            }
            Err(err) => Err(InvalidNumberErrorInternal::from(err)),
        }
    }
}
