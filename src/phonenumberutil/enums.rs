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

use strum::EnumIter;

/// The textual forms a [`crate::PhoneNumber`] can be rendered into.
///
/// `INTERNATIONAL` and `NATIONAL` follow the ITU-T E.123 recommendation with
/// per-region separator conventions. For the Google Switzerland office number:
/// - **International**: `+41 44 668 1800`
/// - **National**: `044 668 1800`
/// - **E164**: `+41446681800` (international format without separators)
/// - **RFC3966**: `tel:+41-44-668-1800`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberFormat {
    /// `+` followed by country code and NSN, no separators, no extension.
    E164,
    /// Country code plus the NSN grouped per region rules.
    International,
    /// The form dialled within the number's own country, including any
    /// national prefix.
    National,
    /// A `tel:` URI with hyphen separators and `;ext=` extensions.
    RFC3966,
}

/// Categorizes phone numbers based on their primary use.
#[derive(Debug, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberType {
    /// Traditional landline numbers tied to a geographic location.
    FixedLine,
    /// Numbers assigned to wireless devices.
    Mobile,
    /// Used in regions (e.g. the USA) where fixed-line and mobile numbers
    /// cannot be told apart by pattern.
    FixedLineOrMobile,
    /// Free for the caller; the recipient pays. E.g. "800" numbers in the US.
    TollFree,
    /// Charged above normal rates, e.g. horoscope lines.
    PremiumRate,
    /// Cost split between caller and recipient.
    SharedCost,
    /// Voice-over-IP numbers.
    VoIP,
    /// A number tied to a person rather than a line, routed per the owner's
    /// configuration.
    PersonalNumber,
    /// Numbers reaching paging devices.
    Pager,
    /// Universal Access Numbers routing to different company offices.
    UAN,
    /// Voicemail access numbers.
    VoiceMail,
    /// The number does not match any known pattern for its region.
    Unknown,
}

/// Describes the degree of similarity between two phone numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// The two numbers are entirely different.
    NoMatch,
    /// One national significant number is a trailing portion of the other,
    /// e.g. `6502530000` against `16502530000`.
    ShortNsnMatch,
    /// Same NSN, but a country code was only present (or inferable) on one
    /// side, e.g. `0446681800` against `+41446681800`.
    NsnMatch,
    /// Identical country code, NSN and extension.
    ExactMatch,
}

// ValidationResult from the reference implementation is split into an Ok
// half (this enum) and an Err half (errors::ValidationError) so callers get
// an ordinary Result.

/// Positive outcomes of a possible-length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberLengthType {
    /// The length matches a complete, dialable number of the region.
    IsPossible,
    /// The length only matches numbers dialable within a local area, e.g.
    /// without the area code.
    IsPossibleLocalOnly,
}
