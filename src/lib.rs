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

mod interfaces;
/// Typed metadata model plus the deserializer for the offline-produced blob.
pub mod phonemetadata;
pub mod phonenumber;
mod phonenumberutil;
mod regexp_cache;
mod regex_based_matcher;
pub mod region_code;
pub(crate) mod regex_util;
pub(crate) mod string_util;

pub use phonenumberutil::{
    global, global_init,
    phonenumberutil::PhoneNumberUtil,
    errors::{*},
    enums::{*},
};
pub use phonemetadata::{
    MetadataError, NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc,
};
pub use phonenumber::{CountryCodeSource, PhoneNumber};
mod tests;
