mod helper_constants;
mod helper_functions;
pub mod errors;
pub mod enums;
pub mod phonenumberutil;
mod phone_number_regexps_and_mappings;
mod phonenumberutil_internal;

use std::sync::OnceLock;

pub use enums::{MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType};

use crate::phonemetadata::{MetadataError, PhoneMetadataCollection};
use crate::phonenumberutil::phonenumberutil::PhoneNumberUtil;

static PHONE_NUMBER_UTIL: OnceLock<PhoneNumberUtil> = OnceLock::new();

/// Initializes the process-wide `PhoneNumberUtil` from a serialized metadata
/// blob. The first successful call builds the registry; every later call is
/// a no-op that returns the existing instance.
pub fn global_init(metadata_bytes: &[u8]) -> Result<&'static PhoneNumberUtil, MetadataError> {
    if let Some(util) = PHONE_NUMBER_UTIL.get() {
        return Ok(util);
    }
    let collection = PhoneMetadataCollection::parse_from_bytes(metadata_bytes)?;
    Ok(PHONE_NUMBER_UTIL.get_or_init(|| PhoneNumberUtil::new_for_metadata(collection)))
}

/// The process-wide instance, once `global_init` has run.
pub fn global() -> Option<&'static PhoneNumberUtil> {
    PHONE_NUMBER_UTIL.get()
}
