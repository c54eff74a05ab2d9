//! Well-known field keys and their clear-to-default values.
//!
//! These keys have a fixed semantic meaning on the collection side and get
//! typed setters on `Timer` and `Tracker`. Clearing a well-known key resets
//! it to its documented default instead of removing it; keys without a
//! default (and arbitrary custom keys) are removed outright.

use phf::phf_map;

use super::FieldValue;

pub const PAGE_NAME: &str = "pageName";
pub const TRAFFIC_SEGMENT_NAME: &str = "trafficSegmentName";
pub const AB_TEST_ID: &str = "abTestID";
pub const CONTENT_GROUP_NAME: &str = "contentGroupName";
pub const PAGE_VALUE: &str = "pageValue";
pub const BRAND_VALUE: &str = "brandValue";
pub const CART_VALUE: &str = "cartValue";
pub const ORDER_NUMBER: &str = "orderNumber";
pub const ORDER_TIME: &str = "orderTime";
pub const CAMPAIGN: &str = "campaign";
pub const CAMPAIGN_NAME: &str = "campaignName";
pub const CAMPAIGN_SOURCE: &str = "campaignSource";
pub const CAMPAIGN_MEDIUM: &str = "campaignMedium";
pub const TIME_ON_PAGE: &str = "timeOnPage";
pub const URL: &str = "url";
pub const REFERRER_URL: &str = "referrerURL";

// Identity keys attached by the tracker during submission
pub const SITE_ID: &str = "siteID";
pub const SESSION_ID: &str = "sessionID";
pub const GLOBAL_USER_ID: &str = "globalUserID";
pub const DEVICE_NAME: &str = "deviceName";
pub const OS: &str = "os";

/// Default restored by `clear` for keys that keep a value when cleared.
///
/// Const-constructible so the table below can live in a `phf_map!`.
#[derive(Debug, Clone, Copy)]
pub enum WellKnownDefault {
    None,
    Int(i64),
    Double(f64),
}

/// Well-known keys and their clear defaults. Monetary/duration keys reset
/// to zero; name-like keys have no default and are removed on clear.
static WELL_KNOWN: phf::Map<&'static str, WellKnownDefault> = phf_map! {
    "pageName" => WellKnownDefault::None,
    "trafficSegmentName" => WellKnownDefault::None,
    "abTestID" => WellKnownDefault::None,
    "contentGroupName" => WellKnownDefault::None,
    "pageValue" => WellKnownDefault::Double(0.0),
    "brandValue" => WellKnownDefault::Double(0.0),
    "cartValue" => WellKnownDefault::Double(0.0),
    "orderNumber" => WellKnownDefault::None,
    "orderTime" => WellKnownDefault::Int(0),
    "campaign" => WellKnownDefault::None,
    "campaignName" => WellKnownDefault::None,
    "campaignSource" => WellKnownDefault::None,
    "campaignMedium" => WellKnownDefault::None,
    "timeOnPage" => WellKnownDefault::Int(0),
    "url" => WellKnownDefault::None,
    "referrerURL" => WellKnownDefault::None,
    "siteID" => WellKnownDefault::None,
    "sessionID" => WellKnownDefault::None,
    "globalUserID" => WellKnownDefault::None,
    "deviceName" => WellKnownDefault::None,
    "os" => WellKnownDefault::None,
};

/// Whether a key belongs to the well-known set.
pub fn is_well_known(key: &str) -> bool {
    WELL_KNOWN.contains_key(key)
}

/// The clear default for a well-known key, if it has one.
pub fn default_for(key: &str) -> Option<FieldValue> {
    match WELL_KNOWN.get(key)? {
        WellKnownDefault::None => None,
        WellKnownDefault::Int(v) => Some(FieldValue::Int(*v)),
        WellKnownDefault::Double(v) => Some(FieldValue::Double(*v)),
    }
}
