//! Region slug to display name normalization.
//!
//! The aggregate tables key regions by lowercase hyphenated slugs. The
//! boundary GeoJSON is keyed by canonical names (`properties.ST_NM`), so
//! state columns must pass through `normalize_state` before any map join.

use crate::table::{Cell, ResultTable};

/// Closed lookup of every state and union territory slug.
pub const STATE_NAMES: [(&str, &str); 36] = [
    ("andaman-&-nicobar-islands", "Andaman & Nicobar"),
    ("andhra-pradesh", "Andhra Pradesh"),
    ("arunachal-pradesh", "Arunachal Pradesh"),
    ("assam", "Assam"),
    ("bihar", "Bihar"),
    ("chandigarh", "Chandigarh"),
    ("chhattisgarh", "Chhattisgarh"),
    ("dadra-&-nagar-haveli-&-daman-&-diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("delhi", "Delhi"),
    ("goa", "Goa"),
    ("gujarat", "Gujarat"),
    ("haryana", "Haryana"),
    ("himachal-pradesh", "Himachal Pradesh"),
    ("jammu-&-kashmir", "Jammu & Kashmir"),
    ("jharkhand", "Jharkhand"),
    ("karnataka", "Karnataka"),
    ("kerala", "Kerala"),
    ("ladakh", "Ladakh"),
    ("lakshadweep", "Lakshadweep"),
    ("madhya-pradesh", "Madhya Pradesh"),
    ("maharashtra", "Maharashtra"),
    ("manipur", "Manipur"),
    ("meghalaya", "Meghalaya"),
    ("mizoram", "Mizoram"),
    ("nagaland", "Nagaland"),
    ("odisha", "Odisha"),
    ("puducherry", "Puducherry"),
    ("punjab", "Punjab"),
    ("rajasthan", "Rajasthan"),
    ("sikkim", "Sikkim"),
    ("tamil-nadu", "Tamil Nadu"),
    ("telangana", "Telangana"),
    ("tripura", "Tripura"),
    ("uttar-pradesh", "Uttar Pradesh"),
    ("uttarakhand", "Uttarakhand"),
    ("west-bengal", "West Bengal"),
];

/// Exact-match lookup. Case and whitespace are significant.
pub fn canonical_name(slug: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, name)| *name)
}

/// Canonical name for a known slug, the input unchanged otherwise.
pub fn normalize_state(raw: &str) -> String {
    canonical_name(raw).unwrap_or(raw).to_string()
}

/// Normalize every value of a state-keyed column in place.
pub fn normalize_state_column(table: &mut ResultTable, column: &str) {
    table.map_column(column, |cell| match cell {
        Cell::Text(raw) => Cell::Text(normalize_state(raw)),
        other => other.clone(),
    });
}
