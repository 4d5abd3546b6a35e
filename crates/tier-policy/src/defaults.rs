use parcelbase_core_types::Tier;

use crate::model::TierPolicyTable;

/// Built-in policy table for the product's gated capabilities.
pub fn default_table() -> TierPolicyTable {
    TierPolicyTable::from_entries(
        1,
        [
            ("parcel_search", Tier::Free),
            ("parcel_detail", Tier::Free),
            ("saved_searches", Tier::Pro),
            ("reports", Tier::Pro),
            ("report_branding", Tier::ProPlus),
            ("collaboration", Tier::ProPlus),
            ("bulk_export", Tier::Portfolio),
            ("portfolio_dashboard", Tier::Portfolio),
            ("api_access", Tier::Enterprise),
            ("sso", Tier::Enterprise),
        ],
    )
}
