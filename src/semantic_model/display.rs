/// Readable labels for the ad-metrics columns whose title-cased form is wrong
/// (abbreviations, percentages, verification suffixes).
const DISPLAY_NAMES: [(&str, &str); 25] = [
    ("ctr", "CTR"),
    ("cpc", "CPC"),
    ("cpm", "CPM"),
    ("roas", "ROAS"),
    ("cpv", "CPV"),
    ("cpcv", "CPCV"),
    ("vtr", "VTR"),
    ("cpe", "CPE"),
    ("cpl", "CPL"),
    ("video_plays_100", "100% Video View"),
    ("video_view_25", "25% Video View"),
    ("video_view_50", "50% Video View"),
    ("video_view_75", "75% Video View"),
    ("video_view_100", "100% Video View"),
    ("brand_suitability_blocked", "Brand Suitability Blocked Ads"),
    ("brand_suitability_failed", "Brand Suitability Failed Ads"),
    ("impressions_verification", "Impressions (Verification)"),
    ("measurable_impressions", "Measurable Impressions (Verification)"),
    ("measurable_rate", "Measurable Rate (Verification)"),
    ("viewability_rate_verification", "Viewability Rate (Verification)"),
    ("viewability_impressions", "Viewability Impressions (Verification)"),
    ("campaign_id", "Campaign ID"),
    ("adset_id", "Adset ID"),
    ("ad_id", "Ad ID"),
    ("account_id", "Account ID"),
];

/// Human readable column name: override table first, otherwise
/// underscores become spaces and each word is capitalised.
pub fn display_name(column: &str) -> String {
    if let Some((_, label)) = DISPLAY_NAMES.iter().find(|(name, _)| *name == column) {
        return label.to_string();
    }
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
