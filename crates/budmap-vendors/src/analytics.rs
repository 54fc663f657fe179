use serde::{Deserialize, Serialize};

/// Engagement counters for a vendor.
///
/// No analytics backend exists yet, so every vendor reports the same
/// placeholder figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAnalytics {
    pub check_ins: u32,
    pub social_posts: u32,
    pub route_visits: u32,
    pub unique_visitors: u32,
    pub repeat_visitors: u32,
}

impl VendorAnalytics {
    pub const PLACEHOLDER: Self = Self {
        check_ins: 150,
        social_posts: 75,
        route_visits: 200,
        unique_visitors: 120,
        repeat_visitors: 30,
    };
}
