/// Suggested marketing campaign for the segment labels the analysis emits.
///
/// Labels outside the known set get no suggestion.
pub fn campaign_for(segment: &str) -> Option<&'static str> {
    match segment {
        "loyal" => Some("Exclusive VIP offer: 15% off next purchase + free shipping"),
        "regular" => Some("Special discount: 10% off on orders over $100"),
        "at-risk" => Some("We miss you! 20% off to welcome you back"),
        "inactive" => Some("Reactivation offer: 25% off + free gift with purchase"),
        _ => None,
    }
}
