//! Display helpers shared by the storefront and admin views.
//!
//! Every function here is total: malformed or missing input produces a
//! sensible display value instead of an error.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::types::Price;

/// Format an amount in pesos, e.g. `₱1,234.50`.
///
/// A missing amount formats the same as zero.
#[must_use]
pub fn format_price(amount: Option<Decimal>) -> String {
    Price::php(amount.unwrap_or_default()).to_string()
}

/// Format a timestamp as `January 5, 2025`.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format an RFC 3339 timestamp string as `January 5, 2025`.
///
/// Strings that do not parse are returned unchanged.
#[must_use]
pub fn format_date_str(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |date| format_date(&date.with_timezone(&Utc)),
    )
}

/// Shorten `text` to at most `max_chars` characters, appending `...` when
/// anything was cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head.trim())
}

/// Resolve an image reference from the store API into a browser URL.
///
/// Absolute URLs are returned as-is. Upload paths such as
/// `/uploads/products/a.jpg` are served from the API origin, so they are
/// joined onto `api_base_url` with its trailing `/api` removed.
#[must_use]
pub fn image_url(path: Option<&str>, api_base_url: &str) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    let base = api_base_url.trim_end_matches('/');
    let origin = base.strip_suffix("/api").unwrap_or(base);
    if path.starts_with('/') {
        Some(format!("{origin}{path}"))
    } else {
        Some(format!("{origin}/{path}"))
    }
}

/// Whole-percent markdown between a compare-at price and the selling price.
///
/// Display only: used for the "-20%" badge on product cards. Returns 0 when
/// there is no markdown.
#[must_use]
pub fn discount_percentage(compare_at: Decimal, price: Decimal) -> u32 {
    if compare_at <= Decimal::ZERO || compare_at <= price {
        return 0;
    }
    ((compare_at - price) / compare_at * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// One slot of a five-star rating display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    /// CSS modifier for the slot.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Empty => "empty",
        }
    }
}

/// Expand an average rating into five star slots.
///
/// A fractional part of at least one half shows as a half star.
#[must_use]
pub fn star_rating(rating: Decimal) -> [Star; 5] {
    let rating = rating.clamp(Decimal::ZERO, Decimal::from(5));
    let full = rating.floor().to_usize().unwrap_or(0);
    let half = rating - rating.floor() >= Decimal::new(5, 1);

    let mut stars = [Star::Empty; 5];
    for (i, star) in stars.iter_mut().enumerate() {
        if i < full {
            *star = Star::Full;
        } else if i == full && half {
            *star = Star::Half;
        }
    }
    stars
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap_or_default()
    }

    #[test]
    fn test_format_price_zero_and_missing_match() {
        assert_eq!(format_price(Some(Decimal::ZERO)), "₱0.00");
        assert_eq!(format_price(None), "₱0.00");
    }

    #[test]
    fn test_format_price_line_total() {
        assert_eq!(format_price(Some(dec("200.00"))), "₱200.00");
        assert_eq!(format_price(Some(dec("1499.5"))), "₱1,499.50");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2025, 1, 5, 8, 30, 0).single();
        assert_eq!(date.map(|d| format_date(&d)).as_deref(), Some("January 5, 2025"));
    }

    #[test]
    fn test_format_date_str() {
        assert_eq!(format_date_str("2024-12-25T03:04:05.000Z"), "December 25, 2024");
        assert_eq!(format_date_str("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 100), "short");
        assert_eq!(truncate_text("A5 dotted notebook", 9), "A5 dotted...");
        assert_eq!(truncate_text("ab cd", 3), "ab...");
        assert_eq!(truncate_text("ñññññ", 2), "ññ...");
    }

    #[test]
    fn test_image_url() {
        let base = "http://localhost:5000/api";
        assert_eq!(image_url(None, base), None);
        assert_eq!(image_url(Some("  "), base), None);
        assert_eq!(
            image_url(Some("https://cdn.example.com/a.jpg"), base).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(
            image_url(Some("/uploads/products/a.jpg"), base).as_deref(),
            Some("http://localhost:5000/uploads/products/a.jpg")
        );
        assert_eq!(
            image_url(Some("uploads/a.jpg"), "https://api.shop.ph/api/").as_deref(),
            Some("https://api.shop.ph/uploads/a.jpg")
        );
    }

    #[test]
    fn test_discount_percentage() {
        assert_eq!(discount_percentage(dec("500"), dec("400")), 20);
        assert_eq!(discount_percentage(dec("300"), dec("199")), 34);
        assert_eq!(discount_percentage(dec("400"), dec("400")), 0);
        assert_eq!(discount_percentage(dec("400"), dec("450")), 0);
        assert_eq!(discount_percentage(Decimal::ZERO, dec("10")), 0);
    }

    #[test]
    fn test_star_rating() {
        use Star::{Empty, Full, Half};

        assert_eq!(star_rating(dec("0")), [Empty; 5]);
        assert_eq!(star_rating(dec("3.5")), [Full, Full, Full, Half, Empty]);
        assert_eq!(star_rating(dec("4.4")), [Full, Full, Full, Full, Empty]);
        assert_eq!(star_rating(dec("5")), [Full; 5]);
        assert_eq!(star_rating(dec("7")), [Full; 5]);
    }
}
