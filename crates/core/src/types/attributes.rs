//! Descriptive notebook attributes: size, paper, cover, and binding.
//!
//! The store API sends these as lowercase slugs. Each type maps the slugs the
//! shop sells to shopper-facing names and passes anything else through
//! untouched, so a new slug added on the server renders as itself instead of
//! failing to decode.

label_enum! {
    /// Notebook size.
    ProductSize {
        Pocket => ("pocket", "Pocket"),
        Small => ("small", "Small"),
        Medium => ("medium", "Medium"),
        Large => ("large", "Large"),
        ExtraLarge => ("extra-large", "Extra Large"),
        Custom => ("custom", "Custom"),
    }
}

label_enum! {
    /// Page ruling.
    PaperType {
        Lined => ("lined", "Lined"),
        Dotted => ("dotted", "Dot Grid"),
        Grid => ("grid", "Grid"),
        Blank => ("blank", "Blank"),
        Mixed => ("mixed", "Mixed"),
    }
}

label_enum! {
    /// Cover construction.
    CoverType {
        Hardcover => ("hardcover", "Hardcover"),
        Softcover => ("softcover", "Softcover"),
        Leather => ("leather", "Leather"),
        Spiral => ("spiral", "Spiral"),
        Stitched => ("stitched", "Stitched"),
    }
}

label_enum! {
    /// Binding method.
    Binding {
        Perfect => ("perfect", "Perfect Bound"),
        Spiral => ("spiral", "Spiral"),
        WireO => ("wire-o", "Wire-O"),
        Sewn => ("sewn", "Sewn"),
        Stapled => ("stapled", "Stapled"),
        Disc => ("disc", "Disc Bound"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_size_labels() {
        let expected = [
            ("pocket", "Pocket"),
            ("small", "Small"),
            ("medium", "Medium"),
            ("large", "Large"),
            ("extra-large", "Extra Large"),
            ("custom", "Custom"),
        ];
        for (raw, label) in expected {
            assert_eq!(ProductSize::label_for(raw), label);
            assert_eq!(ProductSize::from(raw).label(), label);
        }
    }

    #[test]
    fn test_paper_labels() {
        let expected = [
            ("lined", "Lined"),
            ("dotted", "Dot Grid"),
            ("grid", "Grid"),
            ("blank", "Blank"),
            ("mixed", "Mixed"),
        ];
        for (raw, label) in expected {
            assert_eq!(PaperType::label_for(raw), label);
        }
    }

    #[test]
    fn test_cover_labels() {
        let expected = [
            ("hardcover", "Hardcover"),
            ("softcover", "Softcover"),
            ("leather", "Leather"),
            ("spiral", "Spiral"),
            ("stitched", "Stitched"),
        ];
        for (raw, label) in expected {
            assert_eq!(CoverType::label_for(raw), label);
        }
    }

    #[test]
    fn test_binding_labels() {
        let expected = [
            ("perfect", "Perfect Bound"),
            ("spiral", "Spiral"),
            ("wire-o", "Wire-O"),
            ("sewn", "Sewn"),
            ("stapled", "Stapled"),
            ("disc", "Disc Bound"),
        ];
        for (raw, label) in expected {
            assert_eq!(Binding::label_for(raw), label);
        }
    }

    #[test]
    fn test_unknown_values_pass_through() {
        for raw in ["a5-landscape", "", "Lined", "coptic stitch"] {
            assert_eq!(ProductSize::label_for(raw), raw);
            assert_eq!(PaperType::label_for(raw), raw);
            assert_eq!(CoverType::label_for(raw), raw);
            assert_eq!(Binding::label_for(raw), raw);
        }
        assert_eq!(Binding::from("coptic").label(), "coptic");
    }

    #[test]
    fn test_unknown_values_round_trip_through_serde() {
        let binding: Binding = serde_json::from_str("\"lay-flat\"").unwrap();
        assert_eq!(binding, Binding::Other("lay-flat".to_string()));
        assert_eq!(serde_json::to_string(&binding).unwrap(), "\"lay-flat\"");

        let known: Binding = serde_json::from_str("\"wire-o\"").unwrap();
        assert_eq!(known, Binding::WireO);
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"wire-o\"");
    }

    #[test]
    fn test_values_lists_known_slugs_in_order() {
        assert_eq!(PaperType::VALUES, &["lined", "dotted", "grid", "blank", "mixed"]);
    }
}
