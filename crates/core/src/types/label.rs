//! Open string enums with display labels.

/// Define an enum over a server-owned string field with a display label for
/// each known value.
///
/// The generated type decodes every string: values the store API sends that
/// this build does not know about become `Other(raw)`, serialize back
/// unchanged, and display as the raw value.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($wire:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value this build has no label for.
            Other(String),
        }

        impl $name {
            /// Wire values with a known label, in display order.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// Display label for a raw wire value; unknown input passes through.
            #[must_use]
            pub fn label_for(raw: &str) -> &str {
                match raw {
                    $($wire => $label,)+
                    other => other,
                }
            }

            /// The value as sent over the wire.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            /// Human-readable label.
            #[must_use]
            pub fn label(&self) -> &str {
                Self::label_for(self.as_str())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}
