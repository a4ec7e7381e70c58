//! Macro for implementing Display and FromStr for string-keyed enums
//!
//! Used for enums that travel through environment variables or log lines
//! (log formats, event phases). Parsing is case-insensitive, output is the
//! canonical lowercase form.
//!
//! # Example
//!
//! ```rust
//! use opscope_domain::impl_str_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Outcome {
//!     Ok,
//!     Failed,
//! }
//!
//! impl_str_enum_conversions!(Outcome {
//!     Ok => "ok",
//!     Failed => "failed",
//! });
//!
//! assert_eq!(Outcome::Failed.to_string(), "failed");
//! assert_eq!("OK".parse::<Outcome>(), Ok(Outcome::Ok));
//! ```

/// Implements `as_str`, Display and FromStr for a fieldless enum
///
/// This macro generates:
/// - `as_str(&self) -> &'static str`
/// - Display: writes the canonical string
/// - FromStr: case-insensitive parse, error names the enum
#[macro_export]
macro_rules! impl_str_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
