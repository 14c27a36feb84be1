//! Fixed vocabularies of the swim-results domain
//!
//! Each enum carries its wire codes in `CODES`, which is what the request
//! schemas are declared against, and serializes to exactly those codes.

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $code:tt),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Wire codes accepted for this vocabulary, in declaration order
            pub const CODES: &'static [&'static str] = &[$($code),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Swimming event. The 50-yard stroke events cover medley relay legs.
    Event {
        Free50 => "50_free",
        Free100 => "100_free",
        Free200 => "200_free",
        Free500 => "500_free",
        Back100 => "100_back",
        Breast100 => "100_breast",
        Fly100 => "100_fly",
        Im200 => "200_im",
        Back50 => "50_back",
        Breast50 => "50_breast",
        Fly50 => "50_fly",
    }
}

vocabulary! {
    /// Whether a record was swum as an individual event or as a relay leg
    RecordType {
        Individual => "individual",
        Relay => "relay",
    }
}

vocabulary! {
    /// How the swimmer left the wall
    StartType {
        Flat => "flat",
        Relay => "relay",
    }
}

vocabulary! {
    RelayType {
        MedleyRelay200 => "200_mr",
        FreeRelay200 => "200_fr",
        FreeRelay400 => "400_fr",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_codes_round_trip_through_serde() {
        assert_eq!(Event::CODES.len(), 11);
        for code in Event::CODES {
            let event: Event = serde_json::from_value(serde_json::json!(code)).unwrap();
            assert_eq!(event.as_str(), *code);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(serde_json::from_str::<RelayType>("\"800_fr\"").is_err());
    }

    #[test]
    fn test_display_uses_wire_code() {
        assert_eq!(RelayType::MedleyRelay200.to_string(), "200_mr");
        assert_eq!(StartType::Relay.to_string(), "relay");
        assert_eq!(RecordType::Individual.to_string(), "individual");
    }
}
